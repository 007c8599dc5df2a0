pub mod global_option_handler;
pub mod name_command_handler;
pub mod printer;

use std::{ffi::OsString, path::PathBuf, process::ExitCode};

use clap::{crate_version, error::ErrorKind, value_parser, Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use console::Term;
use gboilerplate_core::{config::GlobalConfig, scaffold::Scaffolder, Error};
use log::debug;

use global_option_handler::GlobalOptionHandler;
use name_command_handler::NameCommandHandler;
use printer::Printer;

const USAGE: &str = "gboilerplate [help] [name folderName]";
const NOT_FOUND: &str = "Argument not found.";

#[derive(Debug)]
enum Invocation {
    Help,
    Name {
        global_config: GlobalConfig,
        matches: ArgMatches,
    },
    NotFound,
}

// Extra positional words are ignored, as `help extra` or `name demo-app extra`
fn ignored_words() -> Arg {
    Arg::new("ignored")
        .num_args(1..)
        .action(ArgAction::Append)
        .hide(true)
}

fn cli() -> Command {
    Command::new("gboilerplate")
        .version(crate_version!())
        .about("Scaffold a new project from a boilerplate repository.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print debug logs")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no_clear")
                .long("no-clear")
                .help("Do not clear the terminal before scaffolding")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("help")
                .about("Print usage.")
                .arg(ignored_words()),
        )
        .subcommand(
            Command::new("name")
                .about("Clone the boilerplate into a new folder and set up the project.")
                .arg(
                    Arg::new("folder")
                        .value_name("FOLDER")
                        .help("Folder to create; its name becomes the project name")
                        .value_parser(value_parser!(PathBuf))
                        .required(true),
                )
                .arg(ignored_words())
                .arg(
                    Arg::new("template")
                        .short('t')
                        .long("template")
                        .value_name("NAME")
                        .help("Template to clone (default: the registry default)"),
                )
                .arg(
                    Arg::new("templates")
                        .long("templates")
                        .value_name("FILE")
                        .env("GBOILERPLATE_TEMPLATES")
                        .help("JSON template registry replacing the built-in one")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("skip_install")
                        .long("skip-install")
                        .help("Do not install dependencies")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn parse<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match cli().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            debug!("{}", e);
            return Invocation::NotFound;
        }
    };

    match matches.subcommand() {
        Some(("help", _)) => Invocation::Help,
        Some(("name", sub_match)) => Invocation::Name {
            global_config: GlobalOptionHandler::config(sub_match),
            matches: sub_match.clone(),
        },
        _ => Invocation::NotFound,
    }
}

async fn scaffold(global_config: GlobalConfig, sub_match: &ArgMatches) -> ExitCode {
    GlobalOptionHandler::init_logger(&global_config);

    let scaffold_config = match NameCommandHandler::config(sub_match) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    if global_config.clear_screen {
        if let Err(e) = Term::stdout().clear_screen() {
            debug!("Could not clear terminal: {}", e);
        }
    }

    let printer = Printer::new();
    match Scaffolder::with_config(scaffold_config).run(&printer).await {
        Ok(report) => {
            if let Some(install) = report.install.filter(|install| !install.success) {
                let code = install
                    .code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "none".to_string());
                println!(
                    "{}",
                    format!("Dependencies were not installed (exit code {})", code).yellow()
                );
            }
            ExitCode::SUCCESS
        }
        Err(Error::TargetExists { .. }) => {
            println!("{}", "Folder name already exists!".red());
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("{} {}", "failed:".red(), e);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match parse(std::env::args_os()) {
        Invocation::Help => {
            println!("{}", USAGE);
            ExitCode::SUCCESS
        }
        Invocation::Name {
            global_config,
            matches,
        } => scaffold(global_config, &matches).await,
        Invocation::NotFound => {
            println!("{}", NOT_FOUND);
            ExitCode::SUCCESS
        }
    }
}
