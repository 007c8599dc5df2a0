use clap::ArgMatches;
use gboilerplate_core::config::GlobalConfig;

pub struct GlobalOptionHandler();

impl GlobalOptionHandler {
    pub fn config(matches: &ArgMatches) -> GlobalConfig {
        let verbose = matches.get_flag("verbose");
        let clear_screen = !matches.get_flag("no_clear");

        GlobalConfig {
            verbose,
            clear_screen,
        }
    }

    pub fn init_logger(global_config: &GlobalConfig) {
        let level = if global_config.verbose { "debug" } else { "warn" };
        let env = env_logger::Env::default().default_filter_or(level);

        // A logger may already be installed when running under tests
        if let Err(e) = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .try_init()
        {
            log::debug!("Keeping the installed logger: {}", e);
        }
    }
}
