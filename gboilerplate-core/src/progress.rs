use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    CheckingTarget,
    Cloning,
    RemovingHistory,
    EditingManifest,
    InstallingDeps,
    Done,
    Aborted,
}

impl Phase {
    /// Next phase on the happy path, `None` once terminal.
    pub fn successor(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::CheckingTarget),
            Phase::CheckingTarget => Some(Phase::Cloning),
            Phase::Cloning => Some(Phase::RemovingHistory),
            Phase::RemovingHistory => Some(Phase::EditingManifest),
            Phase::EditingManifest => Some(Phase::InstallingDeps),
            Phase::InstallingDeps => Some(Phase::Done),
            Phase::Done | Phase::Aborted => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Aborted)
    }

    /// Aborting is allowed from any non-terminal phase after the pre-flight
    /// check started, except once dependencies are installing.
    pub fn can_transition_to(self, next: Phase) -> bool {
        match next {
            Phase::Aborted => matches!(
                self,
                Phase::CheckingTarget
                    | Phase::Cloning
                    | Phase::RemovingHistory
                    | Phase::EditingManifest
            ),
            _ => self.successor() == Some(next),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::CheckingTarget => "checking target",
            Phase::Cloning => "cloning",
            Phase::RemovingHistory => "removing history",
            Phase::EditingManifest => "editing manifest",
            Phase::InstallingDeps => "installing dependencies",
            Phase::Done => "done",
            Phase::Aborted => "aborted",
        };
        f.write_str(label)
    }
}

/// Snapshot pushed to a [`Reporter`] on every phase change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub phase: Phase,
    pub message: String,
}

impl Progress {
    pub fn new(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
        }
    }
}

/// Receives progress from a scaffold run. The orchestrator never reads anything back.
pub trait Reporter: Send + Sync {
    fn transition(&self, progress: &Progress);

    /// A step finished; `message` is a short past-tense summary.
    fn completed(&self, phase: Phase, message: &str);

    /// Diagnostic output from an external tool (package manager warnings).
    fn diagnostic(&self, text: &str);
}

/// Reporter that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn transition(&self, progress: &Progress) {
        log::info!("[{}] {}", progress.phase, progress.message);
    }

    fn completed(&self, phase: Phase, message: &str) {
        log::info!("[{}] {}", phase, message);
    }

    fn diagnostic(&self, text: &str) {
        log::warn!("{}", text);
    }
}
