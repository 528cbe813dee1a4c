//! Shared setup for commands that touch the vault.

use std::rc::Rc;

use unstuck_core::{
    App, Config, Database, ManualScheduler, Notifier, Permission, RecordingSink, RescueOutcome,
    Scheduler, SignalSink, SystemClock,
};

use crate::terminal::TerminalChannel;

pub type CliApp = App<ManualScheduler, RecordingSink>;

pub fn notifier(config: &Config) -> Notifier {
    let permission = if config.notifications.enabled {
        Permission::Granted
    } else {
        Permission::Denied
    };
    Notifier::new(permission).with_direct(Box::new(TerminalChannel::new(config.notifications.bell)))
}

pub fn build<S: Scheduler, K: SignalSink>(
    config: &Config,
    scheduler: S,
    sink: K,
) -> Result<App<S, K>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(App::new(Rc::new(db), Rc::new(SystemClock), scheduler, sink)
        .with_nudge_after(config.nudge_after())
        .with_notifier(notifier(config)))
}

/// Open the app for a one-shot command. Each invocation is a fresh launch,
/// so an absence left by `unstuck away` is settled here.
pub fn open() -> Result<CliApp, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut app = build(&config, ManualScheduler::new(), RecordingSink::new())?;
    let outcome = app.launch()?;
    tracing::debug!(?outcome, "launch settled");
    report(&outcome);
    app.sink_mut().drain();
    Ok(app)
}

/// Tell the user about a rescue. Goes to stderr so `--json` output stays clean.
pub fn report(outcome: &RescueOutcome) {
    match outcome {
        RescueOutcome::Rescued { away, task, .. } => {
            eprintln!(
                "you were away for {} min. next up: {}",
                away.num_minutes(),
                task.text
            );
        }
        RescueOutcome::NothingQueued { away } => {
            eprintln!(
                "you were away for {} min. the vault is empty, add something!",
                away.num_minutes()
            );
        }
        RescueOutcome::NoRescue(_) => {}
    }
}
