use clap::Subcommand;

use crate::context;

#[derive(Subcommand)]
pub enum LimitsAction {
    /// Set a daily limit for an app (0 removes it)
    Set {
        /// App identifier (e.g. "instagram")
        app: String,
        minutes: f64,
    },
    /// Get the limit for an app (0 means none)
    Get {
        app: String,
    },
    /// List all limits as JSON
    List,
}

pub fn run(action: LimitsAction) -> Result<(), Box<dyn std::error::Error>> {
    let limits = context::open()?.limits();
    match action {
        LimitsAction::Set { app, minutes } => {
            limits.set(&app, minutes)?;
            if minutes == 0.0 {
                println!("limit removed for {app}");
            } else {
                println!("{app}: {minutes} min/day");
            }
        }
        LimitsAction::Get { app } => {
            println!("{}", limits.get(&app)?);
        }
        LimitsAction::List => {
            println!("{}", serde_json::to_string_pretty(&limits.all()?)?);
        }
    }
    Ok(())
}
