use clap::Subcommand;

use crate::context;

#[derive(Subcommand)]
pub enum RescueAction {
    /// Turn distraction rescue on
    Enable,
    /// Turn distraction rescue off and forget any pending absence
    Disable,
    /// Minutes away before a rescue (fractions allowed)
    Delay {
        minutes: f64,
    },
    /// Print rescue settings and any pending absence as JSON
    Status,
}

pub fn run(action: RescueAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = context::open()?;
    match action {
        RescueAction::Enable => {
            app.set_rescue_enabled(true)?;
            println!("rescue enabled");
        }
        RescueAction::Disable => {
            app.set_rescue_enabled(false)?;
            println!("rescue disabled");
        }
        RescueAction::Delay { minutes } => {
            let settings = app.set_rescue_delay(minutes)?;
            println!("rescue delay set to {} min", settings.delay_minutes);
        }
        RescueAction::Status => {
            let settings = app.rescue_settings()?;
            let status = serde_json::json!({
                "enabled": settings.enabled,
                "delay_minutes": settings.delay_minutes,
                "away_since": app.tracker().away_since()?,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}

pub fn away() -> Result<(), Box<dyn std::error::Error>> {
    let mut app = context::open()?;
    if !app.rescue_settings()?.enabled {
        println!("rescue is disabled; nothing to track");
        return Ok(());
    }
    app.became_background()?;
    println!("away tracking started");
    Ok(())
}

/// Opening the app already settles the absence, so the foreground call here
/// normally finds nothing left to do.
pub fn back() -> Result<(), Box<dyn std::error::Error>> {
    let mut app = context::open()?;
    let outcome = app.became_foreground()?;
    context::report(&outcome);
    println!("welcome back");
    Ok(())
}
