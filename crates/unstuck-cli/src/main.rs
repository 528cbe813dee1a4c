use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;
use unstuck_core::Config;

mod commands;
mod context;
mod terminal;

#[derive(Parser)]
#[command(name = "unstuck", version, about = "One task at a time. Defer without guilt.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop a task into the vault
    Add {
        /// What needs doing
        text: String,
        /// Submit the cleaned-up text (typos fixed, capitalised)
        #[arg(long)]
        clean: bool,
    },
    /// List pending tasks in queue order
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show the next task
    Reveal,
    /// Complete the next task
    Done,
    /// Push the next task back and show the one after it
    Later,
    /// Remove a task without completing it
    Delete {
        /// Task ID
        id: String,
    },
    /// What got done today and what is left
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Mark the start of an absence (app went to the background)
    Away,
    /// Mark the end of an absence
    Back,
    /// Distraction rescue settings
    Rescue {
        #[command(subcommand)]
        action: commands::rescue::RescueAction,
    },
    /// Per-app daily time limits
    Limits {
        #[command(subcommand)]
        action: commands::limits::LimitsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Interactive session with live nudge and rescue timers
    Session,
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("UNSTUCK_LOG").unwrap_or_else(|_| {
        let config = Config::load_or_default();
        EnvFilter::new(config.logging.filter)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Add { text, clean } => commands::task::add(&text, clean),
        Commands::List { json } => commands::task::list(json),
        Commands::Reveal => commands::task::reveal(),
        Commands::Done => commands::task::done(),
        Commands::Later => commands::task::later(),
        Commands::Delete { id } => commands::task::delete(&id),
        Commands::Summary { json } => commands::summary::run(json),
        Commands::Away => commands::rescue::away(),
        Commands::Back => commands::rescue::back(),
        Commands::Rescue { action } => commands::rescue::run(action),
        Commands::Limits { action } => commands::limits::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Session => commands::session::run(),
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
