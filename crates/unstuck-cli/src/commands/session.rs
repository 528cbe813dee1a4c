//! Interactive session: one long-lived `App` with live timers.
//!
//! Lines typed on stdin drive the engagement machine, due timers arrive on
//! the scheduler's channel, and a periodic poll catches absences the timer
//! missed. All three are handled one at a time on a single-threaded runtime.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use unstuck_core::{App, Config, CoreError, RescueOutcome, TokioScheduler};

use crate::commands::task::choose_text;
use crate::context;
use crate::terminal::{task_line, ConsoleSink};

type SessionApp = App<TokioScheduler, ConsoleSink>;

const POLL_EVERY: Duration = Duration::from_secs(30);

const HELP: &str = "\
commands:
  add <text>   queue a task as typed
  add! <text>  queue it with typos fixed
  reveal       show the next task
  start        commit to the shown task
  stop         step back from the task without finishing
  done         complete the shown task
  later        push the shown task back
  dismiss      hide the nudge
  leave        close the task view
  list         show the queue
  summary      today's progress
  away | back  simulate leaving and returning
  quit";

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session())
}

async fn session() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (scheduler, mut timers) = TokioScheduler::new();
    let mut app = context::build(&config, scheduler, ConsoleSink)?;
    app.launch()?;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut poll = tokio::time::interval(POLL_EVERY);

    loop {
        let step = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => handle(&mut app, line.trim()),
                None => Ok(false),
            },
            Some(id) = timers.recv() => app.on_timer_fired(id).map(|_| true),
            _ = poll.tick() => app.poll().map(|_| true),
        };
        match step {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

/// Returns `Ok(false)` when the session should end.
fn handle(app: &mut SessionApp, line: &str) -> Result<bool, CoreError> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    if command != "dismiss" {
        app.interact();
    }

    match command {
        "" => {}
        "add" | "add!" => {
            let (text, tip) = choose_text(rest, command == "add!");
            if let Some(cleaned) = tip {
                println!("tip: did you mean \"{cleaned}\"? (use add!)");
            }
            let task = app.enqueue(&text)?;
            println!("queued: {}", task.text);
        }
        "reveal" | "r" => {
            app.reveal()?;
        }
        "start" | "s" => {
            app.start()?;
        }
        "stop" => {
            app.release()?;
        }
        "done" | "d" => {
            app.complete()?;
        }
        "later" | "l" => {
            app.defer()?;
        }
        "dismiss" => {
            app.dismiss_nudge();
        }
        "leave" => app.leave(),
        "list" => {
            for (i, task) in app.vault().snapshot_all()?.iter().enumerate() {
                println!("{}", task_line(i, task));
            }
        }
        "summary" => {
            let summary = app.summary()?;
            println!(
                "{} done today, {} remaining, {} total",
                summary.completed_today.len(),
                summary.remaining.len(),
                summary.total_completed
            );
        }
        "away" => {
            app.became_background()?;
            println!("(away)");
        }
        "back" => {
            if let RescueOutcome::NoRescue(_) = app.became_foreground()? {
                println!("welcome back");
            }
        }
        "help" | "?" => println!("{HELP}"),
        "quit" | "exit" | "q" => return Ok(false),
        other => println!("unknown command: {other} (try `help`)"),
    }
    Ok(true)
}
