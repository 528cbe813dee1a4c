use unstuck_core::vault::interpreter;
use unstuck_core::Resolution;

use crate::context;
use crate::terminal::task_line;

/// Text to queue and, when it was left as typed, the cleanup on offer.
pub fn choose_text(text: &str, clean: bool) -> (String, Option<String>) {
    match interpreter::suggest(text) {
        Some(cleaned) if clean => (cleaned, None),
        suggestion => (text.to_string(), suggestion),
    }
}

pub fn add(text: &str, clean: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = context::open()?;
    let (text, tip) = choose_text(text, clean);
    if let Some(cleaned) = tip {
        eprintln!("tip: did you mean \"{cleaned}\"? (use --clean)");
    }
    let task = app.enqueue(&text)?;
    println!("Task queued: {}", task.text);
    println!("ID: {}", task.id);
    Ok(())
}

pub fn list(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let app = context::open()?;
    let tasks = app.vault().snapshot_all()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else if tasks.is_empty() {
        println!("The vault is empty.");
    } else {
        for (i, task) in tasks.iter().enumerate() {
            println!("{}", task_line(i, task));
        }
    }
    Ok(())
}

pub fn reveal() -> Result<(), Box<dyn std::error::Error>> {
    let mut app = context::open()?;
    match app.reveal()? {
        Some(task) => {
            println!("{}", task.text);
            println!("ID: {}", task.id);
        }
        None => println!("The vault is empty."),
    }
    Ok(())
}

pub fn done() -> Result<(), Box<dyn std::error::Error>> {
    let mut app = context::open()?;
    let Some(task) = app.reveal()? else {
        println!("The vault is empty.");
        return Ok(());
    };
    match app.complete()? {
        Resolution::Completed {
            completion_count: Some(count),
        } => println!("Done: {} ({count} completed)", task.text),
        _ => println!("Already done: {}", task.text),
    }
    Ok(())
}

pub fn later() -> Result<(), Box<dyn std::error::Error>> {
    let mut app = context::open()?;
    let Some(task) = app.reveal()? else {
        println!("The vault is empty.");
        return Ok(());
    };
    if let Resolution::Deferred { next, .. } = app.defer()? {
        println!("Deferred: {}", task.text);
        if let Some(next) = next {
            println!("Next up: {}", next.text);
        }
    }
    Ok(())
}

pub fn delete(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = context::open()?;
    if app.delete(id)? {
        println!("Task deleted: {id}");
        Ok(())
    } else {
        Err(format!("no pending task with id {id}").into())
    }
}
