use crate::context;
use crate::terminal::task_line;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let app = context::open()?;
    let summary = app.summary()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Today");
    if summary.nothing_done_yet() {
        println!("  Nothing completed yet today. You've got this!");
    } else {
        for record in &summary.completed_today {
            println!("  ✓ {}", record.text);
        }
    }

    println!("Remaining");
    if summary.all_caught_up() {
        println!("  No tasks in the vault. You're all caught up!");
    } else {
        for (i, task) in summary.remaining.iter().enumerate() {
            println!("{}", task_line(i, task));
        }
    }
    println!("Total completed: {}", summary.total_completed);
    Ok(())
}
