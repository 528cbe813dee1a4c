//! Engagement flow through the `App` against an on-disk database.

use std::rc::Rc;

use chrono::{Duration, Utc};
use tempfile::TempDir;
use unstuck_core::{
    App, Database, EngagementState, Fired, ManualClock, ManualScheduler, RecordingSink,
    Resolution, Signal, TaskStore,
};

fn open(dir: &TempDir, clock: &Rc<ManualClock>) -> App<ManualScheduler, RecordingSink> {
    let db = Database::open_at(&dir.path().join("unstuck.db")).unwrap();
    App::new(
        Rc::new(db),
        clock.clone(),
        ManualScheduler::with_clock(clock.clone()),
        RecordingSink::new(),
    )
    .with_seed(5)
}

#[test]
fn defer_two_tasks_swaps_them() {
    let dir = TempDir::new().unwrap();
    let clock = Rc::new(ManualClock::new(Utc::now()));
    let mut app = open(&dir, &clock);
    app.enqueue("A").unwrap();
    app.enqueue("B").unwrap();

    assert_eq!(app.reveal().unwrap().unwrap().text, "A");
    let Resolution::Deferred { position, next } = app.defer().unwrap() else {
        panic!("expected deferral");
    };
    assert_eq!(position, Some(1));
    assert_eq!(next.unwrap().text, "B");

    let order: Vec<_> = app
        .vault()
        .snapshot_all()
        .unwrap()
        .into_iter()
        .map(|t| t.text)
        .collect();
    assert_eq!(order, vec!["B", "A"]);
}

#[test]
fn full_cycle_survives_restart() {
    let dir = TempDir::new().unwrap();
    let clock = Rc::new(ManualClock::new(Utc::now()));
    {
        let mut app = open(&dir, &clock);
        app.enqueue("write report").unwrap();
        app.enqueue("call bank").unwrap();
        app.reveal().unwrap();
        app.start().unwrap();
        let resolution = app.complete().unwrap();
        assert_eq!(resolution, Resolution::Completed { completion_count: Some(1) });
    }

    let mut app = open(&dir, &clock);
    app.launch().unwrap();
    assert_eq!(app.vault().completion_count().unwrap(), 1);
    assert_eq!(app.summary().unwrap().completed_today.len(), 1);
    assert_eq!(app.reveal().unwrap().unwrap().text, "call bank");
}

#[test]
fn nudge_fires_once_and_not_after_start() {
    let dir = TempDir::new().unwrap();
    let clock = Rc::new(ManualClock::new(Utc::now()));
    let mut app = open(&dir, &clock).with_nudge_after(Duration::seconds(30));
    app.enqueue("A").unwrap();
    app.reveal().unwrap();

    clock.advance(Duration::seconds(30));
    assert_eq!(app.run_due_timers().unwrap(), vec![Fired::Nudge]);
    clock.advance(Duration::minutes(5));
    assert!(app.run_due_timers().unwrap().is_empty());

    // Interaction is swallowed while the prompt is up.
    assert!(!app.interact());
    assert!(app.dismiss_nudge());
    app.start().unwrap();
    clock.advance(Duration::minutes(5));
    assert!(app.run_due_timers().unwrap().is_empty());

    let nudges = app
        .sink()
        .signals()
        .iter()
        .filter(|s| matches!(s, Signal::NudgeFired { .. }))
        .count();
    assert_eq!(nudges, 1);
}

#[test]
fn reveal_while_engaged_is_refused() {
    let dir = TempDir::new().unwrap();
    let clock = Rc::new(ManualClock::new(Utc::now()));
    let mut app = open(&dir, &clock);
    app.enqueue("A").unwrap();
    app.reveal().unwrap();
    app.start().unwrap();
    assert!(app.reveal().is_err());
    assert!(matches!(app.state(), EngagementState::Engaged(_)));
}

#[test]
fn stale_complete_leaves_counter_alone() {
    let dir = TempDir::new().unwrap();
    let clock = Rc::new(ManualClock::new(Utc::now()));
    let mut app = open(&dir, &clock);
    let task = app.enqueue("A").unwrap();
    app.reveal().unwrap();

    // Another process finishes the same task first.
    let db = Database::open_at(&dir.path().join("unstuck.db")).unwrap();
    let mut other = TaskStore::new(Rc::new(db), clock.clone());
    assert_eq!(other.complete(&task.id).unwrap(), Some(1));

    assert_eq!(
        app.complete().unwrap(),
        Resolution::Completed { completion_count: None }
    );
    assert_eq!(app.vault().completion_count().unwrap(), 1);
    assert_eq!(app.state(), &EngagementState::Idle);
}

#[test]
fn empty_reveal_then_enqueue() {
    let dir = TempDir::new().unwrap();
    let clock = Rc::new(ManualClock::new(Utc::now()));
    let mut app = open(&dir, &clock);
    assert!(app.reveal().unwrap().is_none());
    assert_eq!(app.state(), &EngagementState::Empty);
    app.enqueue("A").unwrap();
    assert_eq!(app.reveal().unwrap().unwrap().text, "A");
}
