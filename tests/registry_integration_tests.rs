use std::time::Duration;

use chrono::Local;
use procbar::core::operation::OperationType;
use procbar::core::process::{Process, ProcessState};
use procbar::core::registry::{Registry, RegistryError, SendMode};
use procbar::core::viewport::{Viewport, renderable_count};
use tokio_test::{assert_err, assert_ok};

// ============================================================================
// Helper Functions
// ============================================================================

fn started() -> Registry {
    let mut registry = Registry::default();
    assert_ok!(registry.start_listening());
    registry
}

/// Stops the listener, which also waits for everything queued before it.
async fn drain(registry: &mut Registry) {
    assert_ok!(registry.stop_listening().await);
}

// ============================================================================
// Producer round trips
// ============================================================================

#[tokio::test]
async fn test_updates_then_terminal_state_round_trip() {
    let mut registry = started();
    let sender = registry.sender();

    let mut p = assert_ok!(
        sender
            .register_new("photos", OperationType::Copy, 5, SendMode::Wait)
            .await
    );
    for i in 0..5 {
        p.tick(format!("img-{i}.png"));
        assert_ok!(sender.send_update(&p, SendMode::Wait).await);
    }
    p.succeed();
    assert_ok!(sender.send_update(&p, SendMode::Wait).await);
    drain(&mut registry).await;

    let stored = registry.get(&p.id).expect("process should be tracked");
    assert_eq!(stored.done, stored.total);
    assert_eq!(stored.state, ProcessState::Successful);
    assert_eq!(stored.current_file, "img-4.png");
    assert_eq!(stored.done_time, p.done_time);
    assert!(!registry.has_running());
}

#[tokio::test]
async fn test_done_time_is_set_exactly_once() {
    let mut registry = started();
    let sender = registry.sender();

    let mut p = assert_ok!(
        sender
            .register_new("a.iso", OperationType::Delete, 1, SendMode::Wait)
            .await
    );
    p.cancel("user aborted");
    let first = p.done_time;
    assert_ok!(sender.send_update(&p, SendMode::Wait).await);

    // A later terminal update with a different timestamp keeps the first one
    p.state = ProcessState::Failed;
    p.done_time = Some(Local::now() + chrono::Duration::minutes(3));
    assert_ok!(sender.send_update(&p, SendMode::Wait).await);
    drain(&mut registry).await;

    let stored = registry.get(&p.id).unwrap();
    assert_eq!(stored.state, ProcessState::Failed);
    assert_eq!(stored.done_time, first);
}

#[tokio::test]
async fn test_concurrent_producers_all_land() {
    let mut registry = started();
    let mut handles = Vec::new();

    for n in 0..6 {
        let sender = registry.sender();
        handles.push(tokio::spawn(async move {
            let mut p = sender
                .register_new(format!("job-{n}"), OperationType::Compress, 20, SendMode::Wait)
                .await?;
            for i in 0..20 {
                p.tick(format!("file-{i}"));
                sender.send_update(&p, SendMode::Wait).await?;
            }
            p.succeed();
            sender.send_update(&p, SendMode::Wait).await?;
            Ok::<Process, RegistryError>(p)
        }));
    }

    let results = futures::future::join_all(handles).await;
    drain(&mut registry).await;

    assert_eq!(registry.len(), 6);
    for result in results {
        let p = assert_ok!(assert_ok!(result));
        let stored = registry.get(&p.id).unwrap();
        assert_eq!(stored.state, ProcessState::Successful);
        assert_eq!(stored.done, 20);
    }
}

// ============================================================================
// Listener-side errors
// ============================================================================

#[tokio::test]
async fn test_duplicate_id_leaves_existing_entry() {
    let mut registry = started();
    let sender = registry.sender();

    let original = Process::new("dup", "first", OperationType::Copy, 3);
    let imposter = Process::new("dup", "second", OperationType::Delete, 9);
    assert_ok!(sender.send_new(&original, SendMode::Wait).await);
    // Admission succeeds; the listener drops it
    assert_ok!(sender.send_new(&imposter, SendMode::Wait).await);
    drain(&mut registry).await;

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("dup"), Some(original));
}

#[tokio::test]
async fn test_update_unknown_id_mutates_nothing() {
    let mut registry = started();
    let sender = registry.sender();

    let ghost = Process::new("ghost", "nothing", OperationType::Cut, 1);
    assert_ok!(sender.send_update(&ghost, SendMode::Wait).await);
    drain(&mut registry).await;

    assert!(registry.is_empty());
    assert_eq!(registry.generation(), 0);
}

#[tokio::test]
async fn test_finished_process_cannot_restart() {
    let mut registry = started();
    let sender = registry.sender();

    let mut p = assert_ok!(
        sender
            .register_new("backup", OperationType::Copy, 2, SendMode::Wait)
            .await
    );
    p.succeed();
    assert_ok!(sender.send_update(&p, SendMode::Wait).await);
    p.state = ProcessState::InOperation;
    p.done = 0;
    assert_ok!(sender.send_update(&p, SendMode::Wait).await);
    drain(&mut registry).await;

    let stored = registry.get(&p.id).unwrap();
    assert_eq!(stored.state, ProcessState::Successful);
    assert_eq!(stored.done, 2);
}

#[tokio::test]
async fn test_process_arriving_finished_is_stamped_and_retained() {
    let mut registry = Registry::new(50, Some(1));
    assert_ok!(registry.start_listening());
    let sender = registry.sender();

    let mut old = Process::new("old", "old", OperationType::Copy, 1);
    old.succeed();
    old.done_time = Some(Local::now() - chrono::Duration::minutes(10));
    let fresh = Process {
        state: ProcessState::Successful,
        done: 1,
        ..Process::new("fresh", "fresh", OperationType::Copy, 1)
    };
    assert_ok!(sender.send_new(&old, SendMode::Wait).await);
    assert_ok!(sender.send_new(&fresh, SendMode::Wait).await);
    drain(&mut registry).await;

    assert!(registry.get("old").is_none(), "older finished entry should be evicted");
    let stored = registry.get("fresh").expect("newest finished entry should be kept");
    assert!(stored.done_time.is_some());
}

// ============================================================================
// Admission modes
// ============================================================================

#[tokio::test]
async fn test_try_send_reports_full_channel() {
    let mut registry = Registry::new(2, None);
    let sender = registry.sender();

    assert_ok!(
        sender
            .register_new("a", OperationType::Copy, 1, SendMode::Try)
            .await
    );
    assert_ok!(
        sender
            .register_new("b", OperationType::Copy, 1, SendMode::Try)
            .await
    );
    let err = assert_err!(
        sender
            .register_new("c", OperationType::Copy, 1, SendMode::Try)
            .await
    );
    assert!(matches!(err, RegistryError::ChannelFull));

    // Dropped tick does not panic or block
    sender.try_send_update(&Process::new("x", "x", OperationType::Copy, 1));

    assert_ok!(registry.start_listening());
    drain(&mut registry).await;
    assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn test_wait_send_blocks_until_space() {
    let mut registry = Registry::new(1, None);
    let sender = registry.sender();

    assert_ok!(
        sender
            .register_new("first", OperationType::Copy, 1, SendMode::Wait)
            .await
    );
    let waiting = tokio::spawn({
        let sender = sender.clone();
        async move {
            sender
                .register_new("second", OperationType::Copy, 1, SendMode::Wait)
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiting.is_finished(), "send should wait for channel space");

    assert_ok!(registry.start_listening());
    assert_ok!(assert_ok!(waiting.await));
    drain(&mut registry).await;
    assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn test_send_after_stop_reports_closed_channel() {
    let mut registry = started();
    let sender = registry.sender();
    drain(&mut registry).await;
    assert!(!registry.is_listening());

    let err = assert_err!(
        sender
            .register_new("late", OperationType::Copy, 1, SendMode::Wait)
            .await
    );
    assert!(matches!(err, RegistryError::ChannelClosed));
}

// ============================================================================
// Renderer queries
// ============================================================================

#[tokio::test]
async fn test_snapshot_and_view_order() {
    let mut registry = started();
    let sender = registry.sender();

    let mut a = Process::new("a", "a", OperationType::Copy, 10);
    a.done = 2;
    let mut b = Process::new("b", "b", OperationType::Copy, 10);
    b.done = 8;
    let mut c = Process::new("c", "c", OperationType::Copy, 1);
    c.succeed();
    let mut d = Process::new("d", "d", OperationType::Copy, 1);
    d.succeed();
    d.done_time = c.done_time.map(|t| t + chrono::Duration::seconds(1));

    for p in [&c, &a, &d, &b] {
        assert_ok!(sender.send_new(p, SendMode::Wait).await);
    }
    drain(&mut registry).await;

    let ids: Vec<String> = registry.snapshot().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, ["a", "b", "d", "c"]);

    // 5 rows of panel height fit two processes
    let visible = renderable_count(5);
    let mut viewport = Viewport::default();
    viewport.list_up(registry.len(), visible);
    let view = assert_ok!(registry.view(&viewport, visible));
    let ids: Vec<&str> = view.items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["d", "c"]);
    assert_eq!(view.cursor, 3);
    assert!(view.is_selected(1));
}

#[tokio::test]
async fn test_generation_tracks_applied_messages() {
    let mut registry = started();
    let sender = registry.sender();
    let mut p = assert_ok!(
        sender
            .register_new("x", OperationType::Extract, 2, SendMode::Wait)
            .await
    );
    p.tick("one");
    assert_ok!(sender.send_update(&p, SendMode::Wait).await);
    drain(&mut registry).await;

    assert_eq!(registry.generation(), 2);
}
