//! Timer scheduler tests: firing, cancellation, non-overlap, containment.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use taskwatch::{TimerKind, TimerScheduler};

// =============================================================================
// One-Shot Timer Tests
// =============================================================================

#[tokio::test]
async fn timer_fires_once_after_delay() {
    let scheduler = TimerScheduler::new();
    let count = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&count);
    let handle = scheduler.timer("fire-once", Duration::from_millis(20), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });
    assert_eq!(handle.kind(), TimerKind::OneShot);
    assert_eq!(handle.name(), "fire-once");
    assert_eq!(scheduler.active_count(), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
    // Natural firing removes the record.
    assert_eq!(scheduler.active_count(), 0);
    assert!(!handle.is_active());
}

#[tokio::test]
async fn close_cancels_pending_timer() {
    let scheduler = TimerScheduler::new();
    let count = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&count);
    let handle = scheduler.timer("cancelled", Duration::from_millis(50), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });
    handle.close();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.active_count(), 0);
}

#[tokio::test]
async fn handle_close_is_idempotent() {
    let scheduler = TimerScheduler::new();
    let handle = scheduler.timer("noop", Duration::from_millis(10), || async { Ok(()) });

    handle.close();
    handle.close();
    assert!(!handle.is_active());

    // Closing after natural firing must also be a no-op.
    let fired = scheduler.timer("fired", Duration::from_millis(10), || async { Ok(()) });
    tokio::time::sleep(Duration::from_millis(60)).await;
    fired.close();
    fired.close();
}

#[tokio::test]
async fn timer_callback_error_is_contained() {
    let scheduler = TimerScheduler::new();
    let _handle = scheduler.timer("failing", Duration::from_millis(10), || async {
        Err("deliberate failure".into())
    });

    // The error is logged, not propagated; the process stays up.
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(scheduler.active_count(), 0);
}

#[tokio::test]
async fn timer_callback_panic_is_contained() {
    let scheduler = TimerScheduler::new();
    let _handle = scheduler.timer("panicking", Duration::from_millis(10), || async {
        panic!("deliberate panic")
    });

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(scheduler.active_count(), 0);

    // The scheduler still accepts and fires new timers afterwards.
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let _after = scheduler.timer("after-panic", Duration::from_millis(10), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Interval Tests
// =============================================================================

#[tokio::test]
async fn interval_fires_repeatedly_without_overlap() {
    let scheduler = TimerScheduler::new();
    let completions: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&completions);
    let handle = scheduler.interval("steady", Duration::from_millis(100), move || {
        let sink = Arc::clone(&sink);
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            sink.lock().push(Instant::now());
            Ok(())
        }
    });
    assert_eq!(handle.kind(), TimerKind::Interval);

    tokio::time::sleep(Duration::from_millis(1050)).await;
    handle.close();

    let times = completions.lock().clone();
    assert!(
        (7..=11).contains(&times.len()),
        "firings observed: {}",
        times.len()
    );
    // Each completion lands at least one full period after the previous one.
    for pair in times.windows(2) {
        let gap = pair[1].duration_since(pair[0]);
        assert!(gap >= Duration::from_millis(95), "gap: {gap:?}");
    }
}

#[tokio::test]
async fn interval_close_stops_rescheduling() {
    let scheduler = TimerScheduler::new();
    let count = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&count);
    let handle = scheduler.interval("short", Duration::from_millis(20), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    tokio::time::sleep(Duration::from_millis(90)).await;
    handle.close();
    handle.close();

    // Let any in-flight callback drain, then the count must not move.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let settled = count.load(Ordering::SeqCst);
    assert!(settled >= 2, "firings before close: {settled}");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count.load(Ordering::SeqCst), settled);
}

#[tokio::test]
async fn interval_survives_callback_failures() {
    let scheduler = TimerScheduler::new();
    let count = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&count);
    let handle = scheduler.interval("flaky", Duration::from_millis(20), move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt % 2 == 0 {
                Err("flaky attempt".into())
            } else {
                Ok(())
            }
        }
    });

    tokio::time::sleep(Duration::from_millis(120)).await;
    handle.close();
    assert!(count.load(Ordering::SeqCst) >= 3);
}

// =============================================================================
// Scheduler Close Tests
// =============================================================================

#[tokio::test]
async fn scheduler_close_cancels_everything() {
    let scheduler = TimerScheduler::new();
    let count = Arc::new(AtomicUsize::new(0));

    let one_shot_counter = Arc::clone(&count);
    scheduler.timer("pending", Duration::from_millis(200), move || {
        let counter = Arc::clone(&one_shot_counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });
    let interval_counter = Arc::clone(&count);
    scheduler.interval("repeating", Duration::from_millis(50), move || {
        let counter = Arc::clone(&interval_counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });
    assert_eq!(scheduler.active_count(), 2);

    scheduler.close();
    scheduler.close();
    assert_eq!(scheduler.active_count(), 0);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn independent_schedulers_coexist() {
    let first = TimerScheduler::new();
    let second = TimerScheduler::new();
    let count = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&count);
    second.timer("survivor", Duration::from_millis(30), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });
    first.timer("victim", Duration::from_millis(30), || async { Ok(()) });

    // Closing one scheduler must not touch the other's timers.
    first.close();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
    second.close();
}
