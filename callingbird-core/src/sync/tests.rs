use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::sync::coalescer::{SyncCoalescer, SyncExecutor, SyncOutcome, SyncResult};
use crate::sync::SyncError;

/// Test executor that counts downstream calls and can simulate slow or
/// failing syncs.
struct TestExecutor {
    calls: AtomicUsize,
    delay: Duration,
    fail: bool,
}

impl TestExecutor {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            fail: false,
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            fail: true,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SyncExecutor for TestExecutor {
    async fn execute(&self, company_id: i64) -> SyncResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            Err(SyncError::new(vec!["downstream boom".to_string()], 502))
        } else {
            Ok(SyncOutcome::Synced {
                assistant_id: format!("asst-{company_id}"),
            })
        }
    }
}

const WINDOW: Duration = Duration::from_millis(800);

/// N requests within the quiescence window resolve to the same result and
/// only one downstream call is observed.
#[tokio::test(start_paused = true)]
async fn test_burst_coalesces_to_single_downstream_call() {
    let executor = Arc::new(TestExecutor::new());
    let coalescer = SyncCoalescer::with_window(executor.clone(), WINDOW);

    let (a, b, c) = tokio::join!(
        coalescer.request_sync(7),
        coalescer.request_sync(7),
        coalescer.request_sync(7),
    );

    let expected = SyncOutcome::Synced {
        assistant_id: "asst-7".to_string(),
    };
    assert_eq!(a.expect("sync should succeed"), expected);
    assert_eq!(b.expect("sync should succeed"), expected);
    assert_eq!(c.expect("sync should succeed"), expected);
    assert_eq!(executor.call_count(), 1);
}

/// A request issued after the previous cycle fully settled triggers a new
/// independent cycle.
#[tokio::test(start_paused = true)]
async fn test_new_cycle_after_settle() {
    let executor = Arc::new(TestExecutor::new());
    let coalescer = SyncCoalescer::with_window(executor.clone(), WINDOW);

    coalescer.request_sync(7).await.expect("first cycle");
    coalescer.request_sync(7).await.expect("second cycle");

    assert_eq!(executor.call_count(), 2);
}

/// A request arriving after the timer fired but before the downstream call
/// finished still attaches to the in-flight result.
#[tokio::test(start_paused = true)]
async fn test_request_during_in_flight_attaches() {
    let executor = Arc::new(TestExecutor::slow(Duration::from_millis(500)));
    let coalescer = SyncCoalescer::with_window(executor.clone(), WINDOW);

    let early = {
        let coalescer = coalescer.clone();
        tokio::spawn(async move { coalescer.request_sync(7).await })
    };

    // Past the window, into the executor's delay: the cycle is in flight.
    tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;
    let late = coalescer.request_sync(7).await;

    let early = early.await.expect("task");
    assert_eq!(early.expect("sync"), late.expect("sync"));
    assert_eq!(executor.call_count(), 1);
}

/// Errors are delivered to every waiter of the coalesced cycle.
#[tokio::test(start_paused = true)]
async fn test_error_propagates_to_all_waiters() {
    let executor = Arc::new(TestExecutor::failing());
    let coalescer = SyncCoalescer::with_window(executor.clone(), WINDOW);

    let (a, b) = tokio::join!(coalescer.request_sync(7), coalescer.request_sync(7));

    let a = a.expect_err("sync should fail");
    let b = b.expect_err("sync should fail");
    assert_eq!(a.status_code(), 502);
    assert_eq!(b.status_code(), 502);
    assert_eq!(a.messages(), &["downstream boom".to_string()]);
    assert_eq!(executor.call_count(), 1);
}

/// Different tenants never coalesce with each other.
#[tokio::test(start_paused = true)]
async fn test_tenants_are_independent() {
    let executor = Arc::new(TestExecutor::new());
    let coalescer = SyncCoalescer::with_window(executor.clone(), WINDOW);

    let (a, b) = tokio::join!(coalescer.request_sync(1), coalescer.request_sync(2));

    assert_eq!(
        a.expect("sync"),
        SyncOutcome::Synced {
            assistant_id: "asst-1".to_string()
        }
    );
    assert_eq!(
        b.expect("sync"),
        SyncOutcome::Synced {
            assistant_id: "asst-2".to_string()
        }
    );
    assert_eq!(executor.call_count(), 2);
}

/// A failed cycle releases the pending entry so the next request starts
/// fresh.
#[tokio::test(start_paused = true)]
async fn test_cycle_resets_after_error() {
    let executor = Arc::new(TestExecutor::failing());
    let coalescer = SyncCoalescer::with_window(executor.clone(), WINDOW);

    coalescer.request_sync(7).await.expect_err("first fails");
    coalescer.request_sync(7).await.expect_err("second fails");

    assert_eq!(executor.call_count(), 2);
}
