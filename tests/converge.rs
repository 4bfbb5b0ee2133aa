//! Converging waits over collections mutated while the wait is outstanding.
//!
//! Operations are driven by spawned tasks sleeping on a paused clock, so the
//! timings below are deterministic.

use futures_observable::collections::ObservableVec;
use futures_observable::future::{when_all, when_any, Operation, Outcome};
use futures_observable::prelude::*;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration, Instant};

type Op = Operation<&'static str>;

/// An operation that settles with `res` after `ms` milliseconds.
fn timed(ms: u64, res: Result<(), &'static str>) -> (Op, JoinHandle<()>) {
    let (op, drive) = Operation::wrap(async move {
        sleep(Duration::from_millis(ms)).await;
        res
    });
    (op, tokio::spawn(drive))
}

fn ok(ms: u64) -> Op {
    timed(ms, Ok(())).0
}

/// Let spawned tasks run up to their first suspension point.
async fn settle_tasks() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn wait_all_follows_append() {
    let start = Instant::now();
    let ops = ObservableVec::from(vec![ok(100), ok(200)]);
    let wait = tokio::spawn(ops.wait_all());
    settle_tasks().await;

    let c = ok(300);
    ops.push(c.clone());

    let outcome = wait.await.unwrap();
    assert_eq!(outcome, Outcome::Completed);
    assert!(start.elapsed() >= Duration::from_millis(300));
    assert!(c.is_completed());
    assert_eq!(outcome, when_all(ops.snapshot()).await);
    assert_eq!(ops.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn wait_all_reports_appended_fault() {
    let ops = ObservableVec::from(vec![ok(100)]);
    let wait = tokio::spawn(ops.wait_all());
    settle_tasks().await;

    ops.push(timed(50, Err("late")).0);

    let outcome = wait.await.unwrap();
    assert_eq!(outcome.err().map(|errors| errors.into_inner()), Some(vec!["late"]));
    assert_eq!(ops.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn wait_all_ignores_removed_member() {
    let start = Instant::now();
    let (_never, stuck) = Operation::channel();
    let failing = Operation::faulted("removed");
    let ops = ObservableVec::from(vec![failing.clone(), ok(100), stuck.clone()]);
    let wait = tokio::spawn(ops.wait_all());
    settle_tasks().await;

    sleep(Duration::from_millis(10)).await;
    assert!(ops.remove_item(&stuck));
    assert!(ops.remove_item(&failing));

    assert_eq!(wait.await.unwrap(), Outcome::Completed);
    assert!(start.elapsed() >= Duration::from_millis(100));
    assert!(start.elapsed() < Duration::from_millis(200));
    assert_eq!(ops.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn wait_all_reports_cancellation() {
    let ops = ObservableVec::from(vec![ok(100)]);
    let wait = tokio::spawn(ops.wait_all());
    settle_tasks().await;

    let (slow, handle) = timed(200, Ok(()));
    ops.push(slow.clone());
    handle.abort();

    assert_eq!(wait.await.unwrap(), Outcome::Canceled);
    assert!(slow.is_canceled());
    assert_eq!(ops.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn wait_any_settles_on_first() {
    let start = Instant::now();
    let a = ok(300);
    let ops = ObservableVec::from(vec![a.clone(), ok(200), ok(100)]);

    let outcome = ops.wait_any().await;
    assert_eq!(outcome, Outcome::Completed);
    assert!(start.elapsed() < Duration::from_millis(200));
    assert!(!a.is_terminal());
    assert_eq!(outcome, when_any(ops.snapshot()).await);
}

#[tokio::test(start_paused = true)]
async fn wait_any_ignores_removed_member() {
    let start = Instant::now();
    let fastest = ok(100);
    let ops = ObservableVec::from(vec![ok(300), ok(200), fastest.clone()]);
    let wait = tokio::spawn(ops.wait_any());
    settle_tasks().await;

    assert!(ops.remove_item(&fastest));

    assert_eq!(wait.await.unwrap(), Outcome::Completed);
    assert!(start.elapsed() >= Duration::from_millis(200));
    assert!(start.elapsed() < Duration::from_millis(300));
    assert_eq!(ops.len(), 2);
    assert_eq!(ops.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn wait_any_short_circuits_across_restart() {
    let start = Instant::now();
    let a = ok(300);
    let ops = ObservableVec::from(vec![a.clone()]);
    let wait = tokio::spawn(ops.wait_any());
    settle_tasks().await;

    sleep(Duration::from_millis(50)).await;
    ops.push(ok(100));

    assert_eq!(wait.await.unwrap(), Outcome::Completed);
    assert!(start.elapsed() >= Duration::from_millis(150));
    assert!(start.elapsed() < Duration::from_millis(300));
    assert!(!a.is_terminal());
}

#[tokio::test(start_paused = true)]
async fn wait_any_mirrors_fault() {
    let ops = ObservableVec::from(vec![ok(200), timed(100, Err("first")).0]);
    assert_eq!(ops.wait_any().await, Outcome::Faulted("first"));
    assert_eq!(ops.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn wait_any_mirrors_cancellation() {
    let (slow, handle) = timed(300, Ok(()));
    let ops = ObservableVec::from(vec![ok(200), slow]);
    let wait = tokio::spawn(ops.wait_any());
    settle_tasks().await;

    sleep(Duration::from_millis(50)).await;
    handle.abort();

    assert_eq!(wait.await.unwrap(), Outcome::Canceled);
}

#[tokio::test(start_paused = true)]
async fn wait_any_on_empty_waits_for_member() {
    let ops = ObservableVec::<Op>::new();
    let wait = tokio::spawn(ops.wait_any());
    settle_tasks().await;

    sleep(Duration::from_millis(500)).await;
    assert!(!wait.is_finished());

    ops.push(ok(10));
    assert_eq!(wait.await.unwrap(), Outcome::Completed);
}

#[tokio::test(start_paused = true)]
async fn external_cancellation_releases_subscription() {
    let ops = ObservableVec::from(vec![ok(1_000)]);
    let outcome = ops
        .wait_all()
        .cancel_on(sleep(Duration::from_millis(10)))
        .await;
    assert_eq!(outcome, None);
    assert_eq!(ops.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn dropped_wait_releases_subscription() {
    let ops = ObservableVec::from(vec![ok(1_000)]);
    let wait = tokio::spawn(ops.wait_all());
    settle_tasks().await;
    assert_eq!(ops.subscriber_count(), 1);

    wait.abort();
    assert!(wait.await.unwrap_err().is_cancelled());
    assert_eq!(ops.subscriber_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_mutators() {
    let ops = ObservableVec::<Op>::new();
    ops.push(Operation::completed());
    let wait = tokio::spawn(ops.wait_all());

    let mutators: Vec<_> = (0..4)
        .map(|n| {
            let ops = ops.clone();
            tokio::spawn(async move {
                for i in 0..8 {
                    ops.push(ok(5 + (n * 8 + i) % 7));
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();
    for mutator in mutators {
        mutator.await.unwrap();
    }

    assert_eq!(wait.await.unwrap(), Outcome::Completed);
    assert_eq!(ops.len(), 33);
    assert_eq!(ops.wait_all().await, Outcome::Completed);
    assert_eq!(ops.subscriber_count(), 0);
}
