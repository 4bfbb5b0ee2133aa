//! Waits on three timed operations, the last of which is added after the wait
//! has started.
//!
//! Run with `RUST_LOG=futures_observable=debug` to see the wait restart.

use futures_observable::collections::ObservableVec;
use futures_observable::future::{Operation, Outcome};
use tokio::time::{sleep, Duration};
use tracing_subscriber::EnvFilter;

fn timed(name: &'static str, secs: u64) -> Operation<String> {
    let (op, drive) = Operation::wrap(async move {
        sleep(Duration::from_secs(secs)).await;
        println!("{name}");
        Ok(())
    });
    tokio::spawn(drive);
    op
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ops = ObservableVec::new();
    let t1 = timed("t1", 1);
    let t2 = timed("t2", 2);
    let t3 = timed("t3", 3);

    ops.push(t1);
    ops.push(t2);

    let wait = tokio::spawn(ops.wait_all());
    tokio::task::yield_now().await;

    ops.push(t3);

    match wait.await {
        Ok(Outcome::Completed) => println!("Completed"),
        Ok(Outcome::Faulted(errors)) => println!("Faulted: {errors}"),
        Ok(Outcome::Canceled) => println!("Canceled"),
        Err(err) => eprintln!("wait task failed: {err}"),
    }
}
