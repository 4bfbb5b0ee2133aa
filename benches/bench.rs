use criterion::{black_box, criterion_group, criterion_main, Criterion};
use futures::task::noop_waker_ref;
use futures_observable::collections::ObservableVec;
use futures_observable::future::{when_all, Completer, Operation, Outcome};

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("when_all 10", |b| b.iter(|| when_all_test(black_box(10))));
    c.bench_function("when_all 100", |b| b.iter(|| when_all_test(black_box(100))));
    c.bench_function("when_all 1000", |b| b.iter(|| when_all_test(black_box(1000))));
    c.bench_function("wait_all 10 appends", |b| {
        b.iter(|| wait_all_test(black_box(100), black_box(10)))
    });
    c.bench_function("wait_all 100 appends", |b| {
        b.iter(|| wait_all_test(black_box(100), black_box(100)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

fn poll<F: Future + Unpin>(fut: &mut F) -> Poll<F::Output> {
    let mut cx = Context::from_waker(noop_waker_ref());
    Pin::new(fut).poll(&mut cx)
}

fn pending_ops(len: usize) -> (Vec<Completer<()>>, Vec<Operation<()>>) {
    (0..len).map(|_| Operation::channel()).unzip()
}

/// Settle `len` operations in reverse order, one poll per settlement.
fn when_all_test(len: usize) {
    let (completers, ops) = pending_ops(len);
    let mut wait = Box::pin(when_all(ops));
    assert!(poll(&mut wait).is_pending());

    let mut completers = completers.into_iter().rev().peekable();
    while let Some(completer) = completers.next() {
        completer.complete();
        if completers.peek().is_some() {
            assert!(poll(&mut wait).is_pending());
        }
    }
    assert_eq!(poll_ready(&mut wait), Outcome::Completed);
}

/// Append `appends` operations to a collection of `len` while waiting on it.
fn wait_all_test(len: usize, appends: usize) {
    let (mut completers, ops) = pending_ops(len);
    let ops = ObservableVec::from(ops);
    let mut wait = Box::pin(ops.wait_all());
    assert!(poll(&mut wait).is_pending());

    for _ in 0..appends {
        let (completer, op) = Operation::channel();
        ops.push(op);
        completers.push(completer);
        assert!(poll(&mut wait).is_pending());
    }

    for completer in completers {
        completer.complete();
    }
    assert_eq!(poll_ready(&mut wait), Outcome::Completed);
    assert_eq!(wait.restarts(), appends);
}

fn poll_ready<F: Future + Unpin>(fut: &mut F) -> F::Output {
    match poll(fut) {
        Poll::Ready(output) => output,
        Poll::Pending => panic!("future should have settled"),
    }
}
