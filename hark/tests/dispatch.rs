//! Signature-checked emission.

use hark::{
    Emitter, Listener, ParamType, Rest, Signature, args,
    spawn::Job,
    testing::{CallCounter, Latch, Recorder, panic_message},
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::{summing_listener, variadic_sum};

#[test]
fn test_emit_sync_runs_all_before_returning() {
    let emitter = Emitter::new();
    let total = Arc::new(AtomicUsize::new(0));
    emitter.on("multi", summing_listener(total.clone())).unwrap();
    emitter.on("multi", summing_listener(total.clone())).unwrap();

    emitter.emit_sync("multi", args![1, "x".to_string()]).unwrap();
    assert_eq!(total.load(Ordering::SeqCst), 2);
}

#[test]
fn test_emit_async_runs_each_listener_once() {
    let emitter = Emitter::new();
    let latch = Latch::new(2);
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let latch = latch.clone();
        let calls = calls.clone();
        emitter
            .on(
                "multi",
                Listener::new(move |n: i32, s: &'static str| {
                    assert_eq!((n, s), (1, "x"));
                    calls.fetch_add(1, Ordering::SeqCst);
                    latch.count_down();
                }),
            )
            .unwrap();
    }

    emitter.emit_async("multi", args![1, "x"]).unwrap();
    latch.wait();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_emit_async_does_not_wait() {
    let release = Latch::new(1);
    let done = Latch::new(1);
    let emitter = Emitter::new();
    {
        let release = release.clone();
        let done = done.clone();
        emitter
            .on(
                "slow",
                Listener::new(move || {
                    release.wait();
                    done.count_down();
                }),
            )
            .unwrap();
    }

    // Would deadlock if emit waited for the listener.
    emitter.emit("slow", args![]).unwrap();
    assert_eq!(done.remaining(), 1);
    release.count_down();
    done.wait();
}

#[test]
fn test_type_mismatch_panics() {
    let emitter = Emitter::new();
    emitter.on("typed", Listener::new(|_n: i32, _s: String| {})).unwrap();

    let message = panic_message(|| emitter.emit_sync("typed", args![10, 20]));
    assert_eq!(
        message.as_deref(),
        Some("Wrong argument type. Event typed expected argument 2 to be String, got i32.")
    );
}

#[test]
fn test_arity_mismatch_panics() {
    let emitter = Emitter::new();
    emitter.on("pair", Listener::new(|_a: i32, _b: i32| {})).unwrap();

    assert_eq!(
        panic_message(|| emitter.emit_sync("pair", args![])).as_deref(),
        Some("Wrong number of arguments. Event pair expected 2 arguments, got 0.")
    );
    assert_eq!(
        panic_message(|| emitter.emit("pair", args![1, 2, 3])).as_deref(),
        Some("Wrong number of arguments. Event pair expected 2 arguments, got 3.")
    );
}

#[test]
fn test_variadic() {
    let emitter = Emitter::new();
    let sums = Arc::new(Mutex::new(Vec::new()));
    emitter.on("sum", variadic_sum(sums.clone())).unwrap();

    assert_eq!(
        panic_message(|| emitter.emit_sync("sum", args![])).as_deref(),
        Some("Not enough arguments. Event sum expected at least 1 arguments, got 0.")
    );
    emitter.emit_sync("sum", args![10]).unwrap();
    emitter.emit_sync("sum", args![10, 20, 30]).unwrap();
    assert_eq!(
        panic_message(|| emitter.emit_sync("sum", args![10, "x"])).as_deref(),
        Some("Wrong argument type. Event sum expected argument 2 to be i32, got &str.")
    );
    assert_eq!(
        panic_message(|| emitter.emit_sync("sum", args![10, 20, 30, 40, 50, false, 60]))
            .as_deref(),
        Some("Wrong argument type. Event sum expected argument 2 to be i32, got bool.")
    );

    assert_eq!(*sums.lock().unwrap(), vec![10, 60]);
}

#[test]
fn test_variadic_any_and_typed_prefix() {
    let emitter = Emitter::new();
    let counter = CallCounter::new();
    emitter.on("anything", counter.variadic()).unwrap();
    emitter
        .on("anything", Listener::variadic(|_a: i32, _b: hark::Arg, _rest: Rest<bool>| {}))
        .unwrap();

    emitter.emit_sync("anything", args![1, "two"]).unwrap();
    emitter.emit_sync("anything", args![1, 2.0, true, false]).unwrap();
    assert_eq!(
        panic_message(|| emitter.emit_sync("anything", args![1, 2, true, 3])).as_deref(),
        Some("Wrong argument type. Event anything expected argument 3 to be bool, got i32.")
    );
    assert_eq!(counter.count(), 3);
}

#[test]
fn test_first_mismatch_aborts_emission() {
    let emitter = Emitter::new();
    let before = CallCounter::new();
    let after = CallCounter::new();
    emitter.on("abort", before.variadic()).unwrap();
    emitter.on("abort", Listener::new(|_flag: bool| {})).unwrap();
    emitter.on("abort", after.variadic()).unwrap();

    assert!(panic_message(|| emitter.emit_sync("abort", args![1])).is_some());
    assert_eq!(before.count(), 1);
    assert_eq!(after.count(), 0);

    // Asynchronous emission validates every listener before the failing
    // one is scheduled, and never schedules the rest.
    let scheduled = Arc::new(AtomicUsize::new(0));
    let seen = scheduled.clone();
    let emitter_async = Emitter::builder()
        .spawner(move |job: Job| {
            seen.fetch_add(1, Ordering::SeqCst);
            job();
        })
        .build();
    for listener in emitter.listeners("abort").unwrap() {
        emitter_async.on("abort", listener).unwrap();
    }
    assert!(panic_message(|| emitter_async.emit("abort", args![1])).is_some());
    assert_eq!(scheduled.load(Ordering::SeqCst), 1);
}

#[test]
fn test_raw_listener_with_descriptor() {
    let emitter = Emitter::new();
    let recorder = Recorder::new();
    let signature = Signature::variadic([ParamType::of::<String>()], ParamType::Any);
    emitter.on("raw", recorder.listener(signature)).unwrap();

    emitter.emit_sync("raw", args!["cmd".to_string(), 1, true]).unwrap();
    emitter.emit_sync("raw", args!["cmd".to_string()]).unwrap();
    assert_eq!(
        panic_message(|| emitter.emit_sync("raw", args!["cmd"])).as_deref(),
        Some("Wrong argument type. Event raw expected argument 1 to be String, got &str.")
    );

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].len(), 3);
    assert_eq!(calls[0][2].get::<bool>(), Some(true));
    assert!(calls[1].len() == 1);
}

#[test]
fn test_reentrant_emission() {
    let emitter = Arc::new(Emitter::new());
    let counter = CallCounter::new();
    emitter.on("inner", counter.listener()).unwrap();

    let inner = Arc::clone(&emitter);
    let outer = Listener::new(move |depth: u8| {
        inner.emit_sync("inner", args![]).unwrap();
        if depth > 0 {
            inner.emit_sync("outer", args![depth - 1]).unwrap();
        }
    });
    emitter.on("outer", &outer).unwrap();

    emitter.emit_sync("outer", args![3_u8]).unwrap();
    assert_eq!(counter.count(), 4);

    emitter.clear_all();
}

#[test]
fn test_removal_during_emission_does_not_cancel() {
    let emitter = Arc::new(Emitter::new());
    let counter = CallCounter::new();
    let victim = counter.listener();

    let inner = Arc::clone(&emitter);
    let remover = {
        let victim = victim.clone();
        Listener::new(move || {
            let _ = inner.off("event", &victim);
        })
    };
    emitter.on("event", &remover).unwrap();
    emitter.on("event", &victim).unwrap();

    emitter.emit_sync("event", args![]).unwrap();
    assert_eq!(counter.count(), 1);
    assert_eq!(emitter.listener_count("event"), Ok(1));

    emitter.clear_all();
}
