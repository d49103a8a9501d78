#![allow(non_snake_case)]

use super::*;
use std::time::Duration;

// RuntimeConfig tests

#[test]
fn RuntimeConfig___default___uses_jrtest_thread_name() {
    let config = RuntimeConfig::default();

    assert_eq!(config.thread_name, "jrtest-worker");
    assert!(config.worker_threads.is_none());
    assert_eq!(config.max_blocking_threads, 512);
}

#[test]
fn RuntimeConfig___from_service_config___copies_worker_threads() {
    let service_config = ServiceConfig {
        worker_threads: Some(3),
        ..ServiceConfig::default()
    };

    let config = RuntimeConfig::from_service_config(&service_config);

    assert_eq!(config.worker_threads, Some(3));
}

#[test]
fn RuntimeConfig___builders___set_fields() {
    let config = RuntimeConfig::new()
        .with_worker_threads(2)
        .with_thread_name("audit");

    assert_eq!(config.worker_threads, Some(2));
    assert_eq!(config.thread_name, "audit");
}

// AsyncRuntime tests

#[test]
fn AsyncRuntime___block_on___runs_future() {
    let runtime = AsyncRuntime::new(RuntimeConfig::new().with_worker_threads(1)).unwrap();

    let result = runtime.block_on(async { 1 + 1 });

    assert_eq!(result, 2);
}

#[test]
fn AsyncRuntime___spawn___runs_task() {
    let runtime = AsyncRuntime::with_defaults().unwrap();

    let handle = runtime.spawn(async { "done" });
    let result = runtime.block_on(handle).unwrap();

    assert_eq!(result, "done");
}

#[test]
fn AsyncRuntime___spawn_blocking___runs_closure() {
    let runtime = AsyncRuntime::with_defaults().unwrap();

    let handle = runtime.spawn_blocking(|| 7);
    let result = runtime.block_on(handle).unwrap();

    assert_eq!(result, 7);
}

#[test]
fn AsyncRuntime___time_driver___enabled() {
    let runtime = AsyncRuntime::with_defaults().unwrap();

    runtime.block_on(async { tokio::time::sleep(Duration::from_millis(1)).await });
}

#[test]
fn AsyncRuntime___shutdown___fires_cancel_signal() {
    let runtime = AsyncRuntime::with_defaults().unwrap();
    let signal = runtime.cancel_signal();

    runtime.shutdown();

    assert!(runtime.is_shutting_down());
    assert!(signal.is_cancelled());
}

#[test]
fn AsyncRuntime___shutdown___wakes_waiting_task() {
    let runtime = AsyncRuntime::with_defaults().unwrap();
    let signal = runtime.cancel_signal();
    let waiter = runtime.spawn(async move { signal.cancelled().await });

    runtime.shutdown();
    let result =
        runtime.block_on(async { tokio::time::timeout(Duration::from_secs(1), waiter).await });

    assert!(result.is_ok());
}

#[test]
fn AsyncRuntime___drop___fires_cancel_signal() {
    let runtime = AsyncRuntime::with_defaults().unwrap();
    let signal = runtime.cancel_signal();

    drop(runtime);

    assert!(signal.is_cancelled());
}
