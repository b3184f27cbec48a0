// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tickflow_error::TickflowError;
use tickflow_runtime::impls::tokio::TokioContext;
use tickflow_runtime::{ExecutionContext, Schedule, TickHandler};
use tokio::time::{advance, pause};

fn counting_handler() -> (Arc<AtomicUsize>, TickHandler) {
    let count = Arc::new(AtomicUsize::new(0));
    let handler_count = count.clone();
    let handler: TickHandler = Arc::new(move || {
        handler_count.fetch_add(1, Ordering::SeqCst);
    });
    (count, handler)
}

/// Let spawned timer tasks run after the clock moved.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_fires_once_per_interval() -> anyhow::Result<()> {
    // Arrange
    pause();
    let context = TokioContext::new();
    let (count, handler) = counting_handler();

    // Act
    let handle = context.schedule_repeating(
        Schedule::new(Duration::from_millis(100), Duration::ZERO),
        handler,
    )?;
    settle().await;

    // Assert
    assert_eq!(count.load(Ordering::SeqCst), 0);

    advance(Duration::from_millis(100)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    advance(Duration::from_millis(100)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 2);

    drop(handle);
    Ok(())
}

#[tokio::test]
async fn test_cancel_stops_firing() -> anyhow::Result<()> {
    // Arrange
    pause();
    let context = TokioContext::new();
    let (count, handler) = counting_handler();
    let handle = context.schedule_repeating(
        Schedule::new(Duration::from_millis(10), Duration::ZERO),
        handler,
    )?;

    advance(Duration::from_millis(10)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // Act
    handle.cancel();
    handle.cancel();
    settle().await;
    advance(Duration::from_millis(100)).await;
    settle().await;

    // Assert
    assert!(handle.is_cancelled());
    assert_eq!(count.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_dropping_handle_stops_firing() -> anyhow::Result<()> {
    // Arrange
    pause();
    let context = TokioContext::new();
    let (count, handler) = counting_handler();
    let handle = context.schedule_repeating(
        Schedule::new(Duration::from_millis(10), Duration::from_millis(5)),
        handler,
    )?;

    // Act
    drop(handle);
    settle().await;
    advance(Duration::from_millis(50)).await;
    settle().await;

    // Assert
    assert_eq!(count.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_zero_interval_is_rejected() {
    let context = TokioContext::new();
    let (_count, handler) = counting_handler();

    let result = context.schedule_repeating(Schedule::new(Duration::ZERO, Duration::ZERO), handler);

    assert!(matches!(result, Err(TickflowError::TimerStart { .. })));
}

#[test]
fn test_scheduling_outside_runtime_fails() {
    let context = TokioContext::new();
    let (_count, handler) = counting_handler();

    let result = context.schedule_repeating(
        Schedule::new(Duration::from_millis(10), Duration::ZERO),
        handler,
    );

    assert!(matches!(result, Err(TickflowError::NoRuntime { .. })));
}

#[test]
fn test_current_outside_runtime_fails() {
    assert!(matches!(
        TokioContext::current(),
        Err(TickflowError::NoRuntime { .. })
    ));
}

#[test]
fn test_explicit_handle_works_from_plain_thread() -> anyhow::Result<()> {
    // Arrange
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()?;
    let context = TokioContext::with_handle(runtime.handle().clone());
    let (count, handler) = counting_handler();

    // Act
    let handle = context.schedule_repeating(
        Schedule::new(Duration::from_millis(1), Duration::ZERO),
        handler,
    )?;
    std::thread::sleep(Duration::from_millis(50));
    handle.cancel();

    // Assert
    assert!(count.load(Ordering::SeqCst) >= 1);
    Ok(())
}

#[tokio::test]
async fn test_now_is_monotonic() {
    pause();
    let context = TokioContext::new();

    let first = context.now();
    advance(Duration::from_millis(5)).await;
    let second = context.now();

    assert!(second > first);
    assert_eq!(second - first, Duration::from_millis(5));
}
