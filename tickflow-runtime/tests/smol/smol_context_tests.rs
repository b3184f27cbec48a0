// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tickflow_error::TickflowError;
use tickflow_runtime::impls::smol::SmolContext;
use tickflow_runtime::{ExecutionContext, Schedule, TickHandler};

fn counting_handler() -> (Arc<AtomicUsize>, TickHandler) {
    let count = Arc::new(AtomicUsize::new(0));
    let handler_count = count.clone();
    let handler: TickHandler = Arc::new(move || {
        handler_count.fetch_add(1, Ordering::SeqCst);
    });
    (count, handler)
}

#[test]
fn test_smol_context_fires_repeatedly() {
    smol::block_on(async {
        // Arrange
        let context = SmolContext;
        let (count, handler) = counting_handler();

        // Act
        let handle = context
            .schedule_repeating(
                Schedule::new(Duration::from_millis(10), Duration::ZERO),
                handler,
            )
            .unwrap();
        async_io::Timer::after(Duration::from_millis(100)).await;

        // Assert
        assert!(count.load(Ordering::SeqCst) >= 3);
        drop(handle);
    });
}

#[test]
fn test_smol_context_stops_after_cancel() {
    smol::block_on(async {
        // Arrange
        let context = SmolContext;
        let (count, handler) = counting_handler();
        let handle = context
            .schedule_repeating(
                Schedule::new(Duration::from_millis(5), Duration::ZERO),
                handler,
            )
            .unwrap();
        async_io::Timer::after(Duration::from_millis(30)).await;

        // Act
        handle.cancel();
        async_io::Timer::after(Duration::from_millis(20)).await;
        let after_cancel = count.load(Ordering::SeqCst);
        async_io::Timer::after(Duration::from_millis(50)).await;

        // Assert
        assert!(handle.is_cancelled());
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    });
}

#[test]
fn test_smol_context_rejects_zero_interval() {
    let (_count, handler) = counting_handler();

    let result = SmolContext.schedule_repeating(Schedule::new(Duration::ZERO, Duration::ZERO), handler);

    assert!(matches!(result, Err(TickflowError::TimerStart { .. })));
}

#[test]
fn test_smol_clock_is_monotonic() {
    let context = SmolContext;

    let first = context.now();
    let second = context.now();

    assert!(second >= first);
}
