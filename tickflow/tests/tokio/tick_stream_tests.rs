// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tickflow::{Demand, TickflowError, TimerSource};
use tickflow_test_utils::ManualContext;
use tokio::time::{pause, Instant};

const INTERVAL: Duration = Duration::from_millis(50);

#[tokio::test]
async fn test_stream_yields_ceiling_instants_then_ends() -> anyhow::Result<()> {
    // Arrange
    pause();
    let started = Instant::now();
    let ticks = TimerSource::builder(INTERVAL)
        .repeat_times(Demand::max(4))
        .build()?
        .ticks();

    // Act
    let instants: Vec<Instant> = ticks.collect().await;

    // Assert
    assert_eq!(instants.len(), 4);
    assert!(instants[0] >= started + INTERVAL);
    assert!(instants.windows(2).all(|pair| pair[0] <= pair[1]));
    Ok(())
}

#[tokio::test]
async fn test_unlimited_stream_can_be_taken_from() -> anyhow::Result<()> {
    // Arrange
    pause();
    let ticks = tickflow::timer(INTERVAL)?.ticks();

    // Act
    let instants: Vec<Instant> = ticks.take(10).collect().await;

    // Assert
    assert_eq!(instants.len(), 10);
    Ok(())
}

#[tokio::test]
async fn test_slow_reader_sees_gaps() -> anyhow::Result<()> {
    // Arrange
    pause();
    let mut ticks = TimerSource::builder(INTERVAL)
        .repeat_times(Demand::max(10))
        .build()?
        .ticks_with_capacity(2);
    let first = ticks.next().await;
    assert!(first.is_some());

    // Act
    tokio::time::sleep(INTERVAL * 20).await;
    let rest: Vec<Instant> = ticks.collect().await;

    // Assert
    assert!(!rest.is_empty());
    assert!(rest.len() <= 2);
    Ok(())
}

#[test]
fn test_stream_subscribes_on_first_poll() {
    // Arrange
    let context = ManualContext::new();
    let source = TimerSource::builder_with_context(context.clone(), INTERVAL)
        .build()
        .expect("valid configuration");
    let mut ticks = source.ticks();
    assert_eq!(context.timers_created(), 0);

    // Act
    let pending = ticks.next().now_or_never();

    // Assert
    assert!(pending.is_none());
    assert_eq!(context.timers_created(), 1);

    context.fire();
    assert_eq!(ticks.next().now_or_never(), Some(Some(INTERVAL)));
}

#[test]
fn test_dropping_stream_cancels_timer() {
    // Arrange
    let context = ManualContext::new();
    let mut ticks = TimerSource::builder_with_context(context.clone(), INTERVAL)
        .build()
        .expect("valid configuration")
        .ticks();
    let _ = ticks.next().now_or_never();
    context.fire();
    assert_eq!(ticks.next().now_or_never(), Some(Some(INTERVAL)));
    assert_eq!(context.active_timers(), 1);

    // Act
    drop(ticks);

    // Assert
    assert_eq!(context.active_timers(), 0);
}

#[test]
fn test_stream_ends_when_ceiling_is_zero() {
    let context = ManualContext::new();
    let ticks = TimerSource::builder_with_context(context.clone(), INTERVAL)
        .repeat_times(Demand::none())
        .build()
        .expect("valid configuration")
        .ticks();

    let collected = futures::executor::block_on(ticks.collect::<Vec<_>>());

    assert!(collected.is_empty());
    assert_eq!(context.timers_created(), 0);
}

#[test]
fn test_start_failure_is_distinguishable_from_empty_stream() {
    // Arrange
    let failing_context = ManualContext::new();
    failing_context.fail_next_schedule(TickflowError::timer_start("refused"));
    let mut failing = TimerSource::builder_with_context(failing_context.clone(), INTERVAL)
        .build()
        .expect("valid configuration")
        .ticks();
    let mut empty = TimerSource::builder_with_context(ManualContext::new(), INTERVAL)
        .repeat_times(Demand::none())
        .build()
        .expect("valid configuration")
        .ticks();
    assert_eq!(failing.failure(), None);

    // Act
    let from_failing = futures::executor::block_on(failing.by_ref().collect::<Vec<_>>());
    let from_empty = futures::executor::block_on(empty.by_ref().collect::<Vec<_>>());

    // Assert
    assert!(from_failing.is_empty());
    assert!(from_empty.is_empty());
    assert_eq!(failing_context.timers_created(), 0);
    assert_eq!(failing.failure(), Some(TickflowError::timer_start("refused")));
    assert_eq!(empty.failure(), None);
}
