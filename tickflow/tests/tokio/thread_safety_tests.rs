// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use tickflow::{Demand, TimerSource};
use tickflow_test_utils::helpers::recv_timeout;
use tickflow_test_utils::{SubscriberEvent, TestableSubscriber};
use tokio::time::Instant;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_timers_each_respect_their_ceiling() -> anyhow::Result<()> {
    // Arrange
    let ceilings = [6usize, 4, 2];
    let mut running = Vec::new();
    for ceiling in ceilings {
        let source = TimerSource::builder(Duration::from_millis(1))
            .repeat_times(Demand::max(ceiling))
            .build()?;
        let (subscriber, events) = TestableSubscriber::<Instant>::new();
        let subscription = source.attach(subscriber.clone());
        running.push((ceiling, subscriber, events, subscription));
    }

    // Act
    for (_, _, events, _) in &running {
        loop {
            match recv_timeout(events, 2000).await {
                Some(SubscriberEvent::Completed) => break,
                Some(_) => {}
                None => panic!("timer did not complete in time"),
            }
        }
    }

    // Assert
    for (ceiling, subscriber, _, subscription) in &running {
        assert_eq!(subscriber.value_count(), *ceiling);
        assert_eq!(subscriber.completion_count(), 1);
        assert!(subscription.is_terminated());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancel_from_another_task_stops_emission() -> anyhow::Result<()> {
    // Arrange
    let source = TimerSource::builder(Duration::from_millis(1)).build()?;
    let (subscriber, events) = TestableSubscriber::<Instant>::builder()
        .on_subscribe(|subscription| subscription.request(Demand::unlimited()))
        .on_value(|_| Demand::unlimited())
        .build();
    let subscription = source.attach(subscriber.clone());
    for _ in 0..4 {
        assert!(recv_timeout(&events, 2000).await.is_some());
    }

    // Act
    let canceller = {
        let subscription = subscription.clone();
        tokio::spawn(async move { tickflow::Subscription::cancel(subscription.as_ref()) })
    };
    canceller.await?;
    let delivered = subscriber.value_count();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Assert
    assert_eq!(subscriber.value_count(), delivered);
    assert_eq!(subscriber.completion_count(), 0);
    Ok(())
}
