// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_channel::Receiver;
use std::time::Duration;
use tokio::time::timeout;

/// Receive the next item, or `None` if nothing arrives within `timeout_ms`
/// or the channel is closed.
pub async fn recv_timeout<T>(rx: &Receiver<T>, timeout_ms: u64) -> Option<T> {
    timeout(Duration::from_millis(timeout_ms), rx.recv())
        .await
        .ok()
        .and_then(Result::ok)
}

/// Panic if an item arrives within `timeout_ms`.
pub async fn assert_no_recv<T>(rx: &Receiver<T>, timeout_ms: u64)
where
    T: std::fmt::Debug,
{
    if let Ok(Ok(item)) = timeout(Duration::from_millis(timeout_ms), rx.recv()).await {
        panic!("Unexpected item received, expected no output: {item:?}");
    }
}

/// Drain everything currently buffered without waiting.
pub fn drain<T>(rx: &Receiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Ok(item) = rx.try_recv() {
        items.push(item);
    }
    items
}
