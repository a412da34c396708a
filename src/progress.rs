// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Single-slot progress channel.
//!
//! Ingestion and downloads both report short status phrases here. The slot
//! keeps only the latest message, so when both units run at once their
//! messages interleave and the last writer wins. An empty string means idle.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared last-write-wins status text with change notification.
#[derive(Debug, Clone)]
pub struct ProgressChannel {
    tx: Arc<watch::Sender<String>>,
}

impl Default for ProgressChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressChannel {
    /// Channel starting with empty text.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current status text.
    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "linecat::progress", "{}", message);
        self.tx.send_replace(message);
    }

    /// Reset to idle.
    pub fn clear(&self) {
        self.tx.send_replace(String::new());
    }

    /// Latest status text.
    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Whether the status text is empty.
    pub fn is_idle(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let progress = ProgressChannel::new();
        assert!(progress.is_idle());

        let writer = progress.clone();
        writer.set("Reading CDMS data...");
        progress.set("Downloading x ...");
        assert_eq!(writer.current(), "Downloading x ...");

        writer.clear();
        assert!(progress.is_idle());
    }

    #[tokio::test]
    async fn test_subscriber_sees_change() {
        let progress = ProgressChannel::new();
        let mut rx = progress.subscribe();

        progress.set("Reading JPL data...");
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "Reading JPL data...");
    }
}
