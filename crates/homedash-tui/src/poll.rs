//! The poll loop.
//!
//! One background task per mounted widget: an immediate cycle on start,
//! then one cycle per interval tick, plus manual retries outside the
//! cadence. Per-endpoint failures are absorbed (stale data retained);
//! only a failure of the cycle itself, which here means the client could
//! not be constructed, surfaces as a disconnect. There is deliberately no
//! backoff, retry limit or request timeout; every tick is independent.

use homedash_client::{ApiClient, CatalogApi, ClientError};
use homedash_core::WidgetConfig;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::events::{AppEvent, PollEvent};

/// Handle to the running poll task.
pub struct Poller {
    handle: JoinHandle<()>,
    retry_tx: mpsc::UnboundedSender<()>,
}

impl Poller {
    /// Spawns the poll task for the given configuration.
    ///
    /// The interval is the configured one clamped to at least 10s.
    /// Changing the interval means stopping this poller and spawning a
    /// fresh one.
    #[must_use]
    pub fn spawn(config: &WidgetConfig, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let period = config.effective_poll_interval();
        let server_url = config.server_url.clone();
        let api_key = config.bearer_token().map(ToString::to_string);
        let (retry_tx, mut retry_rx) = mpsc::unbounded_channel::<()>();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    retry = retry_rx.recv() => {
                        if retry.is_none() {
                            break;
                        }
                    }
                }
                let client = ApiClient::new(&server_url, api_key.as_deref());
                run_cycle(client.as_ref(), &tx).await;
                if tx.is_closed() {
                    break;
                }
            }
        });

        Self { handle, retry_tx }
    }

    /// Triggers exactly one extra cycle outside the timer cadence.
    pub fn retry(&self) {
        let _ = self.retry_tx.send(());
    }

    /// Tears the poll task down; no cycle runs afterwards.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Runs one fetch cycle and reports its outcome on the channel.
///
/// Items and batch status are fetched concurrently and each failure is
/// caught independently: a failed fetch contributes `None` and the cycle
/// still counts as completed. This mirrors the widget's long-standing
/// absorption policy, under which even two individually failed fetches
/// leave the connection state at connected.
async fn run_cycle<C: CatalogApi>(
    client: Result<&C, &ClientError>,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let _ = tx.send(AppEvent::Poll(PollEvent::CycleStarted));

    let client = match client {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(error = %err, "poll cycle failed");
            let _ = tx.send(AppEvent::Poll(PollEvent::CycleFailed(err.to_string())));
            return;
        }
    };

    let (items, statuses) = tokio::join!(client.items(), client.all_status());
    let items = items
        .inspect_err(|err| tracing::debug!(error = %err, "items fetch failed"))
        .ok();
    let statuses = statuses
        .inspect_err(|err| tracing::debug!(error = %err, "status fetch failed"))
        .ok();

    let _ = tx.send(AppEvent::Poll(PollEvent::CycleFinished { items, statuses }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use homedash_core::{ItemsPayload, StatusPayload};

    struct FakeApi {
        fail_items: bool,
        fail_status: bool,
    }

    fn server_error() -> ClientError {
        ClientError::Status {
            status: 500,
            reason: "Internal Server Error".to_string(),
        }
    }

    #[async_trait]
    impl CatalogApi for FakeApi {
        async fn health(&self) -> homedash_client::Result<serde_json::Value> {
            Ok(serde_json::json!({"ok": true}))
        }

        async fn items(&self) -> homedash_client::Result<ItemsPayload> {
            if self.fail_items {
                return Err(server_error());
            }
            Ok(serde_json::from_str(r#"[{"id":"a"}]"#).unwrap())
        }

        async fn all_status(&self) -> homedash_client::Result<StatusPayload> {
            if self.fail_status {
                return Err(server_error());
            }
            Ok(serde_json::from_str(r#"{"a":"online"}"#).unwrap())
        }
    }

    async fn collect_cycle(client: Result<&FakeApi, &ClientError>) -> Vec<PollEvent> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        run_cycle(client, &tx).await;
        drop(tx);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                AppEvent::Poll(poll) => events.push(poll),
                other => panic!("unexpected event {other:?}"),
            }
        }
        events
    }

    #[tokio::test]
    async fn successful_cycle_carries_both_payloads() {
        let api = FakeApi {
            fail_items: false,
            fail_status: false,
        };
        let events = collect_cycle(Ok(&api)).await;

        assert!(matches!(events[0], PollEvent::CycleStarted));
        match &events[1] {
            PollEvent::CycleFinished { items, statuses } => {
                assert!(items.is_some());
                assert!(statuses.is_some());
            }
            other => panic!("expected finished cycle, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_fetch_failure_is_absorbed() {
        let api = FakeApi {
            fail_items: true,
            fail_status: false,
        };
        let events = collect_cycle(Ok(&api)).await;

        match &events[1] {
            PollEvent::CycleFinished { items, statuses } => {
                assert!(items.is_none());
                assert!(statuses.is_some());
            }
            other => panic!("expected finished cycle, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn both_fetch_failures_still_finish_the_cycle() {
        let api = FakeApi {
            fail_items: true,
            fail_status: true,
        };
        let events = collect_cycle(Ok(&api)).await;

        // Absorption policy: individually caught failures never fail the
        // cycle, even when no data changed.
        match &events[1] {
            PollEvent::CycleFinished { items, statuses } => {
                assert!(items.is_none());
                assert!(statuses.is_none());
            }
            other => panic!("expected finished cycle, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn client_construction_failure_fails_the_cycle() {
        let err = ClientError::InvalidBaseUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        let events = collect_cycle(Err(&err)).await;

        assert!(matches!(events[0], PollEvent::CycleStarted));
        match &events[1] {
            PollEvent::CycleFailed(message) => assert!(message.contains("nope")),
            other => panic!("expected failed cycle, got {other:?}"),
        }
    }
}
