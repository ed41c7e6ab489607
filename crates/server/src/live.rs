// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Save notifications for open editors.
//!
//! A candidate may have the preferences form open in more than one place. When
//! one of them saves, the others are holding a stale form and would overwrite
//! the newer data on their next save. Every successful save is announced on
//! this stream so those editors can discard their form and reload.
//!
//! Events are hints only. Clients always reload through the HTTP API.

use axum::{
    extract::{
        FromRef, State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use onboard::SaveReport;
use onboard_domain::UserId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::AppState;

/// Notifications buffered per subscriber. Slow clients lose the oldest.
const NOTIFY_BACKLOG: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A user's work preferences were saved.
    PreferencesSaved {
        user_id: UserId,
        /// Junction adds and removes the save issued.
        collection_changes: usize,
        inserted_locations: usize,
    },
    /// Sent once when a client connects.
    Connected {
        /// Server time, ISO 8601.
        timestamp: String,
    },
}

impl LiveEvent {
    #[must_use]
    pub fn preferences_saved(user: &UserId, report: &SaveReport) -> Self {
        Self::PreferencesSaved {
            user_id: user.clone(),
            collection_changes: report.collection_changes(),
            inserted_locations: report.inserted_locations,
        }
    }

    fn connected_now() -> Self {
        let timestamp: String = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown"));
        Self::Connected { timestamp }
    }
}

/// Fan-out of save notifications to every connected editor.
#[derive(Clone)]
pub struct SaveNotifier {
    sender: broadcast::Sender<LiveEvent>,
}

impl SaveNotifier {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTIFY_BACKLOG);
        Self { sender }
    }

    /// Queues `event` for every current subscriber. Never waits on clients.
    pub fn notify(&self, event: &LiveEvent) {
        let receivers: usize = self.sender.send(event.clone()).unwrap_or(0);
        debug!(?event, receivers, "Queued save notification");
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.sender.subscribe()
    }
}

impl Default for SaveNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FromRef<AppState> for Arc<SaveNotifier> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.notifier)
    }
}

/// Handler for GET `/live`.
///
/// Upgrades to a WebSocket that carries [`LiveEvent`]s as JSON text frames.
pub async fn handle_live(
    ws: WebSocketUpgrade,
    AxumState(notifier): AxumState<Arc<SaveNotifier>>,
) -> Response {
    let events: broadcast::Receiver<LiveEvent> = notifier.subscribe();
    ws.on_upgrade(move |socket| stream_events(socket, events))
}

async fn send_event(socket: &mut WebSocket, event: &LiveEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            error!(?e, "Failed to encode live event");
            true
        }
    }
}

async fn stream_events(mut socket: WebSocket, mut events: broadcast::Receiver<LiveEvent>) {
    info!("Editor subscribed to save notifications");

    if !send_event(&mut socket, &LiveEvent::connected_now()).await {
        warn!("Editor went away before the greeting");
        return;
    }

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(event) => {
                    if !send_event(&mut socket, &event).await {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Editor fell behind on save notifications");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                // Editors only listen.
                Some(Ok(Message::Text(_) | Message::Binary(_))) => {
                    warn!("Ignoring message from editor");
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!(?e, "Live socket error");
                    break;
                }
            },
        }
    }

    info!("Editor unsubscribed from save notifications");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    #[test]
    fn test_broadcast_without_receivers_is_dropped() {
        let notifier: SaveNotifier = SaveNotifier::new();
        notifier.notify(&LiveEvent::preferences_saved(
            &alice(),
            &SaveReport::default(),
        ));
        assert_eq!(notifier.sender.receiver_count(), 0);
    }

    #[test]
    fn test_every_subscriber_receives_the_event() {
        let notifier: SaveNotifier = SaveNotifier::new();
        let mut rx1 = notifier.subscribe();
        let mut rx2 = notifier.subscribe();
        let event: LiveEvent = LiveEvent::preferences_saved(&alice(), &SaveReport::default());

        notifier.notify(&event);

        assert_eq!(rx1.try_recv().unwrap(), event);
        assert_eq!(rx2.try_recv().unwrap(), event);
    }

    #[test]
    fn test_saved_event_wire_format() {
        let report: SaveReport = SaveReport {
            operations: Vec::new(),
            inserted_locations: 2,
        };

        let json: serde_json::Value =
            serde_json::to_value(LiveEvent::preferences_saved(&alice(), &report)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "preferences_saved",
                "user_id": "alice",
                "collection_changes": 0,
                "inserted_locations": 2,
            })
        );
    }
}
