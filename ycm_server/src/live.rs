//! Live balance updates for connected members.
//!
//! Members' dashboards open a websocket at `/ws/{member_id}`. When a booking is settled for a member who is connected,
//! a JSON message is pushed to them. Delivery is best-effort: members who are not connected simply miss the message.
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use actix_web::{get, web, HttpRequest, HttpResponse};
use actix_ws::Message;
use futures::StreamExt;
use log::*;
use tokio::sync::{mpsc, RwLock};

const LIVE_BUFFER_SIZE: usize = 16;

/// Registry of open live connections, keyed by member id. A member has at most one live connection; a new connection
/// replaces the previous one.
#[derive(Clone, Default)]
pub struct LiveConnections {
    connections: Arc<RwLock<HashMap<i64, (u64, mpsc::Sender<String>)>>>,
    next_id: Arc<AtomicU64>,
}

impl LiveConnections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection for the member and returns its id and the receiving end of its message channel.
    pub async fn register(&self, member_id: i64) -> (u64, mpsc::Receiver<String>) {
        let connection_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(LIVE_BUFFER_SIZE);
        let previous = self.connections.write().await.insert(member_id, (connection_id, tx));
        if previous.is_some() {
            debug!("🔌️ Member #{member_id} reconnected. The previous connection was replaced.");
        }
        info!("🔌️ Member #{member_id} connected (connection {connection_id})");
        (connection_id, rx)
    }

    /// Removes the member's connection, but only if it is still the one identified by `connection_id`.
    pub async fn unregister(&self, member_id: i64, connection_id: u64) {
        let mut connections = self.connections.write().await;
        if matches!(connections.get(&member_id), Some((id, _)) if *id == connection_id) {
            connections.remove(&member_id);
            info!("🔌️ Member #{member_id} disconnected (connection {connection_id})");
        }
    }

    /// Sends `payload` to the member if they are connected. Returns true if the message was queued.
    pub async fn push(&self, member_id: i64, payload: String) -> bool {
        let sender = match self.connections.read().await.get(&member_id) {
            Some((id, tx)) => (*id, tx.clone()),
            None => {
                trace!("🔌️ Member #{member_id} is not connected. Nothing to push.");
                return false;
            },
        };
        let (connection_id, tx) = sender;
        match tx.try_send(payload) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("🔌️ Live connection for member #{member_id} is not keeping up. Message dropped.");
                false
            },
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("🔌️ Live connection for member #{member_id} has gone away");
                self.unregister(member_id, connection_id).await;
                false
            },
        }
    }

    pub async fn is_connected(&self, member_id: i64) -> bool {
        self.connections.read().await.contains_key(&member_id)
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[get("/ws/{member_id}")]
pub async fn live_updates(
    req: HttpRequest,
    body: web::Payload,
    path: web::Path<i64>,
    live: web::Data<LiveConnections>,
) -> Result<HttpResponse, actix_web::Error> {
    let member_id = path.into_inner();
    let (response, mut session, mut stream) = actix_ws::handle(&req, body)?;
    let live = live.get_ref().clone();
    let (connection_id, mut rx) = live.register(member_id).await;
    actix_web::rt::spawn(async move {
        let mut close_reason = None;
        loop {
            tokio::select! {
                msg = stream.next() => match msg {
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    },
                    Some(Ok(Message::Close(reason))) => {
                        close_reason = reason;
                        break;
                    },
                    Some(Ok(_)) => {},
                    Some(Err(e)) => {
                        debug!("🔌️ Protocol error on live connection for member #{member_id}. {e}");
                        break;
                    },
                    None => break,
                },
                payload = rx.recv() => match payload {
                    Some(payload) => {
                        if session.text(payload).await.is_err() {
                            break;
                        }
                    },
                    // Replaced by a newer connection
                    None => break,
                },
            }
        }
        let _ = session.close(close_reason).await;
        live.unregister(member_id, connection_id).await;
    });
    Ok(response)
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn push_to_connected_member() {
        let live = LiveConnections::new();
        assert!(!live.push(7, "hello".into()).await);
        let (_, mut rx) = live.register(7).await;
        assert!(live.push(7, "hello".into()).await);
        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn stale_connection_does_not_remove_new_one() {
        let live = LiveConnections::new();
        let (first, _rx1) = live.register(7).await;
        let (second, mut rx2) = live.register(7).await;
        assert_ne!(first, second);
        live.unregister(7, first).await;
        assert!(live.is_connected(7).await);
        assert!(live.push(7, "still here".into()).await);
        assert_eq!(rx2.recv().await.as_deref(), Some("still here"));
        live.unregister(7, second).await;
        assert!(!live.is_connected(7).await);
    }

    #[tokio::test]
    async fn closed_channels_are_cleaned_up() {
        let live = LiveConnections::new();
        let (_, rx) = live.register(9).await;
        drop(rx);
        assert!(!live.push(9, "anyone?".into()).await);
        assert_eq!(live.connection_count().await, 0);
    }
}
