use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::sync::mpsc::error::TrySendError;
use tokio_stream::wrappers::ReceiverStream;

use gomoku_common::{ParticipantId, log};

use crate::messages::RelayMessage;

/// Delivery seam between the session registry and whatever carries bytes to
/// participants. Sends must not wait on a slow receiver: they run while the
/// session is locked so that relay order equals sequence order.
pub trait RelayTransport: Send + Sync + Clone + 'static {
    /// Delivers `message` to each recipient and returns the ones that could
    /// not be reached.
    fn relay(
        &self,
        recipients: &[ParticipantId],
        message: RelayMessage,
    ) -> impl Future<Output = Vec<ParticipantId>> + Send;

    /// Best-effort delivery to every attached participant.
    fn announce(&self, message: RelayMessage) -> impl Future<Output = ()> + Send;
}

pub type ParticipantSender = mpsc::Sender<RelayMessage>;

/// In-process transport: one bounded inbox per attached participant.
#[derive(Clone)]
pub struct Broadcaster {
    inboxes: Arc<Mutex<HashMap<ParticipantId, ParticipantSender>>>,
    inbox_capacity: usize,
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("inbox_capacity", &self.inbox_capacity)
            .finish()
    }
}

impl Broadcaster {
    pub fn new(inbox_capacity: usize) -> Self {
        Self {
            inboxes: Arc::new(Mutex::new(HashMap::new())),
            inbox_capacity: inbox_capacity.max(1),
        }
    }

    /// Attaches a fresh inbox for `participant`, replacing any previous one.
    pub async fn connect(&self, participant: ParticipantId) -> ReceiverStream<RelayMessage> {
        let (sender, receiver) = mpsc::channel(self.inbox_capacity);
        self.inboxes.lock().await.insert(participant, sender);
        ReceiverStream::new(receiver)
    }

    pub async fn disconnect(&self, participant: &ParticipantId) {
        self.inboxes.lock().await.remove(participant);
    }

    pub async fn is_connected(&self, participant: &ParticipantId) -> bool {
        self.inboxes
            .lock()
            .await
            .get(participant)
            .is_some_and(|sender| !sender.is_closed())
    }

    pub async fn connected_count(&self) -> usize {
        self.inboxes.lock().await.len()
    }
}

impl RelayTransport for Broadcaster {
    async fn relay(&self, recipients: &[ParticipantId], message: RelayMessage) -> Vec<ParticipantId> {
        let mut inboxes = self.inboxes.lock().await;
        let mut unreachable = Vec::new();

        for participant in recipients {
            let Some(sender) = inboxes.get(participant) else {
                unreachable.push(participant.clone());
                continue;
            };
            match sender.try_send(message.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    log!("Inbox of {} is full, dropping it", participant);
                    inboxes.remove(participant);
                    unreachable.push(participant.clone());
                }
                Err(TrySendError::Closed(_)) => {
                    inboxes.remove(participant);
                    unreachable.push(participant.clone());
                }
            }
        }

        unreachable
    }

    async fn announce(&self, message: RelayMessage) {
        let mut inboxes = self.inboxes.lock().await;
        inboxes.retain(|participant, sender| match sender.try_send(message.clone()) {
            Err(TrySendError::Closed(_)) => {
                log!("Dropping closed inbox of {}", participant);
                false
            }
            _ => true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|name| ParticipantId::new(*name)).collect()
    }

    fn shutdown(text: &str) -> RelayMessage {
        RelayMessage::ServerShuttingDown { message: text.to_string() }
    }

    #[tokio::test]
    async fn test_relay_reaches_connected_inboxes_in_order() {
        let broadcaster = Broadcaster::new(8);
        let mut inbox = broadcaster.connect("a".into()).await;

        let failed = broadcaster.relay(&ids(&["a"]), shutdown("one")).await;
        assert!(failed.is_empty());
        broadcaster.relay(&ids(&["a"]), shutdown("two")).await;

        assert_eq!(inbox.next().await, Some(shutdown("one")));
        assert_eq!(inbox.next().await, Some(shutdown("two")));
    }

    #[tokio::test]
    async fn test_unknown_and_closed_recipients_are_reported() {
        let broadcaster = Broadcaster::new(8);
        let inbox = broadcaster.connect("gone".into()).await;
        drop(inbox);

        let failed = broadcaster
            .relay(&ids(&["gone", "never"]), shutdown("x"))
            .await;
        assert_eq!(failed, vec![ParticipantId::new("gone"), ParticipantId::new("never")]);
        assert!(!broadcaster.is_connected(&"gone".into()).await);
    }

    #[tokio::test]
    async fn test_disconnect_detaches_inbox() {
        let broadcaster = Broadcaster::new(4);
        let mut inbox = broadcaster.connect("a".into()).await;
        assert!(broadcaster.is_connected(&"a".into()).await);

        broadcaster.disconnect(&"a".into()).await;
        assert!(!broadcaster.is_connected(&"a".into()).await);
        assert_eq!(broadcaster.connected_count().await, 0);

        let failed = broadcaster.relay(&ids(&["a"]), shutdown("late")).await;
        assert_eq!(failed, ids(&["a"]));
        // Sender side dropped, so the stream ends.
        assert_eq!(inbox.next().await, None);
    }

    #[tokio::test]
    async fn test_full_inbox_counts_as_lost() {
        let broadcaster = Broadcaster::new(1);
        let _inbox = broadcaster.connect("slow".into()).await;

        assert!(broadcaster.relay(&ids(&["slow"]), shutdown("1")).await.is_empty());
        let failed = broadcaster.relay(&ids(&["slow"]), shutdown("2")).await;
        assert_eq!(failed, vec![ParticipantId::new("slow")]);
        assert_eq!(broadcaster.connected_count().await, 0);
    }

    #[tokio::test]
    async fn test_announce_reaches_everyone() {
        let broadcaster = Broadcaster::new(4);
        let mut a = broadcaster.connect("a".into()).await;
        let mut b = broadcaster.connect("b".into()).await;

        broadcaster.announce(shutdown("bye")).await;
        assert_eq!(a.next().await, Some(shutdown("bye")));
        assert_eq!(b.next().await, Some(shutdown("bye")));
    }
}
