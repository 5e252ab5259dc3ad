use crate::TimerEvent;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

/// Per-user broadcast channels for timer events.
///
/// A channel lives while it has receivers. Receivers handed back through
/// [`TimerEventBus::unsubscribe`] are released at once; receivers that were
/// simply dropped are noticed on the next publish for that user.
#[derive(Clone)]
pub struct TimerEventBus {
    inner: Arc<RwLock<HashMap<Uuid, broadcast::Sender<TimerEvent>>>>,
    channel_capacity: usize,
}

impl TimerEventBus {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            channel_capacity: channel_capacity.max(1),
        }
    }

    pub async fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<TimerEvent> {
        let mut channels = self.inner.write().await;

        let sender = channels.entry(user_id).or_insert_with(|| {
            let (sender, _) = broadcast::channel(self.channel_capacity);
            log::debug!("Created timer event channel for user {}", user_id);
            sender
        });

        let receiver = sender.subscribe();

        log::debug!(
            "Surface subscribed to timers of user {} ({} total subscribers)",
            user_id,
            sender.receiver_count()
        );

        receiver
    }

    pub async fn unsubscribe(&self, user_id: Uuid, receiver: broadcast::Receiver<TimerEvent>) {
        drop(receiver);
        let mut channels = self.inner.write().await;
        Self::prune(&mut channels, user_id);
    }

    /// Returns the number of receivers the event reached. Zero is normal
    /// when no surface is watching.
    pub async fn publish(&self, event: TimerEvent) -> usize {
        let user_id = event.user_id;
        let kind = event.kind;

        let sent = {
            let channels = self.inner.read().await;
            let Some(sender) = channels.get(&user_id) else {
                log::debug!("No surfaces watching user {}", user_id);
                return 0;
            };
            sender.send(event)
        };

        match sent {
            Ok(receivers) => {
                log::debug!(
                    "Published {:?} for user {} to {} surfaces",
                    kind,
                    user_id,
                    receivers
                );
                receivers
            }
            Err(_) => {
                let mut channels = self.inner.write().await;
                Self::prune(&mut channels, user_id);
                0
            }
        }
    }

    pub async fn subscriber_count(&self, user_id: Uuid) -> usize {
        let channels = self.inner.read().await;
        channels
            .get(&user_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    pub async fn has_channel(&self, user_id: Uuid) -> bool {
        self.inner.read().await.contains_key(&user_id)
    }

    /// Remove the user's channel once nothing listens on it. Re-checked under
    /// the write lock since a surface may have subscribed in between.
    fn prune(channels: &mut HashMap<Uuid, broadcast::Sender<TimerEvent>>, user_id: Uuid) {
        if channels
            .get(&user_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(&user_id);
            log::debug!("Removed empty timer event channel for user {}", user_id);
        }
    }
}
