use tokio::sync::broadcast;

use super::types::StatusChanged;

/// Typed fan-out of status changes to dashboards, audit trails and the like.
///
/// Publishing never blocks; a subscriber that falls more than `capacity`
/// messages behind loses the oldest ones and sees `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct StatusNotifier {
    sender: broadcast::Sender<StatusChanged>,
}

impl StatusNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusChanged> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Returns the number of subscribers that received the change
    pub fn publish(&self, change: StatusChanged) -> usize {
        match self.sender.send(change) {
            Ok(delivered) => delivered,
            Err(broadcast::error::SendError(change)) => {
                tracing::debug!(contact_id = %change.contact_id, "No status subscribers");
                0
            }
        }
    }
}

impl Default for StatusNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::types::ContactStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn change() -> StatusChanged {
        StatusChanged {
            contact_id: Uuid::new_v4(),
            previous_status: ContactStatus::Lead,
            new_status: ContactStatus::Prospect,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_subscribers_receive_published_changes() {
        let notifier = StatusNotifier::new(8);
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 2);

        let sent = change();
        assert_eq!(notifier.publish(sent.clone()), 2);
        assert_eq!(first.recv().await.unwrap(), sent);
        assert_eq!(second.recv().await.unwrap(), sent);
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let notifier = StatusNotifier::default();
        assert_eq!(notifier.publish(change()), 0);
    }
}
