//! Fan-out of change events to connected observers.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A live connection able to receive plain-text change events.
pub trait Observer: Send + 'static {
    /// Deliver one message. An error means the connection is unusable.
    fn deliver(&mut self, message: &str) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Close the underlying connection.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Set of connected observers.
///
/// The membership lock is held for a whole broadcast, so registrations and
/// disconnects that race with a broadcast wait for it to finish. Every send is
/// bounded by `send_timeout`; an observer that errors or times out is dropped.
pub struct NotificationHub<O> {
    observers: Mutex<HashMap<Uuid, O>>,
    send_timeout: Duration,
}

impl<O: Observer> NotificationHub<O> {
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            observers: Mutex::new(HashMap::new()),
            send_timeout,
        }
    }

    pub async fn register(&self, observer: O) -> Uuid {
        let id = Uuid::new_v4();
        self.observers.lock().await.insert(id, observer);
        tracing::debug!(observer = %id, "Observer registered");
        id
    }

    /// Remove an observer that disconnected on its own. Returns false if it
    /// was already pruned by a failed broadcast.
    pub async fn unregister(&self, id: Uuid) -> bool {
        let removed = self.observers.lock().await.remove(&id);
        match removed {
            Some(observer) => {
                self.close_observer(id, observer).await;
                tracing::debug!(observer = %id, "Observer unregistered");
                true
            }
            None => false,
        }
    }

    /// Send `name` to every observer and return how many received it.
    pub async fn broadcast(&self, name: &str) -> usize {
        let mut failed = Vec::new();
        let delivered;
        {
            let mut observers = self.observers.lock().await;
            let mut failed_ids = Vec::new();

            for (id, observer) in observers.iter_mut() {
                match tokio::time::timeout(self.send_timeout, observer.deliver(name)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::warn!(observer = %id, error = %e, "Dropping observer after failed send");
                        failed_ids.push(*id);
                    }
                    Err(_) => {
                        tracing::warn!(observer = %id, "Dropping observer after send timeout");
                        failed_ids.push(*id);
                    }
                }
            }

            for id in failed_ids {
                if let Some(observer) = observers.remove(&id) {
                    failed.push((id, observer));
                }
            }
            delivered = observers.len();
        }

        for (id, observer) in failed {
            self.close_observer(id, observer).await;
        }

        tracing::debug!(name, delivered, "Broadcast change event");
        delivered
    }

    /// Closing may flush frames a stalled peer never reads, so it gets the
    /// same bound as a send. The connection is dropped either way.
    async fn close_observer(&self, id: Uuid, observer: O) {
        if tokio::time::timeout(self.send_timeout, observer.close())
            .await
            .is_err()
        {
            tracing::warn!(observer = %id, "Observer close timed out");
        }
    }

    pub async fn len(&self) -> usize {
        self.observers.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
