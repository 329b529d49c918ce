//! Notification streams with explicit subscription handles.
//!
//! Collaborators (the gizmo, the orbit controls) publish notifications through
//! a `Notifier`. Each subscriber receives its own channel and a `Subscription`
//! handle that must be handed back on teardown.

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Handle identifying one subscription.
///
/// Releasing it through [`Notifier::unsubscribe`] is the teardown step.
#[must_use = "subscriptions must be released with `Notifier::unsubscribe`"]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

impl Subscription {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Fan-out publisher for one notification type.
#[derive(Debug)]
pub struct Notifier<E: Clone> {
    subscribers: Vec<(u64, Sender<E>)>,
    next_id: u64,
}

impl<E: Clone> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Notifier<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 1,
        }
    }

    /// Open a new subscription.
    pub fn subscribe(&mut self) -> (Subscription, Receiver<E>) {
        let id = self.next_id;
        self.next_id += 1;

        let (tx, rx) = unbounded();
        self.subscribers.push((id, tx));
        (Subscription(id), rx)
    }

    /// Release a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(id, _)| *id != subscription.0);
        self.subscribers.len() != before
    }

    /// Deliver a notification to every live subscriber.
    ///
    /// Subscribers whose receiver was dropped are pruned.
    pub fn emit(&mut self, event: &E) {
        self.subscribers.retain(|(id, tx)| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                log::trace!("Pruning disconnected subscriber {}", id);
            }
            delivered
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
