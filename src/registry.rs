//! Tracks which users are connected and who follows whom.
//!
//! The two maps are deliberately independent: a user can appear in follower
//! lists without being connected, and vice versa.  Notifications to a user with
//! no live connection are silently dropped, which is what makes stale follower
//! entries harmless.  Each map sits behind its own reader/writer lock so that
//! broadcast routing (a read of `clients`) never waits on a follow mutation (a
//! write of `followers`), and the two locks are never held at the same time.

use crate::event::{Event, UserId};

use hashbrown::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc::Sender;

/// The sending half of a client connection's outbound channel.  The receiving
/// half is owned by the writer task that the client pipeline spawns per
/// connection.
pub type Outbound = Sender<Arc<Event>>;

#[derive(Default)]
pub struct Registry {
    clients: RwLock<HashMap<UserId, Outbound>>,
    followers: RwLock<HashMap<UserId, Vec<UserId>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Map a user id to a connection.  A later registration for the same id
    /// replaces the earlier one; the replaced channel closes once its
    /// connection's reader drops the last sender.
    pub fn register(&self, id: UserId, outbound: Outbound) {
        let mut clients = recover(self.clients.write());
        if clients.insert(id, outbound).is_some() {
            log::info!("user {} re-registered; replacing the old connection", id);
        } else {
            log::info!("registered user {}", id);
        }
    }

    /// Queue an event for delivery to `id`, if `id` is connected.
    ///
    /// A failed send costs only this event for this destination.  The entry is
    /// left in the map either way; a disconnected client's entry simply keeps
    /// failing quietly until the id re-registers.
    pub fn notify(&self, id: UserId, event: &Arc<Event>) {
        let clients = recover(self.clients.read());
        if let Some(outbound) = clients.get(&id) {
            log::debug!("sending event {} to user {}", event.sequence(), id);
            match outbound.clone().try_send(Arc::clone(event)) {
                Ok(()) => (),
                Err(ref e) if e.is_closed() => {
                    log::info!("user {} is gone; dropping event {}", id, event.sequence())
                }
                Err(e) => log::error!(
                    "cannot send event {} to user {}: {}",
                    event.sequence(),
                    id,
                    e
                ),
            }
        }
    }

    /// Record `from` as a follower of `to`.  Duplicate follows accumulate;
    /// every follow is cancelled by exactly one unfollow.
    pub fn follow(&self, from: UserId, to: UserId) {
        log::debug!("user {} follows {}", from, to);
        let mut followers = recover(self.followers.write());
        followers.entry(to).or_default().push(from);
    }

    /// Remove one occurrence of `from` from `to`'s followers.  Unfollowing a
    /// non-follower is a no-op.
    pub fn unfollow(&self, from: UserId, to: UserId) {
        log::debug!("user {} unfollows {}", from, to);
        let mut followers = recover(self.followers.write());
        if let Some(ids) = followers.get_mut(&to) {
            if let Some(i) = ids.iter().position(|follower| *follower == from) {
                ids.swap_remove(i);
            }
        }
    }

    /// A snapshot of `id`'s followers, sorted so that fan-out order is stable.
    pub fn followers_of(&self, id: UserId) -> Vec<UserId> {
        let followers = recover(self.followers.read());
        let mut ids = followers.get(&id).cloned().unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// A sorted snapshot of every currently registered user id.
    pub fn all_ids(&self) -> Vec<UserId> {
        let clients = recover(self.clients.read());
        let mut ids: Vec<UserId> = clients.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

fn recover<G>(lock_result: Result<G, std::sync::PoisonError<G>>) -> G {
    lock_result.unwrap_or_else(|poisoned| {
        log::error!("{}", &poisoned);
        poisoned.into_inner()
    })
}
