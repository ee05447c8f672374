//! Notifications emitted by successful election operations.

use serde::{Deserialize, Serialize};

use mayor_types::{AccountId, Amount};

/// Exactly one event is emitted per successful mutating call, in call order.
/// Teardown emits nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ElectionEvent {
    /// A candidate staked its deposit.
    Deposited { candidate: AccountId, amount: Amount },
    /// A voter cast or replaced their sealed envelope.
    EnvelopeCast { voter: AccountId },
    /// A voter revealed a ballot matching their envelope.
    EnvelopeOpened {
        voter: AccountId,
        amount: Amount,
        candidate: AccountId,
    },
    /// Settlement picked a winner.
    WinnerDeclared { candidate: AccountId },
    /// Settlement found no single winner; the pool went to escrow.
    TieDeclared { escrow: AccountId },
}

pub type Listener = Box<dyn Fn(&ElectionEvent) + Send + Sync>;

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline by the operation that succeeded, after its
/// state change is committed. They cannot call back into the election.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &ElectionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
