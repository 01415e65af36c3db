//! Turn subscribers.
//!
//! Schedulers, daemons, and state machines hook in here. After an action's
//! events are applied, each subscriber sees the turn's events and the new
//! world, and may answer with more event drafts. Those go through the same
//! application entry point as action events, and are themselves shown to
//! the subscribers in a further round, up to the configured cascade limit.

use std::fmt;
use std::sync::Arc;

use parlance_foundation::{EntityId, Sequence};
use parlance_world::World;
use tracing::{debug, error, warn};

use crate::apply::{Rejection, apply};
use crate::event::{Event, EventCatalog, EventDraft, EventKind, Role};

/// What a subscriber is shown after a turn.
#[derive(Clone, Copy, Debug)]
pub struct TurnNotice<'a> {
    /// The turn that just completed
    pub turn: u64,
    /// The world after this round's events
    pub world: &'a World,
    /// Events committed since the subscriber was last notified
    pub events: &'a [Event],
    /// Who acted this turn
    pub actor: EntityId,
}

impl TurnNotice<'_> {
    /// Checks if any event in the notice has the given kind.
    #[must_use]
    pub fn saw(&self, kind: &EventKind) -> bool {
        self.events.iter().any(|e| &e.kind == kind)
    }
}

/// A synchronous observer of completed turns.
pub trait TurnSubscriber: Send + Sync {
    /// Returns a name for logs.
    fn name(&self) -> &str;

    /// Higher priorities run first. Ties run in registration order.
    fn priority(&self) -> i32 {
        0
    }

    /// Reacts to a turn's events.
    fn on_turn_completed(&self, notice: &TurnNotice<'_>) -> Vec<EventDraft>;
}

/// What notifying the subscribers produced.
#[derive(Clone, Debug)]
pub struct Notification {
    /// The world after every committed subscriber event
    pub world: World,
    /// Committed subscriber events, in order
    pub committed: Vec<Event>,
    /// Rejections of subscriber mutations
    pub rejections: Vec<Rejection>,
}

/// Registered subscribers in run order.
#[derive(Clone, Default)]
pub struct SubscriberSet {
    subscribers: Vec<Arc<dyn TurnSubscriber>>,
}

impl SubscriberSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber, keeping the set in run order.
    pub fn register(&mut self, subscriber: impl TurnSubscriber + 'static) {
        self.subscribers.push(Arc::new(subscriber));
        // Stable, so equal priorities keep registration order.
        self.subscribers
            .sort_by_key(|s| std::cmp::Reverse(s.priority()));
    }

    /// Returns subscriber names in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.subscribers.iter().map(|s| s.name())
    }

    /// Returns the number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Checks if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Shows `events` to every subscriber and applies what they emit.
    ///
    /// Each round shows the subscribers only the events of the round before.
    /// Drafts with unregistered custom tags are dropped and logged.
    pub fn notify(
        &self,
        world: &World,
        actor: EntityId,
        events: &[Event],
        sequence: &mut Sequence,
        catalog: &EventCatalog,
        cascade_limit: usize,
    ) -> Notification {
        let mut current = world.clone();
        let mut committed = Vec::new();
        let mut rejections = Vec::new();
        let mut shown: Vec<Event> = events.to_vec();

        for round in 0..=cascade_limit {
            if shown.is_empty() || self.subscribers.is_empty() {
                break;
            }
            if round == cascade_limit {
                warn!(round, pending = shown.len(), "subscriber cascade limit reached");
                break;
            }
            let mut produced = Vec::new();
            for subscriber in &self.subscribers {
                let notice = TurnNotice {
                    turn: sequence.turn(),
                    world: &current,
                    events: &shown,
                    actor,
                };
                let drafts = subscriber.on_turn_completed(&notice);
                if !drafts.is_empty() {
                    debug!(subscriber = subscriber.name(), drafts = drafts.len(), round, "subscriber emitted");
                }
                for draft in drafts {
                    if let Err(err) = catalog.check(&draft.kind) {
                        error!(subscriber = subscriber.name(), %err, "dropping subscriber event");
                        continue;
                    }
                    let event = draft.stamp(sequence);
                    match apply(&current, &event) {
                        Ok(next) => {
                            current = next;
                            produced.push(event);
                        }
                        Err(rejection) => {
                            let failed = EventDraft::new(EventKind::ActionFailed)
                                .with(Role::Actor, actor)
                                .with_data("subscriber", subscriber.name())
                                .with_data("reason", rejection.reason.name())
                                .with_data("message", rejection.message.as_str())
                                .stamp(sequence);
                            produced.push(failed);
                            rejections.push(rejection);
                            // The rest of this subscriber's drafts assumed the rejected one.
                            break;
                        }
                    }
                }
            }
            committed.extend(produced.iter().cloned());
            shown = produced;
        }

        Notification {
            world: current,
            committed,
            rejections,
        }
    }
}

impl fmt::Debug for SubscriberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
