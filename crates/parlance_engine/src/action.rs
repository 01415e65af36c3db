//! Actions and the four-phase pipeline.
//!
//! Every action runs the same contract:
//!
//! 1. `validate` reads the world and either accepts or names a reason code.
//! 2. `execute` (only when valid) records mutations.
//! 3. `blocked` (only when invalid) describes the refusal.
//! 4. `report` (only when every mutation committed) describes the outcome.
//!
//! The pipeline stamps drafts from the session [`Sequence`], applies them in
//! order through [`apply`](crate::apply::apply), and returns the committed
//! events. Actions never touch the world or call one another.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parlance_foundation::{ActionId, EntityId, Error, Result, Sequence, Value};
use parlance_world::World;
use tracing::{debug, error, warn};

use crate::apply::{Rejection, apply};
use crate::event::{Event, EventCatalog, EventDraft, EventKind, Mutation, Role};
use crate::validator::ResolvedCommand;

// =============================================================================
// Validation Results
// =============================================================================

/// Why an action refused to run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    /// The target is already open
    AlreadyOpen,
    /// The target is already closed
    AlreadyClosed,
    /// The target cannot be opened or closed
    NotOpenable,
    /// The target is locked
    Locked,
    /// The target is already locked
    AlreadyLocked,
    /// The target is already unlocked
    AlreadyUnlocked,
    /// The target has no lock
    NotLockable,
    /// The instrument does not fit the lock
    WrongKey,
    /// No key was given and none is carried
    NoKey,
    /// Only closed things can be locked
    NotClosed,
    /// The target has no switch
    NotSwitchable,
    /// The target is already on
    AlreadyOn,
    /// The target is already off
    AlreadyOff,
    /// The actor already carries the target
    AlreadyHeld,
    /// The actor does not carry the target
    NotHeld,
    /// The target is scenery or otherwise fixed in place
    Fixed,
    /// The target is a person or a room
    NotPortable,
    /// The target is out of reach
    NotReachable,
    /// The target cannot be seen
    NotVisible,
    /// The destination cannot hold things inside
    NotContainer,
    /// The destination cannot hold things on top
    NotSupporter,
    /// The container is closed
    ContainerClosed,
    /// The destination is full
    NoRoom,
    /// There is no exit that way
    NoExit,
    /// The target and destination are the same
    SelfReference,
    /// The destination is inside the target
    Recursive,
    /// The target is not in or on the named source
    NotInside,
    /// There is no earlier turn to return to
    NothingToUndo,
    /// A story-defined reason
    Custom(String),
}

impl ReasonCode {
    /// Returns the snake-case code carried in `ActionBlocked` events.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::AlreadyOpen => "already_open",
            Self::AlreadyClosed => "already_closed",
            Self::NotOpenable => "not_openable",
            Self::Locked => "locked",
            Self::AlreadyLocked => "already_locked",
            Self::AlreadyUnlocked => "already_unlocked",
            Self::NotLockable => "not_lockable",
            Self::WrongKey => "wrong_key",
            Self::NoKey => "no_key",
            Self::NotClosed => "not_closed",
            Self::NotSwitchable => "not_switchable",
            Self::AlreadyOn => "already_on",
            Self::AlreadyOff => "already_off",
            Self::AlreadyHeld => "already_held",
            Self::NotHeld => "not_held",
            Self::Fixed => "fixed",
            Self::NotPortable => "not_portable",
            Self::NotReachable => "not_reachable",
            Self::NotVisible => "not_visible",
            Self::NotContainer => "not_container",
            Self::NotSupporter => "not_supporter",
            Self::ContainerClosed => "container_closed",
            Self::NoRoom => "no_room",
            Self::NoExit => "no_exit",
            Self::SelfReference => "self_reference",
            Self::Recursive => "recursive",
            Self::NotInside => "not_inside",
            Self::NothingToUndo => "nothing_to_undo",
            Self::Custom(code) => code,
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of an action's validate phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationResult {
    /// The action may run
    Valid,
    /// The action is refused
    Invalid {
        /// Why
        reason: ReasonCode,
        /// Extra detail for the renderer
        params: BTreeMap<String, Value>,
    },
}

impl ValidationResult {
    /// Refuses with no parameters.
    #[must_use]
    pub fn invalid(reason: ReasonCode) -> Self {
        Self::Invalid {
            reason,
            params: BTreeMap::new(),
        }
    }

    /// Adds a parameter to a refusal. Does nothing to `Valid`.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Self::Invalid { params, .. } = &mut self {
            params.insert(name.into(), value.into());
        }
        self
    }

    /// Checks if the action may run.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

// =============================================================================
// Action Context
// =============================================================================

/// Write-once storage shared between the phases of one action run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scratch {
    values: BTreeMap<String, Value>,
}

impl Scratch {
    /// Stores a value. Returns false, and keeps the old value, if the key is
    /// already set.
    pub fn remember(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if self.values.contains_key(&key) {
            return false;
        }
        self.values.insert(key, value.into());
        true
    }

    /// Reads a stored value.
    #[must_use]
    pub fn recall(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Reads a stored entity.
    #[must_use]
    pub fn recall_entity(&self, key: &str) -> Option<EntityId> {
        self.recall(key).and_then(Value::as_entity)
    }
}

/// What an action sees while it runs.
pub struct ActionContext<'a> {
    command: &'a ResolvedCommand,
    world: World,
    scratch: Scratch,
    mutations: Vec<Mutation>,
    undo_available: bool,
}

impl<'a> ActionContext<'a> {
    /// Creates a context for `command` against `world`.
    #[must_use]
    pub fn new(command: &'a ResolvedCommand, world: &World) -> Self {
        Self {
            command,
            world: world.clone(),
            scratch: Scratch::default(),
            mutations: Vec::new(),
            undo_available: false,
        }
    }

    /// Tells meta actions whether there is a turn to undo.
    #[must_use]
    pub fn with_undo_available(mut self, available: bool) -> Self {
        self.undo_available = available;
        self
    }

    /// Returns the resolved command.
    #[must_use]
    pub fn command(&self) -> &ResolvedCommand {
        self.command
    }

    /// Returns the world. During `report` this is the world after `execute`.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns who acts.
    #[must_use]
    pub fn actor(&self) -> EntityId {
        self.command.actor
    }

    /// Returns the single entity in the first noun slot.
    #[must_use]
    pub fn direct(&self) -> Option<EntityId> {
        self.command.direct()
    }

    /// Returns the single entity in the second noun slot.
    #[must_use]
    pub fn indirect(&self) -> Option<EntityId> {
        self.command.indirect()
    }

    /// Returns the first-slot entity or an internal error.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the slot is unbound, which means the grammar
    /// maps a pattern without a noun to an action that needs one.
    pub fn require_direct(&self) -> Result<EntityId> {
        self.direct().ok_or_else(|| {
            Error::internal(format!("{} needs a direct object", self.command.action()))
        })
    }

    /// Returns the second-slot entity or an internal error.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the slot is unbound.
    pub fn require_indirect(&self) -> Result<EntityId> {
        self.indirect().ok_or_else(|| {
            Error::internal(format!("{} needs an indirect object", self.command.action()))
        })
    }

    /// Checks if a previous turn can be undone.
    #[must_use]
    pub fn undo_available(&self) -> bool {
        self.undo_available
    }

    /// Returns the scratch space.
    #[must_use]
    pub fn scratch(&self) -> &Scratch {
        &self.scratch
    }

    /// Returns the scratch space for writing.
    pub fn scratch_mut(&mut self) -> &mut Scratch {
        &mut self.scratch
    }

    /// Records a mutation. Only reachable from `execute`, which is the only
    /// phase holding the context mutably.
    pub fn mutate(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    /// Starts a draft with the actor role filled in.
    pub fn event(&self, kind: EventKind) -> EventDraft {
        EventDraft::new(kind)
            .with(Role::Actor, self.actor())
            .with_data("action", self.command.action().as_str())
    }
}

// =============================================================================
// Action Trait
// =============================================================================

/// A verb's behavior.
pub trait Action: Send + Sync {
    /// Returns the id the grammar maps to.
    fn id(&self) -> ActionId;

    /// Meta actions act on the session, not the story, and use no turn.
    fn is_meta(&self) -> bool {
        false
    }

    /// Checks preconditions. Must not depend on anything but the context.
    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult;

    /// Records mutations with [`ActionContext::mutate`].
    ///
    /// # Errors
    ///
    /// Returns an error only for programming faults, such as a missing
    /// binding the grammar should have guaranteed.
    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()>;

    /// Describes a refusal. The default emits exactly one `ActionBlocked`.
    fn blocked(
        &self,
        ctx: &ActionContext<'_>,
        reason: &ReasonCode,
        params: &BTreeMap<String, Value>,
    ) -> Vec<EventDraft> {
        let mut draft = ctx
            .event(EventKind::ActionBlocked)
            .with_data("reason", reason.name());
        if let Some(target) = ctx.direct() {
            draft = draft.with(Role::Target, target);
        }
        if let Some(instrument) = ctx.indirect() {
            draft = draft.with(Role::Instrument, instrument);
        }
        for (name, value) in params {
            draft = draft.with_data(name.clone(), value.clone());
        }
        vec![draft]
    }

    /// Describes what happened, after every mutation committed.
    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft>;
}

// =============================================================================
// Action Registry
// =============================================================================

/// Actions by id.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: BTreeMap<ActionId, Arc<dyn Action>>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action. A second action with the same id replaces the
    /// first.
    pub fn register(&mut self, action: impl Action + 'static) -> &mut Self {
        let id = action.id();
        if self.actions.insert(id.clone(), Arc::new(action)).is_some() {
            warn!(action = %id, "replacing registered action");
        }
        self
    }

    /// Looks up an action.
    #[must_use]
    pub fn get(&self, id: &ActionId) -> Option<Arc<dyn Action>> {
        self.actions.get(id).cloned()
    }

    /// Checks if an action is registered.
    #[must_use]
    pub fn contains(&self, id: &ActionId) -> bool {
        self.actions.contains_key(id)
    }

    /// Returns registered ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &ActionId> {
        self.actions.keys()
    }

    /// Returns the number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Checks if no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.actions.keys()).finish()
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// How an action run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionStatus {
    /// Every event committed
    Succeeded,
    /// Validation refused
    Blocked(ReasonCode),
    /// Event application rejected a mutation
    Failed(Rejection),
}

/// Result of running one action.
#[derive(Clone, Debug)]
pub struct PipelineOutcome {
    /// The world after every committed event
    pub world: World,
    /// Committed events, in order
    pub committed: Vec<Event>,
    /// The rejection, if a mutation was refused
    pub rejection: Option<Rejection>,
    /// How the run ended
    pub status: ActionStatus,
}

/// Runs actions through validate, execute or blocked, and report.
#[derive(Clone, Debug, Default)]
pub struct ActionPipeline {
    catalog: EventCatalog,
}

impl ActionPipeline {
    /// Creates a pipeline that accepts custom events from `catalog`.
    #[must_use]
    pub fn new(catalog: EventCatalog) -> Self {
        Self { catalog }
    }

    /// Returns the event catalog.
    #[must_use]
    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Returns the event catalog for registration.
    pub fn catalog_mut(&mut self) -> &mut EventCatalog {
        &mut self.catalog
    }

    /// Runs an action against `world`.
    ///
    /// # Errors
    ///
    /// Returns an error if the action's execute phase fails or it emits an
    /// unregistered custom event.
    pub fn run(
        &self,
        action: &dyn Action,
        command: &ResolvedCommand,
        world: &World,
        sequence: &mut Sequence,
    ) -> Result<PipelineOutcome> {
        self.run_in(action, ActionContext::new(command, world), sequence)
    }

    /// Runs an action in a prepared context.
    ///
    /// # Errors
    ///
    /// See [`ActionPipeline::run`].
    pub fn run_in(
        &self,
        action: &dyn Action,
        mut ctx: ActionContext<'_>,
        sequence: &mut Sequence,
    ) -> Result<PipelineOutcome> {
        let id = action.id();
        let mut committed = Vec::new();

        if let ValidationResult::Invalid { reason, params } = action.validate(&ctx) {
            debug!(action = %id, %reason, "blocked");
            let drafts = narrative_only(&id, action.blocked(&ctx, &reason, &params));
            let world = self.commit(&ctx.world, drafts, sequence, &mut committed)?;
            return Ok(PipelineOutcome {
                world,
                committed,
                rejection: None,
                status: ActionStatus::Blocked(reason),
            });
        }

        action.execute(&mut ctx)?;
        let mutations = std::mem::take(&mut ctx.mutations);
        for mutation in mutations {
            let event = EventDraft::mutation(mutation)
                .with(Role::Actor, ctx.actor())
                .stamp(sequence);
            match apply(&ctx.world, &event) {
                Ok(next) => {
                    ctx.world = next;
                    committed.push(event);
                }
                Err(rejection) => {
                    let failed = ctx
                        .event(EventKind::ActionFailed)
                        .with_data("reason", rejection.reason.name())
                        .with_data("message", rejection.message.as_str())
                        .stamp(sequence);
                    committed.push(failed);
                    return Ok(PipelineOutcome {
                        world: ctx.world,
                        committed,
                        status: ActionStatus::Failed(rejection.clone()),
                        rejection: Some(rejection),
                    });
                }
            }
        }

        let drafts = narrative_only(&id, action.report(&ctx));
        let world = self.commit(&ctx.world, drafts, sequence, &mut committed)?;
        debug!(action = %id, events = committed.len(), "succeeded");
        Ok(PipelineOutcome {
            world,
            committed,
            rejection: None,
            status: ActionStatus::Succeeded,
        })
    }

    /// Stamps and applies narrative drafts.
    fn commit(
        &self,
        world: &World,
        drafts: Vec<EventDraft>,
        sequence: &mut Sequence,
        committed: &mut Vec<Event>,
    ) -> Result<World> {
        for draft in &drafts {
            self.catalog.check(&draft.kind)?;
        }
        for draft in drafts {
            committed.push(draft.stamp(sequence));
        }
        Ok(world.clone())
    }
}

/// Drops mutation drafts from phases that must not change the world.
fn narrative_only(action: &ActionId, drafts: Vec<EventDraft>) -> Vec<EventDraft> {
    drafts
        .into_iter()
        .filter(|d| {
            if d.kind.is_mutation() {
                error!(%action, "mutation emitted outside execute was dropped");
                false
            } else {
                true
            }
        })
        .collect()
}
