//! Going, looking, examining, inventory, waiting, and sleeping.

use parlance_foundation::{ActionId, EntityId, Error, Result, Value};
use parlance_world::{TraitKind, World};

use super::entity_list;
use crate::action::{Action, ActionContext, ReasonCode, ValidationResult};
use crate::event::{EventDraft, EventKind, Mutation, Role};
use crate::scope::ScopeResolver;

/// Describes `room` as `actor` sees it.
fn describe_room(ctx: &ActionContext<'_>, room: EntityId) -> EventDraft {
    let world = ctx.world();
    let scope = ScopeResolver::new(world);
    let lit = scope.is_lit(room);
    let mut draft = ctx
        .event(EventKind::RoomDescribed)
        .with(Role::Room, room)
        .with_data("lit", lit);
    if lit {
        let visible = world
            .contents(room)
            .filter(|&e| e != ctx.actor() && scope.can_see(ctx.actor(), e));
        let exits: Vec<Value> = world
            .entity(room)
            .and_then(|e| e.room())
            .map(|r| r.exits.keys().map(|d| Value::from(d.name())).collect())
            .unwrap_or_default();
        draft = draft
            .with_data("contents", entity_list(visible))
            .with_data("exits", Value::List(exits));
    }
    draft
}

fn current_room(world: &World, actor: EntityId) -> Result<EntityId> {
    world
        .containing_room(actor)
        .ok_or_else(|| Error::internal("actor is not in a room"))
}

// =============================================================================
// Going
// =============================================================================

/// Moves the actor through an exit.
pub struct Going;

impl Going {
    fn destination(ctx: &ActionContext<'_>) -> Option<EntityId> {
        let direction = ctx.command().command.direction?;
        let room = ctx.world().containing_room(ctx.actor())?;
        ctx.world()
            .entity(room)?
            .room()?
            .exits
            .get(&direction)
            .copied()
    }
}

impl Action for Going {
    fn id(&self) -> ActionId {
        ActionId::new("going")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        let Some(direction) = ctx.command().command.direction else {
            return ValidationResult::invalid(ReasonCode::NoExit);
        };
        match Self::destination(ctx) {
            Some(_) => ValidationResult::Valid,
            None => ValidationResult::invalid(ReasonCode::NoExit)
                .with_param("direction", direction.name()),
        }
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        let origin = current_room(ctx.world(), ctx.actor())?;
        let destination =
            Self::destination(ctx).ok_or_else(|| Error::internal("exit vanished"))?;
        ctx.scratch_mut().remember("origin", origin);
        let actor = ctx.actor();
        ctx.mutate(Mutation::Move {
            entity: actor,
            destination,
        });
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        let Some(room) = ctx.world().containing_room(ctx.actor()) else {
            return Vec::new();
        };
        let mut went = ctx.event(EventKind::Went).with(Role::Destination, room);
        if let Some(origin) = ctx.scratch().recall_entity("origin") {
            went = went.with(Role::Origin, origin);
        }
        if let Some(direction) = ctx.command().command.direction {
            went = went.with_data("direction", direction.name());
        }
        vec![went, describe_room(ctx, room)]
    }
}

// =============================================================================
// Looking and examining
// =============================================================================

/// Describes the actor's surroundings.
pub struct Looking;

impl Action for Looking {
    fn id(&self) -> ActionId {
        ActionId::new("looking")
    }

    fn validate(&self, _ctx: &ActionContext<'_>) -> ValidationResult {
        ValidationResult::Valid
    }

    fn execute(&self, _ctx: &mut ActionContext<'_>) -> Result<()> {
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        ctx.world()
            .containing_room(ctx.actor())
            .map(|room| describe_room(ctx, room))
            .into_iter()
            .collect()
    }
}

/// Describes one thing closely.
pub struct Examining;

impl Action for Examining {
    fn id(&self) -> ActionId {
        ActionId::new("examining")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        match ctx.direct() {
            Some(target) if ScopeResolver::new(ctx.world()).can_see(ctx.actor(), target) => {
                ValidationResult::Valid
            }
            _ => ValidationResult::invalid(ReasonCode::NotVisible),
        }
    }

    fn execute(&self, _ctx: &mut ActionContext<'_>) -> Result<()> {
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        let Some(target) = ctx.direct() else {
            return Vec::new();
        };
        let world = ctx.world();
        let scope = ScopeResolver::new(world);
        let mut examined = ctx.event(EventKind::Examined).with(Role::Target, target);
        if let Some(identity) = world.identity(target) {
            examined = examined.with_data("description", identity.description.as_str());
        }
        for (kind, field) in [
            (TraitKind::Openable, "open"),
            (TraitKind::Lockable, "locked"),
            (TraitKind::Switchable, "on"),
        ] {
            if let Some(value) = world.field(target, &kind, field) {
                examined = examined.with_data(field, value);
            }
        }
        let holds = world.has_trait(target, &TraitKind::Container)
            || world.has_trait(target, &TraitKind::Supporter);
        if holds {
            let seen = world
                .contents(target)
                .filter(|&e| scope.can_see(ctx.actor(), e));
            examined = examined.with_data("contents", entity_list(seen));
        }
        vec![examined]
    }
}

/// Lists what the actor carries.
pub struct Inventory;

impl Action for Inventory {
    fn id(&self) -> ActionId {
        ActionId::new("inventory")
    }

    fn validate(&self, _ctx: &ActionContext<'_>) -> ValidationResult {
        ValidationResult::Valid
    }

    fn execute(&self, _ctx: &mut ActionContext<'_>) -> Result<()> {
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        let items = entity_list(ctx.world().contents(ctx.actor()));
        vec![ctx.event(EventKind::InventoryListed).with_data("items", items)]
    }
}

// =============================================================================
// Passing time
// =============================================================================

/// Lets a turn pass.
pub struct Waiting;

impl Action for Waiting {
    fn id(&self) -> ActionId {
        ActionId::new("waiting")
    }

    fn validate(&self, _ctx: &ActionContext<'_>) -> ValidationResult {
        ValidationResult::Valid
    }

    fn execute(&self, _ctx: &mut ActionContext<'_>) -> Result<()> {
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        vec![ctx.event(EventKind::Waited)]
    }
}

/// Dozes off for a turn.
pub struct Sleeping;

impl Action for Sleeping {
    fn id(&self) -> ActionId {
        ActionId::new("sleeping")
    }

    fn validate(&self, _ctx: &ActionContext<'_>) -> ValidationResult {
        ValidationResult::Valid
    }

    fn execute(&self, _ctx: &mut ActionContext<'_>) -> Result<()> {
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        vec![ctx.event(EventKind::Slept)]
    }
}
