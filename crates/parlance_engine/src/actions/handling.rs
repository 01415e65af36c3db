//! Taking, dropping, and putting.

use parlance_foundation::{ActionId, EntityId, Error, Result};
use parlance_world::{TraitKind, World};

use super::{is_closed, require_reach};
use crate::action::{Action, ActionContext, ReasonCode, ValidationResult};
use crate::event::{EventDraft, EventKind, Mutation, Role};

fn full(world: &World, destination: EntityId) -> bool {
    world
        .capacity(destination)
        .is_some_and(|capacity| world.contents(destination).count() >= capacity as usize)
}

/// Moves something into the actor's hands.
pub struct Taking;

impl Action for Taking {
    fn id(&self) -> ActionId {
        ActionId::new("taking")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        let Some(target) = ctx.direct() else {
            return ValidationResult::invalid(ReasonCode::NotVisible);
        };
        let world = ctx.world();
        let actor = ctx.actor();
        if target == actor {
            return ValidationResult::invalid(ReasonCode::SelfReference);
        }
        if world.is_room(target) || world.has_trait(target, &TraitKind::Actor) {
            return ValidationResult::invalid(ReasonCode::NotPortable);
        }
        if world.has_trait(target, &TraitKind::Scenery) {
            return ValidationResult::invalid(ReasonCode::Fixed);
        }
        if world.location(target) == Some(actor) {
            return ValidationResult::invalid(ReasonCode::AlreadyHeld);
        }
        if world.is_within(actor, target) {
            return ValidationResult::invalid(ReasonCode::Recursive);
        }
        if let Some(source) = ctx.indirect() {
            if world.location(target) != Some(source) {
                return ValidationResult::invalid(ReasonCode::NotInside);
            }
        }
        if let Some(refusal) = require_reach(world, actor, target) {
            return refusal;
        }
        if full(world, actor) {
            return ValidationResult::invalid(ReasonCode::NoRoom);
        }
        ValidationResult::Valid
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        let entity = ctx.require_direct()?;
        if let Some(origin) = ctx.world().location(entity) {
            ctx.scratch_mut().remember("origin", origin);
        }
        let destination = ctx.actor();
        ctx.mutate(Mutation::Move {
            entity,
            destination,
        });
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        let mut taken = ctx.event(EventKind::Taken);
        if let Some(target) = ctx.direct() {
            taken = taken.with(Role::Target, target);
        }
        if let Some(origin) = ctx.scratch().recall_entity("origin") {
            taken = taken.with(Role::Origin, origin);
        }
        vec![taken]
    }
}

/// Puts something the actor carries where the actor stands.
pub struct Dropping;

impl Action for Dropping {
    fn id(&self) -> ActionId {
        ActionId::new("dropping")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        match ctx.direct() {
            Some(target) if target == ctx.actor() => {
                ValidationResult::invalid(ReasonCode::SelfReference)
            }
            Some(target) if ctx.world().location(target) == Some(ctx.actor()) => {
                ValidationResult::Valid
            }
            _ => ValidationResult::invalid(ReasonCode::NotHeld),
        }
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        let entity = ctx.require_direct()?;
        let destination = ctx
            .world()
            .location(ctx.actor())
            .ok_or_else(|| Error::internal("actor has no location"))?;
        ctx.mutate(Mutation::Move {
            entity,
            destination,
        });
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        let mut dropped = ctx.event(EventKind::Dropped);
        if let Some(target) = ctx.direct() {
            dropped = dropped.with(Role::Target, target);
            if let Some(place) = ctx.world().location(target) {
                dropped = dropped.with(Role::Destination, place);
            }
        }
        vec![dropped]
    }
}

/// Where [`Putting`] places the object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    In,
    On,
}

/// Puts something the actor carries in or on something else.
pub struct Putting;

impl Putting {
    /// Takes the placement from the preposition, or failing that from what
    /// the destination is.
    fn placement(ctx: &ActionContext<'_>, destination: EntityId) -> Placement {
        match ctx.command().command.preposition.as_deref() {
            Some("in" | "into" | "inside") => Placement::In,
            Some("on" | "onto" | "upon") => Placement::On,
            _ if ctx.world().has_trait(destination, &TraitKind::Supporter)
                && !ctx.world().has_trait(destination, &TraitKind::Container) =>
            {
                Placement::On
            }
            _ => Placement::In,
        }
    }
}

impl Action for Putting {
    fn id(&self) -> ActionId {
        ActionId::new("putting")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        let (Some(target), Some(destination)) = (ctx.direct(), ctx.indirect()) else {
            return ValidationResult::invalid(ReasonCode::NotVisible);
        };
        let world = ctx.world();
        if target == destination {
            return ValidationResult::invalid(ReasonCode::SelfReference);
        }
        if world.location(target) != Some(ctx.actor()) {
            return ValidationResult::invalid(ReasonCode::NotHeld);
        }
        if world.is_within(destination, target) {
            return ValidationResult::invalid(ReasonCode::Recursive);
        }
        match Self::placement(ctx, destination) {
            Placement::In if !world.has_trait(destination, &TraitKind::Container) => {
                return ValidationResult::invalid(ReasonCode::NotContainer);
            }
            Placement::In if is_closed(world, destination) => {
                return ValidationResult::invalid(ReasonCode::ContainerClosed);
            }
            Placement::On if !world.has_trait(destination, &TraitKind::Supporter) => {
                return ValidationResult::invalid(ReasonCode::NotSupporter);
            }
            _ => {}
        }
        if let Some(refusal) = require_reach(world, ctx.actor(), destination) {
            return refusal;
        }
        if full(world, destination) {
            return ValidationResult::invalid(ReasonCode::NoRoom);
        }
        ValidationResult::Valid
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        let entity = ctx.require_direct()?;
        let destination = ctx.require_indirect()?;
        ctx.mutate(Mutation::Move {
            entity,
            destination,
        });
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        let (Some(target), Some(destination)) = (ctx.direct(), ctx.indirect()) else {
            return Vec::new();
        };
        let kind = match Self::placement(ctx, destination) {
            Placement::In => EventKind::PutIn,
            Placement::On => EventKind::PutOn,
        };
        let command = &ctx.command().command;
        vec![
            ctx.event(kind)
                .with(Role::Target, target)
                .with(Role::Destination, destination)
                .with_data("manner", command.manner.name())
                .with_data("verb", command.verb.as_str())
                .with_data("implicit", command.preposition_implicit),
        ]
    }
}
