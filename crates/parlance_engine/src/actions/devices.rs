//! Opening, closing, locking, and switching.

use parlance_foundation::{ActionId, EntityId, Result, Value};
use parlance_world::{Trait, TraitKind, World};

use super::{entity_list, is_open, require_reach};
use crate::action::{Action, ActionContext, ReasonCode, ValidationResult};
use crate::event::{EventDraft, EventKind, Mutation, Role};
use crate::scope::ScopeResolver;

fn set_flag(ctx: &mut ActionContext<'_>, kind: TraitKind, field: &str, on: bool) -> Result<()> {
    let entity = ctx.require_direct()?;
    ctx.mutate(Mutation::SetField {
        entity,
        kind,
        field: field.into(),
        value: Value::Bool(on),
    });
    Ok(())
}

fn target_event(ctx: &ActionContext<'_>, kind: EventKind) -> EventDraft {
    let draft = ctx.event(kind);
    match ctx.direct() {
        Some(target) => draft.with(Role::Target, target),
        None => draft,
    }
}

// =============================================================================
// Opening and closing
// =============================================================================

/// Opens something openable.
pub struct Opening;

impl Action for Opening {
    fn id(&self) -> ActionId {
        ActionId::new("opening")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        let Some(target) = ctx.direct() else {
            return ValidationResult::invalid(ReasonCode::NotVisible);
        };
        let world = ctx.world();
        if !world.has_trait(target, &TraitKind::Openable) {
            return ValidationResult::invalid(ReasonCode::NotOpenable);
        }
        if is_open(world, target) {
            return ValidationResult::invalid(ReasonCode::AlreadyOpen);
        }
        if world.flag(target, &TraitKind::Lockable, "locked") {
            return ValidationResult::invalid(ReasonCode::Locked);
        }
        require_reach(world, ctx.actor(), target).unwrap_or(ValidationResult::Valid)
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        set_flag(ctx, TraitKind::Openable, "open", true)
    }

    /// Opening a container lists what is now in view.
    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        let mut opened = target_event(ctx, EventKind::Opened);
        if let Some(target) = ctx.direct() {
            if ctx.world().has_trait(target, &TraitKind::Container) {
                opened = opened.with_data("revealed", entity_list(ctx.world().contents(target)));
            }
        }
        vec![opened]
    }
}

/// Closes something openable.
pub struct Closing;

impl Action for Closing {
    fn id(&self) -> ActionId {
        ActionId::new("closing")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        let Some(target) = ctx.direct() else {
            return ValidationResult::invalid(ReasonCode::NotVisible);
        };
        let world = ctx.world();
        if !world.has_trait(target, &TraitKind::Openable) {
            return ValidationResult::invalid(ReasonCode::NotOpenable);
        }
        if !is_open(world, target) {
            return ValidationResult::invalid(ReasonCode::AlreadyClosed);
        }
        if world.is_within(ctx.actor(), target) {
            return ValidationResult::invalid(ReasonCode::Recursive);
        }
        require_reach(world, ctx.actor(), target).unwrap_or(ValidationResult::Valid)
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        set_flag(ctx, TraitKind::Openable, "open", false)
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        vec![target_event(ctx, EventKind::Closed)]
    }
}

// =============================================================================
// Locking
// =============================================================================

/// The key named in the command, or the carried key that fits.
///
/// Returns the key and whether it was picked without being named.
fn choose_key(
    ctx: &ActionContext<'_>,
    lock: EntityId,
) -> std::result::Result<(EntityId, bool), ReasonCode> {
    let world = ctx.world();
    let fits = match world.get_trait(lock, &TraitKind::Lockable) {
        Some(Trait::Lockable { key, .. }) => *key,
        _ => return Err(ReasonCode::NotLockable),
    };
    let actor = ctx.actor();
    match ctx.indirect() {
        Some(named) if !in_hand(world, actor, named) => Err(ReasonCode::NotHeld),
        Some(named) if Some(named) == fits => Ok((named, false)),
        Some(_) => Err(ReasonCode::WrongKey),
        None => fits
            .filter(|&k| in_hand(world, actor, k))
            .map(|k| (k, true))
            .ok_or(ReasonCode::NoKey),
    }
}

/// Carried, directly or in an open bag.
fn in_hand(world: &World, actor: EntityId, key: EntityId) -> bool {
    world.is_within(key, actor) && ScopeResolver::new(world).can_reach(actor, key)
}

fn lock_report(ctx: &ActionContext<'_>, kind: EventKind) -> Vec<EventDraft> {
    let mut draft = target_event(ctx, kind);
    if let Some(Ok((key, implicit))) = ctx.direct().map(|lock| choose_key(ctx, lock)) {
        draft = draft
            .with(Role::Instrument, key)
            .with_data("implicit", implicit);
    }
    vec![draft]
}

fn validate_lock(ctx: &ActionContext<'_>, locking: bool) -> ValidationResult {
    let Some(target) = ctx.direct() else {
        return ValidationResult::invalid(ReasonCode::NotVisible);
    };
    let world: &World = ctx.world();
    if !world.has_trait(target, &TraitKind::Lockable) {
        return ValidationResult::invalid(ReasonCode::NotLockable);
    }
    let locked = world.flag(target, &TraitKind::Lockable, "locked");
    if locking && locked {
        return ValidationResult::invalid(ReasonCode::AlreadyLocked);
    }
    if !locking && !locked {
        return ValidationResult::invalid(ReasonCode::AlreadyUnlocked);
    }
    if locking && is_open(world, target) {
        return ValidationResult::invalid(ReasonCode::NotClosed);
    }
    if let Some(refusal) = require_reach(world, ctx.actor(), target) {
        return refusal;
    }
    match choose_key(ctx, target) {
        Ok(_) => ValidationResult::Valid,
        Err(reason) => ValidationResult::invalid(reason),
    }
}

/// Locks something with its key.
pub struct Locking;

impl Action for Locking {
    fn id(&self) -> ActionId {
        ActionId::new("locking")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        validate_lock(ctx, true)
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        set_flag(ctx, TraitKind::Lockable, "locked", true)
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        lock_report(ctx, EventKind::Locked)
    }
}

/// Unlocks something with its key.
pub struct Unlocking;

impl Action for Unlocking {
    fn id(&self) -> ActionId {
        ActionId::new("unlocking")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        validate_lock(ctx, false)
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        set_flag(ctx, TraitKind::Lockable, "locked", false)
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        lock_report(ctx, EventKind::Unlocked)
    }
}

// =============================================================================
// Switching
// =============================================================================

fn validate_switch(ctx: &ActionContext<'_>, on: bool) -> ValidationResult {
    let Some(target) = ctx.direct() else {
        return ValidationResult::invalid(ReasonCode::NotVisible);
    };
    let world = ctx.world();
    if !world.has_trait(target, &TraitKind::Switchable) {
        return ValidationResult::invalid(ReasonCode::NotSwitchable);
    }
    match (on, world.flag(target, &TraitKind::Switchable, "on")) {
        (true, true) => ValidationResult::invalid(ReasonCode::AlreadyOn),
        (false, false) => ValidationResult::invalid(ReasonCode::AlreadyOff),
        _ => require_reach(world, ctx.actor(), target).unwrap_or(ValidationResult::Valid),
    }
}

/// Turns something on.
pub struct SwitchingOn;

impl Action for SwitchingOn {
    fn id(&self) -> ActionId {
        ActionId::new("switching_on")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        validate_switch(ctx, true)
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        set_flag(ctx, TraitKind::Switchable, "on", true)
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        vec![target_event(ctx, EventKind::SwitchedOn)]
    }
}

/// Turns something off.
pub struct SwitchingOff;

impl Action for SwitchingOff {
    fn id(&self) -> ActionId {
        ActionId::new("switching_off")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        validate_switch(ctx, false)
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        set_flag(ctx, TraitKind::Switchable, "on", false)
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        vec![target_event(ctx, EventKind::SwitchedOff)]
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::{blocked_reason, command, house, run};
    use crate::action::ActionStatus;
    use crate::event::{EventKind, Role};
    use parlance_foundation::Value;
    use parlance_world::{Container, Identity, Trait, TraitKind};

    #[test]
    fn unlock_then_open_reveals_contents() {
        let h = house();
        let outcome = run(&h.world, &command("opening", h.player, &[h.chest]));
        assert_eq!(blocked_reason(&outcome), Some("locked"));

        let outcome = run(&h.world, &command("unlocking", h.player, &[h.chest]));
        assert_eq!(outcome.status, ActionStatus::Succeeded);
        let unlocked = outcome.committed.last().unwrap();
        assert_eq!(unlocked.kind, EventKind::Unlocked);
        assert_eq!(unlocked.entity(Role::Instrument), Some(h.key));
        assert_eq!(unlocked.data("implicit"), Some(&Value::Bool(true)));

        let outcome = run(&outcome.world, &command("opening", h.player, &[h.chest]));
        assert!(outcome.world.flag(h.chest, &TraitKind::Openable, "open"));
        let opened = outcome.committed.last().unwrap();
        assert_eq!(opened.kind, EventKind::Opened);
        assert_eq!(
            opened.data("revealed"),
            Some(&Value::List(vec![Value::Entity(h.coin)]))
        );
    }

    #[test]
    fn opening_an_open_container_is_blocked_once() {
        let h = house();
        let world = h
            .world
            .set_field(h.chest, &TraitKind::Lockable, "locked", Value::Bool(false))
            .and_then(|w| w.set_field(h.chest, &TraitKind::Openable, "open", Value::Bool(true)))
            .unwrap();
        let outcome = run(&world, &command("opening", h.player, &[h.chest]));
        assert_eq!(blocked_reason(&outcome), Some("already_open"));
        assert_eq!(outcome.committed.len(), 1);
        assert_eq!(outcome.committed[0].kind, EventKind::ActionBlocked);
        assert_eq!(outcome.world.snapshot(), world.snapshot());
    }

    #[test]
    fn key_checks() {
        let h = house();
        let outcome = run(&h.world, &command("unlocking", h.player, &[h.chest, h.lamp]));
        assert_eq!(blocked_reason(&outcome), Some("wrong_key"));

        let world = h.world.move_entity(h.key, h.hall).unwrap();
        let outcome = run(&world, &command("unlocking", h.player, &[h.chest]));
        assert_eq!(blocked_reason(&outcome), Some("no_key"));

        let outcome = run(&h.world, &command("locking", h.player, &[h.chest, h.key]));
        assert_eq!(blocked_reason(&outcome), Some("already_locked"));
        let outcome = run(&h.world, &command("locking", h.player, &[h.table]));
        assert_eq!(blocked_reason(&outcome), Some("not_lockable"));
    }

    #[test]
    fn a_key_in_a_carried_bag_still_turns() {
        let h = house();
        let (world, bag) = h
            .world
            .spawn_in(
                [
                    Trait::Identity(Identity::new("bag")),
                    Trait::Container(Container::default()),
                    Trait::Openable { open: true },
                ],
                h.player,
            )
            .unwrap();
        let world = world.move_entity(h.key, bag).unwrap();

        let outcome = run(&world, &command("unlocking", h.player, &[h.chest]));
        assert_eq!(outcome.status, ActionStatus::Succeeded);
        let unlocked = outcome.committed.last().unwrap();
        assert_eq!(unlocked.entity(Role::Instrument), Some(h.key));
        let outcome = run(&world, &command("unlocking", h.player, &[h.chest, h.key]));
        assert_eq!(outcome.status, ActionStatus::Succeeded);

        // Shut away, it is out of hand again.
        let closed = world.set_trait(bag, Trait::Openable { open: false }).unwrap();
        let outcome = run(&closed, &command("unlocking", h.player, &[h.chest]));
        assert_eq!(blocked_reason(&outcome), Some("no_key"));
        let outcome = run(&closed, &command("unlocking", h.player, &[h.chest, h.key]));
        assert_eq!(blocked_reason(&outcome), Some("not_held"));
    }

    #[test]
    fn closing() {
        let h = house();
        let outcome = run(&h.world, &command("closing", h.player, &[h.chest]));
        assert_eq!(blocked_reason(&outcome), Some("already_closed"));
        let outcome = run(&h.world, &command("closing", h.player, &[h.table]));
        assert_eq!(blocked_reason(&outcome), Some("not_openable"));
    }

    #[test]
    fn switching() {
        let h = house();
        let outcome = run(&h.world, &command("switching_on", h.player, &[h.lamp]));
        assert!(outcome.world.flag(h.lamp, &TraitKind::Switchable, "on"));
        assert_eq!(outcome.committed.last().unwrap().kind, EventKind::SwitchedOn);

        let again = run(&outcome.world, &command("switching_on", h.player, &[h.lamp]));
        assert_eq!(blocked_reason(&again), Some("already_on"));
        let off = run(&h.world, &command("switching_off", h.player, &[h.lamp]));
        assert_eq!(blocked_reason(&off), Some("already_off"));
        let chest = run(&h.world, &command("switching_on", h.player, &[h.chest]));
        assert_eq!(blocked_reason(&chest), Some("not_switchable"));
    }
}
