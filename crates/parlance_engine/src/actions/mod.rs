//! Standard actions.
//!
//! Organized by category:
//! - Object handling (taking, dropping, putting)
//! - Devices (opening, closing, locking, unlocking, switching)
//! - Movement and perception (going, looking, examining, inventory)
//! - Passing time (waiting, sleeping)
//! - Meta (saving, restoring, restarting, undoing)

mod devices;
mod handling;
mod meta;
mod perception;

pub use devices::{Closing, Locking, Opening, SwitchingOff, SwitchingOn, Unlocking};
pub use handling::{Dropping, Putting, Taking};
pub use meta::{Restarting, Restoring, Saving, Undoing};
pub use perception::{Examining, Going, Inventory, Looking, Sleeping, Waiting};

use parlance_foundation::{EntityId, ScopeLevel, Value};
use parlance_world::{TraitKind, World};

use crate::action::{ActionRegistry, ReasonCode, ValidationResult};
use crate::scope::ScopeResolver;

/// Registers every standard action.
pub fn register_standard(registry: &mut ActionRegistry) {
    registry
        .register(Taking)
        .register(Dropping)
        .register(Putting)
        .register(Opening)
        .register(Closing)
        .register(Locking)
        .register(Unlocking)
        .register(SwitchingOn)
        .register(SwitchingOff)
        .register(Going)
        .register(Looking)
        .register(Examining)
        .register(Inventory)
        .register(Waiting)
        .register(Sleeping)
        .register(Saving)
        .register(Restoring)
        .register(Restarting)
        .register(Undoing);
}

/// Returns a registry holding every standard action.
#[must_use]
pub fn standard_actions() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    register_standard(&mut registry);
    registry
}

// =============================================================================
// Shared checks
// =============================================================================

/// Refuses unless `actor` can reach `target`.
fn require_reach(world: &World, actor: EntityId, target: EntityId) -> Option<ValidationResult> {
    let level = ScopeResolver::new(world).level(actor, target);
    if level.at_least(ScopeLevel::Reachable) {
        None
    } else if level.at_least(ScopeLevel::Visible) {
        Some(ValidationResult::invalid(ReasonCode::NotReachable))
    } else {
        Some(ValidationResult::invalid(ReasonCode::NotVisible))
    }
}

fn is_open(world: &World, entity: EntityId) -> bool {
    world.flag(entity, &TraitKind::Openable, "open")
}

fn is_closed(world: &World, entity: EntityId) -> bool {
    world.has_trait(entity, &TraitKind::Openable) && !is_open(world, entity)
}

fn entity_list(entities: impl IntoIterator<Item = EntityId>) -> Value {
    Value::List(entities.into_iter().map(Value::Entity).collect())
}

#[cfg(test)]
pub(crate) mod fixture {
    use parlance_foundation::{ActionId, Direction, EntityId, PatternId, ScopeLevel, Sequence};
    use parlance_parser::{Manner, ParsedCommand};
    use parlance_world::{
        Actor, Container, Gender, Identity, Supporter, Trait, World, WorldBuilder,
    };

    use crate::action::{ActionPipeline, ActionStatus, PipelineOutcome};
    use crate::validator::{Binding, ResolvedCommand, SlotBinding};

    /// A small house used by the action tests.
    pub struct House {
        pub world: World,
        pub player: EntityId,
        pub hall: EntityId,
        pub garden: EntityId,
        pub lamp: EntityId,
        pub chest: EntityId,
        pub coin: EntityId,
        pub table: EntityId,
        pub key: EntityId,
        pub statue: EntityId,
    }

    pub fn house() -> House {
        let mut b = WorldBuilder::new();
        let hall = b.room("Hall", "A draughty hall.").unwrap();
        let garden = b.room("Garden", "Roses everywhere.").unwrap();
        b.connect(hall, Direction::North, garden).unwrap();
        let player = b
            .add(
                [
                    Trait::Identity(Identity::new("you").proper()),
                    Trait::Actor(Actor {
                        player: true,
                        gender: Gender::Neuter,
                    }),
                ],
                hall,
            )
            .unwrap();
        let lamp = b
            .add(
                [
                    Trait::Identity(Identity::new("lamp")),
                    Trait::Switchable { on: false },
                    Trait::LightSource,
                ],
                player,
            )
            .unwrap();
        let key = b
            .thing(Identity::new("key").with_adjective("iron"), player)
            .unwrap();
        let chest = b
            .add(
                [
                    Trait::Identity(Identity::new("chest")),
                    Trait::Container(Container::default()),
                    Trait::Openable { open: false },
                    Trait::Lockable {
                        locked: true,
                        key: Some(key),
                    },
                ],
                hall,
            )
            .unwrap();
        let coin = b.thing(Identity::new("coin"), chest).unwrap();
        let table = b
            .add(
                [
                    Trait::Identity(Identity::new("table")),
                    Trait::Supporter(Supporter { capacity: Some(1) }),
                ],
                hall,
            )
            .unwrap();
        let statue = b
            .add([Trait::Identity(Identity::new("statue")), Trait::Scenery], hall)
            .unwrap();
        House {
            world: b.build(),
            player,
            hall,
            garden,
            lamp,
            chest,
            coin,
            table,
            key,
            statue,
        }
    }

    pub fn command(action: &str, actor: EntityId, targets: &[EntityId]) -> ResolvedCommand {
        let bindings = targets
            .iter()
            .enumerate()
            .map(|(i, &e)| Binding {
                slot: if i == 0 { "noun".into() } else { "second".into() },
                position: i,
                target: SlotBinding::One(e),
                level: ScopeLevel::Reachable,
                score: 10,
            })
            .collect();
        ResolvedCommand {
            command: ParsedCommand {
                action: ActionId::new(action),
                pattern: PatternId(0),
                priority: 0,
                verb: action.into(),
                slots: Vec::new(),
                direction: None,
                preposition: None,
                preposition_implicit: false,
                manner: Manner::Normal,
                text: None,
                input: action.into(),
            },
            actor,
            bindings,
        }
    }

    pub fn run(world: &World, command: &ResolvedCommand) -> PipelineOutcome {
        let registry = super::standard_actions();
        let action = registry.get(command.action()).unwrap();
        ActionPipeline::default()
            .run(action.as_ref(), command, world, &mut Sequence::new())
            .unwrap()
    }

    pub fn blocked_reason(outcome: &PipelineOutcome) -> Option<&str> {
        match &outcome.status {
            ActionStatus::Blocked(reason) => Some(reason.name()),
            _ => None,
        }
    }
}
