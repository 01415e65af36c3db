//! A small house shared by the engine tests.

use parlance_foundation::{Direction, EntityId};
use parlance_world::{Actor, Container, Gender, Identity, Room, Supporter, Trait, World, WorldBuilder};

pub struct House {
    pub world: World,
    pub player: EntityId,
    pub hall: EntityId,
    pub cellar: EntityId,
    pub iron_key: EntityId,
    pub brass_key: EntityId,
    pub chest: EntityId,
    pub coin: EntityId,
    pub jar: EntityId,
    pub marble: EntityId,
    pub shelf: EntityId,
    pub vase: EntityId,
    pub lamp: EntityId,
}

/// Hall (lit) with keys, a locked chest, a glass jar, and a high shelf.
/// The cellar below is dark; the lamp starts off, in the hall.
pub fn house() -> House {
    let mut b = WorldBuilder::new();
    let hall = b.room("Hall", "A draughty hall.").unwrap();
    let cellar = b.room("Cellar", "Damp stone.").unwrap();
    b.with(cellar, Trait::Room(Room::new().dark())).unwrap();
    b.connect(hall, Direction::Down, cellar).unwrap();

    let player = b
        .add(
            [
                Trait::Identity(Identity::new("yourself").proper()),
                Trait::Actor(Actor {
                    player: true,
                    gender: Gender::Neuter,
                }),
            ],
            hall,
        )
        .unwrap();
    let iron_key = b
        .thing(Identity::new("key").with_adjective("iron"), hall)
        .unwrap();
    let brass_key = b
        .thing(Identity::new("key").with_adjective("brass"), hall)
        .unwrap();
    let chest = b
        .add(
            [
                Trait::Identity(Identity::new("chest")),
                Trait::Container(Container::default()),
                Trait::Openable { open: false },
                Trait::Lockable {
                    locked: true,
                    key: Some(iron_key),
                },
            ],
            hall,
        )
        .unwrap();
    let coin = b.thing(Identity::new("coin"), chest).unwrap();
    let jar = b
        .add(
            [
                Trait::Identity(Identity::new("jar").with_adjective("glass")),
                Trait::Container(Container {
                    capacity: None,
                    transparent: true,
                }),
                Trait::Openable { open: false },
            ],
            hall,
        )
        .unwrap();
    let marble = b.thing(Identity::new("marble"), jar).unwrap();
    let shelf = b
        .add(
            [
                Trait::Identity(Identity::new("shelf").with_adjective("high")),
                Trait::Supporter(Supporter::default()),
                Trait::Scenery,
                Trait::OutOfReach,
            ],
            hall,
        )
        .unwrap();
    let vase = b.thing(Identity::new("vase"), shelf).unwrap();
    let lamp = b
        .add(
            [
                Trait::Identity(Identity::new("lamp")),
                Trait::LightSource,
                Trait::Switchable { on: false },
            ],
            hall,
        )
        .unwrap();

    House {
        world: b.build(),
        player,
        hall,
        cellar,
        iron_key,
        brass_key,
        chest,
        coin,
        jar,
        marble,
        shelf,
        vase,
        lamp,
    }
}
