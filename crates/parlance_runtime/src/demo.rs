//! A small demonstration story.
//!
//! Three rooms: a cottage, the garden to its north, and a dark cellar below.
//! There are two keys, a locked chest, a lamp, a wishing well, and a bell
//! tower that can be seen from the garden but never reached.

use parlance_engine::{
    EventDraft, EventKind, EventTag, Role, Session, TurnNotice, TurnSubscriber,
};
use parlance_foundation::{Direction, EntityId, Result, ScopeLevel};
use parlance_world::{
    Actor, Container, Gender, Identity, Room, Supporter, Trait, World, WorldBuilder,
};

use crate::render::Renderer;

/// Custom event tag for the bell.
pub const CHIME: &str = "chime";

/// The demo world and the entities tests care about.
#[derive(Clone, Debug)]
pub struct Demo {
    /// The starting world
    pub world: World,
    /// The player
    pub player: EntityId,
    /// Where the player starts
    pub cottage: EntityId,
    /// North of the cottage
    pub garden: EntityId,
    /// Below the cottage; dark
    pub cellar: EntityId,
    /// Switchable light, on the table
    pub lamp: EntityId,
    /// Opens the chest
    pub iron_key: EntityId,
    /// Opens nothing
    pub brass_key: EntityId,
    /// Locked, in the garden
    pub chest: EntityId,
    /// Inside the chest
    pub coin: EntityId,
    /// Visible from the garden only
    pub tower: EntityId,
}

/// Builds the demo world.
///
/// # Errors
///
/// Returns an error only if the world builder rejects a placement, which
/// would be a bug in this module.
#[allow(clippy::too_many_lines)]
pub fn demo_world() -> Result<Demo> {
    let mut b = WorldBuilder::new();

    let cottage = b.room(
        "Cottage",
        "A snug cottage with whitewashed walls. A door leads north to the \
         garden and a trapdoor opens onto stairs going down.",
    )?;
    let garden = b.room(
        "Garden",
        "Overgrown beds surround an old wishing well. Beyond the hedge, a \
         bell tower rises over the village.",
    )?;
    let cellar = b.room("Cellar", "Cold stone and the smell of damp.")?;
    b.with(cellar, Trait::Room(Room::new().dark()))?;
    let village = b.room("Village", "Rooftops and chimneys.")?;
    b.connect(cottage, Direction::North, garden)?;
    b.connect(cottage, Direction::Down, cellar)?;

    let player = b.add(
        [
            Trait::Identity(Identity::new("yourself").with_alias("me").proper()),
            Trait::Actor(Actor {
                player: true,
                gender: Gender::Neuter,
            }),
        ],
        cottage,
    )?;

    let table = b.add(
        [
            Trait::Identity(
                Identity::new("table")
                    .with_adjective("oak")
                    .with_description("A heavy oak table, scarred by years of use."),
            ),
            Trait::Supporter(Supporter::default()),
            Trait::Scenery,
        ],
        cottage,
    )?;
    let lamp = b.add(
        [
            Trait::Identity(
                Identity::new("lamp")
                    .with_adjective("brass")
                    .with_alias("lantern")
                    .with_description("A brass oil lamp."),
            ),
            Trait::LightSource,
            Trait::Switchable { on: false },
        ],
        table,
    )?;
    let brass_key = b.thing(
        Identity::new("key")
            .with_adjective("brass")
            .with_adjective("small")
            .with_description("A small brass key. It looks ornamental."),
        table,
    )?;
    let iron_key = b.thing(
        Identity::new("key")
            .with_adjective("iron")
            .with_adjective("rusty")
            .with_description("A rusty iron key."),
        cottage,
    )?;

    let chest = b.add(
        [
            Trait::Identity(
                Identity::new("chest")
                    .with_adjective("wooden")
                    .with_description("An iron-bound wooden chest."),
            ),
            Trait::Container(Container::default()),
            Trait::Openable { open: false },
            Trait::Lockable {
                locked: true,
                key: Some(iron_key),
            },
            Trait::Scenery,
        ],
        garden,
    )?;
    let coin = b.thing(
        Identity::new("coin")
            .with_adjective("gold")
            .with_description("A gold coin stamped with a bell."),
        chest,
    )?;
    b.add(
        [
            Trait::Identity(
                Identity::new("well")
                    .with_adjective("wishing")
                    .with_description("Mossy stones ring a deep, dark shaft."),
            ),
            Trait::Container(Container::default()),
            Trait::Scenery,
        ],
        garden,
    )?;
    b.thing(
        Identity::new("bottle")
            .with_adjective("dusty")
            .with_description("An empty bottle furred with dust."),
        cellar,
    )?;
    let tower = b.add(
        [
            Trait::Identity(
                Identity::new("tower")
                    .with_adjective("bell")
                    .with_description("A slate-roofed tower with a great bronze bell."),
            ),
            Trait::Scenery,
            Trait::OutOfReach,
        ],
        village,
    )?;

    let world = b
        .build()
        .set_scope_override(tower, garden, Some(ScopeLevel::Visible))?;

    Ok(Demo {
        world,
        player,
        cottage,
        garden,
        cellar,
        lamp,
        iron_key,
        brass_key,
        chest,
        coin,
        tower,
    })
}

/// Rings the tower bell every few turns.
#[derive(Clone, Debug)]
pub struct BellTower {
    tag: EventTag,
    tower: EntityId,
    every: u64,
}

impl BellTower {
    /// Creates a bell that rings on every `every`th turn.
    #[must_use]
    pub fn new(tag: EventTag, tower: EntityId, every: u64) -> Self {
        Self {
            tag,
            tower,
            every: every.max(1),
        }
    }
}

impl TurnSubscriber for BellTower {
    fn name(&self) -> &str {
        "bell_tower"
    }

    fn on_turn_completed(&self, notice: &TurnNotice<'_>) -> Vec<EventDraft> {
        let chimed = notice
            .events
            .iter()
            .any(|e| e.kind == EventKind::Custom(self.tag.clone()));
        // Turns count from zero; ring after every `every` completed turns.
        if chimed || (notice.turn + 1) % self.every != 0 {
            return Vec::new();
        }
        vec![EventDraft::new(EventKind::Custom(self.tag.clone())).with(Role::Target, self.tower)]
    }
}

/// Builds a session over the demo world, with its bell and text.
///
/// # Errors
///
/// Returns an error if the demo world cannot be built.
pub fn demo_session() -> Result<(Session, Renderer, Demo)> {
    let demo = demo_world()?;
    let mut session = Session::new(demo.world.clone(), demo.player)?;
    let tag = session.catalog_mut().register(CHIME);
    session.subscribe(BellTower::new(tag, demo.tower, 5));
    let renderer = Renderer::new().with_custom(CHIME, "Far off, the bell in {target} chimes.");
    Ok((session, renderer, demo))
}
