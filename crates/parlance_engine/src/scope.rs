//! Graded visibility and reachability.
//!
//! The resolver answers "how well can `observer` perceive `target`?" with a
//! [`ScopeLevel`]. Levels are computed on demand from the containment forest
//! and are never stored, so they always reflect the current world.
//!
//! Both the target and the observer are walked upwards until their chains
//! meet. Along either half of the way:
//!
//! - a closed opaque container blocks sight (and reach);
//! - a closed transparent container blocks reach only;
//! - an `OutOfReach` entity on the target's side blocks reach;
//! - a dark room with no active light in view blocks sight.
//!
//! When sight is blocked the target is `Aware` if it makes noise or smells
//! (actors always make noise), otherwise `Unaware`. Any scope override the
//! target declares for the observer's room acts as a floor.

use parlance_foundation::{EntityId, ScopeLevel};
use parlance_world::{Trait, TraitKind, World};

/// What a chain walk found between two entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Path {
    sight: bool,
    reach: bool,
}

/// Computes scope levels against one world state.
#[derive(Clone, Copy, Debug)]
pub struct ScopeResolver<'w> {
    world: &'w World,
}

impl<'w> ScopeResolver<'w> {
    /// Creates a resolver over `world`.
    #[must_use]
    pub fn new(world: &'w World) -> Self {
        Self { world }
    }

    /// Returns the scope level of `target` for `observer`.
    #[must_use]
    pub fn level(&self, observer: EntityId, target: EntityId) -> ScopeLevel {
        let world = self.world;
        if !world.exists(observer) || !world.exists(target) || target.is_limbo() {
            return ScopeLevel::Unaware;
        }
        let Some(room) = world.containing_room(observer) else {
            return ScopeLevel::Unaware;
        };
        let computed = self.computed_level(observer, target, room);
        match world.scope_override(target, room) {
            Some(floor) => computed.max(floor),
            None => computed,
        }
    }

    fn computed_level(&self, observer: EntityId, target: EntityId, room: EntityId) -> ScopeLevel {
        let world = self.world;
        if target == observer {
            return ScopeLevel::Reachable;
        }
        if world.location(target) == Some(observer) {
            return ScopeLevel::Carried;
        }
        if world.containing_room(target) != Some(room) {
            return ScopeLevel::Unaware;
        }

        let enclosing: Vec<EntityId> = world.ancestors(observer).collect();
        let (meeting, inward) = self.inward(target, observer, &enclosing);
        let outward = self.outward(&enclosing, meeting);
        let path = Path {
            sight: inward.sight && outward.sight,
            reach: inward.reach && outward.reach,
        };
        let lit = self.is_lit_for(observer, room);

        if target == room {
            return if path.sight && lit {
                ScopeLevel::Visible
            } else {
                ScopeLevel::Aware
            };
        }

        // Things the observer holds are found by touch even in the dark.
        let held = meeting == observer;
        let sight = path.sight && (held || lit);
        match (sight, path.reach) {
            (true, true) => ScopeLevel::Reachable,
            (true, false) => ScopeLevel::Visible,
            (false, true) if held => ScopeLevel::Reachable,
            _ if self.is_perceptible(target) => ScopeLevel::Aware,
            _ => ScopeLevel::Unaware,
        }
    }

    /// Walks up from `target` until it meets the observer or one of the
    /// observer's holders, noting what lies strictly below that point.
    fn inward(&self, target: EntityId, observer: EntityId, enclosing: &[EntityId]) -> (EntityId, Path) {
        let world = self.world;
        let mut path = Path {
            sight: true,
            reach: true,
        };
        for current in std::iter::once(target).chain(world.ancestors(target)) {
            if current == observer || enclosing.contains(&current) {
                return (current, path);
            }
            if world.has_trait(current, &TraitKind::OutOfReach) {
                path.reach = false;
            }
            if current != target {
                self.cross(current, &mut path);
            }
        }
        (enclosing.last().copied().unwrap_or(observer), path)
    }

    /// Notes the observer's own holders below `meeting`: the way out.
    fn outward(&self, enclosing: &[EntityId], meeting: EntityId) -> Path {
        let mut path = Path {
            sight: true,
            reach: true,
        };
        for &holder in enclosing.iter().take_while(|&&h| h != meeting) {
            self.cross(holder, &mut path);
        }
        path
    }

    fn cross(&self, holder: EntityId, path: &mut Path) {
        if self.is_closed(holder) {
            path.reach = false;
            if !self.is_transparent(holder) {
                path.sight = false;
            }
        }
    }

    /// Checks if light can travel from `entity` up to `ceiling` (or its room).
    fn shines_up_to(&self, entity: EntityId, ceiling: EntityId) -> bool {
        let world = self.world;
        let mut path = Path {
            sight: true,
            reach: true,
        };
        for holder in world.ancestors(entity) {
            if holder == ceiling || world.is_room(holder) {
                break;
            }
            self.cross(holder, &mut path);
        }
        path.sight
    }

    /// Returns the innermost closed opaque container around `observer`.
    fn enclosure(&self, observer: EntityId) -> Option<EntityId> {
        let world = self.world;
        world
            .ancestors(observer)
            .take_while(|&h| !world.is_room(h))
            .find(|&h| self.is_closed(h) && !self.is_transparent(h))
    }

    /// Checks if the observer has light: the room is lit, or a light shines
    /// inside the container the observer is shut in.
    fn is_lit_for(&self, observer: EntityId, room: EntityId) -> bool {
        if self.is_lit(room) {
            return true;
        }
        let Some(space) = self.enclosure(observer) else {
            return false;
        };
        let world = self.world;
        world.with_trait(&TraitKind::LightSource).any(|light| {
            self.is_shining(light) && world.is_within(light, space) && self.shines_up_to(light, space)
        })
    }

    fn is_closed(&self, entity: EntityId) -> bool {
        matches!(
            self.world.get_trait(entity, &TraitKind::Openable),
            Some(Trait::Openable { open: false })
        )
    }

    fn is_transparent(&self, entity: EntityId) -> bool {
        match self.world.get_trait(entity, &TraitKind::Container) {
            Some(Trait::Container(c)) => c.transparent,
            // A closed non-container (a door, say) holds nothing inside.
            _ => true,
        }
    }

    /// Checks if an entity can be sensed without being seen.
    fn is_perceptible(&self, entity: EntityId) -> bool {
        let world = self.world;
        if world.has_trait(entity, &TraitKind::Actor) {
            return true;
        }
        matches!(
            world.get_trait(entity, &TraitKind::Sensory),
            Some(Trait::Sensory { audible, scented }) if *audible || *scented
        )
    }

    /// Checks if a light source is giving off light.
    #[must_use]
    pub fn is_shining(&self, entity: EntityId) -> bool {
        self.world.has_trait(entity, &TraitKind::LightSource)
            && !matches!(
                self.world.get_trait(entity, &TraitKind::Switchable),
                Some(Trait::Switchable { on: false })
            )
    }

    /// Checks if a room is lit: not dark, or holding a shining light that
    /// is not shut away in an opaque container.
    #[must_use]
    pub fn is_lit(&self, room: EntityId) -> bool {
        let world = self.world;
        match world.get_trait(room, &TraitKind::Room) {
            Some(Trait::Room(r)) if !r.dark => return true,
            Some(_) => {}
            None => return false,
        }
        world.with_trait(&TraitKind::LightSource).any(|light| {
            self.is_shining(light)
                && world.containing_room(light) == Some(room)
                && (light == room || self.shines_up_to(light, room))
        })
    }

    /// Checks if `observer` can see `target`.
    #[must_use]
    pub fn can_see(&self, observer: EntityId, target: EntityId) -> bool {
        self.level(observer, target).at_least(ScopeLevel::Visible)
    }

    /// Checks if `observer` can touch `target`.
    #[must_use]
    pub fn can_reach(&self, observer: EntityId, target: EntityId) -> bool {
        self.level(observer, target).at_least(ScopeLevel::Reachable)
    }

    /// Returns every entity at or above `min` for `observer`, in id order.
    ///
    /// The observer itself is not included.
    #[must_use]
    pub fn in_scope(&self, observer: EntityId, min: ScopeLevel) -> Vec<(EntityId, ScopeLevel)> {
        self.world
            .entities()
            .filter(|&e| e != observer && !e.is_limbo())
            .map(|e| (e, self.level(observer, e)))
            .filter(|(_, level)| level.at_least(min) && *level > ScopeLevel::Unaware)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlance_world::{Actor, Container, Gender, Identity, Room, WorldBuilder};

    struct Fixture {
        world: World,
        player: EntityId,
        hall: EntityId,
        cellar: EntityId,
        chest: EntityId,
        coin: EntityId,
        jar: EntityId,
        moth: EntityId,
    }

    fn fixture() -> Fixture {
        let mut b = WorldBuilder::new();
        let hall = b.room("Hall", "A hall.").unwrap();
        let cellar = b.room("Cellar", "A cellar.").unwrap();
        b.with(cellar, Trait::Room(Room::new().dark())).unwrap();
        let player = b
            .add(
                [
                    Trait::Identity(Identity::new("yourself")),
                    Trait::Actor(Actor {
                        player: true,
                        gender: Gender::Neuter,
                    }),
                ],
                hall,
            )
            .unwrap();
        let chest = b
            .add(
                [
                    Trait::Identity(Identity::new("chest")),
                    Trait::Container(Container::default()),
                    Trait::Openable { open: false },
                ],
                hall,
            )
            .unwrap();
        let coin = b.thing(Identity::new("coin"), chest).unwrap();
        let jar = b
            .add(
                [
                    Trait::Identity(Identity::new("jar")),
                    Trait::Container(Container {
                        capacity: None,
                        transparent: true,
                    }),
                    Trait::Openable { open: false },
                ],
                hall,
            )
            .unwrap();
        let moth = b
            .add(
                [
                    Trait::Identity(Identity::new("moth")),
                    Trait::Sensory {
                        audible: true,
                        scented: false,
                    },
                ],
                jar,
            )
            .unwrap();
        Fixture {
            world: b.build(),
            player,
            hall,
            cellar,
            chest,
            coin,
            jar,
            moth,
        }
    }

    #[test]
    fn carried_and_room_contents() {
        let f = fixture();
        let world = f.world.move_entity(f.coin, f.player).unwrap();
        let scope = ScopeResolver::new(&world);
        assert_eq!(scope.level(f.player, f.coin), ScopeLevel::Carried);
        assert_eq!(scope.level(f.player, f.chest), ScopeLevel::Reachable);
        assert_eq!(scope.level(f.player, f.hall), ScopeLevel::Visible);
    }

    #[test]
    fn closed_containers_block() {
        let f = fixture();
        let scope = ScopeResolver::new(&f.world);
        // Opaque and silent: nothing to perceive.
        assert_eq!(scope.level(f.player, f.coin), ScopeLevel::Unaware);
        // Transparent: seen but not touched.
        assert_eq!(scope.level(f.player, f.moth), ScopeLevel::Visible);
        assert!(scope.can_see(f.player, f.moth));
        assert!(!scope.can_reach(f.player, f.moth));

        let opened = f
            .world
            .set_trait(f.chest, Trait::Openable { open: true })
            .unwrap();
        assert_eq!(
            ScopeResolver::new(&opened).level(f.player, f.coin),
            ScopeLevel::Reachable
        );
    }

    #[test]
    fn sound_gives_awareness() {
        let f = fixture();
        let world = f
            .world
            .set_trait(
                f.jar,
                Trait::Container(Container {
                    capacity: None,
                    transparent: false,
                }),
            )
            .unwrap();
        assert_eq!(
            ScopeResolver::new(&world).level(f.player, f.moth),
            ScopeLevel::Aware
        );
    }

    #[test]
    fn other_rooms_are_out_of_scope() {
        let f = fixture();
        let world = f.world.move_entity(f.chest, f.cellar).unwrap();
        let scope = ScopeResolver::new(&world);
        assert_eq!(scope.level(f.player, f.cellar), ScopeLevel::Unaware);
        assert_eq!(scope.level(f.player, f.chest), ScopeLevel::Unaware);
    }

    #[test]
    fn darkness_and_light() {
        let f = fixture();
        let (world, lamp) = f
            .world
            .spawn_in(
                [
                    Trait::Identity(Identity::new("lamp")),
                    Trait::LightSource,
                    Trait::Switchable { on: false },
                ],
                f.player,
            )
            .unwrap();
        let world = world.move_entity(f.player, f.cellar).unwrap();
        let world = world.move_entity(f.chest, f.cellar).unwrap();
        let dark = ScopeResolver::new(&world);
        assert!(!dark.is_lit(f.cellar));
        assert!(!dark.can_see(f.player, f.chest));
        // Carried things are still in hand.
        assert_eq!(dark.level(f.player, lamp), ScopeLevel::Carried);

        let lit_world = world
            .set_trait(lamp, Trait::Switchable { on: true })
            .unwrap();
        let lit = ScopeResolver::new(&lit_world);
        assert!(lit.is_lit(f.cellar));
        assert!(lit.can_reach(f.player, f.chest));
    }

    #[test]
    fn out_of_reach() {
        let f = fixture();
        let (world, bird) = f
            .world
            .spawn_in(
                [Trait::Identity(Identity::new("bird")), Trait::OutOfReach],
                f.hall,
            )
            .unwrap();
        assert_eq!(
            ScopeResolver::new(&world).level(f.player, bird),
            ScopeLevel::Visible
        );
    }

    #[test]
    fn override_is_a_floor_in_its_room_only() {
        let f = fixture();
        let world = f
            .world
            .set_scope_override(f.coin, f.hall, Some(ScopeLevel::Visible))
            .unwrap();
        let scope = ScopeResolver::new(&world);
        assert_eq!(scope.level(f.player, f.coin), ScopeLevel::Visible);

        let moved = world.move_entity(f.player, f.cellar).unwrap();
        assert_eq!(
            ScopeResolver::new(&moved).level(f.player, f.coin),
            ScopeLevel::Unaware
        );
    }

    #[test]
    fn a_shut_observer_sees_inside_not_out() {
        let f = fixture();
        let (world, wardrobe) = f
            .world
            .spawn_in(
                [
                    Trait::Identity(Identity::new("wardrobe")),
                    Trait::Container(Container::default()),
                    Trait::Openable { open: false },
                ],
                f.hall,
            )
            .unwrap();
        let (world, coat) = world.spawn_in([Trait::Identity(Identity::new("coat"))], wardrobe).unwrap();
        let world = world.move_entity(f.player, wardrobe).unwrap();
        let scope = ScopeResolver::new(&world);
        assert_eq!(scope.level(f.player, coat), ScopeLevel::Reachable);
        assert_eq!(scope.level(f.player, wardrobe), ScopeLevel::Reachable);
        assert_eq!(scope.level(f.player, f.chest), ScopeLevel::Unaware);
        assert_eq!(scope.level(f.player, f.hall), ScopeLevel::Aware);
        // The moth still buzzes.
        assert_eq!(scope.level(f.player, f.moth), ScopeLevel::Aware);
    }

    #[test]
    fn in_scope_excludes_observer_and_unaware() {
        let f = fixture();
        let scope = ScopeResolver::new(&f.world);
        let found: Vec<EntityId> = scope
            .in_scope(f.player, ScopeLevel::Aware)
            .into_iter()
            .map(|(e, _)| e)
            .collect();
        assert!(found.contains(&f.chest));
        assert!(found.contains(&f.moth));
        assert!(found.contains(&f.hall));
        assert!(!found.contains(&f.player));
        assert!(!found.contains(&f.coin));
    }
}
