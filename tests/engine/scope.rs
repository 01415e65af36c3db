//! Scope resolution tests
//!
//! Tests graded visibility across containers, distance, light, and
//! overrides.

use parlance_engine::ScopeResolver;
use parlance_foundation::ScopeLevel;
use parlance_foundation::EntityId;
use parlance_world::{Container, Identity, Trait, TraitKind, World};
use proptest::prelude::*;

use crate::fixture::house;

// =============================================================================
// Containment
// =============================================================================

#[test]
fn loose_things_in_a_lit_room_are_reachable() {
    let h = house();
    let scope = ScopeResolver::new(&h.world);
    assert_eq!(scope.level(h.player, h.iron_key), ScopeLevel::Reachable);
    assert_eq!(scope.level(h.player, h.hall), ScopeLevel::Visible);
    assert_eq!(scope.level(h.player, h.player), ScopeLevel::Reachable);
}

#[test]
fn carried_things_are_carried() {
    let h = house();
    let world = h.world.move_entity(h.iron_key, h.player).unwrap();
    assert_eq!(
        ScopeResolver::new(&world).level(h.player, h.iron_key),
        ScopeLevel::Carried
    );
}

#[test]
fn closed_containers_hide_or_fence_their_contents() {
    let h = house();
    let scope = ScopeResolver::new(&h.world);
    // Opaque chest: nothing to see.
    assert_eq!(scope.level(h.player, h.coin), ScopeLevel::Unaware);
    // Glass jar: seen but not touched.
    assert_eq!(scope.level(h.player, h.marble), ScopeLevel::Visible);

    let opened = h
        .world
        .set_trait(h.chest, Trait::Openable { open: true })
        .unwrap();
    assert_eq!(
        ScopeResolver::new(&opened).level(h.player, h.coin),
        ScopeLevel::Reachable
    );
}

#[test]
fn out_of_reach_blocks_touch_for_everything_on_it() {
    let h = house();
    let scope = ScopeResolver::new(&h.world);
    assert_eq!(scope.level(h.player, h.shelf), ScopeLevel::Visible);
    assert_eq!(scope.level(h.player, h.vase), ScopeLevel::Visible);
    assert!(scope.can_see(h.player, h.vase));
    assert!(!scope.can_reach(h.player, h.vase));
}

#[test]
fn other_rooms_are_out_of_scope() {
    let h = house();
    let world = h.world.move_entity(h.lamp, h.cellar).unwrap();
    assert_eq!(
        ScopeResolver::new(&world).level(h.player, h.lamp),
        ScopeLevel::Unaware
    );
}

/// Shuts the player in a wardrobe in `room` together with a coat.
fn shut_in(world: &World, room: EntityId, player: EntityId, transparent: bool) -> (World, EntityId, EntityId) {
    let (world, wardrobe) = world
        .spawn_in(
            [
                Trait::Identity(Identity::new("wardrobe")),
                Trait::Container(Container {
                    capacity: None,
                    transparent,
                }),
                Trait::Openable { open: true },
            ],
            room,
        )
        .unwrap();
    let (world, coat) = world
        .spawn_in([Trait::Identity(Identity::new("coat"))], wardrobe)
        .unwrap();
    let world = world
        .move_entity(player, wardrobe)
        .unwrap()
        .set_trait(wardrobe, Trait::Openable { open: false })
        .unwrap();
    (world, wardrobe, coat)
}

#[test]
fn a_closed_wardrobe_fences_in_its_occupant() {
    let h = house();
    let (world, wardrobe, coat) = shut_in(&h.world, h.hall, h.player, false);
    let scope = ScopeResolver::new(&world);
    assert_eq!(scope.level(h.player, coat), ScopeLevel::Reachable);
    assert_eq!(scope.level(h.player, h.iron_key), ScopeLevel::Unaware);
    assert!(!scope.can_reach(h.player, h.lamp));

    let opened = world
        .set_trait(wardrobe, Trait::Openable { open: true })
        .unwrap();
    let scope = ScopeResolver::new(&opened);
    assert_eq!(scope.level(h.player, coat), ScopeLevel::Reachable);
    assert_eq!(scope.level(h.player, h.iron_key), ScopeLevel::Reachable);
}

#[test]
fn a_glass_booth_shows_the_room_but_keeps_it_out_of_reach() {
    let h = house();
    let (world, _, coat) = shut_in(&h.world, h.hall, h.player, true);
    let scope = ScopeResolver::new(&world);
    assert_eq!(scope.level(h.player, coat), ScopeLevel::Reachable);
    assert_eq!(scope.level(h.player, h.iron_key), ScopeLevel::Visible);
    assert_eq!(scope.level(h.player, h.hall), ScopeLevel::Visible);
}

#[test]
fn a_lamp_inside_the_wardrobe_lights_it_in_a_dark_room() {
    let h = house();
    let (world, wardrobe, coat) = shut_in(&h.world, h.cellar, h.player, false);
    let scope = ScopeResolver::new(&world);
    assert_eq!(scope.level(h.player, coat), ScopeLevel::Unaware);

    let lit = world
        .move_entity(h.lamp, wardrobe)
        .unwrap()
        .set_trait(h.lamp, Trait::Switchable { on: true })
        .unwrap();
    let scope = ScopeResolver::new(&lit);
    assert_eq!(scope.level(h.player, coat), ScopeLevel::Reachable);
    // The light stays inside with the player.
    assert!(!scope.is_lit(h.cellar));
}

// =============================================================================
// Light
// =============================================================================

#[test]
fn darkness_follows_the_carried_lamp() {
    let h = house();
    let world = h.world.move_entity(h.jar, h.cellar).unwrap();
    let world = world.move_entity(h.lamp, h.player).unwrap();
    let world = world.move_entity(h.player, h.cellar).unwrap();

    let scope = ScopeResolver::new(&world);
    assert!(!scope.is_lit(h.cellar));
    assert_eq!(scope.level(h.player, h.jar), ScopeLevel::Unaware);
    // Held things are found by touch.
    assert_eq!(scope.level(h.player, h.lamp), ScopeLevel::Carried);

    let lit = world
        .set_trait(h.lamp, Trait::Switchable { on: true })
        .unwrap();
    let scope = ScopeResolver::new(&lit);
    assert!(scope.is_lit(h.cellar));
    assert_eq!(scope.level(h.player, h.jar), ScopeLevel::Reachable);
    assert_eq!(scope.level(h.player, h.cellar), ScopeLevel::Visible);
}

#[test]
fn a_lamp_shut_in_the_chest_lights_nothing() {
    let h = house();
    let world = h
        .world
        .set_trait(h.lamp, Trait::Switchable { on: true })
        .unwrap()
        .set_trait(h.chest, Trait::Openable { open: true })
        .unwrap()
        .move_entity(h.lamp, h.chest)
        .unwrap()
        .set_trait(h.chest, Trait::Openable { open: false })
        .unwrap()
        .move_entity(h.chest, h.cellar)
        .unwrap()
        .move_entity(h.player, h.cellar)
        .unwrap();
    assert!(!ScopeResolver::new(&world).is_lit(h.cellar));
}

#[test]
fn sounds_carry_through_darkness() {
    let h = house();
    let world = h
        .world
        .move_entity(h.marble, h.cellar)
        .unwrap()
        .set_trait(
            h.marble,
            Trait::Sensory {
                audible: true,
                scented: false,
            },
        )
        .unwrap()
        .move_entity(h.player, h.cellar)
        .unwrap();
    assert_eq!(
        ScopeResolver::new(&world).level(h.player, h.marble),
        ScopeLevel::Aware
    );
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn overrides_raise_the_floor_in_their_room_only() {
    let h = house();
    let world = h
        .world
        .move_entity(h.vase, h.cellar)
        .unwrap()
        .set_scope_override(h.vase, h.hall, Some(ScopeLevel::Visible))
        .unwrap();

    let scope = ScopeResolver::new(&world);
    assert_eq!(scope.level(h.player, h.vase), ScopeLevel::Visible);
    assert!(!scope.can_reach(h.player, h.vase));

    let below = world.move_entity(h.player, h.cellar).unwrap();
    let lit = below
        .set_trait(h.cellar, Trait::Room(parlance_world::Room::new()))
        .unwrap();
    assert_eq!(
        ScopeResolver::new(&lit).level(h.player, h.vase),
        ScopeLevel::Reachable
    );
}

#[test]
fn a_reachable_override_reaches_into_the_closed_chest() {
    let h = house();
    let world = h
        .world
        .set_scope_override(h.coin, h.hall, Some(ScopeLevel::Reachable))
        .unwrap();
    let scope = ScopeResolver::new(&world);
    assert!(!world.flag(h.chest, &TraitKind::Openable, "open"));
    assert_eq!(scope.level(h.player, h.coin), ScopeLevel::Reachable);
    assert!(scope.can_reach(h.player, h.coin));

    let lit_cellar = world
        .set_trait(h.cellar, Trait::Room(parlance_world::Room::new()))
        .unwrap()
        .move_entity(h.player, h.cellar)
        .unwrap();
    let scope = ScopeResolver::new(&lit_cellar);
    assert_eq!(scope.level(h.player, h.coin), ScopeLevel::Unaware);
    assert!(!scope.can_reach(h.player, h.coin));
}

#[test]
fn in_scope_lists_at_or_above_the_threshold() {
    let h = house();
    let scope = ScopeResolver::new(&h.world);
    let visible: Vec<_> = scope
        .in_scope(h.player, ScopeLevel::Visible)
        .into_iter()
        .map(|(e, _)| e)
        .collect();
    assert!(visible.contains(&h.marble));
    assert!(visible.contains(&h.brass_key));
    assert!(!visible.contains(&h.coin));
    assert!(!visible.contains(&h.player));

    let reachable: Vec<_> = scope
        .in_scope(h.player, ScopeLevel::Reachable)
        .into_iter()
        .map(|(e, _)| e)
        .collect();
    assert!(!reachable.contains(&h.marble));
    assert!(reachable.contains(&h.lamp));
    assert!(h.world.has_trait(h.shelf, &TraitKind::Scenery));
}

proptest! {
    /// Raising the threshold never adds entities.
    #[test]
    fn thresholds_are_monotonic(open_chest in any::<bool>(), lamp_on in any::<bool>(), in_cellar in any::<bool>()) {
        let h = house();
        let mut world = h.world.set_trait(h.chest, Trait::Openable { open: open_chest }).unwrap();
        world = world.set_trait(h.lamp, Trait::Switchable { on: lamp_on }).unwrap();
        if in_cellar {
            world = world.move_entity(h.lamp, h.player).unwrap();
            world = world.move_entity(h.player, h.cellar).unwrap();
        }
        let scope = ScopeResolver::new(&world);
        for pair in ScopeLevel::ALL.windows(2) {
            let lower = scope.in_scope(h.player, pair[0]);
            let higher = scope.in_scope(h.player, pair[1]);
            prop_assert!(higher.len() <= lower.len());
            for entry in &higher {
                prop_assert!(lower.contains(entry));
            }
        }
    }
}
