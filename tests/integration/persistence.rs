//! Save and restore tests
//!
//! Tests that a world survives the trip through a save delta, MessagePack,
//! and a file.

use parlance_engine::Session;
use parlance_runtime::serialize::{SaveFile, from_bytes, load_from_file, save_to_file, to_bytes};
use parlance_runtime::demo_session;
use parlance_world::{Actor, Gender, Identity, Trait, World, WorldBuilder};
use proptest::prelude::*;

fn played(lines: &[&str]) -> Session {
    let (mut session, _, _) = demo_session().unwrap();
    for line in lines {
        session.submit(line).unwrap();
    }
    session
}

#[test]
fn an_untouched_world_saves_nothing() {
    let session = played(&[]);
    let delta = session.save_delta();
    let restored = World::restore(session.baseline(), &delta).unwrap();
    assert!(restored.snapshot() == session.world().snapshot());
}

#[test]
fn delta_round_trip_through_bytes() {
    let session = played(&["take lamp", "turn on lamp", "down", "take bottle"]);
    let save = SaveFile::new(session.turn(), session.save_delta());
    let loaded = from_bytes(&to_bytes(&save).unwrap()).unwrap();
    assert_eq!(loaded, save);

    let (mut fresh, _, demo) = demo_session().unwrap();
    fresh.restore(&loaded.delta, loaded.turn).unwrap();
    assert_eq!(fresh.turn(), 4);
    assert_eq!(fresh.world().location(demo.player), Some(demo.cellar));
    assert!(fresh.world().snapshot() == session.world().snapshot());
}

#[test]
fn delta_round_trip_through_a_file() {
    let dir = std::env::temp_dir().join("parlance_persistence_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("walk.psave");

    let session = played(&["take rusty key", "n", "unlock chest with key", "open chest"]);
    save_to_file(&SaveFile::new(session.turn(), session.save_delta()), &path).unwrap();
    let loaded = load_from_file(&path).unwrap();

    let restored = World::restore(session.baseline(), &loaded.delta).unwrap();
    assert!(restored.snapshot() == session.world().snapshot());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn a_restored_game_can_be_saved_and_restored_again() {
    let session = played(&["take lamp", "turn on lamp", "down", "take bottle"]);
    let (mut first, _, _) = demo_session().unwrap();
    first.restore(&session.save_delta(), session.turn()).unwrap();

    let bytes = to_bytes(&SaveFile::new(first.turn(), first.save_delta())).unwrap();
    let loaded = from_bytes(&bytes).unwrap();
    let (mut second, _, demo) = demo_session().unwrap();
    second.restore(&loaded.delta, loaded.turn).unwrap();

    assert!(second.world().snapshot() == session.world().snapshot());
    assert_eq!(second.turn(), 4);
    assert_eq!(second.world().location(demo.player), Some(demo.cellar));
    assert_eq!(second.world().location(demo.lamp), Some(demo.player));
}

#[test]
fn a_delta_for_a_different_world_is_rejected() {
    let delta = played(&["take lamp"]).save_delta();
    assert!(World::restore(&World::new(), &delta).is_err());

    let mut b = WorldBuilder::new();
    let hut = b.room("Hut", "").unwrap();
    let hermit = b
        .add(
            [
                Trait::Identity(Identity::new("hermit")),
                Trait::Actor(Actor {
                    player: true,
                    gender: Gender::Neuter,
                }),
            ],
            hut,
        )
        .unwrap();
    let mut small = Session::new(b.build(), hermit).unwrap();
    small.submit("wait").unwrap();
    assert!(small.restore(&delta, 9).is_err());
    // The session is left as it was.
    assert_eq!(small.turn(), 1);
    assert_eq!(small.world().location(hermit), Some(hut));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any sequence of commands restores to the same world from its delta.
    #[test]
    fn any_play_restores(script in prop::collection::vec(
        prop::sample::select(vec![
            "take all", "drop all", "n", "s", "down", "up", "take lamp",
            "turn on lamp", "take rusty key", "unlock chest with key",
            "open chest", "take coin", "put coin in well", "undo", "wait",
        ]),
        0..12,
    )) {
        let session = played(&script);
        let delta = session.save_delta();
        let restored = World::restore(session.baseline(), &delta).unwrap();
        prop_assert!(restored.snapshot() == session.world().snapshot());
    }

    /// Saving a restored game and restoring that save gives the same world.
    #[test]
    fn a_restored_game_saves_the_same(script in prop::collection::vec(
        prop::sample::select(vec![
            "take all", "n", "s", "down", "take lamp", "turn on lamp",
            "take rusty key", "unlock chest with key", "open chest",
            "take coin", "jam coin in well", "close chest",
        ]),
        0..10,
    )) {
        let session = played(&script);
        let (mut first, _, _) = demo_session().unwrap();
        first.restore(&session.save_delta(), session.turn()).unwrap();

        let again = first.save_delta();
        prop_assert!(again == session.save_delta());
        let (mut second, _, _) = demo_session().unwrap();
        second.restore(&again, first.turn()).unwrap();
        prop_assert!(second.world().snapshot() == first.world().snapshot());
        prop_assert_eq!(second.turn(), session.turn());
    }
}
