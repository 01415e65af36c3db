//! Turn scenarios
//!
//! Each test plays a few lines against the demo story and checks the events,
//! the world, and the status the session reports.

use parlance_engine::{ActionStatus, EventKind, ReasonCode, ScopeResolver, Session, TurnStatus};
use parlance_foundation::{ScopeLevel, Value};
use parlance_parser::{ParseOutcome, SyntaxFailure};
use parlance_runtime::{demo_session, demo_world};
use parlance_world::TraitKind;

// =============================================================================
// Taking
// =============================================================================

#[test]
fn unambiguous_take() {
    let (mut session, renderer, demo) = demo_session().unwrap();
    let outcome = session.submit("take the lamp").unwrap();

    assert_eq!(outcome.status, TurnStatus::Acted(vec![ActionStatus::Succeeded]));
    assert!(outcome.consumed_turn);
    assert_eq!(session.world().location(demo.lamp), Some(demo.player));
    assert_eq!(
        ScopeResolver::new(session.world()).level(demo.player, demo.lamp),
        ScopeLevel::Carried
    );

    let taken: Vec<_> = outcome
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Taken)
        .collect();
    assert_eq!(taken.len(), 1);
    assert_eq!(
        renderer.render_all(session.world(), &outcome.events),
        vec!["Taken.".to_string()]
    );
}

#[test]
fn ambiguous_take_answered_by_adjective() {
    let (mut session, renderer, demo) = demo_session().unwrap();
    let outcome = session.submit("take key").unwrap();

    assert_eq!(outcome.status, TurnStatus::AwaitingChoice);
    assert!(!outcome.consumed_turn);
    let question = outcome
        .events
        .iter()
        .find(|e| e.kind == EventKind::DisambiguationRequested)
        .unwrap();
    let Some(Value::List(candidates)) = question.data("candidates") else {
        panic!("candidates missing: {question:?}");
    };
    assert_eq!(candidates.len(), 2);
    let text = renderer.render_all(session.world(), &outcome.events);
    assert!(text[0].starts_with("Which do you mean"), "{text:?}");

    let outcome = session.submit("iron").unwrap();
    assert!(outcome.has(&EventKind::Taken));
    assert_eq!(session.world().location(demo.iron_key), Some(demo.player));
    assert_ne!(session.world().location(demo.brass_key), Some(demo.player));
    assert!(
        session
            .history()
            .recently_mentioned(demo.iron_key, session.turn(), 3)
    );
    assert!(session.pending().is_none());
}

#[test]
fn take_all_but_one() {
    let (mut session, _, demo) = demo_session().unwrap();
    let outcome = session.submit("take all except the lamp").unwrap();
    let TurnStatus::Acted(statuses) = &outcome.status else {
        panic!("expected actions, got {:?}", outcome.status);
    };
    assert!(statuses.iter().all(|s| *s == ActionStatus::Succeeded));
    assert_eq!(session.world().location(demo.iron_key), Some(demo.player));
    assert_ne!(session.world().location(demo.lamp), Some(demo.player));
    assert_eq!(session.turn(), 1);
}

// =============================================================================
// Preconditions
// =============================================================================

#[test]
fn opening_an_open_container_is_blocked_once() {
    // No bell, so nothing else happens on the fifth turn.
    let demo = demo_world().unwrap();
    let mut session = Session::new(demo.world.clone(), demo.player).unwrap();
    for line in ["take rusty key", "north", "unlock chest with key", "open chest"] {
        session.submit(line).unwrap();
    }
    assert!(session.world().flag(demo.chest, &TraitKind::Openable, "open"));
    let before = session.world().snapshot();

    let outcome = session.submit("open chest").unwrap();
    assert_eq!(
        outcome.status,
        TurnStatus::Acted(vec![ActionStatus::Blocked(ReasonCode::AlreadyOpen)])
    );
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].kind, EventKind::ActionBlocked);
    assert!(session.world().snapshot() == before);
}

#[test]
fn unknown_verbs_make_no_command() {
    let (mut session, _, _) = demo_session().unwrap();
    assert_eq!(
        session.parser().parse("juggle the lamp"),
        ParseOutcome::NoCommand(SyntaxFailure::NoMatch {
            verb: "juggle".to_string()
        })
    );
    let outcome = session.submit("juggle the lamp").unwrap();
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].kind, EventKind::CommandNotUnderstood);
    assert_eq!(session.turn(), 0);
}

// =============================================================================
// Light and distance
// =============================================================================

#[test]
fn a_carried_lamp_lights_the_cellar() {
    let (mut session, _, demo) = demo_session().unwrap();
    session.submit("take lamp").unwrap();
    session.submit("down").unwrap();
    let scope = ScopeResolver::new(session.world());
    assert!(!scope.is_lit(demo.cellar));
    assert_eq!(scope.level(demo.player, demo.cellar), ScopeLevel::Aware);

    session.submit("switch on the lantern").unwrap();
    let scope = ScopeResolver::new(session.world());
    assert!(scope.is_lit(demo.cellar));
    assert_eq!(scope.level(demo.player, demo.cellar), ScopeLevel::Visible);

    session.submit("switch lamp off").unwrap();
    assert!(!ScopeResolver::new(session.world()).is_lit(demo.cellar));
}

#[test]
fn the_tower_is_only_seen_from_the_garden() {
    let (mut session, _, demo) = demo_session().unwrap();
    let scope = ScopeResolver::new(session.world());
    assert_eq!(scope.level(demo.player, demo.tower), ScopeLevel::Unaware);

    session.submit("n").unwrap();
    let scope = ScopeResolver::new(session.world());
    assert_eq!(scope.level(demo.player, demo.tower), ScopeLevel::Visible);

    session.submit("s").unwrap();
    session.submit("d").unwrap();
    let scope = ScopeResolver::new(session.world());
    assert_eq!(scope.level(demo.player, demo.tower), ScopeLevel::Unaware);
}

// =============================================================================
// Session commands
// =============================================================================

#[test]
fn again_repeats_the_last_command() {
    let (mut session, _, demo) = demo_session().unwrap();
    session.submit("switch on lamp").unwrap();
    session.submit("switch off lamp").unwrap();
    let outcome = session.submit("again").unwrap();
    assert_eq!(
        outcome.status,
        TurnStatus::Acted(vec![ActionStatus::Blocked(ReasonCode::AlreadyOff)])
    );
    assert!(!session.world().flag(demo.lamp, &TraitKind::Switchable, "on"));
    assert_eq!(session.turn(), 3);
}

#[test]
fn undo_walks_back_one_turn_at_a_time() {
    let (mut session, _, demo) = demo_session().unwrap();
    session.submit("take lamp").unwrap();
    session.submit("n").unwrap();
    assert_eq!(session.world().location(demo.player), Some(demo.garden));

    session.submit("undo").unwrap();
    assert_eq!(session.world().location(demo.player), Some(demo.cottage));
    assert_eq!(session.world().location(demo.lamp), Some(demo.player));

    session.submit("undo").unwrap();
    assert_ne!(session.world().location(demo.lamp), Some(demo.player));

    let outcome = session.submit("undo").unwrap();
    assert_eq!(
        outcome.status,
        TurnStatus::Acted(vec![ActionStatus::Blocked(ReasonCode::NothingToUndo)])
    );
}
