//! Command validation tests
//!
//! Tests binding parsed noun phrases to entities in scope.

use parlance_engine::{
    CommandValidator, EngineConfig, PronounHistory, ResolutionFailure, SlotBinding, Validation,
    standard_actions,
};
use parlance_foundation::EntityId;
use parlance_parser::{ParsedCommand, Parser, PronounKind, ScopeHint};
use parlance_world::World;

use crate::fixture::house;

fn parse(input: &str) -> Vec<ParsedCommand> {
    Parser::english().parse(input).commands().to_vec()
}

fn validate(world: &World, actor: EntityId, input: &str) -> Validation {
    let config = EngineConfig::default();
    CommandValidator::new(&config)
        .validate_all(world, actor, &parse(input))
        .0
}

fn resolved_direct(validation: &Validation) -> Option<EntityId> {
    match validation {
        Validation::Resolved(resolved) => resolved.direct(),
        _ => None,
    }
}

// =============================================================================
// Binding
// =============================================================================

#[test]
fn adjectives_pick_one_of_several() {
    let h = house();
    assert_eq!(
        resolved_direct(&validate(&h.world, h.player, "take the brass key")),
        Some(h.brass_key)
    );
}

#[test]
fn ties_suspend_with_candidates_in_id_order() {
    let h = house();
    let Validation::Ambiguous(pending) = validate(&h.world, h.player, "take key") else {
        panic!("expected a question");
    };
    assert_eq!(pending.candidates, vec![h.iron_key, h.brass_key]);
    assert_eq!(pending.noun_slot().unwrap().phrase.noun, "key");

    assert_eq!(pending.choose(&h.world, "iron"), Some(h.iron_key));
    assert_eq!(pending.choose(&h.world, "the brass one"), Some(h.brass_key));
    assert_eq!(pending.choose(&h.world, "second"), Some(h.brass_key));
    assert_eq!(pending.choose(&h.world, "wooden"), None);

    let config = EngineConfig::default();
    let forced = CommandValidator::new(&config).validate_forced(&h.world, &pending, h.iron_key);
    assert_eq!(resolved_direct(&forced), Some(h.iron_key));
}

#[test]
fn required_hints_narrow_the_field() {
    let h = house();
    let world = h.world.move_entity(h.brass_key, h.player).unwrap();
    assert_eq!(
        resolved_direct(&validate(&world, h.player, "drop key")),
        Some(h.brass_key)
    );
}

#[test]
fn unsatisfied_hints_are_reported() {
    let h = house();
    assert_eq!(
        validate(&h.world, h.player, "open lamp"),
        Validation::Failed(ResolutionFailure::HintUnsatisfied {
            text: "lamp".to_string(),
            hint: ScopeHint::Openable,
        })
    );
}

#[test]
fn hidden_things_match_nothing() {
    let h = house();
    assert!(matches!(
        validate(&h.world, h.player, "take coin"),
        Validation::Failed(ResolutionFailure::NothingMatches { .. })
    ));
}

#[test]
fn seen_but_not_reachable_still_binds() {
    let h = house();
    // Reach is the action's business, not the validator's.
    assert_eq!(
        resolved_direct(&validate(&h.world, h.player, "take vase")),
        Some(h.vase)
    );
}

#[test]
fn instruments_bind_to_the_second_slot() {
    let h = house();
    let world = h.world.move_entity(h.iron_key, h.player).unwrap();
    let Validation::Resolved(resolved) = validate(&world, h.player, "unlock chest with key") else {
        panic!("expected a binding");
    };
    assert_eq!(resolved.direct(), Some(h.chest));
    assert_eq!(resolved.indirect(), Some(h.iron_key));
}

// =============================================================================
// Pronouns and "all"
// =============================================================================

#[test]
fn pronouns_need_history() {
    let h = house();
    assert_eq!(
        validate(&h.world, h.player, "take it"),
        Validation::Failed(ResolutionFailure::NoReferent {
            pronoun: PronounKind::It
        })
    );

    let mut history = PronounHistory::new();
    history.record(&h.world, h.lamp, 0);
    let config = EngineConfig::default();
    let validation = CommandValidator::new(&config)
        .with_history(&history, 1)
        .validate(&h.world, h.player, &parse("take it")[0]);
    assert_eq!(resolved_direct(&validation), Some(h.lamp));
}

#[test]
fn all_binds_every_portable_thing_in_reach() {
    let h = house();
    let Validation::Resolved(resolved) = validate(&h.world, h.player, "take all") else {
        panic!("expected a binding");
    };
    let SlotBinding::Many(targets) = &resolved.bindings[0].target else {
        panic!("expected several targets");
    };
    assert!(targets.contains(&h.iron_key));
    assert!(targets.contains(&h.lamp));
    assert!(!targets.contains(&h.coin));
    assert!(!targets.contains(&h.shelf));
    assert_eq!(resolved.expand().len(), targets.len());
}

#[test]
fn unknown_actions_fail_when_checked() {
    let h = house();
    let mut parser = Parser::english();
    parser.grammar_mut().register("frob <noun>", "frobbing").unwrap();
    let commands = parser.parse("frob lamp").commands().to_vec();
    let config = EngineConfig::default();
    let actions = standard_actions();
    let validation = CommandValidator::new(&config)
        .with_actions(&actions)
        .validate(&h.world, h.player, &commands[0]);
    assert!(matches!(
        validation,
        Validation::Failed(ResolutionFailure::UnknownAction { .. })
    ));
}

// =============================================================================
// Purity
// =============================================================================

#[test]
fn validation_is_repeatable() {
    let h = house();
    for input in ["take key", "take brass key", "open lamp", "take all", "x vase"] {
        let first = validate(&h.world, h.player, input);
        let second = validate(&h.world, h.player, input);
        assert_eq!(first, second, "{input}");
    }
}
