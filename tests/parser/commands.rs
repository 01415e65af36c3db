//! Standard commands through the full pipeline.

use parlance_foundation::Direction;
use parlance_parser::{
    Manner, ParseOutcome, ParsedCommand, Parser, PronounKind, Quantifier, ScopeHint,
    SyntaxFailure,
};

fn parse_one(input: &str) -> ParsedCommand {
    let outcome = Parser::english().parse(input);
    let cmds = outcome.commands();
    assert_eq!(cmds.len(), 1, "{input:?} gave {cmds:?}");
    cmds[0].clone()
}

#[test]
fn articles_and_punctuation_are_ignored() {
    let a = parse_one("Take the lamp.");
    let b = parse_one("take lamp");
    assert_eq!(a.action, b.action);
    assert_eq!(a.direct().unwrap().phrase.noun, "lamp");
    assert_eq!(a.input, "Take the lamp.");
}

#[test]
fn phrasal_verbs_in_either_order() {
    for input in ["pick up lamp", "pick lamp up"] {
        assert_eq!(parse_one(input).action.as_str(), "taking", "{input}");
    }
    for input in ["turn on lamp", "switch lamp on"] {
        let cmd = parse_one(input);
        assert_eq!(cmd.action.as_str(), "switching_on", "{input}");
        assert_eq!(cmd.direct().unwrap().hint.as_ref().unwrap().hint, ScopeHint::Switchable);
    }
}

#[test]
fn put_down_is_dropping() {
    assert_eq!(parse_one("put down the lamp").action.as_str(), "dropping");
    assert_eq!(parse_one("put the lamp down").action.as_str(), "dropping");
}

#[test]
fn locking_with_an_instrument() {
    let cmd = parse_one("unlock the chest with the iron key");
    assert_eq!(cmd.action.as_str(), "unlocking");
    assert_eq!(cmd.preposition.as_deref(), Some("with"));
    assert_eq!(cmd.indirect().unwrap().phrase.adjectives, vec!["iron"]);
    assert_eq!(cmd.indirect().unwrap().hint.as_ref().unwrap().hint, ScopeHint::Held);
}

#[test]
fn a_bare_unlock_still_implies_with() {
    let cmd = parse_one("unlock the chest");
    assert_eq!(cmd.action.as_str(), "unlocking");
    assert_eq!(cmd.preposition.as_deref(), Some("with"));
    assert!(cmd.preposition_implicit);
    assert!(cmd.indirect().is_none());
}

#[test]
fn take_from_keeps_a_soft_hint() {
    let cmd = parse_one("take coin from box");
    let hint = cmd.indirect().unwrap().hint.clone().unwrap();
    assert_eq!(hint.hint, ScopeHint::Container);
    assert!(!hint.required);
}

#[test]
fn manner_comes_from_the_verb() {
    assert_eq!(parse_one("put coin in well").manner, Manner::Normal);
    assert_eq!(parse_one("jam coin into well").manner, Manner::Forceful);
}

#[test]
fn directions() {
    assert_eq!(parse_one("n").direction, Some(Direction::North));
    assert_eq!(parse_one("walk up").direction, Some(Direction::Up));
    assert_eq!(parse_one("go sw").direction, Some(Direction::Southwest));
}

#[test]
fn pronouns_and_quantifiers() {
    let cmd = parse_one("drop them");
    assert_eq!(cmd.direct().unwrap().phrase.pronoun, Some(PronounKind::Them));
    let cmd = parse_one("take all");
    assert_eq!(cmd.direct().unwrap().phrase.quantifier, Quantifier::All);
}

#[test]
fn failures_name_the_verb() {
    assert_eq!(
        Parser::english().parse("dance wildly"),
        ParseOutcome::NoCommand(SyntaxFailure::NoMatch {
            verb: "dance".to_string()
        })
    );
    // A known verb with the wrong shape is still no command.
    assert!(matches!(
        Parser::english().parse("unlock"),
        ParseOutcome::NoCommand(_)
    ));
    assert_eq!(
        Parser::english().parse(""),
        ParseOutcome::NoCommand(SyntaxFailure::Empty)
    );
}
