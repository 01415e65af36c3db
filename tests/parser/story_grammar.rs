//! Story content extending the standard grammar.

use parlance_foundation::{Direction, ErrorKind};
use parlance_parser::{Manner, Parser, PatternCategory};

#[test]
fn story_verbs_sit_beside_standard_ones() {
    let mut parser = Parser::english();
    let id = parser.grammar_mut().register("ring <noun>", "ringing").unwrap();
    assert_eq!(parser.grammar().get(id).unwrap().category, PatternCategory::Custom);
    assert!(parser.grammar().verbs().contains("ring"));

    let cmd = parser.parse("ring the bell").commands()[0].clone();
    assert_eq!(cmd.action.as_str(), "ringing");
    assert_eq!(cmd.pattern, id);
}

#[test]
fn higher_priority_story_patterns_win() {
    let mut parser = Parser::english();
    parser
        .grammar_mut()
        .define("take <noun>", "story_taking")
        .priority(500)
        .register()
        .unwrap();
    let outcome = parser.parse("take lamp");
    assert_eq!(outcome.commands().len(), 1);
    assert_eq!(outcome.commands()[0].action.as_str(), "story_taking");
}

#[test]
fn story_patterns_can_be_removed_but_standard_ones_cannot() {
    let mut parser = Parser::english();
    let id = parser.grammar_mut().register("xyzzy", "magic").unwrap();
    parser.grammar_mut().unregister(id).unwrap();
    assert!(parser.parse("xyzzy").commands().is_empty());

    let standard = parser.parse("take lamp").commands()[0].pattern;
    let err = parser.grammar_mut().unregister(standard).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StandardPatternRemoval(_)));
    assert_eq!(parser.parse("take lamp").commands().len(), 1);
}

#[test]
fn malformed_patterns_are_errors() {
    let mut parser = Parser::english();
    for source in ["", "take <noun", "say <text> loudly", "give <noun> <noun>"] {
        let err = parser.grammar_mut().register(source, "broken").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidPattern { .. }), "{source:?}");
    }
}

#[test]
fn free_text_slots() {
    let mut parser = Parser::english();
    parser.grammar_mut().register("say <text>", "saying").unwrap();
    parser
        .grammar_mut()
        .register("write <text> on <noun>", "writing")
        .unwrap_err();

    let cmd = parser.parse("say \"Open Sesame\"").commands()[0].clone();
    assert_eq!(cmd.text.as_deref(), Some("Open Sesame"));
}

#[test]
fn story_vocabulary() {
    let mut parser = Parser::english();
    parser.vocabulary_mut().add_direction("widdershins", Direction::West);
    parser.vocabulary_mut().add_manner("hurl", Manner::Forceful);
    parser
        .grammar_mut()
        .register("hurl <noun:held> <second>", "putting")
        .unwrap();
    parser.vocabulary_mut().add_implied_preposition("hurl", "at");

    let cmd = parser.parse("widdershins").commands()[0].clone();
    assert_eq!(cmd.direction, Some(Direction::West));

    let cmd = parser.parse("hurl rock window").commands()[0].clone();
    assert_eq!(cmd.manner, Manner::Forceful);
    assert_eq!(cmd.preposition.as_deref(), Some("at"));
    assert!(cmd.preposition_implicit);
}
