//! Transcript tests
//!
//! Tests the REPL's text output over a scripted game.

use parlance_runtime::{Repl, ScriptedEditor, Step, demo_session};

fn repl() -> Repl<ScriptedEditor> {
    let (session, renderer, _) = demo_session().unwrap();
    Repl::with_editor(ScriptedEditor::new(Vec::<String>::new()), session, renderer).without_banner()
}

fn say(repl: &mut Repl<ScriptedEditor>, line: &str) -> Vec<String> {
    match repl.step(line).unwrap() {
        Step::Output(lines) => lines,
        Step::Quit => panic!("{line:?} quit the game"),
    }
}

#[test]
fn the_chest_walkthrough() {
    let mut r = repl();
    assert!(r.opening().unwrap()[0].starts_with("Cottage"));

    assert_eq!(say(&mut r, "take rusty key"), ["Taken."]);
    assert!(say(&mut r, "north").iter().any(|l| l.starts_with("Garden")));
    assert!(say(&mut r, "unlock chest with key")[0].starts_with("You unlock"));
    assert_eq!(
        say(&mut r, "open the chest"),
        ["You open the wooden chest, revealing a gold coin."]
    );

    // The fifth turn rings the bell.
    let lines = say(&mut r, "take coin");
    assert_eq!(lines[0], "Taken.");
    assert!(lines.last().unwrap().ends_with("chimes."), "{lines:?}");

    let lines = say(&mut r, "undo");
    assert_eq!(lines[0], "Previous turn undone.");
    assert!(lines.iter().any(|l| l.starts_with("Garden")));
    assert_eq!(r.session().turn(), 4);

    let lines = say(&mut r, "restart");
    assert_eq!(lines[0], "Starting over.");
    assert!(lines.iter().any(|l| l.starts_with("Cottage")));
    assert_eq!(r.session().turn(), 0);
}

#[test]
fn failures_explain_themselves() {
    let mut r = repl();
    assert_eq!(say(&mut r, "take unicorn"), ["You can't see any \"unicorn\" here."]);
    assert_eq!(
        say(&mut r, "drop it"),
        ["I'm not sure what \"it\" refers to."]
    );
    assert_eq!(say(&mut r, "take table"), ["The oak table is fixed in place."]);
    assert_eq!(say(&mut r, "up"), ["You can't go that way."]);
    assert_eq!(say(&mut r, "inventory"), ["You are empty-handed."]);
    assert_eq!(r.step("Q").unwrap(), Step::Quit);
}
