//! The interactive game loop.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parlance_engine::{EventKind, Session, TurnOutcome};
use parlance_foundation::Result;
use tracing::{error, info, warn};

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::highlight::InputHighlighter;
use crate::render::Renderer;
use crate::serialize::{SaveFile, load_from_file, save_path, save_to_file};

/// Name of the save slot inside the save directory.
pub const SAVE_SLOT: &str = "quicksave";

/// What one line of input led to.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    /// Text to show the player
    Output(Vec<String>),
    /// The player asked to leave
    Quit,
}

/// Reads commands, runs them, and prints what happened.
pub struct Repl<E: LineEditor = RustylineEditor> {
    editor: E,
    session: Session,
    renderer: Renderer,
    save_dir: PathBuf,
    show_banner: bool,
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL on the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(session: Session, renderer: Renderer) -> Result<Self> {
        Ok(Self::with_editor(RustylineEditor::new()?, session, renderer))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL reading from `editor`.
    pub fn with_editor(mut editor: E, session: Session, renderer: Renderer) -> Self {
        editor.set_highlighter(InputHighlighter::from_parser(session.parser()));
        Self {
            editor,
            session,
            renderer,
            save_dir: PathBuf::from("."),
            show_banner: true,
            prompt: "> ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Sets where saves are written and read.
    #[must_use]
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    /// Returns the session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the session mutably.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Returns the editor.
    #[must_use]
    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Returns the save slot path.
    #[must_use]
    pub fn save_file(&self) -> PathBuf {
        save_path(&self.save_dir, SAVE_SLOT)
    }

    /// Runs until the player quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            print_banner();
        }
        print_lines(&self.opening()?);

        loop {
            let line = match self.editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => break,
            };
            if !line.trim().is_empty() {
                self.editor.add_history(&line);
            }
            match self.step(&line) {
                Ok(Step::Output(lines)) => print_lines(&lines),
                Ok(Step::Quit) => break,
                Err(e) => {
                    eprintln!("\x1b[31mError: {e}\x1b[0m");
                    if let Some(context) = &e.context {
                        error!(%context, "command failed");
                    }
                }
            }
        }

        println!("\nGoodbye.");
        Ok(())
    }

    /// Returns the text shown before the first prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if describing the starting room fails.
    pub fn opening(&mut self) -> Result<Vec<String>> {
        let events = self.session.describe_surroundings()?;
        Ok(self.renderer.render_all(self.session.world(), &events))
    }

    /// Handles one line of input.
    ///
    /// # Errors
    ///
    /// Returns an error only for engine faults; anything the player typed
    /// produces output instead.
    pub fn step(&mut self, line: &str) -> Result<Step> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Step::Output(Vec::new()));
        }
        if matches!(trimmed.to_lowercase().as_str(), "quit" | "q" | "exit") {
            return Ok(Step::Quit);
        }

        let outcome = self.session.submit(line)?;
        let mut lines = self.renderer.render_all(self.session.world(), &outcome.events);
        self.follow_up(&outcome, &mut lines)?;
        Ok(Step::Output(lines))
    }

    /// Carries out file work that meta actions asked for.
    fn follow_up(&mut self, outcome: &TurnOutcome, lines: &mut Vec<String>) -> Result<()> {
        if let Some(delta) = &outcome.save {
            let path = self.save_file();
            match save_to_file(&SaveFile::new(outcome.turn, delta.clone()), &path) {
                Ok(()) => {
                    info!(path = %path.display(), "game saved");
                    lines.push("Saved.".to_string());
                }
                Err(e) => {
                    warn!(%e, "save failed");
                    lines.push(format!("Save failed: {e}"));
                }
            }
        }

        if outcome.restore_requested {
            let path = self.save_file();
            match self.restore_from(&path) {
                Ok(()) => {
                    lines.push("Restored.".to_string());
                    lines.extend(self.opening()?);
                }
                Err(e) => {
                    warn!(%e, "restore failed");
                    lines.push(format!("Restore failed: {e}"));
                }
            }
        }

        if outcome.has(&EventKind::Restarted) || outcome.has(&EventKind::Undone) {
            lines.extend(self.opening()?);
        }
        Ok(())
    }

    fn restore_from(&mut self, path: &Path) -> Result<()> {
        let save = load_from_file(path)?;
        self.session.restore(&save.delta, save.turn)
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
    if !lines.is_empty() {
        println!();
    }
    let _ = io::stdout().flush();
}

fn print_banner() {
    println!("\x1b[1;36mParlance\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
    println!("Type commands like \"take lamp\" or \"go north\". Type \"quit\" to leave.\n");
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_session;
    use crate::editor::ScriptedEditor;

    fn repl(lines: &[&str]) -> Repl<ScriptedEditor> {
        let (session, renderer, _) = demo_session().unwrap();
        Repl::with_editor(ScriptedEditor::new(lines.iter().copied()), session, renderer)
            .without_banner()
    }

    fn output(step: Step) -> Vec<String> {
        match step {
            Step::Output(lines) => lines,
            Step::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn opening_describes_the_first_room() {
        let mut r = repl(&[]);
        let lines = r.opening().unwrap();
        assert!(lines[0].starts_with("Cottage"));
        assert_eq!(r.session().turn(), 0);
    }

    #[test]
    fn steps_render_text() {
        let mut r = repl(&[]);
        assert_eq!(output(r.step("take iron key").unwrap()), ["Taken."]);
        assert_eq!(output(r.step("").unwrap()), Vec::<String>::new());
        assert_eq!(
            output(r.step("xyzzy").unwrap()),
            ["I don't know how to \"xyzzy\" anything."]
        );
        assert_eq!(r.step("quit").unwrap(), Step::Quit);
    }

    #[test]
    fn questions_and_answers() {
        let mut r = repl(&[]);
        let lines = output(r.step("take key").unwrap());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Which do you mean"));
        assert_eq!(output(r.step("rusty").unwrap()), ["Taken."]);
    }

    #[test]
    fn save_and_restore_through_files() {
        let dir = std::env::temp_dir().join("parlance_repl_save_test");
        std::fs::create_dir_all(&dir).unwrap();
        let mut r = repl(&[]).with_save_dir(&dir);

        r.step("take iron key").unwrap();
        let lines = output(r.step("save").unwrap());
        assert!(lines.contains(&"Saved.".to_string()));
        assert!(r.save_file().exists());

        r.step("drop key").unwrap();
        let lines = output(r.step("restore").unwrap());
        assert!(lines.contains(&"Restored.".to_string()));
        let world = r.session().world();
        let held: Vec<_> = world.contents(r.session().player()).collect();
        assert_eq!(held.len(), 1);
        assert_eq!(r.session().turn(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn run_consumes_the_script() {
        let mut r = repl(&["look", "wait", "quit", "never read"]);
        r.run().unwrap();
        assert_eq!(r.editor().history(), ["look", "wait", "quit"]);
    }
}
