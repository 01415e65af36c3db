//! Line editor abstraction for the game loop.
//!
//! The REPL reads through the [`LineEditor`] trait, so the terminal editor
//! can be swapped for a scripted one in batch runs and tests.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::BufRead;

use parlance_foundation::{Error, ErrorKind, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator};

use crate::highlight::InputHighlighter;

/// Result of reading a line from the editor.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadResult {
    /// A line was read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D, or the script ran out.
    Eof,
}

/// Abstraction over line editing.
pub trait LineEditor {
    /// Reads a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Adds a line to history.
    fn add_history(&mut self, line: &str);

    /// Tells the editor which verbs and words to offer as completions.
    fn set_highlighter(&mut self, highlighter: InputHighlighter);
}

// =============================================================================
// Terminal editor
// =============================================================================

#[derive(Helper, Completer, Hinter, Validator)]
struct ParlanceHelper {
    #[rustyline(Completer)]
    completer: VerbCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    highlighter: InputHighlighter,
}

impl Highlighter for ParlanceHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

/// Completes the first word from the grammar's verbs.
#[derive(Default)]
struct VerbCompleter {
    verbs: Vec<String>,
}

impl VerbCompleter {
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let before = &line[..pos];
        // Only the verb position is completed.
        if before.trim_start().contains(char::is_whitespace) {
            return (pos, Vec::new());
        }
        let start = before.len() - before.trim_start().len();
        let word = before[start..].to_lowercase();
        let pairs = self
            .verbs
            .iter()
            .filter(|v| v.starts_with(&word))
            .map(|v| Pair {
                display: v.clone(),
                replacement: v.clone(),
            })
            .collect();
        (start, pairs)
    }
}

impl Completer for VerbCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

/// Line editor backed by rustyline.
pub struct RustylineEditor {
    editor: Editor<ParlanceHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates a terminal editor.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline cannot start.
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(500)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?
            .build();

        let helper = ParlanceHelper {
            completer: VerbCompleter::default(),
            hinter: HistoryHinter::new(),
            highlighter: InputHighlighter::default(),
        };

        let mut editor = Editor::with_config(config)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?;
        editor.set_helper(Some(helper));

        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::new(ErrorKind::Io(e.to_string()))),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    fn set_highlighter(&mut self, highlighter: InputHighlighter) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completer.verbs = highlighter.verbs().iter().cloned().collect();
            helper.highlighter = highlighter;
        }
    }
}

// =============================================================================
// Scripted editor
// =============================================================================

/// Replays a fixed list of lines, then reports end of input.
///
/// Used for `--batch` runs and in tests.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    lines: VecDeque<String>,
    history: Vec<String>,
    echo: bool,
}

impl ScriptedEditor {
    /// Creates an editor that will return `lines` in order.
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            history: Vec::new(),
            echo: false,
        }
    }

    /// Reads every line of `reader` up front.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the reader fails.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let lines = reader
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| Error::new(ErrorKind::Io(e.to_string())))?;
        Ok(Self::new(lines))
    }

    /// Prints each line after its prompt, as if it had been typed.
    #[must_use]
    pub fn echoing(mut self) -> Self {
        self.echo = true;
        self
    }

    /// Returns the lines added to history so far.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.lines.pop_front() {
            Some(line) => {
                if self.echo {
                    println!("{prompt}{line}");
                }
                Ok(ReadResult::Line(line))
            }
            None => Ok(ReadResult::Eof),
        }
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    fn set_highlighter(&mut self, _highlighter: InputHighlighter) {}
}
