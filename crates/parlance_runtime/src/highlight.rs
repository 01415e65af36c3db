//! Input highlighting for the line editor.

use std::borrow::Cow;
use std::collections::BTreeSet;

use parlance_parser::{Parser, Vocabulary};

const KNOWN_VERB: &str = "\x1b[1m";
const UNKNOWN_VERB: &str = "\x1b[31m";
const DIRECTION: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Colors player input as it is typed.
///
/// The first word is bold when the grammar knows it and red when it does
/// not. Direction words are cyan.
#[derive(Clone, Debug, Default)]
pub struct InputHighlighter {
    verbs: BTreeSet<String>,
    vocabulary: Vocabulary,
}

impl InputHighlighter {
    /// Creates a highlighter that knows the parser's verbs and directions.
    #[must_use]
    pub fn from_parser(parser: &Parser) -> Self {
        Self {
            verbs: parser.grammar().verbs(),
            vocabulary: parser.vocabulary().clone(),
        }
    }

    /// Returns the known verbs.
    #[must_use]
    pub fn verbs(&self) -> &BTreeSet<String> {
        &self.verbs
    }

    /// Highlights a line of input.
    #[must_use]
    pub fn highlight<'l>(&self, line: &'l str) -> Cow<'l, str> {
        if line.trim().is_empty() {
            return Cow::Borrowed(line);
        }
        let mut result = String::with_capacity(line.len() * 2);
        let mut first = true;
        let mut rest = line;
        while !rest.is_empty() {
            let split = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let (word, tail) = rest.split_at(split);
            let spaces = tail.len() - tail.trim_start().len();
            let (gap, tail) = tail.split_at(spaces);

            if word.is_empty() {
                result.push_str(gap);
            } else {
                let lower = word.to_lowercase();
                let color = if first {
                    first = false;
                    if self.verbs.contains(&lower) || self.vocabulary.is_again(&lower) {
                        Some(KNOWN_VERB)
                    } else if self.vocabulary.direction(&lower).is_some() {
                        Some(DIRECTION)
                    } else {
                        Some(UNKNOWN_VERB)
                    }
                } else if self.vocabulary.direction(&lower).is_some() {
                    Some(DIRECTION)
                } else {
                    None
                };
                match color {
                    Some(color) => {
                        result.push_str(color);
                        result.push_str(word);
                        result.push_str(RESET);
                    }
                    None => result.push_str(word),
                }
                result.push_str(gap);
            }
            rest = tail;
        }
        Cow::Owned(result)
    }
}
