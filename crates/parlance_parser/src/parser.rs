//! Main parser pipeline.
//!
//! Orchestrates the flow from raw input to candidate commands:
//! tokenize, strip articles, look up patterns by verb, match, then build
//! noun phrases for each filled slot. The parser never looks at the world.

use tracing::debug;

use crate::command::{NounSlot, ParsedCommand};
use crate::grammar::{GrammarTable, Pattern};
use crate::noun_phrase::{NounPhrase, Quantifier};
use crate::stdlib::standard_grammar;
use crate::syntax::{SlotSpan, SyntaxMatch, SyntaxMatcher};
use crate::tokenizer::{InputToken, InputTokenizer};
use crate::vocabulary::Vocabulary;

/// Result of parsing player input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// One or more readings, all at the highest matched priority
    Commands(Vec<ParsedCommand>),
    /// Nothing matched
    NoCommand(SyntaxFailure),
}

impl ParseOutcome {
    /// Returns the candidate commands, or an empty slice.
    #[must_use]
    pub fn commands(&self) -> &[ParsedCommand] {
        match self {
            Self::Commands(cmds) => cmds,
            Self::NoCommand(_) => &[],
        }
    }
}

/// Why input produced no command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxFailure {
    /// Input was blank after stripping
    Empty,
    /// No pattern consumed the whole input
    NoMatch {
        /// The first word of the input
        verb: String,
    },
}

/// The natural language parser.
#[derive(Clone, Debug)]
pub struct Parser {
    grammar: GrammarTable,
    vocabulary: Vocabulary,
}

impl Parser {
    /// Creates a parser from a grammar and vocabulary.
    #[must_use]
    pub fn new(grammar: GrammarTable, vocabulary: Vocabulary) -> Self {
        Self {
            grammar,
            vocabulary,
        }
    }

    /// Creates a parser with the standard English grammar and vocabulary.
    #[must_use]
    pub fn english() -> Self {
        Self::new(standard_grammar(), Vocabulary::english())
    }

    /// Returns the grammar table.
    #[must_use]
    pub fn grammar(&self) -> &GrammarTable {
        &self.grammar
    }

    /// Returns the grammar table for registration.
    pub fn grammar_mut(&mut self) -> &mut GrammarTable {
        &mut self.grammar
    }

    /// Returns the vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Returns the vocabulary for registration.
    pub fn vocabulary_mut(&mut self) -> &mut Vocabulary {
        &mut self.vocabulary
    }

    /// Checks if the input asks to repeat the previous command.
    #[must_use]
    pub fn is_again(&self, input: &str) -> bool {
        let tokens = self.vocabulary.strip(InputTokenizer::tokenize(input));
        matches!(tokens.as_slice(), [InputToken::Word(w)] if self.vocabulary.is_again(w))
    }

    /// Parses player input into candidate commands.
    #[must_use]
    pub fn parse(&self, input: &str) -> ParseOutcome {
        let tokens = self.vocabulary.strip(InputTokenizer::tokenize(input));
        let Some(first) = tokens.first() else {
            return ParseOutcome::NoCommand(SyntaxFailure::Empty);
        };
        let verb = first.text().to_string();

        let mut best: Option<i32> = None;
        let mut commands = Vec::new();
        for pattern in self.grammar.patterns_for(&verb) {
            // Sorted by priority: once something matched, lower levels are out.
            if best.is_some_and(|p| pattern.priority < p) {
                break;
            }
            for found in SyntaxMatcher::match_pattern(&tokens, pattern, &self.vocabulary) {
                best = Some(pattern.priority);
                commands.push(self.build(pattern, found, input));
            }
        }

        if commands.is_empty() {
            debug!(input, %verb, "no pattern matched");
            return ParseOutcome::NoCommand(SyntaxFailure::NoMatch { verb });
        }
        for cmd in &commands {
            debug!(input, pattern = %cmd.pattern, command = %cmd, "parse candidate");
        }
        ParseOutcome::Commands(commands)
    }

    fn build(&self, pattern: &Pattern, found: SyntaxMatch, input: &str) -> ParsedCommand {
        let slots: Vec<NounSlot> = found
            .slots
            .into_iter()
            .map(|span| NounSlot {
                hint: pattern.hint_for(span.position).cloned(),
                phrase: self.phrase(&span),
                name: span.name,
                position: span.position,
            })
            .collect();

        let (preposition, preposition_implicit) = match found.preposition {
            Some(prep) => (Some(prep), false),
            None => {
                let implied = pattern
                    .implied_preposition
                    .clone()
                    .or_else(|| self.vocabulary.implied_preposition(&found.verb).map(str::to_string));
                let implicit = implied.is_some();
                (implied, implicit)
            }
        };

        ParsedCommand {
            action: pattern.action.clone(),
            pattern: pattern.id,
            priority: pattern.priority,
            manner: self.vocabulary.manner(&found.verb),
            verb: found.verb,
            slots,
            direction: found.direction,
            preposition,
            preposition_implicit,
            text: found.text,
            input: input.to_string(),
        }
    }

    /// Builds the noun phrase for a filled slot.
    fn phrase(&self, span: &SlotSpan) -> NounPhrase {
        if let [InputToken::Quoted(text)] = span.tokens.as_slice() {
            return NounPhrase::new(text.to_lowercase());
        }
        let words: Vec<String> = span.tokens.iter().map(|t| t.text().to_string()).collect();
        let vocab = &self.vocabulary;

        if let [word] = words.as_slice() {
            if let Some(kind) = vocab.pronoun(word) {
                return NounPhrase::pronoun(word, kind);
            }
        }

        match words.split_first() {
            Some((first, rest)) if vocab.is_all_word(first) => {
                match rest.split_first() {
                    Some((except, excluded)) if vocab.is_except_word(except) => {
                        let excluded: Vec<NounPhrase> = excluded
                            .split(|w| vocab.is_conjunction(w))
                            .filter(|part| !part.is_empty())
                            .map(|part| self.specific(part))
                            .collect();
                        let quantifier = if excluded.is_empty() {
                            Quantifier::All
                        } else {
                            Quantifier::AllExcept(excluded)
                        };
                        NounPhrase {
                            text: words.join(" "),
                            ..NounPhrase::from_words(&[]).with_quantifier(quantifier)
                        }
                    }
                    // "all" alone, or "all coins"
                    _ => NounPhrase {
                        text: words.join(" "),
                        ..NounPhrase::from_words(rest).with_quantifier(Quantifier::All)
                    },
                }
            }
            _ => self.specific(&words),
        }
    }

    fn specific(&self, words: &[String]) -> NounPhrase {
        match words.split_first() {
            Some((first, rest)) if !rest.is_empty() => match self.vocabulary.ordinal(first) {
                Some(n) => NounPhrase {
                    text: words.join(" "),
                    ..NounPhrase::from_words(rest).with_ordinal(n)
                },
                None => NounPhrase::from_words(words),
            },
            _ => NounPhrase::from_words(words),
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::english()
    }
}
