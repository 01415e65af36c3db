//! Syntax pattern matching.
//!
//! Matches token streams against compiled grammar patterns. A match must
//! consume every token. Noun slots may span any number of words that are not
//! prepositions, so two adjacent noun slots can split the input in more than
//! one way; each split is reported as its own match.

use parlance_foundation::{Direction, PatternId};

use crate::grammar::{Pattern, PatternElement};
use crate::tokenizer::InputToken;
use crate::vocabulary::Vocabulary;

/// The tokens that filled one noun slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotSpan {
    /// Slot name
    pub name: String,
    /// Index among the pattern's noun slots
    pub position: usize,
    /// Tokens in the slot
    pub tokens: Vec<InputToken>,
}

/// A successful syntax match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxMatch {
    /// The matched pattern
    pub pattern: PatternId,
    /// The word that matched the pattern's first element
    pub verb: String,
    /// Filled noun slots, in pattern order
    pub slots: Vec<SlotSpan>,
    /// Direction, if the pattern has a direction slot
    pub direction: Option<Direction>,
    /// Preposition literal that separated two noun slots
    pub preposition: Option<String>,
    /// Free text, if the pattern has a text slot
    pub text: Option<String>,
}

#[derive(Clone, Default)]
struct Partial {
    verb: Option<String>,
    slots: Vec<SlotSpan>,
    direction: Option<Direction>,
    preposition: Option<String>,
    text: Option<String>,
}

/// Matches token streams against syntax patterns.
pub struct SyntaxMatcher;

impl SyntaxMatcher {
    /// Returns every way `tokens` can match `pattern`.
    #[must_use]
    pub fn match_pattern(
        tokens: &[InputToken],
        pattern: &Pattern,
        vocab: &Vocabulary,
    ) -> Vec<SyntaxMatch> {
        let mut complete = Vec::new();
        let walker = Walker {
            tokens,
            elements: &pattern.elements,
            vocab,
        };
        walker.walk(0, 0, Partial::default(), &mut complete);

        complete
            .into_iter()
            .map(|p| SyntaxMatch {
                pattern: pattern.id,
                verb: p
                    .verb
                    .or_else(|| tokens.first().map(|t| t.text().to_string()))
                    .unwrap_or_default(),
                slots: p.slots,
                direction: p.direction,
                preposition: p.preposition,
                text: p.text,
            })
            .collect()
    }
}

struct Walker<'a> {
    tokens: &'a [InputToken],
    elements: &'a [PatternElement],
    vocab: &'a Vocabulary,
}

impl Walker<'_> {
    fn walk(&self, ei: usize, ti: usize, partial: Partial, out: &mut Vec<Partial>) {
        let Some(element) = self.elements.get(ei) else {
            if ti == self.tokens.len() {
                out.push(partial);
            }
            return;
        };
        let word = self.tokens.get(ti).and_then(InputToken::word);

        match element {
            PatternElement::Literal(words) => {
                if let Some(w) = word.filter(|w| words.iter().any(|x| x == w)) {
                    let mut next = partial;
                    if ei == 0 {
                        next.verb = Some(w.to_string());
                    } else if self.separates_slots(ei, &next) && self.vocab.is_preposition(w) {
                        next.preposition = Some(w.to_string());
                    }
                    self.walk(ei + 1, ti + 1, next, out);
                }
            }
            PatternElement::Optional(words) => {
                if word.is_some_and(|w| words.iter().any(|x| x == w)) {
                    self.walk(ei + 1, ti + 1, partial.clone(), out);
                }
                self.walk(ei + 1, ti, partial, out);
            }
            PatternElement::Direction => {
                if let Some(dir) = word.and_then(|w| self.vocab.direction(w)) {
                    let mut next = partial;
                    if ei == 0 {
                        next.verb = word.map(str::to_string);
                    }
                    next.direction = Some(dir);
                    self.walk(ei + 1, ti + 1, next, out);
                }
            }
            PatternElement::Text => {
                if ti < self.tokens.len() {
                    let text = self.tokens[ti..]
                        .iter()
                        .map(InputToken::text)
                        .collect::<Vec<_>>()
                        .join(" ");
                    let mut next = partial;
                    next.text = Some(text);
                    self.walk(ei + 1, self.tokens.len(), next, out);
                }
            }
            PatternElement::Noun { name, position } => {
                for end in ti + 1..=self.tokens.len() {
                    let last = &self.tokens[end - 1];
                    if last.word().is_some_and(|w| self.vocab.is_preposition(w)) {
                        break;
                    }
                    let mut next = partial.clone();
                    next.slots.push(SlotSpan {
                        name: name.clone(),
                        position: *position,
                        tokens: self.tokens[ti..end].to_vec(),
                    });
                    self.walk(ei + 1, end, next, out);
                }
            }
        }
    }

    /// True if element `ei` sits between a filled slot and a slot still to come.
    fn separates_slots(&self, ei: usize, partial: &Partial) -> bool {
        partial.preposition.is_none()
            && !partial.slots.is_empty()
            && self.elements[ei + 1..]
                .iter()
                .any(|e| matches!(e, PatternElement::Noun { .. }))
    }
}
