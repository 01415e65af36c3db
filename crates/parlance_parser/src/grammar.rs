//! Grammar table: verb patterns mapped to actions.
//!
//! Patterns are written as space-separated elements:
//!
//! | Element          | Meaning                                         |
//! |------------------|-------------------------------------------------|
//! | `take\|get`      | one of these words, required                    |
//! | `[up]`           | optional word (alternatives allowed: `[up\|down]`) |
//! | `<noun>`         | noun slot named `noun`                          |
//! | `<noun:held>`    | noun slot with a required scope hint            |
//! | `<noun:held?>`   | noun slot with a soft scope hint                |
//! | `<direction>`    | a direction word                                |
//! | `<text>`         | the rest of the input, verbatim (must be last)  |

use std::collections::{BTreeMap, BTreeSet};

use parlance_foundation::{ActionId, Error, ErrorKind, PatternId, Result};
use tracing::{debug, error};

use crate::command::{ScopeHint, SlotHint};

/// Priority patterns get unless registered with another.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Whether a pattern may be removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternCategory {
    /// Built in; removing it is an error
    Standard,
    /// Registered by story content; can be unregistered
    Custom,
}

/// A compiled pattern element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternElement {
    /// One of these words must appear
    Literal(Vec<String>),
    /// One of these words may appear
    Optional(Vec<String>),
    /// A noun slot
    Noun {
        /// Slot name
        name: String,
        /// Index among the pattern's noun slots
        position: usize,
    },
    /// A direction word
    Direction,
    /// The remaining input, verbatim
    Text,
}

/// A registered pattern.
#[derive(Clone, Debug)]
pub struct Pattern {
    /// Identifier assigned at registration
    pub id: PatternId,
    /// The pattern source text
    pub source: String,
    /// Action the pattern maps to
    pub action: ActionId,
    /// Higher priorities are tried first
    pub priority: i32,
    /// Standard or custom
    pub category: PatternCategory,
    /// Compiled elements
    pub elements: Vec<PatternElement>,
    /// Scope hints by slot position
    pub hints: Vec<SlotHint>,
    /// Preposition injected when the input has none
    pub implied_preposition: Option<String>,
}

impl Pattern {
    /// Compiles pattern source into elements and slot hints.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` for empty patterns, unterminated brackets,
    /// empty alternatives or slot names, duplicate slot names, and a text
    /// slot anywhere but last.
    pub fn compile(source: &str) -> Result<(Vec<PatternElement>, Vec<SlotHint>)> {
        let mut elements = Vec::new();
        let mut hints = Vec::new();
        let mut slot_names = BTreeSet::new();
        let words: Vec<&str> = source.split_whitespace().collect();

        if words.is_empty() {
            return Err(Error::invalid_pattern(source, "empty pattern"));
        }

        for (i, word) in words.iter().enumerate() {
            if elements.last() == Some(&PatternElement::Text) {
                return Err(Error::invalid_pattern(source, "<text> must be the last element"));
            }
            if let Some(inner) = word.strip_prefix('<') {
                let inner = inner
                    .strip_suffix('>')
                    .ok_or_else(|| Error::invalid_pattern(source, format!("unterminated slot {word}")))?;
                let (name, hint) = match inner.split_once(':') {
                    Some((name, hint)) => (name, Some(hint)),
                    None => (inner, None),
                };
                if name.is_empty() {
                    return Err(Error::invalid_pattern(source, "empty slot name"));
                }
                match name {
                    "direction" => elements.push(PatternElement::Direction),
                    "text" => elements.push(PatternElement::Text),
                    _ => {
                        if !slot_names.insert(name.to_string()) {
                            return Err(Error::invalid_pattern(
                                source,
                                format!("duplicate slot <{name}>"),
                            ));
                        }
                        let position = slot_names.len() - 1;
                        if let Some(hint) = hint {
                            let (hint, required) = match hint.strip_suffix('?') {
                                Some(soft) => (soft, false),
                                None => (hint, true),
                            };
                            if hint.is_empty() {
                                return Err(Error::invalid_pattern(source, "empty scope hint"));
                            }
                            hints.push(SlotHint {
                                position,
                                hint: ScopeHint::from_word(hint),
                                required,
                            });
                        }
                        elements.push(PatternElement::Noun {
                            name: name.to_string(),
                            position,
                        });
                    }
                }
            } else if let Some(inner) = word.strip_prefix('[') {
                let inner = inner.strip_suffix(']').ok_or_else(|| {
                    Error::invalid_pattern(source, format!("unterminated optional {word}"))
                })?;
                elements.push(PatternElement::Optional(alternatives(source, inner)?));
            } else if word.contains(['>', ']']) {
                return Err(Error::invalid_pattern(
                    source,
                    format!("stray bracket in {word} at element {i}"),
                ));
            } else {
                elements.push(PatternElement::Literal(alternatives(source, word)?));
            }
        }

        Ok((elements, hints))
    }

    /// Returns the words the pattern can start with, if it starts with a literal.
    #[must_use]
    pub fn leading_words(&self) -> Option<&[String]> {
        match self.elements.first() {
            Some(PatternElement::Literal(words)) => Some(words),
            _ => None,
        }
    }

    /// Returns the number of noun slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, PatternElement::Noun { .. }))
            .count()
    }

    /// Returns the hint for a slot position, if declared.
    #[must_use]
    pub fn hint_for(&self, position: usize) -> Option<&SlotHint> {
        self.hints.iter().find(|h| h.position == position)
    }
}

fn alternatives(source: &str, word: &str) -> Result<Vec<String>> {
    let alts: Vec<String> = word.split('|').map(str::to_lowercase).collect();
    if alts.iter().any(String::is_empty) {
        return Err(Error::invalid_pattern(
            source,
            format!("empty alternative in {word}"),
        ));
    }
    Ok(alts)
}

/// Registered patterns, looked up by leading verb.
#[derive(Clone, Debug, Default)]
pub struct GrammarTable {
    patterns: BTreeMap<PatternId, Pattern>,
    next_id: u32,
}

impl GrammarTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom pattern at the default priority.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if the source does not compile.
    pub fn register(&mut self, source: &str, action: impl Into<ActionId>) -> Result<PatternId> {
        self.define(source, action).register()
    }

    /// Starts a pattern definition with explicit options.
    pub fn define(&mut self, source: &str, action: impl Into<ActionId>) -> PatternBuilder<'_> {
        PatternBuilder {
            table: self,
            source: source.to_string(),
            action: action.into(),
            priority: DEFAULT_PRIORITY,
            category: PatternCategory::Custom,
            implied_preposition: None,
        }
    }

    fn insert(
        &mut self,
        source: String,
        action: ActionId,
        priority: i32,
        category: PatternCategory,
        implied_preposition: Option<String>,
    ) -> Result<PatternId> {
        let (elements, hints) = Pattern::compile(&source)?;
        let id = PatternId(self.next_id);
        self.next_id += 1;
        debug!(%id, %action, priority, pattern = %source, "registered pattern");
        self.patterns.insert(
            id,
            Pattern {
                id,
                source,
                action,
                priority,
                category,
                elements,
                hints,
                implied_preposition,
            },
        );
        Ok(id)
    }

    /// Removes a custom pattern.
    ///
    /// # Errors
    ///
    /// Returns `StandardPatternRemoval` for built-in patterns and
    /// `UnknownPattern` for ids that are not registered.
    pub fn unregister(&mut self, id: PatternId) -> Result<Pattern> {
        match self.patterns.get(&id) {
            None => Err(Error::new(ErrorKind::UnknownPattern(id))),
            Some(p) if p.category == PatternCategory::Standard => {
                error!(%id, pattern = %p.source, "attempted to remove a standard pattern");
                Err(Error::new(ErrorKind::StandardPatternRemoval(id)))
            }
            Some(_) => self
                .patterns
                .remove(&id)
                .ok_or_else(|| Error::new(ErrorKind::UnknownPattern(id))),
        }
    }

    /// Returns the patterns that could match input starting with `verb`.
    ///
    /// Includes every pattern whose first element accepts the word, plus
    /// patterns that start with a slot. Sorted by descending priority, then
    /// registration order.
    #[must_use]
    pub fn patterns_for(&self, verb: &str) -> Vec<&Pattern> {
        let mut found: Vec<&Pattern> = self
            .patterns
            .values()
            .filter(|p| match p.leading_words() {
                Some(words) => words.iter().any(|w| w == verb),
                None => true,
            })
            .collect();
        found.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        found
    }

    /// Gets a pattern by id.
    #[must_use]
    pub fn get(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(&id)
    }

    /// Returns every word a pattern can start with.
    #[must_use]
    pub fn verbs(&self) -> BTreeSet<String> {
        self.patterns
            .values()
            .filter_map(Pattern::leading_words)
            .flatten()
            .cloned()
            .collect()
    }

    /// Returns the number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if no patterns are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates patterns in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.values()
    }
}

/// Builder returned by [`GrammarTable::define`].
#[must_use = "call register() to add the pattern"]
pub struct PatternBuilder<'a> {
    table: &'a mut GrammarTable,
    source: String,
    action: ActionId,
    priority: i32,
    category: PatternCategory,
    implied_preposition: Option<String>,
}

impl PatternBuilder<'_> {
    /// Sets the priority.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Marks the pattern as standard (not removable).
    pub fn standard(mut self) -> Self {
        self.category = PatternCategory::Standard;
        self
    }

    /// Declares the preposition implied when the input has none.
    pub fn implies(mut self, preposition: &str) -> Self {
        self.implied_preposition = Some(preposition.to_string());
        self
    }

    /// Compiles and registers the pattern.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if the source does not compile.
    pub fn register(self) -> Result<PatternId> {
        self.table.insert(
            self.source,
            self.action,
            self.priority,
            self.category,
            self.implied_preposition,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_alternatives_and_slots() {
        let (elements, hints) = Pattern::compile("take|get|grab <noun>").unwrap();
        assert_eq!(
            elements,
            vec![
                PatternElement::Literal(vec!["take".into(), "get".into(), "grab".into()]),
                PatternElement::Noun {
                    name: "noun".into(),
                    position: 0
                },
            ]
        );
        assert!(hints.is_empty());
    }

    #[test]
    fn compile_hints_positional() {
        let (_, hints) =
            Pattern::compile("put <noun:held> in|into <second:container?>").unwrap();
        assert_eq!(
            hints,
            vec![
                SlotHint {
                    position: 0,
                    hint: ScopeHint::Held,
                    required: true
                },
                SlotHint {
                    position: 1,
                    hint: ScopeHint::Container,
                    required: false
                },
            ]
        );
    }

    #[test]
    fn compile_optional_direction_text() {
        let (elements, _) = Pattern::compile("pick [up] <noun>").unwrap();
        assert_eq!(elements[1], PatternElement::Optional(vec!["up".into()]));
        let (elements, _) = Pattern::compile("go <direction>").unwrap();
        assert_eq!(elements[1], PatternElement::Direction);
        let (elements, _) = Pattern::compile("say <text>").unwrap();
        assert_eq!(elements[1], PatternElement::Text);
    }

    #[test]
    fn compile_rejects_malformed() {
        for bad in [
            "",
            "take <noun",
            "take [up",
            "take||get <noun>",
            "put <noun> in <noun>",
            "say <text> loudly",
            "take <>",
            "take <noun:>",
            "take noun>",
        ] {
            let err = Pattern::compile(bad).unwrap_err();
            assert!(
                matches!(err.kind, ErrorKind::InvalidPattern { .. }),
                "{bad:?} should be invalid"
            );
        }
    }

    #[test]
    fn lookup_sorted_by_priority_then_registration() {
        let mut table = GrammarTable::new();
        let a = table.register("take <noun>", "taking").unwrap();
        let b = table
            .define("take <noun> from <second>", "taking")
            .priority(105)
            .register()
            .unwrap();
        let c = table.register("take off <noun>", "disrobing").unwrap();
        table.register("drop <noun>", "dropping").unwrap();

        let ids: Vec<_> = table.patterns_for("take").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b, a, c]);
    }

    #[test]
    fn slot_led_patterns_are_always_candidates() {
        let mut table = GrammarTable::new();
        let dir = table.register("<direction>", "going").unwrap();
        assert_eq!(table.patterns_for("north")[0].id, dir);
        assert_eq!(table.patterns_for("xyzzy").len(), 1);
    }

    #[test]
    fn unregister_custom_but_not_standard() {
        let mut table = GrammarTable::new();
        let std_id = table.define("look", "looking").standard().register().unwrap();
        let custom = table.register("xyzzy", "magic").unwrap();

        let removed = table.unregister(custom).unwrap();
        assert_eq!(removed.source, "xyzzy");
        assert!(table.get(custom).is_none());

        let err = table.unregister(std_id).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::StandardPatternRemoval(_)));
        assert!(table.get(std_id).is_some());

        let err = table.unregister(custom).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownPattern(_)));
    }

    #[test]
    fn verbs_lists_leading_words() {
        let mut table = GrammarTable::new();
        table.register("take|get <noun>", "taking").unwrap();
        table.register("<direction>", "going").unwrap();
        let verbs: Vec<_> = table.verbs().into_iter().collect();
        assert_eq!(verbs, vec!["get".to_string(), "take".to_string()]);
    }
}
