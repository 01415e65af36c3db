//! Parsed commands.
//!
//! A `ParsedCommand` is the parser's output: a purely syntactic record of
//! which pattern matched and what text filled each slot. It carries no
//! entity references.

use std::fmt;

use parlance_foundation::{ActionId, Direction, PatternId};

use crate::noun_phrase::NounPhrase;

/// How forcefully or carefully a verb acts, inferred from the verb word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Manner {
    /// The plain verb ("put").
    #[default]
    Normal,
    /// A careful verb ("place", "set").
    Careful,
    /// A forceful verb ("jam", "shove", "cram").
    Forceful,
}

impl Manner {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Careful => "careful",
            Self::Forceful => "forceful",
        }
    }
}

/// A restriction on what a noun slot may bind to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeHint {
    /// Must be carried by the actor
    Held,
    /// Must be a container
    Container,
    /// Must be a supporter
    Supporter,
    /// Must be openable
    Openable,
    /// Must be lockable
    Lockable,
    /// Must be switchable
    Switchable,
    /// Must be an actor
    Actor,
    /// Must be at least visible
    Visible,
    /// Must be at least reachable
    Reachable,
    /// Must carry the named story trait
    Trait(String),
}

impl ScopeHint {
    /// Parses a hint word from pattern syntax.
    #[must_use]
    pub fn from_word(word: &str) -> ScopeHint {
        match word {
            "held" | "carried" => Self::Held,
            "container" => Self::Container,
            "supporter" => Self::Supporter,
            "openable" => Self::Openable,
            "lockable" => Self::Lockable,
            "switchable" => Self::Switchable,
            "actor" | "person" => Self::Actor,
            "visible" => Self::Visible,
            "reachable" | "touchable" => Self::Reachable,
            other => Self::Trait(other.to_string()),
        }
    }
}

impl fmt::Display for ScopeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Held => "held",
            Self::Container => "container",
            Self::Supporter => "supporter",
            Self::Openable => "openable",
            Self::Lockable => "lockable",
            Self::Switchable => "switchable",
            Self::Actor => "actor",
            Self::Visible => "visible",
            Self::Reachable => "reachable",
            Self::Trait(name) => name,
        };
        f.write_str(name)
    }
}

/// A scope hint attached to a slot position in a pattern.
///
/// Required hints filter candidates; soft hints (`<noun:hint?>`) only add
/// to a candidate's score.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlotHint {
    /// Zero-based index of the noun slot within the pattern
    pub position: usize,
    /// The restriction
    pub hint: ScopeHint,
    /// Whether candidates that fail the hint are excluded
    pub required: bool,
}

/// A noun slot filled by the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NounSlot {
    /// Slot name from the pattern (`noun`, `second`, ...)
    pub name: String,
    /// Zero-based index among the pattern's noun slots
    pub position: usize,
    /// The phrase that filled the slot
    pub phrase: NounPhrase,
    /// Scope hint declared for the slot, if any
    pub hint: Option<SlotHint>,
}

/// One candidate reading of the player's input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Action the matched pattern maps to
    pub action: ActionId,
    /// The pattern that matched
    pub pattern: PatternId,
    /// Priority of that pattern
    pub priority: i32,
    /// The verb word as typed
    pub verb: String,
    /// Noun slots in pattern order
    pub slots: Vec<NounSlot>,
    /// Direction slot, if the pattern has one
    pub direction: Option<Direction>,
    /// Preposition, explicit or implied
    pub preposition: Option<String>,
    /// True when `preposition` was supplied by the grammar, not typed
    pub preposition_implicit: bool,
    /// Manner inferred from the verb
    pub manner: Manner,
    /// Free text slot, if the pattern has one
    pub text: Option<String>,
    /// The raw input line
    pub input: String,
}

impl ParsedCommand {
    /// Returns the slot with the given name.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&NounSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Returns the first noun slot (the direct object).
    #[must_use]
    pub fn direct(&self) -> Option<&NounSlot> {
        self.slots.first()
    }

    /// Returns the second noun slot (the indirect object).
    #[must_use]
    pub fn indirect(&self) -> Option<&NounSlot> {
        self.slots.get(1)
    }
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action)?;
        if let Some(dir) = self.direction {
            write!(f, " {dir}")?;
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if i == 1 {
                if let Some(prep) = &self.preposition {
                    write!(f, " {prep}")?;
                }
            }
            write!(f, " [{}]", slot.phrase)?;
        }
        if let Some(text) = &self.text {
            write!(f, " {text:?}")?;
        }
        Ok(())
    }
}
