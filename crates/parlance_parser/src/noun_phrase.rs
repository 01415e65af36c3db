//! Noun phrase representation.
//!
//! Handles phrases like "the brass lamp", "second key", "it", or
//! "everything but the lamp". A noun phrase is purely syntactic; binding it
//! to an entity is the validator's job.

use std::fmt;

/// A parsed noun phrase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NounPhrase {
    /// The words of the phrase as typed, minus articles
    pub text: String,
    /// Adjectives modifying the noun (e.g., "brass" in "brass lamp")
    pub adjectives: Vec<String>,
    /// The head noun (e.g., "lamp"). Empty for a bare "all".
    pub noun: String,
    /// Quantifier (specific, all, all-but)
    pub quantifier: Quantifier,
    /// Ordinal selector (first, second, etc.)
    pub ordinal: Option<usize>,
    /// Set when the phrase is a pronoun
    pub pronoun: Option<PronounKind>,
}

impl NounPhrase {
    /// Creates a new noun phrase with just a noun.
    #[must_use]
    pub fn new(noun: impl Into<String>) -> Self {
        let noun = noun.into();
        Self {
            text: noun.clone(),
            adjectives: Vec::new(),
            noun,
            quantifier: Quantifier::Specific,
            ordinal: None,
            pronoun: None,
        }
    }

    /// Creates a phrase from its words: every word but the last is an adjective.
    #[must_use]
    pub fn from_words(words: &[String]) -> Self {
        let (noun, adjectives) = match words.split_last() {
            Some((noun, adjectives)) => (noun.clone(), adjectives.to_vec()),
            None => (String::new(), Vec::new()),
        };
        Self {
            text: words.join(" "),
            adjectives,
            noun,
            quantifier: Quantifier::Specific,
            ordinal: None,
            pronoun: None,
        }
    }

    /// Creates a pronoun phrase.
    #[must_use]
    pub fn pronoun(word: &str, kind: PronounKind) -> Self {
        Self {
            pronoun: Some(kind),
            ..Self::new(word)
        }
    }

    /// Adds an adjective to the noun phrase.
    #[must_use]
    pub fn with_adjective(mut self, adj: impl Into<String>) -> Self {
        let adj = adj.into();
        self.text = format!("{adj} {}", self.text);
        self.adjectives.push(adj);
        self
    }

    /// Sets the quantifier.
    #[must_use]
    pub fn with_quantifier(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = quantifier;
        self
    }

    /// Sets the ordinal.
    #[must_use]
    pub fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    /// Returns true for "all" and "all but" phrases.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self.quantifier, Quantifier::All | Quantifier::AllExcept(_))
    }
}

impl fmt::Display for NounPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Quantifier for noun phrases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Quantifier {
    /// Specific item (the sword)
    Specific,
    /// All matching items
    All,
    /// All matching items except those named
    AllExcept(Vec<NounPhrase>),
}

/// Which pronoun a phrase used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PronounKind {
    /// "it": the last inanimate thing
    It,
    /// "him": the last masculine person
    Him,
    /// "her": the last feminine person
    Her,
    /// "them": the last group, or the last person of any gender
    Them,
}
