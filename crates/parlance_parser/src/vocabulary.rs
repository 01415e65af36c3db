//! Vocabulary: the closed-class words the parser needs to know about.
//!
//! Verbs live in the grammar table's patterns, and nouns live on entities.
//! Everything else (articles, prepositions, pronouns, directions,
//! quantifiers, ordinals) is registered here.

use std::collections::{HashMap, HashSet};

use parlance_foundation::Direction;

use crate::command::Manner;
use crate::noun_phrase::PronounKind;
use crate::tokenizer::InputToken;

/// Runtime storage for vocabulary definitions.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    /// Words dropped before matching ("the", "a")
    articles: HashSet<String>,
    /// Other words dropped before matching ("please")
    filler: HashSet<String>,
    /// Prepositions; noun phrases never span these
    prepositions: HashSet<String>,
    /// Direction words and abbreviations
    directions: HashMap<String, Direction>,
    /// Pronoun words
    pronouns: HashMap<String, PronounKind>,
    /// Words that start an "all" phrase
    all_words: HashSet<String>,
    /// Words that start an exception list ("but", "except")
    except_words: HashSet<String>,
    /// Words joining list items ("and")
    conjunctions: HashSet<String>,
    /// Ordinal words
    ordinals: HashMap<String, usize>,
    /// Verb -> preposition it implies when none is typed
    implied_prepositions: HashMap<String, String>,
    /// Verb -> manner
    manners: HashMap<String, Manner>,
    /// Words that repeat the previous command
    again_words: HashSet<String>,
}

fn set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

impl Vocabulary {
    /// Creates a new empty vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the standard English vocabulary.
    #[must_use]
    pub fn english() -> Self {
        let mut vocab = Self {
            articles: set(&["the", "a", "an", "some"]),
            filler: set(&["please"]),
            prepositions: set(&[
                "in", "into", "inside", "on", "onto", "upon", "with", "to", "at", "from", "under",
                "behind", "off", "about", "through", "using",
            ]),
            all_words: set(&["all", "everything", "every"]),
            except_words: set(&["but", "except"]),
            conjunctions: set(&["and"]),
            again_words: set(&["again", "g"]),
            ..Self::default()
        };

        for dir in Direction::ALL {
            vocab.add_direction(dir.name(), dir);
        }
        for (word, dir) in [
            ("n", Direction::North),
            ("s", Direction::South),
            ("e", Direction::East),
            ("w", Direction::West),
            ("ne", Direction::Northeast),
            ("nw", Direction::Northwest),
            ("se", Direction::Southeast),
            ("sw", Direction::Southwest),
            ("u", Direction::Up),
            ("d", Direction::Down),
        ] {
            vocab.add_direction(word, dir);
        }

        for (word, kind) in [
            ("it", PronounKind::It),
            ("him", PronounKind::Him),
            ("her", PronounKind::Her),
            ("them", PronounKind::Them),
        ] {
            vocab.pronouns.insert(word.to_string(), kind);
        }

        for (i, word) in [
            "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
            "tenth",
        ]
        .iter()
        .enumerate()
        {
            vocab.ordinals.insert((*word).to_string(), i + 1);
        }

        for verb in ["lock", "unlock"] {
            vocab.add_implied_preposition(verb, "with");
        }
        for verb in ["insert", "jam", "shove", "cram", "stuff"] {
            vocab.add_implied_preposition(verb, "in");
        }
        vocab.add_implied_preposition("hang", "on");

        for verb in ["jam", "shove", "cram", "stuff", "force"] {
            vocab.add_manner(verb, Manner::Forceful);
        }
        for verb in ["place", "set", "lay"] {
            vocab.add_manner(verb, Manner::Careful);
        }

        vocab
    }

    /// Registers an article.
    pub fn add_article(&mut self, word: &str) {
        self.articles.insert(word.to_string());
    }

    /// Registers a filler word.
    pub fn add_filler(&mut self, word: &str) {
        self.filler.insert(word.to_string());
    }

    /// Registers a preposition.
    pub fn add_preposition(&mut self, word: &str) {
        self.prepositions.insert(word.to_string());
    }

    /// Registers a direction word.
    pub fn add_direction(&mut self, word: &str, direction: Direction) {
        self.directions.insert(word.to_string(), direction);
    }

    /// Declares the preposition a verb implies when none is typed.
    pub fn add_implied_preposition(&mut self, verb: &str, preposition: &str) {
        self.implied_prepositions
            .insert(verb.to_string(), preposition.to_string());
    }

    /// Declares the manner a verb carries.
    pub fn add_manner(&mut self, verb: &str, manner: Manner) {
        self.manners.insert(verb.to_string(), manner);
    }

    /// Checks if a word is a registered preposition.
    #[must_use]
    pub fn is_preposition(&self, word: &str) -> bool {
        self.prepositions.contains(word)
    }

    /// Looks up a direction word.
    #[must_use]
    pub fn direction(&self, word: &str) -> Option<Direction> {
        self.directions.get(word).copied()
    }

    /// Looks up a pronoun word.
    #[must_use]
    pub fn pronoun(&self, word: &str) -> Option<PronounKind> {
        self.pronouns.get(word).copied()
    }

    /// Checks if a word starts an "all" phrase.
    #[must_use]
    pub fn is_all_word(&self, word: &str) -> bool {
        self.all_words.contains(word)
    }

    /// Checks if a word starts an exception list.
    #[must_use]
    pub fn is_except_word(&self, word: &str) -> bool {
        self.except_words.contains(word)
    }

    /// Checks if a word joins list items.
    #[must_use]
    pub fn is_conjunction(&self, word: &str) -> bool {
        self.conjunctions.contains(word)
    }

    /// Looks up an ordinal word.
    #[must_use]
    pub fn ordinal(&self, word: &str) -> Option<usize> {
        self.ordinals.get(word).copied()
    }

    /// Returns the preposition a verb implies.
    #[must_use]
    pub fn implied_preposition(&self, verb: &str) -> Option<&str> {
        self.implied_prepositions.get(verb).map(String::as_str)
    }

    /// Returns the manner of a verb; plain verbs are `Normal`.
    #[must_use]
    pub fn manner(&self, verb: &str) -> Manner {
        self.manners.get(verb).copied().unwrap_or_default()
    }

    /// Checks if a word repeats the previous command.
    #[must_use]
    pub fn is_again(&self, word: &str) -> bool {
        self.again_words.contains(word)
    }

    /// Drops articles and filler words.
    #[must_use]
    pub fn strip(&self, tokens: Vec<InputToken>) -> Vec<InputToken> {
        tokens
            .into_iter()
            .filter(|t| match t.word() {
                Some(w) => !self.articles.contains(w) && !self.filler.contains(w),
                None => true,
            })
            .collect()
    }
}
