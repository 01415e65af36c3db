//! Engine configuration.
//!
//! Everything here has a sensible default; stories tune it with the
//! `with_*` builders or start from one of the presets.

use parlance_foundation::ScopeLevel;

/// Point values used to score candidate entities for a noun phrase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreWeights {
    /// Head noun equals the entity's name
    pub exact_name: i32,
    /// Head noun is a prefix of, or a word in, the entity's name
    pub partial_name: i32,
    /// Head noun equals one of the entity's aliases
    pub synonym: i32,
    /// Head noun only matches one of the entity's adjectives
    pub adjective_only: i32,
    /// Per adjective in the phrase that the entity carries
    pub modifier: i32,
    /// Target is at least visible
    pub visible: i32,
    /// Target is at least reachable
    pub reachable: i32,
    /// Target is carried by the actor
    pub carried: i32,
    /// Target was mentioned within the mention window
    pub recently_mentioned: i32,
    /// A soft scope hint on the slot is satisfied
    pub soft_hint: i32,
    /// Target is the pronoun's referent
    pub pronoun_referent: i32,
    /// Pronoun referent was set outside the pronoun window
    pub stale_pronoun: i32,
    /// Pronoun does not fit the referent ("him" for a lamp)
    pub pronoun_mismatch: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            exact_name: 10,
            partial_name: 8,
            synonym: 6,
            adjective_only: 4,
            modifier: 5,
            visible: 1,
            reachable: 1,
            carried: 2,
            recently_mentioned: 3,
            soft_hint: 3,
            pronoun_referent: 10,
            stale_pronoun: -4,
            pronoun_mismatch: -6,
        }
    }
}

/// Configuration for the command validator and session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Candidate scoring weights
    pub weights: ScoreWeights,
    /// Candidates scoring below this are discarded
    pub min_confidence: i32,
    /// Entities below this scope level are never candidates
    pub candidate_floor: ScopeLevel,
    /// Turns after which a pronoun referent counts as stale
    pub pronoun_window: u64,
    /// Turns during which a mentioned entity gets the recency bonus
    pub mention_window: u64,
    /// Number of world states kept for undo
    pub undo_depth: usize,
    /// Rounds of turn subscribers reacting to each other's events
    pub cascade_limit: usize,
    /// Emit scored candidates as diagnostic events
    pub diagnostics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            min_confidence: 4,
            candidate_floor: ScopeLevel::Aware,
            pronoun_window: 5,
            mention_window: 3,
            undo_depth: 10,
            cascade_limit: 4,
            diagnostics: false,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only visible things are candidates, and weak matches are refused.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            min_confidence: 8,
            candidate_floor: ScopeLevel::Visible,
            pronoun_window: 2,
            ..Self::default()
        }
    }

    /// Accepts weak matches and keeps pronouns alive longer.
    #[must_use]
    pub fn forgiving() -> Self {
        Self {
            min_confidence: 2,
            pronoun_window: 20,
            mention_window: 6,
            ..Self::default()
        }
    }

    /// Sets the scoring weights.
    #[must_use]
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the minimum confidence.
    #[must_use]
    pub fn with_min_confidence(mut self, min: i32) -> Self {
        self.min_confidence = min;
        self
    }

    /// Sets the candidate scope floor.
    #[must_use]
    pub fn with_candidate_floor(mut self, floor: ScopeLevel) -> Self {
        self.candidate_floor = floor;
        self
    }

    /// Sets the pronoun staleness window.
    #[must_use]
    pub fn with_pronoun_window(mut self, turns: u64) -> Self {
        self.pronoun_window = turns;
        self
    }

    /// Sets the mention recency window.
    #[must_use]
    pub fn with_mention_window(mut self, turns: u64) -> Self {
        self.mention_window = turns;
        self
    }

    /// Sets the undo depth. Zero disables undo.
    #[must_use]
    pub fn with_undo_depth(mut self, depth: usize) -> Self {
        self.undo_depth = depth;
        self
    }

    /// Sets the subscriber cascade limit.
    #[must_use]
    pub fn with_cascade_limit(mut self, rounds: usize) -> Self {
        self.cascade_limit = rounds;
        self
    }

    /// Enables or disables diagnostic events.
    #[must_use]
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }
}
