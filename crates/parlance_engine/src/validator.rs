//! Command validation: binding noun phrases to entities.
//!
//! The validator takes a [`ParsedCommand`] and the world, collects the
//! entities in the actor's scope, filters them by each slot's hard scope
//! hint, and scores the rest against the noun phrase with the configured
//! [`ScoreWeights`](crate::config::ScoreWeights). The highest score wins;
//! a tie at the top is handed back to the player as a [`Disambiguation`].
//!
//! Validation never mutates anything. The session records mentions after a
//! successful resolution.

use std::collections::BTreeMap;
use std::fmt;

use parlance_foundation::{ActionId, EntityId, ScopeLevel};
use parlance_parser::{
    InputTokenizer, NounPhrase, NounSlot, ParsedCommand, PronounKind, Quantifier, ScopeHint,
    Vocabulary,
};
use parlance_world::{TraitKind, World};
use tracing::debug;

use crate::action::ActionRegistry;
use crate::config::EngineConfig;
use crate::pronouns::{PronounHistory, pronoun_fits};
use crate::scope::ScopeResolver;

/// Words that always mean the actor.
const SELF_WORDS: &[&str] = &["me", "myself", "self"];

// =============================================================================
// Results
// =============================================================================

/// What a noun slot is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotBinding {
    /// A single entity
    One(EntityId),
    /// Several entities, from "all" or a plural pronoun
    Many(Vec<EntityId>),
}

impl SlotBinding {
    /// Returns the entity of a single binding.
    #[must_use]
    pub fn one(&self) -> Option<EntityId> {
        match self {
            Self::One(e) => Some(*e),
            Self::Many(_) => None,
        }
    }

    /// Returns every bound entity.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        match self {
            Self::One(e) => vec![*e],
            Self::Many(es) => es.clone(),
        }
    }
}

/// A bound noun slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    /// Slot name from the pattern
    pub slot: String,
    /// Slot position
    pub position: usize,
    /// The bound entities
    pub target: SlotBinding,
    /// Scope level observed when binding (lowest, for several)
    pub level: ScopeLevel,
    /// Winning score; zero for forced and "all" bindings
    pub score: i32,
}

/// A command whose noun slots are bound to entities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCommand {
    /// The parsed command
    pub command: ParsedCommand,
    /// Who acts
    pub actor: EntityId,
    /// One binding per noun slot, in slot order
    pub bindings: Vec<Binding>,
}

impl ResolvedCommand {
    /// Returns the action id.
    #[must_use]
    pub fn action(&self) -> &ActionId {
        &self.command.action
    }

    /// Returns the binding for a slot name.
    #[must_use]
    pub fn binding(&self, slot: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.slot == slot)
    }

    /// Returns the single entity in the first slot.
    #[must_use]
    pub fn direct(&self) -> Option<EntityId> {
        self.bindings.first().and_then(|b| b.target.one())
    }

    /// Returns the single entity in the second slot.
    #[must_use]
    pub fn indirect(&self) -> Option<EntityId> {
        self.bindings.get(1).and_then(|b| b.target.one())
    }

    /// Returns true if any slot is bound to several entities.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.bindings
            .iter()
            .any(|b| matches!(b.target, SlotBinding::Many(_)))
    }

    /// Returns the sum of binding scores.
    #[must_use]
    pub fn confidence(&self) -> i32 {
        self.bindings.iter().map(|b| b.score).sum()
    }

    /// Splits a multiple binding into one command per entity.
    ///
    /// Commands without a multiple binding come back unchanged.
    #[must_use]
    pub fn expand(&self) -> Vec<ResolvedCommand> {
        let Some(index) = self
            .bindings
            .iter()
            .position(|b| matches!(b.target, SlotBinding::Many(_)))
        else {
            return vec![self.clone()];
        };
        self.bindings[index]
            .target
            .entities()
            .into_iter()
            .map(|e| {
                let mut single = self.clone();
                single.bindings[index].target = SlotBinding::One(e);
                single
            })
            .collect()
    }
}

/// Why a command could not be bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// Nothing in scope answers to the phrase
    NothingMatches {
        /// The phrase as typed
        text: String,
    },
    /// Something answers to the phrase but fails the slot's scope hint
    HintUnsatisfied {
        /// The phrase as typed
        text: String,
        /// The hint that failed
        hint: ScopeHint,
    },
    /// A pronoun has nothing (in scope) to refer to
    NoReferent {
        /// The pronoun used
        pronoun: PronounKind,
    },
    /// "all" matched nothing
    NothingForAll,
    /// The pattern maps to an action that is not registered
    UnknownAction {
        /// The missing action
        action: ActionId,
    },
}

impl ResolutionFailure {
    /// Returns the lowercase name of the failure.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NothingMatches { .. } => "nothing_matches",
            Self::HintUnsatisfied { .. } => "hint_unsatisfied",
            Self::NoReferent { .. } => "no_referent",
            Self::NothingForAll => "nothing_for_all",
            Self::UnknownAction { .. } => "unknown_action",
        }
    }
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingMatches { text } => write!(f, "nothing matches {text:?}"),
            Self::HintUnsatisfied { text, hint } => write!(f, "{text:?} is not {hint}"),
            Self::NoReferent { pronoun } => write!(f, "no referent for {pronoun:?}"),
            Self::NothingForAll => f.write_str("nothing to do that to"),
            Self::UnknownAction { action } => write!(f, "unknown action {action}"),
        }
    }
}

/// A suspended resolution waiting on the player's choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disambiguation {
    /// The command being resolved
    pub command: ParsedCommand,
    /// Who acts
    pub actor: EntityId,
    /// Position of the ambiguous slot
    pub slot: usize,
    /// Tied candidates, in id order
    pub candidates: Vec<EntityId>,
    /// Choices already made for earlier slots
    pub forced: BTreeMap<usize, EntityId>,
}

impl Disambiguation {
    /// Returns the ambiguous slot.
    #[must_use]
    pub fn noun_slot(&self) -> Option<&NounSlot> {
        self.command.slots.iter().find(|s| s.position == self.slot)
    }

    /// Matches the player's answer against the candidates.
    ///
    /// Accepts ordinals ("second"), numbers ("2"), and words from the
    /// candidates' names, adjectives, and aliases ("iron", "the iron one").
    /// Returns `None` unless exactly one candidate fits.
    #[must_use]
    pub fn choose(&self, world: &World, answer: &str) -> Option<EntityId> {
        let vocab = Vocabulary::english();
        let words: Vec<String> = vocab
            .strip(InputTokenizer::tokenize(answer))
            .iter()
            .map(|t| t.text().to_string())
            .filter(|w| w != "one")
            .collect();
        let (first, rest) = words.split_first()?;

        let index = first
            .parse::<usize>()
            .ok()
            .or_else(|| vocab.ordinal(first));
        if let Some(n) = index {
            let qualifies = rest
                .iter()
                .all(|w| self.candidates.iter().any(|&c| describes(world, c, w)));
            if qualifies {
                return n.checked_sub(1).and_then(|i| self.candidates.get(i)).copied();
            }
        }

        let mut fitting = self
            .candidates
            .iter()
            .copied()
            .filter(|&c| words.iter().all(|w| describes(world, c, w)));
        match (fitting.next(), fitting.next()) {
            (Some(one), None) => Some(one),
            _ => None,
        }
    }
}

/// One candidate's score, for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredCandidate {
    /// Slot position
    pub slot: usize,
    /// The candidate
    pub entity: EntityId,
    /// Its scope level
    pub level: ScopeLevel,
    /// Its total score
    pub score: i32,
    /// Whether it met the minimum confidence and the slot's hard hint
    pub accepted: bool,
}

/// Outcome of validating a parsed command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    /// Every slot is bound
    Resolved(ResolvedCommand),
    /// A slot has several equally good candidates
    Ambiguous(Disambiguation),
    /// A slot could not be bound
    Failed(ResolutionFailure),
}

// =============================================================================
// Validator
// =============================================================================

enum SlotOutcome {
    Bound(Binding),
    Tied(Vec<EntityId>),
    Failed(ResolutionFailure),
}

/// Binds parsed commands against a world.
#[derive(Clone, Copy, Debug)]
pub struct CommandValidator<'a> {
    config: &'a EngineConfig,
    history: Option<&'a PronounHistory>,
    actions: Option<&'a ActionRegistry>,
    turn: u64,
}

impl<'a> CommandValidator<'a> {
    /// Creates a validator with no pronoun history and no action check.
    #[must_use]
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            history: None,
            actions: None,
            turn: 0,
        }
    }

    /// Uses `history` for pronouns and mention recency, as of `turn`.
    #[must_use]
    pub fn with_history(mut self, history: &'a PronounHistory, turn: u64) -> Self {
        self.history = Some(history);
        self.turn = turn;
        self
    }

    /// Fails commands whose action is not in `actions`.
    #[must_use]
    pub fn with_actions(mut self, actions: &'a ActionRegistry) -> Self {
        self.actions = Some(actions);
        self
    }

    /// Validates one parsed command.
    #[must_use]
    pub fn validate(&self, world: &World, actor: EntityId, command: &ParsedCommand) -> Validation {
        self.resolve(world, actor, command, &BTreeMap::new()).0
    }

    /// Validates one parsed command and returns every scored candidate.
    #[must_use]
    pub fn validate_traced(
        &self,
        world: &World,
        actor: EntityId,
        command: &ParsedCommand,
    ) -> (Validation, Vec<ScoredCandidate>) {
        self.resolve(world, actor, command, &BTreeMap::new())
    }

    /// Validates several readings of the same input.
    ///
    /// The resolved reading with the highest confidence wins. Without one,
    /// the first ambiguous reading is returned, then the first failure.
    #[must_use]
    pub fn validate_all(
        &self,
        world: &World,
        actor: EntityId,
        commands: &[ParsedCommand],
    ) -> (Validation, Vec<ScoredCandidate>) {
        let mut best: Option<(ResolvedCommand, Vec<ScoredCandidate>)> = None;
        let mut ambiguous = None;
        let mut failed = None;
        for command in commands {
            let (validation, diagnostics) = self.validate_traced(world, actor, command);
            match validation {
                Validation::Resolved(resolved) => {
                    if best
                        .as_ref()
                        .is_none_or(|(b, _)| resolved.confidence() > b.confidence())
                    {
                        best = Some((resolved, diagnostics));
                    }
                }
                Validation::Ambiguous(d) => {
                    ambiguous.get_or_insert((Validation::Ambiguous(d), diagnostics));
                }
                Validation::Failed(f) => {
                    failed.get_or_insert((Validation::Failed(f), diagnostics));
                }
            }
        }
        if let Some((resolved, diagnostics)) = best {
            return (Validation::Resolved(resolved), diagnostics);
        }
        ambiguous.or(failed).unwrap_or_else(|| {
            (
                Validation::Failed(ResolutionFailure::NothingMatches {
                    text: String::new(),
                }),
                Vec::new(),
            )
        })
    }

    /// Replays a suspended command with the player's choice forced.
    #[must_use]
    pub fn validate_forced(
        &self,
        world: &World,
        pending: &Disambiguation,
        choice: EntityId,
    ) -> Validation {
        let mut forced = pending.forced.clone();
        forced.insert(pending.slot, choice);
        self.resolve(world, pending.actor, &pending.command, &forced).0
    }

    fn resolve(
        &self,
        world: &World,
        actor: EntityId,
        command: &ParsedCommand,
        forced: &BTreeMap<usize, EntityId>,
    ) -> (Validation, Vec<ScoredCandidate>) {
        let mut diagnostics = Vec::new();
        if let Some(actions) = self.actions {
            if !actions.contains(&command.action) {
                let failure = ResolutionFailure::UnknownAction {
                    action: command.action.clone(),
                };
                return (Validation::Failed(failure), diagnostics);
            }
        }

        let scope = ScopeResolver::new(world);
        let in_scope = scope.in_scope(actor, self.config.candidate_floor);
        let mut bindings: Vec<Binding> = Vec::with_capacity(command.slots.len());

        // Specific phrases first, so "all ... from <box>" can look at the box.
        let (multiple, specific): (Vec<&NounSlot>, Vec<&NounSlot>) =
            command.slots.iter().partition(|s| s.phrase.is_multiple());
        for slot in specific.into_iter().chain(multiple) {
            if let Some(&entity) = forced.get(&slot.position) {
                bindings.push(Binding {
                    slot: slot.name.clone(),
                    position: slot.position,
                    target: SlotBinding::One(entity),
                    level: scope.level(actor, entity),
                    score: 0,
                });
                continue;
            }
            let outcome = if slot.phrase.is_multiple() {
                self.bind_all(world, actor, command, slot, &in_scope, &bindings)
            } else {
                self.bind_one(world, actor, slot, &in_scope, &mut diagnostics)
            };
            match outcome {
                SlotOutcome::Bound(binding) => bindings.push(binding),
                SlotOutcome::Tied(candidates) => {
                    debug!(slot = slot.position, ?candidates, "ambiguous");
                    let pending = Disambiguation {
                        command: command.clone(),
                        actor,
                        slot: slot.position,
                        candidates,
                        forced: forced.clone(),
                    };
                    return (Validation::Ambiguous(pending), diagnostics);
                }
                SlotOutcome::Failed(failure) => {
                    debug!(slot = slot.position, %failure, "resolution failed");
                    return (Validation::Failed(failure), diagnostics);
                }
            }
        }

        bindings.sort_by_key(|b| b.position);
        let resolved = ResolvedCommand {
            command: command.clone(),
            actor,
            bindings,
        };
        (Validation::Resolved(resolved), diagnostics)
    }

    fn bind_one(
        &self,
        world: &World,
        actor: EntityId,
        slot: &NounSlot,
        in_scope: &[(EntityId, ScopeLevel)],
        diagnostics: &mut Vec<ScoredCandidate>,
    ) -> SlotOutcome {
        let phrase = &slot.phrase;
        let bound = |entity, level, score| {
            SlotOutcome::Bound(Binding {
                slot: slot.name.clone(),
                position: slot.position,
                target: SlotBinding::One(entity),
                level,
                score,
            })
        };

        if phrase.adjectives.is_empty() && SELF_WORDS.contains(&phrase.noun.as_str()) {
            return bound(actor, ScopeLevel::Reachable, self.config.weights.exact_name);
        }
        if let Some(pronoun) = phrase.pronoun {
            return self.bind_pronoun(world, slot, pronoun, in_scope);
        }

        let weights = &self.config.weights;
        let mut named = false;
        let mut failed_hint = None;
        let mut scored: Vec<(EntityId, ScopeLevel, i32)> = Vec::new();
        for &(entity, level) in in_scope {
            let Some(mut score) = name_score(world, entity, phrase, weights) else {
                continue;
            };
            named = true;
            if let Some(hint) = &slot.hint {
                let satisfied = hint_satisfied(world, entity, level, &hint.hint);
                if hint.required && !satisfied {
                    failed_hint = Some(hint.hint.clone());
                    diagnostics.push(ScoredCandidate {
                        slot: slot.position,
                        entity,
                        level,
                        score,
                        accepted: false,
                    });
                    continue;
                }
                if !hint.required && satisfied {
                    score += weights.soft_hint;
                }
            }
            score += scope_bonus(level, weights);
            if self.history.is_some_and(|h| {
                h.recently_mentioned(entity, self.turn, self.config.mention_window)
            }) {
                score += weights.recently_mentioned;
            }
            let accepted = score >= self.config.min_confidence;
            debug!(slot = slot.position, %entity, %level, score, accepted, "candidate");
            diagnostics.push(ScoredCandidate {
                slot: slot.position,
                entity,
                level,
                score,
                accepted,
            });
            if accepted {
                scored.push((entity, level, score));
            }
        }

        if scored.is_empty() {
            return SlotOutcome::Failed(match failed_hint {
                Some(hint) if named => ResolutionFailure::HintUnsatisfied {
                    text: phrase.text.clone(),
                    hint,
                },
                _ => ResolutionFailure::NothingMatches {
                    text: phrase.text.clone(),
                },
            });
        }

        let top = scored.iter().map(|(_, _, s)| *s).max().unwrap_or_default();
        let tied: Vec<(EntityId, ScopeLevel, i32)> =
            scored.into_iter().filter(|(_, _, s)| *s == top).collect();

        if let Some(n) = phrase.ordinal {
            return match n.checked_sub(1).and_then(|i| tied.get(i)) {
                Some(&(entity, level, score)) => bound(entity, level, score),
                None => SlotOutcome::Failed(ResolutionFailure::NothingMatches {
                    text: phrase.text.clone(),
                }),
            };
        }
        match tied.as_slice() {
            [(entity, level, score)] => bound(*entity, *level, *score),
            _ => SlotOutcome::Tied(tied.iter().map(|(e, _, _)| *e).collect()),
        }
    }

    fn bind_pronoun(
        &self,
        world: &World,
        slot: &NounSlot,
        pronoun: PronounKind,
        in_scope: &[(EntityId, ScopeLevel)],
    ) -> SlotOutcome {
        let no_referent = SlotOutcome::Failed(ResolutionFailure::NoReferent { pronoun });
        let Some(referent) = self.history.and_then(|h| h.referent(pronoun)) else {
            return no_referent;
        };
        let present: Vec<(EntityId, ScopeLevel)> = referent
            .entities
            .iter()
            .filter_map(|e| in_scope.iter().find(|(c, _)| c == e).copied())
            .collect();

        let weights = &self.config.weights;
        let stale = self.turn.saturating_sub(referent.turn) > self.config.pronoun_window;
        match present.as_slice() {
            [] => no_referent,
            [(entity, level)] => {
                let mut score = weights.pronoun_referent;
                if stale {
                    score += weights.stale_pronoun;
                }
                if !pronoun_fits(world, pronoun, *entity) {
                    score += weights.pronoun_mismatch;
                }
                if score < self.config.min_confidence {
                    return no_referent;
                }
                if let Some(hint) = slot.hint.as_ref().filter(|h| h.required) {
                    if !hint_satisfied(world, *entity, *level, &hint.hint) {
                        return SlotOutcome::Failed(ResolutionFailure::HintUnsatisfied {
                            text: slot.phrase.text.clone(),
                            hint: hint.hint.clone(),
                        });
                    }
                }
                SlotOutcome::Bound(Binding {
                    slot: slot.name.clone(),
                    position: slot.position,
                    target: SlotBinding::One(*entity),
                    level: *level,
                    score,
                })
            }
            many => SlotOutcome::Bound(Binding {
                slot: slot.name.clone(),
                position: slot.position,
                target: SlotBinding::Many(many.iter().map(|(e, _)| *e).collect()),
                level: many.iter().map(|(_, l)| *l).min().unwrap_or_default(),
                score: weights.pronoun_referent,
            }),
        }
    }

    fn bind_all(
        &self,
        world: &World,
        actor: EntityId,
        command: &ParsedCommand,
        slot: &NounSlot,
        in_scope: &[(EntityId, ScopeLevel)],
        bound: &[Binding],
    ) -> SlotOutcome {
        let phrase = &slot.phrase;
        let weights = &self.config.weights;
        let wants_held = slot
            .hint
            .as_ref()
            .is_some_and(|h| h.required && h.hint == ScopeHint::Held);
        // "take all from the box" only looks inside the box.
        let source = match command.preposition.as_deref() {
            Some("from" | "off" | "out") => bound
                .iter()
                .find(|b| b.position != slot.position)
                .and_then(|b| b.target.one()),
            _ => None,
        };

        let chosen: Vec<(EntityId, ScopeLevel)> = in_scope
            .iter()
            .copied()
            .filter(|&(entity, level)| {
                if wants_held {
                    level == ScopeLevel::Carried
                } else {
                    level == ScopeLevel::Reachable && portable(world, actor, entity)
                }
            })
            .filter(|&(entity, _)| source.is_none_or(|s| world.location(entity) == Some(s)))
            .filter(|&(entity, _)| {
                phrase.noun.is_empty() || name_score(world, entity, phrase, weights).is_some()
            })
            .filter(|&(entity, level)| match &slot.hint {
                Some(h) if h.required => hint_satisfied(world, entity, level, &h.hint),
                _ => true,
            })
            .filter(|&(entity, _)| match &phrase.quantifier {
                Quantifier::AllExcept(excluded) => !excluded
                    .iter()
                    .any(|x| name_score(world, entity, x, weights).is_some()),
                _ => true,
            })
            .collect();

        if chosen.is_empty() {
            return SlotOutcome::Failed(ResolutionFailure::NothingForAll);
        }
        SlotOutcome::Bound(Binding {
            slot: slot.name.clone(),
            position: slot.position,
            level: chosen.iter().map(|(_, l)| *l).min().unwrap_or_default(),
            target: SlotBinding::Many(chosen.into_iter().map(|(e, _)| e).collect()),
            score: 0,
        })
    }
}

// =============================================================================
// Scoring helpers
// =============================================================================

/// Scores how well an entity's identity matches a phrase.
///
/// Returns `None` if the head noun does not name the entity, or if any of
/// the phrase's adjectives is not one of the entity's words.
fn name_score(
    world: &World,
    entity: EntityId,
    phrase: &NounPhrase,
    weights: &crate::config::ScoreWeights,
) -> Option<i32> {
    let id = world.identity(entity)?;
    let noun = phrase.noun.as_str();
    if noun.is_empty() {
        return None;
    }
    let mut score = if id.name == noun {
        weights.exact_name
    } else if id.has_alias(noun) {
        weights.synonym
    } else if is_partial(&id.name, noun) {
        weights.partial_name
    } else if id.has_adjective(noun) {
        weights.adjective_only
    } else {
        return None;
    };
    for adjective in &phrase.adjectives {
        if id.has_adjective(adjective) || id.has_alias(adjective) {
            score += weights.modifier;
        } else {
            return None;
        }
    }
    Some(score)
}

fn is_partial(name: &str, noun: &str) -> bool {
    name.split_whitespace().any(|w| w == noun) || (noun.len() >= 3 && name.starts_with(noun))
}

fn scope_bonus(level: ScopeLevel, weights: &crate::config::ScoreWeights) -> i32 {
    let mut bonus = 0;
    if level.at_least(ScopeLevel::Visible) {
        bonus += weights.visible;
    }
    if level.at_least(ScopeLevel::Reachable) {
        bonus += weights.reachable;
    }
    if level == ScopeLevel::Carried {
        bonus += weights.carried;
    }
    bonus
}

/// Checks a hard scope hint.
#[must_use]
pub fn hint_satisfied(world: &World, entity: EntityId, level: ScopeLevel, hint: &ScopeHint) -> bool {
    let has = |kind: TraitKind| world.has_trait(entity, &kind);
    match hint {
        ScopeHint::Held => level == ScopeLevel::Carried,
        ScopeHint::Container => has(TraitKind::Container),
        ScopeHint::Supporter => has(TraitKind::Supporter),
        ScopeHint::Openable => has(TraitKind::Openable),
        ScopeHint::Lockable => has(TraitKind::Lockable),
        ScopeHint::Switchable => has(TraitKind::Switchable),
        ScopeHint::Actor => has(TraitKind::Actor),
        ScopeHint::Visible => level.at_least(ScopeLevel::Visible),
        ScopeHint::Reachable => level.at_least(ScopeLevel::Reachable),
        ScopeHint::Trait(name) => has(TraitKind::from_name(name)),
    }
}

/// Things "take all" picks up: not rooms, people, scenery, or what other
/// people are holding.
fn portable(world: &World, actor: EntityId, entity: EntityId) -> bool {
    let fixed = world.is_room(entity)
        || world.has_trait(entity, &TraitKind::Actor)
        || world.has_trait(entity, &TraitKind::Scenery);
    let held_by_other = world
        .ancestors(entity)
        .any(|a| a != actor && world.has_trait(a, &TraitKind::Actor));
    !fixed && !held_by_other
}

/// Checks if a word names, qualifies, or aliases an entity.
fn describes(world: &World, entity: EntityId, word: &str) -> bool {
    world
        .identity(entity)
        .is_some_and(|id| id.name == word || id.has_adjective(word) || id.has_alias(word))
}
