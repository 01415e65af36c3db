//! The turn loop.
//!
//! A [`Session`] owns everything one game needs: the parser, the registered
//! actions and subscribers, the world and its baseline, the event sequence,
//! pronoun history, the undo ring, and any question waiting on the player.
//! [`Session::submit`] takes one line of input and runs it to completion.

use std::collections::VecDeque;

use parlance_foundation::{ActionId, EntityId, Error, ErrorContext, ErrorKind, PatternId, Result, Sequence};
use parlance_parser::{Manner, ParseOutcome, ParsedCommand, Parser, SyntaxFailure};
use parlance_world::{SaveDelta, World};
use tracing::{debug, info, info_span, warn};

use crate::action::{ActionContext, ActionPipeline, ActionRegistry, ActionStatus};
use crate::actions::standard_actions;
use crate::config::EngineConfig;
use crate::event::{Event, EventCatalog, EventDraft, EventKind, Role};
use crate::pronouns::PronounHistory;
use crate::subscriber::{SubscriberSet, TurnSubscriber};
use crate::validator::{
    CommandValidator, Disambiguation, ResolutionFailure, ResolvedCommand, ScoredCandidate,
    SlotBinding, Validation,
};

// =============================================================================
// Turn Outcome
// =============================================================================

/// How a submitted line was handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnStatus {
    /// No pattern matched
    NotUnderstood(SyntaxFailure),
    /// A noun phrase could not be bound
    Unresolved(ResolutionFailure),
    /// The player was asked which one they meant
    AwaitingChoice,
    /// The action ran, once per bound object
    Acted(Vec<ActionStatus>),
}

/// Everything one call to [`Session::submit`] produced.
#[derive(Clone, Debug)]
pub struct TurnOutcome {
    /// The turn the input was handled in
    pub turn: u64,
    /// Committed events, in order
    pub events: Vec<Event>,
    /// Scoring records, when diagnostics are on; never committed
    pub diagnostics: Vec<Event>,
    /// How the input was handled
    pub status: TurnStatus,
    /// Whether the turn counter moved
    pub consumed_turn: bool,
    /// A save, when the player asked for one
    pub save: Option<SaveDelta>,
    /// Set when the player asked to restore; the caller loads the save
    pub restore_requested: bool,
}

impl TurnOutcome {
    fn new(turn: u64, status: TurnStatus) -> Self {
        Self {
            turn,
            events: Vec::new(),
            diagnostics: Vec::new(),
            status,
            consumed_turn: false,
            save: None,
            restore_requested: false,
        }
    }

    /// Checks if any committed event has the given kind.
    #[must_use]
    pub fn has(&self, kind: &EventKind) -> bool {
        self.events.iter().any(|e| &e.kind == kind)
    }
}

/// World and history as they were before a turn.
#[derive(Clone, Debug)]
struct UndoFrame {
    world: World,
    history: PronounHistory,
    turn: u64,
}

// =============================================================================
// Session
// =============================================================================

/// One running game.
pub struct Session {
    parser: Parser,
    actions: ActionRegistry,
    pipeline: ActionPipeline,
    subscribers: SubscriberSet,
    config: EngineConfig,
    world: World,
    baseline: World,
    player: EntityId,
    sequence: Sequence,
    history: PronounHistory,
    undo: VecDeque<UndoFrame>,
    pending: Option<Disambiguation>,
    last_commands: Option<Vec<ParsedCommand>>,
}

impl Session {
    /// Starts a session with the English parser and the standard actions.
    ///
    /// The world as given becomes the baseline for saves and restarts.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if `player` is not in `world`.
    pub fn new(world: World, player: EntityId) -> Result<Self> {
        if !world.exists(player) {
            return Err(Error::entity_not_found(player));
        }
        Ok(Self {
            parser: Parser::english(),
            actions: standard_actions(),
            pipeline: ActionPipeline::default(),
            subscribers: SubscriberSet::new(),
            config: EngineConfig::default(),
            baseline: world.clone(),
            world,
            player,
            sequence: Sequence::new(),
            history: PronounHistory::new(),
            undo: VecDeque::new(),
            pending: None,
            last_commands: None,
        })
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the parser.
    #[must_use]
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the action registry.
    #[must_use]
    pub fn with_actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = actions;
        self
    }

    /// Replaces the custom event catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: EventCatalog) -> Self {
        self.pipeline = ActionPipeline::new(catalog);
        self
    }

    /// Adds a turn subscriber.
    pub fn subscribe(&mut self, subscriber: impl TurnSubscriber + 'static) {
        self.subscribers.register(subscriber);
    }

    // ===== Accessors =====

    /// Returns the current world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns the world saves are measured against.
    #[must_use]
    pub fn baseline(&self) -> &World {
        &self.baseline
    }

    /// Returns the player entity.
    #[must_use]
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Returns the current turn.
    #[must_use]
    pub fn turn(&self) -> u64 {
        self.sequence.turn()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the parser.
    #[must_use]
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Returns the parser for adding grammar and vocabulary.
    pub fn parser_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }

    /// Returns the action registry.
    #[must_use]
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Returns the action registry for adding story actions.
    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    /// Returns the custom event catalog for registration.
    pub fn catalog_mut(&mut self) -> &mut EventCatalog {
        self.pipeline.catalog_mut()
    }

    /// Returns the pronoun history.
    #[must_use]
    pub fn history(&self) -> &PronounHistory {
        &self.history
    }

    /// Returns the question waiting on the player, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&Disambiguation> {
        self.pending.as_ref()
    }

    /// Returns how many turns can be undone.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    // ===== Turn handling =====

    /// Handles one line of input.
    ///
    /// # Errors
    ///
    /// Returns an error only for programming faults: a resolved action that
    /// is not registered, an action whose execute phase fails, or an
    /// unregistered custom event.
    pub fn submit(&mut self, line: &str) -> Result<TurnOutcome> {
        let span = info_span!("turn", turn = self.sequence.turn());
        let _guard = span.enter();
        debug!(input = line, "submitted");

        if let Some(pending) = self.pending.take() {
            if let Some(choice) = pending.choose(&self.world, line) {
                debug!(%choice, "disambiguation answered");
                let validation = self.validator().validate_forced(&self.world, &pending, choice);
                return self.handle(validation, Vec::new());
            }
            warn!(input = line, "input is not an answer; dropping the pending question");
        }

        let commands = if self.parser.is_again(line) {
            match &self.last_commands {
                Some(commands) => commands.clone(),
                None => {
                    let failure = SyntaxFailure::NoMatch {
                        verb: line.trim().to_lowercase(),
                    };
                    return Ok(self.not_understood(line, failure));
                }
            }
        } else {
            match self.parser.parse(line) {
                ParseOutcome::Commands(commands) => commands,
                ParseOutcome::NoCommand(failure) => return Ok(self.not_understood(line, failure)),
            }
        };
        self.last_commands = Some(commands.clone());

        let (validation, scored) =
            self.validator()
                .validate_all(&self.world, self.player, &commands);
        let diagnostics = self.diagnostics(scored);
        self.handle(validation, diagnostics)
    }

    fn validator(&self) -> CommandValidator<'_> {
        CommandValidator::new(&self.config)
            .with_history(&self.history, self.sequence.turn())
            .with_actions(&self.actions)
    }

    fn diagnostics(&mut self, scored: Vec<ScoredCandidate>) -> Vec<Event> {
        if !self.config.diagnostics {
            return Vec::new();
        }
        scored
            .into_iter()
            .map(|c| {
                EventDraft::new(EventKind::Diagnostic)
                    .with(Role::Target, c.entity)
                    .with_data("slot", i64::try_from(c.slot).unwrap_or(i64::MAX))
                    .with_data("score", i64::from(c.score))
                    .with_data("level", c.level.name())
                    .with_data("accepted", c.accepted)
                    .stamp(&mut self.sequence)
            })
            .collect()
    }

    fn not_understood(&mut self, line: &str, failure: SyntaxFailure) -> TurnOutcome {
        debug!(?failure, "not understood");
        let mut draft = EventDraft::new(EventKind::CommandNotUnderstood)
            .with(Role::Actor, self.player)
            .with_data("input", line.trim());
        if let SyntaxFailure::NoMatch { verb } = &failure {
            draft = draft.with_data("verb", verb.as_str());
        }
        let mut outcome = TurnOutcome::new(self.sequence.turn(), TurnStatus::NotUnderstood(failure));
        outcome.events.push(draft.stamp(&mut self.sequence));
        outcome
    }

    fn handle(&mut self, validation: Validation, diagnostics: Vec<Event>) -> Result<TurnOutcome> {
        let turn = self.sequence.turn();
        let mut outcome = match validation {
            Validation::Resolved(resolved) => self.perform(&resolved)?,
            Validation::Ambiguous(pending) => {
                let mut draft = EventDraft::new(EventKind::DisambiguationRequested)
                    .with(Role::Actor, self.player)
                    .with_data("candidates", pending.candidates.clone())
                    .with_data("slot", i64::try_from(pending.slot).unwrap_or(i64::MAX));
                if let Some(slot) = pending.noun_slot() {
                    draft = draft.with_data("text", slot.phrase.text.as_str());
                }
                self.pending = Some(pending);
                let mut outcome = TurnOutcome::new(turn, TurnStatus::AwaitingChoice);
                outcome.events.push(draft.stamp(&mut self.sequence));
                outcome
            }
            Validation::Failed(failure) => {
                let mut draft = EventDraft::new(EventKind::ResolutionFailed)
                    .with(Role::Actor, self.player)
                    .with_data("reason", failure.name());
                match &failure {
                    ResolutionFailure::NothingMatches { text } => {
                        draft = draft.with_data("text", text.as_str());
                    }
                    ResolutionFailure::HintUnsatisfied { text, hint } => {
                        draft = draft
                            .with_data("text", text.as_str())
                            .with_data("hint", hint.to_string());
                    }
                    ResolutionFailure::NoReferent { pronoun } => {
                        draft = draft.with_data("pronoun", format!("{pronoun:?}").to_lowercase());
                    }
                    ResolutionFailure::UnknownAction { action } => {
                        draft = draft.with_data("action", action.as_str());
                    }
                    ResolutionFailure::NothingForAll => {}
                }
                let mut outcome = TurnOutcome::new(turn, TurnStatus::Unresolved(failure));
                outcome.events.push(draft.stamp(&mut self.sequence));
                outcome
            }
        };
        outcome.diagnostics = diagnostics;
        Ok(outcome)
    }

    /// Runs a resolved command.
    fn perform(&mut self, resolved: &ResolvedCommand) -> Result<TurnOutcome> {
        let id = resolved.action();
        let action = self
            .actions
            .get(id)
            .ok_or_else(|| {
                Error::new(ErrorKind::UnknownAction(id.clone()))
                    .with_context(self.fault_context(resolved, "lookup"))
            })?;
        let turn = self.sequence.turn();

        if action.is_meta() {
            let ctx = ActionContext::new(resolved, &self.world)
                .with_undo_available(!self.undo.is_empty());
            let result = self
                .pipeline
                .run_in(action.as_ref(), ctx, &mut self.sequence)
                .map_err(|e| e.with_context(self.fault_context(resolved, "meta")))?;
            let mut outcome = TurnOutcome::new(turn, TurnStatus::Acted(vec![result.status.clone()]));
            if result.status == ActionStatus::Succeeded {
                for event in &result.committed {
                    match event.kind {
                        EventKind::SaveRequested => outcome.save = Some(self.save_delta()),
                        EventKind::RestoreRequested => outcome.restore_requested = true,
                        EventKind::Restarted => self.restart(),
                        EventKind::Undone => self.undo_last(),
                        _ => {}
                    }
                }
            }
            outcome.turn = self.sequence.turn();
            outcome.events = result.committed;
            info!(action = %id, "meta action");
            return Ok(outcome);
        }

        self.push_undo();
        self.record_mentions(resolved);

        let mut events = Vec::new();
        let mut statuses = Vec::new();
        for single in resolved.expand() {
            let ctx = ActionContext::new(&single, &self.world);
            let result = self
                .pipeline
                .run_in(action.as_ref(), ctx, &mut self.sequence)
                .map_err(|e| e.with_context(self.fault_context(&single, "perform")))?;
            self.world = result.world;
            events.extend(result.committed);
            statuses.push(result.status);
        }

        let notification = self.subscribers.notify(
            &self.world,
            self.player,
            &events,
            &mut self.sequence,
            self.pipeline.catalog(),
            self.config.cascade_limit,
        );
        self.world = notification.world;
        events.extend(notification.committed);

        self.sequence.advance_turn();
        info!(action = %id, events = events.len(), "turn completed");

        let mut outcome = TurnOutcome::new(turn, TurnStatus::Acted(statuses));
        outcome.events = events;
        outcome.consumed_turn = true;
        Ok(outcome)
    }

    /// Says which turn, action and object a programming fault came from.
    fn fault_context(&self, resolved: &ResolvedCommand, frame: &str) -> ErrorContext {
        let context = ErrorContext::new()
            .with_turn(self.sequence.turn())
            .with_source(resolved.action().as_str())
            .with_frame(frame);
        match resolved.direct() {
            Some(entity) => context.with_entity(entity),
            None => context,
        }
    }

    fn record_mentions(&mut self, resolved: &ResolvedCommand) {
        let turn = self.sequence.turn();
        for binding in &resolved.bindings {
            if binding.target == SlotBinding::One(self.player) {
                continue;
            }
            match &binding.target {
                SlotBinding::One(entity) => self.history.record(&self.world, *entity, turn),
                SlotBinding::Many(entities) => {
                    self.history.record_group(&self.world, entities, turn);
                }
            }
        }
    }

    // ===== Undo, save, restore =====

    fn push_undo(&mut self) {
        if self.config.undo_depth == 0 {
            return;
        }
        self.undo.push_back(UndoFrame {
            world: self.world.clone(),
            history: self.history.clone(),
            turn: self.sequence.turn(),
        });
        while self.undo.len() > self.config.undo_depth {
            self.undo.pop_front();
        }
    }

    /// Takes back the last turn. Does nothing if there is none.
    pub fn undo_last(&mut self) {
        if let Some(frame) = self.undo.pop_back() {
            debug!(turn = frame.turn, "undoing");
            self.world = frame.world;
            self.history = frame.history;
            self.sequence.set_turn(frame.turn);
            self.pending = None;
        }
    }

    /// Returns the changes since the baseline.
    #[must_use]
    pub fn save_delta(&self) -> SaveDelta {
        self.world.snapshot().delta_from(&self.baseline.snapshot())
    }

    /// Replaces the world with the baseline plus `delta`, at `turn`.
    ///
    /// Undo history, pronouns, and any pending question are cleared.
    ///
    /// # Errors
    ///
    /// Returns `BaselineMismatch` if the delta refers to entities the
    /// baseline does not have; the session is unchanged in that case.
    pub fn restore(&mut self, delta: &SaveDelta, turn: u64) -> Result<()> {
        let world = World::restore(&self.baseline, delta)?;
        self.world = world;
        self.sequence.set_turn(turn);
        self.history.clear();
        self.undo.clear();
        self.pending = None;
        self.last_commands = None;
        info!(turn, "restored");
        Ok(())
    }

    /// Goes back to the baseline world at turn 0.
    pub fn restart(&mut self) {
        self.world = self.baseline.clone();
        self.sequence.set_turn(0);
        self.history.clear();
        self.undo.clear();
        self.pending = None;
        self.last_commands = None;
        info!("restarted");
    }

    /// Makes the current world the baseline for saves and restarts.
    pub fn mark_baseline(&mut self) {
        self.baseline = self.world.clone();
    }

    /// Describes the player's surroundings without using a turn, as at the
    /// start of a game or after a restore.
    ///
    /// Returns nothing if no `looking` action is registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the looking action itself fails.
    pub fn describe_surroundings(&mut self) -> Result<Vec<Event>> {
        let id = ActionId::new("looking");
        let Some(action) = self.actions.get(&id) else {
            return Ok(Vec::new());
        };
        let resolved = ResolvedCommand {
            command: ParsedCommand {
                action: id,
                pattern: PatternId(0),
                priority: 0,
                verb: "look".to_string(),
                slots: Vec::new(),
                direction: None,
                preposition: None,
                preposition_implicit: false,
                manner: Manner::Normal,
                text: None,
                input: String::new(),
            },
            actor: self.player,
            bindings: Vec::new(),
        };
        let ctx = ActionContext::new(&resolved, &self.world);
        let result = self.pipeline.run_in(action.as_ref(), ctx, &mut self.sequence)?;
        Ok(result.committed)
    }
}
