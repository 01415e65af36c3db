//! Action pipeline tests
//!
//! Tests story actions and subscribers running through a session.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parlance_engine::{
    Action, ActionContext, ActionStatus, EventDraft, EventKind, EventTag, Mutation, ReasonCode,
    RejectionReason, Role, Session, TurnNotice, TurnStatus, TurnSubscriber, ValidationResult,
};
use parlance_foundation::{ActionId, Result};
use parlance_world::{Trait, TraitKind};

use crate::fixture::{House, house};

// =============================================================================
// Story actions
// =============================================================================

/// "polish <noun>": switches a lamp on by rubbing it.
struct Polishing {
    tag: EventTag,
}

impl Action for Polishing {
    fn id(&self) -> ActionId {
        ActionId::new("polishing")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        match ctx.direct() {
            Some(target) if ctx.world().has_trait(target, &TraitKind::Switchable) => {
                ValidationResult::Valid
            }
            _ => ValidationResult::invalid(ReasonCode::Custom("too_dull".to_string())),
        }
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        let target = ctx.require_direct()?;
        ctx.mutate(Mutation::AddTrait {
            entity: target,
            value: Trait::Switchable { on: true },
        });
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        let mut draft = ctx.event(EventKind::Custom(self.tag.clone()));
        if let Some(target) = ctx.direct() {
            draft = draft.with(Role::Target, target);
        }
        vec![draft]
    }
}

/// "stuff <noun>": tries to put the target inside itself.
struct Swallowing;

impl Action for Swallowing {
    fn id(&self) -> ActionId {
        ActionId::new("swallowing")
    }

    fn validate(&self, _ctx: &ActionContext<'_>) -> ValidationResult {
        ValidationResult::Valid
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        let target = ctx.require_direct()?;
        ctx.mutate(Mutation::Move {
            entity: target,
            destination: target,
        });
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        vec![ctx.event(EventKind::Waited)]
    }
}

fn story() -> (House, Session, EventTag) {
    let h = house();
    let mut session = Session::new(h.world.clone(), h.player).unwrap();
    let tag = session.catalog_mut().register("polished");
    session
        .actions_mut()
        .register(Polishing { tag: tag.clone() })
        .register(Swallowing);
    session
        .parser_mut()
        .grammar_mut()
        .register("polish|rub <noun>", "polishing")
        .unwrap();
    session
        .parser_mut()
        .grammar_mut()
        .register("swallow <noun>", "swallowing")
        .unwrap();
    (h, session, tag)
}

#[test]
fn story_actions_commit_mutations_then_report() {
    let (h, mut session, tag) = story();
    let outcome = session.submit("rub lamp").unwrap();
    assert_eq!(outcome.status, TurnStatus::Acted(vec![ActionStatus::Succeeded]));
    assert!(session.world().flag(h.lamp, &TraitKind::Switchable, "on"));

    let kinds: Vec<&EventKind> = outcome.events.iter().map(|e| &e.kind).collect();
    assert!(matches!(kinds[0], EventKind::Mutation(_)));
    assert_eq!(kinds.last(), Some(&&EventKind::Custom(tag)));
    assert_eq!(outcome.events.last().unwrap().entity(Role::Target), Some(h.lamp));
}

#[test]
fn blocked_story_actions_leave_the_world_alone() {
    let (h, mut session, _) = story();
    let before = session.world().snapshot();
    let outcome = session.submit("polish vase").unwrap();
    assert_eq!(
        outcome.status,
        TurnStatus::Acted(vec![ActionStatus::Blocked(ReasonCode::Custom(
            "too_dull".to_string()
        ))])
    );
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].kind, EventKind::ActionBlocked);
    assert_eq!(outcome.events[0].entity(Role::Target), Some(h.vase));
    assert!(session.world().snapshot() == before);
}

#[test]
fn rejected_mutations_fail_the_action() {
    let (h, mut session, _) = story();
    let outcome = session.submit("swallow lamp").unwrap();
    let TurnStatus::Acted(statuses) = &outcome.status else {
        panic!("expected the action to run");
    };
    let ActionStatus::Failed(rejection) = &statuses[0] else {
        panic!("expected a rejection, got {statuses:?}");
    };
    assert_eq!(rejection.reason, RejectionReason::ContainmentCycle);
    assert!(outcome.has(&EventKind::ActionFailed));
    assert!(!outcome.has(&EventKind::Waited));
    assert_eq!(session.world().location(h.lamp), Some(h.hall));
}

// =============================================================================
// Subscribers
// =============================================================================

/// Answers every "polished" with a glint, and counts its calls.
struct Glint {
    polished: EventTag,
    glint: EventTag,
    calls: Arc<AtomicUsize>,
}

impl TurnSubscriber for Glint {
    fn name(&self) -> &str {
        "glint"
    }

    fn on_turn_completed(&self, notice: &TurnNotice<'_>) -> Vec<EventDraft> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if notice.saw(&EventKind::Custom(self.polished.clone())) {
            vec![EventDraft::new(EventKind::Custom(self.glint.clone())).with(Role::Actor, notice.actor)]
        } else {
            Vec::new()
        }
    }
}

#[test]
fn subscribers_see_each_round_once() {
    let (_, mut session, polished) = story();
    let glint = session.catalog_mut().register("glint");
    let calls = Arc::new(AtomicUsize::new(0));
    session.subscribe(Glint {
        polished,
        glint: glint.clone(),
        calls: Arc::clone(&calls),
    });

    let outcome = session.submit("polish lamp").unwrap();
    assert!(outcome.has(&EventKind::Custom(glint)));
    // Round one sees the action, round two sees the glint, then nothing new.
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    session.submit("xyzzy").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn turns_count_only_story_actions() {
    let (_, mut session, _) = story();
    session.submit("wait").unwrap();
    session.submit("polish vase").unwrap();
    session.submit("look").unwrap();
    session.submit("save").unwrap();
    session.submit("xyzzy").unwrap();
    assert_eq!(session.turn(), 3);
}
