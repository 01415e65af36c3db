//! Meta actions.
//!
//! These report a request; the session carries it out. They do not use a
//! turn and are never undone.

use parlance_foundation::{ActionId, Result};

use crate::action::{Action, ActionContext, ReasonCode, ValidationResult};
use crate::event::{EventDraft, EventKind};

/// Asks the session to write a save.
pub struct Saving;

impl Action for Saving {
    fn id(&self) -> ActionId {
        ActionId::new("saving")
    }

    fn is_meta(&self) -> bool {
        true
    }

    fn validate(&self, _ctx: &ActionContext<'_>) -> ValidationResult {
        ValidationResult::Valid
    }

    fn execute(&self, _ctx: &mut ActionContext<'_>) -> Result<()> {
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        vec![ctx.event(EventKind::SaveRequested)]
    }
}

/// Asks the session to load a save.
pub struct Restoring;

impl Action for Restoring {
    fn id(&self) -> ActionId {
        ActionId::new("restoring")
    }

    fn is_meta(&self) -> bool {
        true
    }

    fn validate(&self, _ctx: &ActionContext<'_>) -> ValidationResult {
        ValidationResult::Valid
    }

    fn execute(&self, _ctx: &mut ActionContext<'_>) -> Result<()> {
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        vec![ctx.event(EventKind::RestoreRequested)]
    }
}

/// Asks the session to go back to the initial world.
pub struct Restarting;

impl Action for Restarting {
    fn id(&self) -> ActionId {
        ActionId::new("restarting")
    }

    fn is_meta(&self) -> bool {
        true
    }

    fn validate(&self, _ctx: &ActionContext<'_>) -> ValidationResult {
        ValidationResult::Valid
    }

    fn execute(&self, _ctx: &mut ActionContext<'_>) -> Result<()> {
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        vec![ctx.event(EventKind::Restarted)]
    }
}

/// Asks the session to take back the last turn.
pub struct Undoing;

impl Action for Undoing {
    fn id(&self) -> ActionId {
        ActionId::new("undoing")
    }

    fn is_meta(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> ValidationResult {
        if ctx.undo_available() {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(ReasonCode::NothingToUndo)
        }
    }

    fn execute(&self, _ctx: &mut ActionContext<'_>) -> Result<()> {
        Ok(())
    }

    fn report(&self, ctx: &ActionContext<'_>) -> Vec<EventDraft> {
        vec![ctx.event(EventKind::Undone)]
    }
}
