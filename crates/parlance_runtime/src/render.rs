//! Plain-text rendering of committed events.
//!
//! The engine reports what happened as events; this module is the only
//! place that turns them into English. Mutation events render to nothing:
//! the narrative event that follows them says what the player sees.

use std::collections::BTreeMap;

use parlance_engine::{Event, EventKind, Role};
use parlance_foundation::{EntityId, Value};
use parlance_world::World;

/// Turns events into lines of text.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    custom: BTreeMap<String, String>,
}

impl Renderer {
    /// Creates a renderer with no custom event text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text for a custom event tag.
    ///
    /// `{target}` in the text is replaced with the target's name.
    #[must_use]
    pub fn with_custom(mut self, tag: &str, text: impl Into<String>) -> Self {
        self.custom.insert(tag.to_string(), text.into());
        self
    }

    /// Renders a turn's events, skipping those with nothing to say.
    #[must_use]
    pub fn render_all(&self, world: &World, events: &[Event]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| self.render(world, e))
            .collect()
    }

    /// Renders one event.
    #[must_use]
    pub fn render(&self, world: &World, event: &Event) -> Option<String> {
        let target = event.entity(Role::Target).map(|e| the(world, e));
        let target = target.as_deref().unwrap_or("it");
        let text = match &event.kind {
            EventKind::Mutation(_) | EventKind::Diagnostic => return None,
            EventKind::Taken => "Taken.".to_string(),
            EventKind::Dropped => "Dropped.".to_string(),
            EventKind::PutIn | EventKind::PutOn => {
                let into = if event.kind == EventKind::PutIn { "in" } else { "on" };
                let place = event
                    .entity(Role::Destination)
                    .map_or_else(|| "it".to_string(), |d| the(world, d));
                let verb = match text_of(event, "manner") {
                    Some("forceful") => "jam",
                    Some("careful") => "carefully place",
                    _ => "put",
                };
                format!("You {verb} {target} {into} {place}.")
            }
            EventKind::Opened => {
                let revealed = event.data("revealed").map(|v| list(world, v));
                match revealed {
                    Some(items) if !items.is_empty() => {
                        format!("You open {target}, revealing {items}.")
                    }
                    _ => format!("You open {target}."),
                }
            }
            EventKind::Closed => format!("You close {target}."),
            EventKind::Locked => format!("You lock {target}{}.", with_key(world, event)),
            EventKind::Unlocked => format!("You unlock {target}{}.", with_key(world, event)),
            EventKind::SwitchedOn => format!("You switch on {target}."),
            EventKind::SwitchedOff => format!("You switch off {target}."),
            EventKind::Went => return None,
            EventKind::RoomDescribed => room(world, event),
            EventKind::Examined => examined(world, event, target),
            EventKind::InventoryListed => match event.data("items").map(|v| list(world, v)) {
                Some(items) if !items.is_empty() => format!("You are carrying {items}."),
                _ => "You are empty-handed.".to_string(),
            },
            EventKind::Waited => "Time passes.".to_string(),
            EventKind::Slept => "You doze for a moment.".to_string(),
            EventKind::SaveRequested => "Saving.".to_string(),
            EventKind::RestoreRequested => "Restoring.".to_string(),
            EventKind::Restarted => "Starting over.".to_string(),
            EventKind::Undone => "Previous turn undone.".to_string(),
            EventKind::ActionBlocked => blocked(world, event, target),
            EventKind::ActionFailed => "Something prevents that.".to_string(),
            EventKind::CommandNotUnderstood => match text_of(event, "verb") {
                Some(verb) if !verb.is_empty() => {
                    format!("I don't know how to \"{verb}\" anything.")
                }
                _ => "I beg your pardon?".to_string(),
            },
            EventKind::ResolutionFailed => resolution_failed(event),
            EventKind::DisambiguationRequested => {
                let candidates = event
                    .data("candidates")
                    .map(|v| or_list(world, v))
                    .unwrap_or_default();
                format!("Which do you mean, {candidates}?")
            }
            EventKind::Custom(tag) => {
                let text = self.custom.get(tag.as_str())?;
                text.replace("{target}", target)
            }
        };
        Some(text)
    }
}

// ===== Names =====

/// Returns an entity's name with "the", or bare for proper nouns.
#[must_use]
pub fn the(world: &World, entity: EntityId) -> String {
    match world.identity(entity) {
        Some(identity) if identity.proper => identity.full_name(),
        Some(identity) => format!("the {}", identity.full_name()),
        None => "something".to_string(),
    }
}

/// Returns an entity's name with "a", "an", or "some".
#[must_use]
pub fn a(world: &World, entity: EntityId) -> String {
    match world.identity(entity) {
        Some(identity) if identity.proper => identity.full_name(),
        Some(identity) if identity.plural => format!("some {}", identity.full_name()),
        Some(identity) => {
            let name = identity.full_name();
            let article = if name.starts_with(['a', 'e', 'i', 'o', 'u']) {
                "an"
            } else {
                "a"
            };
            format!("{article} {name}")
        }
        None => "something".to_string(),
    }
}

fn entities(value: &Value) -> Vec<EntityId> {
    value
        .as_list()
        .map(|items| items.iter().filter_map(Value::as_entity).collect())
        .unwrap_or_default()
}

fn join(names: Vec<String>, last: &str) -> String {
    match names.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., tail] => format!("{} {last} {tail}", init.join(", ")),
    }
}

fn list(world: &World, value: &Value) -> String {
    join(entities(value).into_iter().map(|e| a(world, e)).collect(), "and")
}

fn or_list(world: &World, value: &Value) -> String {
    join(entities(value).into_iter().map(|e| the(world, e)).collect(), "or")
}

fn text_of<'e>(event: &'e Event, name: &str) -> Option<&'e str> {
    event.data(name).and_then(Value::as_text)
}

fn with_key(world: &World, event: &Event) -> String {
    match event.entity(Role::Instrument) {
        Some(key) => format!(" with {}", the(world, key)),
        None => String::new(),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ===== Descriptions =====

fn room(world: &World, event: &Event) -> String {
    if event.data("lit").and_then(Value::as_bool) == Some(false) {
        return "Darkness\nIt is pitch dark. You can't see a thing.".to_string();
    }
    let Some(room) = event.entity(Role::Room) else {
        return String::new();
    };
    let mut lines = Vec::new();
    if let Some(identity) = world.identity(room) {
        lines.push(capitalize(&identity.full_name()));
        if !identity.description.is_empty() {
            lines.push(identity.description.clone());
        }
    }
    if let Some(contents) = event.data("contents").map(|v| list(world, v)) {
        if !contents.is_empty() {
            lines.push(format!("You can see {contents} here."));
        }
    }
    if let Some(exits) = event.data("exits").and_then(Value::as_list) {
        let names: Vec<String> = exits
            .iter()
            .filter_map(Value::as_text)
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            lines.push(format!("Exits: {}.", names.join(", ")));
        }
    }
    lines.join("\n")
}

fn examined(world: &World, event: &Event, target: &str) -> String {
    let mut text = match text_of(event, "description") {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => format!("You see nothing special about {target}."),
    };
    if let Some(on) = event.data("on").and_then(Value::as_bool) {
        text.push_str(if on { " It is on." } else { " It is off." });
    }
    if let Some(open) = event.data("open").and_then(Value::as_bool) {
        text.push_str(if open { " It is open." } else { " It is closed." });
    }
    if let Some(contents) = event.data("contents").map(|v| list(world, v)) {
        if !contents.is_empty() {
            text.push_str(&format!(" It holds {contents}."));
        }
    }
    text
}

fn blocked(world: &World, event: &Event, target: &str) -> String {
    let reason = text_of(event, "reason").unwrap_or_default();
    let instrument = event.entity(Role::Instrument).map(|e| the(world, e));
    let instrument = instrument.as_deref().unwrap_or("that");
    match reason {
        "already_open" => format!("{} is already open.", capitalize(target)),
        "already_closed" => format!("{} is already closed.", capitalize(target)),
        "not_openable" => "That's not something you can open.".to_string(),
        "locked" => format!("{} seems to be locked.", capitalize(target)),
        "already_locked" => format!("{} is already locked.", capitalize(target)),
        "already_unlocked" => format!("{} is not locked.", capitalize(target)),
        "not_lockable" => "That doesn't have a lock.".to_string(),
        "wrong_key" => format!("{} doesn't fit.", capitalize(instrument)),
        "no_key" => "You have nothing to do that with.".to_string(),
        "not_closed" => format!("You'll have to close {target} first."),
        "not_switchable" => "That's not something you can switch.".to_string(),
        "already_on" => format!("{} is already on.", capitalize(target)),
        "already_off" => format!("{} is already off.", capitalize(target)),
        "already_held" => "You already have that.".to_string(),
        "not_held" => format!("You aren't holding {target}."),
        "fixed" => format!("{} is fixed in place.", capitalize(target)),
        "not_portable" => "You can't carry that.".to_string(),
        "not_reachable" => format!("You can't reach {target}."),
        "not_visible" => "You can't see any such thing.".to_string(),
        "not_container" => format!("You can't put things in {instrument}."),
        "not_supporter" => format!("You can't put things on {instrument}."),
        "container_closed" => format!("{} is closed.", capitalize(instrument)),
        "no_room" => "There's no room.".to_string(),
        "no_exit" => "You can't go that way.".to_string(),
        "self_reference" => "You can't do that to itself.".to_string(),
        "recursive" => "You can't put something inside itself.".to_string(),
        "not_inside" => format!("{} isn't there.", capitalize(target)),
        "nothing_to_undo" => "There is nothing to undo.".to_string(),
        _ => "You can't do that.".to_string(),
    }
}

fn resolution_failed(event: &Event) -> String {
    match text_of(event, "reason").unwrap_or_default() {
        "nothing_matches" | "hint_unsatisfied" => match text_of(event, "text") {
            Some(text) => format!("You can't see any \"{text}\" here."),
            None => "You can't see any such thing.".to_string(),
        },
        "no_referent" => {
            let pronoun = text_of(event, "pronoun").unwrap_or("it");
            format!("I'm not sure what \"{pronoun}\" refers to.")
        }
        "nothing_for_all" => "There's nothing suitable.".to_string(),
        _ => "You can't do that.".to_string(),
    }
}
