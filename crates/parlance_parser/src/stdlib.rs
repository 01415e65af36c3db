//! Standard grammar for adventure games.
//!
//! Every pattern here is registered as `Standard` and cannot be removed by
//! story content. Stories add their own patterns on top.

use tracing::error;

use crate::grammar::{DEFAULT_PRIORITY, GrammarTable};

/// One standard pattern: source, action, priority, implied preposition.
type Entry = (&'static str, &'static str, i32, Option<&'static str>);

const P: i32 = DEFAULT_PRIORITY;

/// The standard verb patterns.
pub const STANDARD_PATTERNS: &[Entry] = &[
    // Taking
    ("take|get|grab|carry <noun>", "taking", P, None),
    ("pick up <noun>", "taking", P, None),
    ("pick <noun> up", "taking", P, None),
    ("take|get|remove <noun> from|off <second:container?>", "taking", P + 5, None),
    // Dropping
    ("drop|discard <noun:held>", "dropping", P, None),
    ("put|set down <noun:held>", "dropping", P + 10, None),
    ("put|set <noun:held> down", "dropping", P + 10, None),
    // Putting
    (
        "put|place|set|jam|shove|cram|stuff|insert <noun:held> in|into|inside <second:container>",
        "putting",
        P,
        None,
    ),
    (
        "put|place|set|lay <noun:held> on|onto|upon <second:supporter>",
        "putting",
        P,
        None,
    ),
    (
        "insert|jam|shove|cram <noun:held> <second:container>",
        "putting",
        P - 5,
        Some("in"),
    ),
    // Opening and closing
    ("open <noun:openable>", "opening", P, None),
    ("close|shut <noun:openable>", "closing", P, None),
    // Locking
    ("lock <noun:lockable> with <second:held>", "locking", P + 5, None),
    ("lock <noun:lockable>", "locking", P, None),
    ("unlock <noun:lockable> with <second:held>", "unlocking", P + 5, None),
    ("unlock <noun:lockable>", "unlocking", P, None),
    // Switching
    ("turn|switch on <noun:switchable>", "switching_on", P, None),
    ("turn|switch <noun:switchable> on", "switching_on", P, None),
    ("turn|switch off <noun:switchable>", "switching_off", P, None),
    ("turn|switch <noun:switchable> off", "switching_off", P, None),
    // Going
    ("go|walk|run <direction>", "going", P, None),
    ("<direction>", "going", P + 10, None),
    // Looking
    ("look|l", "looking", P + 10, None),
    ("look around", "looking", P, None),
    ("examine|inspect|describe <noun>", "examining", P, None),
    ("look at <noun>", "examining", P, None),
    ("x <noun>", "examining", P + 10, None),
    // Inventory, waiting
    ("inventory|inv", "inventory", P, None),
    ("i", "inventory", P + 10, None),
    ("wait", "waiting", P, None),
    ("z", "waiting", P + 10, None),
    ("sleep|nap", "sleeping", P, None),
    // Meta
    ("save", "saving", P, None),
    ("restore|load", "restoring", P, None),
    ("restart", "restarting", P, None),
    ("undo", "undoing", P, None),
];

/// Builds a grammar table holding the standard patterns.
#[must_use]
pub fn standard_grammar() -> GrammarTable {
    let mut table = GrammarTable::new();
    for &(source, action, priority, implies) in STANDARD_PATTERNS {
        let mut def = table.define(source, action).priority(priority).standard();
        if let Some(prep) = implies {
            def = def.implies(prep);
        }
        if let Err(e) = def.register() {
            error!(pattern = source, error = %e, "standard pattern failed to compile");
        }
    }
    table
}
