//! Trait components attached to entities.
//!
//! A trait is a data-only capability bag. Entities declare what they are by
//! the set of traits they carry: a chest is an entity with `Identity`,
//! `Container`, and `Openable`; a lamp has `Identity`, `Switchable`, and
//! `LightSource`. Behavior lives in the engine's actions, which query traits.
//!
//! Every trait exposes its mutable state as named fields, so that generic
//! field events can change it and snapshots can diff it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parlance_foundation::{Direction, EntityId, Error, Result, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Key under which a trait is stored on an entity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum TraitKind {
    Identity,
    Room,
    Container,
    Supporter,
    Openable,
    Lockable,
    Switchable,
    LightSource,
    Actor,
    Scenery,
    OutOfReach,
    Sensory,
    /// A story-defined trait, keyed by name.
    Custom(Arc<str>),
}

impl TraitKind {
    /// Returns the lowercase name of the trait.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Identity => "identity",
            Self::Room => "room",
            Self::Container => "container",
            Self::Supporter => "supporter",
            Self::Openable => "openable",
            Self::Lockable => "lockable",
            Self::Switchable => "switchable",
            Self::LightSource => "light_source",
            Self::Actor => "actor",
            Self::Scenery => "scenery",
            Self::OutOfReach => "out_of_reach",
            Self::Sensory => "sensory",
            Self::Custom(name) => name,
        }
    }

    /// Maps a name back to a kind. Unknown names become custom kinds.
    #[must_use]
    pub fn from_name(name: &str) -> TraitKind {
        match name {
            "identity" => Self::Identity,
            "room" => Self::Room,
            "container" => Self::Container,
            "supporter" => Self::Supporter,
            "openable" => Self::Openable,
            "lockable" => Self::Lockable,
            "switchable" => Self::Switchable,
            "light_source" | "light" => Self::LightSource,
            "actor" => Self::Actor,
            "scenery" => Self::Scenery,
            "out_of_reach" => Self::OutOfReach,
            "sensory" => Self::Sensory,
            other => Self::Custom(other.into()),
        }
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names, synonyms, and descriptive words for an entity.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Identity {
    /// Primary noun, such as `key`.
    pub name: String,
    /// Synonyms that also name the entity.
    pub aliases: Vec<String>,
    /// Descriptive words, such as `brass` or `small`.
    pub adjectives: Vec<String>,
    /// Prose shown when the entity is examined.
    pub description: String,
    /// The entity is referred to in the plural ("some coins").
    pub plural: bool,
    /// The name is a proper noun and takes no article.
    pub proper: bool,
}

impl Identity {
    /// Creates an identity with a primary name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            ..Self::default()
        }
    }

    /// Adds an adjective.
    #[must_use]
    pub fn with_adjective(mut self, adjective: impl Into<String>) -> Self {
        self.adjectives.push(adjective.into().to_lowercase());
        self
    }

    /// Adds a synonym.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into().to_lowercase());
        self
    }

    /// Sets the examine text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the name as plural.
    #[must_use]
    pub fn plural(mut self) -> Self {
        self.plural = true;
        self
    }

    /// Marks the name as a proper noun.
    #[must_use]
    pub fn proper(mut self) -> Self {
        self.proper = true;
        self
    }

    /// Returns true if `word` is an adjective of this entity.
    #[must_use]
    pub fn has_adjective(&self, word: &str) -> bool {
        self.adjectives.iter().any(|a| a == word)
    }

    /// Returns true if `word` is one of this entity's aliases.
    #[must_use]
    pub fn has_alias(&self, word: &str) -> bool {
        self.aliases.iter().any(|a| a == word)
    }

    /// Returns the adjectives and name as one phrase, such as `brass key`.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.adjectives.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.adjectives.join(" "), self.name)
        }
    }
}

/// A location that roots a containment tree.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Room {
    /// Nothing can be seen here without a light source.
    pub dark: bool,
    /// Where each exit leads.
    pub exits: BTreeMap<Direction, EntityId>,
}

impl Room {
    /// Creates a lit room with no exits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the room as dark.
    #[must_use]
    pub fn dark(mut self) -> Self {
        self.dark = true;
        self
    }

    /// Adds an exit.
    #[must_use]
    pub fn with_exit(mut self, direction: Direction, destination: EntityId) -> Self {
        self.exits.insert(direction, destination);
        self
    }
}

/// Something other entities can be put inside.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container {
    /// Maximum number of direct contents, if limited.
    pub capacity: Option<u32>,
    /// Contents can be seen even when closed.
    pub transparent: bool,
}

/// Something other entities can be put on.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Supporter {
    /// Maximum number of direct contents, if limited.
    pub capacity: Option<u32>,
}

/// A person or creature. The player is an actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Actor {
    /// This actor is the one the player controls.
    pub player: bool,
    /// Which personal pronoun refers to the actor.
    pub gender: Gender,
}

/// Grammatical gender of an actor, for `him` and `her`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum Gender {
    Masculine,
    Feminine,
    #[default]
    Neuter,
}

/// A story-defined trait with an open set of fields.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CustomTrait {
    /// The trait's name.
    pub name: Arc<str>,
    /// Field values by name.
    pub fields: BTreeMap<String, Value>,
}

impl CustomTrait {
    /// Creates a custom trait with no fields.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// A trait attached to an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Trait {
    /// Naming and description.
    Identity(Identity),
    /// A location.
    Room(Room),
    /// Can hold other entities inside.
    Container(Container),
    /// Can hold other entities on top.
    Supporter(Supporter),
    /// Can be opened and closed.
    Openable {
        /// Currently open.
        open: bool,
    },
    /// Can be locked and unlocked.
    Lockable {
        /// Currently locked.
        locked: bool,
        /// The entity that fits the lock, if any.
        key: Option<EntityId>,
    },
    /// Can be switched on and off.
    Switchable {
        /// Currently on.
        on: bool,
    },
    /// Gives off light (while on, if also switchable).
    LightSource,
    /// A person or creature.
    Actor(Actor),
    /// Fixed in place; cannot be taken.
    Scenery,
    /// Visible but too far away to touch.
    OutOfReach,
    /// Perceivable by sound or smell when not seen.
    Sensory {
        /// Makes noise.
        audible: bool,
        /// Gives off a smell.
        scented: bool,
    },
    /// Story-defined.
    Custom(CustomTrait),
}

impl Trait {
    /// Returns the key this trait is stored under.
    #[must_use]
    pub fn kind(&self) -> TraitKind {
        match self {
            Self::Identity(_) => TraitKind::Identity,
            Self::Room(_) => TraitKind::Room,
            Self::Container(_) => TraitKind::Container,
            Self::Supporter(_) => TraitKind::Supporter,
            Self::Openable { .. } => TraitKind::Openable,
            Self::Lockable { .. } => TraitKind::Lockable,
            Self::Switchable { .. } => TraitKind::Switchable,
            Self::LightSource => TraitKind::LightSource,
            Self::Actor(_) => TraitKind::Actor,
            Self::Scenery => TraitKind::Scenery,
            Self::OutOfReach => TraitKind::OutOfReach,
            Self::Sensory { .. } => TraitKind::Sensory,
            Self::Custom(custom) => TraitKind::Custom(Arc::clone(&custom.name)),
        }
    }

    /// Reads a field by name.
    ///
    /// Returns `None` if the trait has no such field, or if an optional
    /// field (such as a lock's key) is unset.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<Value> {
        match (self, field) {
            (Self::Identity(id), "name") => Some(Value::from(id.name.as_str())),
            (Self::Identity(id), "description") => Some(Value::from(id.description.as_str())),
            (Self::Identity(id), "plural") => Some(Value::Bool(id.plural)),
            (Self::Identity(id), "proper") => Some(Value::Bool(id.proper)),
            (Self::Room(room), "dark") => Some(Value::Bool(room.dark)),
            (Self::Container(c), "transparent") => Some(Value::Bool(c.transparent)),
            (Self::Container(c), "capacity") => c.capacity.map(|n| Value::Int(i64::from(n))),
            (Self::Supporter(s), "capacity") => s.capacity.map(|n| Value::Int(i64::from(n))),
            (Self::Openable { open }, "open") => Some(Value::Bool(*open)),
            (Self::Lockable { locked, .. }, "locked") => Some(Value::Bool(*locked)),
            (Self::Lockable { key, .. }, "key") => key.map(Value::Entity),
            (Self::Switchable { on }, "on") => Some(Value::Bool(*on)),
            (Self::Actor(actor), "player") => Some(Value::Bool(actor.player)),
            (Self::Sensory { audible, .. }, "audible") => Some(Value::Bool(*audible)),
            (Self::Sensory { scented, .. }, "scented") => Some(Value::Bool(*scented)),
            (Self::Custom(custom), name) => custom.fields.get(name).cloned(),
            _ => None,
        }
    }

    /// Returns a copy of this trait with one field replaced.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if the trait has no such field, or `FieldType`
    /// if the value has the wrong type. Custom traits accept new fields, but
    /// an existing field keeps its type.
    pub fn with_field(&self, field: &str, value: Value) -> Result<Trait> {
        let mut updated = self.clone();
        match (&mut updated, field, &value) {
            (Self::Identity(id), "name", Value::Text(s)) => id.name = s.to_string(),
            (Self::Identity(id), "description", Value::Text(s)) => id.description = s.to_string(),
            (Self::Identity(id), "plural", Value::Bool(b)) => id.plural = *b,
            (Self::Identity(id), "proper", Value::Bool(b)) => id.proper = *b,
            (Self::Room(room), "dark", Value::Bool(b)) => room.dark = *b,
            (Self::Container(c), "transparent", Value::Bool(b)) => c.transparent = *b,
            (Self::Container(c), "capacity", Value::Int(n)) => c.capacity = capacity(*n),
            (Self::Supporter(s), "capacity", Value::Int(n)) => s.capacity = capacity(*n),
            (Self::Openable { open }, "open", Value::Bool(b)) => *open = *b,
            (Self::Lockable { locked, .. }, "locked", Value::Bool(b)) => *locked = *b,
            (Self::Lockable { key, .. }, "key", Value::Entity(e)) => *key = Some(*e),
            (Self::Switchable { on }, "on", Value::Bool(b)) => *on = *b,
            (Self::Actor(actor), "player", Value::Bool(b)) => actor.player = *b,
            (Self::Sensory { audible, .. }, "audible", Value::Bool(b)) => *audible = *b,
            (Self::Sensory { scented, .. }, "scented", Value::Bool(b)) => *scented = *b,
            (Self::Custom(custom), name, _) => {
                if let Some(existing) = custom.fields.get(name) {
                    if !existing.same_type(&value) {
                        return Err(Error::field_type(
                            name,
                            existing.type_name(),
                            value.type_name(),
                        ));
                    }
                }
                custom.fields.insert(name.to_string(), value.clone());
            }
            _ => {
                return Err(match self.field_type(field) {
                    Some(expected) => Error::field_type(field, expected, value.type_name()),
                    None => Error::unknown_field(self.kind().name(), field),
                });
            }
        }
        Ok(updated)
    }

    /// Returns the value type a built-in field expects.
    fn field_type(&self, field: &str) -> Option<&'static str> {
        match (self, field) {
            (Self::Identity(_), "name" | "description") => Some("text"),
            (Self::Identity(_), "plural" | "proper")
            | (Self::Room(_), "dark")
            | (Self::Container(_), "transparent")
            | (Self::Openable { .. }, "open")
            | (Self::Lockable { .. }, "locked")
            | (Self::Switchable { .. }, "on")
            | (Self::Actor(_), "player")
            | (Self::Sensory { .. }, "audible" | "scented") => Some("bool"),
            (Self::Container(_) | Self::Supporter(_), "capacity") => Some("int"),
            (Self::Lockable { .. }, "key") => Some("entity"),
            _ => None,
        }
    }
}

fn capacity(n: i64) -> Option<u32> {
    u32::try_from(n).ok()
}
