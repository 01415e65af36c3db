//! Pronoun and mention history.
//!
//! Tracks what "it", "him", "her", and "them" currently refer to, and when
//! each entity was last mentioned. The validator reads it; the session
//! updates it after every successful resolution.

use std::collections::BTreeMap;

use parlance_foundation::EntityId;
use parlance_parser::PronounKind;
use parlance_world::{Gender, TraitKind, World};

/// A referent and the turn it was set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Referent {
    /// The entities referred to; more than one only for "them"
    pub entities: Vec<EntityId>,
    /// Turn the referent was set
    pub turn: u64,
}

impl Referent {
    fn one(entity: EntityId, turn: u64) -> Self {
        Self {
            entities: vec![entity],
            turn,
        }
    }
}

/// What a pronoun can refer to, by category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PronounHistory {
    /// Last inanimate thing ("it")
    thing: Option<Referent>,
    /// Last masculine person ("him")
    him: Option<Referent>,
    /// Last feminine person ("her")
    her: Option<Referent>,
    /// Last person of any gender
    person: Option<Referent>,
    /// Last place
    place: Option<Referent>,
    /// Last group, or last plural thing ("them")
    them: Option<Referent>,
    /// Turn each entity was last mentioned
    mentions: BTreeMap<EntityId, u64>,
}

impl PronounHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `entity` was referred to on `turn`.
    pub fn record(&mut self, world: &World, entity: EntityId, turn: u64) {
        self.mentions.insert(entity, turn);
        let referent = Some(Referent::one(entity, turn));

        if world.is_room(entity) {
            self.place = referent;
            return;
        }
        if let Some(actor) = world.entity(entity).and_then(|e| e.actor()) {
            match actor.gender {
                Gender::Masculine => self.him = referent.clone(),
                Gender::Feminine => self.her = referent.clone(),
                Gender::Neuter => {}
            }
            self.person = referent;
            return;
        }
        if world.identity(entity).is_some_and(|id| id.plural) {
            self.them = referent;
        } else {
            self.thing = referent;
        }
    }

    /// Records a group, as after "take all". Single members are also
    /// recorded individually.
    pub fn record_group(&mut self, world: &World, entities: &[EntityId], turn: u64) {
        match entities {
            [] => {}
            [one] => self.record(world, *one, turn),
            many => {
                for &e in many {
                    self.mentions.insert(e, turn);
                }
                self.them = Some(Referent {
                    entities: many.to_vec(),
                    turn,
                });
            }
        }
    }

    /// Returns the current referent of a pronoun.
    #[must_use]
    pub fn referent(&self, pronoun: PronounKind) -> Option<&Referent> {
        match pronoun {
            PronounKind::It => self.thing.as_ref(),
            PronounKind::Him => self.him.as_ref(),
            PronounKind::Her => self.her.as_ref(),
            PronounKind::Them => self.them.as_ref().or(self.person.as_ref()),
        }
    }

    /// Returns the last place mentioned.
    #[must_use]
    pub fn place(&self) -> Option<&Referent> {
        self.place.as_ref()
    }

    /// Returns the turn `entity` was last mentioned.
    #[must_use]
    pub fn last_mentioned(&self, entity: EntityId) -> Option<u64> {
        self.mentions.get(&entity).copied()
    }

    /// Checks if `entity` was mentioned within `window` turns of `now`.
    #[must_use]
    pub fn recently_mentioned(&self, entity: EntityId, now: u64, window: u64) -> bool {
        self.last_mentioned(entity)
            .is_some_and(|turn| now.saturating_sub(turn) <= window)
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Checks if a pronoun can grammatically refer to `entity`.
#[must_use]
pub fn pronoun_fits(world: &World, pronoun: PronounKind, entity: EntityId) -> bool {
    let gender = world.entity(entity).and_then(|e| e.actor()).map(|a| a.gender);
    let plural = world.identity(entity).is_some_and(|id| id.plural);
    match pronoun {
        PronounKind::It => matches!(gender, None | Some(Gender::Neuter)) && !plural,
        PronounKind::Him => gender == Some(Gender::Masculine),
        PronounKind::Her => gender == Some(Gender::Feminine),
        PronounKind::Them => plural || world.has_trait(entity, &TraitKind::Actor),
    }
}
