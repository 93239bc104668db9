//! Cross-message registries updated as a side effect of decoding.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use protocol::Identifier;

/// Kind of entity an identifier denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EntityKind {
    Player,
}

/// Facts derived about a player from a completed roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EntityAttributes {
    pub name: String,
    pub race: u8,
    pub class: u8,
    pub level: u32,
    pub first_login: bool,
}

/// A registered entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub attributes: EntityAttributes,
}

/// Maps identifiers to display names.
pub trait NameRegistry {
    fn register_display_name(&self, id: Identifier, name: &str);
}

/// Tracks live entities.
pub trait ObjectRegistry {
    fn register_entity(&self, id: Identifier, kind: EntityKind, attributes: EntityAttributes);

    /// Updates the level of a registered entity. Returns `false` if the
    /// entity is unknown.
    fn update_level(&self, id: Identifier, level: u32) -> bool;
}

/// Knows which character the capture is logged in as.
pub trait SessionRegistry {
    fn current_session_entity(&self) -> Option<Identifier>;
}

/// The registries handed to one decode.
#[derive(Clone, Copy)]
pub struct StateHandles<'a> {
    pub names: &'a dyn NameRegistry,
    pub objects: &'a dyn ObjectRegistry,
    pub session: &'a dyn SessionRegistry,
}

impl<'a> StateHandles<'a> {
    /// Bundles three registries.
    #[must_use]
    pub fn new(
        names: &'a dyn NameRegistry,
        objects: &'a dyn ObjectRegistry,
        session: &'a dyn SessionRegistry,
    ) -> Self {
        Self {
            names,
            objects,
            session,
        }
    }
}

/// Point-in-time copy of an [`InMemoryState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StateSnapshot {
    pub names: BTreeMap<Identifier, String>,
    pub entities: BTreeMap<Identifier, EntityRecord>,
    pub session: Option<Identifier>,
}

/// Bundled in-memory registries.
///
/// Each registry sits behind its own lock, taken for a single insert or
/// lookup, so messages may be decoded concurrently against one instance.
#[derive(Debug, Default)]
pub struct InMemoryState {
    names: RwLock<BTreeMap<Identifier, String>>,
    entities: RwLock<BTreeMap<Identifier, EntityRecord>>,
    session: RwLock<Option<Identifier>>,
}

impl InMemoryState {
    /// Creates empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows all three registries for a decode.
    #[must_use]
    pub fn handles(&self) -> StateHandles<'_> {
        StateHandles::new(self, self, self)
    }

    /// Sets the character the session is logged in as.
    pub fn set_session_entity(&self, id: Option<Identifier>) {
        *self.session.write() = id;
    }

    /// Returns the display name registered for `id`.
    #[must_use]
    pub fn display_name(&self, id: Identifier) -> Option<String> {
        self.names.read().get(&id).cloned()
    }

    /// Returns the entity registered for `id`.
    #[must_use]
    pub fn entity(&self, id: Identifier) -> Option<EntityRecord> {
        self.entities.read().get(&id).cloned()
    }

    /// Returns the number of registered display names.
    #[must_use]
    pub fn name_count(&self) -> usize {
        self.names.read().len()
    }

    /// Returns the number of registered entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.read().len()
    }

    /// Copies every registry.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            names: self.names.read().clone(),
            entities: self.entities.read().clone(),
            session: *self.session.read(),
        }
    }
}

impl NameRegistry for InMemoryState {
    fn register_display_name(&self, id: Identifier, name: &str) {
        self.names.write().insert(id, name.to_owned());
    }
}

impl ObjectRegistry for InMemoryState {
    fn register_entity(&self, id: Identifier, kind: EntityKind, attributes: EntityAttributes) {
        self.entities
            .write()
            .insert(id, EntityRecord { kind, attributes });
    }

    fn update_level(&self, id: Identifier, level: u32) -> bool {
        self.entities.write().get_mut(&id).map_or(false, |record| {
            record.attributes.level = level;
            true
        })
    }
}

impl SessionRegistry for InMemoryState {
    fn current_session_entity(&self) -> Option<Identifier> {
        *self.session.read()
    }
}
