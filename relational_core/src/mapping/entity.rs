//! Resolved entity metadata stored in the mapping context arena

use super::descriptor::CollectionKind;
use crate::errors::QueryError;
use crate::identifier::SqlIdentifier;
use std::fmt;

/// Index of an entity in the mapping context arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    Simple,
    Entity(EntityId),
    Embedded { entity: EntityId, prefix: String },
    Collection { kind: CollectionKind, element: EntityId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentProperty {
    pub(crate) name: String,
    pub(crate) owner: EntityId,
    pub(crate) index: usize,
    pub(crate) property_type: PropertyType,
    pub(crate) column_name: SqlIdentifier,
    pub(crate) reverse_column: Option<SqlIdentifier>,
    pub(crate) key_column: Option<SqlIdentifier>,
    pub(crate) id: bool,
}

impl PersistentProperty {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entity declaring this property
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Position within the owner's properties
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn property_type(&self) -> &PropertyType {
        &self.property_type
    }

    pub fn column_name(&self) -> &SqlIdentifier {
        &self.column_name
    }

    /// Explicitly configured back-reference column, if any
    pub fn configured_reverse_column(&self) -> Option<&SqlIdentifier> {
        self.reverse_column.as_ref()
    }

    /// Explicitly configured key column, if any
    pub fn configured_key_column(&self) -> Option<&SqlIdentifier> {
        self.key_column.as_ref()
    }

    pub fn is_id_property(&self) -> bool {
        self.id
    }

    /// True for references, embedded values and collections of entities
    pub fn is_entity(&self) -> bool {
        !matches!(self.property_type, PropertyType::Simple)
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.property_type, PropertyType::Embedded { .. })
    }

    pub fn embedded_prefix(&self) -> Option<&str> {
        match &self.property_type {
            PropertyType::Embedded { prefix, .. } => Some(prefix),
            _ => None,
        }
    }

    /// Lists and sets
    pub fn is_collection_like(&self) -> bool {
        matches!(
            self.property_type,
            PropertyType::Collection {
                kind: CollectionKind::List | CollectionKind::Set,
                ..
            }
        )
    }

    pub fn is_map(&self) -> bool {
        matches!(
            self.property_type,
            PropertyType::Collection {
                kind: CollectionKind::Map,
                ..
            }
        )
    }

    /// Lists and maps carry a key column
    pub fn is_qualified(&self) -> bool {
        matches!(
            self.property_type,
            PropertyType::Collection {
                kind: CollectionKind::List | CollectionKind::Map,
                ..
            }
        )
    }

    /// The entity this property holds, or its collection element
    pub fn actual_entity(&self) -> Option<EntityId> {
        match &self.property_type {
            PropertyType::Simple => None,
            PropertyType::Entity(entity) => Some(*entity),
            PropertyType::Embedded { entity, .. } => Some(*entity),
            PropertyType::Collection { element, .. } => Some(*element),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentEntity {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub(crate) table_name: SqlIdentifier,
    pub(crate) properties: Vec<PersistentProperty>,
    pub(crate) id_property: Option<usize>,
}

impl PersistentEntity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &SqlIdentifier {
        &self.table_name
    }

    pub fn properties(&self) -> &[PersistentProperty] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PersistentProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_at(&self, index: usize) -> Option<&PersistentProperty> {
        self.properties.get(index)
    }

    pub fn has_id_property(&self) -> bool {
        self.id_property.is_some()
    }

    pub fn id_property(&self) -> Option<&PersistentProperty> {
        self.id_property.and_then(|index| self.properties.get(index))
    }

    pub fn required_id_property(&self) -> Result<&PersistentProperty, QueryError> {
        self.id_property().ok_or_else(|| {
            QueryError::illegal_state(format!(
                "Required identifier property not found for {}",
                self.name
            ))
        })
    }
}
