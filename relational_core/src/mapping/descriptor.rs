//! Static entity descriptions
//!
//! An [`EntityDescriptor`] is the raw, unresolved metadata an entity type
//! reports about itself. Related entity types are referenced through
//! [`EntityTypeRef`], which the mapping context follows to register the whole
//! graph.

use std::any::{type_name, TypeId};
use std::fmt;

/// A type that can be mapped onto relational tables
pub trait Entity: 'static {
    fn describe() -> EntityDescriptor;
}

/// Handle to an entity type and its description function
#[derive(Clone, Copy)]
pub struct EntityTypeRef {
    type_id: TypeId,
    type_name: &'static str,
    describe: fn() -> EntityDescriptor,
}

impl EntityTypeRef {
    pub fn of<T: Entity>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            describe: T::describe,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn describe(&self) -> EntityDescriptor {
        (self.describe)()
    }
}

impl fmt::Debug for EntityTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityTypeRef").field(&self.type_name).finish()
    }
}

impl PartialEq for EntityTypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EntityTypeRef {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
    Map,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PropertyKind {
    Simple,
    Entity(EntityTypeRef),
    Embedded {
        entity: EntityTypeRef,
        prefix: &'static str,
    },
    Collection {
        kind: CollectionKind,
        element: EntityTypeRef,
    },
}

/// Unresolved description of one property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub(crate) name: &'static str,
    pub(crate) kind: PropertyKind,
    pub(crate) column: Option<&'static str>,
    pub(crate) reverse_column: Option<&'static str>,
    pub(crate) key_column: Option<&'static str>,
    pub(crate) id: bool,
}

impl PropertyDescriptor {
    fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            column: None,
            reverse_column: None,
            key_column: None,
            id: false,
        }
    }

    /// A property stored in a single column
    pub fn simple(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Simple)
    }

    /// A one-to-one reference to an entity stored in its own table
    pub fn entity<T: Entity>(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Entity(EntityTypeRef::of::<T>()))
    }

    /// A value object flattened into the owner's table; columns get `prefix`
    pub fn embedded<T: Entity>(name: &'static str, prefix: &'static str) -> Self {
        Self::new(
            name,
            PropertyKind::Embedded {
                entity: EntityTypeRef::of::<T>(),
                prefix,
            },
        )
    }

    pub fn list<T: Entity>(name: &'static str) -> Self {
        Self::collection::<T>(name, CollectionKind::List)
    }

    pub fn set<T: Entity>(name: &'static str) -> Self {
        Self::collection::<T>(name, CollectionKind::Set)
    }

    /// A map keyed by a simple value; the key lives in the element table
    pub fn map<T: Entity>(name: &'static str) -> Self {
        Self::collection::<T>(name, CollectionKind::Map)
    }

    fn collection<T: Entity>(name: &'static str, kind: CollectionKind) -> Self {
        Self::new(
            name,
            PropertyKind::Collection {
                kind,
                element: EntityTypeRef::of::<T>(),
            },
        )
    }

    /// Explicit column name
    pub fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    /// Explicit back-reference column in the referenced table
    pub fn reverse_column(mut self, column: &'static str) -> Self {
        self.reverse_column = Some(column);
        self
    }

    /// Explicit key column for lists and maps
    pub fn key_column(mut self, column: &'static str) -> Self {
        self.key_column = Some(column);
        self
    }

    /// Mark as the identifier property
    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn related_type(&self) -> Option<EntityTypeRef> {
        match &self.kind {
            PropertyKind::Simple => None,
            PropertyKind::Entity(entity) => Some(*entity),
            PropertyKind::Embedded { entity, .. } => Some(*entity),
            PropertyKind::Collection { element, .. } => Some(*element),
        }
    }
}

/// Unresolved description of an entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub(crate) name: &'static str,
    pub(crate) table: Option<&'static str>,
    pub(crate) properties: Vec<PropertyDescriptor>,
}

impl EntityDescriptor {
    pub fn builder(name: &'static str) -> EntityDescriptorBuilder {
        EntityDescriptorBuilder {
            descriptor: EntityDescriptor {
                name,
                table: None,
                properties: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }
}

pub struct EntityDescriptorBuilder {
    descriptor: EntityDescriptor,
}

impl EntityDescriptorBuilder {
    /// Explicit table name
    pub fn table(mut self, table: &'static str) -> Self {
        self.descriptor.table = Some(table);
        self
    }

    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.descriptor.properties.push(property);
        self
    }

    pub fn build(self) -> EntityDescriptor {
        self.descriptor
    }
}
