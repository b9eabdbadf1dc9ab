//! Entity mapping metadata
//!
//! Entity types describe themselves through [`Entity::describe`] (usually
//! generated by `#[derive(Entity)]`). The [`MappingContext`] turns those
//! descriptions into an arena of persistent entities and resolves property
//! paths into [`AggregatePath`]s.

pub mod aggregate_path;
pub mod context;
pub mod descriptor;
pub mod entity;
pub mod naming;
pub mod property_path;


pub use aggregate_path::{AggregatePath, TableInfo};
pub use context::MappingContext;
pub use descriptor::{
    CollectionKind, Entity, EntityDescriptor, EntityDescriptorBuilder, EntityTypeRef,
    PropertyDescriptor,
};
pub use entity::{EntityId, PersistentEntity, PersistentProperty, PropertyType};
pub use naming::NamingStrategy;
pub use property_path::{PersistentPropertyPath, PropertySegment};
