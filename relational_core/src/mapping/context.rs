//! The mapping context
//!
//! Owns the arena of persistent entities and the memoized aggregate paths.
//! Entities are registered on first use together with every entity type
//! reachable from them; a registration either commits the whole graph or
//! nothing.

use super::aggregate_path::{AggregatePath, PathKey, PathNode};
use super::descriptor::{Entity, EntityDescriptor, EntityTypeRef, PropertyKind};
use super::entity::{EntityId, PersistentEntity, PersistentProperty, PropertyType};
use super::naming::NamingStrategy;
use super::property_path::{PersistentPropertyPath, PropertySegment};
use crate::errors::QueryError;
use crate::validation::validate_identifier;
use cache_system::{CacheStats, MemoCache};
use config::{CacheConfig, MappingConfig};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard};

#[derive(Default)]
struct Arena {
    entities: Vec<Arc<PersistentEntity>>,
    by_type: HashMap<TypeId, EntityId>,
}

struct ContextInner {
    naming: NamingStrategy,
    arena: RwLock<Arena>,
    paths: MemoCache<PathKey, Arc<PathNode>>,
}

/// Shared entity metadata; cloning is cheap and clones share all state
#[derive(Clone)]
pub struct MappingContext {
    inner: Arc<ContextInner>,
}

impl fmt::Debug for MappingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entities = match self.inner.arena.try_read() {
            Ok(arena) => arena.entities.len().to_string(),
            Err(_) => "locked".to_string(),
        };

        f.debug_struct("MappingContext")
            .field("naming", &self.inner.naming)
            .field("entities", &entities)
            .field("paths", &self.inner.paths)
            .finish()
    }
}

impl Default for MappingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingContext {
    pub fn new() -> Self {
        Self::with_parts(NamingStrategy::default(), MemoCache::new())
    }

    pub fn with_naming_strategy(naming: NamingStrategy) -> Self {
        Self::with_parts(naming, MemoCache::new())
    }

    pub fn from_config(mapping: &MappingConfig, cache: &CacheConfig) -> Result<Self, QueryError> {
        Ok(Self::with_parts(
            NamingStrategy::from_config(mapping),
            MemoCache::from_config(cache)?,
        ))
    }

    fn with_parts(naming: NamingStrategy, paths: MemoCache<PathKey, Arc<PathNode>>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                naming,
                arena: RwLock::new(Arena::default()),
                paths,
            }),
        }
    }

    pub fn naming_strategy(&self) -> &NamingStrategy {
        &self.inner.naming
    }

    /// Metadata for `T`, registering it and its related types on first access
    pub fn persistent_entity<T: Entity>(&self) -> Result<Arc<PersistentEntity>, QueryError> {
        let id = self.register(EntityTypeRef::of::<T>())?;
        self.required_entity(id)
    }

    pub fn entity(&self, id: EntityId) -> Option<Arc<PersistentEntity>> {
        self.required_entity(id).ok()
    }

    pub fn required_entity(&self, id: EntityId) -> Result<Arc<PersistentEntity>, QueryError> {
        self.read_arena()?
            .entities
            .get(id.0)
            .cloned()
            .ok_or_else(|| QueryError::illegal_state(format!("No entity registered as {}", id)))
    }

    /// All registered entities in registration order
    pub fn entities(&self) -> Result<Vec<Arc<PersistentEntity>>, QueryError> {
        Ok(self.read_arena()?.entities.clone())
    }

    /// Resolve a dot-separated property path on `T`
    pub fn persistent_property_path<T: Entity>(
        &self,
        path: &str,
    ) -> Result<PersistentPropertyPath, QueryError> {
        let root = self.persistent_entity::<T>()?;
        self.property_path_from(root, path)
    }

    /// Resolve a dot-separated property path starting at `root`
    pub fn property_path_from(
        &self,
        root: Arc<PersistentEntity>,
        path: &str,
    ) -> Result<PersistentPropertyPath, QueryError> {
        let mut resolved = PersistentPropertyPath::root_of(Arc::clone(&root));
        if path.is_empty() {
            return Ok(resolved);
        }

        let mut current = root;
        let mut names = path.split('.').peekable();
        while let Some(name) = names.next() {
            let property = current.property(name).ok_or_else(|| {
                QueryError::invalid_argument(format!(
                    "No property '{}' found on {} (path '{}')",
                    name,
                    current.name(),
                    path
                ))
            })?;
            let index = property.index();
            let next = match (names.peek(), property.actual_entity()) {
                (Some(_), Some(entity)) => Some(self.required_entity(entity)?),
                (Some(_), None) => {
                    return Err(QueryError::invalid_argument(format!(
                        "Cannot traverse simple property '{}' of {} (path '{}')",
                        name,
                        current.name(),
                        path
                    )))
                }
                (None, _) => None,
            };

            let segment = PropertySegment::new(Arc::clone(&current), index).ok_or_else(|| {
                QueryError::illegal_state(format!("Property index {} out of range", index))
            })?;
            resolved = resolved.push(segment);

            if let Some(next) = next {
                current = next;
            }
        }

        Ok(resolved)
    }

    /// The empty path rooted at `T`
    pub fn aggregate_root_path<T: Entity>(&self) -> Result<AggregatePath, QueryError> {
        let root = self.persistent_entity::<T>()?;
        self.aggregate_path(&PersistentPropertyPath::root_of(root))
    }

    pub fn aggregate_root_path_for(&self, root: EntityId) -> Result<AggregatePath, QueryError> {
        let root = self.required_entity(root)?;
        self.aggregate_path(&PersistentPropertyPath::root_of(root))
    }

    /// Memoized aggregate path for `path`
    pub fn aggregate_path(
        &self,
        path: &PersistentPropertyPath,
    ) -> Result<AggregatePath, QueryError> {
        let node = self
            .inner
            .paths
            .get_or_insert_with(path.key(), || Arc::new(PathNode::new(path.clone())))?;
        Ok(AggregatePath::new(self.clone(), node))
    }

    /// Shorthand for resolving `path` on `T` and wrapping it as an aggregate path
    pub fn aggregate_path_for<T: Entity>(&self, path: &str) -> Result<AggregatePath, QueryError> {
        let path = self.persistent_property_path::<T>(path)?;
        self.aggregate_path(&path)
    }

    pub fn path_cache_stats(&self) -> CacheStats {
        self.inner.paths.stats()
    }

    fn read_arena(&self) -> Result<RwLockReadGuard<'_, Arena>, QueryError> {
        self.inner
            .arena
            .read()
            .map_err(|e| QueryError::illegal_state(format!("Mapping context poisoned: {}", e)))
    }

    fn lookup(&self, type_id: TypeId) -> Result<Option<EntityId>, QueryError> {
        Ok(self.read_arena()?.by_type.get(&type_id).copied())
    }

    /// Register `root` and every entity type reachable from it
    fn register(&self, root: EntityTypeRef) -> Result<EntityId, QueryError> {
        if let Some(id) = self.lookup(root.type_id())? {
            return Ok(id);
        }

        let mut arena = self
            .inner
            .arena
            .write()
            .map_err(|e| QueryError::illegal_state(format!("Mapping context poisoned: {}", e)))?;

        // Registered by a concurrent caller between the two locks
        if let Some(id) = arena.by_type.get(&root.type_id()) {
            return Ok(*id);
        }

        // Assign ids to every unregistered type in the graph
        let base = arena.entities.len();
        let mut assigned: HashMap<TypeId, EntityId> = HashMap::new();
        let mut discovered: Vec<(EntityTypeRef, EntityDescriptor)> = Vec::new();
        let mut pending = vec![root];
        let mut seen = HashSet::new();

        while let Some(type_ref) = pending.pop() {
            if arena.by_type.contains_key(&type_ref.type_id()) || !seen.insert(type_ref.type_id())
            {
                continue;
            }

            let id = EntityId(base + discovered.len());
            assigned.insert(type_ref.type_id(), id);

            let descriptor = type_ref.describe();
            pending.extend(
                descriptor
                    .properties
                    .iter()
                    .rev()
                    .filter_map(|property| property.related_type()),
            );
            discovered.push((type_ref, descriptor));
        }

        let resolve = |type_ref: &EntityTypeRef| -> Result<EntityId, QueryError> {
            arena
                .by_type
                .get(&type_ref.type_id())
                .or_else(|| assigned.get(&type_ref.type_id()))
                .copied()
                .ok_or_else(|| {
                    QueryError::illegal_state(format!(
                        "Entity type {} was not registered",
                        type_ref.type_name()
                    ))
                })
        };

        let mut entities = Vec::with_capacity(discovered.len());
        for (type_ref, descriptor) in &discovered {
            let id = resolve(type_ref)?;
            entities.push(self.build_entity(id, descriptor, &resolve)?);
        }
        let root_id = resolve(&root)?;

        for ((type_ref, _), entity) in discovered.iter().zip(entities) {
            debug_log!(
                "Registered entity {} as {} (table {})",
                entity.name(),
                entity.id(),
                entity.table_name()
            );
            arena.by_type.insert(type_ref.type_id(), entity.id());
            arena.entities.push(Arc::new(entity));
        }

        Ok(root_id)
    }

    fn build_entity(
        &self,
        id: EntityId,
        descriptor: &EntityDescriptor,
        resolve: &dyn Fn(&EntityTypeRef) -> Result<EntityId, QueryError>,
    ) -> Result<PersistentEntity, QueryError> {
        let naming = &self.inner.naming;

        let table = match descriptor.table {
            Some(table) => table.to_string(),
            None => naming.table_name(descriptor.name),
        };
        validate_identifier(&table)?;

        let mut properties = Vec::with_capacity(descriptor.properties.len());
        let mut id_property = None;
        let mut names = HashSet::new();

        for (index, property) in descriptor.properties.iter().enumerate() {
            if !names.insert(property.name) {
                return Err(QueryError::invalid_argument(format!(
                    "Duplicate property '{}' on {}",
                    property.name, descriptor.name
                )));
            }

            let property_type = match &property.kind {
                PropertyKind::Simple => PropertyType::Simple,
                PropertyKind::Entity(entity) => PropertyType::Entity(resolve(entity)?),
                PropertyKind::Embedded { entity, prefix } => PropertyType::Embedded {
                    entity: resolve(entity)?,
                    prefix: prefix.to_string(),
                },
                PropertyKind::Collection { kind, element } => PropertyType::Collection {
                    kind: *kind,
                    element: resolve(element)?,
                },
            };

            if property.id {
                if property_type != PropertyType::Simple {
                    return Err(QueryError::invalid_argument(format!(
                        "Identifier property '{}' of {} must be a simple property",
                        property.name, descriptor.name
                    )));
                }
                if id_property.replace(index).is_some() {
                    return Err(QueryError::invalid_argument(format!(
                        "{} declares more than one identifier property",
                        descriptor.name
                    )));
                }
            }

            let column = match property.column {
                Some(column) => column.to_string(),
                None => naming.column_name(property.name),
            };

            properties.push(PersistentProperty {
                name: property.name.to_string(),
                owner: id,
                index,
                property_type,
                column_name: naming.identifier(column),
                reverse_column: property.reverse_column.map(|c| naming.identifier(c)),
                key_column: property.key_column.map(|c| naming.identifier(c)),
                id: property.id,
            });
        }

        Ok(PersistentEntity {
            id,
            name: descriptor.name.to_string(),
            table_name: naming.identifier(table),
            properties,
            id_property,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_poisoned_arena_is_reported() {
        let context = MappingContext::new();
        let shared = context.clone();
        let _ = thread::spawn(move || {
            let _guard = shared.inner.arena.write().unwrap();
            panic!("registration failed mid-way");
        })
        .join();

        for error in [
            context.required_entity(EntityId(0)).unwrap_err(),
            context.entities().unwrap_err(),
        ] {
            assert!(
                matches!(&error, QueryError::IllegalState(m) if m.starts_with("Mapping context poisoned")),
                "{:?}",
                error
            );
        }
        assert!(context.entity(EntityId(0)).is_none());
    }
}
