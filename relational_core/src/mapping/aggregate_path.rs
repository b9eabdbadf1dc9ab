//! Aggregate paths
//!
//! An [`AggregatePath`] describes where a property of an aggregate lives in the
//! database: which table holds it, under which alias that table is joined,
//! the column name after embedded prefixes are applied and the back-reference
//! column pointing at the owning row. Paths are created and memoized by the
//! [`MappingContext`]; cloning one is cheap.

use super::context::MappingContext;
use super::entity::{EntityId, PersistentEntity, PersistentProperty};
use super::property_path::{PersistentPropertyPath, PropertySegment};
use crate::errors::QueryError;
use crate::identifier::SqlIdentifier;
use std::fmt;
use std::sync::Arc;

/// Memoization key: root entity plus the `(owner, property index)` chain
pub(crate) type PathKey = (EntityId, Vec<(EntityId, usize)>);

#[derive(Debug)]
pub(crate) struct PathNode {
    path: PersistentPropertyPath,
}

impl PathNode {
    pub(crate) fn new(path: PersistentPropertyPath) -> Self {
        Self { path }
    }
}

/// Table level facts about the table a path is stored in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub qualified_table_name: SqlIdentifier,
    pub table_alias: Option<SqlIdentifier>,
    /// `None` for the aggregate root table
    pub reverse_column_name: Option<SqlIdentifier>,
    /// Key column of lists and maps
    pub qualifier_column: Option<SqlIdentifier>,
    pub id_column_name: Option<SqlIdentifier>,
    pub effective_id_column_name: Option<SqlIdentifier>,
}

#[derive(Clone)]
pub struct AggregatePath {
    context: MappingContext,
    node: Arc<PathNode>,
}

impl AggregatePath {
    pub(crate) fn new(context: MappingContext, node: Arc<PathNode>) -> Self {
        Self { context, node }
    }

    fn path(&self) -> &PersistentPropertyPath {
        &self.node.path
    }

    /// The empty path pointing at the aggregate root itself
    pub fn is_root(&self) -> bool {
        self.path().is_empty()
    }

    pub fn len(&self) -> usize {
        self.path().len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    pub fn root_entity(&self) -> &Arc<PersistentEntity> {
        self.path().root()
    }

    pub fn property_path(&self) -> &PersistentPropertyPath {
        self.path()
    }

    pub fn matches(&self, path: &PersistentPropertyPath) -> bool {
        self.path() == path
    }

    pub fn leaf_property(&self) -> Option<&PersistentProperty> {
        self.path().leaf_property()
    }

    pub fn required_leaf_property(&self) -> Result<&PersistentProperty, QueryError> {
        self.leaf_property()
            .ok_or_else(|| QueryError::illegal_state("The root path has no leaf property"))
    }

    pub fn base_property(&self) -> Option<&PersistentProperty> {
        self.path().base_property()
    }

    /// The entity at the end of the path; the root entity for the root path
    /// and `None` when the leaf is a simple property
    pub fn leaf_entity(&self) -> Option<Arc<PersistentEntity>> {
        match self.leaf_property() {
            None => Some(Arc::clone(self.root_entity())),
            Some(property) => property
                .actual_entity()
                .and_then(|entity| self.context.entity(entity)),
        }
    }

    pub fn required_leaf_entity(&self) -> Result<Arc<PersistentEntity>, QueryError> {
        match self.leaf_property().map(|property| property.actual_entity()) {
            None => Ok(Arc::clone(self.root_entity())),
            Some(Some(entity)) => self.context.required_entity(entity),
            Some(None) => Err(QueryError::illegal_state(format!(
                "Couldn't resolve leaf entity for {}",
                self
            ))),
        }
    }

    /// True for the root and for paths ending in an entity valued property
    pub fn is_entity(&self) -> bool {
        self.leaf_property().map_or(true, PersistentProperty::is_entity)
    }

    pub fn is_embedded(&self) -> bool {
        self.leaf_property()
            .is_some_and(PersistentProperty::is_embedded)
    }

    pub fn is_multi_valued(&self) -> bool {
        self.is_collection_like() || self.is_map()
    }

    pub fn is_collection_like(&self) -> bool {
        self.leaf_property()
            .is_some_and(PersistentProperty::is_collection_like)
    }

    pub fn is_map(&self) -> bool {
        self.leaf_property().is_some_and(PersistentProperty::is_map)
    }

    /// Lists and maps, which need a key column
    pub fn is_qualified(&self) -> bool {
        self.leaf_property()
            .is_some_and(PersistentProperty::is_qualified)
    }

    pub fn has_id_property(&self) -> bool {
        self.leaf_entity()
            .is_some_and(|entity| entity.has_id_property())
    }

    pub fn required_id_property(&self) -> Result<PersistentProperty, QueryError> {
        self.required_leaf_entity()?
            .required_id_property()
            .cloned()
    }

    /// The path one segment shorter.
    ///
    /// For a single segment path this is the root path of the entity that
    /// declares the property.
    pub fn parent_path(&self) -> Result<AggregatePath, QueryError> {
        let property = self.leaf_property().ok_or_else(|| {
            QueryError::illegal_state("The parent path of a root path is not defined")
        })?;

        if self.len() == 1 {
            return self.context.aggregate_root_path_for(property.owner());
        }

        match self.path().parent_path() {
            Some(parent) => self.context.aggregate_path(&parent),
            None => Err(QueryError::illegal_state(
                "The parent path of a root path is not defined",
            )),
        }
    }

    /// The closest strict ancestor that is the root or has an id property
    pub fn id_defining_parent_path(&self) -> Result<AggregatePath, QueryError> {
        let parent = self.parent_path()?;

        if parent.is_root() || parent.has_id_property() {
            return Ok(parent);
        }
        parent.id_defining_parent_path()
    }

    /// The closest path, possibly this one, that is stored in its own table
    pub fn table_owning_ancestor(&self) -> Result<AggregatePath, QueryError> {
        if self.is_entity() && !self.is_embedded() {
            return Ok(self.clone());
        }
        self.parent_path()?.table_owning_ancestor()
    }

    pub fn qualified_table_name(&self) -> Result<SqlIdentifier, QueryError> {
        let owner = self.table_owning_ancestor()?;
        Ok(owner.required_leaf_entity()?.table_name().clone())
    }

    /// Alias under which the owning table is joined; `None` for the root table
    pub fn table_alias(&self) -> Result<Option<SqlIdentifier>, QueryError> {
        let owner = self.table_owning_ancestor()?;
        if owner.is_root() {
            return Ok(None);
        }
        owner.assemble_table_alias()
    }

    fn assemble_table_alias(&self) -> Result<Option<SqlIdentifier>, QueryError> {
        let property = self.required_leaf_property()?;
        let prefix = property
            .embedded_prefix()
            .unwrap_or_else(|| property.name())
            .to_string();

        if self.len() == 1 {
            return Ok((!prefix.is_empty()).then(|| SqlIdentifier::quoted(prefix)));
        }

        let parent = self.parent_path()?;
        let alias = match parent.assemble_table_alias()? {
            Some(alias) if parent.is_embedded() => {
                alias.transform(|name| format!("{}{}", name, prefix))
            }
            Some(alias) => alias.transform(|name| format!("{}_{}", name, prefix)),
            None if prefix.is_empty() => return Ok(None),
            None => SqlIdentifier::quoted(prefix),
        };
        Ok(Some(alias))
    }

    /// Column of the leaf property with the prefixes of enclosing embedded
    /// properties applied
    pub fn column_name(&self) -> Result<SqlIdentifier, QueryError> {
        let mut column = self.required_leaf_property()?.column_name().clone();

        let segments = self.path().segments();
        for segment in segments[..segments.len() - 1].iter().rev() {
            match segment.property().embedded_prefix() {
                Some(prefix) => column = column.transform(|name| format!("{}{}", prefix, name)),
                None => break,
            }
        }
        Ok(column)
    }

    /// Column name prefixed with the table alias, used in select lists
    pub fn column_alias(&self) -> Result<SqlIdentifier, QueryError> {
        let column = self.column_name()?;
        Ok(match self.table_alias()? {
            Some(alias) => column.transform(|name| format!("{}_{}", alias.name(), name)),
            None => column,
        })
    }

    /// Column in this path's table that references the id defining parent
    pub fn reverse_column_name(&self) -> Result<SqlIdentifier, QueryError> {
        let property = self.leaf_property().ok_or_else(|| {
            QueryError::illegal_state("Empty paths don't have a reverse column name")
        })?;

        if let Some(column) = property.configured_reverse_column() {
            return Ok(column.clone());
        }

        let parent = self.id_defining_parent_path()?.required_leaf_entity()?;
        Ok(self
            .context
            .naming_strategy()
            .reverse_column_name(parent.table_name()))
    }

    /// Key column of list and map properties
    pub fn qualifier_column(&self) -> Result<Option<SqlIdentifier>, QueryError> {
        let property = match self.leaf_property() {
            Some(property) if property.is_qualified() => property,
            _ => return Ok(None),
        };

        if let Some(column) = property.configured_key_column() {
            return Ok(Some(column.clone()));
        }

        let reverse = self.reverse_column_name()?;
        Ok(Some(self.context.naming_strategy().key_column_name(&reverse)))
    }

    pub fn id_column_name(&self) -> Result<SqlIdentifier, QueryError> {
        Ok(self.required_id_property()?.column_name().clone())
    }

    /// The column identifying rows of the owning table: the root's id column
    /// or, for dependent tables, the reverse column
    pub fn effective_id_column_name(&self) -> Result<SqlIdentifier, QueryError> {
        let owner = self.table_owning_ancestor()?;
        if owner.is_root() {
            owner.id_column_name()
        } else {
            owner.reverse_column_name()
        }
    }

    pub fn table_info(&self) -> Result<TableInfo, QueryError> {
        let owner = self.table_owning_ancestor()?;

        let reverse_column_name = match owner.is_root() {
            true => None,
            false => Some(owner.reverse_column_name()?),
        };
        let id_column_name = match owner.has_id_property() {
            true => Some(owner.id_column_name()?),
            false => None,
        };
        let effective_id_column_name = match (&reverse_column_name, &id_column_name) {
            (Some(reverse), _) => Some(reverse.clone()),
            (None, id) => id.clone(),
        };

        Ok(TableInfo {
            qualified_table_name: owner.qualified_table_name()?,
            table_alias: owner.table_alias()?,
            reverse_column_name,
            qualifier_column: owner.qualifier_column()?,
            id_column_name,
            effective_id_column_name,
        })
    }

    pub fn to_dot_path(&self) -> String {
        self.path().to_dot_path()
    }

    pub fn starts_with(&self, other: &AggregatePath) -> bool {
        self.path().starts_with(other.path())
    }

    /// Extend the path by one property of the leaf entity
    pub fn append(&self, property: &str) -> Result<AggregatePath, QueryError> {
        if !self.is_entity() {
            return Err(QueryError::invalid_argument(format!(
                "Cannot append '{}' to simple property path {}",
                property, self
            )));
        }

        let entity = self.required_leaf_entity()?;
        let index = entity
            .property(property)
            .map(PersistentProperty::index)
            .ok_or_else(|| {
                QueryError::invalid_argument(format!(
                    "No property '{}' found on {}",
                    property,
                    entity.name()
                ))
            })?;
        let segment = PropertySegment::new(entity, index).ok_or_else(|| {
            QueryError::illegal_state(format!("Property index {} out of range", index))
        })?;

        self.context.aggregate_path(&self.path().push(segment))
    }
}

impl PartialEq for AggregatePath {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for AggregatePath {}

impl fmt::Display for AggregatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AggregatePath[{:?}]", self.path())
    }
}

impl fmt::Debug for AggregatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
