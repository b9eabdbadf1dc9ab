//! Property paths through an entity graph

use super::entity::{EntityId, PersistentEntity, PersistentProperty};
use std::fmt;
use std::sync::Arc;

/// One step of a path: a property of `owner`
#[derive(Clone)]
pub struct PropertySegment {
    owner: Arc<PersistentEntity>,
    index: usize,
}

impl PropertySegment {
    /// `None` unless `index` addresses a property of `owner`
    pub(crate) fn new(owner: Arc<PersistentEntity>, index: usize) -> Option<Self> {
        owner.property_at(index)?;
        Some(Self { owner, index })
    }

    pub fn owner(&self) -> &Arc<PersistentEntity> {
        &self.owner
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn property(&self) -> &PersistentProperty {
        // Checked on construction
        &self.owner.properties()[self.index]
    }

    pub(crate) fn key(&self) -> (EntityId, usize) {
        (self.owner.id(), self.index)
    }
}

impl PartialEq for PropertySegment {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PropertySegment {}

impl fmt::Debug for PropertySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner.name(), self.property().name())
    }
}

/// A chain of properties starting at a root entity; empty for the root itself
#[derive(Clone)]
pub struct PersistentPropertyPath {
    root: Arc<PersistentEntity>,
    segments: Vec<PropertySegment>,
}

impl PersistentPropertyPath {
    pub(crate) fn root_of(root: Arc<PersistentEntity>) -> Self {
        Self {
            root,
            segments: Vec::new(),
        }
    }

    pub(crate) fn push(&self, segment: PropertySegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self {
            root: Arc::clone(&self.root),
            segments,
        }
    }

    pub fn root(&self) -> &Arc<PersistentEntity> {
        &self.root
    }

    pub fn segments(&self) -> &[PropertySegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn leaf_property(&self) -> Option<&PersistentProperty> {
        self.segments.last().map(PropertySegment::property)
    }

    pub fn base_property(&self) -> Option<&PersistentProperty> {
        self.segments.first().map(PropertySegment::property)
    }

    /// The path without its last segment; `None` for the empty path
    pub fn parent_path(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            root: Arc::clone(&self.root),
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn starts_with(&self, other: &PersistentPropertyPath) -> bool {
        self.root.id() == other.root.id() && self.segments.starts_with(&other.segments)
    }

    /// Property names joined with `.`
    pub fn to_dot_path(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.property().name())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub(crate) fn key(&self) -> (EntityId, Vec<(EntityId, usize)>) {
        (
            self.root.id(),
            self.segments.iter().map(PropertySegment::key).collect(),
        )
    }
}

impl PartialEq for PersistentPropertyPath {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PersistentPropertyPath {}

impl fmt::Debug for PersistentPropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "{}", self.root.name())
        } else {
            write!(f, "{}.{}", self.root.name(), self.to_dot_path())
        }
    }
}
