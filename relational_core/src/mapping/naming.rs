//! Derivation of table and column names

use crate::identifier::SqlIdentifier;
use config::MappingConfig;
use convert_case::{Case, Casing};

/// Naming rules for entities whose names are not given explicitly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingStrategy {
    force_quote: bool,
}

impl NamingStrategy {
    pub fn new(force_quote: bool) -> Self {
        Self { force_quote }
    }

    pub fn from_config(config: &MappingConfig) -> Self {
        Self::new(config.force_quote)
    }

    pub fn is_force_quote(&self) -> bool {
        self.force_quote
    }

    /// `DummyEntity` → `dummy_entity`
    pub fn table_name(&self, entity_name: &str) -> String {
        entity_name.to_case(Case::Snake)
    }

    /// `createdAt` / `created_at` → `created_at`
    pub fn column_name(&self, property_name: &str) -> String {
        property_name.to_case(Case::Snake)
    }

    /// Wrap a derived or configured name, quoting it when forced
    pub fn identifier(&self, name: impl Into<String>) -> SqlIdentifier {
        if self.force_quote {
            SqlIdentifier::quoted(name)
        } else {
            SqlIdentifier::unquoted(name)
        }
    }

    /// Default back-reference column: the referenced table's name
    pub fn reverse_column_name(&self, parent_table: &SqlIdentifier) -> SqlIdentifier {
        self.identifier(parent_table.name())
    }

    /// Default map/list key column: the reverse column with a `_key` suffix
    pub fn key_column_name(&self, reverse_column: &SqlIdentifier) -> SqlIdentifier {
        reverse_column.transform(|name| format!("{}_key", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_names() {
        let naming = NamingStrategy::default();
        assert_eq!(naming.table_name("DummyEntity"), "dummy_entity");
        assert_eq!(naming.table_name("WithId"), "with_id");
        assert_eq!(naming.column_name("createdAt"), "created_at");
        assert_eq!(naming.column_name("name"), "name");
    }

    #[test]
    fn test_force_quote() {
        assert!(NamingStrategy::new(true).identifier("a").is_quoted());
        assert!(!NamingStrategy::new(false).identifier("a").is_quoted());
        assert!(NamingStrategy::from_config(&MappingConfig::new(true)).is_force_quote());
    }

    #[test]
    fn test_key_column_derived_from_reverse_column() {
        let naming = NamingStrategy::default();
        let reverse = naming.reverse_column_name(&SqlIdentifier::unquoted("dummy_entity"));
        assert_eq!(reverse, SqlIdentifier::unquoted("dummy_entity"));
        assert_eq!(
            naming.key_column_name(&reverse),
            SqlIdentifier::unquoted("dummy_entity_key")
        );
    }
}
