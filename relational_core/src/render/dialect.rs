//! SQL dialects
//!
//! A dialect decides how identifiers are quoted, how bind parameters are
//! spelled and how row limits are expressed.

use super::bind_markers::{BindMarkers, MarkerStyle};
use crate::identifier::{IdentifierProcessing, LetterCasing, Quoting};
use config::DialectKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Postgres,
    MySql,
    SqlServer,
}

impl From<DialectKind> for Dialect {
    fn from(kind: DialectKind) -> Self {
        match kind {
            DialectKind::Postgres => Dialect::Postgres,
            DialectKind::Mysql => Dialect::MySql,
            DialectKind::Sqlserver => Dialect::SqlServer,
        }
    }
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::SqlServer => "sqlserver",
        }
    }

    pub fn identifier_processing(&self) -> IdentifierProcessing {
        match self {
            Dialect::Postgres => IdentifierProcessing::new(Quoting::ANSI, LetterCasing::LowerCase),
            Dialect::MySql => IdentifierProcessing::new(Quoting::BACKTICK, LetterCasing::AsIs),
            Dialect::SqlServer => IdentifierProcessing::new(Quoting::BRACKETS, LetterCasing::AsIs),
        }
    }

    /// Fresh marker generator for one statement
    pub fn bind_markers(&self) -> BindMarkers {
        BindMarkers::new(match self {
            Dialect::Postgres => MarkerStyle::Indexed {
                prefix: "$",
                base: 1,
            },
            Dialect::MySql => MarkerStyle::Anonymous("?"),
            Dialect::SqlServer => MarkerStyle::Indexed {
                prefix: "@P",
                base: 0,
            },
        })
    }

    /// Row limiting clause; `None` when neither limit nor offset apply
    pub fn limit_clause(&self, limit: Option<u64>, offset: u64) -> Option<String> {
        match (self, limit, offset) {
            (_, None, 0) => None,

            (Dialect::Postgres, Some(limit), 0) => Some(format!("LIMIT {}", limit)),
            (Dialect::Postgres, Some(limit), offset) => {
                Some(format!("LIMIT {} OFFSET {}", limit, offset))
            }
            (Dialect::Postgres, None, offset) => Some(format!("OFFSET {}", offset)),

            (Dialect::MySql, Some(limit), 0) => Some(format!("LIMIT {}", limit)),
            (Dialect::MySql, Some(limit), offset) => Some(format!("LIMIT {}, {}", offset, limit)),
            // MySQL has no OFFSET without LIMIT
            (Dialect::MySql, None, offset) => Some(format!("LIMIT {}, {}", offset, u64::MAX)),

            (Dialect::SqlServer, Some(limit), offset) => Some(format!(
                "OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                offset, limit
            )),
            (Dialect::SqlServer, None, offset) => Some(format!("OFFSET {} ROWS", offset)),
        }
    }

    /// `NULLS FIRST` / `NULLS LAST` in ORDER BY
    pub fn supports_null_ordering(&self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// OFFSET/FETCH is only valid after an ORDER BY
    pub fn requires_order_for_paging(&self) -> bool {
        matches!(self, Dialect::SqlServer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_limit_clause() {
        let dialect = Dialect::Postgres;
        assert_eq!(dialect.limit_clause(None, 0), None);
        assert_eq!(dialect.limit_clause(Some(2), 0).as_deref(), Some("LIMIT 2"));
        assert_eq!(
            dialect.limit_clause(Some(2), 4).as_deref(),
            Some("LIMIT 2 OFFSET 4")
        );
        assert_eq!(dialect.limit_clause(None, 4).as_deref(), Some("OFFSET 4"));
    }

    #[test]
    fn test_mysql_limit_clause() {
        let dialect = Dialect::MySql;
        assert_eq!(dialect.limit_clause(Some(2), 0).as_deref(), Some("LIMIT 2"));
        assert_eq!(dialect.limit_clause(Some(2), 4).as_deref(), Some("LIMIT 4, 2"));
    }

    #[test]
    fn test_sqlserver_limit_clause() {
        let dialect = Dialect::SqlServer;
        assert_eq!(
            dialect.limit_clause(Some(2), 4).as_deref(),
            Some("OFFSET 4 ROWS FETCH NEXT 2 ROWS ONLY")
        );
        assert_eq!(dialect.limit_clause(None, 4).as_deref(), Some("OFFSET 4 ROWS"));
        assert!(dialect.requires_order_for_paging());
    }

    #[test]
    fn test_from_config_kind() {
        assert_eq!(Dialect::from(DialectKind::Postgres), Dialect::Postgres);
        assert_eq!(Dialect::from(DialectKind::Mysql), Dialect::MySql);
        assert_eq!(Dialect::from(DialectKind::Sqlserver), Dialect::SqlServer);
    }

    #[test]
    fn test_bind_marker_styles() {
        assert_eq!(Dialect::Postgres.bind_markers().next().placeholder(), "$1");
        assert_eq!(Dialect::MySql.bind_markers().next().placeholder(), "?");
        assert_eq!(Dialect::SqlServer.bind_markers().next().placeholder(), "@P0");
    }
}
