//! Dialect constants (C1).
//!
//! Only [`Dialect::Postgres`] is fully specified; the others exist so the
//! placeholder logic has somewhere to live without baking Postgres-only
//! assumptions into the [`crate::builder::Builder`].

/// Target SQL dialect. Governs placeholder syntax only; every other
/// rendering rule in this crate is PostgreSQL-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    Sqlite,
    MySQL,
    #[default]
    Postgres,
}

impl Dialect {
    /// Render the placeholder for the `n`th argument (1-based ordinal).
    #[must_use]
    pub fn placeholder(self, n: usize) -> String {
        match self {
            Self::Postgres => format!("${n}"),
            Self::Sqlite | Self::MySQL => "?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_placeholder_is_positional() {
        assert_eq!(Dialect::Postgres.placeholder(3), "$3");
    }

    #[test]
    fn other_dialects_use_bare_question_mark() {
        assert_eq!(Dialect::Sqlite.placeholder(3), "?");
        assert_eq!(Dialect::MySQL.placeholder(1), "?");
    }
}
