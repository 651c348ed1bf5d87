//! CLI arguments and the optional TOML overrides file, mirroring the
//! teacher's `clap::Parser` + `serde` configuration pattern.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::{CodegenError, Result};

#[derive(Parser, Debug)]
#[command(name = "pgoq-codegen")]
#[command(author, version, about = "Generate pgoq-core table descriptors from a live PostgreSQL catalog")]
pub struct Args {
    /// PostgreSQL connection string.
    #[arg(short, long, env = "DATABASE_URL")]
    pub database: String,

    /// Directory generated `.rs` files are written to.
    #[arg(short, long, default_value = "generated")]
    pub output_dir: PathBuf,

    /// Optional TOML file of per-(table, column) type overrides.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Per-(table, column) type overrides, keyed `"table.column"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Overrides {
    #[serde(default)]
    pub column_types: HashMap<String, String>,
}

impl Overrides {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CodegenError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| CodegenError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    #[must_use]
    pub fn type_for(&self, table: &str, column: &str) -> Option<&str> {
        self.column_types.get(&format!("{table}.{column}")).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_lookup_is_keyed_by_table_dot_column() {
        let mut column_types = HashMap::new();
        column_types.insert("users.role".to_string(), "Role".to_string());
        let overrides = Overrides { column_types };
        assert_eq!(overrides.type_for("users", "role"), Some("Role"));
        assert_eq!(overrides.type_for("users", "name"), None);
    }
}
