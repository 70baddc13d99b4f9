//! Table layout configuration
//!
//! Describes which table, attribute names and secondary index the engines
//! address. Loadable from TOML:
//!
//! ```toml
//! table = "strata"
//! partition_key = "pk"
//! sort_key = "sk"
//! secondary_key = "sk2"
//! secondary_index = "lsi_sk2"
//! consistent_reads = true
//! increment_attempts = 3
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Table layout shared by every engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// Table name
    #[serde(default = "default_table")]
    pub table: String,
    /// Partition-key attribute (holds the collection key)
    #[serde(default = "default_partition_key")]
    pub partition_key: String,
    /// Sort-key attribute (holds the member name)
    #[serde(default = "default_sort_key")]
    pub sort_key: String,
    /// Secondary sort attribute (encoded score or cell id)
    #[serde(default = "default_secondary_key")]
    pub secondary_key: String,
    /// Name of the local secondary index over `secondary_key`
    #[serde(default = "default_secondary_index")]
    pub secondary_index: String,
    /// Use strongly consistent reads
    #[serde(default = "default_consistent_reads")]
    pub consistent_reads: bool,
    /// Total attempts for an optimistic increment before reporting contention
    #[serde(default = "default_increment_attempts")]
    pub increment_attempts: usize,
}

fn default_table() -> String {
    "strata".to_string()
}

fn default_partition_key() -> String {
    "pk".to_string()
}

fn default_sort_key() -> String {
    "sk".to_string()
}

fn default_secondary_key() -> String {
    "sk2".to_string()
}

fn default_secondary_index() -> String {
    "lsi_sk2".to_string()
}

fn default_consistent_reads() -> bool {
    true
}

fn default_increment_attempts() -> usize {
    3
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            partition_key: default_partition_key(),
            sort_key: default_sort_key(),
            secondary_key: default_secondary_key(),
            secondary_index: default_secondary_index(),
            consistent_reads: default_consistent_reads(),
            increment_attempts: default_increment_attempts(),
        }
    }
}

impl TableConfig {
    /// Default layout addressing a different table
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on malformed TOML, unknown fields or a layout
    /// that fails [`TableConfig::validate`].
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: TableConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check names are non-empty and distinct and attempts are at least one
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("table", &self.table),
            ("partition_key", &self.partition_key),
            ("sort_key", &self.sort_key),
            ("secondary_key", &self.secondary_key),
            ("secondary_index", &self.secondary_index),
        ];
        for (field, value) in names {
            if value.is_empty() {
                return Err(Error::Config(format!("'{}' must not be empty", field)));
            }
        }
        if self.partition_key == self.sort_key
            || self.partition_key == self.secondary_key
            || self.sort_key == self.secondary_key
        {
            return Err(Error::Config(
                "partition_key, sort_key and secondary_key must be distinct".to_string(),
            ));
        }
        if self.increment_attempts == 0 {
            return Err(Error::Config("'increment_attempts' must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Ordered collection table layout
#
# Table holding every collection
table = "strata"

# Attribute names: collection key, member name, encoded score / cell id
partition_key = "pk"
sort_key = "sk"
secondary_key = "sk2"

# Local secondary index over secondary_key
secondary_index = "lsi_sk2"

# Strongly consistent reads (default: true)
consistent_reads = true

# Attempts for an optimistic increment before reporting contention
increment_attempts = 3
"#
    }
}
