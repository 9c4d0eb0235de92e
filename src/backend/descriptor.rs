//! Table and column family descriptors

use crate::errors::{ClientError, ClientResult};

/// Declared column family with its version retention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFamilyDescriptor {
    name: String,
    max_versions: usize,
}

impl ColumnFamilyDescriptor {
    /// Family keeping one version per column
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_versions: 1,
        }
    }

    pub fn with_max_versions(mut self, max_versions: usize) -> Self {
        self.max_versions = max_versions;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn max_versions(&self) -> usize {
        self.max_versions
    }
}

/// Table name plus its declared families
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    name: String,
    families: Vec<ColumnFamilyDescriptor>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            families: Vec::new(),
        }
    }

    pub fn with_family(mut self, family: ColumnFamilyDescriptor) -> Self {
        self.families.push(family);
        self
    }

    /// Adds several families with the same retention
    pub fn with_families<I, S>(mut self, names: I, max_versions: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.families.extend(
            names
                .into_iter()
                .map(|n| ColumnFamilyDescriptor::new(n).with_max_versions(max_versions)),
        );
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn families(&self) -> &[ColumnFamilyDescriptor] {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&ColumnFamilyDescriptor> {
        self.families.iter().find(|f| f.name == name)
    }

    pub fn has_family(&self, name: &str) -> bool {
        self.family(name).is_some()
    }

    /// Rejects empty names, zero retention, duplicate families, and
    /// tables without families
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.is_empty() {
            return Err(ClientError::invalid_argument("table name must not be empty"));
        }
        if self.families.is_empty() {
            return Err(ClientError::invalid_argument(format!(
                "table '{}' declares no column families",
                self.name
            )));
        }
        for (i, family) in self.families.iter().enumerate() {
            if family.name.is_empty() {
                return Err(ClientError::invalid_argument(
                    "column family name must not be empty",
                ));
            }
            if family.max_versions == 0 {
                return Err(ClientError::invalid_argument(format!(
                    "column family '{}' must keep at least one version",
                    family.name
                )));
            }
            if self.families[..i].iter().any(|f| f.name == family.name) {
                return Err(ClientError::invalid_argument(format!(
                    "column family '{}' declared twice",
                    family.name
                )));
            }
        }
        Ok(())
    }
}
