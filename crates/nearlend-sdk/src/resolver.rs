//! Account name -> address resolution

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nearlend_primitives::AccountId;
use serde::Serialize;

use crate::SdkError;

/// A named account record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRecord {
    /// Logical account name
    pub name: String,
    /// Network address
    pub address: AccountId,
}

/// Read-only lookup of account records by exact name
///
/// Addresses are validated when resolved: a record holding a malformed
/// address fails with [`SdkError::InvalidAddress`] instead of producing a
/// handle that would only fail on first use.
pub trait AddressResolver: Send + Sync {
    /// Resolve `name` to its address
    fn resolve(&self, name: &str) -> Result<AccountId, SdkError>;

    /// All records in the store, sorted by name
    fn records(&self) -> Result<Vec<AccountRecord>, SdkError>;
}

/// Account store backed by a directory holding one file per record
///
/// The file name is the record name and the content is the address.
/// Surrounding whitespace (the trailing newline written by provisioning
/// scripts) is ignored.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    dir: PathBuf,
}

impl FileRegistry {
    /// Create a registry over `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the records
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AddressResolver for FileRegistry {
    fn resolve(&self, name: &str) -> Result<AccountId, SdkError> {
        if !is_record_name(name) {
            return Err(SdkError::NotFound(name.to_string()));
        }

        // A missing store is unreadable, not a record miss
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(SdkError::Io {
                    path: self.dir.clone(),
                    source: io::Error::new(io::ErrorKind::Other, "not a directory"),
                })
            }
            Err(source) => {
                return Err(SdkError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        }

        let path = self.dir.join(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SdkError::NotFound(name.to_string()))
            }
            Err(source) => return Err(SdkError::Io { path, source }),
        };
        let content = String::from_utf8(bytes).map_err(|_| {
            SdkError::InvalidAddress(format!("record {} is not valid UTF-8", name))
        })?;

        let address = parse_record(name, &content)?;
        tracing::debug!("Resolved {} -> {}", name, address);
        Ok(address)
    }

    fn records(&self) -> Result<Vec<AccountRecord>, SdkError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| SdkError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SdkError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let name = match entry.file_name().into_string() {
                Ok(name) if is_file && is_record_name(&name) => name,
                _ => continue,
            };
            let address = self.resolve(&name)?;
            records.push(AccountRecord { name, address });
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}

/// In-process account store
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    records: HashMap<String, String>,
}

impl MemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record (the address is validated on resolve)
    pub fn insert(&mut self, name: impl Into<String>, address: impl Into<String>) {
        self.records.insert(name.into(), address.into());
    }

    /// Add a record with builder pattern
    pub fn with_record(mut self, name: impl Into<String>, address: impl Into<String>) -> Self {
        self.insert(name, address);
        self
    }
}

impl AddressResolver for MemoryRegistry {
    fn resolve(&self, name: &str) -> Result<AccountId, SdkError> {
        let content = self
            .records
            .get(name)
            .ok_or_else(|| SdkError::NotFound(name.to_string()))?;
        parse_record(name, content)
    }

    fn records(&self) -> Result<Vec<AccountRecord>, SdkError> {
        let mut records = self
            .records
            .iter()
            .map(|(name, content)| {
                Ok(AccountRecord {
                    name: name.clone(),
                    address: parse_record(name, content)?,
                })
            })
            .collect::<Result<Vec<_>, SdkError>>()?;
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}

/// A name that can only match a single file inside the registry directory
fn is_record_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn parse_record(name: &str, content: &str) -> Result<AccountId, SdkError> {
    let address = content.trim();
    if address.is_empty() {
        return Err(SdkError::InvalidAddress(format!("record {} is empty", name)));
    }
    AccountId::new(address)
        .map_err(|e| SdkError::InvalidAddress(format!("record {} ({:?}): {}", name, address, e)))
}
