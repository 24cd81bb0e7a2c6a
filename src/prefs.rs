//! Key/value preference store. The engine only persists `volume` here.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::error::PreferenceError;

pub const VOLUME_KEY: &str = "volume";

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), PreferenceError>;

    /// Numeric lookup accepting both TOML floats and integers.
    fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Float(f) => Some(f),
            Value::Integer(i) => Some(i as f64),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: HashMap<String, Value>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences kept in a TOML file under one namespace table, so several
/// players can share a file with different storage names.
#[derive(Debug)]
pub struct TomlPreferences {
    path: PathBuf,
    namespace: String,
    doc: Table,
}

impl TomlPreferences {
    /// Load `path` if it exists; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>, namespace: &str) -> Result<Self, PreferenceError> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str::<Table>(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Table::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            namespace: namespace.to_string(),
            doc,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn section(&self) -> Option<&Table> {
        self.doc.get(&self.namespace)?.as_table()
    }

    fn flush(&self) -> Result<(), PreferenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, toml::to_string(&self.doc)?)?;
        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}

impl PreferenceStore for TomlPreferences {
    fn get(&self, key: &str) -> Option<Value> {
        self.section()?.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), PreferenceError> {
        let section = self
            .doc
            .entry(self.namespace.clone())
            .or_insert_with(|| Value::Table(Table::new()));
        if !section.is_table() {
            *section = Value::Table(Table::new());
        }
        if let Value::Table(t) = section {
            t.insert(key.to_string(), value);
        }
        self.flush()
    }
}
