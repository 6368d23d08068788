use std::{collections::BTreeMap, sync::RwLock};

use serde_json::Value;

use crate::storage::{KeyValueStore, Namespace};
use crate::CoreError;

type Partitions = BTreeMap<Namespace, BTreeMap<String, Value>>;

/// In-process store. Nothing survives the process; used for tests and
/// throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: RwLock<Partitions>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespaces that currently hold at least one entry.
    pub fn namespaces(&self) -> Result<Vec<Namespace>, CoreError> {
        let guard = self.read()?;
        Ok(guard
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(namespace, _)| namespace.clone())
            .collect())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Partitions>, CoreError> {
        self.partitions
            .read()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Partitions>, CoreError> {
        self.partitions
            .write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &Namespace, key: &str) -> Result<Option<Value>, CoreError> {
        let guard = self.read()?;
        Ok(guard
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn put(&self, namespace: &Namespace, key: &str, value: Value) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        guard
            .entry(namespace.clone())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, namespace: &Namespace, key: &str) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        if let Some(entries) = guard.get_mut(namespace) {
            entries.remove(key);
        }
        Ok(())
    }

    fn entries(&self, namespace: &Namespace) -> Result<BTreeMap<String, Value>, CoreError> {
        let guard = self.read()?;
        Ok(guard.get(namespace).cloned().unwrap_or_default())
    }

    fn clear(&self, namespace: &Namespace) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        guard.remove(namespace);
        Ok(())
    }

    fn replace_all(
        &self,
        namespace: &Namespace,
        entries: BTreeMap<String, Value>,
    ) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        guard.insert(namespace.clone(), entries);
        Ok(())
    }
}
