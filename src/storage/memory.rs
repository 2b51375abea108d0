use crate::error::app_error::AppError;
use crate::storage::SessionStore;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory store: the test substitute, also used for ephemeral CLI runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries().remove(key);
        Ok(())
    }

    fn set_many(&self, new_entries: &[(&str, String)]) -> Result<(), AppError> {
        let mut entries = self.entries();
        for (key, value) in new_entries {
            entries.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}
