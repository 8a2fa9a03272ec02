use std::collections::HashMap;

use parking_lot::Mutex;
use session_sdk::{StorageError, TokenPersistence};

/// Process-local persistence for tests and development.
#[derive(Debug, Default)]
pub struct MemoryTokenPersistence {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenPersistence for MemoryTokenPersistence {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
