use std::collections::HashMap;

use crate::config::StorageConfig;
use crate::storage::{SessionStore, StorageError};

/// In-memory session store с опциональным лимитом в байтах (ключи + значения).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            quota_bytes: config.quota_bytes,
            ..Self::default()
        }
    }

    /// Хранилище, которое отказывает на любую операцию (приватный режим браузера)
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Unavailable("session storage is disabled".to_string()));
        }
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.check_available()?;

        if let Some(quota) = self.quota_bytes {
            let previous = self.entries.get(key).map_or(0, |v| key.len() + v.len());
            let needed = self.used_bytes() - previous + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut store = MemoryStore::new();
        store.set("k", "one".to_string()).unwrap();
        store.set("k", "two".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn quota_counts_replaced_value_once() {
        let mut store = MemoryStore::with_quota(10);
        store.set("key", "1234567".to_string()).unwrap();
        // перезапись того же ключа не должна считать старое значение
        store.set("key", "7654321".to_string()).unwrap();

        let err = store.set("key", "12345678".to_string()).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 11, quota: 10 }));
        assert_eq!(store.get("key").unwrap().as_deref(), Some("7654321"));
    }

    #[test]
    fn disabled_store_refuses_everything() {
        let mut store = MemoryStore::disabled();
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable(_))));
        assert!(store.set("k", "v".to_string()).is_err());
        assert!(store.remove("k").is_err());
    }
}
