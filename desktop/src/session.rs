use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Error;

const KEYRING_SERVICE: &str = "siesta";

/// Per-account token persistence. Tokens are opaque strings, overwritten in
/// place; no expiry metadata is kept, so staleness is only ever discovered
/// by a rejected call.
pub trait SessionStore: Send + Sync {
    fn get_access(&self, email: &str) -> Result<Option<String>, Error>;
    fn set_access(&self, email: &str, token: &str) -> Result<(), Error>;
    fn get_refresh(&self, email: &str) -> Result<Option<String>, Error>;
    fn set_refresh(&self, email: &str, token: &str) -> Result<(), Error>;
    fn clear(&self, email: &str) -> Result<(), Error>;
}

/// OS keychain entries `{email}:access` and `{email}:refresh` under the
/// `siesta` service.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.into(),
        }
    }

    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let entry = keyring::Entry::new(&self.service, key)
            .map_err(|e| Error::Store(e.to_string()))?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Error::Store(e.to_string())),
        }
    }

    fn set(&self, key: &str, token: &str) -> Result<(), Error> {
        keyring::Entry::new(&self.service, key)
            .and_then(|entry| entry.set_password(token))
            .map_err(|e| Error::Store(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), Error> {
        let entry = keyring::Entry::new(&self.service, key)
            .map_err(|e| Error::Store(e.to_string()))?;
        match entry.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Error::Store(e.to_string())),
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for KeyringStore {
    fn get_access(&self, email: &str) -> Result<Option<String>, Error> {
        self.get(&format!("{email}:access"))
    }

    fn set_access(&self, email: &str, token: &str) -> Result<(), Error> {
        self.set(&format!("{email}:access"), token)
    }

    fn get_refresh(&self, email: &str) -> Result<Option<String>, Error> {
        self.get(&format!("{email}:refresh"))
    }

    fn set_refresh(&self, email: &str, token: &str) -> Result<(), Error> {
        self.set(&format!("{email}:refresh"), token)
    }

    fn clear(&self, email: &str) -> Result<(), Error> {
        self.delete(&format!("{email}:access"))?;
        self.delete(&format!("{email}:refresh"))
    }
}

/// In-memory store for tests and environments without a keychain.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, Error> {
        self.entries
            .lock()
            .map_err(|_| Error::Store("session store mutex poisoned".into()))
    }
}

impl SessionStore for MemoryStore {
    fn get_access(&self, email: &str) -> Result<Option<String>, Error> {
        Ok(self.lock()?.get(&format!("{email}:access")).cloned())
    }

    fn set_access(&self, email: &str, token: &str) -> Result<(), Error> {
        self.lock()?.insert(format!("{email}:access"), token.into());
        Ok(())
    }

    fn get_refresh(&self, email: &str) -> Result<Option<String>, Error> {
        Ok(self.lock()?.get(&format!("{email}:refresh")).cloned())
    }

    fn set_refresh(&self, email: &str, token: &str) -> Result<(), Error> {
        self.lock()?.insert(format!("{email}:refresh"), token.into());
        Ok(())
    }

    fn clear(&self, email: &str) -> Result<(), Error> {
        let mut entries = self.lock()?;
        entries.remove(&format!("{email}:access"));
        entries.remove(&format!("{email}:refresh"));
        Ok(())
    }
}
