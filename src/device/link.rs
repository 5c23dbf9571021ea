use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One device registration: the pin shown on the device maps it to its
/// stable guid and current network address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceLink {
    pub guid: String,
    pub pin: u32,
    pub ip: String,
    pub port: u16,
}

#[derive(Debug, Error)]
pub enum LinkStoreError {
    #[error("link store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value persistence for device links. Writes are keyed by guid; pin
/// lookup scans for the first record carrying the pin.
pub trait LinkStore {
    fn put(
        &self,
        link: DeviceLink,
    ) -> impl std::future::Future<Output = Result<(), LinkStoreError>> + Send;

    fn get(
        &self,
        guid: &str,
    ) -> impl std::future::Future<Output = Result<Option<DeviceLink>, LinkStoreError>> + Send;

    fn find_by_pin(
        &self,
        pin: u32,
    ) -> impl std::future::Future<Output = Result<Option<DeviceLink>, LinkStoreError>> + Send;
}

/// In-process store used by tests and local development.
#[derive(Debug, Clone, Default)]
pub struct MemoryLinkStore {
    // Insertion order preserved so pin scans return the first match.
    inner: Arc<Mutex<InnerStore>>,
}

#[derive(Debug, Default)]
struct InnerStore {
    order: Vec<String>,
    by_guid: HashMap<String, DeviceLink>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InnerStore>, LinkStoreError> {
        self.inner
            .lock()
            .map_err(|_| LinkStoreError::Unavailable("link store lock poisoned".into()))
    }
}

impl LinkStore for MemoryLinkStore {
    async fn put(&self, link: DeviceLink) -> Result<(), LinkStoreError> {
        let mut store = self.lock()?;
        if !store.by_guid.contains_key(&link.guid) {
            store.order.push(link.guid.clone());
        }
        store.by_guid.insert(link.guid.clone(), link);
        Ok(())
    }

    async fn get(&self, guid: &str) -> Result<Option<DeviceLink>, LinkStoreError> {
        Ok(self.lock()?.by_guid.get(guid).cloned())
    }

    async fn find_by_pin(&self, pin: u32) -> Result<Option<DeviceLink>, LinkStoreError> {
        let store = self.lock()?;
        for guid in &store.order {
            if let Some(link) = store.by_guid.get(guid) {
                if link.pin == pin {
                    return Ok(Some(link.clone()));
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(guid: &str, pin: u32) -> DeviceLink {
        DeviceLink {
            guid: guid.to_string(),
            pin,
            ip: "192.168.1.20".to_string(),
            port: 8080,
        }
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryLinkStore::new();
        store.put(link("abc", 1234)).await.unwrap();

        let found = store.get("abc").await.unwrap().unwrap();
        assert_eq!(found.pin, 1234);
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn pin_scan_returns_first_match() {
        let store = MemoryLinkStore::new();
        store.put(link("first", 1234)).await.unwrap();
        store.put(link("second", 1234)).await.unwrap();

        let found = store.find_by_pin(1234).await.unwrap().unwrap();
        assert_eq!(found.guid, "first");
        assert!(store.find_by_pin(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rewriting_a_guid_updates_the_address() {
        let store = MemoryLinkStore::new();
        store.put(link("abc", 1234)).await.unwrap();

        let mut updated = link("abc", 1234);
        updated.ip = "10.0.0.9".to_string();
        store.put(updated).await.unwrap();

        let found = store.get("abc").await.unwrap().unwrap();
        assert_eq!(found.ip, "10.0.0.9");
    }
}
