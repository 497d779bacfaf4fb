//! Menu name resolution
//!
//! Orders only carry menu ids. The resolver looks names up once per view
//! and caches them; ids the menu service does not know display as
//! [`UNKNOWN_ITEM`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;
use shared::{MenuDraft, MenuEntry, MenuId, Order};
use tracing::{debug, warn};

use crate::error::{DeskError, DeskResult};
use crate::gateway::MenuGateway;

/// Display name for menu ids that cannot be resolved
pub const UNKNOWN_ITEM: &str = "Unknown item";

pub struct MenuNameResolver {
    gateway: Arc<dyn MenuGateway>,
    cache: RwLock<HashMap<MenuId, String>>,
}

impl MenuNameResolver {
    pub fn new(gateway: Arc<dyn MenuGateway>) -> Self {
        Self {
            gateway,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve every menu id referenced by `orders`.
    ///
    /// Uncached ids are fetched concurrently. Never fails: unresolved ids
    /// map to the placeholder, and only definite misses are cached.
    pub async fn resolve_orders(&self, orders: &[Order]) -> HashMap<MenuId, String> {
        let wanted: HashSet<&str> = orders
            .iter()
            .flat_map(|o| o.items.iter().map(|item| item.menu_id.as_str()))
            .collect();
        self.resolve_ids(wanted).await
    }

    /// Resolve a single menu id
    pub async fn resolve(&self, menu_id: &str) -> String {
        let mut names = self.resolve_ids(HashSet::from([menu_id])).await;
        names
            .remove(menu_id)
            .unwrap_or_else(|| UNKNOWN_ITEM.to_string())
    }

    async fn resolve_ids(&self, wanted: HashSet<&str>) -> HashMap<MenuId, String> {
        let missing: Vec<&str> = {
            let cache = self.cache.read();
            wanted
                .iter()
                .copied()
                .filter(|id| !cache.contains_key(*id))
                .collect()
        };

        let mut uncached = HashMap::new();
        if !missing.is_empty() {
            debug!(count = missing.len(), "Resolving menu names");
            let lookups = missing.iter().map(|id| self.gateway.get_menu_entry(id));
            let results = join_all(lookups).await;

            let mut cache = self.cache.write();
            for (id, result) in missing.into_iter().zip(results) {
                match result {
                    Ok(entry) => {
                        cache.insert(id.to_string(), entry.name);
                    }
                    Err(DeskError::NotFound(_)) => {
                        cache.insert(id.to_string(), UNKNOWN_ITEM.to_string());
                    }
                    Err(e) => {
                        warn!(menu_id = id, error = %e, "Menu lookup failed");
                        uncached.insert(id.to_string(), UNKNOWN_ITEM.to_string());
                    }
                }
            }
        }

        let cache = self.cache.read();
        wanted
            .into_iter()
            .map(|id| {
                let name = cache
                    .get(id)
                    .or_else(|| uncached.get(id))
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_ITEM.to_string());
                (id.to_string(), name)
            })
            .collect()
    }

    /// Cached name or the placeholder, without any lookup
    pub fn display_name(&self, menu_id: &str) -> String {
        self.cache
            .read()
            .get(menu_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_ITEM.to_string())
    }

    /// Seed the cache from a full menu listing
    pub fn prime(&self, entries: &[MenuEntry]) {
        let mut cache = self.cache.write();
        for entry in entries {
            cache.insert(entry.menu_id.clone(), entry.name.clone());
        }
    }

    /// Load a restaurant's whole menu into the cache
    pub async fn prime_restaurant(&self, restaurant_id: &str) -> DeskResult<usize> {
        let entries = self.gateway.list_menus_by_restaurant(restaurant_id).await?;
        self.prime(&entries);
        Ok(entries.len())
    }

    /// Change an entry's availability
    pub async fn set_available(&self, menu_id: &str, available: bool) -> DeskResult<MenuEntry> {
        let entry = self
            .gateway
            .update_menu_availability(menu_id, available)
            .await?;
        self.cache
            .write()
            .insert(entry.menu_id.clone(), entry.name.clone());
        Ok(entry)
    }

    /// Add an entry to the menu; `restaurant_id` overrides the draft's
    pub async fn create(&self, restaurant_id: &str, draft: &MenuDraft) -> DeskResult<MenuEntry> {
        let draft = draft.clone().for_restaurant(restaurant_id);
        let entry = self.gateway.create_menu_entry(&draft).await?;
        debug!(menu_id = %entry.menu_id, "Menu entry created");
        self.cache
            .write()
            .insert(entry.menu_id.clone(), entry.name.clone());
        Ok(entry)
    }

    pub async fn update(&self, menu_id: &str, draft: &MenuDraft) -> DeskResult<MenuEntry> {
        let entry = self.gateway.update_menu_entry(menu_id, draft).await?;
        let mut cache = self.cache.write();
        if entry.menu_id != menu_id {
            cache.remove(menu_id);
        }
        cache.insert(entry.menu_id.clone(), entry.name.clone());
        Ok(entry)
    }

    /// Remove an entry. Orders still referencing it show the placeholder.
    pub async fn delete(&self, menu_id: &str) -> DeskResult<()> {
        self.gateway.delete_menu_entry(menu_id).await?;
        self.cache
            .write()
            .insert(menu_id.to_string(), UNKNOWN_ITEM.to_string());
        Ok(())
    }

    /// Drop every cached name
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }
}
