//! Static item template catalog.
//!
//! Templates are immutable and shared (`Arc`); instances reference them by id.
//! Content is data-driven: the catalog loads from a JSON seed file under
//! `data/seeds/` so admins can add items without recompiling.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::warn;

use super::errors::RealmError;
use super::types::ItemTemplate;

#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    templates: HashMap<u32, Arc<ItemTemplate>>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, returning the previous definition for that id.
    pub fn insert(&mut self, template: ItemTemplate) -> Option<Arc<ItemTemplate>> {
        self.templates.insert(template.id, Arc::new(template))
    }

    pub fn get(&self, id: u32) -> Option<Arc<ItemTemplate>> {
        self.templates.get(&id).cloned()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.templates.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Load templates from a JSON seed file (an array of [`ItemTemplate`]
    /// objects; restriction masks, elements and timers all default to their
    /// "unrestricted" values when omitted).
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, RealmError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let seeds: Vec<ItemTemplate> = serde_json::from_str(&contents)?;

        let mut catalog = Self::new();
        for template in seeds {
            let id = template.id;
            if catalog.insert(template).is_some() {
                warn!("duplicate item template {} in {}", id, path.display());
            }
        }
        Ok(catalog)
    }
}
