// store.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, create_dir_all, write};
use std::path::Path;

use crate::actor::{Actor, ActorId, Owner};
use crate::error::StoreError;
use crate::item::{Item, ItemId};

// On-disk layout: plain lists, ids live inside each record.
#[derive(Serialize, Deserialize, Default, Debug)]
struct StoreFile {
    #[serde(default)]
    actors: Vec<Actor>,
    #[serde(default)]
    items: Vec<Item>,
}

/// Owns every actor and item record. Sheets hold ids, never records, and go
/// through these methods for every read and write.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    actors: BTreeMap<ActorId, Actor>,
    items: BTreeMap<ItemId, Item>,
    dirty: bool,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A missing file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No store at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let file = File::open(path)?;
        let store_file: StoreFile = serde_json::from_reader(file)?;
        let store = Self::from_file(store_file);
        log::info!(
            "Loaded {} actors and {} items from {}",
            store.actors.len(),
            store.items.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(Self::from_file(serde_json::from_str(json)?))
    }

    fn from_file(store_file: StoreFile) -> Self {
        let mut store = Self::new();
        for actor in store_file.actors {
            store.actors.insert(actor.id, actor);
        }
        for item in store_file.items {
            store.items.insert(item.id, item);
        }
        store
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        let store_file = StoreFile {
            actors: self.actors.values().cloned().collect(),
            items: self.items.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&store_file)?)
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        write(path, self.to_json()?)?;
        self.dirty = false;
        log::debug!("Saved store to {}", path.display());
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn insert_actor(&mut self, actor: Actor) -> ActorId {
        let id = actor.id;
        self.actors.insert(id, actor);
        self.dirty = true;
        id
    }

    pub fn insert_item(&mut self, item: Item) -> ItemId {
        let id = item.id;
        self.items.insert(id, item);
        self.dirty = true;
        id
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<Item, StoreError> {
        let item = self.items.remove(&id).ok_or(StoreError::ItemNotFound(id))?;
        self.dirty = true;
        Ok(item)
    }

    pub fn item(&self, id: ItemId) -> Result<&Item, StoreError> {
        self.items.get(&id).ok_or(StoreError::ItemNotFound(id))
    }

    pub fn actor(&self, id: ActorId) -> Result<&Actor, StoreError> {
        self.actors.get(&id).ok_or(StoreError::ActorNotFound(id))
    }

    pub fn owned_items(&self, actor: ActorId) -> Vec<&Item> {
        self.items
            .values()
            .filter(|item| item.owner == Some(actor))
            .collect()
    }

    // The owning actor of an item, with everything it owns. None for unowned items.
    pub fn owner_of(&self, id: ItemId) -> Result<Option<Owner<'_>>, StoreError> {
        let item = self.item(id)?;
        let Some(actor_id) = item.owner else {
            return Ok(None);
        };
        let actor = self
            .actors
            .get(&actor_id)
            .ok_or(StoreError::DanglingOwner {
                item: id,
                actor: actor_id,
            })?;
        Ok(Some(Owner::new(actor, self.owned_items(actor_id))))
    }

    /// Apply `f` to the live record and mark the store dirty.
    pub fn update_item<R>(
        &mut self,
        id: ItemId,
        f: impl FnOnce(&mut Item) -> R,
    ) -> Result<R, StoreError> {
        let item = self.items.get_mut(&id).ok_or(StoreError::ItemNotFound(id))?;
        let result = f(item);
        self.dirty = true;
        Ok(result)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    // Item ids ordered by owner name (unowned first), then item name.
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by(|a, b| {
            let owner_name = |item: &Item| {
                item.owner
                    .and_then(|id| self.actors.get(&id))
                    .map(|actor| actor.name.clone())
            };
            owner_name(a)
                .cmp(&owner_name(b))
                .then_with(|| a.name.cmp(&b.name))
        });
        items.into_iter().map(|item| item.id).collect()
    }
}
