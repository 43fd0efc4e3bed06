use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::FridgeError;
use crate::store::{Document, KeyValueStore};

pub const FRIDGE_COLLECTION: &str = "fridge";
const PRESENCE_MARKER: &str = "1";

/// Separates names in the recipe query, so it can never appear inside one.
pub const INGREDIENT_SEPARATOR: char = ',';

/// Ingredient name, trimmed and lower-cased so that "Milk" and "milk" are one entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Ingredient(String);

impl Ingredient {
    /// Returns `None` for blank names and names containing [`INGREDIENT_SEPARATOR`].
    pub fn new(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() || normalized.contains(INGREDIENT_SEPARATOR) {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fridge {
    ingredients: BTreeSet<Ingredient>,
}

impl Fridge {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ingredients: names
                .into_iter()
                .filter_map(|name| Ingredient::new(name.as_ref()))
                .collect(),
        }
    }

    /// Returns false if the ingredient was already present.
    pub fn insert(&mut self, ingredient: Ingredient) -> bool {
        self.ingredients.insert(ingredient)
    }

    /// Returns false if the ingredient was not present.
    pub fn remove(&mut self, ingredient: &Ingredient) -> bool {
        self.ingredients.remove(ingredient)
    }

    pub fn contains(&self, ingredient: &Ingredient) -> bool {
        self.ingredients.contains(ingredient)
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Ingredients in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter()
    }

    fn from_document(document: &Document) -> Self {
        Self::from_names(document.keys())
    }

    fn to_document(&self) -> Document {
        self.ingredients
            .iter()
            .map(|ingredient| (ingredient.as_str().to_string(), PRESENCE_MARKER.to_string()))
            .collect()
    }
}

/// Reads and writes user fridges on top of a [`KeyValueStore`].
///
/// `add` and `remove` are read-modify-write sequences. They are serialized
/// per user id so concurrent writers in this process cannot drop each
/// other's updates. Writers in other processes sharing the same store are
/// still last-write-wins.
pub struct FridgeStore<S> {
    store: S,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: KeyValueStore> FridgeStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// A user with no stored record has an empty fridge.
    pub async fn get(&self, user_id: &str) -> Result<Fridge, FridgeError> {
        let document = self.store.retrieve(FRIDGE_COLLECTION, user_id).await?;
        let fridge = document
            .map(|document| Fridge::from_document(&document))
            .unwrap_or_default();
        debug!(user_id, ingredients = fridge.len(), "Loaded fridge");
        Ok(fridge)
    }

    pub async fn add(&self, user_id: &str, ingredient: &Ingredient) -> Result<(), FridgeError> {
        self.update(user_id, |fridge| {
            if !fridge.insert(ingredient.clone()) {
                debug!(user_id, %ingredient, "Ingredient already in fridge");
            }
        })
        .await
    }

    /// Removing an absent ingredient is not an error; the fridge is still written back.
    pub async fn remove(&self, user_id: &str, ingredient: &Ingredient) -> Result<(), FridgeError> {
        self.update(user_id, |fridge| {
            if !fridge.remove(ingredient) {
                debug!(user_id, %ingredient, "Ingredient was not in fridge");
            }
        })
        .await
    }

    /// Read-modify-write under the user's lock.
    async fn update(&self, user_id: &str, change: impl FnOnce(&mut Fridge)) -> Result<(), FridgeError> {
        let lock = self.user_lock(user_id).await;
        let result = {
            let _guard = lock.lock().await;
            match self.get(user_id).await {
                Ok(mut fridge) => {
                    change(&mut fridge);
                    self.persist(user_id, &fridge).await
                }
                Err(e) => Err(e),
            }
        };
        self.release_user_lock(user_id, lock).await;
        result
    }

    async fn persist(&self, user_id: &str, fridge: &Fridge) -> Result<(), FridgeError> {
        self.store
            .upsert(FRIDGE_COLLECTION, user_id, fridge.to_document())
            .await?;
        debug!(user_id, ingredients = fridge.len(), "Saved fridge");
        Ok(())
    }

    async fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().await;
        locks.entry(user_id.to_string()).or_default().clone()
    }

    async fn release_user_lock(&self, user_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.write_locks.lock().await;
        // One reference is ours and one is the table's; any other is a waiting writer.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(user_id);
        }
    }
}
