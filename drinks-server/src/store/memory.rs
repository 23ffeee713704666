use super::{DrinkStore, StoreError};
use crate::models::{Drink, DrinkPatch, NewDrink};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    drinks: BTreeMap<i64, Drink>,
    last_id: i64,
}

impl Inner {
    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.drinks
            .values()
            .any(|drink| drink.title == title && Some(drink.id) != except)
    }
}

/// Drinks kept in process memory
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrinkStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Drink>, StoreError> {
        Ok(self.inner.read().await.drinks.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Drink, StoreError> {
        self.inner
            .read()
            .await
            .drinks
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, drink: NewDrink) -> Result<Drink, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.title_taken(&drink.title, None) {
            return Err(StoreError::DuplicateTitle(drink.title));
        }

        inner.last_id += 1;
        let drink = Drink {
            id: inner.last_id,
            title: drink.title,
            recipe: drink.recipe,
        };
        inner.drinks.insert(drink.id, drink.clone());
        Ok(drink)
    }

    async fn update(&self, id: i64, patch: DrinkPatch) -> Result<Drink, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.drinks.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if let Some(title) = &patch.title {
            if inner.title_taken(title, Some(id)) {
                return Err(StoreError::DuplicateTitle(title.clone()));
            }
        }

        let drink = inner.drinks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(title) = patch.title {
            drink.title = title;
        }
        if let Some(recipe) = patch.recipe {
            drink.recipe = recipe;
        }
        Ok(drink.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .drinks
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn reset(&self) -> Result<(), StoreError> {
        *self.inner.write().await = Inner::default();
        Ok(())
    }

    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }
}
