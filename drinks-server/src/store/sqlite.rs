use super::{DrinkStore, StoreError};
use crate::models::{Drink, DrinkPatch, NewDrink, Recipe};
use async_trait::async_trait;
use log::debug;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

const CREATE_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS drinks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    recipe TEXT NOT NULL
);"#;

#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: String,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = StoreError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe = Recipe::from_stored(&row.recipe).map_err(|e| StoreError::CorruptRecipe {
            id: row.id,
            reason: e.to_string(),
        })?;
        Ok(Drink {
            id: row.id,
            title: row.title,
            recipe,
        })
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and make sure the table exists
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // An in-memory database disappears with its last connection, so pin
        // the pool to a single connection that never expires.
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        debug!("Connecting to SQLite store at {url}");
        let pool = pool_options.connect_with(options).await?;
        sqlx::query(CREATE_TABLE).execute(&pool).await?;

        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }
}

fn map_unique_violation(error: sqlx::Error, title: &str) -> StoreError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateTitle(title.to_string())
        }
        _ => StoreError::Database(error),
    }
}

#[async_trait]
impl DrinkStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Drink>, StoreError> {
        let rows = sqlx::query_as::<_, DrinkRow>(
            r#"SELECT id, title, recipe FROM drinks ORDER BY id ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Drink::try_from).collect()
    }

    async fn get(&self, id: i64) -> Result<Drink, StoreError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"SELECT id, title, recipe FROM drinks WHERE id = ?1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?;
        Drink::try_from(row)
    }

    async fn create(&self, drink: NewDrink) -> Result<Drink, StoreError> {
        let recipe = drink.recipe.to_stored()?;
        let result = sqlx::query(r#"INSERT INTO drinks (title, recipe) VALUES (?1, ?2)"#)
            .bind(&drink.title)
            .bind(&recipe)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &drink.title))?;

        Ok(Drink {
            id: result.last_insert_rowid(),
            title: drink.title,
            recipe: drink.recipe,
        })
    }

    async fn update(&self, id: i64, patch: DrinkPatch) -> Result<Drink, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, DrinkRow>(
            r#"SELECT id, title, recipe FROM drinks WHERE id = ?1"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound(id))?;
        let current = Drink::try_from(row)?;

        let updated = Drink {
            id,
            title: patch.title.unwrap_or(current.title),
            recipe: patch.recipe.unwrap_or(current.recipe),
        };
        let recipe = updated.recipe.to_stored()?;

        sqlx::query(r#"UPDATE drinks SET title = ?1, recipe = ?2 WHERE id = ?3"#)
            .bind(&updated.title)
            .bind(&recipe)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, &updated.title))?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM drinks WHERE id = ?1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn reset(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(r#"DROP TABLE IF EXISTS drinks"#)
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), String> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| format!("SQLite query failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, RecipeInput};

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:", 1)
            .await
            .expect("Failed to open in-memory SQLite store")
    }

    fn drink(title: &str, name: &str) -> NewDrink {
        NewDrink::new(
            title,
            Recipe::try_from(RecipeInput::One(Ingredient {
                name: name.to_string(),
                color: "brown".to_string(),
                parts: 2,
            }))
            .unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_get_and_list() {
        let store = memory_store().await;

        let latte = store.create(drink("Latte", "espresso")).await.unwrap();
        let mocha = store.create(drink("Mocha", "chocolate")).await.unwrap();
        assert_eq!(latte.id, 1);
        assert_eq!(mocha.id, 2);

        let fetched = store.get(latte.id).await.unwrap();
        assert_eq!(fetched, latte);

        let all = store.list().await.unwrap();
        assert_eq!(all, vec![latte, mocha]);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_reported() {
        let store = memory_store().await;
        store.create(drink("Latte", "espresso")).await.unwrap();

        let err = store.create(drink("Latte", "milk")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTitle(title) if title == "Latte"));
    }

    #[tokio::test]
    async fn test_update_replaces_present_fields_only() {
        let store = memory_store().await;
        let latte = store.create(drink("Latte", "espresso")).await.unwrap();

        let updated = store
            .update(
                latte.id,
                DrinkPatch {
                    title: Some("Flat White".to_string()),
                    recipe: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Flat White");
        assert_eq!(updated.recipe, latte.recipe);
        assert_eq!(store.get(latte.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_to_existing_title_fails() {
        let store = memory_store().await;
        store.create(drink("Latte", "espresso")).await.unwrap();
        let mocha = store.create(drink("Mocha", "chocolate")).await.unwrap();

        let err = store
            .update(
                mocha.id,
                DrinkPatch {
                    title: Some("Latte".to_string()),
                    recipe: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTitle(_)));
        assert_eq!(store.get(mocha.id).await.unwrap().title, "Mocha");
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = memory_store().await;
        let patch = DrinkPatch {
            title: Some("Ghost".to_string()),
            recipe: None,
        };

        assert!(matches!(store.get(42).await, Err(StoreError::NotFound(42))));
        assert!(matches!(
            store.update(42, patch).await,
            Err(StoreError::NotFound(42))
        ));
        assert!(matches!(store.delete(42).await, Err(StoreError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let store = memory_store().await;
        let latte = store.create(drink("Latte", "espresso")).await.unwrap();

        store.delete(latte.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            store.delete(latte.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported_not_returned() {
        let store = memory_store().await;
        sqlx::query(r#"INSERT INTO drinks (title, recipe) VALUES ('Broken', 'not json')"#)
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(matches!(
            store.list().await,
            Err(StoreError::CorruptRecipe { id: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_reset_restarts_ids() {
        let store = memory_store().await;
        store.create(drink("Latte", "espresso")).await.unwrap();
        store.create(drink("Mocha", "chocolate")).await.unwrap();

        store.reset().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        let again = store.create(drink("Latte", "espresso")).await.unwrap();
        assert_eq!(again.id, 1);
    }

    #[tokio::test]
    async fn test_file_database_persists_between_pools() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("drinks.db").display());

        let store = SqliteStore::connect(&url, 2).await.unwrap();
        store.create(drink("Latte", "espresso")).await.unwrap();
        drop(store);

        let reopened = SqliteStore::connect(&url, 2).await.unwrap();
        let drinks = reopened.list().await.unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].title, "Latte");
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = memory_store().await;
        assert!(store.health_check().await.is_ok());

        store.close().await;
        assert!(store.health_check().await.is_err());
    }
}
