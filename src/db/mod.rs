//! SQLite-backed storage for drinks.
//!
//! Connections come from an async pool and all queries run through
//! `interact`, which offloads the blocking Diesel work. The pool is sized 1;
//! SQLite has limited concurrent write support even with WAL mode and a
//! single connection avoids "database is locked" errors.

use deadpool_diesel::sqlite::{Manager, Pool, Runtime};
use diesel::prelude::*;
use log::{debug, info};
use thiserror::Error;

use crate::db::models::Drink;

pub mod models;

diesel::table! {
    drinks (id) {
        id -> Integer,
        title -> Text,
        recipe -> Text,
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = drinks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct DrinkRow {
    id: i32,
    title: String,
    recipe: String,
}

impl From<DrinkRow> for Drink {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row.recipe,
        }
    }
}

/// Errors that can occur during drink storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("drink not found")]
    NotFound,
    #[error("a drink with this title already exists")]
    TitleTaken,
    #[error("connection pool error: {0}")]
    Pool(String),
    #[error("database error: {0}")]
    Database(String),
}

fn map_query_error(err: diesel::result::Error) -> StoreError {
    match err {
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _info,
        ) => StoreError::TitleTaken,
        diesel::result::Error::NotFound => StoreError::NotFound,
        other => StoreError::Database(other.to_string()),
    }
}

/// SQLite-backed drink storage.
#[derive(Clone)]
pub struct DrinkStore {
    pool: Pool,
}

impl DrinkStore {
    /// Creates a new store backed by the database at `database_url` (a file
    /// path or `:memory:`).
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        let manager = Manager::new(database_url, Runtime::Tokio1);
        let pool = Pool::builder(manager)
            .max_size(1)
            .build()
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Creates the drinks table if missing and sets SQLite pragmas.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        conn.interact(|conn| {
            // WAL mode allows concurrent reads during writes; busy_timeout
            // makes SQLite wait instead of immediately failing on locks.
            diesel::sql_query("PRAGMA journal_mode=WAL;").execute(conn)?;
            diesel::sql_query("PRAGMA busy_timeout=30000;").execute(conn)?;
            diesel::sql_query(
                "CREATE TABLE IF NOT EXISTS drinks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL UNIQUE,
                    recipe TEXT NOT NULL
                )",
            )
            .execute(conn)?;
            Ok::<_, diesel::result::Error>(())
        })
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .map_err(|e| StoreError::Database(e.to_string()))?;
        info!("database schema ready");
        Ok(())
    }

    /// Loads all drinks, id ascending.
    pub async fn list(&self) -> Result<Vec<Drink>, StoreError> {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        let rows: Vec<DrinkRow> = conn
            .interact(|conn| {
                drinks::table
                    .order(drinks::id.asc())
                    .select(DrinkRow::as_select())
                    .load(conn)
            })
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map_err(|e| StoreError::Database(e.to_string()))?;
        debug!("loaded {} drinks", rows.len());
        Ok(rows.into_iter().map(Drink::from).collect())
    }

    /// Looks a drink up by id.
    pub async fn find(&self, drink_id: i32) -> Result<Option<Drink>, StoreError> {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        let row: Option<DrinkRow> = conn
            .interact(move |conn| {
                drinks::table
                    .find(drink_id)
                    .select(DrinkRow::as_select())
                    .first(conn)
                    .optional()
            })
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(row.map(Drink::from))
    }

    /// Persists a new drink and returns it with the storage-assigned id.
    pub async fn insert(&self, title: String, recipe: String) -> Result<Drink, StoreError> {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        let row: DrinkRow = conn
            .interact(move |conn| {
                diesel::insert_into(drinks::table)
                    .values((drinks::title.eq(&title), drinks::recipe.eq(&recipe)))
                    .returning(DrinkRow::as_returning())
                    .get_result(conn)
            })
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map_err(map_query_error)?;
        debug!("inserted drink {} '{}'", row.id, row.title);
        Ok(row.into())
    }

    /// Applies the provided fields to an existing drink and returns the
    /// updated record. Fails with `NotFound` when the id is absent.
    pub async fn update(
        &self,
        drink_id: i32,
        title: Option<String>,
        recipe: Option<String>,
    ) -> Result<Drink, StoreError> {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        let row: DrinkRow = conn
            .interact(move |conn| {
                if let Some(ref title) = title {
                    diesel::update(drinks::table.find(drink_id))
                        .set(drinks::title.eq(title))
                        .execute(conn)?;
                }
                if let Some(ref recipe) = recipe {
                    diesel::update(drinks::table.find(drink_id))
                        .set(drinks::recipe.eq(recipe))
                        .execute(conn)?;
                }
                drinks::table
                    .find(drink_id)
                    .select(DrinkRow::as_select())
                    .first(conn)
            })
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map_err(map_query_error)?;
        debug!("updated drink {}", row.id);
        Ok(row.into())
    }

    /// Removes a drink by id. Fails with `NotFound` when the id is absent.
    pub async fn delete(&self, drink_id: i32) -> Result<(), StoreError> {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        let affected = conn
            .interact(move |conn| diesel::delete(drinks::table.find(drink_id)).execute(conn))
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map_err(|e| StoreError::Database(e.to_string()))?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        debug!("deleted drink {}", drink_id);
        Ok(())
    }
}
