//! Drink storage interface + domain types.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePart {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Vec<RecipePart>>,
}

/// Drink store.
///
/// Titles are unique: `create`/`update` return `RepoError::Conflict` on a clash.
/// Listing order is ascending id.
#[async_trait]
pub trait DrinkRepo: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn list(&self) -> Result<Vec<Drink>, RepoError>;

    async fn get(&self, id: i64) -> Result<Option<Drink>, RepoError>;

    async fn create(&self, new: NewDrink) -> Result<Drink, RepoError>;

    // Ok(None) when `id` does not exist
    async fn update(&self, id: i64, changes: DrinkChanges) -> Result<Option<Drink>, RepoError>;

    // Ok(false) when `id` does not exist
    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}
