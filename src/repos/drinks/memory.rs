use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::{
    drinks::store::{Drink, DrinkChanges, DrinkRepo, NewDrink},
    error::RepoError,
};

#[derive(Debug)]
struct State {
    next_id: i64,
    drinks: BTreeMap<i64, Drink>,
}

/// Process-local drink store (used when no DATABASE_URL is configured, and in tests).
#[derive(Debug)]
pub struct InMemoryDrinkRepo {
    state: RwLock<State>,
}

impl Default for InMemoryDrinkRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDrinkRepo {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                drinks: BTreeMap::new(),
            }),
        }
    }
}

fn title_taken(state: &State, title: &str, except: Option<i64>) -> bool {
    state
        .drinks
        .values()
        .any(|d| d.title == title && Some(d.id) != except)
}

#[async_trait]
impl DrinkRepo for InMemoryDrinkRepo {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Drink>, RepoError> {
        let state = self.state.read().await;
        Ok(state.drinks.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Drink>, RepoError> {
        let state = self.state.read().await;
        Ok(state.drinks.get(&id).cloned())
    }

    async fn create(&self, new: NewDrink) -> Result<Drink, RepoError> {
        let mut state = self.state.write().await;
        if title_taken(&state, &new.title, None) {
            return Err(RepoError::Conflict);
        }

        let id = state.next_id;
        state.next_id += 1;

        let drink = Drink {
            id,
            title: new.title,
            recipe: new.recipe,
        };
        state.drinks.insert(id, drink.clone());

        Ok(drink)
    }

    async fn update(&self, id: i64, changes: DrinkChanges) -> Result<Option<Drink>, RepoError> {
        let mut state = self.state.write().await;

        if let Some(title) = changes.title.as_deref()
            && title_taken(&state, title, Some(id))
        {
            return Err(RepoError::Conflict);
        }

        let Some(drink) = state.drinks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            drink.title = title;
        }
        if let Some(recipe) = changes.recipe {
            drink.recipe = recipe;
        }

        Ok(Some(drink.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let mut state = self.state.write().await;
        Ok(state.drinks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::drinks::store::RecipePart;

    fn water() -> NewDrink {
        NewDrink {
            title: "water".into(),
            recipe: vec![RecipePart {
                name: "water".into(),
                color: "blue".into(),
                parts: 1,
            }],
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let repo = InMemoryDrinkRepo::new();
        let a = repo.create(water()).await.unwrap();
        let b = repo
            .create(NewDrink {
                title: "latte".into(),
                ..water()
            })
            .await
            .unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        let titles: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, vec!["water", "latte"]);
    }

    #[tokio::test]
    async fn duplicate_title_conflicts() {
        let repo = InMemoryDrinkRepo::new();
        repo.create(water()).await.unwrap();

        assert!(matches!(
            repo.create(water()).await,
            Err(RepoError::Conflict)
        ));
    }

    #[tokio::test]
    async fn update_is_partial() {
        let repo = InMemoryDrinkRepo::new();
        let drink = repo.create(water()).await.unwrap();

        let updated = repo
            .update(
                drink.id,
                DrinkChanges {
                    title: Some("sparkling water".into()),
                    recipe: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "sparkling water");
        assert_eq!(updated.recipe, drink.recipe);
    }

    #[tokio::test]
    async fn update_to_own_title_is_not_a_conflict() {
        let repo = InMemoryDrinkRepo::new();
        let drink = repo.create(water()).await.unwrap();

        let changes = DrinkChanges {
            title: Some("water".into()),
            recipe: None,
        };
        assert!(repo.update(drink.id, changes).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_ids() {
        let repo = InMemoryDrinkRepo::new();

        assert!(repo.get(42).await.unwrap().is_none());
        assert!(repo.update(42, DrinkChanges::default()).await.unwrap().is_none());
        assert!(!repo.delete(42).await.unwrap());
    }
}
