/*
 * Responsibility
 * - Drinks request/response DTOs
 * - short form (public menu): recipe without ingredient names
 * - long form (baristas/managers): full recipe
 */
use serde::{Deserialize, Serialize};

use crate::repos::drinks::{Drink, DrinkChanges, NewDrink, RecipePart};

/// Clients send either one recipe part or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<RecipePart>),
    One(RecipePart),
}

impl RecipeInput {
    pub fn into_parts(self) -> Vec<RecipePart> {
        match self {
            RecipeInput::Many(parts) => parts,
            RecipeInput::One(part) => vec![part],
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, RecipeInput::Many(parts) if parts.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl CreateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        match &self.title {
            Some(title) if !title.trim().is_empty() => {}
            _ => return Err("title is required"),
        }
        match &self.recipe {
            Some(recipe) if !recipe.is_empty() => {}
            _ => return Err("recipe is required"),
        }
        Ok(())
    }
}

impl TryFrom<CreateDrinkRequest> for NewDrink {
    type Error = &'static str;

    fn try_from(req: CreateDrinkRequest) -> Result<Self, Self::Error> {
        req.validate()?;
        let (Some(title), Some(recipe)) = (req.title, req.recipe) else {
            return Err("title and recipe are required");
        };
        Ok(NewDrink {
            title: title.trim().to_string(),
            recipe: recipe.into_parts(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl UpdateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        if let Some(recipe) = &self.recipe
            && recipe.is_empty()
        {
            return Err("recipe cannot be empty");
        }
        Ok(())
    }
}

impl TryFrom<UpdateDrinkRequest> for DrinkChanges {
    type Error = &'static str;

    fn try_from(req: UpdateDrinkRequest) -> Result<Self, Self::Error> {
        req.validate()?;
        Ok(DrinkChanges {
            title: req.title.map(|t| t.trim().to_string()),
            recipe: req.recipe.map(RecipeInput::into_parts),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RecipePartShort {
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePartShort>,
}

impl From<Drink> for DrinkShort {
    fn from(d: Drink) -> Self {
        Self {
            id: d.id,
            title: d.title,
            recipe: d
                .recipe
                .into_iter()
                .map(|p| RecipePartShort {
                    color: p.color,
                    parts: p.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

impl From<Drink> for DrinkLong {
    fn from(d: Drink) -> Self {
        Self {
            id: d.id,
            title: d.title,
            recipe: d.recipe,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: i64,
}
