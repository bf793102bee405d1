/*
 * Responsibility
 * - /drinks handlers (menu + barista/manager operations)
 * - Permission checks happen in the route guard; handlers only see verified claims
 */
use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    api::v1::{
        dto::drinks::{
            CreateDrinkRequest, DeleteDrinkResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::{Claims, DrinkId},
    },
    error::AppError,
    repos::drinks::{DrinkChanges, NewDrink},
    state::AppState,
};

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let drinks = state.drinks.list().await?;
    if drinks.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(DrinkShort::from).collect(),
    )))
}

pub async fn list_drinks_detail(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let drinks = state.drinks.list().await?;
    if drinks.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(DrinkLong::from).collect(),
    )))
}

pub async fn create_drink(
    State(state): State<AppState>,
    Claims(claims): Claims,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let Json(req) = payload?;
    let new = NewDrink::try_from(req).map_err(|reason| {
        tracing::debug!(reason, "rejected drink");
        AppError::Unprocessable
    })?;

    let drink = state.drinks.create(new).await?;
    tracing::info!(
        drink_id = drink.id,
        sub = claims.sub.as_deref().unwrap_or("-"),
        "drink created"
    );

    Ok(Json(DrinksResponse::new(vec![DrinkLong::from(drink)])))
}

pub async fn update_drink(
    State(state): State<AppState>,
    DrinkId(drink_id): DrinkId,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    // unknown id is reported before any body problem
    if state.drinks.get(drink_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let Json(req) = payload?;
    let changes = DrinkChanges::try_from(req).map_err(|reason| {
        tracing::debug!(reason, "rejected drink update");
        AppError::Unprocessable
    })?;

    let drink = state
        .drinks
        .update(drink_id, changes)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(DrinksResponse::new(vec![DrinkLong::from(drink)])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    DrinkId(drink_id): DrinkId,
) -> Result<Json<DeleteDrinkResponse>, AppError> {
    if !state.drinks.delete(drink_id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: drink_id,
    }))
}
