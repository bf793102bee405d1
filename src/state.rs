/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - authorizer: bearer token → claims → permission
 *   - drinks: storage backend (Postgres or in-memory)
 * - Cloned per request (fields are Arc)
 */
use std::sync::Arc;

use crate::repos::drinks::DrinkRepo;
use crate::services::auth::Authorizer;

#[derive(Clone)]
pub struct AppState {
    pub authorizer: Arc<Authorizer>,
    pub drinks: Arc<dyn DrinkRepo>,
}

impl AppState {
    pub fn new(authorizer: Arc<Authorizer>, drinks: Arc<dyn DrinkRepo>) -> Self {
        Self { authorizer, drinks }
    }
}
