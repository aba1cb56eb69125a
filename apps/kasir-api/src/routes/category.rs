//! Category CRUD under `/api/categories`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use kasir_core::validation::validate_category_input;
use kasir_core::{Category, CategoryId, CategoryInput};

use super::MessageResponse;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.catalog.list_categories().await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>, ApiError> {
    state
        .catalog
        .get_category(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category", id))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(input) = payload?;
    validate_category_input(&input)?;

    let category = state.catalog.create_category(input).await?;
    info!(id = category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Json(input) = payload?;
    validate_category_input(&input)?;

    Ok(Json(state.catalog.update_category(id, input).await?))
}

/// Products in the category become uncategorized.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog.delete_category(id).await?;
    info!(id = id, "Category deleted");
    Ok(Json(MessageResponse::new("Category deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::memory_state;

    fn input(name: &str) -> Result<Json<CategoryInput>, JsonRejection> {
        Ok(Json(CategoryInput {
            name: name.to_string(),
            description: "Camilan".to_string(),
        }))
    }

    #[tokio::test]
    async fn test_category_lifecycle() {
        let state = memory_state(false);

        let (status, Json(snacks)) = create(State(state.clone()), input("Snack")).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(renamed) = update(State(state.clone()), Path(snacks.id), input("Snacks"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Snacks");

        let Json(all) = list(State(state.clone())).await.unwrap();
        assert_eq!(all.len(), 3);

        delete(State(state.clone()), Path(snacks.id)).await.unwrap();
        let err = get(State(state), Path(snacks.id)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_category_uncategorizes_products() {
        let state = memory_state(false);

        delete(State(state.clone()), Path(1)).await.unwrap();

        let indomie = state.catalog.get_product(1).await.unwrap().unwrap();
        assert_eq!(indomie.category_id, None);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let err = create(State(memory_state(false)), input("  ")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
