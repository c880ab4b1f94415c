use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use jornada_core::bookmark::{BookmarkChange, SaveResult};
use jornada_core::models::enrollment::StudentJourney;
use jornada_portal::detail::JourneyDetail;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub async fn journey_views(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let board = state.portal(&user).journey_board().await?;
    Ok(Json(board.views()).into_response())
}

/// `id` is a catalog journey id or the id of the caller's enrollment.
pub async fn journey_detail(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<JourneyDetail>, ApiError> {
    let detail = state.portal(&user).journey_detail(&id).await?;
    Ok(Json(detail))
}

pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<BookmarkChange<StudentJourney>>, ApiError> {
    let change = state.portal(&user).toggle_journey_bookmark(&id).await?;
    Ok(Json(change))
}

pub async fn save(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<SaveResult<StudentJourney>>, ApiError> {
    let result = state.portal(&user).save_journey(&id).await?;
    Ok(Json(result))
}
