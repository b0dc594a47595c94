use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::mileage_controller::MileageController;
use crate::dto::trip_dto::{
    CreateTripBatchRequest, CreateTripRequest, TripResponse, UpdateTripRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::ActingUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_trip))
        .route("/batch", post(create_trip_batch))
        .route("/:id", get(get_trip).put(update_trip).delete(delete_trip))
        .route("/:id/preceding", get(get_preceding_trip))
}

async fn create_trip(
    State(state): State<AppState>,
    ActingUser(acting_user): ActingUser,
    Json(request): Json<CreateTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = MileageController::new(state.mileage.clone());
    let response = controller.create(acting_user, request).await?;
    Ok(Json(response))
}

async fn create_trip_batch(
    State(state): State<AppState>,
    ActingUser(acting_user): ActingUser,
    Json(request): Json<CreateTripBatchRequest>,
) -> Result<Json<ApiResponse<Vec<TripResponse>>>, AppError> {
    let controller = MileageController::new(state.mileage.clone());
    let response = controller.create_batch(acting_user, request).await?;
    Ok(Json(response))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TripResponse>, AppError> {
    let controller = MileageController::new(state.mileage.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = MileageController::new(state.mileage.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MileageController::new(state.mileage.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

// `data` es null cuando no hay viaje anterior
async fn get_preceding_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<TripResponse>>>, AppError> {
    let controller = MileageController::new(state.mileage.clone());
    let preceding = controller.preceding(id).await?;
    Ok(Json(ApiResponse::success(preceding)))
}
