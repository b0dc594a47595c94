use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::report_controller::{owner_group, ReportController};
use crate::dto::report_dto::{MileageReportParams, MileageReportResponse, OwnerGroupResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new().route("/mileage", get(mileage_report))
}

async fn mileage_report(
    State(state): State<AppState>,
    Query(params): Query<MileageReportParams>,
) -> Result<Json<MileageReportResponse>, AppError> {
    let controller = ReportController::new(state.reports.clone());
    let response = controller.mileage(params).await?;
    Ok(Json(response))
}

pub async fn get_owner_group(
    State(state): State<AppState>,
) -> Result<Json<OwnerGroupResponse>, AppError> {
    let response = owner_group(state.owner_groups.as_ref(), state.owner_group.group_name()).await?;
    Ok(Json(response))
}
