use std::sync::Arc;

use crate::dto::report_dto::{MileageReportParams, MileageReportResponse, OwnerGroupResponse};
use crate::repositories::OwnerGroupRepository;
use crate::services::ReportService;
use crate::utils::errors::AppError;

pub struct ReportController {
    service: Arc<ReportService>,
}

impl ReportController {
    pub fn new(service: Arc<ReportService>) -> Self {
        Self { service }
    }

    pub async fn mileage(
        &self,
        params: MileageReportParams,
    ) -> Result<MileageReportResponse, AppError> {
        let report = self.service.generate(&params.into()).await?;
        Ok(report.into())
    }
}

/// Miembros actuales del grupo de propietarios
pub async fn owner_group(
    groups: &dyn OwnerGroupRepository,
    name: &str,
) -> Result<OwnerGroupResponse, AppError> {
    let member_ids = groups.group_members(name).await?;
    Ok(OwnerGroupResponse {
        name: name.to_string(),
        member_ids,
    })
}
