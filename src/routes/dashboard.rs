use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::guards::AdminGuard;
use crate::models::{
    ChartData, ChartPoint, ChartSwitch, ChartType, DashboardMetrics, DashboardState,
    DocumentSwitch, KycRow, KycStatus, MonthlyCount, NewKycDocument, SelectOption, SharedState,
    StatusBadge, UploadRefresh,
};
use crate::services::dashboard::{self, KycFilter};
use crate::services::{documents, DynKycSource, HostEffects};
use crate::utils::validation::{validate_document_type, validate_file_ref};
use crate::utils::{ApiError, ApiResponse};

#[derive(FromForm, Deserialize, JsonSchema)]
pub struct KycListQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
}

impl KycListQuery {
    /// Without an explicit `status`, the stored status selection applies.
    fn filter(&self, state: &DashboardState) -> Result<KycFilter, ApiError> {
        let status = self.status.as_deref().unwrap_or(state.selected_status());
        Ok(KycFilter::parse(self.from.as_deref(), self.to.as_deref(), Some(status))?)
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct StatusFilterDto {
    pub status: String, // "" clears the filter
}

#[derive(Deserialize, JsonSchema)]
pub struct DocumentSwitchDto {
    pub action: DocumentSwitch,
}

#[derive(Deserialize, JsonSchema)]
pub struct ChartSwitchDto {
    pub action: ChartSwitch,
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUploadResponse {
    pub refresh: Option<UploadRefresh>,
    pub effects: HostEffects,
}

fn parse_status(status: &str) -> Result<KycStatus, ApiError> {
    status
        .parse::<KycStatus>()
        .map_err(|_| ApiError::bad_request(format!("Invalid status '{}'", status)))
}

// ==================== STATE ====================

#[openapi(tag = "Dashboard")]
#[post("/dashboard/initialize")]
pub async fn initialize(
    state: &State<SharedState>,
    _auth: AdminGuard,
) -> Result<Json<ApiResponse<DashboardState>>, ApiError> {
    let mut state = state.lock().await;
    state.initialize();

    Ok(Json(ApiResponse::success_with_message(
        "Dashboard initialized".to_string(),
        state.clone(),
    )))
}

#[openapi(tag = "Dashboard")]
#[get("/dashboard/state")]
pub async fn get_state(
    state: &State<SharedState>,
    _auth: AdminGuard,
) -> Result<Json<ApiResponse<DashboardState>>, ApiError> {
    let state = state.lock().await;
    Ok(Json(ApiResponse::success(state.clone())))
}

#[openapi(tag = "Dashboard")]
#[put("/dashboard/filter/status", data = "<dto>")]
pub async fn set_status_filter(
    state: &State<SharedState>,
    _auth: AdminGuard,
    dto: Json<StatusFilterDto>,
) -> Result<Json<ApiResponse<DashboardState>>, ApiError> {
    let status = dto.status.trim();
    if !status.is_empty() {
        parse_status(status)?;
    }

    let mut state = state.lock().await;
    state.set_selected_status(status);
    Ok(Json(ApiResponse::success(state.clone())))
}

// ==================== METRICS & TABLE ====================

#[openapi(tag = "Dashboard")]
#[get("/dashboard/metrics")]
pub async fn get_metrics(
    source: &State<DynKycSource>,
    _auth: AdminGuard,
) -> Result<Json<ApiResponse<DashboardMetrics>>, ApiError> {
    let metrics = dashboard::get_dashboard_metrics(source.inner().as_ref()).await?;
    Ok(Json(ApiResponse::success(metrics)))
}

#[openapi(tag = "Dashboard")]
#[get("/dashboard/kyc?<query..>")]
pub async fn get_all_kyc(
    source: &State<DynKycSource>,
    state: &State<SharedState>,
    _auth: AdminGuard,
    query: KycListQuery,
) -> Result<Json<ApiResponse<Vec<KycRow>>>, ApiError> {
    let filter = query.filter(&*state.lock().await)?;
    let rows = dashboard::get_all_kyc(source.inner().as_ref(), &filter).await?;
    Ok(Json(ApiResponse::success(rows)))
}

#[openapi(tag = "Dashboard")]
#[get("/dashboard/status-color/<status>")]
pub async fn get_status_color(
    _auth: AdminGuard,
    status: String,
) -> Result<Json<ApiResponse<StatusBadge>>, ApiError> {
    Ok(Json(ApiResponse::success(dashboard::kyc_status_color(&status))))
}

// ==================== DOCUMENTS ====================

#[openapi(tag = "Dashboard - Documents")]
#[get("/dashboard/kyc/<kyc_id>/documents")]
pub async fn set_kyc_document(
    source: &State<DynKycSource>,
    state: &State<SharedState>,
    _auth: AdminGuard,
    kyc_id: String,
) -> Result<Json<ApiResponse<DashboardState>>, ApiError> {
    let mut state = state.lock().await;
    documents::set_kyc_document(&mut state, source.inner().as_ref(), &kyc_id).await?;
    Ok(Json(ApiResponse::success(state.clone())))
}

#[openapi(tag = "Dashboard - Documents")]
#[post("/dashboard/documents/switch", data = "<dto>")]
pub async fn handle_document_switch(
    source: &State<DynKycSource>,
    state: &State<SharedState>,
    _auth: AdminGuard,
    dto: Json<DocumentSwitchDto>,
) -> Result<Json<ApiResponse<DashboardState>>, ApiError> {
    let mut state = state.lock().await;
    documents::handle_document_switch(&mut state, source.inner().as_ref(), dto.action).await?;
    Ok(Json(ApiResponse::success(state.clone())))
}

#[openapi(tag = "Dashboard - Documents")]
#[get("/dashboard/kyc/<kyc_id>/document-options")]
pub async fn get_document_type_options(
    source: &State<DynKycSource>,
    _auth: AdminGuard,
    kyc_id: String,
) -> Result<Json<ApiResponse<Vec<SelectOption>>>, ApiError> {
    let options =
        documents::return_user_document_type_options(source.inner().as_ref(), &kyc_id).await?;
    Ok(Json(ApiResponse::success(options)))
}

#[openapi(tag = "Dashboard - Documents")]
#[post("/dashboard/kyc/<kyc_id>/documents?<query..>", data = "<dto>")]
pub async fn add_kyc_document(
    source: &State<DynKycSource>,
    state: &State<SharedState>,
    auth: AdminGuard,
    kyc_id: String,
    query: KycListQuery,
    dto: Json<NewKycDocument>,
) -> Result<Json<ApiResponse<DocumentUploadResponse>>, ApiError> {
    if !validate_document_type(&dto.document_type) {
        return Err(ApiError::bad_request(format!(
            "Unknown document type '{}'",
            dto.document_type
        )));
    }
    if !validate_file_ref(&dto.file_ref) {
        return Err(ApiError::bad_request("File must be a PDF, JPG or PNG"));
    }

    log::info!("{} uploading {} for KYC {}", auth.subject, dto.document_type, kyc_id);

    let mut state = state.lock().await;
    let filter = query.filter(&state)?;

    let mut effects = HostEffects::default();
    let refresh = documents::add_kyc_document(
        &mut state,
        source.inner().as_ref(),
        &mut effects,
        &kyc_id,
        &filter,
        dto.into_inner(),
    )
    .await;

    Ok(Json(ApiResponse::success(DocumentUploadResponse { refresh, effects })))
}

// ==================== CHARTS ====================

#[openapi(tag = "Dashboard - Charts")]
#[get("/dashboard/chart")]
pub async fn get_chart_data(
    source: &State<DynKycSource>,
    state: &State<SharedState>,
    _auth: AdminGuard,
) -> Result<Json<ApiResponse<ChartData>>, ApiError> {
    let state = state.lock().await;
    let chart = dashboard::chart_data(&state, source.inner().as_ref()).await?;
    Ok(Json(ApiResponse::success(chart)))
}

#[openapi(tag = "Dashboard - Charts")]
#[post("/dashboard/chart/switch", data = "<dto>")]
pub async fn switch_chart(
    state: &State<SharedState>,
    _auth: AdminGuard,
    dto: Json<ChartSwitchDto>,
) -> Result<Json<ApiResponse<DashboardState>>, ApiError> {
    let mut state = state.lock().await;
    if state.switch_chart(dto.action) {
        log::debug!("Chart switched to index {}", state.chart_index());
    }
    Ok(Json(ApiResponse::success(state.clone())))
}

#[openapi(tag = "Dashboard - Charts")]
#[get("/dashboard/chart/type?<index>")]
pub async fn get_chart_type(
    _auth: AdminGuard,
    index: Option<i64>,
) -> Result<Json<ApiResponse<ChartType>>, ApiError> {
    Ok(Json(ApiResponse::success(dashboard::return_chart_type(index.unwrap_or(0)))))
}

#[openapi(tag = "Dashboard - Charts")]
#[get("/dashboard/registrations/daily?<status>")]
pub async fn get_daily_registrations(
    source: &State<DynKycSource>,
    _auth: AdminGuard,
    status: Option<String>,
) -> Result<Json<ApiResponse<Vec<ChartPoint>>>, ApiError> {
    let status = status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_status)
        .transpose()?;

    let points = dashboard::daily_reg_users_by_status(source.inner().as_ref(), status).await?;
    Ok(Json(ApiResponse::success(points)))
}

#[openapi(tag = "Dashboard - Charts")]
#[get("/dashboard/verified-by-month")]
pub async fn get_verified_users_by_month(
    source: &State<DynKycSource>,
    _auth: AdminGuard,
) -> Result<Json<ApiResponse<Vec<MonthlyCount>>>, ApiError> {
    let months =
        dashboard::get_verified_users_by_month(source.inner().as_ref(), chrono::Utc::now()).await?;
    Ok(Json(ApiResponse::success(months)))
}
