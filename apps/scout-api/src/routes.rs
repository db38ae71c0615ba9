use axum::{
	Json, Router,
	body::Bytes,
	extract::{Query, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use scout_service::{
	AckResponse, AutocompleteRequest, AutocompleteResponse, Error as ServiceError,
	FullTextSearchRequest, HistoryResponse, SearchFilter, SearchResponse,
};

const PROFILE_HEADER: &str = "x-profile-id";
const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/search/autocomplete", get(autocomplete))
		.route("/v1/search/history", get(fetch_history).post(add_history))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
	search: Option<String>,
	page: Option<String>,
	limit: Option<String>,
	sort_by: Option<String>,
	order_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AutocompleteParams {
	search: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryBody {
	search: String,
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(params): Query<SearchParams>,
	body: Bytes,
) -> Result<Json<SearchResponse>, ApiError> {
	let profile_id = profile_id(&headers)?;
	let filter = parse_filter(&body)?;
	let req = FullTextSearchRequest {
		profile_id,
		filter,
		query: params.search.unwrap_or_default(),
		page: parse_count(params.page.as_deref(), "page", DEFAULT_PAGE)?,
		limit: parse_count(params.limit.as_deref(), "limit", DEFAULT_LIMIT)?,
		sort_by: params.sort_by,
		order_by: params.order_by,
	};
	let response = state.service.full_text_search(req).await?;

	Ok(Json(response))
}

async fn autocomplete(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(params): Query<AutocompleteParams>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
	let profile_id = profile_id(&headers)?;
	let req = AutocompleteRequest { profile_id, query: params.search.unwrap_or_default() };
	let response = state.service.autocomplete(req).await?;

	Ok(Json(response))
}

async fn fetch_history(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<HistoryResponse>, ApiError> {
	let profile_id = profile_id(&headers)?;
	let response = state.service.fetch_search_history(profile_id).await?;

	Ok(Json(response))
}

async fn add_history(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Json<AckResponse>, ApiError> {
	let profile_id = profile_id(&headers)?;
	let payload: HistoryBody = serde_json::from_slice(&body).map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", format!("Invalid body: {err}"))
	})?;
	let response = state.service.add_to_search_history(profile_id, &payload.search).await?;

	Ok(Json(response))
}

fn profile_id(headers: &HeaderMap) -> Result<i64, ApiError> {
	headers
		.get(PROFILE_HEADER)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.trim().parse::<i64>().ok())
		.filter(|id| *id > 0)
		.ok_or_else(|| {
			json_error(
				StatusCode::UNAUTHORIZED,
				"UNAUTHORIZED",
				format!("{PROFILE_HEADER} header must carry a positive profile id."),
			)
		})
}

/// An empty body or `null` means no filter. Anything else must be a filter object.
fn parse_filter(body: &[u8]) -> Result<Option<SearchFilter>, ApiError> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(None);
	}

	serde_json::from_slice(body).map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", format!("Invalid filter: {err}"))
	})
}

fn parse_count(raw: Option<&str>, label: &str, default: u32) -> Result<u32, ApiError> {
	let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
		return Ok(default);
	};

	raw.parse::<u32>().map_err(|_| {
		json_error(
			StatusCode::BAD_REQUEST,
			"INVALID_REQUEST",
			format!("{label} must be a positive integer."),
		)
	})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	data: Option<()>,
	status: i32,
	message: String,
	error_code: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			ServiceError::Provider { message } => {
				tracing::error!(%message, "Profile provider failed.");

				json_error(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message)
			},
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Storage failed.");

				json_error(StatusCode::BAD_GATEWAY, "STORAGE_ERROR", message)
			},
			ServiceError::Timeout { message } =>
				json_error(StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { data: None, status: 0, message: self.message, error_code: self.error_code };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
