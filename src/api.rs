//! REST API for the container loading service.
//!
//! Thin HTTP wrapper around the [`stowcraft`] engine: validates requests
//! into engine types, runs the placement driver, and serializes the
//! result. Uses Axum as the web framework and supports CORS.

use std::sync::OnceLock;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use stowcraft::driver::{self, DriverEvent};
use stowcraft::error::ValidationError;
use stowcraft::model::{Cargo, CargoGroup, CargoId, CombinedDims, Container, ContainerType};
use stowcraft::multi_container;
use stowcraft::rules::{self, Rule, RuleKind};
use stowcraft::serialization;

use crate::config::ApiConfig;

#[derive(Clone)]
struct ApiState;

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>stowcraft API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Wire shape of a container spec in a pack request.
#[derive(Deserialize, Clone, ToSchema)]
pub struct ContainerRequest {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub max_weight: f64,
    #[serde(default)]
    pub container_type: ContainerTypeRequest,
}

#[derive(Deserialize, Clone, Copy, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContainerTypeRequest {
    #[default]
    Container,
    Truck,
    Pallet,
}

impl From<ContainerTypeRequest> for ContainerType {
    fn from(value: ContainerTypeRequest) -> Self {
        match value {
            ContainerTypeRequest::Container => ContainerType::Container,
            ContainerTypeRequest::Truck => ContainerType::Truck,
            ContainerTypeRequest::Pallet => ContainerType::Pallet,
        }
    }
}

impl ContainerRequest {
    fn into_container(self) -> Result<Container, ValidationError> {
        Container::new(self.name, self.length, self.width, self.height, self.max_weight, self.container_type.into())
    }
}

/// Wire shape of a cargo item in a pack request.
#[derive(Deserialize, Clone, ToSchema)]
pub struct CargoRequest {
    pub id: String,
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub stackable: bool,
    #[serde(default = "default_true")]
    pub allow_rotate: bool,
    #[serde(default)]
    pub bottom_only: bool,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub max_stack: Option<u32>,
}

fn default_quantity() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl CargoRequest {
    fn into_cargo(self) -> Result<Cargo, ValidationError> {
        let mut cargo = Cargo::new(self.id, self.name, self.length, self.width, self.height, self.weight)?
            .with_quantity(self.quantity)?
            .with_stackable(self.stackable)
            .with_allow_rotate(self.allow_rotate)
            .with_bottom_only(self.bottom_only)
            .with_priority(self.priority)
            .with_color(self.color);
        if let Some(group_id) = self.group_id {
            cargo = cargo.with_group_id(group_id);
        }
        if let Some(max_stack) = self.max_stack {
            cargo = cargo.with_max_stack(max_stack);
        }
        Ok(cargo)
    }
}

/// Wire shape of a locked cargo group.
#[derive(Deserialize, Clone, ToSchema)]
pub struct CargoGroupRequest {
    pub id: String,
    pub name: String,
    pub cargo_ids: Vec<String>,
    #[serde(default)]
    pub combined_length: Option<f64>,
    #[serde(default)]
    pub combined_width: Option<f64>,
    #[serde(default)]
    pub combined_height: Option<f64>,
    #[serde(default)]
    pub combined_weight: Option<f64>,
}

impl CargoGroupRequest {
    fn into_group(self) -> CargoGroup {
        let mut group = CargoGroup::new(self.id, self.name, self.cargo_ids.into_iter().map(CargoId::new).collect());
        if let (Some(length), Some(width), Some(height), Some(weight)) =
            (self.combined_length, self.combined_width, self.combined_height, self.combined_weight)
        {
            group = group.with_combined(CombinedDims { length, width, height, weight });
        }
        group
    }
}

/// Wire shape of one enabled rule; unrecognized `kind` values are ignored.
#[derive(Deserialize, Clone, ToSchema)]
pub struct LoadingRuleRequest {
    pub kind: String,
    pub priority: i32,
}

fn rule_kind_from_str(kind: &str) -> Option<RuleKind> {
    match kind {
        "priority_first" => Some(RuleKind::PriorityFirst),
        "heavy_bottom" => Some(RuleKind::HeavyBottom),
        "volume_first" => Some(RuleKind::VolumeFirst),
        "similar_size_stack" => Some(RuleKind::SimilarSizeStack),
        "same_size_first" => Some(RuleKind::SameSizeFirst),
        _ => None,
    }
}

#[derive(Deserialize, Clone, ToSchema)]
#[schema(
    example = json!({
        "container": {"name": "20GP", "length": 589.0, "width": 234.0, "height": 238.0, "max_weight": 21770.0},
        "cargo": [
            {"id": "a", "name": "Crate", "length": 30.0, "width": 20.0, "height": 20.0, "weight": 5.0, "quantity": 2}
        ]
    })
)]
pub struct PackRequest {
    pub container: ContainerRequest,
    pub cargo: Vec<CargoRequest>,
    #[serde(default)]
    pub groups: Vec<CargoGroupRequest>,
    #[serde(default)]
    pub rules: Option<Vec<LoadingRuleRequest>>,
    /// When greater than 1, the request is answered with the
    /// multi-container orchestrator instead of a single driver run.
    #[serde(default)]
    pub container_count: Option<u32>,
}

struct ValidatedPackRequest {
    container: Container,
    cargo: Vec<Cargo>,
    groups: Vec<CargoGroup>,
    rule_set: Vec<Rule>,
    container_count: u32,
}

enum PackRequestValidationError {
    InvalidContainer(ValidationError),
    InvalidCargo(ValidationError),
}

impl PackRequest {
    fn into_validated(self) -> Result<ValidatedPackRequest, PackRequestValidationError> {
        let container = self.container.into_container().map_err(PackRequestValidationError::InvalidContainer)?;

        let cargo = self
            .cargo
            .into_iter()
            .map(CargoRequest::into_cargo)
            .collect::<Result<Vec<_>, ValidationError>>()
            .map_err(PackRequestValidationError::InvalidCargo)?;

        let groups = self.groups.into_iter().map(CargoGroupRequest::into_group).collect();

        let rule_set = match self.rules {
            Some(rules) => rules
                .into_iter()
                .filter_map(|r| rule_kind_from_str(&r.kind).map(|kind| Rule::new(kind, r.priority)))
                .collect(),
            None => rules::default_rules(),
        };

        let container_count = self.container_count.unwrap_or(1).max(1);

        Ok(ValidatedPackRequest { container, cargo, groups, rule_set, container_count })
    }
}

/// Response for a single-container pack request.
#[derive(Serialize, ToSchema)]
pub struct PackResponse {
    pub placed: Vec<PlacedCargoResponse>,
    pub unplaced: Vec<UnplacedCargoResponse>,
    pub is_complete: bool,
    pub statistics: StatisticsResponse,
}

#[derive(Serialize, ToSchema)]
pub struct PlacedCargoResponse {
    pub id: String,
    pub name: String,
    #[schema(value_type = [f64; 3])]
    pub position: (f64, f64, f64),
    pub rotated: bool,
    pub step_number: u32,
    #[schema(value_type = [f64; 3])]
    pub dims: (f64, f64, f64),
    pub weight: f64,
}

#[derive(Serialize, ToSchema)]
pub struct UnplacedCargoResponse {
    pub id: String,
    pub name: String,
    pub reason: String,
}

#[derive(Serialize, ToSchema)]
pub struct StatisticsResponse {
    pub loaded_count: usize,
    pub total_volume: f64,
    pub volume_utilization: f64,
    pub total_weight: f64,
    pub weight_utilization: f64,
    pub mass_overrun: bool,
    pub mass_overrun_kg: f64,
}

/// One container's result within a multi-container pack response.
#[derive(Serialize, ToSchema)]
pub struct ContainerResultResponse {
    pub container_index: u32,
    pub placed: Vec<PlacedCargoResponse>,
    pub statistics: StatisticsResponse,
}

/// Response for a pack request with `container_count > 1`.
#[derive(Serialize, ToSchema)]
pub struct MultiPackResponse {
    pub multi_container: bool,
    pub container_count: usize,
    pub containers: Vec<ContainerResultResponse>,
    pub unplaced: Vec<UnplacedCargoResponse>,
    pub is_complete: bool,
}

/// Either a single- or multi-container pack result, chosen by the
/// request's `container_count`.
#[derive(Serialize, ToSchema)]
#[serde(untagged)]
pub enum PackOutcome {
    Single(PackResponse),
    Multi(MultiPackResponse),
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self { error: error.into(), details: details.into() }
    }
}

fn error_response(status: StatusCode, error: impl Into<String>, details: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, "Invalid JSON data", err.to_string())
}

fn validation_error(details: impl Into<String>) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, "Invalid input data", details)
}

fn parse_pack_request(payload: Result<Json<PackRequest>, JsonRejection>) -> Result<ValidatedPackRequest, Response> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return Err(json_deserialize_error(err)),
    };

    match payload.into_validated() {
        Ok(validated) => Ok(validated),
        Err(PackRequestValidationError::InvalidContainer(err)) => Err(validation_error(err.to_string())),
        Err(PackRequestValidationError::InvalidCargo(err)) => Err(validation_error(err.to_string())),
    }
}

fn placed_response(placement: &stowcraft::model::Placement) -> PlacedCargoResponse {
    PlacedCargoResponse {
        id: placement.cargo.id.0.clone(),
        name: placement.cargo.name.clone(),
        position: (placement.x, placement.y, placement.z),
        rotated: placement.rotated,
        step_number: placement.step_number,
        dims: (placement.cargo.length, placement.cargo.width, placement.cargo.height),
        weight: placement.cargo.weight,
    }
}

fn unplaced_response(unplaced: &driver::Unplaced) -> UnplacedCargoResponse {
    let reason = match unplaced.reason {
        driver::UnplacedReason::NoFeasiblePosition => "no-fit",
        driver::UnplacedReason::TooLargeForContainer => "item-too-large",
    };
    UnplacedCargoResponse { id: unplaced.cargo.id.0.clone(), name: unplaced.cargo.name.clone(), reason: reason.to_string() }
}

impl PackResponse {
    fn from_result(container: &Container, placed: Vec<stowcraft::model::Placement>, unplaced: Vec<driver::Unplaced>) -> Self {
        let is_complete = unplaced.is_empty();
        let stats = stowcraft::analytics::compute_statistics(&placed, container);

        Self {
            placed: placed.iter().map(placed_response).collect(),
            unplaced: unplaced.iter().map(unplaced_response).collect(),
            is_complete,
            statistics: StatisticsResponse {
                loaded_count: stats.loaded_count,
                total_volume: stats.total_volume,
                volume_utilization: stats.volume_utilization,
                total_weight: stats.total_weight,
                weight_utilization: stats.weight_utilization,
                mass_overrun: stats.mass_overrun,
                mass_overrun_kg: stats.mass_overrun_kg,
            },
        }
    }
}

impl MultiPackResponse {
    fn from_result(result: multi_container::OrchestrationResult) -> Self {
        let is_complete = result.remainder.is_empty();
        let unplaced: Vec<UnplacedCargoResponse> = result.remainder.iter().map(unplaced_response).collect();

        let containers = result
            .results
            .iter()
            .map(|r| {
                let stats = stowcraft::analytics::compute_statistics(&r.placements, &r.container);
                ContainerResultResponse {
                    container_index: r.container_index,
                    placed: r.placements.iter().map(placed_response).collect(),
                    statistics: StatisticsResponse {
                        loaded_count: stats.loaded_count,
                        total_volume: stats.total_volume,
                        volume_utilization: stats.volume_utilization,
                        total_weight: stats.total_weight,
                        weight_utilization: stats.weight_utilization,
                        mass_overrun: stats.mass_overrun,
                        mass_overrun_kg: stats.mass_overrun_kg,
                    },
                }
            })
            .collect::<Vec<_>>();

        Self {
            multi_container: true,
            container_count: containers.len(),
            containers,
            unplaced,
            is_complete,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_pack, handle_pack_stream),
    components(
        schemas(
            PackRequest,
            ContainerRequest,
            ContainerTypeRequest,
            CargoRequest,
            CargoGroupRequest,
            LoadingRuleRequest,
            PackResponse,
            MultiPackResponse,
            ContainerResultResponse,
            PlacedCargoResponse,
            UnplacedCargoResponse,
            StatisticsResponse,
            ErrorResponse
        )
    ),
    tags((name = "packing", description = "Endpoints for container loading"))
)]
struct ApiDoc;

/// Starts the API server.
///
/// Configures CORS for cross-origin requests. Blocks until the server is
/// terminated.
pub async fn start_api_server(config: ApiConfig) {
    let cors = CorsLayer::new().allow_methods(Any).allow_origin(Any).allow_headers(Any);

    let app = Router::new()
        .route("/pack", post(handle_pack))
        .route("/pack_stream", post(handle_pack_stream))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(ApiState);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => panic!("❌ Could not bind API server to {}: {}", addr, err),
    };

    let display_host = config.display_host().to_string();
    println!("🚀 Server running on http://{}:{}", display_host, config.port());
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        println!("💡 Local access: http://localhost:{}", config.port());
    }
    println!("📦 API Endpoints:");
    println!("   - POST /pack");
    println!("   - POST /pack_stream");
    println!("📑 Documentation:");
    println!("   - GET /docs");
    println!("   - GET /docs/openapi.json");

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("❌ API server terminated with an error: {err}");
    }
}

/// Handler for POST /pack.
///
/// Loads the cargo list into the given container and returns the full
/// placement/unplaced result in one response.
#[utoipa::path(
    post,
    path = "/pack",
    request_body = PackRequest,
    responses(
        (status = 200, description = "Successfully loaded cargo", body = PackOutcome),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid request or container configuration", body = ErrorResponse)
    ),
    tag = "packing"
)]
async fn handle_pack(State(_state): State<ApiState>, payload: Result<Json<PackRequest>, JsonRejection>) -> impl IntoResponse {
    let request = match parse_pack_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    println!("📥 New pack request: {} cargo items, {} groups", request.cargo.len(), request.groups.len());

    let outcome = if request.container_count > 1 {
        let result = multi_container::orchestrate(
            &request.container,
            request.container_count,
            &request.rule_set,
            &request.groups,
            &request.cargo,
        );

        println!(
            "📦 Multi-container result: {} containers, {} unplaced",
            result.results.len(),
            result.remainder.len()
        );

        PackOutcome::Multi(MultiPackResponse::from_result(result))
    } else {
        let (placed, unplaced) = driver::run(&request.container, &request.rule_set, &request.groups, &request.cargo);

        println!("📦 Result: {} placed, {} unplaced", placed.len(), unplaced.len());

        PackOutcome::Single(PackResponse::from_result(&request.container, placed, unplaced))
    };

    (StatusCode::OK, Json(outcome)).into_response()
}

/// Handler for POST /pack_stream (SSE).
///
/// Streams one event per resolved cargo item in rule-pipeline order, so a
/// client can visualize the loading sequence as it happens.
#[utoipa::path(
    post,
    path = "/pack_stream",
    request_body = PackRequest,
    responses(
        (status = 200, description = "Streams loading events in real-time", content_type = "text/event-stream", body = String),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid request or container configuration", body = ErrorResponse)
    ),
    tag = "packing"
)]
async fn handle_pack_stream(State(_state): State<ApiState>, payload: Result<Json<PackRequest>, JsonRejection>) -> impl IntoResponse {
    let request = match parse_pack_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (tx, rx) = mpsc::channel::<String>(32);

    tokio::task::spawn_blocking(move || {
        let singletons = stowcraft::groups::expand(&request.cargo, &request.groups);
        driver::place_singletons_with_progress(&request.container, &request.rule_set, &singletons, |event| {
            let json = match event {
                DriverEvent::Placed(p) => serde_json::to_string(&placed_response(p)),
                DriverEvent::Unplaced(u) => serde_json::to_string(&unplaced_response(u)),
            };
            if let Ok(json) = json {
                if tx.blocking_send(json).is_err() {
                    // Receiver has closed the stream; remaining events are discarded.
                }
            }
        });
    });

    let stream = ReceiverStream::new(rx).map(|msg| Ok::<_, std::convert::Infallible>(Event::default().data(msg)));
    Sse::new(stream)
        .keep_alive(KeepAlive::new().interval(std::time::Duration::from_secs(10)).text("keep-alive"))
        .into_response()
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_doc_lists_expected_paths() {
        let doc = openapi_doc();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/pack"), "OpenAPI documentation is missing the /pack path");
        assert!(paths.contains_key("/pack_stream"), "OpenAPI documentation is missing the /pack_stream path");
    }

    #[test]
    fn openapi_doc_contains_key_schemas() {
        let doc = openapi_doc();
        let components = doc.components.as_ref().expect("OpenAPI documentation contains no components");
        let schemas = &components.schemas;
        for name in ["PackRequest", "PackResponse", "ErrorResponse"] {
            assert!(schemas.contains_key(name), "Expected schema '{}' is missing from OpenAPI spec", name);
        }
    }

    #[test]
    fn pack_request_parses_default_rules_when_absent() {
        let json = r#"{
            "container": {"name": "C", "length": 100.0, "width": 50.0, "height": 50.0, "max_weight": 1000.0},
            "cargo": [{"id": "a", "name": "A", "length": 10.0, "width": 10.0, "height": 10.0, "weight": 5.0}]
        }"#;
        let request: PackRequest = serde_json::from_str(json).expect("should parse valid JSON");
        let validated = request.into_validated().ok().expect("should validate");
        assert_eq!(validated.rule_set.len(), 5);
    }

    #[test]
    fn pack_request_rejects_invalid_container_dimensions() {
        let json = r#"{
            "container": {"name": "C", "length": 0.0, "width": 50.0, "height": 50.0, "max_weight": 1000.0},
            "cargo": []
        }"#;
        let request: PackRequest = serde_json::from_str(json).expect("should parse valid JSON");
        assert!(matches!(request.into_validated(), Err(PackRequestValidationError::InvalidContainer(_))));
    }

    #[test]
    fn pack_request_defaults_cargo_quantity_to_one() {
        let json = r#"{
            "container": {"name": "C", "length": 100.0, "width": 50.0, "height": 50.0, "max_weight": 1000.0},
            "cargo": [{"id": "a", "name": "A", "length": 10.0, "width": 10.0, "height": 10.0, "weight": 5.0}]
        }"#;
        let request: PackRequest = serde_json::from_str(json).expect("should parse valid JSON");
        assert_eq!(request.cargo[0].quantity, 1);
    }
}
