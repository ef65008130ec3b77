//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use kindred_domain::{
    Category, CategoryGroup, CharacterRecord, Clan, ConceptField, DomainError, Generation,
    PerkDefinition, PerkKind, SessionId, SessionReport, TraitDefinition, Weighting,
};

use crate::app::App;
use crate::use_cases::creation::{CreationError, StartedSession, TraitUpdate, WeightingUpdate};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/catalog", get(get_catalog))
        .route("/api/sessions", post(start_session))
        .route(
            "/api/sessions/{id}",
            get(get_session).delete(cancel_session),
        )
        .route("/api/sessions/{id}/fields/{field}", put(set_field))
        .route("/api/sessions/{id}/clan", put(select_clan))
        .route("/api/sessions/{id}/generation", put(select_generation))
        .route("/api/sessions/{id}/traits/{category}/{key}", put(set_trait))
        .route("/api/sessions/{id}/weightings/{category}", put(set_weighting))
        .route(
            "/api/sessions/{id}/merits/{key}",
            put(select_merit).delete(deselect_merit),
        )
        .route(
            "/api/sessions/{id}/flaws/{key}",
            put(select_flaw).delete(deselect_flaw),
        )
        .route("/api/sessions/{id}/finish", post(finish_session))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryDetails {
    category: Category,
    label: &'static str,
    group: CategoryGroup,
    weighted: bool,
    exchange_rate: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    design_maximum: Option<u32>,
    traits: Vec<TraitDefinition>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClanDetails {
    clan: Clan,
    name: &'static str,
    disciplines: &'static [&'static str],
    weakness: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDetails {
    categories: Vec<CategoryDetails>,
    merits: Vec<PerkDefinition>,
    flaws: Vec<PerkDefinition>,
    clans: Vec<ClanDetails>,
    weightings: [Weighting; 3],
    generations: Vec<u8>,
}

async fn get_catalog(State(app): State<Arc<App>>) -> Json<CatalogDetails> {
    let catalog = &app.catalog;
    let categories = Category::ALL
        .into_iter()
        .map(|category| CategoryDetails {
            category,
            label: category.display_name(),
            group: category.group(),
            weighted: category.is_weighted(),
            exchange_rate: category.exchange_rate(),
            design_maximum: category.fixed_design_maximum(),
            traits: catalog.traits(category).to_vec(),
        })
        .collect();
    let clans = Clan::ALL
        .into_iter()
        .map(|clan| ClanDetails {
            clan,
            name: clan.display_name(),
            disciplines: clan.disciplines(),
            weakness: clan.weakness(),
        })
        .collect();

    Json(CatalogDetails {
        categories,
        merits: catalog.merits().to_vec(),
        flaws: catalog.flaws().to_vec(),
        clans,
        weightings: Weighting::ALL,
        generations: (Generation::MIN..=Generation::MAX).collect(),
    })
}

// =============================================================================
// Sessions
// =============================================================================

#[derive(Debug, Deserialize)]
struct FieldBody {
    value: String,
}

#[derive(Debug, Deserialize)]
struct ClanBody {
    clan: String,
}

#[derive(Debug, Deserialize)]
struct GenerationBody {
    generation: u8,
}

#[derive(Debug, Deserialize)]
struct TraitBody {
    value: i32,
}

#[derive(Debug, Deserialize)]
struct WeightingBody {
    tier: String,
}

async fn start_session(State(app): State<Arc<App>>) -> (StatusCode, Json<StartedSession>) {
    let started = app.use_cases.creation.ops.start();
    (StatusCode::CREATED, Json(started))
}

async fn get_session(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionReport>, ApiError> {
    let report = app
        .use_cases
        .creation
        .ops
        .report(SessionId::from_uuid(id))
        .await?;
    Ok(Json(report))
}

async fn cancel_session(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases.creation.ops.cancel(SessionId::from_uuid(id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_field(
    State(app): State<Arc<App>>,
    Path((id, field)): Path<(Uuid, String)>,
    Json(body): Json<FieldBody>,
) -> Result<Json<SessionReport>, ApiError> {
    let field: ConceptField = field.parse()?;
    let report = app
        .use_cases
        .creation
        .ops
        .set_field(SessionId::from_uuid(id), field, body.value)
        .await?;
    Ok(Json(report))
}

async fn select_clan(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ClanBody>,
) -> Result<Json<SessionReport>, ApiError> {
    let clan: Clan = body.clan.parse()?;
    let report = app
        .use_cases
        .creation
        .ops
        .select_clan(SessionId::from_uuid(id), clan)
        .await?;
    Ok(Json(report))
}

async fn select_generation(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(body): Json<GenerationBody>,
) -> Result<Json<SessionReport>, ApiError> {
    let generation = Generation::new(body.generation)?;
    let report = app
        .use_cases
        .creation
        .ops
        .select_generation(SessionId::from_uuid(id), generation)
        .await?;
    Ok(Json(report))
}

async fn set_trait(
    State(app): State<Arc<App>>,
    Path((id, category, key)): Path<(Uuid, String, String)>,
    Json(body): Json<TraitBody>,
) -> Result<Json<TraitUpdate>, ApiError> {
    let category: Category = category.parse()?;
    let update = app
        .use_cases
        .creation
        .ops
        .set_trait(SessionId::from_uuid(id), category, &key, body.value)
        .await?;
    Ok(Json(update))
}

async fn set_weighting(
    State(app): State<Arc<App>>,
    Path((id, category)): Path<(Uuid, String)>,
    Json(body): Json<WeightingBody>,
) -> Result<Json<WeightingUpdate>, ApiError> {
    let category: Category = category.parse()?;
    let tier: Weighting = body.tier.parse()?;
    let update = app
        .use_cases
        .creation
        .ops
        .set_weighting(SessionId::from_uuid(id), category, tier)
        .await?;
    Ok(Json(update))
}

async fn toggle_perk(
    app: &App,
    id: Uuid,
    kind: PerkKind,
    key: &str,
    selected: bool,
) -> Result<Json<SessionReport>, ApiError> {
    let ops = &app.use_cases.creation.ops;
    let id = SessionId::from_uuid(id);
    let report = if selected {
        ops.select_perk(id, kind, key).await?
    } else {
        ops.deselect_perk(id, kind, key).await?
    };
    Ok(Json(report))
}

async fn select_merit(
    State(app): State<Arc<App>>,
    Path((id, key)): Path<(Uuid, String)>,
) -> Result<Json<SessionReport>, ApiError> {
    toggle_perk(&app, id, PerkKind::Merit, &key, true).await
}

async fn deselect_merit(
    State(app): State<Arc<App>>,
    Path((id, key)): Path<(Uuid, String)>,
) -> Result<Json<SessionReport>, ApiError> {
    toggle_perk(&app, id, PerkKind::Merit, &key, false).await
}

async fn select_flaw(
    State(app): State<Arc<App>>,
    Path((id, key)): Path<(Uuid, String)>,
) -> Result<Json<SessionReport>, ApiError> {
    toggle_perk(&app, id, PerkKind::Flaw, &key, true).await
}

async fn deselect_flaw(
    State(app): State<Arc<App>>,
    Path((id, key)): Path<(Uuid, String)>,
) -> Result<Json<SessionReport>, ApiError> {
    toggle_perk(&app, id, PerkKind::Flaw, &key, false).await
}

async fn finish_session(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CharacterRecord>, ApiError> {
    let record = app
        .use_cases
        .creation
        .ops
        .finish(SessionId::from_uuid(id))
        .await?;
    Ok(Json(record))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Conflict(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(_) | DomainError::Parse(_) | DomainError::OutOfRange { .. } => {
                ApiError::BadRequest(e.to_string())
            }
            DomainError::Constraint(_) | DomainError::InvalidStateTransition(_) => {
                ApiError::Conflict(e.to_string())
            }
        }
    }
}

impl From<CreationError> for ApiError {
    fn from(e: CreationError) -> Self {
        match e {
            CreationError::SessionNotFound(_) => ApiError::NotFound,
            CreationError::UnknownTrait { .. }
            | CreationError::NotWeighted(_)
            | CreationError::UnknownPerk { .. } => ApiError::BadRequest(e.to_string()),
            CreationError::Domain(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::EngineConfig;
    use crate::infrastructure::clock::FixedClock;
    use kindred_domain::TraitCatalog;

    fn router() -> Router {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 31, 23, 0, 0).unwrap());
        let app = App::new(
            &EngineConfig::default(),
            TraitCatalog::masquerade(),
            Arc::new(clock),
        );
        routes().with_state(Arc::new(app))
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn start(router: &Router) -> String {
        let (status, body) = send(router, Method::POST, "/api/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn put_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(router, Method::PUT, uri, Some(body)).await
    }

    mod catalog {
        use super::*;

        #[tokio::test]
        async fn health_is_ok() {
            let response = router()
                .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn catalog_lists_rules() {
            let (status, body) = send(&router(), Method::GET, "/api/catalog", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["categories"].as_array().unwrap().len(), 9);
            assert_eq!(body["categories"][0]["category"], "physical");
            assert_eq!(body["categories"][0]["exchangeRate"], 5);
            assert_eq!(body["categories"][7]["designMaximum"], 4);
            assert_eq!(body["clans"].as_array().unwrap().len(), 14);
            assert_eq!(body["generations"][0], 3);
            assert!(body["merits"]
                .as_array()
                .unwrap()
                .iter()
                .any(|m| m["key"] == "iron_will" && m["cost"] == 3));
        }
    }

    mod sessions {
        use super::*;

        #[tokio::test]
        async fn new_session_report() {
            let router = router();
            let id = start(&router).await;
            let (status, report) = send(&router, Method::GET, &format!("/api/sessions/{id}"), None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(report["generation"], 13);
            assert_eq!(report["freebies"]["max"], 15);
            assert_eq!(report["maxUnlockedStep"], "concept");
            assert_eq!(report["canFinish"], false);
        }

        #[tokio::test]
        async fn unknown_session_is_404() {
            let router = router();
            let uri = format!("/api/sessions/{}", Uuid::new_v4());
            let (status, _) = send(&router, Method::GET, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        #[tokio::test]
        async fn cancel_then_404() {
            let router = router();
            let id = start(&router).await;
            let uri = format!("/api/sessions/{id}");
            let (status, _) = send(&router, Method::DELETE, &uri, None).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
            let (status, _) = send(&router, Method::GET, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        #[tokio::test]
        async fn trait_is_clamped_to_generation_ceiling() {
            let router = router();
            let id = start(&router).await;
            let (status, _) = put_json(
                &router,
                &format!("/api/sessions/{id}/generation"),
                json!({ "generation": 6 }),
            )
            .await;
            assert_eq!(status, StatusCode::OK);

            let (status, body) = put_json(
                &router,
                &format!("/api/sessions/{id}/traits/physical/strength"),
                json!({ "value": 9 }),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["stored"], 7);
        }

        #[tokio::test]
        async fn weighting_swap_reports_repair() {
            let router = router();
            let id = start(&router).await;
            put_json(
                &router,
                &format!("/api/sessions/{id}/weightings/talents"),
                json!({ "tier": "primary" }),
            )
            .await;
            let (status, body) = put_json(
                &router,
                &format!("/api/sessions/{id}/weightings/skills"),
                json!({ "tier": "primary" }),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["repaired"], "talents");
        }

        #[tokio::test]
        async fn bad_input_is_400() {
            let router = router();
            let id = start(&router).await;
            let cases = [
                (format!("/api/sessions/{id}/traits/feats/strength"), json!({ "value": 1 })),
                (format!("/api/sessions/{id}/traits/physical/charm"), json!({ "value": 1 })),
                (format!("/api/sessions/{id}/fields/hometown"), json!({ "value": "Paris" })),
                (format!("/api/sessions/{id}/clan"), json!({ "clan": "Lasombra Antitribu" })),
                (format!("/api/sessions/{id}/generation"), json!({ "generation": 2 })),
                (format!("/api/sessions/{id}/weightings/virtues"), json!({ "tier": "primary" })),
                (format!("/api/sessions/{id}/weightings/mental"), json!({ "tier": "quaternary" })),
            ];
            for (uri, body) in cases {
                let (status, _) = put_json(&router, &uri, body).await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            }
            let (status, _) = send(
                &router,
                Method::PUT,
                &format!("/api/sessions/{id}/merits/dark_secret"),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        #[tokio::test]
        async fn flaws_raise_pool() {
            let router = router();
            let id = start(&router).await;
            let uri = format!("/api/sessions/{id}/flaws/dark_secret");
            let (status, report) = send(&router, Method::PUT, &uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(report["freebies"]["max"], 16);
            assert_eq!(report["flaws"][0], "dark_secret");

            let (_, report) = send(&router, Method::DELETE, &uri, None).await;
            assert_eq!(report["freebies"]["max"], 15);
        }

        #[tokio::test]
        async fn early_finish_is_409() {
            let router = router();
            let id = start(&router).await;
            let (status, _) = send(
                &router,
                Method::POST,
                &format!("/api/sessions/{id}/finish"),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::CONFLICT);
        }
    }

    mod errors {
        use super::*;
        use axum::response::IntoResponse;

        #[test]
        fn domain_errors_map_to_status() {
            let cases = [
                (DomainError::validation("too long"), StatusCode::BAD_REQUEST),
                (DomainError::parse("Unknown clan: x"), StatusCode::BAD_REQUEST),
                (
                    DomainError::out_of_range(Category::Physical, "strength", 9, 1, 5),
                    StatusCode::BAD_REQUEST,
                ),
                (DomainError::constraint("over budget"), StatusCode::CONFLICT),
                (
                    DomainError::invalid_state_transition("not finished"),
                    StatusCode::CONFLICT,
                ),
            ];
            for (error, status) in cases {
                assert_eq!(ApiError::from(error).into_response().status(), status);
            }
        }

        #[test]
        fn missing_session_maps_to_404() {
            let error = CreationError::SessionNotFound(SessionId::new());
            assert_eq!(
                ApiError::from(error).into_response().status(),
                StatusCode::NOT_FOUND
            );
        }
    }

    mod creation {
        use super::*;

        const TRAITS: [(&str, &str, i32); 24] = [
            ("physical", "strength", 2),
            ("physical", "dexterity", 2),
            ("physical", "stamina", 2),
            ("social", "charisma", 3),
            ("social", "manipulation", 4),
            ("social", "appearance", 1),
            ("mental", "perception", 3),
            ("mental", "intelligence", 3),
            ("mental", "wits", 4),
            ("talents", "subterfuge", 4),
            ("talents", "empathy", 3),
            ("talents", "alertness", 2),
            ("skills", "stealth", 5),
            ("skills", "security", 3),
            ("skills", "etiquette", 5),
            ("knowledges", "occult", 3),
            ("knowledges", "investigation", 2),
            ("backgrounds", "contacts", 5),
            ("disciplines", "obfuscate", 2),
            ("disciplines", "animalism", 1),
            ("disciplines", "potence", 1),
            ("virtues", "conscience", 2),
            ("virtues", "self_control", 3),
            ("virtues", "courage", 5),
        ];

        #[tokio::test]
        async fn nosferatu_from_empty_to_record() {
            let router = router();
            let id = start(&router).await;
            let base = format!("/api/sessions/{id}");

            for (field, value) in [
                ("name", "Rat King"),
                ("player", "Robin"),
                ("nature", "Loner"),
                ("demeanor", "Caretaker"),
                ("concept", "Information broker"),
            ] {
                let (status, _) = put_json(&router, &format!("{base}/fields/{field}"), json!({ "value": value })).await;
                assert_eq!(status, StatusCode::OK);
            }
            put_json(&router, &format!("{base}/clan"), json!({ "clan": "nosferatu" })).await;

            for (category, tier) in [
                ("mental", "primary"),
                ("social", "secondary"),
                ("physical", "tertiary"),
                ("skills", "primary"),
                ("talents", "secondary"),
                ("knowledges", "tertiary"),
            ] {
                let (status, _) = put_json(&router, &format!("{base}/weightings/{category}"), json!({ "tier": tier })).await;
                assert_eq!(status, StatusCode::OK);
            }

            for (category, key, value) in TRAITS {
                let (status, _) = put_json(
                    &router,
                    &format!("{base}/traits/{category}/{key}"),
                    json!({ "value": value }),
                )
                .await;
                assert_eq!(status, StatusCode::OK, "{category}/{key}");
            }

            let (_, report) = send(&router, Method::GET, &base, None).await;
            assert_eq!(report["maxUnlockedStep"], "freebies");
            assert_eq!(report["canFinish"], true);

            let (status, record) = send(&router, Method::POST, &format!("{base}/finish"), None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(record["clan"], "nosferatu");
            assert_eq!(record["createdAt"], "2026-01-31T23:00:00Z");
            assert_eq!(record["willpower"], 5);
            assert_eq!(record["roadRating"], 5);
            assert_eq!(record["road"], "Humanity");
            let social = &record["categories"][1];
            assert_eq!(social["category"], "social");
            assert_eq!(social["traits"][2], json!({ "key": "appearance", "value": 0 }));

            let (status, _) = send(&router, Method::GET, &base, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
    }
}
