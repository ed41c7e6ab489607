// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use live::{LiveEvent, SaveNotifier, handle_live};
use onboard::{
    CachedRepository, CoreError, HydrationInputs, PreferenceFormState, PreferenceReconciler,
    QueryCache, SaveOperation, SaveReport, load_hydration_inputs,
};
use onboard_domain::{CombinedWorkPreferencesForm, DomainError, Industry, UserId};
use onboard_persistence::{Persistence, PersistenceError, SharedPersistence};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Onboard Server - HTTP server for candidate work preferences
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// Storage, with reads served from the shared query cache.
    repository: Arc<CachedRepository<SharedPersistence>>,
    /// One reconciler per user, so a user's saves never overlap.
    reconcilers: Arc<Mutex<HashMap<UserId, Arc<PreferenceReconciler>>>>,
    /// Save notifications for open editors.
    notifier: Arc<SaveNotifier>,
}

impl AppState {
    fn new(persistence: Persistence) -> Self {
        Self {
            repository: Arc::new(CachedRepository::new(
                SharedPersistence::new(persistence),
                Arc::new(QueryCache::new()),
            )),
            reconcilers: Arc::new(Mutex::new(HashMap::new())),
            notifier: Arc::new(SaveNotifier::new()),
        }
    }

    async fn reconciler_for(&self, user: &UserId) -> Arc<PreferenceReconciler> {
        let mut reconcilers = self.reconcilers.lock().await;
        Arc::clone(
            reconcilers
                .entry(user.clone())
                .or_insert_with(|| Arc::new(PreferenceReconciler::new())),
        )
    }

    /// Hands back a reconciler taken from [`Self::reconciler_for`]. The entry
    /// is dropped once no request holds it.
    async fn release_reconciler(&self, user: &UserId, reconciler: Arc<PreferenceReconciler>) {
        let mut reconcilers = self.reconcilers.lock().await;
        drop(reconciler);
        let idle: bool = reconcilers
            .get(user)
            .is_some_and(|r| Arc::strong_count(r) == 1 && !r.is_saving());
        if idle {
            reconcilers.remove(user);
            debug!(user = %user, remaining = reconcilers.len(), "Released idle reconciler");
        }
    }

    /// Runs one save to completion, then announces it on success.
    async fn save_and_notify(
        &self,
        user: &UserId,
        form: &CombinedWorkPreferencesForm,
    ) -> Result<SaveReport, CoreError> {
        let reconciler: Arc<PreferenceReconciler> = self.reconciler_for(user).await;
        let result: Result<SaveReport, CoreError> = reconciler
            .save(self.repository.as_ref(), user, form)
            .await;

        match &result {
            Ok(report) => self
                .notifier
                .notify(&LiveEvent::preferences_saved(user, report)),
            Err(_) => warn!(
                user = %user,
                applied = reconciler.last_applied().len(),
                "Save did not complete"
            ),
        }

        self.release_reconciler(user, reconciler).await;
        result
    }
}

/// API response for a successful save.
#[derive(Debug, Clone, Serialize)]
struct SaveWorkPreferencesResponse {
    success: bool,
    /// Writes issued, in order.
    operations: Vec<SaveOperation>,
    /// Junction adds and removes among `operations`.
    collection_changes: usize,
    /// Location rows created for newly picked places.
    inserted_locations: usize,
}

impl From<SaveReport> for SaveWorkPreferencesResponse {
    fn from(report: SaveReport) -> Self {
        Self {
            success: true,
            collection_changes: report.collection_changes(),
            inserted_locations: report.inserted_locations,
            operations: report.operations,
        }
    }
}

/// API response for listing industries.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListIndustriesResponse {
    industries: Vec<Industry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(_) | CoreError::UnknownReference { .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            CoreError::SaveInProgress => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            CoreError::Read(_) | CoreError::Resolution { .. } | CoreError::Write { .. } => {
                error!(error = %err, "Work preferences operation failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Handler for GET `/users/{user_id}/work-preferences` endpoint.
///
/// Loads every source and returns the hydrated form.
async fn handle_get_work_preferences(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CombinedWorkPreferencesForm>, HttpError> {
    let user: UserId = UserId::new(&user_id)?;
    info!(user = %user, "Handling get_work_preferences request");

    let inputs: HydrationInputs = load_hydration_inputs(app_state.repository.as_ref(), &user).await;
    let mut form_state: PreferenceFormState = PreferenceFormState::new();
    form_state.observe(&inputs);

    if let Some(err) = form_state.error() {
        return Err(CoreError::Read(err.clone()).into());
    }

    Ok(Json(form_state.into_form()))
}

/// Handler for PUT `/users/{user_id}/work-preferences` endpoint.
///
/// Reconciles the submitted form against storage.
async fn handle_save_work_preferences(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
    Json(form): Json<CombinedWorkPreferencesForm>,
) -> Result<Json<SaveWorkPreferencesResponse>, HttpError> {
    let user: UserId = UserId::new(&user_id)?;
    info!(user = %user, "Handling save_work_preferences request");

    // Detached so a client hanging up cannot stop the save between writes.
    let save: JoinHandle<Result<SaveReport, CoreError>> =
        tokio::spawn(async move { app_state.save_and_notify(&user, &form).await });
    let report: SaveReport = match save.await {
        Ok(result) => result?,
        Err(e) => {
            error!(error = %e, "Save task failed");
            return Err(HttpError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: String::from("Save task failed"),
            });
        }
    };

    Ok(Json(report.into()))
}

/// Handler for GET `/industries` endpoint.
async fn handle_list_industries(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListIndustriesResponse>, HttpError> {
    info!("Handling list_industries request");

    let industries: Vec<Industry> = app_state.repository.inner().list_industries().await?;

    Ok(Json(ListIndustriesResponse { industries }))
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/users/{user_id}/work-preferences",
            get(handle_get_work_preferences).put(handle_save_work_preferences),
        )
        .route("/industries", get(handle_list_industries))
        .route("/health", get(handle_health))
        .route("/live", get(handle_live))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Onboard Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app: Router = build_router(AppState::new(persistence));

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use onboard::CacheKey;
    use onboard_domain::{Category, FullTimePreferences, IndustryId, LocationRef, PlaceAttributes};
    use tower::ServiceExt;

    fn create_test_app_state() -> AppState {
        AppState::new(Persistence::new_in_memory().unwrap())
    }

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    fn sample_form() -> CombinedWorkPreferencesForm {
        let mut form: CombinedWorkPreferencesForm = CombinedWorkPreferencesForm::default();
        form.full_time.preferences = FullTimePreferences {
            salary_min: Some(90_000),
            salary_max: Some(120_000),
            remote: true,
            ..FullTimePreferences::default()
        };
        form.add_location(
            Category::FullTime,
            LocationRef::from(PlaceAttributes::new("p-lisbon", "Lisbon")),
        );
        form.set_industries(Category::FullTime, &[IndustryId::new(3)]);
        form.add_eligibility(onboard_domain::CountryCode::new("PT").unwrap());
        form.general.timezone = Some(String::from("Europe/Lisbon"));
        form
    }

    fn put_form(user_id: &str, form: &CombinedWorkPreferencesForm) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(format!("/users/{user_id}/work-preferences"))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(form).unwrap()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app: Router = build_router(create_test_app_state());

        let response = app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_new_user_gets_default_form() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(get("/users/alice/work-preferences"))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let form: CombinedWorkPreferencesForm =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(form, CombinedWorkPreferencesForm::default());
    }

    #[tokio::test]
    async fn test_saved_form_is_returned_by_next_load() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .clone()
            .oneshot(put_form("alice", &sample_form()))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let saved: serde_json::Value = body_json(response).await;
        assert_eq!(saved["success"], true);
        assert_eq!(saved["inserted_locations"], 1);
        assert_eq!(saved["collection_changes"], 3);

        let response = app
            .oneshot(get("/users/alice/work-preferences"))
            .await
            .unwrap();
        let form: CombinedWorkPreferencesForm =
            serde_json::from_value(body_json(response).await).unwrap();

        assert_eq!(form.full_time.preferences.salary_min, Some(90_000));
        assert_eq!(form.full_time.industries, vec![IndustryId::new(3)]);
        assert_eq!(form.general.timezone.as_deref(), Some("Europe/Lisbon"));
        let lisbon: &LocationRef = &form.full_time.locations[0];
        assert!(lisbon.id().is_some());
        assert_eq!(lisbon.place().map(|p| p.name.as_str()), Some("Lisbon"));
    }

    #[tokio::test]
    async fn test_resubmitting_loaded_form_changes_nothing() {
        let app: Router = build_router(create_test_app_state());
        app.clone()
            .oneshot(put_form("alice", &sample_form()))
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(get("/users/alice/work-preferences"))
            .await
            .unwrap();
        let loaded: CombinedWorkPreferencesForm =
            serde_json::from_value(body_json(response).await).unwrap();

        let response = app.oneshot(put_form("alice", &loaded)).await.unwrap();

        let saved: serde_json::Value = body_json(response).await;
        assert_eq!(saved["collection_changes"], 0);
        assert_eq!(saved["inserted_locations"], 0);
    }

    #[tokio::test]
    async fn test_invalid_form_returns_unprocessable_entity() {
        let app: Router = build_router(create_test_app_state());
        let mut form: CombinedWorkPreferencesForm = sample_form();
        form.general.timezone = Some(String::from("Mars/Olympus_Mons"));

        let response = app.oneshot(put_form("alice", &form)).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["error"], true);
        assert!(body["message"].as_str().unwrap().contains("Mars/Olympus_Mons"));
    }

    #[tokio::test]
    async fn test_unknown_industry_returns_unprocessable_entity() {
        let app: Router = build_router(create_test_app_state());
        let mut form: CombinedWorkPreferencesForm = CombinedWorkPreferencesForm::default();
        form.set_industries(Category::Fractional, &[IndustryId::new(777)]);

        let response = app.oneshot(put_form("alice", &form)).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = body_json(response).await;
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("add fractional industry 777")
        );
    }

    #[tokio::test]
    async fn test_blank_user_id_returns_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(get("/users/%20/work-preferences"))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_industries() {
        let app: Router = build_router(create_test_app_state());

        let response = app.oneshot(get("/industries")).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: ListIndustriesResponse =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(body.industries.len(), 12);
    }

    #[tokio::test]
    async fn test_save_refreshes_cached_reads() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        app.clone()
            .oneshot(get("/users/alice/work-preferences"))
            .await
            .unwrap();
        assert!(
            app_state
                .repository
                .cache()
                .contains(CacheKey::WorkEligibility, &alice())
        );

        app.oneshot(put_form("alice", &sample_form())).await.unwrap();

        assert!(
            !app_state
                .repository
                .cache()
                .contains(CacheKey::WorkEligibility, &alice())
        );
    }

    #[tokio::test]
    async fn test_successful_save_is_broadcast() {
        let app_state: AppState = create_test_app_state();
        let mut rx = app_state.notifier.subscribe();
        let app: Router = build_router(app_state);

        app.oneshot(put_form("alice", &sample_form())).await.unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            LiveEvent::PreferencesSaved {
                user_id: alice(),
                collection_changes: 3,
                inserted_locations: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_save_is_not_broadcast() {
        let app_state: AppState = create_test_app_state();
        let mut rx = app_state.notifier.subscribe();
        let app: Router = build_router(app_state);
        let mut form: CombinedWorkPreferencesForm = CombinedWorkPreferencesForm::default();
        form.general.timezone = Some(String::from("Nowhere/Nothing"));

        app.oneshot(put_form("alice", &form)).await.unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_each_user_gets_one_reconciler() {
        let app_state: AppState = create_test_app_state();
        let bob: UserId = UserId::new("bob").unwrap();

        let first: Arc<PreferenceReconciler> = app_state.reconciler_for(&alice()).await;
        let again: Arc<PreferenceReconciler> = app_state.reconciler_for(&alice()).await;
        let other: Arc<PreferenceReconciler> = app_state.reconciler_for(&bob).await;

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[tokio::test]
    async fn test_reconciler_is_released_after_save() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());

        app.clone()
            .oneshot(put_form("alice", &sample_form()))
            .await
            .unwrap();
        app.oneshot(put_form("bob", &CombinedWorkPreferencesForm::default()))
            .await
            .unwrap();

        assert!(app_state.reconcilers.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_reconciler_in_use_is_kept() {
        let app_state: AppState = create_test_app_state();
        let first: Arc<PreferenceReconciler> = app_state.reconciler_for(&alice()).await;
        let second: Arc<PreferenceReconciler> = app_state.reconciler_for(&alice()).await;

        app_state.release_reconciler(&alice(), second).await;
        assert!(app_state.reconcilers.lock().await.contains_key(&alice()));

        app_state.release_reconciler(&alice(), first).await;
        assert!(!app_state.reconcilers.lock().await.contains_key(&alice()));
    }

    #[tokio::test]
    async fn test_save_finishes_after_client_goes_away() {
        let app_state: AppState = create_test_app_state();
        let mut rx = app_state.notifier.subscribe();
        let request = handle_save_work_preferences(
            AxumState(app_state.clone()),
            Path(String::from("alice")),
            Json(sample_form()),
        );

        // Poll the handler once, then drop it while it waits on the save.
        tokio::select! {
            biased;
            _ = request => {}
            () = std::future::ready(()) => {}
        }

        assert_eq!(
            rx.recv().await.unwrap(),
            LiveEvent::PreferencesSaved {
                user_id: alice(),
                collection_changes: 3,
                inserted_locations: 1,
            }
        );
        let response = build_router(app_state)
            .oneshot(get("/users/alice/work-preferences"))
            .await
            .unwrap();
        let form: CombinedWorkPreferencesForm =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(form.general.timezone.as_deref(), Some("Europe/Lisbon"));
    }

    #[test]
    fn test_core_errors_map_to_status_codes() {
        let in_progress: HttpError = CoreError::SaveInProgress.into();
        let write: HttpError = CoreError::Write {
            operation: String::from("add eligibility US"),
            message: String::from("disk full"),
        }
        .into();
        let invalid: HttpError =
            CoreError::Validation(DomainError::InvalidTimezone(String::from("x"))).into();
        let unknown: HttpError = CoreError::UnknownReference {
            operation: String::from("add full_time industry 9"),
            message: String::from("FOREIGN KEY constraint failed"),
        }
        .into();

        assert_eq!(in_progress.status, StatusCode::CONFLICT);
        assert_eq!(write.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(unknown.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
