// SPDX-License-Identifier: MIT

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, Sse},
    routing::{delete, get, patch, post},
    Json, Router,
};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::forms::condition::{hidden_fields, visible_fields};
use crate::forms::registry::FormRegistry;
use crate::forms::response::ResponseSet;
use crate::forms::schema::{validate_form, FieldDefinition, FormDefinition};
use crate::forms::source::{FormSource, FsFormSource};
use crate::forms::submission::check_submission;

#[derive(Clone)]
struct AppState {
    registry: FormRegistry,
    sessions: Arc<RwLock<HashMap<String, PreviewSession>>>,
}

/// A live preview of one form: current answers plus a channel that fans the
/// latest visibility out to any open event streams.
struct PreviewSession {
    form: Arc<FormDefinition>,
    answers: ResponseSet,
    notify: watch::Sender<VisibilitySnapshot>,
}

/// Which fields a respondent would currently see
#[derive(Debug, Clone, Serialize)]
struct VisibilitySnapshot {
    visible: Vec<String>,
    hidden: Vec<String>,
}

fn snapshot_of(form: &FormDefinition, answers: &ResponseSet) -> VisibilitySnapshot {
    let ids = |fields: Vec<&FieldDefinition>| -> Vec<String> {
        fields.into_iter().map(|field| field.id.clone()).collect()
    };
    VisibilitySnapshot {
        visible: ids(visible_fields(&form.fields, &form.conditions, answers)),
        hidden: ids(hidden_fields(&form.fields, &form.conditions, answers)),
    }
}

pub async fn serve(
    port: u16,
    forms_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = FormRegistry::new();
    let source = FsFormSource::new(&forms_dir);
    let count = registry.load_from(&source).await?;
    log::info!("Loaded {} form(s) from {:?}", count, forms_dir);

    let state = AppState {
        registry,
        sessions: Arc::new(RwLock::new(HashMap::new())),
    };

    let app = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/forms", get(list_forms))
        .route("/api/forms/validate", post(validate_definition))
        .route("/api/forms/{id}", get(get_form))
        .route("/api/forms/{id}/visibility", post(check_visibility))
        .route("/api/forms/{id}/submission", post(check_answers))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}/answers", patch(patch_answers))
        .route("/api/sessions/{id}/events", get(session_events))
        .route("/api/sessions/{id}", delete(close_session))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_forms(State(state): State<AppState>) -> Json<Value> {
    match state.registry.list().await {
        Ok(summaries) => Json(json!(summaries)),
        Err(e) => Json(json!({"error": e.to_string()})),
    }
}

async fn get_form(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    let Some(form) = state.registry.get(&id).await else {
        return Json(json!({"error": "Form not found"}));
    };
    match serde_json::to_value(form.as_ref()) {
        Ok(def) => Json(def),
        Err(e) => Json(json!({"error": e.to_string()})),
    }
}

/// Validate a definition document without registering it
async fn validate_definition(Json(body): Json<Value>) -> Json<Value> {
    let mut def: FormDefinition = match serde_json::from_value(body) {
        Ok(def) => def,
        Err(e) => return Json(json!({"error": format!("Invalid definition: {}", e)})),
    };
    def.normalize();

    let violations = validate_form(&def);
    Json(json!({
        "valid": violations.is_empty(),
        "violations": violations.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
    }))
}

/// Evaluate visibility for a one-off set of answers
async fn check_visibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let Some(form) = state.registry.get(&id).await else {
        return Json(json!({"error": "Form not found"}));
    };
    let answers = match ResponseSet::from_json(&body) {
        Ok(answers) => answers,
        Err(e) => return Json(json!({"error": e.to_string()})),
    };
    let snapshot = snapshot_of(&form, &answers);
    Json(json!({ "visible": snapshot.visible, "hidden": snapshot.hidden }))
}

/// Check a submission against the form, reporting per-field issues
async fn check_answers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let Some(form) = state.registry.get(&id).await else {
        return Json(json!({"error": "Form not found"}));
    };
    let answers = match ResponseSet::from_json(&body) {
        Ok(answers) => answers,
        Err(e) => return Json(json!({"error": e.to_string()})),
    };
    let report = check_submission(&form, &answers);
    Json(json!({
        "valid": report.is_ok(),
        "issues": report
            .issues
            .iter()
            .map(|flagged| {
                json!({
                    "field_id": flagged.field_id,
                    "message": flagged.issue.to_string(),
                })
            })
            .collect::<Vec<_>>(),
    }))
}

#[derive(Deserialize)]
struct CreateSessionRequest {
    form_id: String,
}

async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Json<Value> {
    let Some(form) = state.registry.get(&payload.form_id).await else {
        return Json(json!({"error": "Form not found"}));
    };

    let answers = ResponseSet::new();
    let snapshot = snapshot_of(&form, &answers);
    let (notify, _) = watch::channel(snapshot.clone());

    let session_id = uuid::Uuid::new_v4().to_string();
    let session = PreviewSession {
        form,
        answers,
        notify,
    };
    state
        .sessions
        .write()
        .await
        .insert(session_id.clone(), session);

    log::info!(
        "Opened preview session {} for form '{}'",
        session_id,
        payload.form_id
    );
    Json(json!({
        "session_id": session_id,
        "visible": snapshot.visible,
        "hidden": snapshot.hidden,
    }))
}

/// Merge an answer patch into a session. A `null` value clears that answer.
async fn patch_answers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let Some(patch) = body.as_object() else {
        return Json(json!({"error": "Answer patch must be a JSON object"}));
    };

    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(&id) else {
        return Json(json!({"error": "Session not found"}));
    };

    if let Err(e) = session.answers.apply_patch(patch) {
        return Json(json!({"error": e.to_string()}));
    }

    let snapshot = snapshot_of(&session.form, &session.answers);
    // send_replace stores the snapshot even while no event stream is open,
    // so a subscriber that connects later still starts from the latest state.
    session.notify.send_replace(snapshot.clone());

    Json(json!({ "visible": snapshot.visible, "hidden": snapshot.hidden }))
}

async fn session_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let sessions = state.sessions.read().await;
    let Some(session) = sessions.get(&id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    let rx = session.notify.subscribe();

    let stream =
        WatchStream::new(rx).map(|snapshot| Ok(Event::default().json_data(snapshot).unwrap()));

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new().interval(std::time::Duration::from_secs(1)),
    ))
}

/// Closing a session drops its sender, which ends any open event streams.
async fn close_session(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    match state.sessions.write().await.remove(&id) {
        Some(_) => Json(json!({"status": "closed"})),
        None => Json(json!({"error": "Session not found"})),
    }
}
