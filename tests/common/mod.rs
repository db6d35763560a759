//! In-process fake of the REST backend, served by axum on an ephemeral port.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

#[derive(Default)]
pub struct ServerState {
    pub members: Vec<Value>,
    pub suggestions: Vec<Value>,
    pub fail_suggest: bool,
    /// Creates with one of these titles answer 500.
    pub fail_titles: Vec<String>,
    pub created: Mutex<Vec<Value>>,
    pub deleted: Mutex<Vec<i64>>,
    /// (content type, raw body) of every upload
    pub uploads: Mutex<Vec<(String, String)>>,
    pub next_id: AtomicI64,
}

impl ServerState {
    pub fn created(&self) -> Vec<Value> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<i64> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

pub struct FakeServer {
    pub base_url: String,
    pub state: Arc<ServerState>,
}

pub fn membership(id: i64, user_id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "usuario": {
            "id": user_id,
            "nombreUsuario": name,
            "correo": format!("{}@team.io", name),
            "rol": {"id": 2}
        },
        "proyecto": {"id": 1, "nombreProyecto": "Planner"}
    })
}

pub fn suggestion(title: &str, responsible: Option<i64>) -> Value {
    json!({
        "titulo": title,
        "descripcion": format!("{} description", title),
        "fechaFinEstimada": "2099-01-20",
        "prioridad": 3,
        "estadoTareaId": 1,
        "proyectoId": 1,
        "desarrolladorId": responsible,
        "historiaUsuarioId": 5
    })
}

pub async fn spawn(state: ServerState) -> FakeServer {
    let state = Arc::new(state);
    let app = Router::new()
        .route("/usuarioProyecto/proyecto/{id}", get(members))
        .route("/tarea/plan-sprint", post(plan_sprint))
        .route("/tarea", post(create_task))
        .route("/tarea/delete/{id}", delete(delete_task))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeServer {
        base_url: format!("http://{}", addr),
        state,
    }
}

async fn members(
    State(state): State<Arc<ServerState>>,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    if project_id == 404 {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(state.members.clone()))
}

async fn plan_sprint(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Vec<Value>>, (StatusCode, String)> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state
        .uploads
        .lock()
        .unwrap()
        .push((content_type, String::from_utf8_lossy(&body).into_owned()));
    if state.fail_suggest {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "model unavailable".to_string(),
        ));
    }
    Ok(Json(state.suggestions.clone()))
}

async fn create_task(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let title = body["titulo"].as_str().unwrap_or_default().to_string();
    if state.fail_titles.contains(&title) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()));
    }
    let id = 500 + state.next_id.fetch_add(1, Ordering::SeqCst);
    state.created.lock().unwrap().push(body);
    Ok(Json(json!({"id": id, "titulo": title, "estado": {"id": 1}})))
}

async fn delete_task(State(state): State<Arc<ServerState>>, Path(id): Path<i64>) -> StatusCode {
    state.deleted.lock().unwrap().push(id);
    StatusCode::OK
}
