//! Test doubles shared by the unit tests: an in-process catalog and an HTTP
//! catalog served by axum on a loopback port.

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use shared::{
    domain::{FilmId, TicketId},
    protocol::{Film, FilmPatch, NewTicket, Ticket},
};
use tokio::{
    net::TcpListener,
    sync::{Mutex, MutexGuard},
};

use crate::{
    api::CatalogApi,
    error::{ClientError, Operation, RequestError},
};

pub(crate) fn sample_film(id: i64, title: &str, capacity: u32, tickets_sold: u32) -> Film {
    Film {
        id: FilmId::from(id),
        title: title.to_string(),
        poster: format!("https://posters.test/{id}.jpg"),
        runtime: 95,
        showtime: "07:30PM".to_string(),
        capacity,
        tickets_sold,
        description: format!("{title} on the big screen."),
    }
}

fn rejected(operation: Operation, status: StatusCode) -> ClientError {
    RequestError {
        operation,
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
    }
    .into()
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub films: Vec<Film>,
    pub tickets: Vec<NewTicket>,
    pub calls: Vec<Operation>,
    pub failing: HashSet<Operation>,
}

/// In-process catalog that records every call and fails on demand.
#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub state: Mutex<FakeState>,
}

impl FakeCatalog {
    pub fn with_films(films: Vec<Film>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                films,
                ..FakeState::default()
            }),
        }
    }

    pub fn failing(mut self, operation: Operation) -> Self {
        self.state.get_mut().failing.insert(operation);
        self
    }

    pub async fn calls(&self) -> Vec<Operation> {
        self.state.lock().await.calls.clone()
    }

    pub async fn tickets(&self) -> Vec<NewTicket> {
        self.state.lock().await.tickets.clone()
    }

    pub async fn film(&self, id: i64) -> Option<Film> {
        let id = FilmId::from(id);
        self.state
            .lock()
            .await
            .films
            .iter()
            .find(|film| film.id == id)
            .cloned()
    }

    pub async fn set_failing(&self, operation: Operation, failing: bool) {
        let mut state = self.state.lock().await;
        if failing {
            state.failing.insert(operation);
        } else {
            state.failing.remove(&operation);
        }
    }

    async fn enter(&self, operation: Operation) -> Result<MutexGuard<'_, FakeState>, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(operation);
        if state.failing.contains(&operation) {
            return Err(rejected(operation, StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(state)
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_films(&self) -> Result<Vec<Film>, ClientError> {
        let state = self.enter(Operation::ListFilms).await?;
        Ok(state.films.clone())
    }

    async fn get_film(&self, id: &FilmId) -> Result<Film, ClientError> {
        let state = self.enter(Operation::GetFilm).await?;
        state
            .films
            .iter()
            .find(|film| &film.id == id)
            .cloned()
            .ok_or_else(|| rejected(Operation::GetFilm, StatusCode::NOT_FOUND))
    }

    async fn update_film_fields(
        &self,
        id: &FilmId,
        patch: &FilmPatch,
    ) -> Result<Option<Film>, ClientError> {
        let mut state = self.enter(Operation::UpdateFilm).await?;
        let film = state
            .films
            .iter_mut()
            .find(|film| &film.id == id)
            .ok_or_else(|| rejected(Operation::UpdateFilm, StatusCode::NOT_FOUND))?;
        if let Some(tickets_sold) = patch.tickets_sold {
            film.tickets_sold = tickets_sold;
        }
        if let Some(capacity) = patch.capacity {
            film.capacity = capacity;
        }
        Ok(Some(film.clone()))
    }

    async fn delete_film(&self, id: &FilmId) -> Result<(), ClientError> {
        let mut state = self.enter(Operation::DeleteFilm).await?;
        let before = state.films.len();
        state.films.retain(|film| &film.id != id);
        if state.films.len() == before {
            return Err(rejected(Operation::DeleteFilm, StatusCode::NOT_FOUND));
        }
        Ok(())
    }

    async fn create_ticket(&self, film_id: &FilmId, quantity: u32) -> Result<Ticket, ClientError> {
        let mut state = self.enter(Operation::CreateTicket).await?;
        let request = NewTicket::new(film_id.clone(), quantity)?;
        state.tickets.push(request.clone());
        Ok(Ticket {
            id: Some(TicketId::from(state.tickets.len() as i64)),
            film_id: request.film_id,
            number_of_tickets: request.number_of_tickets,
        })
    }
}

/// State behind the loopback HTTP catalog.
#[derive(Default)]
pub(crate) struct ServerState {
    pub films: Vec<Film>,
    pub tickets: Vec<Value>,
    pub patch_bodies: Vec<Value>,
    pub failing: HashSet<Operation>,
    /// Served verbatim by `GET /films` when set.
    pub raw_films_body: Option<String>,
    /// Answer PATCH with an empty 204 instead of the updated film.
    pub empty_patch_response: bool,
    /// Answer PATCH with this body after applying the change.
    pub raw_patch_body: Option<Value>,
}

pub(crate) type SharedServerState = Arc<Mutex<ServerState>>;

fn failure(state: &ServerState, operation: Operation) -> Option<Response> {
    state
        .failing
        .contains(&operation)
        .then(|| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn handle_list_films(State(state): State<SharedServerState>) -> Response {
    let state = state.lock().await;
    if let Some(response) = failure(&state, Operation::ListFilms) {
        return response;
    }
    match &state.raw_films_body {
        Some(raw) => (
            StatusCode::OK,
            [("content-type", "application/json")],
            raw.clone(),
        )
            .into_response(),
        None => Json(state.films.clone()).into_response(),
    }
}

async fn handle_get_film(
    State(state): State<SharedServerState>,
    Path(id): Path<String>,
) -> Response {
    let state = state.lock().await;
    if let Some(response) = failure(&state, Operation::GetFilm) {
        return response;
    }
    match state.films.iter().find(|film| film.id.to_string() == id) {
        Some(film) => Json(film.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn handle_patch_film(
    State(state): State<SharedServerState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().await;
    if let Some(response) = failure(&state, Operation::UpdateFilm) {
        return response;
    }
    state.patch_bodies.push(body.clone());
    let empty_response = state.empty_patch_response;
    let raw_response = state.raw_patch_body.clone();

    let Some(film) = state.films.iter_mut().find(|film| film.id.to_string() == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Ok(mut merged) = serde_json::to_value(&*film) else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    if let (Some(target), Some(fields)) = (merged.as_object_mut(), body.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    match serde_json::from_value::<Film>(merged) {
        Ok(updated) => *film = updated,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    }

    if empty_response {
        StatusCode::NO_CONTENT.into_response()
    } else if let Some(raw) = raw_response {
        Json(raw).into_response()
    } else {
        Json(film.clone()).into_response()
    }
}

async fn handle_delete_film(
    State(state): State<SharedServerState>,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.lock().await;
    if let Some(response) = failure(&state, Operation::DeleteFilm) {
        return response;
    }
    let before = state.films.len();
    state.films.retain(|film| film.id.to_string() != id);
    if state.films.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::OK.into_response()
}

async fn handle_create_ticket(
    State(state): State<SharedServerState>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = state.lock().await;
    if let Some(response) = failure(&state, Operation::CreateTicket) {
        return response;
    }
    let id = format!("t{}", state.tickets.len() + 1);
    if let Some(fields) = body.as_object_mut() {
        fields.insert("id".to_string(), Value::String(id));
    }
    state.tickets.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Serves a catalog on `127.0.0.1:0` and returns its base URL.
pub(crate) async fn spawn_catalog_server(films: Vec<Film>) -> (String, SharedServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state: SharedServerState = Arc::new(Mutex::new(ServerState {
        films,
        ..ServerState::default()
    }));

    let app = Router::new()
        .route("/films", get(handle_list_films))
        .route(
            "/films/:id",
            get(handle_get_film)
                .patch(handle_patch_film)
                .delete(handle_delete_film),
        )
        .route("/tickets/", post(handle_create_ticket))
        .with_state(Arc::clone(&state));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}"), state)
}
