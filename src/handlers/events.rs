use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::handlers::parse_id;
use crate::models::{EventInput, RegistrationInput};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, success};

pub async fn list_events(State(state): State<AppState>) -> AppResult<Response> {
    let events = state.events.list().await?;
    Ok(success(events, "Events retrieved").into_response())
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let event = state.events.get(parse_id(&id, "event")?).await?;
    Ok(success(event, "Event retrieved").into_response())
}

pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> AppResult<Response> {
    let Json(input) = payload?;
    let event = state.events.create(input).await?;
    Ok(created(event, "Event created").into_response())
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> AppResult<Response> {
    let id = parse_id(&id, "event")?;
    let Json(input) = payload?;
    let event = state.events.update(id, input).await?;
    Ok(success(event, "Event updated").into_response())
}

pub async fn backfill_slugs(State(state): State<AppState>) -> AppResult<Response> {
    let report = state.events.backfill_slugs().await?;
    let message = format!(
        "Assigned {} slug(s), {} failed",
        report.updated.len(),
        report.failed.len()
    );
    Ok(success(report, message).into_response())
}

pub async fn list_registrations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let registrations = state
        .registrations
        .list_for_event(parse_id(&id, "event")?)
        .await?;
    Ok(success(registrations, "Registrations retrieved").into_response())
}

pub async fn get_public_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let event = state.events.get_public_by_slug(&slug).await?;
    Ok(success(event, "Event retrieved").into_response())
}

/// Public sign-up form. Only events reachable by shareable link accept it.
pub async fn register_for_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    payload: Result<Json<RegistrationInput>, JsonRejection>,
) -> AppResult<Response> {
    let Json(input) = payload?;
    let event = state.events.get_public_by_slug(&slug).await?;
    let registration = state.registrations.register(event.id, input).await?;
    Ok(created(registration, "Registration received").into_response())
}
