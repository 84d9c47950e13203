use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::handlers::parse_id;
use crate::models::{TeamInput, TeamMemberInput};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, empty_success, success};

pub async fn list_teams(State(state): State<AppState>) -> AppResult<Response> {
    let teams = state.teams.list_teams().await?;
    Ok(success(teams, "Teams retrieved").into_response())
}

pub async fn create_team(
    State(state): State<AppState>,
    payload: Result<Json<TeamInput>, JsonRejection>,
) -> AppResult<Response> {
    let Json(input) = payload?;
    let team = state.teams.create_team(input).await?;
    Ok(created(team, "Team created").into_response())
}

pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let members = state.teams.list_members(parse_id(&id, "team")?).await?;
    Ok(success(members, "Roster retrieved").into_response())
}

pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TeamMemberInput>, JsonRejection>,
) -> AppResult<Response> {
    let team_id = parse_id(&id, "team")?;
    let Json(input) = payload?;
    let member = state.teams.add_member(team_id, input).await?;
    Ok(created(member, "Member added").into_response())
}

pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, String)>,
) -> AppResult<Response> {
    state
        .teams
        .remove_member(parse_id(&id, "team")?, parse_id(&member_id, "member")?)
        .await?;
    Ok(empty_success("Member removed").into_response())
}
