use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Team, TeamInput, TeamMember, TeamMemberInput};
use crate::services::non_blank;
use crate::store::TeamStore;
use crate::utils::error::{AppError, AppResult};

const MAX_JERSEY_NUMBER: i32 = 99;

#[derive(Clone)]
pub struct TeamService {
    store: Arc<dyn TeamStore>,
}

impl TeamService {
    pub fn new(store: Arc<dyn TeamStore>) -> Self {
        Self { store }
    }

    pub async fn list_teams(&self) -> AppResult<Vec<Team>> {
        self.store.list_teams().await
    }

    pub async fn create_team(&self, input: TeamInput) -> AppResult<Team> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Team name is required".to_string(),
            ));
        }

        let team = self
            .store
            .insert_team(TeamInput {
                name,
                division: non_blank(input.division),
            })
            .await?;
        tracing::info!(team_id = %team.id, "team created");
        Ok(team)
    }

    pub async fn list_members(&self, team_id: Uuid) -> AppResult<Vec<TeamMember>> {
        self.require_team(team_id).await?;
        self.store.list_members(team_id).await
    }

    pub async fn add_member(&self, team_id: Uuid, input: TeamMemberInput) -> AppResult<TeamMember> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Member name is required".to_string(),
            ));
        }
        if let Some(number) = input.jersey_number {
            if !(0..=MAX_JERSEY_NUMBER).contains(&number) {
                return Err(AppError::ValidationError(format!(
                    "Jersey number must be between 0 and {}",
                    MAX_JERSEY_NUMBER
                )));
            }
        }

        self.require_team(team_id).await?;

        let member = self
            .store
            .insert_member(
                team_id,
                TeamMemberInput {
                    name,
                    email: non_blank(input.email),
                    position: non_blank(input.position),
                    jersey_number: input.jersey_number,
                },
            )
            .await?;
        tracing::info!(team_id = %team_id, member_id = %member.id, "team member added");
        Ok(member)
    }

    pub async fn remove_member(&self, team_id: Uuid, member_id: Uuid) -> AppResult<()> {
        if !self.store.delete_member(team_id, member_id).await? {
            return Err(AppError::NotFound(format!(
                "Member '{}' is not on team '{}'",
                member_id, team_id
            )));
        }
        tracing::info!(team_id = %team_id, member_id = %member_id, "team member removed");
        Ok(())
    }

    async fn require_team(&self, team_id: Uuid) -> AppResult<Team> {
        self.store
            .get_team(team_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team '{}' was not found", team_id)))
    }
}
