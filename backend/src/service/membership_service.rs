use crate::api_error::ApiError;
use crate::db::DbPool;
use crate::models::membership::*;
use crate::models::player::{MessageResponse, Player};
use crate::repository::{membership_repository, player_repository, tournament_repository};
use tracing::info;
use validator::Validate;

/// Tournament registrations.
pub struct MembershipService {
    db_pool: DbPool,
}

impl MembershipService {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }

    pub async fn list_tournament_players(&self) -> Result<Vec<TournamentPlayer>, ApiError> {
        let mut conn = self.db_pool.acquire().await?;
        Ok(membership_repository::find_all_tournament_players(&mut conn).await?)
    }

    /// Register several players at once. Either every player is added or none is.
    pub async fn add_tournament_players(
        &self,
        req: AddTournamentPlayersRequest,
    ) -> Result<Vec<TournamentPlayer>, ApiError> {
        req.validate()?;

        let mut tx = self.db_pool.begin().await?;

        tournament_repository::find_by_id(&mut tx, req.tournament_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Tournament not found"))?;

        let mut added = Vec::with_capacity(req.player_ids.len());
        for &player_id in &req.player_ids {
            player_repository::find_by_id(&mut tx, player_id)
                .await?
                .ok_or_else(|| ApiError::not_found(format!("Player {} not found", player_id)))?;

            if membership_repository::find_tournament_player(&mut tx, req.tournament_id, player_id)
                .await?
                .is_some()
            {
                return Err(ApiError::conflict(format!(
                    "Player {} is already in the tournament",
                    player_id
                )));
            }

            added.push(
                membership_repository::insert_tournament_player(&mut tx, req.tournament_id, player_id)
                    .await?,
            );
        }

        tx.commit().await?;

        info!(
            tournament_id = req.tournament_id,
            added = added.len(),
            "Players registered in tournament"
        );
        Ok(added)
    }

    pub async fn tournament_roster(&self, tournament_id: i32) -> Result<Vec<Player>, ApiError> {
        let mut conn = self.db_pool.acquire().await?;

        let players = membership_repository::tournament_roster(&mut conn, tournament_id).await?;
        if players.is_empty() {
            return Err(ApiError::not_found("No players found for the given tournament"));
        }
        Ok(players)
    }

    pub async fn remove_tournament_player(
        &self,
        tournament_id: i32,
        player_id: i32,
    ) -> Result<MessageResponse, ApiError> {
        let mut tx = self.db_pool.begin().await?;

        let deleted =
            membership_repository::delete_tournament_player(&mut tx, tournament_id, player_id).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("Player not found in the tournament"));
        }
        tx.commit().await?;

        info!(
            tournament_id = tournament_id,
            player_id = player_id,
            "Player removed from tournament"
        );
        Ok(MessageResponse::new(
            "Player removed from the tournament successfully",
        ))
    }
}
