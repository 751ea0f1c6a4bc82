use crate::api_error::ApiError;
use crate::db::DbPool;
use crate::models::bracket::*;
use crate::models::membership::BracketPlayer;
use crate::models::player::Player;
use crate::repository::{bracket_repository, membership_repository, player_repository, tournament_repository};
use tracing::{debug, info};
use validator::Validate;

/// Brackets and their rosters.
pub struct BracketService {
    db_pool: DbPool,
}

impl BracketService {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }

    pub async fn list_brackets(&self) -> Result<Vec<Bracket>, ApiError> {
        let mut conn = self.db_pool.acquire().await?;
        Ok(bracket_repository::find_all(&mut conn).await?)
    }

    pub async fn create_bracket(&self, req: CreateBracketRequest) -> Result<Bracket, ApiError> {
        req.validate()?;

        let mut tx = self.db_pool.begin().await?;

        tournament_repository::find_by_id(&mut tx, req.tournament_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Tournament not found"))?;

        let bracket = bracket_repository::insert(&mut tx, &req).await?;
        tx.commit().await?;

        info!(
            bracket_id = bracket.id,
            tournament_id = bracket.tournament_id,
            name = %bracket.name,
            "Bracket created"
        );
        Ok(bracket)
    }

    /// Brackets of one tournament. An unknown tournament yields an empty list.
    pub async fn tournament_brackets(&self, tournament_id: i32) -> Result<Vec<Bracket>, ApiError> {
        let mut conn = self.db_pool.acquire().await?;
        Ok(bracket_repository::find_by_tournament(&mut conn, tournament_id).await?)
    }

    pub async fn bracket_roster(&self, bracket_id: i32) -> Result<Vec<Player>, ApiError> {
        let mut conn = self.db_pool.acquire().await?;

        bracket_repository::find_by_id(&mut conn, bracket_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Bracket not found"))?;

        let roster = membership_repository::bracket_roster(&mut conn, bracket_id).await?;
        debug!(bracket_id = bracket_id, players = roster.len(), "Bracket roster loaded");
        Ok(roster)
    }

    /// Add a player to a bracket, rejecting duplicates.
    pub async fn add_player(&self, bracket_id: i32, player_id: i32) -> Result<BracketPlayer, ApiError> {
        let mut tx = self.db_pool.begin().await?;

        bracket_repository::find_by_id(&mut tx, bracket_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Bracket not found"))?;

        player_repository::find_by_id(&mut tx, player_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Player not found"))?;

        if membership_repository::find_bracket_player(&mut tx, bracket_id, player_id)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict("Player is already in the bracket"));
        }

        let membership = membership_repository::insert_bracket_player(&mut tx, bracket_id, player_id).await?;
        tx.commit().await?;

        info!(
            bracket_id = bracket_id,
            player_id = player_id,
            bracket_player_id = membership.id,
            "Player added to bracket"
        );
        Ok(membership)
    }

    pub async fn remove_player(&self, bracket_player_id: i32) -> Result<(), ApiError> {
        let mut tx = self.db_pool.begin().await?;

        let deleted = membership_repository::delete_bracket_player(&mut tx, bracket_player_id).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("BracketPlayer not found"));
        }
        tx.commit().await?;

        info!(bracket_player_id = bracket_player_id, "Player removed from bracket");
        Ok(())
    }
}
