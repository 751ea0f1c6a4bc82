use crate::api_error::ApiError;
use crate::db::DbPool;
use crate::models::player::*;
use crate::repository::player_repository;
use tracing::info;
use validator::Validate;

/// Player registry.
pub struct PlayerService {
    db_pool: DbPool,
}

impl PlayerService {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }

    pub async fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        let mut conn = self.db_pool.acquire().await?;
        Ok(player_repository::find_all(&mut conn).await?)
    }

    pub async fn create_player(&self, req: CreatePlayerRequest) -> Result<Player, ApiError> {
        req.validate()?;

        let mut tx = self.db_pool.begin().await?;
        let player = player_repository::insert(&mut tx, &req).await?;
        tx.commit().await?;

        info!(player_id = player.id, name = %player.name, "Player registered");
        Ok(player)
    }

    pub async fn update_player(
        &self,
        player_id: i32,
        req: UpdatePlayerRequest,
    ) -> Result<Player, ApiError> {
        req.validate()?;

        let mut tx = self.db_pool.begin().await?;

        let mut player = player_repository::find_by_id(&mut tx, player_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Player not found"))?;

        req.apply(&mut player);
        let player = player_repository::update(&mut tx, &player).await?;
        tx.commit().await?;

        info!(player_id = player.id, "Player updated");
        Ok(player)
    }

    /// Remove a player. Memberships go with it; matchup slots that named the
    /// player are cleared by the schema.
    pub async fn delete_player(&self, player_id: i32) -> Result<MessageResponse, ApiError> {
        let mut tx = self.db_pool.begin().await?;

        let deleted = player_repository::delete(&mut tx, player_id).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("Player not found"));
        }
        tx.commit().await?;

        info!(player_id = player_id, "Player deleted");
        Ok(MessageResponse::new(
            "Player removed from the registry successfully",
        ))
    }
}
