use crate::api_error::ApiError;
use crate::db::DbPool;
use crate::models::tournament::*;
use crate::repository::tournament_repository;
use tracing::info;
use validator::Validate;

pub struct TournamentService {
    db_pool: DbPool,
}

impl TournamentService {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }

    /// Tournaments in PLANNING or IN_PROGRESS; finished ones are not listed.
    pub async fn list_active_tournaments(&self) -> Result<Vec<Tournament>, ApiError> {
        let mut conn = self.db_pool.acquire().await?;
        Ok(tournament_repository::find_active(&mut conn).await?)
    }

    pub async fn create_tournament(
        &self,
        req: CreateTournamentRequest,
    ) -> Result<Tournament, ApiError> {
        req.validate()?;

        let mut tx = self.db_pool.begin().await?;
        let tournament = tournament_repository::insert(&mut tx, &req).await?;
        tx.commit().await?;

        info!(
            tournament_id = tournament.id,
            name = %tournament.name,
            format = %tournament.format,
            status = %tournament.status,
            "Tournament created"
        );
        Ok(tournament)
    }

    pub async fn update_tournament(
        &self,
        tournament_id: i32,
        req: UpdateTournamentRequest,
    ) -> Result<Tournament, ApiError> {
        req.validate()?;

        let mut tx = self.db_pool.begin().await?;

        let mut tournament = tournament_repository::find_by_id(&mut tx, tournament_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Tournament not found"))?;

        req.apply(&mut tournament);
        let tournament = tournament_repository::update(&mut tx, &tournament).await?;
        tx.commit().await?;

        info!(
            tournament_id = tournament.id,
            status = %tournament.status,
            "Tournament updated"
        );
        Ok(tournament)
    }
}
