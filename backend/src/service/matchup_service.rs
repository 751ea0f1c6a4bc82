use crate::api_error::ApiError;
use crate::db::DbPool;
use crate::models::matchup::*;
use crate::models::player::Player;
use crate::models::tournament::TournamentFormat;
use crate::repository::{bracket_repository, matchup_repository, membership_repository, player_repository};
use crate::service::round_robin;
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use validator::Validate;

/// Matchup engine: schedule generation, result recording and round advancement.
///
/// Every public operation runs in its own transaction. Concurrent generations
/// for one bracket, or a generation racing an advancement, are only isolated
/// as far as the database's READ COMMITTED default goes.
#[derive(Clone)]
pub struct MatchupService {
    db_pool: DbPool,
}

impl MatchupService {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }

    // =============================================================================
    // LISTING / CREATION
    // =============================================================================

    pub async fn list_matchups(&self) -> Result<Vec<Matchup>, ApiError> {
        let mut conn = self.db_pool.acquire().await?;
        Ok(matchup_repository::find_all(&mut conn).await?)
    }

    /// Insert a single hand-made matchup.
    pub async fn create_matchup(&self, req: CreateMatchupRequest) -> Result<Matchup, ApiError> {
        req.validate()?;

        let new_matchup = NewMatchup::from(req);
        if !new_matchup.has_valid_winner() {
            return Err(ApiError::validation(
                "winner_id must be one of the matchup's players",
            ));
        }

        let mut tx = self.db_pool.begin().await?;

        bracket_repository::find_by_id(&mut tx, new_matchup.bracket_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Bracket not found"))?;

        let ids: Vec<i32> = [
            new_matchup.player1_id,
            new_matchup.player2_id,
            new_matchup.player1_partner_id,
            new_matchup.player2_partner_id,
        ]
        .into_iter()
        .flatten()
        .collect();
        ensure_players_exist(&mut tx, &ids).await?;

        let matchup = matchup_repository::insert(&mut tx, &new_matchup).await?;
        tx.commit().await?;

        info!(
            matchup_id = matchup.id,
            bracket_id = matchup.bracket_id,
            status = %matchup.status,
            "Matchup created"
        );

        Ok(matchup)
    }

    // =============================================================================
    // GENERATION
    // =============================================================================

    /// Replace a bracket's matchups with a freshly computed schedule.
    ///
    /// The format is checked before anything is read or written, so an
    /// unsupported request never disturbs the existing schedule. The delete,
    /// the inserts and the opening of the first round commit together.
    pub async fn generate_matchups(
        &self,
        req: GenerateMatchupsRequest,
    ) -> Result<Vec<Matchup>, ApiError> {
        let format: TournamentFormat = req
            .format
            .parse()
            .map_err(|_| ApiError::bad_request("Invalid format"))?;

        match format {
            TournamentFormat::RoundRobin => {}
            TournamentFormat::Swiss => {
                warn!(bracket_id = req.bracket_id, "SWISS generation requested");
                return Err(ApiError::not_implemented("SWISS format not implemented yet"));
            }
        }

        let mut tx = self.db_pool.begin().await?;

        bracket_repository::find_by_id(&mut tx, req.bracket_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Bracket not found"))?;

        let roster = membership_repository::bracket_roster(&mut tx, req.bracket_id).await?;
        if roster.is_empty() {
            return Err(ApiError::not_found("No players found in the bracket"));
        }

        let removed = matchup_repository::delete_by_bracket(&mut tx, req.bracket_id).await?;

        let player_ids: Vec<i32> = roster.iter().map(|p| p.id).collect();
        let pairings = round_robin::schedule(&player_ids);

        for pairing in &pairings {
            let new_matchup = NewMatchup::scheduled(
                req.bracket_id,
                pairing.round,
                pairing.player1_id,
                pairing.player2_id,
            );
            matchup_repository::insert(&mut tx, &new_matchup).await?;
        }

        // The first round is playable as soon as the schedule exists.
        if let Some(first) = matchup_repository::first_round(&mut tx, req.bracket_id).await? {
            matchup_repository::open_round(&mut tx, req.bracket_id, first).await?;
        }

        let matchups = matchup_repository::find_by_bracket(&mut tx, req.bracket_id).await?;
        tx.commit().await?;

        info!(
            bracket_id = req.bracket_id,
            format = %format,
            players = roster.len(),
            rounds = round_robin::round_count(roster.len()),
            removed = removed,
            created = matchups.len(),
            "Matchups generated"
        );

        Ok(matchups)
    }

    // =============================================================================
    // RESULT RECORDING
    // =============================================================================

    /// Apply a partial update. When the body carries a status, the matchup's
    /// round is checked for completion in the same transaction.
    pub async fn update_matchup(
        &self,
        matchup_id: i32,
        req: UpdateMatchupRequest,
    ) -> Result<Matchup, ApiError> {
        req.validate()?;

        let mut tx = self.db_pool.begin().await?;

        let mut matchup = matchup_repository::find_by_id(&mut tx, matchup_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Matchup not found"))?;

        let status_changed = req.status.is_some();
        if let Some(to) = req.status {
            validate_transition(&matchup.status, &to)?;
        }

        let previous_status = matchup.status;
        req.apply(&mut matchup);

        if !matchup.has_valid_winner() {
            return Err(ApiError::validation(
                "winner_id must be one of the matchup's players",
            ));
        }

        let ids: Vec<i32> = matchup.referenced_player_ids().collect();
        ensure_players_exist(&mut tx, &ids).await?;

        let matchup = matchup_repository::update(&mut tx, &matchup).await?;

        if status_changed {
            if let Some(round) = matchup.round {
                advance_round(&mut tx, matchup.bracket_id, round).await?;
            }
        }

        tx.commit().await?;

        info!(
            matchup_id = matchup.id,
            bracket_id = matchup.bracket_id,
            from_status = %previous_status,
            to_status = %matchup.status,
            "Matchup updated"
        );

        Ok(matchup)
    }

    // =============================================================================
    // QUERY
    // =============================================================================

    /// Matchups of a bracket narrowed to the active round and requested statuses.
    pub async fn bracket_matchups(
        &self,
        bracket_id: i32,
        query: MatchupQuery,
    ) -> Result<Vec<MatchupDetail>, ApiError> {
        let mut conn = self.db_pool.acquire().await?;

        let matchups = matchup_repository::find_by_bracket(&mut conn, bracket_id).await?;
        let selected = query.select(matchups);

        if selected.is_empty() {
            return Err(ApiError::not_found("No matchups found for the given bracket"));
        }

        let mut ids: Vec<i32> = selected
            .iter()
            .flat_map(|m| m.referenced_player_ids())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let players: HashMap<i32, Player> = player_repository::find_by_ids(&mut conn, &ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        debug!(
            bracket_id = bracket_id,
            returned = selected.len(),
            "Bracket matchups resolved"
        );

        Ok(selected
            .into_iter()
            .map(|m| MatchupDetail::expand(m, &players))
            .collect())
    }
}

/// Validate status transition according to the matchup lifecycle
pub(crate) fn validate_transition(from: &MatchupStatus, to: &MatchupStatus) -> Result<(), ApiError> {
    if !from.can_transition_to(to) {
        return Err(ApiError::bad_request(format!(
            "Invalid status transition from {} to {}",
            from, to
        )));
    }
    Ok(())
}

/// Open the round after `round` once `round` has no PLANNING matchup left.
///
/// A round with no COMPLETED matchup was never played and opens nothing.
/// Only PENDING rows of the next non-empty round are promoted, so calling this
/// again after that round has opened is a no-op. Returns the number of
/// matchups moved to PLANNING.
pub(crate) async fn advance_round(
    conn: &mut PgConnection,
    bracket_id: i32,
    round: i32,
) -> Result<u64, sqlx::Error> {
    let progress = matchup_repository::round_progress(&mut *conn, bracket_id, round).await?;
    if !progress.is_finished() {
        return Ok(0);
    }

    let Some(next) = matchup_repository::next_round_after(&mut *conn, bracket_id, round).await? else {
        debug!(bracket_id = bracket_id, round = round, "Final round finished");
        return Ok(0);
    };

    let opened = matchup_repository::open_round(&mut *conn, bracket_id, next).await?;
    if opened > 0 {
        info!(
            bracket_id = bracket_id,
            finished_round = round,
            opened_round = next,
            matchups = opened,
            "Round advanced"
        );
    }

    Ok(opened)
}

async fn ensure_players_exist(conn: &mut PgConnection, ids: &[i32]) -> Result<(), ApiError> {
    let mut wanted = ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let found = player_repository::find_by_ids(conn, &wanted).await?;
    if found.len() != wanted.len() {
        return Err(ApiError::not_found("Player not found"));
    }
    Ok(())
}
