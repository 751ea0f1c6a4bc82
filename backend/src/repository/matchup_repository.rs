use sqlx::PgConnection;

use crate::models::matchup::{Matchup, MatchupStatus, NewMatchup, RoundProgress};

const COLUMNS: &str = "id, bracket_id, round, player1_id, player2_id, \
                       player1_partner_id, player2_partner_id, winner_id, score, status";

pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<Matchup>, sqlx::Error> {
    sqlx::query_as::<_, Matchup>(&format!("SELECT {} FROM matchup ORDER BY id", COLUMNS))
        .fetch_all(conn)
        .await
}

pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<Matchup>, sqlx::Error> {
    sqlx::query_as::<_, Matchup>(&format!("SELECT {} FROM matchup WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// All matchups of a bracket, ordered by round then id.
pub async fn find_by_bracket(
    conn: &mut PgConnection,
    bracket_id: i32,
) -> Result<Vec<Matchup>, sqlx::Error> {
    sqlx::query_as::<_, Matchup>(&format!(
        "SELECT {} FROM matchup WHERE bracket_id = $1 ORDER BY round NULLS LAST, id",
        COLUMNS
    ))
    .bind(bracket_id)
    .fetch_all(conn)
    .await
}

pub async fn insert(conn: &mut PgConnection, matchup: &NewMatchup) -> Result<Matchup, sqlx::Error> {
    sqlx::query_as::<_, Matchup>(&format!(
        r#"
        INSERT INTO matchup (
            bracket_id, round, player1_id, player2_id,
            player1_partner_id, player2_partner_id, winner_id, score, status
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9
        )
        RETURNING {}
        "#,
        COLUMNS
    ))
    .bind(matchup.bracket_id)
    .bind(matchup.round)
    .bind(matchup.player1_id)
    .bind(matchup.player2_id)
    .bind(matchup.player1_partner_id)
    .bind(matchup.player2_partner_id)
    .bind(matchup.winner_id)
    .bind(&matchup.score)
    .bind(matchup.status)
    .fetch_one(conn)
    .await
}

/// Persist every mutable column of an existing matchup.
pub async fn update(conn: &mut PgConnection, matchup: &Matchup) -> Result<Matchup, sqlx::Error> {
    sqlx::query_as::<_, Matchup>(&format!(
        r#"
        UPDATE matchup
        SET player1_id = $1,
            player2_id = $2,
            player1_partner_id = $3,
            player2_partner_id = $4,
            winner_id = $5,
            score = $6,
            status = $7
        WHERE id = $8
        RETURNING {}
        "#,
        COLUMNS
    ))
    .bind(matchup.player1_id)
    .bind(matchup.player2_id)
    .bind(matchup.player1_partner_id)
    .bind(matchup.player2_partner_id)
    .bind(matchup.winner_id)
    .bind(&matchup.score)
    .bind(matchup.status)
    .bind(matchup.id)
    .fetch_one(conn)
    .await
}

pub async fn delete_by_bracket(conn: &mut PgConnection, bracket_id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM matchup WHERE bracket_id = $1")
        .bind(bracket_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// PLANNING and COMPLETED counts for one round of a bracket.
pub async fn round_progress(
    conn: &mut PgConnection,
    bracket_id: i32,
    round: i32,
) -> Result<RoundProgress, sqlx::Error> {
    sqlx::query_as::<_, RoundProgress>(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE status = $3) AS planning,
            COUNT(*) FILTER (WHERE status = $4) AS completed
        FROM matchup
        WHERE bracket_id = $1 AND round = $2
        "#,
    )
    .bind(bracket_id)
    .bind(round)
    .bind(MatchupStatus::Planning)
    .bind(MatchupStatus::Completed)
    .fetch_one(conn)
    .await
}

/// First round after `round` that holds any matchup of the bracket.
pub async fn next_round_after(
    conn: &mut PgConnection,
    bracket_id: i32,
    round: i32,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<i32>>(
        "SELECT MIN(round) FROM matchup WHERE bracket_id = $1 AND round > $2",
    )
    .bind(bracket_id)
    .bind(round)
    .fetch_one(conn)
    .await
}

/// Smallest round number of the bracket, if any matchup has one.
pub async fn first_round(conn: &mut PgConnection, bracket_id: i32) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<i32>>("SELECT MIN(round) FROM matchup WHERE bracket_id = $1")
        .bind(bracket_id)
        .fetch_one(conn)
        .await
}

/// Move every PENDING matchup of a round to PLANNING. Rows already past
/// PENDING are left alone.
pub async fn open_round(conn: &mut PgConnection, bracket_id: i32, round: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE matchup
        SET status = $1
        WHERE bracket_id = $2 AND round = $3 AND status = $4
        "#,
    )
    .bind(MatchupStatus::Planning)
    .bind(bracket_id)
    .bind(round)
    .bind(MatchupStatus::Pending)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
