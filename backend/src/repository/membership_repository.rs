use sqlx::PgConnection;

use crate::models::membership::{BracketPlayer, TournamentPlayer};
use crate::models::player::Player;

// ===== Tournament membership =====

pub async fn find_all_tournament_players(
    conn: &mut PgConnection,
) -> Result<Vec<TournamentPlayer>, sqlx::Error> {
    sqlx::query_as::<_, TournamentPlayer>(
        "SELECT id, tournament_id, player_id FROM tournament_player ORDER BY id",
    )
    .fetch_all(conn)
    .await
}

pub async fn find_tournament_player(
    conn: &mut PgConnection,
    tournament_id: i32,
    player_id: i32,
) -> Result<Option<TournamentPlayer>, sqlx::Error> {
    sqlx::query_as::<_, TournamentPlayer>(
        r#"
        SELECT id, tournament_id, player_id
        FROM tournament_player
        WHERE tournament_id = $1 AND player_id = $2
        "#,
    )
    .bind(tournament_id)
    .bind(player_id)
    .fetch_optional(conn)
    .await
}

/// Players registered in a tournament, in registration order.
pub async fn tournament_roster(
    conn: &mut PgConnection,
    tournament_id: i32,
) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"
        SELECT p.id, p.name, p.gender, p.phone_number
        FROM tournament_player tp
        JOIN player p ON p.id = tp.player_id
        WHERE tp.tournament_id = $1
        ORDER BY tp.id
        "#,
    )
    .bind(tournament_id)
    .fetch_all(conn)
    .await
}

pub async fn insert_tournament_player(
    conn: &mut PgConnection,
    tournament_id: i32,
    player_id: i32,
) -> Result<TournamentPlayer, sqlx::Error> {
    sqlx::query_as::<_, TournamentPlayer>(
        r#"
        INSERT INTO tournament_player (tournament_id, player_id)
        VALUES ($1, $2)
        RETURNING id, tournament_id, player_id
        "#,
    )
    .bind(tournament_id)
    .bind(player_id)
    .fetch_one(conn)
    .await
}

pub async fn delete_tournament_player(
    conn: &mut PgConnection,
    tournament_id: i32,
    player_id: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM tournament_player WHERE tournament_id = $1 AND player_id = $2",
    )
    .bind(tournament_id)
    .bind(player_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

// ===== Bracket membership =====

pub async fn find_all_bracket_players(
    conn: &mut PgConnection,
) -> Result<Vec<BracketPlayer>, sqlx::Error> {
    sqlx::query_as::<_, BracketPlayer>(
        "SELECT id, bracket_id, player_id FROM bracket_player ORDER BY id",
    )
    .fetch_all(conn)
    .await
}

pub async fn find_bracket_player(
    conn: &mut PgConnection,
    bracket_id: i32,
    player_id: i32,
) -> Result<Option<BracketPlayer>, sqlx::Error> {
    sqlx::query_as::<_, BracketPlayer>(
        r#"
        SELECT id, bracket_id, player_id
        FROM bracket_player
        WHERE bracket_id = $1 AND player_id = $2
        "#,
    )
    .bind(bracket_id)
    .bind(player_id)
    .fetch_optional(conn)
    .await
}

/// The bracket roster in the order players joined it. Matchup generation
/// relies on this order being stable.
pub async fn bracket_roster(
    conn: &mut PgConnection,
    bracket_id: i32,
) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"
        SELECT p.id, p.name, p.gender, p.phone_number
        FROM bracket_player bp
        JOIN player p ON p.id = bp.player_id
        WHERE bp.bracket_id = $1
        ORDER BY bp.id
        "#,
    )
    .bind(bracket_id)
    .fetch_all(conn)
    .await
}

pub async fn insert_bracket_player(
    conn: &mut PgConnection,
    bracket_id: i32,
    player_id: i32,
) -> Result<BracketPlayer, sqlx::Error> {
    sqlx::query_as::<_, BracketPlayer>(
        r#"
        INSERT INTO bracket_player (bracket_id, player_id)
        VALUES ($1, $2)
        RETURNING id, bracket_id, player_id
        "#,
    )
    .bind(bracket_id)
    .bind(player_id)
    .fetch_one(conn)
    .await
}

pub async fn delete_bracket_player(conn: &mut PgConnection, id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM bracket_player WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
