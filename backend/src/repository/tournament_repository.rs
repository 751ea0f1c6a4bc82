use sqlx::PgConnection;

use crate::models::tournament::{CreateTournamentRequest, Tournament, TournamentStatus};

const COLUMNS: &str = "id, name, start_date, end_date, format, status";

pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<Tournament>, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(&format!("SELECT {} FROM tournament ORDER BY id", COLUMNS))
        .fetch_all(conn)
        .await
}

/// Tournaments that are still being planned or played.
pub async fn find_active(conn: &mut PgConnection) -> Result<Vec<Tournament>, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(&format!(
        "SELECT {} FROM tournament WHERE status IN ($1, $2) ORDER BY id",
        COLUMNS
    ))
    .bind(TournamentStatus::Planning)
    .bind(TournamentStatus::InProgress)
    .fetch_all(conn)
    .await
}

pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<Tournament>, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(&format!("SELECT {} FROM tournament WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn insert(
    conn: &mut PgConnection,
    req: &CreateTournamentRequest,
) -> Result<Tournament, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(&format!(
        r#"
        INSERT INTO tournament (name, start_date, end_date, format, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        COLUMNS
    ))
    .bind(&req.name)
    .bind(&req.start_date)
    .bind(&req.end_date)
    .bind(req.format)
    .bind(req.status)
    .fetch_one(conn)
    .await
}

pub async fn update(conn: &mut PgConnection, tournament: &Tournament) -> Result<Tournament, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(&format!(
        r#"
        UPDATE tournament
        SET name = $1, start_date = $2, end_date = $3, format = $4, status = $5
        WHERE id = $6
        RETURNING {}
        "#,
        COLUMNS
    ))
    .bind(&tournament.name)
    .bind(&tournament.start_date)
    .bind(&tournament.end_date)
    .bind(tournament.format)
    .bind(tournament.status)
    .bind(tournament.id)
    .fetch_one(conn)
    .await
}
