use sqlx::PgConnection;

use crate::models::bracket::{Bracket, CreateBracketRequest};

pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<Bracket>, sqlx::Error> {
    sqlx::query_as::<_, Bracket>("SELECT id, tournament_id, name FROM bracket ORDER BY id")
        .fetch_all(conn)
        .await
}

pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<Bracket>, sqlx::Error> {
    sqlx::query_as::<_, Bracket>("SELECT id, tournament_id, name FROM bracket WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_tournament(
    conn: &mut PgConnection,
    tournament_id: i32,
) -> Result<Vec<Bracket>, sqlx::Error> {
    sqlx::query_as::<_, Bracket>(
        "SELECT id, tournament_id, name FROM bracket WHERE tournament_id = $1 ORDER BY id",
    )
    .bind(tournament_id)
    .fetch_all(conn)
    .await
}

pub async fn insert(conn: &mut PgConnection, req: &CreateBracketRequest) -> Result<Bracket, sqlx::Error> {
    sqlx::query_as::<_, Bracket>(
        r#"
        INSERT INTO bracket (tournament_id, name)
        VALUES ($1, $2)
        RETURNING id, tournament_id, name
        "#,
    )
    .bind(req.tournament_id)
    .bind(&req.name)
    .fetch_one(conn)
    .await
}
