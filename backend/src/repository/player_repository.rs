use sqlx::PgConnection;

use crate::models::player::{CreatePlayerRequest, Player};

pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>("SELECT id, name, gender, phone_number FROM player ORDER BY id")
        .fetch_all(conn)
        .await
}

pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>("SELECT id, name, gender, phone_number FROM player WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_ids(conn: &mut PgConnection, ids: &[i32]) -> Result<Vec<Player>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, Player>(
        "SELECT id, name, gender, phone_number FROM player WHERE id = ANY($1) ORDER BY id",
    )
    .bind(ids)
    .fetch_all(conn)
    .await
}

pub async fn insert(conn: &mut PgConnection, req: &CreatePlayerRequest) -> Result<Player, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"
        INSERT INTO player (name, gender, phone_number)
        VALUES ($1, $2, $3)
        RETURNING id, name, gender, phone_number
        "#,
    )
    .bind(&req.name)
    .bind(&req.gender)
    .bind(&req.phone_number)
    .fetch_one(conn)
    .await
}

pub async fn update(conn: &mut PgConnection, player: &Player) -> Result<Player, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"
        UPDATE player
        SET name = $1, gender = $2, phone_number = $3
        WHERE id = $4
        RETURNING id, name, gender, phone_number
        "#,
    )
    .bind(&player.name)
    .bind(&player.gender)
    .bind(&player.phone_number)
    .bind(player.id)
    .fetch_one(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM player WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
