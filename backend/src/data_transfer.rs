//! Offline maintenance commands: JSON export/import of every table and demo
//! player seeding.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgConnection;
use std::path::Path;
use tracing::{info, warn};

use crate::db::DbPool;
use crate::models::*;
use crate::repository::{
    bracket_repository, matchup_repository, membership_repository, player_repository,
    tournament_repository,
};

const DEMO_NAMES: [&str; 28] = [
    "Danielle Neal",
    "Kane Vincent",
    "Allyson Watkins",
    "Nash Franco",
    "Charleigh Ferguson",
    "Miguel Franco",
    "Charleigh Reid",
    "Josue Chung",
    "Rivka Wiley",
    "Mathew Cisneros",
    "Janelle Hardin",
    "Hassan Russell",
    "Raelynn Hodges",
    "Alonzo Hester",
    "Zendaya Shaffer",
    "Dexter Correa",
    "Valery Holloway",
    "Sutton Dejesus",
    "Julissa Waller",
    "Marley Armstrong",
    "Presley Clark",
    "John Dunn",
    "Olive Hancock",
    "Rex Tanner",
    "Harmoni Mahoney",
    "Kamryn Mejia",
    "Saylor Gill",
    "Matthias Cain",
];

/// Tables whose `id` column is backed by a SERIAL sequence.
const SERIAL_TABLES: [&str; 6] = [
    "tournament",
    "player",
    "bracket",
    "tournament_player",
    "bracket_player",
    "matchup",
];

// =============================================================================
// EXPORT
// =============================================================================

pub async fn export_all(pool: &DbPool, dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;

    let mut conn = pool.acquire().await?;

    write_table(dir, "brackets", &bracket_repository::find_all(&mut conn).await?).await?;
    write_table(dir, "players", &player_repository::find_all(&mut conn).await?).await?;
    write_table(dir, "tournaments", &tournament_repository::find_all(&mut conn).await?).await?;
    write_table(dir, "matchups", &matchup_repository::find_all(&mut conn).await?).await?;
    write_table(
        dir,
        "tournament_players",
        &membership_repository::find_all_tournament_players(&mut conn).await?,
    )
    .await?;
    write_table(
        dir,
        "bracket_players",
        &membership_repository::find_all_bracket_players(&mut conn).await?,
    )
    .await?;

    info!(dir = %dir.display(), "All tables exported");
    Ok(())
}

async fn write_table<T: Serialize>(dir: &Path, table: &str, rows: &[T]) -> anyhow::Result<()> {
    let path = dir.join(format!("{}.json", table));
    let json = serde_json::to_string_pretty(rows)?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    info!(table = table, rows = rows.len(), path = %path.display(), "Table exported");
    Ok(())
}

// =============================================================================
// IMPORT
// =============================================================================

/// Load previously exported tables. Rows keep their ids; parents are inserted
/// before children and the id sequences are moved past the imported rows.
pub async fn import_all(pool: &DbPool, dir: &Path) -> anyhow::Result<()> {
    let tournaments: Vec<Tournament> = read_table(dir, "tournaments").await?;
    let players: Vec<Player> = read_table(dir, "players").await?;
    let brackets: Vec<Bracket> = read_table(dir, "brackets").await?;
    let tournament_players: Vec<TournamentPlayer> = read_table(dir, "tournament_players").await?;
    let bracket_players: Vec<BracketPlayer> = read_table(dir, "bracket_players").await?;
    let matchups: Vec<Matchup> = read_table(dir, "matchups").await?;

    let mut tx = pool.begin().await?;

    for t in &tournaments {
        sqlx::query(
            "INSERT INTO tournament (id, name, start_date, end_date, format, status) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(t.id)
        .bind(&t.name)
        .bind(&t.start_date)
        .bind(&t.end_date)
        .bind(t.format)
        .bind(t.status)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("importing tournament {}", t.id))?;
    }

    for p in &players {
        sqlx::query("INSERT INTO player (id, name, gender, phone_number) VALUES ($1, $2, $3, $4)")
            .bind(p.id)
            .bind(&p.name)
            .bind(&p.gender)
            .bind(&p.phone_number)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("importing player {}", p.id))?;
    }

    for b in &brackets {
        sqlx::query("INSERT INTO bracket (id, tournament_id, name) VALUES ($1, $2, $3)")
            .bind(b.id)
            .bind(b.tournament_id)
            .bind(&b.name)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("importing bracket {}", b.id))?;
    }

    for tp in &tournament_players {
        sqlx::query("INSERT INTO tournament_player (id, tournament_id, player_id) VALUES ($1, $2, $3)")
            .bind(tp.id)
            .bind(tp.tournament_id)
            .bind(tp.player_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("importing tournament_player {}", tp.id))?;
    }

    for bp in &bracket_players {
        sqlx::query("INSERT INTO bracket_player (id, bracket_id, player_id) VALUES ($1, $2, $3)")
            .bind(bp.id)
            .bind(bp.bracket_id)
            .bind(bp.player_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("importing bracket_player {}", bp.id))?;
    }

    for m in &matchups {
        sqlx::query(
            r#"
            INSERT INTO matchup (
                id, bracket_id, round, player1_id, player2_id,
                player1_partner_id, player2_partner_id, winner_id, score, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(m.id)
        .bind(m.bracket_id)
        .bind(m.round)
        .bind(m.player1_id)
        .bind(m.player2_id)
        .bind(m.player1_partner_id)
        .bind(m.player2_partner_id)
        .bind(m.winner_id)
        .bind(&m.score)
        .bind(m.status)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("importing matchup {}", m.id))?;
    }

    for table in SERIAL_TABLES {
        resync_sequence(&mut tx, table).await?;
    }

    tx.commit().await?;

    info!(
        tournaments = tournaments.len(),
        players = players.len(),
        brackets = brackets.len(),
        tournament_players = tournament_players.len(),
        bracket_players = bracket_players.len(),
        matchups = matchups.len(),
        "Import finished"
    );
    Ok(())
}

/// Read `<dir>/<table>.json`. A missing file reads as an empty table.
async fn read_table<T: DeserializeOwned>(dir: &Path, table: &str) -> anyhow::Result<Vec<T>> {
    let path = dir.join(format!("{}.json", table));
    if !tokio::fs::try_exists(&path).await? {
        warn!(path = %path.display(), "Export file missing, skipping");
        return Ok(Vec::new());
    }

    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

async fn resync_sequence(conn: &mut PgConnection, table: &str) -> anyhow::Result<()> {
    // Table names come from SERIAL_TABLES, never from input.
    let sql = format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
         COALESCE((SELECT MAX(id) FROM {table}), 1), \
         (SELECT MAX(id) IS NOT NULL FROM {table}))",
        table = table
    );
    sqlx::query(&sql)
        .execute(conn)
        .await
        .with_context(|| format!("resetting id sequence of {}", table))?;
    Ok(())
}

// =============================================================================
// POPULATE
// =============================================================================

/// The `index`-th demo player (0-based). Names cycle once the list runs out.
pub fn demo_player(index: usize) -> CreatePlayerRequest {
    let base = DEMO_NAMES[index % DEMO_NAMES.len()];
    let cycle = index / DEMO_NAMES.len();
    let name = if cycle == 0 {
        base.to_string()
    } else {
        format!("{} {}", base, cycle + 1)
    };

    CreatePlayerRequest {
        name,
        gender: if index % 2 == 0 { "Male" } else { "Female" }.to_string(),
        phone_number: format!("555-00{:02}", index + 1),
    }
}

pub async fn populate_players(pool: &DbPool, count: usize) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;
    for index in 0..count {
        player_repository::insert(&mut tx, &demo_player(index)).await?;
    }
    tx.commit().await?;

    info!(count = count, "Demo players added");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_demo_players() {
        let first = demo_player(0);
        assert_eq!(first.name, "Danielle Neal");
        assert_eq!(first.gender, "Male");
        assert_eq!(first.phone_number, "555-0001");

        let second = demo_player(1);
        assert_eq!(second.gender, "Female");
        assert_eq!(second.phone_number, "555-0002");

        assert_eq!(demo_player(27).name, "Matthias Cain");
        assert_eq!(demo_player(28).name, "Danielle Neal 2");
    }

    #[test]
    fn test_demo_players_pass_validation() {
        for index in 0..120 {
            assert!(demo_player(index).validate().is_ok(), "index {}", index);
        }
    }

    #[tokio::test]
    async fn test_missing_export_file_reads_empty() {
        let dir = std::env::temp_dir().join("tennis-backend-missing-export");
        let rows: Vec<Player> = read_table(&dir, "players").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_written_table_reads_back() {
        let dir = std::env::temp_dir().join(format!("tennis-backend-export-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let players = vec![Player {
            id: 3,
            name: "Rex Tanner".to_string(),
            gender: "Male".to_string(),
            phone_number: "555-0024".to_string(),
        }];
        write_table(&dir, "players", &players).await.unwrap();

        let read: Vec<Player> = read_table(&dir, "players").await.unwrap();
        assert_eq!(read, players);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
