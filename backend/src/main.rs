use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::signal;

mod api_error;
mod config;
mod data_transfer;
mod db;
mod http;
mod middleware;
mod models;
mod repository;
mod service;
mod telemetry;

use crate::config::Config;
use crate::db::{create_pool, run_migrations, DbPool};
use crate::middleware::cors_middleware;
use crate::service::*;
use crate::telemetry::init_telemetry;

#[derive(Parser, Debug)]
#[command(name = "tennis-backend")]
#[command(version)]
#[command(about = "Tennis tournament backend: players, brackets and round-robin matchups.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Write every table to <dir>/<table>.json
    Export {
        #[arg(short, long, default_value = "exported_data")]
        dir: PathBuf,
    },
    /// Load tables previously written by `export`
    Import {
        #[arg(short, long, default_value = "exported_data")]
        dir: PathBuf,
    },
    /// Seed demo players
    Populate {
        #[arg(short, long, default_value_t = 28)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    init_telemetry(&config.server.rust_log);

    let db_pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, db_pool).await,
        Command::Export { dir } => data_transfer::export_all(&db_pool, &dir).await,
        Command::Import { dir } => data_transfer::import_all(&db_pool, &dir).await,
        Command::Populate { count } => data_transfer::populate_players(&db_pool, count).await,
    }
}

async fn serve(config: &Config, db_pool: DbPool) -> anyhow::Result<()> {
    tracing::info!(
        "Starting tennis backend server on {}:{}",
        config.server.host,
        config.server.port
    );

    let players = web::Data::new(PlayerService::new(db_pool.clone()));
    let tournaments = web::Data::new(TournamentService::new(db_pool.clone()));
    let brackets = web::Data::new(BracketService::new(db_pool.clone()));
    let memberships = web::Data::new(MembershipService::new(db_pool.clone()));
    let matchups = web::Data::new(MatchupService::new(db_pool.clone()));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(players.clone())
            .app_data(tournaments.clone())
            .app_data(brackets.clone())
            .app_data(memberships.clone())
            .app_data(matchups.clone())
            .app_data(http::json_config())
            .app_data(http::query_config())
            .app_data(http::path_config())
            .wrap(cors_middleware())
            .wrap(actix_web::middleware::Logger::default())
            .configure(http::configure_routes)
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run();

    // Graceful shutdown
    let server_handle = server.handle();
    tokio::spawn(async move {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received, stopping server...");
        server_handle.stop(true).await;
    });

    server.await?;
    Ok(())
}
