use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Tournament {
    pub id: i32,
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: TournamentFormat,
    pub status: TournamentStatus,
}

/// Scheduling format used when generating a bracket's matchups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "tournament_format", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentFormat {
    RoundRobin,
    Swiss,
}

impl std::fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentFormat::RoundRobin => write!(f, "ROUND_ROBIN"),
            TournamentFormat::Swiss => write!(f, "SWISS"),
        }
    }
}

impl FromStr for TournamentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROUND_ROBIN" => Ok(TournamentFormat::RoundRobin),
            "SWISS" => Ok(TournamentFormat::Swiss),
            other => Err(format!("Invalid format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "tournament_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    Planning,
    InProgress,
    Completed,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::Planning => write!(f, "PLANNING"),
            TournamentStatus::InProgress => write!(f, "IN_PROGRESS"),
            TournamentStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTournamentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: TournamentFormat,
    pub status: TournamentStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTournamentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: Option<TournamentFormat>,
    pub status: Option<TournamentStatus>,
}

impl UpdateTournamentRequest {
    pub fn apply(self, tournament: &mut Tournament) {
        if let Some(name) = self.name {
            tournament.name = name;
        }
        if self.start_date.is_some() {
            tournament.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            tournament.end_date = self.end_date;
        }
        if let Some(format) = self.format {
            tournament.format = format;
        }
        if let Some(status) = self.status {
            tournament.status = status;
        }
    }
}
