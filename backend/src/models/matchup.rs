use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use validator::Validate;

use super::player::Player;

/// Matchup status. A matchup moves PENDING -> PLANNING -> COMPLETED and never back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "matchup_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchupStatus {
    Pending,
    Planning,
    Completed,
}

impl MatchupStatus {
    /// Check if transition to another status is valid
    pub fn can_transition_to(&self, to: &MatchupStatus) -> bool {
        match (self, to) {
            (MatchupStatus::Pending, MatchupStatus::Planning) => true,
            (MatchupStatus::Planning, MatchupStatus::Completed) => true,
            // Re-sending the current status is allowed
            (a, b) if a == b => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for MatchupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchupStatus::Pending => write!(f, "PENDING"),
            MatchupStatus::Planning => write!(f, "PLANNING"),
            MatchupStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Matchup {
    pub id: i32,
    pub bracket_id: i32,
    pub round: Option<i32>,
    pub player1_id: Option<i32>,
    pub player2_id: Option<i32>,
    pub player1_partner_id: Option<i32>,
    pub player2_partner_id: Option<i32>,
    pub winner_id: Option<i32>,
    pub score: Option<String>,
    pub status: MatchupStatus,
}

impl Matchup {
    pub fn participant_ids(&self) -> impl Iterator<Item = i32> {
        [
            self.player1_id,
            self.player2_id,
            self.player1_partner_id,
            self.player2_partner_id,
        ]
        .into_iter()
        .flatten()
    }

    /// A winner, when present, must occupy one of the four player slots.
    pub fn has_valid_winner(&self) -> bool {
        match self.winner_id {
            Some(winner) => self.participant_ids().any(|id| id == winner),
            None => true,
        }
    }

    /// Every player id referenced by this matchup, winner included.
    pub fn referenced_player_ids(&self) -> impl Iterator<Item = i32> {
        self.participant_ids().chain(self.winner_id)
    }
}

/// A matchup row that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatchup {
    pub bracket_id: i32,
    pub round: Option<i32>,
    pub player1_id: Option<i32>,
    pub player2_id: Option<i32>,
    pub player1_partner_id: Option<i32>,
    pub player2_partner_id: Option<i32>,
    pub winner_id: Option<i32>,
    pub score: Option<String>,
    pub status: MatchupStatus,
}

impl NewMatchup {
    /// A freshly scheduled singles matchup.
    pub fn scheduled(bracket_id: i32, round: i32, player1_id: i32, player2_id: i32) -> Self {
        Self {
            bracket_id,
            round: Some(round),
            player1_id: Some(player1_id),
            player2_id: Some(player2_id),
            player1_partner_id: None,
            player2_partner_id: None,
            winner_id: None,
            score: None,
            status: MatchupStatus::Pending,
        }
    }

    pub fn has_valid_winner(&self) -> bool {
        match self.winner_id {
            Some(winner) => [
                self.player1_id,
                self.player2_id,
                self.player1_partner_id,
                self.player2_partner_id,
            ]
            .into_iter()
            .flatten()
            .any(|id| id == winner),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMatchupRequest {
    pub bracket_id: i32,
    pub player1_id: i32,
    pub player2_id: i32,
    pub player1_partner_id: Option<i32>,
    pub player2_partner_id: Option<i32>,
    pub winner_id: Option<i32>,
    #[validate(length(max = 50))]
    pub score: Option<String>,
    pub status: MatchupStatus,
    #[validate(range(min = 1))]
    pub round: Option<i32>,
}

impl From<CreateMatchupRequest> for NewMatchup {
    fn from(req: CreateMatchupRequest) -> Self {
        Self {
            bracket_id: req.bracket_id,
            round: req.round,
            player1_id: Some(req.player1_id),
            player2_id: Some(req.player2_id),
            player1_partner_id: req.player1_partner_id,
            player2_partner_id: req.player2_partner_id,
            winner_id: req.winner_id,
            score: req.score,
            status: req.status,
        }
    }
}

/// Partial update for `PUT /matchups/{id}`. An absent field keeps its value;
/// an explicit `null` clears a nullable column.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMatchupRequest {
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub player1_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub player2_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub player1_partner_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub player2_partner_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub winner_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[validate(length(max = 50))]
    pub score: Option<Option<String>>,
    pub status: Option<MatchupStatus>,
}

impl UpdateMatchupRequest {
    pub fn apply(self, matchup: &mut Matchup) {
        if let Some(player1_id) = self.player1_id {
            matchup.player1_id = player1_id;
        }
        if let Some(player2_id) = self.player2_id {
            matchup.player2_id = player2_id;
        }
        if let Some(partner_id) = self.player1_partner_id {
            matchup.player1_partner_id = partner_id;
        }
        if let Some(partner_id) = self.player2_partner_id {
            matchup.player2_partner_id = partner_id;
        }
        if let Some(winner_id) = self.winner_id {
            matchup.winner_id = winner_id;
        }
        if let Some(score) = self.score {
            matchup.score = score;
        }
        if let Some(status) = self.status {
            matchup.status = status;
        }
    }
}

/// A present field, `null` included, becomes `Some(..)`; `#[serde(default)]`
/// leaves an absent one as `None`.
fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Status counts of a single round.
#[derive(Debug, Clone, Copy, Default, FromRow, PartialEq, Eq)]
pub struct RoundProgress {
    pub planning: i64,
    pub completed: i64,
}

impl RoundProgress {
    /// Nothing left in PLANNING and at least one result recorded.
    pub fn is_finished(&self) -> bool {
        self.planning == 0 && self.completed > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMatchupsRequest {
    pub bracket_id: i32,
    pub format: String,
}

/// Matchup with every player slot expanded to the full player record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupDetail {
    pub id: i32,
    pub bracket_id: i32,
    pub player1: Option<Player>,
    pub player2: Option<Player>,
    pub player1_partner: Option<Player>,
    pub player2_partner: Option<Player>,
    pub winner: Option<Player>,
    pub score: Option<String>,
    pub status: MatchupStatus,
    pub round: Option<i32>,
}

impl MatchupDetail {
    pub fn expand(matchup: Matchup, players: &HashMap<i32, Player>) -> Self {
        let lookup = |id: Option<i32>| id.and_then(|id| players.get(&id).cloned());
        Self {
            id: matchup.id,
            bracket_id: matchup.bracket_id,
            player1: lookup(matchup.player1_id),
            player2: lookup(matchup.player2_id),
            player1_partner: lookup(matchup.player1_partner_id),
            player2_partner: lookup(matchup.player2_partner_id),
            winner: lookup(matchup.winner_id),
            score: matchup.score,
            status: matchup.status,
            round: matchup.round,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Query-string booleans: `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`,
/// any letter case.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(de::Error::invalid_value(
            de::Unexpected::Str(&raw),
            &"a boolean flag",
        )),
    }
}

/// Status flags accepted by `GET /brackets/{id}/matchups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupQuery {
    #[serde(rename = "PENDING", default, deserialize_with = "deserialize_flag")]
    pub pending: bool,
    #[serde(rename = "PLANNING", default = "default_true", deserialize_with = "deserialize_flag")]
    pub planning: bool,
    #[serde(rename = "COMPLETED", default = "default_true", deserialize_with = "deserialize_flag")]
    pub completed: bool,
    #[serde(rename = "ALL", default, deserialize_with = "deserialize_flag")]
    pub all: bool,
}

impl Default for MatchupQuery {
    fn default() -> Self {
        Self {
            pending: false,
            planning: true,
            completed: true,
            all: false,
        }
    }
}

impl MatchupQuery {
    pub fn statuses(&self) -> Vec<MatchupStatus> {
        let mut statuses = Vec::with_capacity(3);
        if self.pending {
            statuses.push(MatchupStatus::Pending);
        }
        if self.planning {
            statuses.push(MatchupStatus::Planning);
        }
        if self.completed {
            statuses.push(MatchupStatus::Completed);
        }
        statuses
    }

    /// Narrow a bracket's matchups to what should be shown right now.
    ///
    /// Unless `ALL` is set, results are limited to the active round (the
    /// smallest round holding a PLANNING matchup) when one exists, then to the
    /// requested statuses. With no status flag set, no status filter applies.
    pub fn select(&self, matchups: Vec<Matchup>) -> Vec<Matchup> {
        if self.all {
            return matchups;
        }

        let round = active_round(&matchups);
        let statuses = self.statuses();

        matchups
            .into_iter()
            .filter(|m| round.map_or(true, |r| m.round == Some(r)))
            .filter(|m| statuses.is_empty() || statuses.contains(&m.status))
            .collect()
    }
}

/// Smallest round number among PLANNING matchups.
pub fn active_round(matchups: &[Matchup]) -> Option<i32> {
    matchups
        .iter()
        .filter(|m| m.status == MatchupStatus::Planning)
        .filter_map(|m| m.round)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matchup(id: i32, round: i32, p1: i32, p2: i32, status: MatchupStatus) -> Matchup {
        Matchup {
            id,
            bracket_id: 1,
            round: Some(round),
            player1_id: Some(p1),
            player2_id: Some(p2),
            player1_partner_id: None,
            player2_partner_id: None,
            winner_id: None,
            score: None,
            status,
        }
    }

    fn ids(matchups: &[Matchup]) -> Vec<i32> {
        matchups.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_valid_status_transitions() {
        let pending = MatchupStatus::Pending;
        let planning = MatchupStatus::Planning;
        let completed = MatchupStatus::Completed;

        assert!(pending.can_transition_to(&planning));
        assert!(planning.can_transition_to(&completed));

        assert!(pending.can_transition_to(&pending));
        assert!(completed.can_transition_to(&completed));

        assert!(!pending.can_transition_to(&completed));
        assert!(!planning.can_transition_to(&pending));
        assert!(!completed.can_transition_to(&planning));
        assert!(!completed.can_transition_to(&pending));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&MatchupStatus::Planning).unwrap();
        assert_eq!(json, "\"PLANNING\"");
        assert_eq!(MatchupStatus::Completed.to_string(), "COMPLETED");
    }

    #[test]
    fn test_winner_must_be_a_participant() {
        let mut m = matchup(1, 1, 10, 20, MatchupStatus::Planning);
        assert!(m.has_valid_winner());

        m.winner_id = Some(20);
        assert!(m.has_valid_winner());

        m.winner_id = Some(30);
        assert!(!m.has_valid_winner());

        m.player2_partner_id = Some(30);
        assert!(m.has_valid_winner());
    }

    #[test]
    fn test_new_matchup_winner_check() {
        let mut new = NewMatchup::scheduled(1, 1, 10, 20);
        assert_eq!(new.status, MatchupStatus::Pending);
        assert!(new.has_valid_winner());

        new.winner_id = Some(99);
        assert!(!new.has_valid_winner());
    }

    #[test]
    fn test_update_request_applies_present_fields_only() {
        let mut m = matchup(1, 2, 10, 20, MatchupStatus::Planning);
        UpdateMatchupRequest {
            winner_id: Some(Some(10)),
            score: Some(Some("6-4 6-3".to_string())),
            status: Some(MatchupStatus::Completed),
            ..Default::default()
        }
        .apply(&mut m);

        assert_eq!(m.player1_id, Some(10));
        assert_eq!(m.player2_id, Some(20));
        assert_eq!(m.winner_id, Some(10));
        assert_eq!(m.score.as_deref(), Some("6-4 6-3"));
        assert_eq!(m.status, MatchupStatus::Completed);
    }

    #[test]
    fn test_update_request_null_clears_and_absent_keeps() {
        let mut m = matchup(1, 1, 10, 20, MatchupStatus::Completed);
        m.winner_id = Some(10);
        m.score = Some("6-0 6-0".to_string());
        m.player1_partner_id = Some(11);

        let req: UpdateMatchupRequest =
            serde_json::from_str(r#"{"winner_id": null, "score": null}"#).unwrap();
        assert_eq!(req.winner_id, Some(None));
        assert_eq!(req.player1_partner_id, None);
        req.apply(&mut m);

        assert_eq!(m.winner_id, None);
        assert_eq!(m.score, None);
        assert_eq!(m.player1_partner_id, Some(11));
        assert_eq!(m.player1_id, Some(10));
    }

    #[test]
    fn test_update_request_score_length_is_checked() {
        let req = UpdateMatchupRequest {
            score: Some(Some("6".repeat(51))),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let cleared = UpdateMatchupRequest {
            score: Some(None),
            ..Default::default()
        };
        assert!(cleared.validate().is_ok());
    }

    #[test]
    fn test_round_progress() {
        let open = RoundProgress { planning: 1, completed: 1 };
        assert!(!open.is_finished());

        // A mix of COMPLETED and PENDING rows counts as finished.
        let done = RoundProgress { planning: 0, completed: 2 };
        assert!(done.is_finished());

        // Never opened: only PENDING rows.
        assert!(!RoundProgress::default().is_finished());
    }

    #[test]
    fn test_query_defaults() {
        let query: MatchupQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.pending);
        assert!(query.planning);
        assert!(query.completed);
        assert!(!query.all);
        assert_eq!(
            query.statuses(),
            vec![MatchupStatus::Planning, MatchupStatus::Completed]
        );
    }

    #[test]
    fn test_query_flags_accept_common_spellings() {
        let query: MatchupQuery =
            serde_json::from_str(r#"{"PENDING": "True", "PLANNING": "0", "ALL": "no"}"#).unwrap();
        assert!(query.pending);
        assert!(!query.planning);
        assert!(query.completed);
        assert!(!query.all);

        assert!(serde_json::from_str::<MatchupQuery>(r#"{"ALL": "maybe"}"#).is_err());
    }

    #[test]
    fn test_select_restricts_to_active_round() {
        let rows = vec![
            matchup(1, 1, 1, 4, MatchupStatus::Completed),
            matchup(2, 1, 2, 3, MatchupStatus::Completed),
            matchup(3, 2, 1, 3, MatchupStatus::Planning),
            matchup(4, 2, 4, 2, MatchupStatus::Completed),
            matchup(5, 3, 1, 2, MatchupStatus::Pending),
            matchup(6, 3, 3, 4, MatchupStatus::Pending),
        ];

        assert_eq!(active_round(&rows), Some(2));
        let selected = MatchupQuery::default().select(rows);
        assert_eq!(ids(&selected), vec![3, 4]);
    }

    #[test]
    fn test_select_with_pending_flag_only() {
        let rows = vec![
            matchup(1, 1, 1, 4, MatchupStatus::Planning),
            matchup(2, 2, 1, 3, MatchupStatus::Pending),
        ];
        let query = MatchupQuery {
            pending: true,
            planning: false,
            completed: false,
            all: false,
        };
        // Round 1 is active, so round 2's pending rows are hidden.
        assert!(query.select(rows).is_empty());
    }

    #[test]
    fn test_select_without_active_round_filters_status_only() {
        let rows = vec![
            matchup(1, 1, 1, 4, MatchupStatus::Completed),
            matchup(2, 2, 1, 3, MatchupStatus::Completed),
            matchup(3, 3, 1, 2, MatchupStatus::Pending),
        ];
        assert_eq!(active_round(&rows), None);
        let selected = MatchupQuery::default().select(rows);
        assert_eq!(ids(&selected), vec![1, 2]);
    }

    #[test]
    fn test_select_with_no_flags_applies_no_status_filter() {
        let rows = vec![
            matchup(1, 1, 1, 4, MatchupStatus::Planning),
            matchup(2, 1, 2, 3, MatchupStatus::Completed),
            matchup(3, 2, 1, 3, MatchupStatus::Pending),
        ];
        let query = MatchupQuery {
            pending: false,
            planning: false,
            completed: false,
            all: false,
        };
        assert_eq!(ids(&query.select(rows)), vec![1, 2]);
    }

    #[test]
    fn test_select_all_returns_everything() {
        let rows = vec![
            matchup(1, 1, 1, 4, MatchupStatus::Planning),
            matchup(2, 2, 1, 3, MatchupStatus::Pending),
        ];
        let query = MatchupQuery {
            all: true,
            ..Default::default()
        };
        assert_eq!(ids(&query.select(rows)), vec![1, 2]);
    }

    #[test]
    fn test_expand_resolves_players() {
        let alice = Player {
            id: 10,
            name: "Alice".to_string(),
            gender: "Female".to_string(),
            phone_number: "555-0010".to_string(),
        };
        let mut players = HashMap::new();
        players.insert(alice.id, alice.clone());

        let mut m = matchup(1, 1, 10, 20, MatchupStatus::Completed);
        m.winner_id = Some(10);

        let detail = MatchupDetail::expand(m, &players);
        assert_eq!(detail.player1, Some(alice.clone()));
        assert_eq!(detail.player2, None);
        assert_eq!(detail.winner, Some(alice));
        assert_eq!(detail.player1_partner, None);
    }
}
