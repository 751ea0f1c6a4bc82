use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Association row linking a player to a tournament.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct TournamentPlayer {
    pub id: i32,
    pub tournament_id: i32,
    pub player_id: i32,
}

/// Association row linking a player to a bracket roster.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct BracketPlayer {
    pub id: i32,
    pub bracket_id: i32,
    pub player_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddTournamentPlayersRequest {
    pub tournament_id: i32,
    #[validate(length(min = 1))]
    pub player_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBracketPlayerRequest {
    pub bracket_id: i32,
    pub player_id: i32,
}

/// Body of `POST /brackets/{id}/players`; the bracket comes from the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPlayerToBracketRequest {
    pub player_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_tournament_players_requires_players() {
        let empty = AddTournamentPlayersRequest {
            tournament_id: 1,
            player_ids: vec![],
        };
        assert!(empty.validate().is_err());

        let json = r#"{"tournament_id": 3, "player_ids": [4, 5, 6]}"#;
        let req: AddTournamentPlayersRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.player_ids, vec![4, 5, 6]);
        assert!(req.validate().is_ok());
    }
}
