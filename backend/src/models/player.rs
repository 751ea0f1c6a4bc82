use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Player {
    pub id: i32,
    pub name: String,
    pub gender: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[validate(length(min = 1, max = 10))]
    pub gender: String,
    #[validate(length(min = 1, max = 15))]
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePlayerRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub gender: Option<String>,
    #[validate(length(min = 1, max = 15))]
    pub phone_number: Option<String>,
}

impl UpdatePlayerRequest {
    /// Overlay the provided fields on an existing player.
    pub fn apply(self, player: &mut Player) {
        if let Some(name) = self.name {
            player.name = name;
        }
        if let Some(gender) = self.gender {
            player.gender = gender;
        }
        if let Some(phone_number) = self.phone_number {
            player.phone_number = phone_number;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_player_request_validation() {
        let valid = CreatePlayerRequest {
            name: "Danielle Neal".to_string(),
            gender: "Female".to_string(),
            phone_number: "555-0001".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing_name = CreatePlayerRequest {
            name: String::new(),
            ..valid.clone()
        };
        assert!(missing_name.validate().is_err());

        let long_phone = CreatePlayerRequest {
            phone_number: "5".repeat(16),
            ..valid
        };
        assert!(long_phone.validate().is_err());
    }

    #[test]
    fn test_update_player_request_keeps_unset_fields() {
        let mut player = Player {
            id: 7,
            name: "Kane Vincent".to_string(),
            gender: "Male".to_string(),
            phone_number: "555-0002".to_string(),
        };

        UpdatePlayerRequest {
            phone_number: Some("555-9999".to_string()),
            ..Default::default()
        }
        .apply(&mut player);

        assert_eq!(player.name, "Kane Vincent");
        assert_eq!(player.phone_number, "555-9999");
    }
}
