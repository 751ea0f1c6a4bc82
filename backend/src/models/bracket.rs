use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Bracket {
    pub id: i32,
    pub tournament_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBracketRequest {
    pub tournament_id: i32,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}
