pub mod bracket;
pub mod matchup;
pub mod membership;
pub mod player;
pub mod tournament;

pub use bracket::*;
pub use matchup::*;
pub use membership::*;
pub use player::*;
pub use tournament::*;
