// Service layer for the tennis backend
pub mod bracket_service;
pub mod matchup_service;
pub mod membership_service;
pub mod player_service;
pub mod round_robin;
pub mod tournament_service;


pub use bracket_service::BracketService;
pub use matchup_service::MatchupService;
pub use membership_service::MembershipService;
pub use player_service::PlayerService;
pub use tournament_service::TournamentService;
