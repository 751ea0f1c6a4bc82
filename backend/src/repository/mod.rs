//! Repository functions per entity.
//!
//! Every function takes a `&mut PgConnection` so that callers decide the
//! transactional scope: pass `&mut *tx` from `pool.begin()` to compose several
//! calls into one unit of work.

pub mod bracket_repository;
pub mod matchup_repository;
pub mod membership_repository;
pub mod player_repository;
pub mod tournament_repository;
