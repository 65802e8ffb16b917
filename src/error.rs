use thiserror::Error;

use crate::league::{DivisionId, TeamId};

/// Data-integrity failures raised while validating a league snapshot.
///
/// `TeamNotInLeague` is the lookup failure callers can choose to skip; a team
/// that simply has not played yet is not an error (see `Estimate::Unknown`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("team {0} has no tiebreaker entry")]
    MissingTiebreaker(TeamId),

    #[error("team {0} appears more than once in the tiebreaker order")]
    DuplicateTiebreaker(TeamId),

    #[error("tiebreaker order lists unknown team {0}")]
    UnknownTiebreaker(TeamId),

    #[error("division lists unknown team {0}")]
    UnknownTeam(TeamId),

    #[error("subleague lists unknown division {0}")]
    UnknownDivision(DivisionId),

    #[error("division {0} belongs to more than one subleague")]
    DuplicateDivision(DivisionId),

    #[error("team {0} belongs to more than one division")]
    DuplicateMembership(TeamId),

    #[error("team {0} has no standings record")]
    MissingStandings(TeamId),

    #[error("team {0} not found in any subleague division")]
    TeamNotInLeague(TeamId),
}

impl ProjectError {
    /// Lookup misses can be skipped by display code; everything else means
    /// the snapshot is unusable.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, ProjectError::TeamNotInLeague(_))
    }
}
