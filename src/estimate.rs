use serde::{Deserialize, Serialize};

use crate::league::LeagueTeam;

/// Regular-season length in games per team.
pub const TOTAL_GAMES: u32 = 99;

/// Projected game day on which a standings gap becomes unclosable.
///
/// Serialized as the day number, with `-1` standing in for `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", from = "i64")]
pub enum Estimate {
    Unknown,
    Day(u32),
}

impl From<Estimate> for i64 {
    fn from(estimate: Estimate) -> Self {
        match estimate {
            Estimate::Unknown => -1,
            Estimate::Day(day) => day as i64,
        }
    }
}

impl From<i64> for Estimate {
    fn from(raw: i64) -> Self {
        if raw < 1 {
            Estimate::Unknown
        } else {
            Estimate::Day(u32::try_from(raw).unwrap_or(u32::MAX))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not enough data to extrapolate.
    Unknown,
    /// Settled before the current day.
    Determined,
    /// Not settled within the regular season at the current pace.
    Undetermined,
    OnDay(u32),
}

impl Estimate {
    pub fn day(self) -> Option<u32> {
        match self {
            Estimate::Unknown => None,
            Estimate::Day(day) => Some(day),
        }
    }

    /// Classify against the 0-indexed current `day`.
    pub fn outcome(self, day: u32, total_games: u32) -> Outcome {
        match self {
            Estimate::Unknown => Outcome::Unknown,
            Estimate::Day(est) if est > total_games => Outcome::Undetermined,
            Estimate::Day(est) if est <= day => Outcome::Determined,
            Estimate::Day(est) => Outcome::OnDay(est),
        }
    }
}

/// Wins `to_beat` must gain on `team` (holding `team` fixed) before the
/// canonical order flips. Losing the tiebreak costs the chaser one more win.
pub fn win_difference(team: &LeagueTeam, to_beat: &LeagueTeam) -> i64 {
    let mut difference = team.record.wins - to_beat.record.wins;
    if to_beat.tiebreaker > team.tiebreaker {
        difference += 1;
    }
    difference
}

pub fn estimate_day(team: &LeagueTeam, to_beat: &LeagueTeam, total_games: u32) -> Estimate {
    estimate_from(
        team.record.games_played,
        win_difference(team, to_beat),
        total_games,
    )
}

/// Linear win-rate extrapolation: `floor(total * played / (diff + played)) + 1`.
/// A non-positive denominator means the pace never closes the gap.
pub fn estimate_from(played: u32, difference: i64, total_games: u32) -> Estimate {
    if played == 0 {
        return Estimate::Unknown;
    }
    let played = played as i64;
    let denominator = difference + played;
    if denominator <= 0 {
        return Estimate::Unknown;
    }
    let day = (total_games as i64 * played) / denominator + 1;
    Estimate::from(day)
}

pub fn games_remaining(played: u32, total_games: u32) -> i64 {
    (total_games as i64 - played as i64).max(0)
}
