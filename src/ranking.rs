use std::cmp::Ordering;

use crate::league::LeagueTeam;

/// Canonical standings order: more wins first, then lower tiebreaker rank.
/// Tiebreaker ranks are unique, so distinct teams never compare equal.
pub fn compare(a: &LeagueTeam, b: &LeagueTeam) -> Ordering {
    b.record
        .wins
        .cmp(&a.record.wins)
        .then(a.tiebreaker.cmp(&b.tiebreaker))
}

pub fn outranks(a: &LeagueTeam, b: &LeagueTeam) -> bool {
    compare(a, b) == Ordering::Less
}

/// Returns a new vector in canonical order; the input is left untouched.
pub fn sort_teams<'a, I>(teams: I) -> Vec<&'a LeagueTeam>
where
    I: IntoIterator<Item = &'a LeagueTeam>,
{
    let mut out: Vec<&LeagueTeam> = teams.into_iter().collect();
    out.sort_by(|a, b| compare(a, b));
    out
}
