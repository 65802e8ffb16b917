use serde::{Deserialize, Serialize};

use crate::league::{League, LeagueTeam};
use crate::ranking::sort_teams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSlot {
    DivisionWinner,
    WildCard,
    Outside,
    Underbracket,
}

impl BracketSlot {
    pub fn qualifies(self) -> bool {
        matches!(self, BracketSlot::DivisionWinner | BracketSlot::WildCard)
    }
}

/// Who a team is measured against for the underbracket column.
#[derive(Debug, Clone, Copy)]
pub enum UnderTarget<'a> {
    /// Team sits above the underbracket and must stay ahead of this team.
    StayAhead(&'a LeagueTeam),
    /// Team sits inside the underbracket; this is the team it must pass.
    Escape(&'a LeagueTeam),
}

/// Playoff picture of one subleague, every list in canonical order.
#[derive(Debug, Clone)]
pub struct SubleagueBracket<'a> {
    pub canonical: Vec<&'a LeagueTeam>,
    pub winners: Vec<&'a LeagueTeam>,
    pub overbracket: Vec<&'a LeagueTeam>,
    /// Teams outside the overbracket, underbracket included.
    pub middling: Vec<&'a LeagueTeam>,
    pub underbracket: Vec<&'a LeagueTeam>,
}

impl<'a> SubleagueBracket<'a> {
    /// Division winners always qualify; the remaining `size - winners` slots
    /// go to the best non-winners regardless of division. Short subleagues
    /// just yield a smaller field.
    pub fn build(league: &'a League, subleague: usize, size: usize, underbracket_size: usize) -> Self {
        let canonical = sort_teams(league.subleague_teams(subleague));

        let mut winners: Vec<&LeagueTeam> = Vec::new();
        for &team in &canonical {
            if !winners.iter().any(|w| w.division == team.division) {
                winners.push(team);
            }
        }

        let wild_slots = size.saturating_sub(winners.len());
        let wild_cards: Vec<&LeagueTeam> = canonical
            .iter()
            .copied()
            .filter(|t| !winners.iter().any(|w| w.is(t)))
            .take(wild_slots)
            .collect();

        let overbracket = sort_teams(winners.iter().chain(wild_cards.iter()).copied());
        let middling: Vec<&LeagueTeam> = canonical
            .iter()
            .copied()
            .filter(|t| !overbracket.iter().any(|o| o.is(t)))
            .collect();
        let under_start = middling.len().saturating_sub(underbracket_size);
        let underbracket = middling[under_start..].to_vec();

        Self {
            canonical,
            winners,
            overbracket,
            middling,
            underbracket,
        }
    }

    pub fn is_winner(&self, team: &LeagueTeam) -> bool {
        self.winners.iter().any(|w| w.is(team))
    }

    pub fn slot(&self, team: &LeagueTeam) -> BracketSlot {
        if self.is_winner(team) {
            BracketSlot::DivisionWinner
        } else if self.overbracket.iter().any(|t| t.is(team)) {
            BracketSlot::WildCard
        } else if self.underbracket.iter().any(|t| t.is(team)) {
            BracketSlot::Underbracket
        } else {
            BracketSlot::Outside
        }
    }

    /// Lowest-ranked member of the playoff field.
    pub fn cutoff(&self) -> Option<&'a LeagueTeam> {
        self.overbracket.last().copied()
    }

    /// Team that `team` has to stay ahead of to clinch.
    ///
    /// Normally the best team outside the field. A division winner holding
    /// the last slot only has to hold off its own division, so it is measured
    /// against the best outside team from that division when there is one.
    pub fn over_target(&self, team: &LeagueTeam) -> Option<&'a LeagueTeam> {
        let last = self.cutoff()?;
        if self.is_winner(team) && last.is(team) {
            if let Some(rival) = self.middling.iter().find(|t| t.division == team.division) {
                return Some(*rival);
            }
        }
        self.middling.first().copied().or(Some(last))
    }

    /// Field member `team` has to pass to get in. Winners of other divisions
    /// are skipped: passing them does not take their slot.
    pub fn party_cutoff(&self, team: &LeagueTeam) -> Option<&'a LeagueTeam> {
        self.overbracket
            .iter()
            .rev()
            .find(|t| !(self.is_winner(t) && t.division != team.division))
            .copied()
            .or_else(|| self.cutoff())
    }

    pub fn under_target(&self, team: &LeagueTeam) -> Option<UnderTarget<'a>> {
        let top = *self.underbracket.first()?;
        if !self.underbracket.iter().any(|t| t.is(team)) {
            return Some(UnderTarget::StayAhead(top));
        }
        let pos = self.canonical.iter().position(|t| t.is(top))?;
        let above = self.canonical.get(pos.checked_sub(1)?)?;
        Some(UnderTarget::Escape(*above))
    }

    /// Teams in neither bracket.
    pub fn remainder(&self) -> Vec<&'a LeagueTeam> {
        self.middling
            .iter()
            .copied()
            .filter(|t| !self.underbracket.iter().any(|u| u.is(t)))
            .collect()
    }
}
