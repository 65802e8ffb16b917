use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::bracket::{BracketSlot, SubleagueBracket, UnderTarget};
use crate::error::ProjectError;
use crate::estimate::{Estimate, TOTAL_GAMES, estimate_day, games_remaining, win_difference};
use crate::league::{League, LeagueTeam, LeagueTopology, Standings, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionConfig {
    pub bracket_size: usize,
    /// Zero disables the underbracket column.
    pub underbracket_size: usize,
    pub total_games: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            bracket_size: 4,
            underbracket_size: 0,
            total_games: TOTAL_GAMES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: TeamId,
    pub name: String,
    pub color: String,
    pub tiebreaker: u32,
    pub championships: u32,
    pub underchampionships: u32,
    pub in_progress: bool,
    pub wins: i64,
    pub losses: u32,
    pub nonlosses: u32,
    pub over: Estimate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under: Option<Estimate>,
    pub party: Estimate,
    pub slot: BracketSlot,
    pub clinched: bool,
    pub eliminated: bool,
    pub subleague: String,
    pub division: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubleagueRows {
    pub name: String,
    pub rows: Vec<Row>,
}

/// Rows grouped by subleague name, in topology order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    subleagues: Vec<SubleagueRows>,
}

impl Projection {
    pub fn get(&self, subleague: &str) -> Option<&[Row]> {
        self.subleagues
            .iter()
            .find(|s| s.name == subleague)
            .map(|s| s.rows.as_slice())
    }

    pub fn subleagues(&self) -> &[SubleagueRows] {
        &self.subleagues
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.subleagues.iter().flat_map(|s| s.rows.iter())
    }

    pub fn row(&self, id: &TeamId) -> Option<&Row> {
        self.rows().find(|r| &r.id == id)
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.subleagues.len()))?;
        for sub in &self.subleagues {
            map.serialize_entry(&sub.name, &sub.rows)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Projection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProjectionVisitor;

        impl<'de> Visitor<'de> for ProjectionVisitor {
            type Value = Projection;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of subleague name to rows")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Projection, A::Error> {
                let mut subleagues = Vec::new();
                while let Some((name, rows)) = access.next_entry::<String, Vec<Row>>()? {
                    subleagues.push(SubleagueRows { name, rows });
                }
                Ok(Projection { subleagues })
            }
        }

        deserializer.deserialize_map(ProjectionVisitor)
    }
}

pub fn project(
    topology: &LeagueTopology,
    standings: &Standings,
    day: u32,
) -> Result<Projection, ProjectError> {
    project_with(topology, standings, day, &ProjectionConfig::default())
}

pub fn project_with(
    topology: &LeagueTopology,
    standings: &Standings,
    day: u32,
    config: &ProjectionConfig,
) -> Result<Projection, ProjectError> {
    let league = League::build(topology, standings)?;
    Ok(project_league(&league, day, config))
}

pub fn project_league(league: &League, day: u32, config: &ProjectionConfig) -> Projection {
    let mut subleagues = Vec::with_capacity(league.subleagues().len());
    for (idx, subleague) in league.subleagues().iter().enumerate() {
        let bracket = SubleagueBracket::build(
            league,
            idx,
            config.bracket_size,
            config.underbracket_size,
        );
        if bracket.canonical.len() < config.bracket_size {
            debug!(
                subleague = %subleague.name,
                teams = bracket.canonical.len(),
                "subleague smaller than the playoff field"
            );
        }
        let rows = bracket
            .canonical
            .iter()
            .map(|team| format_row(league, &bracket, team, day, config))
            .collect();
        subleagues.push(SubleagueRows {
            name: subleague.name.clone(),
            rows,
        });
    }
    Projection { subleagues }
}

fn format_row(
    league: &League,
    bracket: &SubleagueBracket<'_>,
    team: &LeagueTeam,
    day: u32,
    config: &ProjectionConfig,
) -> Row {
    let total = config.total_games;
    let slot = bracket.slot(team);
    let over_target = bracket.over_target(team);
    let party_cutoff = bracket.party_cutoff(team);

    let over = over_target
        .map(|target| estimate_day(team, target, total))
        .unwrap_or(Estimate::Unknown);
    let party = party_cutoff
        .map(|cutoff| estimate_day(cutoff, team, total))
        .unwrap_or(Estimate::Unknown);
    // Enabled but empty underbracket still reports a column.
    let under = (config.underbracket_size > 0).then(|| match bracket.under_target(team) {
        Some(UnderTarget::StayAhead(other)) => estimate_day(team, other, total),
        Some(UnderTarget::Escape(other)) => estimate_day(other, team, total),
        None => Estimate::Unknown,
    });

    // With nobody outside the field every qualifier is already in.
    let clinched = slot.qualifies()
        && (bracket.middling.is_empty()
            || over_target.is_some_and(|target| {
                !target.is(team)
                    && win_difference(team, target)
                        > games_remaining(target.record.games_played, total)
            }));
    let eliminated = !slot.qualifies()
        && party_cutoff.is_some_and(|cutoff| {
            win_difference(cutoff, team) > games_remaining(team.record.games_played, total)
        });

    let record = team.record;
    Row {
        id: team.info.id.clone(),
        name: team.info.name.clone(),
        color: team.info.color.clone(),
        tiebreaker: team.tiebreaker,
        championships: team.info.championships,
        underchampionships: team.info.underchampionships,
        in_progress: record.games_played < day + 1 && day < total,
        wins: record.wins,
        losses: record.losses,
        nonlosses: record.nonlosses(),
        over,
        under,
        party,
        slot,
        clinched,
        eliminated,
        subleague: league.subleagues()[team.subleague].name.clone(),
        division: league.divisions()[team.division].name.clone(),
    }
}
