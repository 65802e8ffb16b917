use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

string_id!(TeamId);
string_id!(DivisionId);
string_id!(SubleagueId);
string_id!(LeagueId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub championships: u32,
    #[serde(default)]
    pub underchampionships: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
    #[serde(default)]
    pub teams: Vec<TeamId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subleague {
    pub id: SubleagueId,
    pub name: String,
    #[serde(default)]
    pub divisions: Vec<DivisionId>,
}

/// Static league membership plus the tiebreaker order (index 0 wins ties).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTopology {
    pub id: LeagueId,
    pub name: String,
    pub subleagues: Vec<Subleague>,
    pub divisions: Vec<Division>,
    pub teams: Vec<TeamInfo>,
    pub tiebreakers: Vec<TeamId>,
}

impl LeagueTopology {
    pub fn team(&self, id: &TeamId) -> Result<&TeamInfo, ProjectError> {
        self.teams
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| ProjectError::TeamNotInLeague(id.clone()))
    }

    pub fn division_of(&self, id: &TeamId) -> Result<&Division, ProjectError> {
        self.divisions
            .iter()
            .filter(|d| self.subleagues.iter().any(|s| s.divisions.contains(&d.id)))
            .find(|d| d.teams.contains(id))
            .ok_or_else(|| ProjectError::TeamNotInLeague(id.clone()))
    }

    pub fn subleague_of(&self, id: &TeamId) -> Result<&Subleague, ProjectError> {
        let division = self.division_of(id)?;
        self.subleagues
            .iter()
            .find(|s| s.divisions.contains(&division.id))
            .ok_or_else(|| ProjectError::TeamNotInLeague(id.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    pub wins: i64,
    pub losses: u32,
    pub games_played: u32,
}

impl Record {
    pub fn new(wins: i64, losses: u32, games_played: u32) -> Self {
        Self {
            wins,
            losses,
            games_played,
        }
    }

    /// Games that did not end in a loss, counting no-decisions.
    pub fn nonlosses(&self) -> u32 {
        self.games_played.saturating_sub(self.losses)
    }
}

/// Per-team counters as published by the standings feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Standings {
    #[serde(default)]
    pub wins: HashMap<TeamId, i64>,
    #[serde(default)]
    pub losses: HashMap<TeamId, u32>,
    #[serde(default)]
    pub games_played: HashMap<TeamId, u32>,
}

impl Standings {
    /// A team has a record once it appears in `wins`; the other counters
    /// default to zero.
    pub fn record(&self, id: &TeamId) -> Option<Record> {
        let wins = *self.wins.get(id)?;
        Some(Record {
            wins,
            losses: self.losses.get(id).copied().unwrap_or(0),
            games_played: self.games_played.get(id).copied().unwrap_or(0),
        })
    }

    pub fn insert(&mut self, id: TeamId, record: Record) {
        self.wins.insert(id.clone(), record.wins);
        self.losses.insert(id.clone(), record.losses);
        self.games_played.insert(id, record.games_played);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueTeam {
    pub info: TeamInfo,
    pub record: Record,
    /// 1-based position in the tiebreaker order.
    pub tiebreaker: u32,
    pub division: usize,
    pub subleague: usize,
}

impl LeagueTeam {
    pub fn id(&self) -> &TeamId {
        &self.info.id
    }

    pub fn is(&self, other: &LeagueTeam) -> bool {
        self.info.id == other.info.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionEntry {
    pub id: DivisionId,
    pub name: String,
    pub subleague: usize,
    pub teams: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubleagueEntry {
    pub id: SubleagueId,
    pub name: String,
    pub divisions: Vec<usize>,
}

/// Validated, immutable join of topology and standings for one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    teams: Vec<LeagueTeam>,
    divisions: Vec<DivisionEntry>,
    subleagues: Vec<SubleagueEntry>,
    index: HashMap<TeamId, usize>,
}

impl League {
    /// Teams listed in `topology.teams` but in no division are ignored, as
    /// are divisions outside every subleague.
    pub fn build(topology: &LeagueTopology, standings: &Standings) -> Result<Self, ProjectError> {
        let mut ranks: HashMap<&TeamId, u32> = HashMap::new();
        for (idx, id) in topology.tiebreakers.iter().enumerate() {
            if ranks.insert(id, idx as u32 + 1).is_some() {
                return Err(ProjectError::DuplicateTiebreaker(id.clone()));
            }
        }

        let infos: HashMap<&TeamId, &TeamInfo> =
            topology.teams.iter().map(|t| (&t.id, t)).collect();
        if let Some(stray) = topology.tiebreakers.iter().find(|id| !infos.contains_key(id)) {
            return Err(ProjectError::UnknownTiebreaker(stray.clone()));
        }
        let division_data: HashMap<&DivisionId, &Division> =
            topology.divisions.iter().map(|d| (&d.id, d)).collect();

        let mut teams = Vec::new();
        let mut divisions: Vec<DivisionEntry> = Vec::new();
        let mut subleagues = Vec::new();
        let mut index: HashMap<TeamId, usize> = HashMap::new();

        for (sub_idx, subleague) in topology.subleagues.iter().enumerate() {
            let mut sub_divisions = Vec::new();
            for division_id in &subleague.divisions {
                let division = division_data
                    .get(division_id)
                    .ok_or_else(|| ProjectError::UnknownDivision(division_id.clone()))?;
                if divisions.iter().any(|d| &d.id == division_id) {
                    return Err(ProjectError::DuplicateDivision(division_id.clone()));
                }

                let div_idx = divisions.len();
                let mut members = Vec::new();
                for team_id in &division.teams {
                    let info = infos
                        .get(team_id)
                        .ok_or_else(|| ProjectError::UnknownTeam(team_id.clone()))?;
                    if index.contains_key(team_id) {
                        return Err(ProjectError::DuplicateMembership(team_id.clone()));
                    }
                    let tiebreaker = *ranks
                        .get(team_id)
                        .ok_or_else(|| ProjectError::MissingTiebreaker(team_id.clone()))?;
                    let record = standings
                        .record(team_id)
                        .ok_or_else(|| ProjectError::MissingStandings(team_id.clone()))?;

                    index.insert(team_id.clone(), teams.len());
                    members.push(teams.len());
                    teams.push(LeagueTeam {
                        info: (*info).clone(),
                        record,
                        tiebreaker,
                        division: div_idx,
                        subleague: sub_idx,
                    });
                }

                divisions.push(DivisionEntry {
                    id: division.id.clone(),
                    name: division.name.clone(),
                    subleague: sub_idx,
                    teams: members,
                });
                sub_divisions.push(div_idx);
            }
            subleagues.push(SubleagueEntry {
                id: subleague.id.clone(),
                name: subleague.name.clone(),
                divisions: sub_divisions,
            });
        }

        Ok(Self {
            id: topology.id.clone(),
            name: topology.name.clone(),
            teams,
            divisions,
            subleagues,
            index,
        })
    }

    pub fn teams(&self) -> &[LeagueTeam] {
        &self.teams
    }

    pub fn subleagues(&self) -> &[SubleagueEntry] {
        &self.subleagues
    }

    pub fn divisions(&self) -> &[DivisionEntry] {
        &self.divisions
    }

    pub fn team(&self, id: &TeamId) -> Result<&LeagueTeam, ProjectError> {
        self.index
            .get(id)
            .map(|&idx| &self.teams[idx])
            .ok_or_else(|| ProjectError::TeamNotInLeague(id.clone()))
    }

    pub fn division_of(&self, id: &TeamId) -> Result<&DivisionEntry, ProjectError> {
        let team = self.team(id)?;
        Ok(&self.divisions[team.division])
    }

    pub fn subleague_of(&self, id: &TeamId) -> Result<&SubleagueEntry, ProjectError> {
        let team = self.team(id)?;
        Ok(&self.subleagues[team.subleague])
    }

    /// Members of one subleague in topology order.
    pub fn subleague_teams(&self, subleague: usize) -> Vec<&LeagueTeam> {
        let Some(entry) = self.subleagues.get(subleague) else {
            return Vec::new();
        };
        entry
            .divisions
            .iter()
            .flat_map(|&d| self.divisions[d].teams.iter())
            .map(|&t| &self.teams[t])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology() -> LeagueTopology {
        LeagueTopology {
            id: "l".into(),
            name: "League".to_string(),
            subleagues: vec![Subleague {
                id: "s".into(),
                name: "Sub".to_string(),
                divisions: vec!["d1".into(), "d2".into()],
            }],
            divisions: vec![
                Division {
                    id: "d1".into(),
                    name: "One".to_string(),
                    teams: vec!["a".into(), "b".into()],
                },
                Division {
                    id: "d2".into(),
                    name: "Two".to_string(),
                    teams: vec!["c".into()],
                },
            ],
            teams: ["a", "b", "c", "bench"]
                .iter()
                .map(|id| TeamInfo {
                    id: (*id).into(),
                    name: id.to_uppercase(),
                    color: "#ffffff".to_string(),
                    championships: 0,
                    underchampionships: 0,
                })
                .collect(),
            tiebreakers: vec!["c".into(), "a".into(), "b".into()],
        }
    }

    fn standings() -> Standings {
        let mut s = Standings::default();
        s.insert("a".into(), Record::new(3, 1, 4));
        s.insert("b".into(), Record::new(2, 2, 4));
        s.insert("c".into(), Record::new(1, 2, 4));
        s
    }

    #[test]
    fn build_assigns_ranks_and_membership() {
        let league = League::build(&topology(), &standings()).expect("valid league");
        assert_eq!(league.teams().len(), 3);
        let c = league.team(&"c".into()).unwrap();
        assert_eq!(c.tiebreaker, 1);
        assert_eq!(league.division_of(&"c".into()).unwrap().name, "Two");
        assert_eq!(league.subleague_of(&"a".into()).unwrap().name, "Sub");
        assert_eq!(c.record.nonlosses(), 2);
    }

    #[test]
    fn unlisted_team_is_a_lookup_miss() {
        let league = League::build(&topology(), &standings()).expect("valid league");
        let err = league.team(&"bench".into()).unwrap_err();
        assert!(err.is_lookup_miss());
        let topo = topology();
        assert!(topo.subleague_of(&"bench".into()).unwrap_err().is_lookup_miss());
    }

    #[test]
    fn tiebreaker_for_unknown_team_is_rejected() {
        let mut topo = topology();
        topo.tiebreakers.push("ghost".into());
        let err = League::build(&topo, &standings()).unwrap_err();
        assert_eq!(err, ProjectError::UnknownTiebreaker("ghost".into()));

        // Listed teams outside every division may still carry a rank.
        let mut topo = topology();
        topo.tiebreakers.push("bench".into());
        assert!(League::build(&topo, &standings()).is_ok());
    }

    #[test]
    fn missing_tiebreaker_fails_fast() {
        let mut topo = topology();
        topo.tiebreakers.retain(|id| id.0 != "b");
        let err = League::build(&topo, &standings()).unwrap_err();
        assert_eq!(err, ProjectError::MissingTiebreaker("b".into()));
        assert!(!err.is_lookup_miss());
    }

    #[test]
    fn duplicate_membership_is_rejected() {
        let mut topo = topology();
        topo.divisions[1].teams.push("a".into());
        let err = League::build(&topo, &standings()).unwrap_err();
        assert_eq!(err, ProjectError::DuplicateMembership("a".into()));
    }

    #[test]
    fn missing_standings_is_rejected() {
        let mut s = standings();
        s.wins.remove(&TeamId::from("c"));
        let err = League::build(&topology(), &s).unwrap_err();
        assert_eq!(err, ProjectError::MissingStandings("c".into()));
    }
}
