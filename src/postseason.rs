use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::league::{LeagueTopology, TeamId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostseasonSnapshot {
    pub name: String,
    pub round: String,
    #[serde(default)]
    pub matchups: Vec<Matchup>,
}

/// Seeds are 0-based, as the feed publishes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: String,
    #[serde(default)]
    pub home_team: Option<TeamId>,
    #[serde(default)]
    pub away_team: Option<TeamId>,
    #[serde(default)]
    pub home_seed: Option<u32>,
    #[serde(default)]
    pub away_seed: Option<u32>,
    #[serde(default)]
    pub home_wins: u32,
    #[serde(default)]
    pub away_wins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRow {
    /// 1-based for display.
    pub seed: u32,
    pub name: String,
    pub color: String,
    pub championships: u32,
    pub underchampionships: u32,
    pub wins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupRows {
    pub id: String,
    pub rows: Vec<SeedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubleagueMatchups {
    pub subleague: String,
    pub matchups: Vec<MatchupRows>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffStandings {
    pub name: String,
    pub round: String,
    pub games: Vec<SubleagueMatchups>,
}

impl PlayoffStandings {
    pub fn subleague(&self, name: &str) -> Option<&SubleagueMatchups> {
        self.games.iter().find(|g| g.subleague == name)
    }
}

/// Groups the current round's matchups under each side's subleague. Sides
/// without a seed or whose team is not in the league are skipped.
pub fn group_matchups(topology: &LeagueTopology, postseason: &PostseasonSnapshot) -> PlayoffStandings {
    let mut games: Vec<SubleagueMatchups> = topology
        .subleagues
        .iter()
        .map(|s| SubleagueMatchups {
            subleague: s.name.clone(),
            matchups: Vec::new(),
        })
        .collect();

    for matchup in &postseason.matchups {
        let sides = [
            (&matchup.away_team, matchup.away_seed, matchup.away_wins),
            (&matchup.home_team, matchup.home_seed, matchup.home_wins),
        ];
        for (team_id, seed, wins) in sides {
            let (Some(team_id), Some(seed)) = (team_id, seed) else {
                continue;
            };
            let (info, subleague) = match (topology.team(team_id), topology.subleague_of(team_id)) {
                (Ok(info), Ok(subleague)) => (info, subleague),
                (Err(err), _) | (_, Err(err)) => {
                    warn!(matchup = %matchup.id, "skipping playoff side: {err}");
                    continue;
                }
            };
            let Some(group) = games.iter_mut().find(|g| g.subleague == subleague.name) else {
                continue;
            };
            let row = SeedRow {
                seed: seed + 1,
                name: info.name.clone(),
                color: info.color.clone(),
                championships: info.championships,
                underchampionships: info.underchampionships,
                wins,
            };
            match group.matchups.iter_mut().find(|m| m.id == matchup.id) {
                Some(existing) => existing.rows.push(row),
                None => group.matchups.push(MatchupRows {
                    id: matchup.id.clone(),
                    rows: vec![row],
                }),
            }
        }
    }

    PlayoffStandings {
        name: postseason.name.clone(),
        round: postseason.round.clone(),
        games,
    }
}
