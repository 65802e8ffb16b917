use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::estimate::TOTAL_GAMES;
use crate::league::{Division, LeagueTopology, Record, Standings, Subleague, TeamId, TeamInfo};
use crate::snapshot::Snapshot;

const SUBLEAGUES: [(&str, [&str; 2]); 2] = [
    ("The Wild League", ["Wild High", "Wild Low"]),
    ("The Mild League", ["Mild High", "Mild Low"]),
];

const NICKNAMES: [&str; 20] = [
    "Lovers", "Tacos", "Steaks", "Breath Mints", "Firefighters",
    "Shoe Thieves", "Flowers", "Fridays", "Magic", "Millennials",
    "Crabs", "Spies", "Pies", "Sunbeams", "Wild Wings",
    "Tigers", "Moist Talkers", "Jazz Hands", "Dale", "Garages",
];

/// Deterministic synthetic league: 2 subleagues of 2 divisions of 5 teams,
/// simulated up to `day` with a fixed per-team strength.
pub fn demo_snapshot(seed: u64, day: u32) -> Snapshot {
    let mut rng = StdRng::seed_from_u64(seed);
    let day = day.min(TOTAL_GAMES);

    let mut teams = Vec::new();
    let mut divisions = Vec::new();
    let mut subleagues = Vec::new();
    let mut standings = Standings::default();

    let mut names = NICKNAMES.iter();
    for (sub_idx, (sub_name, div_names)) in SUBLEAGUES.iter().enumerate() {
        let mut sub_divisions = Vec::new();
        for (div_idx, div_name) in div_names.iter().enumerate() {
            let division_id = format!("div-{sub_idx}-{div_idx}");
            let mut members = Vec::new();
            for slot in 0..5 {
                let id = TeamId(format!("team-{sub_idx}-{div_idx}-{slot}"));
                let name = names.next().copied().unwrap_or("Team");
                teams.push(TeamInfo {
                    id: id.clone(),
                    name: name.to_string(),
                    color: format!("#{:06x}", rng.gen_range(0..0x100_0000u32)),
                    championships: rng.gen_range(0..3),
                    underchampionships: u32::from(rng.gen_bool(0.1)),
                });
                standings.insert(id.clone(), simulate_record(&mut rng, day));
                members.push(id);
            }
            divisions.push(Division {
                id: division_id.as_str().into(),
                name: div_name.to_string(),
                teams: members,
            });
            sub_divisions.push(division_id.into());
        }
        subleagues.push(Subleague {
            id: format!("sub-{sub_idx}").into(),
            name: sub_name.to_string(),
            divisions: sub_divisions,
        });
    }

    let mut tiebreakers: Vec<TeamId> = teams.iter().map(|t| t.id.clone()).collect();
    tiebreakers.shuffle(&mut rng);

    Snapshot {
        season: 0,
        day,
        topology: LeagueTopology {
            id: "demo".into(),
            name: "Demo League".to_string(),
            subleagues,
            divisions,
            teams,
            tiebreakers,
        },
        standings,
        postseason: None,
    }
}

fn simulate_record(rng: &mut StdRng, day: u32) -> Record {
    let strength = rng.gen_range(0.35..0.65);
    let mut record = Record::default();
    for _ in 0..day {
        record.games_played += 1;
        // Weather now and then leaves a game without a decision.
        if rng.gen_bool(0.02) {
            continue;
        }
        if rng.gen_bool(strength) {
            record.wins += 1;
        } else {
            record.losses += 1;
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::League;

    #[test]
    fn same_seed_same_league() {
        assert_eq!(demo_snapshot(7, 40), demo_snapshot(7, 40));
    }

    #[test]
    fn demo_league_validates() {
        let snap = demo_snapshot(1, 60);
        let league = League::build(&snap.topology, &snap.standings).expect("demo league is valid");
        assert_eq!(league.teams().len(), 20);
        assert_eq!(league.subleagues().len(), 2);
        assert!(league.teams().iter().all(|t| t.record.games_played == 60));
    }
}
