//! Roster import from CSV: `name,club,league,nation,seed` with a header row.

use crate::models::{non_empty, Competitor, TournamentError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RosterRecord {
    name: String,
    #[serde(default)]
    club: Option<String>,
    #[serde(default)]
    league: Option<String>,
    #[serde(default)]
    nation: Option<String>,
    #[serde(default)]
    seed: Option<u32>,
}

/// Read competitors from CSV. Empty cells become `None`; rows without a name are rejected.
pub fn parse_roster_csv<R: Read>(reader: R) -> Result<Vec<Competitor>, TournamentError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut competitors = Vec::new();
    for (line, record) in csv_reader.deserialize::<RosterRecord>().enumerate() {
        let record = record.map_err(|e| TournamentError::RosterParse(e.to_string()))?;
        let name = record.name.trim();
        if name.is_empty() {
            return Err(TournamentError::RosterParse(format!(
                "row {} has no name",
                line + 1
            )));
        }
        competitors.push(Competitor {
            club: non_empty(record.club),
            league: non_empty(record.league),
            nation: non_empty(record.nation),
            seed: record.seed,
            ..Competitor::new(name)
        });
    }
    log::info!("Imported {} competitor(s) from roster", competitors.len());
    Ok(competitors)
}
