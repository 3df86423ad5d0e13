//! Roster import and export files.
//!
//! Import is a TOML document listing players and formations; formation slots
//! refer to players by jersey number so the file does not depend on ids.
//! Export writes the player list as CSV.

use crate::domain::court::CourtPosition;
use crate::domain::player::{Handedness, Player, PlayerDraft, PlayerRole};
use crate::domain::scoring::overall_skill;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct RosterFile {
    #[serde(default)]
    pub players: Vec<PlayerDraft>,
    #[serde(default)]
    pub formations: Vec<FormationEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormationEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub slots: Vec<SlotEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotEntry {
    pub position: CourtPosition,
    /// Jersey number of a player listed in the same file or already stored
    pub number: u8,
    #[serde(default)]
    pub libero: bool,
    #[serde(default)]
    pub libero_for: Option<CourtPosition>,
}

impl RosterFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse roster TOML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read roster file: {}", path.display()))?;
        Self::parse(&content).context(format!("Invalid roster file: {}", path.display()))
    }
}

/// One CSV line of the player export
#[derive(Debug, Serialize)]
struct PlayerRow<'a> {
    number: u8,
    name: &'a str,
    role: PlayerRole,
    handedness: Handedness,
    height_cm: Option<u16>,
    spike: u8,
    block: u8,
    receive: u8,
    serve: u8,
    toss: u8,
    connect: u8,
    decision: u8,
    overall: String,
    id: &'a str,
}

pub fn write_players_csv<W: Write>(players: &[Player], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(writer);

    for player in players {
        wtr.serialize(PlayerRow {
            number: player.number,
            name: &player.name,
            role: player.role,
            handedness: player.handedness,
            height_cm: player.height_cm,
            spike: player.skills.spike,
            block: player.skills.block,
            receive: player.skills.receive,
            serve: player.skills.serve,
            toss: player.skills.toss,
            connect: player.skills.connect,
            decision: player.skills.decision,
            overall: format!("{:.1}", overall_skill(&player.skills)),
            id: &player.id,
        })
        .context(format!("Failed to serialize player {}", player.id))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}
