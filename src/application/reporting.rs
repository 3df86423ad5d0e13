//! Console output for the roster CLI.
//!
//! Tables go to stdout; `--json` callers use [`RosterReporter::print_json`] instead.

use crate::application::roster_service::{
    Dashboard, FormationDetail, PlayerDetail, SimulationReport,
};
use crate::application::seeding::SeedSummary;
use crate::domain::condition::ConditionRecord;
use crate::domain::court::{CourtPosition, RotationState};
use crate::domain::formation::Formation;
use crate::domain::player::Player;
use crate::domain::scoring::{ConditionTone, SkillTier, overall_skill};
use crate::domain::simulation::RotationSnapshot;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;

const WIDTH: usize = 72;

/// Reporter for roster views.
#[derive(Default)]
pub struct RosterReporter;

impl RosterReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json =
            serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;
        println!("{}", json);
        Ok(())
    }

    pub fn print_players(&self, players: &[Player]) {
        if players.is_empty() {
            println!("No players registered.");
            return;
        }

        println!(
            "{:>3} | {:<20} | {:<3} | {:>5} | {:>5} | {:>7} | {:>7} | {:<36}",
            "#", "Name", "Pos", "Spike", "Block", "Receive", "Overall", "Id"
        );
        println!("{}", "-".repeat(WIDTH + 28));

        for player in players {
            println!(
                "{:>3} | {:<20} | {:<3} | {:>5} | {:>5} | {:>7} | {:>7.1} | {:<36}",
                player.number,
                player.name,
                player.role.code(),
                player.skills.spike,
                player.skills.block,
                player.skills.receive,
                overall_skill(&player.skills),
                player.id
            );
        }
    }

    pub fn print_player_detail(&self, detail: &PlayerDetail) {
        let player = &detail.player;

        println!("{}", "=".repeat(WIDTH));
        println!(
            "#{} {} ({}, {})",
            player.number,
            player.name,
            player.role.label(),
            player.handedness
        );
        println!("{}", "=".repeat(WIDTH));
        println!("  Id:        {}", player.id);
        if let Some(height) = player.height_cm {
            println!("  Height:    {} cm", height);
        }
        if let Some(memo) = &player.memo {
            println!("  Memo:      {}", memo);
        }

        println!("\n📊 Skills:");
        for (name, value) in player.skills.entries() {
            println!(
                "  {:<10} {:>3}  {}",
                name,
                value,
                tier_label(SkillTier::of(f64::from(value)))
            );
        }
        println!(
            "  {:<10} {:>5.1}  {}",
            "overall",
            detail.overall,
            tier_label(SkillTier::of(detail.overall))
        );

        println!("\n🩺 Recent conditions:");
        if detail.recent_conditions.is_empty() {
            println!("  (none recorded)");
        } else {
            self.print_condition_rows(&detail.recent_conditions, &HashMap::new());
        }
        println!();
    }

    /// Condition rows labelled with the owning player from `players`
    pub fn print_conditions(&self, records: &[ConditionRecord], players: &[Player]) {
        if records.is_empty() {
            println!("No condition records.");
            return;
        }
        let names = players
            .iter()
            .map(|p| (p.id.as_str(), format!("#{} {}", p.number, p.name)))
            .collect();
        self.print_condition_rows(records, &names);
    }

    fn print_condition_rows(&self, records: &[ConditionRecord], names: &HashMap<&str, String>) {
        println!(
            "  {:<10} | {:<24} | {:>2} | {:>2} | {:>4} | {:>2} | {:<5} | {:<36}",
            "Date", "Player", "H", "F", "Pain", "M", "Tone", "Id"
        );
        for record in records {
            let player = names
                .get(record.player_id.as_str())
                .cloned()
                .unwrap_or_else(|| "-".to_string());
            let pain = match &record.pain_area {
                Some(area) if record.pain > 0 => format!("{} ({})", record.pain, area),
                _ => record.pain.to_string(),
            };
            println!(
                "  {:<10} | {:<24} | {:>2} | {:>2} | {:>4} | {:>2} | {:<5} | {:<36}",
                record.date.to_string(),
                player,
                record.health,
                record.fatigue,
                pain,
                record.motivation,
                tone_label(ConditionTone::of(record.health, record.fatigue)),
                record.id
            );
        }
    }

    pub fn print_formations(&self, formations: &[Formation]) {
        if formations.is_empty() {
            println!("No formations saved.");
            return;
        }

        for formation in formations {
            println!(
                "{:<36}  {}{}",
                formation.id,
                formation.name,
                formation
                    .description
                    .as_deref()
                    .map(|d| format!(" - {}", d))
                    .unwrap_or_default()
            );
        }
    }

    pub fn print_formation_detail(&self, detail: &FormationDetail) {
        let formation = &detail.formation;
        println!("{}", "=".repeat(WIDTH));
        println!("🏐 {} ({})", formation.name, formation.id);
        if let Some(description) = &formation.description {
            println!("   {}", description);
        }
        println!("{}", "=".repeat(WIDTH));

        for member in &detail.members {
            let who = member
                .player
                .as_ref()
                .map(|p| format!("#{} {} ({})", p.number, p.name, p.role.code()))
                .unwrap_or_else(|| format!("missing player {}", member.slot.player_id));
            let libero = match (member.slot.is_libero, member.slot.libero_for) {
                (true, Some(target)) => format!("  [libero for {}]", target),
                (true, None) => "  [libero]".to_string(),
                _ => String::new(),
            };
            println!(
                "  {} {:<13} {}{}",
                member.slot.position,
                member.slot.position.label(),
                who,
                libero
            );
        }
        println!();
    }

    /// Prints every rotation, or only `only` when given
    pub fn print_simulation(&self, report: &SimulationReport, only: Option<RotationState>) {
        println!("{}", "=".repeat(WIDTH));
        println!(
            "🔄 ROTATION SIMULATION - {} on {}",
            report.formation_name, report.date
        );
        println!(
            "   Conditions recorded for {}/6 players (others count as neutral)",
            report.conditions_recorded
        );
        println!("{}", "=".repeat(WIDTH));

        for snapshot in &report.rotations {
            if only.is_some_and(|r| r != snapshot.rotation) {
                continue;
            }
            self.print_snapshot(snapshot);
        }

        if only.is_none() {
            self.print_rotation_summary(&report.rotations);
        }
    }

    fn print_snapshot(&self, snapshot: &RotationSnapshot) {
        println!("\nRotation {}", snapshot.rotation.ordinal());
        for line in court_lines(snapshot) {
            println!("  {}", line);
        }
        let m = &snapshot.metrics;
        println!(
            "  Attack {:>5.1} | Defense {:>5.1} | Serve {:>5.1} | Block {:>5.1}",
            m.attack, m.defense, m.serve, m.block
        );
    }

    fn print_rotation_summary(&self, rotations: &[RotationSnapshot]) {
        println!("\n{}", "-".repeat(WIDTH));
        println!(
            "{:<8} | {:>7} | {:>7} | {:>7} | {:>7}",
            "Rotation", "Attack", "Defense", "Serve", "Block"
        );
        for snapshot in rotations {
            let m = &snapshot.metrics;
            println!(
                "{:<8} | {:>7.1} | {:>7.1} | {:>7.1} | {:>7.1}",
                snapshot.rotation.ordinal(),
                m.attack,
                m.defense,
                m.serve,
                m.block
            );
        }
        println!("{}\n", "-".repeat(WIDTH));
    }

    pub fn print_dashboard(&self, dashboard: &Dashboard) {
        let summary = &dashboard.summary;
        println!("{}", "=".repeat(WIDTH));
        println!("📋 TEAM DASHBOARD - {}", summary.date);
        println!("{}", "=".repeat(WIDTH));
        println!("  Players:          {}", dashboard.roster_size);
        println!(
            "  Recorded today:   {}/{}",
            summary.recorded, dashboard.roster_size
        );
        println!("  Avg health:       {}", average_label(summary.avg_health));
        println!("  Avg fatigue:      {}", average_label(summary.avg_fatigue));
        println!("  Avg motivation:   {}", average_label(summary.avg_motivation));

        if dashboard.attention.is_empty() {
            println!("\n✅ No players need attention.");
        } else {
            println!("\n⚠️  Needs attention:");
            for entry in &dashboard.attention {
                let number = entry
                    .player_number
                    .map(|n| format!("#{} ", n))
                    .unwrap_or_default();
                println!(
                    "  {}{:<20} health={} fatigue={} pain={}",
                    number,
                    entry.player_name,
                    entry.record.health,
                    entry.record.fatigue,
                    entry.record.pain
                );
            }
        }
        println!();
    }

    pub fn print_seed_summary(&self, summary: &SeedSummary) {
        if summary.players_removed > 0 {
            println!("🧹 Removed {} existing player(s)", summary.players_removed);
        }
        println!("🌱 Imported {} player(s)", summary.players_created);
        println!(
            "🩺 Generated {} condition record(s)",
            summary.conditions_recorded
        );
        println!("🏐 Created {} formation(s)", summary.formations_created);
    }
}

/// Court grid for one rotation: net side on top, front row 4-3-2 then back row 5-6-1
pub fn court_lines(snapshot: &RotationSnapshot) -> Vec<String> {
    const LAYOUT: [[u8; 3]; 2] = [[4, 3, 2], [5, 6, 1]];

    let mut lines = vec![format!("{:^62}", "---------------- net ----------------")];
    for row in LAYOUT {
        let cells: Vec<String> = row
            .iter()
            .map(|&value| {
                CourtPosition::new(value)
                    .ok()
                    .and_then(|position| snapshot.at(position))
                    .map(|p| {
                        format!(
                            "{}:#{:<2} {:<9} x{:.2}",
                            p.position,
                            p.slot.player_number,
                            truncate(&p.slot.player_name, 9),
                            p.condition_factor
                        )
                    })
                    .unwrap_or_default()
            })
            .collect();
        lines.push(cells.join(" | "));
    }
    lines
}

fn truncate(name: &str, width: usize) -> String {
    name.chars().take(width).collect()
}

fn average_label(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string())
}

fn tier_label(tier: SkillTier) -> &'static str {
    match tier {
        SkillTier::Excellent => "excellent",
        SkillTier::Good => "good",
        SkillTier::Average => "average",
        SkillTier::Weak => "weak",
    }
}

fn tone_label(tone: ConditionTone) -> &'static str {
    match tone {
        ConditionTone::Good => "good",
        ConditionTone::Fair => "fair",
        ConditionTone::Poor => "poor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::PlayerSkills;
    use crate::domain::simulation::{Lineup, LineupSlot};

    fn lineup() -> Lineup {
        Lineup::new(
            (1..=6)
                .map(|p| LineupSlot {
                    base_position: CourtPosition::new(p).unwrap(),
                    player_id: format!("p{}", p),
                    player_name: format!("Player{}", p),
                    player_number: p + 10,
                    is_libero: false,
                    skills: PlayerSkills::default(),
                    condition: None,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_court_lines_follow_rotation() {
        let lineup = lineup();

        let first = court_lines(&lineup.snapshot(RotationState::default()));
        assert_eq!(first.len(), 3);
        assert!(first[1].starts_with("4:#14 Player4"));
        assert!(first[2].ends_with("1:#11 Player1   x1.00"));

        // After one rotation the player from 2 serves from 1
        let second = court_lines(&lineup.snapshot(RotationState::new(1)));
        assert!(second[2].contains("1:#12 Player2"));
    }

    #[test]
    fn test_average_label() {
        assert_eq!(average_label(None), "-");
        assert_eq!(average_label(Some(3.26)), "3.3");
    }
}
