//! Roster import with generated demo conditions.

use crate::application::roster_service::RosterService;
use crate::domain::condition::ConditionDraft;
use crate::domain::formation::{FormationDraft, RosterSlot};
use crate::domain::player::PlayerQuery;
use crate::infrastructure::roster_file::{FormationEntry, RosterFile};
use anyhow::{Context, Result, bail};
use chrono::{Days, NaiveDate};
use rand::Rng;
use std::collections::HashMap;
use tracing::info;

/// Days of generated condition history when none is requested
pub const DEFAULT_SEED_DAYS: u32 = 5;

const PAIN_CHANCE: f64 = 0.2;
const PAIN_AREA: &str = "knee";

#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Remove every formation and player first
    pub reset: bool,
    /// Condition history length in days, ending with `today`
    pub condition_days: u32,
    pub today: NaiveDate,
}

impl SeedOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            reset: false,
            condition_days: DEFAULT_SEED_DAYS,
            today,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedSummary {
    pub players_removed: usize,
    pub players_created: usize,
    pub conditions_recorded: usize,
    pub formations_created: usize,
}

pub struct RosterSeeder<'a> {
    service: &'a RosterService,
}

impl<'a> RosterSeeder<'a> {
    pub fn new(service: &'a RosterService) -> Self {
        Self { service }
    }

    pub async fn seed(&self, roster: RosterFile, options: &SeedOptions) -> Result<SeedSummary> {
        let mut summary = SeedSummary::default();

        if options.reset {
            summary.players_removed = self.reset().await?;
        }

        let mut created_ids = Vec::with_capacity(roster.players.len());
        for draft in roster.players {
            let name = draft.name.clone();
            let player = self
                .service
                .create_player(draft)
                .await
                .context(format!("Failed to import player {}", name))?;
            created_ids.push(player.id);
        }
        summary.players_created = created_ids.len();

        // ThreadRng is not Send, so draw everything before the next await
        let drafts = {
            let mut rng = rand::rng();
            random_conditions(&created_ids, options.today, options.condition_days, &mut rng)
        };
        for draft in drafts {
            self.service.upsert_condition(draft).await?;
            summary.conditions_recorded += 1;
        }

        let numbers = self.jersey_index().await?;
        for entry in &roster.formations {
            let draft = formation_draft(entry, &numbers)?;
            self.service
                .create_formation(draft)
                .await
                .context(format!("Failed to import formation {}", entry.name))?;
            summary.formations_created += 1;
        }

        info!(
            "Seeded {} player(s), {} condition record(s), {} formation(s)",
            summary.players_created, summary.conditions_recorded, summary.formations_created
        );
        Ok(summary)
    }

    /// Formations go first since they pin their players
    async fn reset(&self) -> Result<usize> {
        for formation in self.service.list_formations().await? {
            self.service.delete_formation(&formation.id).await?;
        }

        let players = self.service.list_players(&PlayerQuery::default()).await?;
        for player in &players {
            self.service.delete_player(&player.id).await?;
        }

        info!("Reset roster: removed {} player(s)", players.len());
        Ok(players.len())
    }

    async fn jersey_index(&self) -> Result<HashMap<u8, Vec<String>>> {
        let mut index: HashMap<u8, Vec<String>> = HashMap::new();
        for player in self.service.list_players(&PlayerQuery::default()).await? {
            index.entry(player.number).or_default().push(player.id);
        }
        Ok(index)
    }
}

/// One entry per player per day for the `days` days ending with `today`
pub fn random_conditions<R: Rng>(
    player_ids: &[String],
    today: NaiveDate,
    days: u32,
    rng: &mut R,
) -> Vec<ConditionDraft> {
    let mut drafts = Vec::with_capacity(player_ids.len() * days as usize);

    for offset in 0..u64::from(days) {
        let Some(date) = today.checked_sub_days(Days::new(offset)) else {
            break;
        };

        for player_id in player_ids {
            let mut draft = ConditionDraft::new(player_id.as_str(), date);
            draft.health = rng.random_range(3..=5);
            draft.fatigue = rng.random_range(2..=4);
            draft.motivation = rng.random_range(3..=5);
            if rng.random_bool(PAIN_CHANCE) {
                draft.pain = rng.random_range(1..=3);
                draft.pain_area = Some(PAIN_AREA.to_string());
            }
            drafts.push(draft);
        }
    }

    drafts
}

fn formation_draft(
    entry: &FormationEntry,
    numbers: &HashMap<u8, Vec<String>>,
) -> Result<FormationDraft> {
    let mut slots = Vec::with_capacity(entry.slots.len());

    for slot in &entry.slots {
        let player_id = match numbers.get(&slot.number).map(Vec::as_slice) {
            Some([id]) => id.clone(),
            Some([]) | None => bail!(
                "Formation {}: no player wears number {}",
                entry.name,
                slot.number
            ),
            Some(_) => bail!(
                "Formation {}: number {} is worn by more than one player",
                entry.name,
                slot.number
            ),
        };

        let mut roster_slot = RosterSlot::new(slot.position, player_id);
        roster_slot.is_libero = slot.libero;
        roster_slot.libero_for = slot.libero_for;
        slots.push(roster_slot);
    }

    Ok(FormationDraft {
        name: entry.name.clone(),
        description: entry.description.clone(),
        slots,
    })
}
