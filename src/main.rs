//! volleyroster CLI
//!
//! Team roster, daily condition log, and rotation simulation for volleyball lineups.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use volleyroster::application::bootstrap::PersistenceBootstrap;
use volleyroster::application::reporting::RosterReporter;
use volleyroster::application::roster_service::RosterService;
use volleyroster::application::seeding::{DEFAULT_SEED_DAYS, RosterSeeder, SeedOptions};
use volleyroster::config::{Config, LogFormat};
use volleyroster::domain::condition::ConditionDraft;
use volleyroster::domain::court::{CourtPosition, RotationState};
use volleyroster::domain::formation::{FormationDraft, RosterSlot};
use volleyroster::domain::player::{
    Handedness, PlayerDraft, PlayerQuery, PlayerRole, PlayerSkills, PlayerSort,
};
use volleyroster::infrastructure::roster_file::{RosterFile, write_players_csv};

#[derive(Parser)]
#[command(author, version, about = "Volleyball roster and rotation planner", long_about = None)]
struct Cli {
    /// Use a throwaway in-memory database instead of DATABASE_URL
    #[arg(long, global = true)]
    in_memory: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage players
    Player {
        #[command(subcommand)]
        action: PlayerCommand,
    },
    /// Daily condition log
    Condition {
        #[command(subcommand)]
        action: ConditionCommand,
    },
    /// Saved starting lineups
    Formation {
        #[command(subcommand)]
        action: FormationCommand,
    },
    /// Walk a formation through all six rotations
    Simulate {
        /// Formation id
        formation: String,

        /// Condition date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Show a single rotation (1-6)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
        rotation: Option<u8>,
    },
    /// Team condition overview for a day
    Dashboard {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Import players and formations from a TOML roster file
    Seed {
        #[arg(short, long)]
        file: PathBuf,

        /// Delete all formations and players first
        #[arg(long)]
        reset: bool,

        /// Days of generated condition history
        #[arg(long, default_value_t = DEFAULT_SEED_DAYS)]
        days: u32,
    },
    /// Seed an in-memory roster and show the dashboard and every rotation
    Demo {
        #[arg(short, long, default_value = "demos/roster.toml")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum PlayerCommand {
    /// List players
    List {
        /// Name fragment or jersey number
        #[arg(short, long)]
        search: Option<String>,

        /// recent, number, skill (spike), overall
        #[arg(long, default_value = "recent")]
        sort: String,
    },
    /// Show a player with recent conditions
    Show { id: String },
    /// Register a player
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        number: u8,

        /// OH, OP, MB, S, L
        #[arg(long)]
        role: String,

        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        skills: SkillArgs,
    },
    /// Change fields of an existing player
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        number: Option<u8>,

        #[arg(long)]
        role: Option<String>,

        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        skills: SkillArgs,
    },
    /// Delete a player and their condition history
    Remove { id: String },
    /// Write all players as CSV
    Export {
        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ProfileArgs {
    /// right or left
    #[arg(long)]
    handedness: Option<String>,

    #[arg(long)]
    height: Option<u16>,

    #[arg(long)]
    memo: Option<String>,
}

#[derive(Args)]
struct SkillArgs {
    #[arg(long)]
    spike: Option<u8>,
    #[arg(long)]
    block: Option<u8>,
    #[arg(long)]
    receive: Option<u8>,
    #[arg(long)]
    serve: Option<u8>,
    #[arg(long)]
    toss: Option<u8>,
    #[arg(long)]
    connect: Option<u8>,
    #[arg(long)]
    decision: Option<u8>,
}

impl SkillArgs {
    fn apply(&self, skills: &mut PlayerSkills) {
        let fields = [
            (self.spike, &mut skills.spike),
            (self.block, &mut skills.block),
            (self.receive, &mut skills.receive),
            (self.serve, &mut skills.serve),
            (self.toss, &mut skills.toss),
            (self.connect, &mut skills.connect),
            (self.decision, &mut skills.decision),
        ];
        for (value, target) in fields {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

impl ProfileArgs {
    fn apply(&self, draft: &mut PlayerDraft) -> Result<()> {
        if let Some(handedness) = &self.handedness {
            draft.handedness = Handedness::from_str(handedness)?;
        }
        if let Some(height) = self.height {
            draft.height_cm = Some(height);
        }
        if let Some(memo) = &self.memo {
            draft.memo = Some(memo.clone());
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum ConditionCommand {
    /// Record (or overwrite) a player's condition for a day
    Log {
        /// Player id
        player: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value_t = 3)]
        health: u8,

        #[arg(long, default_value_t = 3)]
        fatigue: u8,

        #[arg(long, default_value_t = 0)]
        pain: u8,

        #[arg(long)]
        pain_area: Option<String>,

        #[arg(long, default_value_t = 3)]
        motivation: u8,

        #[arg(long)]
        memo: Option<String>,
    },
    /// Condition history of one player, newest first
    List {
        /// Player id
        player: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Every record for one day
    Day {
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a condition record
    Remove { id: String },
}

#[derive(Subcommand)]
enum FormationCommand {
    /// List formations
    List,
    /// Show a formation's court positions
    Show { id: String },
    /// Save a six-player formation
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// POSITION=PLAYER_ID, once per court position
        #[arg(long = "slot", value_name = "POSITION=PLAYER_ID")]
        slots: Vec<String>,

        /// Court position held by the libero
        #[arg(long)]
        libero: Option<u8>,

        /// Court position the libero substitutes for
        #[arg(long, requires = "libero")]
        libero_for: Option<u8>,
    },
    /// Delete a formation
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config);

    let in_memory = cli.in_memory || matches!(cli.command, Commands::Demo { .. });
    let handle = if in_memory {
        PersistenceBootstrap::in_memory().await?
    } else {
        PersistenceBootstrap::init(&config).await?
    };
    let service = handle
        .roster_service()
        .with_recent_condition_limit(config.recent_condition_limit);
    let reporter = RosterReporter::new();

    match cli.command {
        Commands::Player { action } => run_player(&service, &reporter, action, cli.json).await?,
        Commands::Condition { action } => {
            run_condition(&service, &reporter, action, cli.json).await?
        }
        Commands::Formation { action } => {
            run_formation(&service, &reporter, action, cli.json).await?
        }
        Commands::Simulate {
            formation,
            date,
            rotation,
        } => {
            let date = parse_date(date.as_deref())?;
            let report = service.simulate(&formation, date).await?;
            if cli.json {
                reporter.print_json(&report)?;
            } else {
                let only = rotation.map(|r| RotationState::new(r - 1));
                reporter.print_simulation(&report, only);
            }
        }
        Commands::Dashboard { date } => {
            let dashboard = service.dashboard(parse_date(date.as_deref())?).await?;
            if cli.json {
                reporter.print_json(&dashboard)?;
            } else {
                reporter.print_dashboard(&dashboard);
            }
        }
        Commands::Seed { file, reset, days } => {
            let roster = RosterFile::load(&file)?;
            let options = SeedOptions {
                reset,
                condition_days: days,
                today: today(),
            };
            let summary = RosterSeeder::new(&service).seed(roster, &options).await?;
            if cli.json {
                reporter.print_json(&summary)?;
            } else {
                reporter.print_seed_summary(&summary);
            }
        }
        Commands::Demo { file } => {
            let roster = RosterFile::load(&file)?;
            let options = SeedOptions::new(today());
            let summary = RosterSeeder::new(&service).seed(roster, &options).await?;
            reporter.print_seed_summary(&summary);
            println!();

            reporter.print_dashboard(&service.dashboard(options.today).await?);
            for formation in service.list_formations().await? {
                let report = service.simulate(&formation.id, options.today).await?;
                reporter.print_simulation(&report, None);
            }
        }
    }

    Ok(())
}

async fn run_player(
    service: &RosterService,
    reporter: &RosterReporter,
    action: PlayerCommand,
    json: bool,
) -> Result<()> {
    match action {
        PlayerCommand::List { search, sort } => {
            let mut query = PlayerQuery::default().sorted_by(PlayerSort::from_str(&sort)?);
            if let Some(term) = search {
                query = query.search(term);
            }
            let players = service.list_players(&query).await?;
            if json {
                reporter.print_json(&players)?;
            } else {
                reporter.print_players(&players);
            }
        }
        PlayerCommand::Show { id } => {
            let detail = service.get_player(&id).await?;
            if json {
                reporter.print_json(&detail)?;
            } else {
                reporter.print_player_detail(&detail);
            }
        }
        PlayerCommand::Add {
            name,
            number,
            role,
            profile,
            skills,
        } => {
            let mut draft = PlayerDraft::new(name, number, PlayerRole::from_str(&role)?);
            profile.apply(&mut draft)?;
            skills.apply(&mut draft.skills);

            let player = service.create_player(draft).await?;
            if json {
                reporter.print_json(&player)?;
            } else {
                println!("✅ Added #{} {} ({})", player.number, player.name, player.id);
            }
        }
        PlayerCommand::Edit {
            id,
            name,
            number,
            role,
            profile,
            skills,
        } => {
            let current = service.get_player(&id).await?.player;
            let mut draft = PlayerDraft::from(&current);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(number) = number {
                draft.number = number;
            }
            if let Some(role) = role {
                draft.role = PlayerRole::from_str(&role)?;
            }
            profile.apply(&mut draft)?;
            skills.apply(&mut draft.skills);

            let player = service.update_player(&id, draft).await?;
            if json {
                reporter.print_json(&player)?;
            } else {
                println!("✅ Updated #{} {}", player.number, player.name);
            }
        }
        PlayerCommand::Remove { id } => {
            service.delete_player(&id).await?;
            println!("🗑️  Removed player {}", id);
        }
        PlayerCommand::Export { output } => {
            let players = service
                .list_players(&PlayerQuery::default().sorted_by(PlayerSort::Number))
                .await?;
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .context(format!("Failed to create {}", path.display()))?;
                    write_players_csv(&players, file)?;
                    info!("Exported {} player(s) to {}", players.len(), path.display());
                }
                None => write_players_csv(&players, std::io::stdout().lock())?,
            }
        }
    }
    Ok(())
}

async fn run_condition(
    service: &RosterService,
    reporter: &RosterReporter,
    action: ConditionCommand,
    json: bool,
) -> Result<()> {
    match action {
        ConditionCommand::Log {
            player,
            date,
            health,
            fatigue,
            pain,
            pain_area,
            motivation,
            memo,
        } => {
            let mut draft = ConditionDraft::new(player, parse_date(date.as_deref())?);
            draft.health = health;
            draft.fatigue = fatigue;
            draft.pain = pain;
            draft.pain_area = pain_area;
            draft.motivation = motivation;
            draft.memo = memo;

            let record = service.upsert_condition(draft).await?;
            if json {
                reporter.print_json(&record)?;
            } else {
                println!("✅ Recorded condition {} for {}", record.id, record.date);
            }
        }
        ConditionCommand::List { player, limit } => {
            let records = service.player_conditions(&player, limit).await?;
            if json {
                reporter.print_json(&records)?;
            } else {
                reporter.print_conditions(&records, &[]);
            }
        }
        ConditionCommand::Day { date } => {
            let records = service.conditions_on(parse_date(date.as_deref())?).await?;
            if json {
                reporter.print_json(&records)?;
            } else {
                let players = service.list_players(&PlayerQuery::default()).await?;
                reporter.print_conditions(&records, &players);
            }
        }
        ConditionCommand::Remove { id } => {
            let record = service.delete_condition(&id).await?;
            println!("🗑️  Removed condition {} ({})", record.id, record.date);
        }
    }
    Ok(())
}

async fn run_formation(
    service: &RosterService,
    reporter: &RosterReporter,
    action: FormationCommand,
    json: bool,
) -> Result<()> {
    match action {
        FormationCommand::List => {
            let formations = service.list_formations().await?;
            if json {
                reporter.print_json(&formations)?;
            } else {
                reporter.print_formations(&formations);
            }
        }
        FormationCommand::Show { id } => {
            let detail = service.get_formation(&id).await?;
            if json {
                reporter.print_json(&detail)?;
            } else {
                reporter.print_formation_detail(&detail);
            }
        }
        FormationCommand::Create {
            name,
            description,
            slots,
            libero,
            libero_for,
        } => {
            let libero = libero.map(CourtPosition::new).transpose()?;
            let libero_for = libero_for.map(CourtPosition::new).transpose()?;

            let mut roster = Vec::with_capacity(slots.len());
            for spec in &slots {
                let mut slot = parse_slot(spec)?;
                if Some(slot.position) == libero {
                    slot.is_libero = true;
                    slot.libero_for = libero_for;
                }
                roster.push(slot);
            }

            let mut draft = FormationDraft::new(name, roster);
            draft.description = description;

            let formation = service.create_formation(draft).await?;
            if json {
                reporter.print_json(&formation)?;
            } else {
                println!("✅ Created formation {} ({})", formation.name, formation.id);
            }
        }
        FormationCommand::Remove { id } => {
            service.delete_formation(&id).await?;
            println!("🗑️  Removed formation {}", id);
        }
    }
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // stderr keeps stdout clean for tables, CSV and JSON
    match config.log_format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.log_with_target)
                    .pretty(),
            )
            .init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.log_with_target)
                    .compact(),
            )
            .init(),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .context(format!("Invalid date format: {}", value)),
        None => Ok(today()),
    }
}

/// Parses `POSITION=PLAYER_ID`
fn parse_slot(spec: &str) -> Result<RosterSlot> {
    let (position, player_id) = spec
        .split_once('=')
        .context(format!("Invalid slot '{}', expected POSITION=PLAYER_ID", spec))?;
    let position: u8 = position
        .trim()
        .parse()
        .context(format!("Invalid court position in slot '{}'", spec))?;

    Ok(RosterSlot::new(
        CourtPosition::new(position)?,
        player_id.trim(),
    ))
}
