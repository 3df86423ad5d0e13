//! Player records and their validated input form.

use crate::domain::errors::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SKILL_MIN: u8 = 0;
pub const SKILL_MAX: u8 = 100;
pub const DEFAULT_SKILL: u8 = 50;
pub const JERSEY_MAX: u8 = 99;

/// Technical ability profile, every attribute in 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSkills {
    pub spike: u8,
    pub block: u8,
    pub receive: u8,
    pub serve: u8,
    pub toss: u8,
    pub connect: u8,
    pub decision: u8,
}

impl Default for PlayerSkills {
    fn default() -> Self {
        Self::uniform(DEFAULT_SKILL)
    }
}

impl PlayerSkills {
    pub fn uniform(value: u8) -> Self {
        Self {
            spike: value,
            block: value,
            receive: value,
            serve: value,
            toss: value,
            connect: value,
            decision: value,
        }
    }

    /// Attribute names paired with values, in display order
    pub fn entries(&self) -> [(&'static str, u8); 7] {
        [
            ("spike", self.spike),
            ("block", self.block),
            ("receive", self.receive),
            ("serve", self.serve),
            ("toss", self.toss),
            ("connect", self.connect),
            ("decision", self.decision),
        ]
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in self.entries() {
            ValidationError::check_range(
                field,
                i64::from(value),
                i64::from(SKILL_MIN),
                i64::from(SKILL_MAX),
            )?;
        }
        Ok(())
    }
}

/// Playing role on the team sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    #[serde(rename = "OH")]
    OutsideHitter,
    #[serde(rename = "OP")]
    Opposite,
    #[serde(rename = "MB")]
    MiddleBlocker,
    #[serde(rename = "S")]
    Setter,
    #[serde(rename = "L")]
    Libero,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; 5] = [
        PlayerRole::OutsideHitter,
        PlayerRole::Opposite,
        PlayerRole::MiddleBlocker,
        PlayerRole::Setter,
        PlayerRole::Libero,
    ];

    pub fn code(self) -> &'static str {
        match self {
            PlayerRole::OutsideHitter => "OH",
            PlayerRole::Opposite => "OP",
            PlayerRole::MiddleBlocker => "MB",
            PlayerRole::Setter => "S",
            PlayerRole::Libero => "L",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerRole::OutsideHitter => "Outside Hitter",
            PlayerRole::Opposite => "Opposite",
            PlayerRole::MiddleBlocker => "Middle Blocker",
            PlayerRole::Setter => "Setter",
            PlayerRole::Libero => "Libero",
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for PlayerRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerRole::ALL
            .into_iter()
            .find(|role| role.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownRole {
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Right => write!(f, "right"),
            Handedness::Left => write!(f, "left"),
        }
    }
}

impl FromStr for Handedness {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "right" => Ok(Handedness::Right),
            "left" => Ok(Handedness::Left),
            _ => Err(ValidationError::UnknownHandedness {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub number: u8,
    pub role: PlayerRole,
    pub handedness: Handedness,
    pub height_cm: Option<u16>,
    pub memo: Option<String>,
    pub skills: PlayerSkills,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Applies an edited draft, keeping identity and creation time
    pub fn apply(&mut self, draft: PlayerDraft, now: DateTime<Utc>) {
        self.name = draft.name.trim().to_string();
        self.number = draft.number;
        self.role = draft.role;
        self.handedness = draft.handedness;
        self.height_cm = draft.height_cm;
        self.memo = normalize_memo(draft.memo);
        self.skills = draft.skills;
        self.updated_at = now;
    }
}

/// Create/update input for a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDraft {
    pub name: String,
    pub number: u8,
    pub role: PlayerRole,
    #[serde(default)]
    pub handedness: Handedness,
    #[serde(default)]
    pub height_cm: Option<u16>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub skills: PlayerSkills,
}

impl PlayerDraft {
    pub fn new(name: impl Into<String>, number: u8, role: PlayerRole) -> Self {
        Self {
            name: name.into(),
            number,
            role,
            handedness: Handedness::default(),
            height_cm: None,
            memo: None,
            skills: PlayerSkills::default(),
        }
    }

    pub fn with_skills(mut self, skills: PlayerSkills) -> Self {
        self.skills = skills;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            });
        }

        ValidationError::check_range("number", i64::from(self.number), 0, i64::from(JERSEY_MAX))?;

        if let Some(height) = self.height_cm
            && height == 0
        {
            return Err(ValidationError::OutOfRange {
                field: "height_cm".to_string(),
                value: 0,
                min: 1,
                max: i64::from(u16::MAX),
            });
        }

        self.skills.validate()
    }

    /// Builds a new record; callers validate first
    pub fn into_player(self, id: String, now: DateTime<Utc>) -> Player {
        Player {
            id,
            name: self.name.trim().to_string(),
            number: self.number,
            role: self.role,
            handedness: self.handedness,
            height_cm: self.height_cm,
            memo: normalize_memo(self.memo),
            skills: self.skills,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&Player> for PlayerDraft {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            number: player.number,
            role: player.role,
            handedness: player.handedness,
            height_cm: player.height_cm,
            memo: player.memo.clone(),
            skills: player.skills,
        }
    }
}

fn normalize_memo(memo: Option<String>) -> Option<String> {
    memo.map(|m| m.trim().to_string()).filter(|m| !m.is_empty())
}

/// Ordering for roster listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSort {
    /// Newest first
    #[default]
    Recent,
    /// Jersey number ascending
    Number,
    /// Spike rating descending
    Spike,
    /// Overall rating descending
    Overall,
}

impl FromStr for PlayerSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recent" => Ok(PlayerSort::Recent),
            "number" => Ok(PlayerSort::Number),
            "spike" | "skill" => Ok(PlayerSort::Spike),
            "overall" => Ok(PlayerSort::Overall),
            _ => anyhow::bail!(
                "Invalid sort: {}. Must be 'recent', 'number', 'spike' or 'overall'",
                s
            ),
        }
    }
}

/// Filter and ordering for roster listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerQuery {
    pub search: Option<String>,
    pub sort: PlayerSort,
}

impl PlayerQuery {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sorted_by(mut self, sort: PlayerSort) -> Self {
        self.sort = sort;
        self
    }

    /// Name substring (case-insensitive) or exact jersey number
    pub fn matches(&self, player: &Player) -> bool {
        let Some(term) = self.search_term() else {
            return true;
        };

        player.name.to_lowercase().contains(&term.to_lowercase())
            || self.jersey_number() == Some(player.number)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    pub fn jersey_number(&self) -> Option<u8> {
        self.search_term().and_then(|term| term.parse::<u8>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_player(name: &str, number: u8) -> Player {
        PlayerDraft::new(name, number, PlayerRole::OutsideHitter)
            .into_player(format!("id-{number}"), Utc::now())
    }

    #[test]
    fn test_default_skills_are_fifty() {
        assert_eq!(PlayerSkills::default(), PlayerSkills::uniform(50));
    }

    #[test]
    fn test_draft_rejects_blank_name() {
        let draft = PlayerDraft::new("   ", 4, PlayerRole::Setter);
        assert_eq!(
            draft.validate(),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );
    }

    #[test]
    fn test_draft_rejects_out_of_range_values() {
        let mut draft = PlayerDraft::new("Kenta", 100, PlayerRole::Setter);
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "number"
        ));

        draft.number = 12;
        draft.skills.receive = 101;
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::OutOfRange { ref field, value: 101, .. }) if field == "receive"
        ));

        draft.skills.receive = 60;
        draft.height_cm = Some(0);
        assert!(draft.validate().is_err());

        draft.height_cm = Some(181);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_into_player_trims_fields() {
        let mut draft = PlayerDraft::new("  Taro Tanaka ", 1, PlayerRole::OutsideHitter);
        draft.memo = Some("   ".to_string());
        let player = draft.into_player("p1".to_string(), Utc::now());

        assert_eq!(player.name, "Taro Tanaka");
        assert_eq!(player.memo, None);
        assert_eq!(player.created_at, player.updated_at);
    }

    #[test]
    fn test_role_and_handedness_parsing() {
        assert_eq!("mb".parse::<PlayerRole>().unwrap(), PlayerRole::MiddleBlocker);
        assert_eq!("L".parse::<PlayerRole>().unwrap(), PlayerRole::Libero);
        assert!("XX".parse::<PlayerRole>().is_err());
        assert_eq!("LEFT".parse::<Handedness>().unwrap(), Handedness::Left);
        assert!("both".parse::<Handedness>().is_err());
    }

    #[test]
    fn test_query_matches_name_or_number() {
        let player = sample_player("Jiro Sato", 2);

        assert!(PlayerQuery::default().matches(&player));
        assert!(PlayerQuery::default().search("sato").matches(&player));
        assert!(PlayerQuery::default().search("2").matches(&player));
        assert!(!PlayerQuery::default().search("3").matches(&player));
        assert!(!PlayerQuery::default().search("Suzuki").matches(&player));
    }

    #[test]
    fn test_sort_parsing_accepts_skill_alias() {
        assert_eq!("skill".parse::<PlayerSort>().unwrap(), PlayerSort::Spike);
        assert_eq!("NUMBER".parse::<PlayerSort>().unwrap(), PlayerSort::Number);
        assert!("height".parse::<PlayerSort>().is_err());
    }
}
