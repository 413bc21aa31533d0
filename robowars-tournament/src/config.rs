//! Configuration types for tournament play
//!
//! Level 4 - Utilities and configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use robowars_core::{ConfigError, FieldConfiguration, Preset};

/// Turn cap multiplier applied to the field area when no explicit cap is set
const DEFAULT_TURNS_PER_CELL: u32 = 4;

/// What to do when a robot hands in an illegal fleet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Ask again, disqualifying once `max_attempts` placements have failed
    Retry { max_attempts: u32 },
    /// Disqualify on the first illegal fleet
    Disqualify,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        PlacementPolicy::Retry { max_attempts: 3 }
    }
}

impl PlacementPolicy {
    /// Total placement attempts allowed per round, at least one
    pub fn max_attempts(&self) -> u32 {
        match self {
            PlacementPolicy::Retry { max_attempts } => (*max_attempts).max(1),
            PlacementPolicy::Disqualify => 1,
        }
    }
}

/// Tournament configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TournamentConfig {
    /// Illegal fleet handling
    pub placement_policy: PlacementPolicy,
    /// Turns before a round is called off (None = 4 x field area)
    pub max_turns_per_round: Option<u32>,
    /// Delay between turns for paced play (0 = unpaced)
    pub tick_interval_ms: u64,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            placement_policy: PlacementPolicy::default(),
            max_turns_per_round: None,
            tick_interval_ms: 0,
        }
    }
}

impl TournamentConfig {
    /// Set placement failure policy
    pub fn with_placement_policy(mut self, policy: PlacementPolicy) -> Self {
        self.placement_policy = policy;
        self
    }

    /// Set an explicit per-round turn cap
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns_per_round = Some(turns);
        self
    }

    /// Set pacing for the interactive runner
    pub fn with_tick_interval(mut self, millis: u64) -> Self {
        self.tick_interval_ms = millis;
        self
    }

    /// Turn cap for a round played on `config`
    pub fn turn_limit(&self, config: &FieldConfiguration) -> u32 {
        self.max_turns_per_round.unwrap_or_else(|| {
            let area = u32::try_from(config.field.area()).unwrap_or(u32::MAX / DEFAULT_TURNS_PER_CELL);
            area.saturating_mul(DEFAULT_TURNS_PER_CELL).max(1)
        })
    }
}

/// One round in a plan: a preset name or an inline configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoundSpec {
    Preset(Preset),
    Inline(FieldConfiguration),
}

impl RoundSpec {
    pub fn configuration(&self) -> FieldConfiguration {
        match self {
            RoundSpec::Preset(preset) => preset.configuration(),
            RoundSpec::Inline(config) => config.clone(),
        }
    }
}

/// Tournament description loaded from JSON
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentPlan {
    pub rounds: Vec<RoundSpec>,
    #[serde(default)]
    pub placement_policy: PlacementPolicy,
    #[serde(default)]
    pub max_turns_per_round: Option<u32>,
    #[serde(default)]
    pub tick_interval_ms: u64,
}

impl TournamentPlan {
    /// One round per preset, default settings
    pub fn from_presets(presets: &[Preset]) -> Self {
        Self {
            rounds: presets.iter().copied().map(RoundSpec::Preset).collect(),
            placement_policy: PlacementPolicy::default(),
            max_turns_per_round: None,
            tick_interval_ms: 0,
        }
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tournament plan: {}", path.display()))?;
        let plan: TournamentPlan = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse tournament plan: {}", path.display()))?;
        plan.validate()
            .with_context(|| format!("Invalid tournament plan: {}", path.display()))?;
        Ok(plan)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Every round must describe a playable field
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rounds.iter().try_for_each(|round| round.configuration().validate())
    }

    pub fn configurations(&self) -> Vec<FieldConfiguration> {
        self.rounds.iter().map(RoundSpec::configuration).collect()
    }

    pub fn tournament_config(&self) -> TournamentConfig {
        let config = TournamentConfig::default()
            .with_placement_policy(self.placement_policy)
            .with_tick_interval(self.tick_interval_ms);
        match self.max_turns_per_round {
            Some(turns) => config.with_max_turns(turns),
            None => config,
        }
    }
}
