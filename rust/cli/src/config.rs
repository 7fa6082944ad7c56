use duel21_engine::clock::ClockPolicy;
use duel21_engine::engine::{EngineConfig, MAX_TURN_STAKE};
use duel21_engine::game::GameMode;
use duel21_engine::settlement::{RakeSchedule, RakeTier};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub stake: u32,
    pub turn_stake: u32,
    pub min_bet: u32,
    pub mode: GameMode,
    pub extended: bool,
    pub seed: Option<u64>,
    pub ai: String,
    pub decision_secs: u32,
    pub result_pause_secs: u32,
    /// Replaces the default rake schedule when present
    pub rake_tiers: Option<Vec<RakeTier>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub stake: ValueSource,
    pub turn_stake: ValueSource,
    pub min_bet: ValueSource,
    pub mode: ValueSource,
    pub extended: ValueSource,
    pub seed: ValueSource,
    pub ai: ValueSource,
    pub decision_secs: ValueSource,
    pub result_pause_secs: ValueSource,
    pub rake_tiers: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            stake: ValueSource::Default,
            turn_stake: ValueSource::Default,
            min_bet: ValueSource::Default,
            mode: ValueSource::Default,
            extended: ValueSource::Default,
            seed: ValueSource::Default,
            ai: ValueSource::Default,
            decision_secs: ValueSource::Default,
            result_pause_secs: ValueSource::Default,
            rake_tiers: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            stake: 100,
            turn_stake: engine.turn_stake,
            min_bet: engine.min_bet,
            mode: GameMode::Classic,
            extended: false,
            seed: None,
            ai: "baseline".into(),
            decision_secs: engine.clock.decision_secs,
            result_pause_secs: engine.clock.result_pause_secs,
            rake_tiers: None,
        }
    }
}

impl Config {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            turn_stake: self.turn_stake,
            min_bet: self.min_bet,
            clock: ClockPolicy {
                decision_secs: self.decision_secs,
                result_pause_secs: self.result_pause_secs,
            },
        }
    }

    pub fn rake_schedule(&self) -> RakeSchedule {
        match &self.rake_tiers {
            Some(tiers) => RakeSchedule::new(tiers.clone()),
            None => RakeSchedule::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "{}", e),
            ConfigError::Parse(e) => write!(f, "{}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("DUEL21_CONFIG") {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.stake {
            cfg.stake = v;
            sources.stake = ValueSource::File;
        }
        if let Some(v) = f.turn_stake {
            cfg.turn_stake = v;
            sources.turn_stake = ValueSource::File;
        }
        if let Some(v) = f.min_bet {
            cfg.min_bet = v;
            sources.min_bet = ValueSource::File;
        }
        if let Some(v) = f.mode {
            cfg.mode = v.parse().map_err(ConfigError::Invalid)?;
            sources.mode = ValueSource::File;
        }
        if let Some(v) = f.extended {
            cfg.extended = v;
            sources.extended = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.ai {
            cfg.ai = v;
            sources.ai = ValueSource::File;
        }
        if let Some(v) = f.decision_secs {
            cfg.decision_secs = v;
            sources.decision_secs = ValueSource::File;
        }
        if let Some(v) = f.result_pause_secs {
            cfg.result_pause_secs = v;
            sources.result_pause_secs = ValueSource::File;
        }
        if let Some(v) = f.rake_tiers {
            cfg.rake_tiers = Some(v);
            sources.rake_tiers = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("DUEL21_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(mode) = std::env::var("DUEL21_MODE")
        && !mode.is_empty()
    {
        cfg.mode = mode.parse().map_err(ConfigError::Invalid)?;
        sources.mode = ValueSource::Env;
    }
    if let Ok(stake) = std::env::var("DUEL21_STAKE")
        && !stake.is_empty()
    {
        cfg.stake = stake
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid stake".into()))?;
        sources.stake = ValueSource::Env;
    }
    if let Ok(ext) = std::env::var("DUEL21_EXTENDED")
        && !ext.is_empty()
    {
        cfg.extended =
            parse_bool(&ext).ok_or_else(|| ConfigError::Invalid("Invalid extended".into()))?;
        sources.extended = ValueSource::Env;
    }
    if let Ok(ai) = std::env::var("DUEL21_AI")
        && !ai.is_empty()
    {
        cfg.ai = ai;
        sources.ai = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    stake: Option<u32>,
    #[serde(default)]
    turn_stake: Option<u32>,
    #[serde(default)]
    min_bet: Option<u32>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    extended: Option<bool>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    ai: Option<String>,
    #[serde(default)]
    decision_secs: Option<u32>,
    #[serde(default)]
    result_pause_secs: Option<u32>,
    #[serde(default)]
    rake_tiers: Option<Vec<RakeTier>>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.stake == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: stake must be >0".into(),
        ));
    }
    if cfg.turn_stake == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: turn_stake must be >0".into(),
        ));
    }
    if cfg.turn_stake > MAX_TURN_STAKE {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: turn_stake must be <={}",
            MAX_TURN_STAKE
        )));
    }
    if cfg.min_bet > cfg.turn_stake {
        return Err(ConfigError::Invalid(
            "Invalid configuration: min_bet must not exceed turn_stake".into(),
        ));
    }
    if duel21_ai::create_ai(&cfg.ai).is_none() {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: unknown ai '{}' (expected one of {})",
            cfg.ai,
            duel21_ai::AI_TYPES.join(", ")
        )));
    }
    if cfg.rake_tiers.as_ref().is_some_and(|t| t.iter().any(|t| t.bps > 10_000)) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: rake bps must be <=10000".into(),
        ));
    }
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
