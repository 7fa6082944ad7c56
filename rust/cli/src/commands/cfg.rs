//! Configuration command handler.
//!
//! Prints the resolved configuration as JSON, each value tagged with where it came
//! from (`default`, `file` via `DUEL21_CONFIG`, or `env`).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "stake": {
//!     "value": 100,
//!     "source": "default"
//!   },
//!   "mode": {
//!     "value": "wild",
//!     "source": "env"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(config::ConfigError::Invalid(msg)) => {
            ui::write_error(err, &msg)?;
            return Err(CliError::Config(msg));
        }
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let rake = config.rake_schedule();
    let display = serde_json::json!({
        "stake": { "value": config.stake, "source": sources.stake },
        "turn_stake": { "value": config.turn_stake, "source": sources.turn_stake },
        "min_bet": { "value": config.min_bet, "source": sources.min_bet },
        "mode": { "value": config.mode, "source": sources.mode },
        "extended": { "value": config.extended, "source": sources.extended },
        "seed": { "value": config.seed, "source": sources.seed },
        "ai": { "value": config.ai, "source": sources.ai },
        "decision_secs": { "value": config.decision_secs, "source": sources.decision_secs },
        "result_pause_secs": {
            "value": config.result_pause_secs,
            "source": sources.result_pause_secs,
        },
        "rake_tiers": { "value": rake.tiers(), "source": sources.rake_tiers },
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
