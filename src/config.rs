use crate::error::{ScResult, ScorecardError};
use crate::geometry::{RowStrategy, Units, Viewport};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MAX_PLAYERS: usize = 12;

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Player rows on the card.
    #[arg(long, default_value_t = 6)]
    pub players: usize,

    #[arg(long, value_enum, default_value_t = RowStrategy::Uniform)]
    pub row_strategy: RowStrategy,

    /// Units the calibration taps are given in.
    #[arg(long, value_enum, default_value_t = Units::Pixels)]
    pub units: Units,

    // Background image natural size (canvas fallback is 1200x800).
    #[arg(long, default_value_t = 1200.0)]
    pub image_width: f64,
    #[arg(long, default_value_t = 800.0)]
    pub image_height: f64,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            players: 6,
            row_strategy: RowStrategy::Uniform,
            units: Units::Pixels,
            image_width: 1200.0,
            image_height: 800.0,
        }
    }
}

impl CardConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ScResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ScorecardError::Config(format!(
                "Failed to read config file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        let config: CardConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScResult<()> {
        if !(1..=MAX_PLAYERS).contains(&self.players) {
            return Err(ScorecardError::Config(format!(
                "players must be between 1 and {}, got {}",
                MAX_PLAYERS, self.players
            )));
        }
        if !(self.image_width > 0.0 && self.image_height > 0.0) {
            return Err(ScorecardError::Config(format!(
                "image size must be positive, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }

    /// Copies fields the user typed on the command line over `self` (usually
    /// a config loaded from file). Defaults do not override the file.
    pub fn merge_from_cli(&mut self, cli: &CardConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(players);
        update_if_present!(row_strategy);
        update_if_present!(units);
        update_if_present!(image_width);
        update_if_present!(image_height);
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.image_width, self.image_height)
    }
}
