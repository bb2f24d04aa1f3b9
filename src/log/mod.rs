//! Logging setup
//!
//! The subscriber is installed by whoever owns the application lifecycle,
//! never implicitly by this crate.

use anyhow::Result;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

/// Logging modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogMode {
    /// Only errors.
    #[default]
    Error,
    /// All levels.
    Debug,
    /// No logging.
    Off,
}

impl LogMode {
    fn level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Debug => LevelFilter::TRACE,
            Self::Off => LevelFilter::OFF,
        }
    }
}

impl FromStr for LogMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "error" => Ok(Self::Error),
            "debug" => Ok(Self::Debug),
            "off" => Ok(Self::Off),
            other => Err(anyhow::anyhow!("unknown log mode: {}", other)),
        }
    }
}

/// Install the process subscriber for `mode`.
///
/// Fails when a subscriber is already installed.
pub fn init(mode: LogMode) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(mode.level_filter())
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("error".parse::<LogMode>().unwrap(), LogMode::Error);
        assert_eq!("debug".parse::<LogMode>().unwrap(), LogMode::Debug);
        assert_eq!("off".parse::<LogMode>().unwrap(), LogMode::Off);
        assert!("verbose".parse::<LogMode>().is_err());
    }

    #[test]
    fn test_default_mode() {
        assert_eq!(LogMode::default(), LogMode::Error);
    }
}
