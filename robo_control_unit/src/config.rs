//! Configuration loader for the control unit.
//!
//! Loads `robot.toml` into a [`RobotConfig`], applies command-line
//! overrides and validates every section. The heading gain file is not part
//! of the bundle: it is re-read at every teleop entry, so a startup check
//! only warns when it is unusable.

use std::path::{Path, PathBuf};

use robo_common::config::{ConfigError, ConfigLoader, HeadingGains, LogLevel};
use robo_common::control_unit::config::RobotConfig;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Validated configuration, ready for runtime use.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub robot: RobotConfig,
    /// File the configuration came from; `None` when built from a string.
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    #[inline]
    pub fn gains_path(&self) -> &Path {
        Path::new(&self.robot.teleop.gains_path)
    }

    /// Default log filter: `[shared] log_level`, raised to DEBUG by `verbose`.
    #[inline]
    pub fn log_filter(&self, verbose: bool) -> LevelFilter {
        log_filter(self.robot.shared.log_level, verbose)
    }

    /// Point teleop at a different heading gain file and re-validate.
    pub fn with_gains_path(mut self, path: &Path) -> Result<Self, ConfigError> {
        self.robot.teleop.gains_path = path.display().to_string();
        self.robot.validate()?;
        Ok(self)
    }
}

/// Map a configured log level onto a subscriber filter. `verbose` never
/// lowers the level, so `trace` stays `trace`.
pub fn log_filter(level: LogLevel, verbose: bool) -> LevelFilter {
    let filter = level
        .as_directive()
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);
    if verbose {
        filter.max(LevelFilter::DEBUG)
    } else {
        filter
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate `robot.toml`.
///
/// # Errors
///
/// `FileNotFound`/`Io` if the file cannot be read, `ParseError` for TOML or
/// schema errors, `ValidationError` for out-of-range values.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let robot = RobotConfig::load(path)?;
    robot.validate()?;
    Ok(LoadedConfig {
        robot,
        source: Some(path.to_path_buf()),
    })
}

/// Parse and validate a configuration held in memory (tests, embedded
/// defaults).
pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, ConfigError> {
    let robot = RobotConfig::from_toml(content)?;
    robot.validate()?;
    Ok(LoadedConfig {
        robot,
        source: None,
    })
}

/// Check the heading gain file ahead of the first teleop entry.
///
/// Returns the gains when usable. A failure is logged, not returned: the
/// file is read again at teleop entry and may be fixed before then.
pub fn precheck_gains(config: &LoadedConfig) -> Option<HeadingGains> {
    match HeadingGains::load(config.gains_path()) {
        Ok(gains) => {
            info!(
                kp = gains.kp,
                ki = gains.ki,
                spin_threshold = gains.spin_threshold,
                "Heading gains OK"
            );
            Some(gains)
        }
        Err(e) => {
            warn!(
                path = %config.gains_path().display(),
                "Heading gains unusable ({e}); heading hold will be unavailable unless fixed"
            );
            None
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
