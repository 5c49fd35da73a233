//! Simulation configuration, validation, and error types.
//!
//! [`WorldConfig`] is the startup input for a [`Simulation`](crate::Simulation).
//! [`validate()`](WorldConfig::validate) checks every structural invariant
//! before any world is built or any agent is spawned, so a bad configuration
//! fails fast.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use burrow_space::{Grid, SpaceError};
use rand::Rng;

use crate::world::SpawnError;

// ── DelayConfig ────────────────────────────────────────────────────

/// Bounds of the pause an agent takes after every move attempt.
///
/// Each delay is drawn uniformly from `[min, max]` using the agent's own
/// RNG, so seeded runs reproduce their delay sequence too.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelayConfig {
    /// Shortest pause. Must be strictly positive. Default: 3 ms.
    pub min: Duration,
    /// Longest pause. Must be `>= min`. Default: 297 ms.
    pub max: Duration,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(3),
            max: Duration::from_millis(297),
        }
    }
}

impl DelayConfig {
    /// A fixed delay of exactly `d`.
    pub fn fixed(d: Duration) -> Self {
        Self { min: d, max: d }
    }

    /// Check the delay bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min.is_zero() {
            return Err(ConfigError::InvalidDelay {
                reason: "min delay must be strictly positive".into(),
            });
        }
        if self.min > self.max {
            return Err(ConfigError::InvalidDelay {
                reason: format!("min delay {:?} exceeds max delay {:?}", self.min, self.max),
            });
        }
        if u64::try_from(self.max.as_nanos()).is_err() {
            return Err(ConfigError::InvalidDelay {
                reason: format!("max delay {:?} does not fit in u64 nanoseconds", self.max),
            });
        }
        Ok(())
    }

    /// Draw one delay from `[min, max]`.
    ///
    /// Never returns zero: a bound below one nanosecond is raised to one, so
    /// an unvalidated config still yields a strictly positive pause.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = u64::try_from(self.min.as_nanos())
            .unwrap_or(u64::MAX)
            .max(1);
        let hi = u64::try_from(self.max.as_nanos()).unwrap_or(u64::MAX);
        if lo >= hi {
            return Duration::from_nanos(lo);
        }
        Duration::from_nanos(rng.random_range(lo..=hi))
    }
}

// ── Placement ──────────────────────────────────────────────────────

/// Where freshly spawned agents start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// Every agent starts on `(0, 0)`. Agents stacked on the origin are
    /// tolerated; they separate as they move out.
    #[default]
    Origin,
    /// Agent `i` starts on the cell with canonical rank `i`. Requires at
    /// most one agent per cell.
    Distinct,
}

// ── Protocol ───────────────────────────────────────────────────────

/// How a move attempt synchronises with other movers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    /// Lock the origin and destination cells in ascending canonical rank,
    /// re-check the destination, then commit or abort.
    #[default]
    OrderedPair,
    /// Serialise every move behind a single world-wide lock. Correct, but
    /// only one agent can be inside a move at a time.
    Global,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating or applying a [`WorldConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid dimensions are invalid.
    Space(SpaceError),
    /// Agents could not be placed.
    Spawn(SpawnError),
    /// Delay bounds are invalid.
    InvalidDelay {
        /// Description of which bound was violated.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "grid: {e}"),
            Self::Spawn(e) => write!(f, "spawn: {e}"),
            Self::InvalidDelay { reason } => write!(f, "invalid delay config: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Spawn(e) => Some(e),
            Self::InvalidDelay { .. } => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<SpawnError> for ConfigError {
    fn from(e: SpawnError) -> Self {
        Self::Spawn(e)
    }
}

// ── WorldConfig ────────────────────────────────────────────────────

/// Complete configuration for a simulation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Grid width (columns). Must be positive.
    pub width: u32,
    /// Grid height (rows). Must be positive.
    pub height: u32,
    /// Number of agents spawned before the run starts.
    pub agents: usize,
    /// Starting positions.
    pub placement: Placement,
    /// Move synchronisation protocol.
    pub protocol: Protocol,
    /// Pause between move attempts.
    pub delay: DelayConfig,
    /// Base RNG seed. Agent `i` uses ChaCha stream `i` of this seed.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 8,
            agents: 8,
            placement: Placement::Origin,
            protocol: Protocol::OrderedPair,
            delay: DelayConfig::default(),
            seed: 0,
        }
    }
}

impl WorldConfig {
    /// Validate all structural invariants without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Grid must be non-empty and addressable.
        let grid = Grid::new(self.width, self.height)?;
        // 2. Delay must be positive and bounded.
        self.delay.validate()?;
        // 3. Agent ids must fit, and distinct placement needs one cell each.
        if u32::try_from(self.agents).is_err() {
            return Err(SpawnError::TooManyAgents {
                requested: self.agents,
                capacity: u32::MAX as usize,
            }
            .into());
        }
        if self.placement == Placement::Distinct && self.agents > grid.cell_count() {
            return Err(SpawnError::TooManyAgents {
                requested: self.agents,
                capacity: grid.cell_count(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(WorldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_width_fails_fast() {
        let cfg = WorldConfig {
            width: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Space(SpaceError::EmptySpace { .. }))
        ));
    }

    #[test]
    fn zero_height_fails_fast() {
        let cfg = WorldConfig {
            height: 0,
            ..WorldConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_agents_is_valid() {
        let cfg = WorldConfig {
            agents: 0,
            ..WorldConfig::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn origin_placement_allows_more_agents_than_cells() {
        let cfg = WorldConfig {
            width: 1,
            height: 1,
            agents: 5,
            ..WorldConfig::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn distinct_placement_rejects_overcrowding() {
        let cfg = WorldConfig {
            width: 2,
            height: 2,
            agents: 5,
            placement: Placement::Distinct,
            ..WorldConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::Spawn(SpawnError::TooManyAgents {
                requested: 5,
                capacity: 4
            }))
        );
    }

    #[test]
    fn zero_min_delay_rejected() {
        let delay = DelayConfig {
            min: Duration::ZERO,
            max: Duration::from_millis(1),
        };
        assert!(matches!(
            delay.validate(),
            Err(ConfigError::InvalidDelay { .. })
        ));
    }

    #[test]
    fn inverted_delay_bounds_rejected() {
        let delay = DelayConfig {
            min: Duration::from_millis(5),
            max: Duration::from_millis(1),
        };
        let err = delay.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds max delay"));
    }

    #[test]
    fn samples_stay_in_bounds_and_positive() {
        let delay = DelayConfig {
            min: Duration::from_micros(10),
            max: Duration::from_micros(50),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1_000 {
            let d = delay.sample(&mut rng);
            assert!(d >= delay.min && d <= delay.max, "{d:?} out of range");
            assert!(!d.is_zero());
        }
    }

    #[test]
    fn fixed_delay_always_same() {
        let delay = DelayConfig::fixed(Duration::from_micros(3));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(delay.sample(&mut rng), Duration::from_micros(3));
        assert_eq!(delay.sample(&mut rng), Duration::from_micros(3));
    }

    #[test]
    fn zero_bounds_still_sample_positive() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let zero = DelayConfig::fixed(Duration::ZERO);
        assert!(zero.validate().is_err());
        assert_eq!(zero.sample(&mut rng), Duration::from_nanos(1));

        let from_zero = DelayConfig {
            min: Duration::ZERO,
            max: Duration::from_nanos(5),
        };
        for _ in 0..200 {
            let d = from_zero.sample(&mut rng);
            assert!(d >= Duration::from_nanos(1) && d <= from_zero.max, "{d:?}");
        }
    }

    #[test]
    fn error_source_chains_to_space_error() {
        let err = ConfigError::from(SpaceError::EmptySpace {
            width: 0,
            height: 1,
        });
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("grid: "));
    }
}
