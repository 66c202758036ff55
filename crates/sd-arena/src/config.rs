use std::time::Duration;

use rand::Rng;

use crate::error::{ArenaError, ArenaResult};

/// Randomized pause a competitor takes after each scoring turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingWindow {
    /// Shortest pause, in milliseconds.
    pub min_ms: u64,
    /// Longest pause, in milliseconds (inclusive).
    pub max_ms: u64,
}

impl Default for PacingWindow {
    fn default() -> Self {
        Self {
            min_ms: 250,
            max_ms: 500,
        }
    }
}

impl PacingWindow {
    /// Create a pacing window of `min_ms..=max_ms`.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// No pause at all. Used for headless runs and tests.
    pub fn instant() -> Self {
        Self::new(0, 0)
    }

    /// Draw a pause from the window.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }
}

/// Configuration for a single duel.
#[derive(Debug, Clone, PartialEq)]
pub struct DuelConfig {
    /// Score that ends the duel when reached or exceeded.
    pub score_threshold: u32,
    /// Probability (0.0-1.0) that a scoring turn stuns the opponent.
    pub stun_chance: f64,
    /// Pause after each scoring turn.
    pub pacing: PacingWindow,
    /// Wall-clock bound for the whole duel. `None` = unbounded.
    pub time_limit: Option<Duration>,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            score_threshold: 250,
            stun_chance: 0.1,
            pacing: PacingWindow::default(),
            time_limit: None,
        }
    }
}

impl DuelConfig {
    /// Set the score threshold.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Set the stun probability.
    pub fn with_stun_chance(mut self, chance: f64) -> Self {
        self.stun_chance = chance;
        self
    }

    /// Set the pacing window.
    pub fn with_pacing(mut self, pacing: PacingWindow) -> Self {
        self.pacing = pacing;
        self
    }

    /// Bound the duel's wall-clock duration.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Check every field is in range.
    pub fn validate(&self) -> ArenaResult<()> {
        if self.score_threshold == 0 {
            return Err(ArenaError::InvalidConfig(
                "score threshold must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.stun_chance) {
            return Err(ArenaError::InvalidConfig(format!(
                "stun chance {} is outside 0.0-1.0",
                self.stun_chance
            )));
        }
        if self.pacing.min_ms > self.pacing.max_ms {
            return Err(ArenaError::InvalidConfig(format!(
                "pacing minimum {}ms exceeds maximum {}ms",
                self.pacing.min_ms, self.pacing.max_ms
            )));
        }
        if self.time_limit.is_some_and(|limit| limit.is_zero()) {
            return Err(ArenaError::InvalidConfig(
                "time limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// What to do when every queued challenger has already faced the champion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RematchPolicy {
    /// Pair the champion with the front of the queue anyway.
    #[default]
    AllowFallback,
    /// Never repeat a pairing; the tournament ends instead.
    Strict,
}

/// Configuration for a tournament run.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentConfig {
    /// RNG seed for reproducible duels.
    pub seed: u64,
    /// Settings applied to every duel.
    pub duel: DuelConfig,
    /// Rematch handling once fresh challengers run out.
    pub rematch_policy: RematchPolicy,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            duel: DuelConfig::default(),
            rematch_policy: RematchPolicy::default(),
        }
    }
}

impl TournamentConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the per-duel configuration.
    pub fn with_duel(mut self, duel: DuelConfig) -> Self {
        self.duel = duel;
        self
    }

    /// Set the rematch policy.
    pub fn with_rematch_policy(mut self, policy: RematchPolicy) -> Self {
        self.rematch_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn duel_config_defaults() {
        let config = DuelConfig::default();
        assert_eq!(config.score_threshold, 250);
        assert!((config.stun_chance - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.pacing, PacingWindow::new(250, 500));
        assert!(config.time_limit.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn duel_config_builder_chain() {
        let config = DuelConfig::default()
            .with_threshold(10)
            .with_stun_chance(1.0)
            .with_pacing(PacingWindow::instant())
            .with_time_limit(Duration::from_secs(5));
        assert_eq!(config.score_threshold, 10);
        assert_eq!(config.pacing, PacingWindow::new(0, 0));
        assert_eq!(config.time_limit, Some(Duration::from_secs(5)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_duel_configs() {
        assert!(DuelConfig::default().with_threshold(0).validate().is_err());
        assert!(DuelConfig::default().with_stun_chance(1.5).validate().is_err());
        assert!(DuelConfig::default().with_stun_chance(-0.1).validate().is_err());
        assert!(
            DuelConfig::default()
                .with_pacing(PacingWindow::new(10, 5))
                .validate()
                .is_err()
        );
        assert!(
            DuelConfig::default()
                .with_time_limit(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn pacing_sample_within_window() {
        let window = PacingWindow::new(250, 500);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let pause = window.sample(&mut rng);
            assert!(pause >= Duration::from_millis(250));
            assert!(pause <= Duration::from_millis(500));
        }
    }

    #[test]
    fn instant_pacing_is_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(PacingWindow::instant().sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn tournament_config_builder() {
        let config = TournamentConfig::default()
            .with_seed(9)
            .with_duel(DuelConfig::default().with_threshold(30))
            .with_rematch_policy(RematchPolicy::Strict);
        assert_eq!(config.seed, 9);
        assert_eq!(config.duel.score_threshold, 30);
        assert_eq!(config.rematch_policy, RematchPolicy::Strict);
        assert_eq!(TournamentConfig::default().rematch_policy, RematchPolicy::AllowFallback);
    }
}
