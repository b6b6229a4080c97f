//! Annealing configuration and the time-driven schedules.

use std::time::Duration;

/// Configuration for the [`Annealer`](super::Annealer).
///
/// Temperature and explore probability are functions of elapsed time, not
/// of the iteration count: both reach their final value when
/// `secure_factor * deadline` has elapsed.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pdp::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_deadline(Duration::from_millis(500))
///     .with_restart_factor(8.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert!((config.budget().as_secs_f64() - 0.45).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Temperature at the start of the run.
    pub start_temperature: f64,

    /// Temperature when the time budget is spent.
    pub final_temperature: f64,

    /// Fraction of the deadline the search may use, in (0, 1). The rest is
    /// left for translating the result.
    pub secure_factor: f64,

    /// The search restarts from the best solution each time the
    /// temperature drops by this factor since the last restart.
    pub restart_factor: f64,

    /// Wall-clock deadline of the planning call.
    pub deadline: Duration,

    /// Hard iteration cap in addition to the deadline. 0 = no limit.
    pub max_iterations: usize,

    /// Best cost is recorded every this many iterations.
    pub history_interval: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            start_temperature: 100_000.0,
            final_temperature: 100.0,
            secure_factor: 0.9,
            restart_factor: 4.0,
            deadline: Duration::from_secs(5),
            max_iterations: 0,
            history_interval: 100,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_start_temperature(mut self, t: f64) -> Self {
        self.start_temperature = t;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_secure_factor(mut self, f: f64) -> Self {
        self.secure_factor = f;
        self
    }

    pub fn with_restart_factor(mut self, f: f64) -> Self {
        self.restart_factor = f;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_history_interval(mut self, n: usize) -> Self {
        self.history_interval = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Time the search loop may run: `secure_factor * deadline`.
    pub fn budget(&self) -> Duration {
        self.deadline.mul_f64(self.secure_factor)
    }

    /// Share of the budget consumed after `elapsed`, clamped to `[0, 1]`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let budget = self.budget().as_secs_f64();
        if budget <= 0.0 {
            return 1.0;
        }
        (elapsed.as_secs_f64() / budget).clamp(0.0, 1.0)
    }

    /// Geometric cooling: `T0 * (Tend / T0)^progress`.
    pub fn temperature(&self, progress: f64) -> f64 {
        let ratio = self.final_temperature / self.start_temperature;
        self.start_temperature * ratio.powf(progress)
    }

    /// Probability of drawing one random neighbor instead of scanning a
    /// full neighborhood. Follows a linear temperature from `T0` to `Tend`,
    /// rescaled to `[0, 1]`.
    pub fn explore_probability(&self, progress: f64) -> f64 {
        let span = self.start_temperature - self.final_temperature;
        let linear = self.start_temperature - span * progress;
        ((linear - self.final_temperature) / span).clamp(0.0, 1.0)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.final_temperature <= 0.0 {
            return Err("final_temperature must be positive".into());
        }
        if self.final_temperature >= self.start_temperature {
            return Err("final_temperature must be less than start_temperature".into());
        }
        if self.secure_factor <= 0.0 || self.secure_factor >= 1.0 {
            return Err(format!("secure_factor must be in (0, 1), got {}", self.secure_factor));
        }
        if self.restart_factor <= 1.0 {
            return Err(format!("restart_factor must be greater than 1, got {}", self.restart_factor));
        }
        if self.deadline.is_zero() {
            return Err("deadline must be positive".into());
        }
        if self.history_interval == 0 {
            return Err("history_interval must be positive".into());
        }
        Ok(())
    }
}
