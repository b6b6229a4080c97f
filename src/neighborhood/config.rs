//! Neighbor sampling parameters.

/// Configuration for [`NeighborhoodGenerator`](super::NeighborhoodGenerator).
///
/// # Examples
///
/// ```
/// use u_pdp::neighborhood::NeighborhoodConfig;
///
/// let config = NeighborhoodConfig::default()
///     .with_relocate_probability(0.5)
///     .with_reorder_attempts(500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborhoodConfig {
    /// Probability that a random sample is a relocate move rather than a
    /// reorder move.
    pub relocate_probability: f64,

    /// Relocate tries per random sample before giving up.
    pub relocate_attempts: usize,

    /// Reorder tries per random sample before giving up.
    pub reorder_attempts: usize,
}

impl Default for NeighborhoodConfig {
    fn default() -> Self {
        Self {
            relocate_probability: 0.2,
            relocate_attempts: 1_000,
            reorder_attempts: 10_000,
        }
    }
}

impl NeighborhoodConfig {
    pub fn with_relocate_probability(mut self, p: f64) -> Self {
        self.relocate_probability = p;
        self
    }

    pub fn with_relocate_attempts(mut self, n: usize) -> Self {
        self.relocate_attempts = n;
        self
    }

    pub fn with_reorder_attempts(mut self, n: usize) -> Self {
        self.reorder_attempts = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.relocate_probability) {
            return Err(format!(
                "relocate_probability must be in [0, 1], got {}",
                self.relocate_probability
            ));
        }
        if self.relocate_attempts == 0 && self.reorder_attempts == 0 {
            return Err("at least one of relocate_attempts and reorder_attempts must be positive".into());
        }
        Ok(())
    }
}
