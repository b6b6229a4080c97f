//! Insertion enumeration bounds.

/// Whether the last slot of a sweep is included.
///
/// For a chain of `n` actions, pickup anchors run over `0..=n`
/// (`Inclusive`) or `0..n` (`Exclusive`); delivery anchors, counted in the
/// chain after the pickup is placed, run up to `n + 1` or `n`. An
/// exclusive delivery bound never appends the delivery at the tail; an
/// exclusive pickup bound cannot insert into an empty chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotBound {
    #[default]
    Inclusive,
    Exclusive,
}

impl SlotBound {
    /// Exclusive end of a sweep whose last candidate anchor is `last`.
    pub(crate) fn end(self, last: usize) -> usize {
        match self {
            SlotBound::Inclusive => last + 1,
            SlotBound::Exclusive => last,
        }
    }
}

/// Configuration for [`InsertionEvaluator`](super::InsertionEvaluator).
///
/// # Examples
///
/// ```
/// use u_pdp::insertion::{InsertionConfig, SlotBound};
///
/// let config = InsertionConfig::default().with_delivery_bound(SlotBound::Exclusive);
/// assert_eq!(config.pickup_bound, SlotBound::Inclusive);
/// assert_eq!(config.delivery_bound, SlotBound::Exclusive);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertionConfig {
    /// Upper bound of the pickup anchor sweep.
    pub pickup_bound: SlotBound,

    /// Upper bound of the delivery anchor sweep.
    pub delivery_bound: SlotBound,
}

impl InsertionConfig {
    pub fn with_pickup_bound(mut self, bound: SlotBound) -> Self {
        self.pickup_bound = bound;
        self
    }

    pub fn with_delivery_bound(mut self, bound: SlotBound) -> Self {
        self.delivery_bound = bound;
        self
    }
}
