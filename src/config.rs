//! Sizing configuration for [`CoreLocalArray`](crate::CoreLocalArray).

use serde::{Deserialize, Serialize};

use crate::cpu::available_parallelism;

/// Smallest slot count an array will ever have.
pub const MIN_SLOTS: usize = 8;

/// Largest slot count an array will ever have.
///
/// Requests above it (from `parallelism` or `min_slots`) are clamped here.
pub const MAX_SLOTS: usize = 1 << 16;

/// How many slots to allocate.
///
/// The slot count is the smallest power of two that is at least
/// [`MIN_SLOTS`], at least `min_slots`, and at least the parallelism,
/// capped at [`MAX_SLOTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreLocalConfig {
    /// Logical processor count to size for. `None` detects it at
    /// construction time.
    pub parallelism: Option<usize>,
    /// Lower bound on the slot count. Values below [`MIN_SLOTS`] are raised,
    /// values above [`MAX_SLOTS`] are lowered.
    pub min_slots: usize,
}

impl Default for CoreLocalConfig {
    fn default() -> Self {
        Self {
            parallelism: None,
            min_slots: MIN_SLOTS,
        }
    }
}

impl CoreLocalConfig {
    /// Sizes for a fixed processor count instead of detecting it.
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Raises the lower bound on the slot count.
    #[must_use]
    pub fn with_min_slots(mut self, min_slots: usize) -> Self {
        self.min_slots = min_slots;
        self
    }

    /// The processor count this config sizes for.
    pub fn parallelism(&self) -> usize {
        self.parallelism.unwrap_or_else(available_parallelism)
    }

    /// `log2` of the slot count.
    pub fn slot_shift(&self) -> u32 {
        self.slot_shift_for(self.parallelism())
    }

    /// `log2` of the slot count for an already resolved processor count.
    pub(crate) fn slot_shift_for(&self, parallelism: usize) -> u32 {
        parallelism
            .max(self.min_slots)
            .clamp(MIN_SLOTS, MAX_SLOTS)
            .next_power_of_two()
            .trailing_zeros()
    }

    /// The slot count: a power of two in `[MIN_SLOTS, MAX_SLOTS]`.
    pub fn slot_count(&self) -> usize {
        1 << self.slot_shift()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots_for(cores: usize) -> usize {
        CoreLocalConfig::default().with_parallelism(cores).slot_count()
    }

    #[test]
    fn rounds_up_to_power_of_two() {
        assert_eq!(slots_for(0), 8);
        assert_eq!(slots_for(1), 8);
        assert_eq!(slots_for(4), 8);
        assert_eq!(slots_for(8), 8);
        assert_eq!(slots_for(9), 16);
        assert_eq!(slots_for(16), 16);
        assert_eq!(slots_for(20), 32);
        assert_eq!(slots_for(129), 256);
    }

    #[test]
    fn min_slots_never_goes_below_eight() {
        let config = CoreLocalConfig::default().with_parallelism(2).with_min_slots(1);
        assert_eq!(config.slot_count(), 8);
        assert_eq!(config.slot_shift(), 3);

        let config = CoreLocalConfig::default().with_parallelism(2).with_min_slots(33);
        assert_eq!(config.slot_count(), 64);
    }

    #[test]
    fn huge_requests_are_clamped() {
        let config = CoreLocalConfig::default().with_min_slots(usize::MAX);
        assert_eq!(config.slot_count(), MAX_SLOTS);

        let config = CoreLocalConfig::default().with_parallelism(usize::MAX);
        assert_eq!(config.slot_count(), MAX_SLOTS);

        let config = CoreLocalConfig::default().with_parallelism(MAX_SLOTS + 1);
        assert_eq!(config.slot_count(), MAX_SLOTS);
        assert_eq!(config.slot_shift(), 16);
    }

    #[test]
    fn resolved_parallelism_drives_shift() {
        let config = CoreLocalConfig::default().with_parallelism(4);
        assert_eq!(config.slot_shift_for(20), 5);
        assert_eq!(config.slot_shift_for(1), 3);
    }

    #[test]
    fn detected_parallelism_is_used_by_default() {
        let config = CoreLocalConfig::default();
        assert!(config.slot_count() >= available_parallelism());
        assert!(config.slot_count() >= MIN_SLOTS);
    }
}
