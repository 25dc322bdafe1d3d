//! Error types.

/// The error returned when a slot index lies outside a
/// [`CoreLocalArray`](crate::CoreLocalArray).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    /// The rejected index.
    pub index: usize,
    /// The number of slots in the array.
    pub len: usize,
}

impl core::fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "core index {} out of range for array of {} slots",
            self.index, self.len
        )
    }
}

impl std::error::Error for OutOfRange {}
