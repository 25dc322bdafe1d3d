//! Leaf services consumed by [`CoreLocalArray`](crate::CoreLocalArray):
//! "which core am I on" and "give me a uniform index".
//!
//! Both are traits so embedders (and tests) can substitute their own source.
//! The defaults are [`CurrentCpu`] and [`ThreadRandom`].

mod current;
mod random;

pub use current::CurrentCpu;
pub use random::{FallbackRng, ThreadRandom};

use core::num::NonZeroUsize;

/// Reports the core the calling thread is currently executing on.
///
/// Implementations must be callable concurrently from any number of threads.
/// The answer is a hint: the thread may migrate the moment after it returns.
pub trait CoreIdSource: Send + Sync {
    /// Returns the current core index, or `None` if it cannot be determined.
    fn current_core(&self) -> Option<usize>;
}

/// A source that never knows the current core.
///
/// Every access through an array using it takes the random fallback path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoCoreId;

impl CoreIdSource for NoCoreId {
    #[inline(always)]
    fn current_core(&self) -> Option<usize> {
        None
    }
}

/// A source that always reports the same core, as if every caller were pinned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedCore(pub usize);

impl CoreIdSource for FixedCore {
    #[inline(always)]
    fn current_core(&self) -> Option<usize> {
        Some(self.0)
    }
}

impl<S: CoreIdSource + ?Sized> CoreIdSource for &S {
    #[inline]
    fn current_core(&self) -> Option<usize> {
        (**self).current_core()
    }
}

/// Number of logical processors available to this process, at least 1.
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}
