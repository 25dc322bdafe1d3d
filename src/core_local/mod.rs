//! `CoreLocalArray`: one slot per CPU core, picked by the caller's current core.
//!
//! The array is sized once, to a power of two that covers every core, and
//! never reallocates. A thread asks for "its" slot with [`CoreLocalArray::access`];
//! the core id is masked down to a slot index, or a per-thread random index is
//! drawn when the platform cannot name the core. Aggregation walks every slot
//! with [`CoreLocalArray::access_at_core`] or [`CoreLocalArray::iter`].
//!
//! Important: the core id only spreads writers, it does not give them
//! ownership. Two threads can land on the same slot (more threads than cores,
//! migration, the random fallback), so shared access hands out `&T` and any
//! mutation goes through `T`'s own synchronization, usually atomics.
//! An aggregate read while writers are active is a torn snapshot.
//!
//! Wrap slot values in [`CachePadded`](crate::CachePadded) (or use
//! [`PaddedCoreLocalArray`]) so neighbouring slots do not share a cache line.

use core::fmt;
use core::ops::{Index, IndexMut};

use crate::config::CoreLocalConfig;
use crate::cpu::{CoreIdSource, CurrentCpu, FallbackRng, ThreadRandom};
use crate::error::OutOfRange;
use crate::CachePadded;

/// A fixed array of `T` with one slot per (power-of-two-rounded) core.
pub struct CoreLocalArray<T, C = CurrentCpu, R = ThreadRandom> {
    slots: Box<[T]>,
    shift: u32,
    cores: C,
    rng: R,
}

/// A [`CoreLocalArray`] whose slots are each padded to a cache line.
pub type PaddedCoreLocalArray<T, C = CurrentCpu, R = ThreadRandom> =
    CoreLocalArray<CachePadded<T>, C, R>;

impl<T: Default> CoreLocalArray<T> {
    /// Creates an array sized for the detected processor count.
    pub fn new() -> Self {
        Self::with_config(CoreLocalConfig::default())
    }

    /// Creates an array sized by `config`.
    pub fn with_config(config: CoreLocalConfig) -> Self {
        Self::with_config_and_sources(config, CurrentCpu, ThreadRandom)
    }
}

impl<T: Default> Default for CoreLocalArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default, C: CoreIdSource, R: FallbackRng> CoreLocalArray<T, C, R> {
    /// Creates an array sized for the detected processor count, using custom
    /// core-id and fallback sources.
    pub fn with_sources(cores: C, rng: R) -> Self {
        Self::with_config_and_sources(CoreLocalConfig::default(), cores, rng)
    }

    /// Creates an array sized by `config`, using custom core-id and fallback
    /// sources.
    pub fn with_config_and_sources(config: CoreLocalConfig, cores: C, rng: R) -> Self {
        let parallelism = config.parallelism();
        let shift = config.slot_shift_for(parallelism);
        let slots: Box<[T]> = core::iter::repeat_with(T::default).take(1 << shift).collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            slots = slots.len(),
            shift,
            parallelism,
            "allocated core-local array"
        );

        Self {
            slots,
            shift,
            cores,
            rng,
        }
    }
}

impl<T, C: CoreIdSource, R: FallbackRng> CoreLocalArray<T, C, R> {
    /// Number of slots. Always a power of two and at least 8.
    #[inline(always)]
    pub fn len(&self) -> usize {
        1 << self.shift
    }

    /// Always `false`; an array has at least 8 slots.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// `log2(len())`.
    #[inline(always)]
    pub fn shift(&self) -> u32 {
        self.shift
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.len() - 1
    }

    /// Maps a core id onto a slot index.
    ///
    /// Equivalent to `core % len()`.
    #[inline(always)]
    pub fn index_for_core(&self, core: usize) -> usize {
        core & self.mask()
    }

    /// Returns the slot for the core the calling thread is running on.
    #[inline]
    pub fn access(&self) -> &T {
        self.access_element_and_index().0
    }

    /// Returns the slot for the calling thread's current core, together with
    /// its index.
    ///
    /// The index can be cached and passed to [`access_at_core`](Self::access_at_core)
    /// later to skip the core-id query. Only do this if some inaccuracy is
    /// acceptable: the thread may have migrated to another core since.
    #[inline]
    pub fn access_element_and_index(&self) -> (&T, usize) {
        let index = match self.cores.current_core() {
            Some(core) => self.index_for_core(core),
            None => {
                #[cfg(feature = "tracing")]
                trace_first_fallback(self.len());
                self.rng.uniform(self.len())
            }
        };
        (self.access_at_core(index), index)
    }

    /// Returns the slot at `index`, e.g. for aggregation or with a cached index.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    #[track_caller]
    pub fn access_at_core(&self, index: usize) -> &T {
        match self.slots.get(index) {
            Some(slot) => slot,
            None => out_of_range(index, self.len()),
        }
    }

    /// Returns the slot at `index`, or [`OutOfRange`] if there is none.
    ///
    /// # Errors
    /// Returns `OutOfRange` if `index >= len()`.
    #[inline]
    pub fn try_access_at_core(&self, index: usize) -> Result<&T, OutOfRange> {
        self.slots.get(index).ok_or(OutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Exclusive access to the slot at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    #[track_caller]
    pub fn access_at_core_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.slots.get_mut(index) {
            Some(slot) => slot,
            None => out_of_range(index, len),
        }
    }

    /// All slots in index order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.slots
    }

    /// All slots in index order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Iterates over every slot in index order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.slots.iter()
    }

    /// Iterates mutably over every slot in index order.
    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.slots.iter_mut()
    }

    /// The core-id source this array consults.
    #[inline]
    pub fn core_source(&self) -> &C {
        &self.cores
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn out_of_range(index: usize, len: usize) -> ! {
    panic!("{}", OutOfRange { index, len })
}

#[cfg(feature = "tracing")]
fn trace_first_fallback(slots: usize) {
    use core::cell::Cell;

    thread_local! {
        static LOGGED: Cell<bool> = const { Cell::new(false) };
    }

    LOGGED.with(|logged| {
        if !logged.replace(true) {
            tracing::trace!(slots, "core id unavailable, picking slots at random");
        }
    });
}

impl<T, C: CoreIdSource, R: FallbackRng> Index<usize> for CoreLocalArray<T, C, R> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, index: usize) -> &T {
        self.access_at_core(index)
    }
}

impl<T, C: CoreIdSource, R: FallbackRng> IndexMut<usize> for CoreLocalArray<T, C, R> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.access_at_core_mut(index)
    }
}

impl<'a, T, C: CoreIdSource, R: FallbackRng> IntoIterator for &'a CoreLocalArray<T, C, R> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, C: CoreIdSource, R: FallbackRng> IntoIterator for &'a mut CoreLocalArray<T, C, R> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: fmt::Debug, C, R> fmt::Debug for CoreLocalArray<T, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreLocalArray")
            .field("len", &self.slots.len())
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}
