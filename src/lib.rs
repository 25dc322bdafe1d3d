//! # `corelocal` - Per-Core Sharded Storage
//!
//! A [`CoreLocalArray<T>`] holds one `T` per CPU core (rounded up to a power of
//! two, never fewer than 8) and hands each thread the slot of the core it is
//! currently running on. Writers on different cores touch different slots, so
//! hot statistics and counters stop bouncing a single cache line between cores.
//!
//! ## Guarantees
//!
//! - **Fixed storage**: the slot block is allocated once and never resized or
//!   moved, so readers never race with a reallocation.
//! - **Branch-free indexing**: core ids are masked (`core & (len - 1)`), not
//!   divided.
//! - **Always succeeds**: when the platform cannot report the current core,
//!   a per-thread random generator picks the slot instead of funnelling every
//!   such thread onto slot 0.
//!
//! ## What it does not do
//!
//! The core id is a sharding *hint*. Threads can share a slot (oversubscription,
//! migration, the random fallback), so shared access yields `&T` and `T` must
//! bring its own synchronization (atomics for counters). Summing across slots
//! while others write gives a torn, eventually consistent total.
//!
//! ## Example
//!
//! ```rust
//! use core::sync::atomic::{AtomicU64, Ordering};
//! use corelocal::PaddedCoreLocalArray;
//!
//! let hits: PaddedCoreLocalArray<AtomicU64> = PaddedCoreLocalArray::new();
//!
//! std::thread::scope(|s| {
//!     for _ in 0..4 {
//!         s.spawn(|| {
//!             for _ in 0..1000 {
//!                 hits.access().fetch_add(1, Ordering::Relaxed);
//!             }
//!         });
//!     }
//! });
//!
//! let total: u64 = hits.iter().map(|slot| slot.load(Ordering::Relaxed)).sum();
//! assert_eq!(total, 4000);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod core_local;
pub mod cpu;
pub mod error;

pub use config::{CoreLocalConfig, MAX_SLOTS, MIN_SLOTS};
pub use core_local::{CoreLocalArray, PaddedCoreLocalArray};
pub use cpu::{CoreIdSource, CurrentCpu, FallbackRng, FixedCore, NoCoreId, ThreadRandom};
pub use error::OutOfRange;

/// Re-exported so slot types can be padded without an extra dependency.
pub use crossbeam_utils::CachePadded;

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // Default sources carry no state.
    assert!(mem::size_of::<CurrentCpu>() == 0);
    assert!(mem::size_of::<ThreadRandom>() == 0);

    // Slot box + shift, nothing more.
    assert!(mem::size_of::<CoreLocalArray<u64>>() <= mem::size_of::<usize>() * 3);

    // Padded slots are never packed tighter than the smallest cache line.
    assert!(mem::align_of::<CachePadded<u8>>() >= 16);
};
