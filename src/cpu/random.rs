use rand::Rng;

/// A uniform index generator used when the current core is unknown.
///
/// Implementations should keep their state per thread; a shared generator
/// would become the very contention point the array exists to avoid.
pub trait FallbackRng: Send + Sync {
    /// Returns a value drawn uniformly from `[0, upper)`.
    ///
    /// `upper` of 0 or 1 yields 0.
    fn uniform(&self, upper: usize) -> usize;
}

/// [`FallbackRng`] backed by [`rand::thread_rng`].
///
/// The generator is created lazily on a thread's first draw and dropped
/// when the thread exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadRandom;

impl FallbackRng for ThreadRandom {
    #[inline]
    fn uniform(&self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..upper)
    }
}

impl<R: FallbackRng + ?Sized> FallbackRng for &R {
    #[inline]
    fn uniform(&self, upper: usize) -> usize {
        (**self).uniform(upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_below_bound() {
        for upper in [1, 2, 7, 8, 64, 1000] {
            for _ in 0..500 {
                assert!(ThreadRandom.uniform(upper) < upper);
            }
        }
    }

    #[test]
    fn degenerate_bounds() {
        assert_eq!(ThreadRandom.uniform(0), 0);
        assert_eq!(ThreadRandom.uniform(1), 0);
    }

    #[test]
    fn hits_every_value() {
        let mut seen = [false; 8];
        for _ in 0..10_000 {
            seen[ThreadRandom.uniform(8)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
