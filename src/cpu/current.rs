use super::CoreIdSource;

/// Asks the operating system which CPU the calling thread is running on.
///
/// - Linux / Android: `sched_getcpu(3)`.
/// - Windows: `GetCurrentProcessorNumber`.
/// - Everything else: always `None`, so callers fall back to random shards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentCpu;

impl CoreIdSource for CurrentCpu {
    #[inline]
    fn current_core(&self) -> Option<usize> {
        internal::current_cpu()
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
mod internal {
    #[inline]
    pub fn current_cpu() -> Option<usize> {
        // SAFETY: sched_getcpu takes no arguments and has no preconditions.
        // It returns -1 when the kernel cannot tell us.
        let cpu = unsafe { libc::sched_getcpu() };
        usize::try_from(cpu).ok()
    }
}

#[cfg(windows)]
mod internal {
    #[inline]
    pub fn current_cpu() -> Option<usize> {
        use windows_sys::Win32::System::Threading::GetCurrentProcessorNumber;
        // SAFETY: GetCurrentProcessorNumber takes no arguments and has no
        // preconditions. The result is relative to the processor group.
        let cpu = unsafe { GetCurrentProcessorNumber() };
        usize::try_from(cpu).ok()
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android", windows)))]
mod internal {
    #[inline(always)]
    pub fn current_cpu() -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::available_parallelism;

    #[test]
    #[cfg(any(target_os = "linux", target_os = "android", windows))]
    fn reports_a_plausible_cpu() {
        // Containers may restrict affinity below the host CPU count, so only
        // sanity-check against a generous bound.
        if let Some(cpu) = CurrentCpu.current_core() {
            assert!(cpu < 4096, "cpu {cpu} (parallelism {})", available_parallelism());
        }
    }

    #[test]
    #[cfg(not(any(target_os = "linux", target_os = "android", windows)))]
    fn unsupported_platforms_report_none() {
        assert_eq!(CurrentCpu.current_core(), None);
    }
}
