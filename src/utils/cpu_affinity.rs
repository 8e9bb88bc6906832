//! Thread pinning for the measurement loop.
//!
//! Keeping the benchmark thread on one core stops the scheduler from
//! migrating it mid-run, which would show up as cold-cache outliers. On
//! Linux this uses `sched_setaffinity` through libc; elsewhere pinning is a
//! no-op and the guard reports that it is not pinned.

// ============================================================================
// Linux implementation using libc
// ============================================================================

#[cfg(target_os = "linux")]
mod platform {
    /// Opaque saved affinity mask
    pub struct SavedAffinity(libc::cpu_set_t);

    pub fn current_cpu() -> Option<usize> {
        let cpu = unsafe { libc::sched_getcpu() };
        usize::try_from(cpu).ok()
    }

    pub fn save_affinity() -> Option<SavedAffinity> {
        unsafe {
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            if libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut set) == 0 {
                Some(SavedAffinity(set))
            } else {
                None
            }
        }
    }

    pub fn set_affinity(core_id: usize) -> bool {
        unsafe {
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(core_id, &mut set);
            libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0
        }
    }

    pub fn restore_affinity(saved: &SavedAffinity) -> bool {
        unsafe {
            libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &saved.0) == 0
        }
    }
}

// ============================================================================
// Fallback for other platforms
// ============================================================================

#[cfg(not(target_os = "linux"))]
mod platform {
    #[allow(dead_code)]
    pub struct SavedAffinity;

    pub fn current_cpu() -> Option<usize> {
        None
    }
    pub fn save_affinity() -> Option<SavedAffinity> {
        None
    }
    pub fn set_affinity(_core_id: usize) -> bool {
        false
    }
    pub fn restore_affinity(_saved: &SavedAffinity) -> bool {
        true
    }
}

/// The core the calling thread is running on, if the platform tells.
pub fn current_cpu() -> Option<usize> {
    platform::current_cpu()
}

/// RAII guard for CPU pinning - pins on creation, restores the previous
/// affinity on drop.
///
/// # Example
/// ```ignore
/// {
///     let _pin = CpuPinGuard::new(); // Thread pinned
///     // ... timed loop ...
/// } // Previous affinity restored here
/// ```
pub struct CpuPinGuard {
    pinned_core: Option<usize>,
    saved: Option<platform::SavedAffinity>,
}

impl CpuPinGuard {
    /// Pin to the core the thread is currently running on.
    pub fn new() -> Self {
        match current_cpu() {
            Some(core) => Self::with_core(core),
            None => Self {
                pinned_core: None,
                saved: None,
            },
        }
    }

    /// Pin to a specific core.
    pub fn with_core(core_id: usize) -> Self {
        let saved = platform::save_affinity();
        let pinned = saved.is_some() && platform::set_affinity(core_id);
        Self {
            pinned_core: pinned.then_some(core_id),
            saved,
        }
    }

    /// Get the core ID this thread is pinned to, if any.
    pub fn core_id(&self) -> Option<usize> {
        self.pinned_core
    }

    /// Check if the thread was successfully pinned.
    pub fn is_pinned(&self) -> bool {
        self.pinned_core.is_some()
    }
}

impl Drop for CpuPinGuard {
    fn drop(&mut self) {
        if let (Some(_), Some(saved)) = (self.pinned_core, self.saved.as_ref()) {
            platform::restore_affinity(saved);
        }
    }
}

impl Default for CpuPinGuard {
    fn default() -> Self {
        Self::new()
    }
}
