//! Progress reporting for long-running passes.
//!
//! # Example
//!
//! ```
//! use quilt::algo::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     eprintln!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(1, 4, "Building topology");
//! ```

/// A callback that receives `(current, total, message)` updates.
///
/// `current` counts completed steps out of `total`; a call with
/// `current == total` marks the end of the operation.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report a stage inside one of several passes.
    ///
    /// Stage `stage` of `stages` within pass `pass` of `passes` is reported
    /// on a scale of `passes * 1000`, so a subdivision with three passes of
    /// four stages each advances in twelve even steps.
    #[inline]
    pub fn report_sub(&self, stage: usize, stages: usize, pass: usize, passes: usize, message: &str) {
        if stages == 0 || passes == 0 {
            return;
        }
        let effective = pass * 1000 + (stage * 1000) / stages;
        (self.callback)(effective, passes * 1000, message);
    }

    /// A reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_report_sub_scale() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let progress = Progress::new(move |current, total, _| {
            sink.lock().unwrap().push((current, total));
        });

        progress.report_sub(0, 4, 0, 2, "a");
        progress.report_sub(2, 4, 1, 2, "b");
        progress.report_sub(1, 0, 1, 2, "ignored");

        assert_eq!(*seen.lock().unwrap(), vec![(0, 2000), (1500, 2000)]);
    }
}
