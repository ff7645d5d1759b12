use std::{
    fmt::Display,
    sync::atomic,
    time::{Duration, Instant},
};

use super::timer::format_elapsed;

/// Shared tile-completion counter. Cheap enough to bump from every worker;
/// rendering elsewhere decides when to display it.
pub struct Progress {
    current: atomic::AtomicUsize,
    max: usize,
    started: Instant,
}

impl Progress {
    pub fn new(max: usize) -> Self {
        Self {
            current: atomic::AtomicUsize::new(0),
            max,
            started: Instant::now(),
        }
    }

    /// Adds `k` units and returns the previous count.
    pub fn add(&self, k: usize) -> usize {
        self.current.fetch_add(k, atomic::Ordering::SeqCst)
    }

    pub fn get_raw(&self) -> usize {
        self.current.load(atomic::Ordering::SeqCst)
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Remaining time assuming units keep completing at the observed rate.
    pub fn eta(&self) -> Option<Duration> {
        let done = self.get_raw();
        if done == 0 || done >= self.max {
            return None;
        }
        let per_unit = self.elapsed().as_secs_f64() / done as f64;
        Some(Duration::from_secs_f64(per_unit * (self.max - done) as f64))
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let percent = if self.max == 0 {
            1.0
        } else {
            (self.get_raw() as f32 / self.max as f32).clamp(0.0, 1.0)
        };
        PercentBar { percent, width: 50 }.fmt(f)?;
        write!(f, " elapsed {}", format_elapsed(self.elapsed()))?;
        if let Some(eta) = self.eta() {
            write!(f, " remaining {}", format_elapsed(eta))?;
        }
        Ok(())
    }
}

pub struct PercentBar {
    pub percent: f32,
    pub width: usize,
}

impl Display for PercentBar {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filled = ((self.width - 1) as f32 * self.percent).round() as usize;
        write!(
            f,
            "[{empty:=>width_left$}>{empty:.<width_right$}] {percent:.1}%",
            empty = "",
            width_left = filled,
            width_right = self.width - 1 - filled,
            percent = 100. * self.percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Progress;

    #[test]
    fn counts() {
        let p = Progress::new(4);
        assert_eq!(p.add(1), 0);
        assert_eq!(p.add(2), 1);
        assert_eq!(p.get_raw(), 3);
        assert!(p.eta().is_some());
        p.add(1);
        assert!(p.eta().is_none());
    }
}
