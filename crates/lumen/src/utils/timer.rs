use std::time::{Duration, Instant};

pub struct Timed<T> {
    pub res: T,
    pub elapsed: Duration,
}

pub fn timed_scope<T>(f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let res = f();
    Timed {
        res,
        elapsed: start.elapsed(),
    }
}

pub fn timed_scope_log<T>(label: &str, f: impl FnOnce() -> T) -> Timed<T> {
    let timed = timed_scope(f);
    log::info!("{label}: {}", format_elapsed(timed.elapsed));
    timed
}

pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{:.1} ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.2} s")
    } else {
        format!("{}m{:04.1}s", (secs / 60.0) as u64, secs % 60.0)
    }
}
