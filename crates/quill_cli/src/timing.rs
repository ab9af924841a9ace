use std::time::Instant;

/// Wall-clock timer for one statement.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// `N row(s) selected (x.xxx seconds)`.
pub fn rows_summary(rows: usize, secs: f64) -> String {
    let noun = if rows == 1 { "row" } else { "rows" };
    format!("{} {} selected ({:.3} seconds)", rows, noun, secs)
}

/// Summary for a statement without a result set.
pub fn command_summary(affected: u64, secs: f64) -> String {
    let noun = if affected == 1 { "row" } else { "rows" };
    format!("{} {} affected ({:.3} seconds)", affected, noun, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_timer_elapsed_positive() {
        let t = Timer::start();
        thread::sleep(Duration::from_millis(5));
        assert!(t.elapsed_secs() >= 0.001, "elapsed should be >= 1ms after sleep");
    }

    #[test]
    fn test_rows_summary_plural() {
        assert_eq!(rows_summary(1, 0.0123), "1 row selected (0.012 seconds)");
        assert_eq!(rows_summary(0, 1.5), "0 rows selected (1.500 seconds)");
        assert_eq!(rows_summary(42, 0.0), "42 rows selected (0.000 seconds)");
    }

    #[test]
    fn test_command_summary() {
        assert_eq!(command_summary(3, 0.25), "3 rows affected (0.250 seconds)");
        assert_eq!(command_summary(1, 0.0), "1 row affected (0.000 seconds)");
    }
}
