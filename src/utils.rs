use std::time::{Duration, Instant};

/// Two decimals with an automatically scaled unit (`1.94ms`, `2.34s`).
pub fn fmt_duration(d: Duration) -> String {
    format!("{d:.2?}")
}

/// Stopwatch for a call with a latency budget.
pub struct SlowCall {
    label: &'static str,
    budget: Duration,
    start: Instant,
}

impl SlowCall {
    pub fn start(label: &'static str, budget: Duration) -> Self {
        Self {
            label,
            budget,
            start: Instant::now(),
        }
    }

    pub fn over_budget(&self, elapsed: Duration) -> bool {
        elapsed > self.budget
    }

    /// Stop the clock, warning if the call ran past its budget.
    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        if self.over_budget(elapsed) {
            tracing::warn!(
                call = self.label,
                duration = fmt_duration(elapsed),
                budget = fmt_duration(self.budget),
                "call exceeded its latency budget"
            );
        }
        elapsed
    }
}
