// src/timing.rs

//! Tick pacing for the render loop.

use std::time::{Duration, Instant};

/// Time source for the scheduler, split out so tests can drive fake time.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `Instant::now` and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Outcome of one scheduling decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickBudget {
    /// The tick met its deadline; sleep this long before the next one.
    OnTime(Duration),
    /// The deadline had passed and was re-anchored; start the next tick now.
    Overrun,
}

impl TickBudget {
    /// Time to sleep before the next tick starts.
    pub fn sleep_duration(self) -> Duration {
        match self {
            TickBudget::OnTime(budget) => budget,
            TickBudget::Overrun => Duration::ZERO,
        }
    }

    pub fn is_overrun(self) -> bool {
        matches!(self, TickBudget::Overrun)
    }
}

/// Fixed-rate deadline tracker.
///
/// Each tick gets one deadline, one frame period after the previous one. A
/// tick finishing early sleeps the remainder; a tick that overruns re-anchors
/// the deadline to the present, so lost time is absorbed instead of
/// accumulating into a backlog of catch-up frames.
#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    deadline: Instant,
}

impl TickScheduler {
    /// Creates a scheduler for the given frame rate, anchored at `now`.
    ///
    /// `fps` must be positive and finite; the configuration layer validates
    /// this before a scheduler is built.
    pub fn new(fps: f64, now: Instant) -> Self {
        let period = Duration::from_secs_f64(1.0 / fps);
        TickScheduler {
            period,
            deadline: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Budget remaining before the next tick should start.
    ///
    /// On time, the deadline advances by one period and the remainder is
    /// returned; landing exactly on the deadline is on time with a zero
    /// budget. After an overrun the deadline re-anchors to `now`.
    pub fn sleep_budget(&mut self, now: Instant) -> TickBudget {
        match self.deadline.checked_duration_since(now) {
            Some(budget) => {
                self.deadline += self.period;
                TickBudget::OnTime(budget)
            }
            None => {
                self.deadline = now + self.period;
                TickBudget::Overrun
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(100);

    fn scheduler_at(start: Instant) -> TickScheduler {
        TickScheduler::new(10.0, start)
    }

    #[test]
    fn period_follows_the_frame_rate() {
        let scheduler = TickScheduler::new(25.0, Instant::now());
        assert_eq!(scheduler.period(), Duration::from_millis(40));
    }

    #[test]
    fn fast_ticks_sleep_the_remainder() {
        let start = Instant::now();
        let mut scheduler = scheduler_at(start);
        let budget = scheduler.sleep_budget(start + Duration::from_millis(30));
        assert_eq!(budget, TickBudget::OnTime(Duration::from_millis(70)));
        assert_eq!(budget.sleep_duration(), Duration::from_millis(70));
    }

    #[test]
    fn deadlines_stay_on_the_period_grid() {
        let start = Instant::now();
        let mut scheduler = scheduler_at(start);
        // Tick 1 finishes at 30ms, tick 2 at 130ms: both sleep to multiples
        // of the period, independent of where within it they finished.
        assert_eq!(
            scheduler.sleep_budget(start + Duration::from_millis(30)),
            TickBudget::OnTime(Duration::from_millis(70))
        );
        assert_eq!(
            scheduler.sleep_budget(start + Duration::from_millis(130)),
            TickBudget::OnTime(Duration::from_millis(70))
        );
    }

    #[test]
    fn overruns_reanchor_instead_of_accumulating() {
        let start = Instant::now();
        let mut scheduler = scheduler_at(start);
        // Tick takes 250ms, blowing through two deadlines.
        let budget = scheduler.sleep_budget(start + Duration::from_millis(250));
        assert_eq!(budget, TickBudget::Overrun);
        assert_eq!(budget.sleep_duration(), Duration::ZERO);
        // The next deadline is one period after the overrun, not three
        // periods after the start.
        assert_eq!(
            scheduler.sleep_budget(start + Duration::from_millis(260)),
            TickBudget::OnTime(Duration::from_millis(90))
        );
    }

    #[test]
    fn exact_deadline_is_not_an_overrun() {
        let start = Instant::now();
        let mut scheduler = scheduler_at(start);
        let budget = scheduler.sleep_budget(start + PERIOD);
        assert_eq!(budget, TickBudget::OnTime(Duration::ZERO));
        assert!(!budget.is_overrun());
        // Deadline advanced normally, so the next budget is a full period.
        assert_eq!(scheduler.sleep_budget(start + PERIOD), TickBudget::OnTime(PERIOD));
    }
}
