use std::time::Duration;

/// Stable handle of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once, then is forgotten.
    Once,
    /// Re-arms itself after every firing until cancelled.
    Every,
}

struct Timer<T> {
    id: TimerId,
    kind: TimerKind,
    period: Duration,
    due: Duration,
    payload: T,
}

/// Virtual-clock timer queue.
///
/// The scheduler never sleeps and owns no thread: the host advances it with `tick(dt)` and
/// receives the payloads of every timer that came due, ordered by due time and then by
/// scheduling order.
pub struct Scheduler<T: Clone> {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

/// Intervals shorter than this are clamped so a zero period cannot spin forever.
const MIN_PERIOD: Duration = Duration::from_millis(1);

impl<T: Clone> Scheduler<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            timers: Vec::new(),
        }
    }

    #[inline]
    pub fn once(&mut self, delay: Duration, payload: T) -> TimerId {
        self.schedule(TimerKind::Once, delay, payload)
    }

    #[inline]
    pub fn every(&mut self, period: Duration, payload: T) -> TimerId {
        self.schedule(TimerKind::Every, period, payload)
    }

    pub fn schedule(&mut self, kind: TimerKind, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let period = delay.max(MIN_PERIOD);
        self.timers.push(Timer {
            id,
            kind,
            period,
            due: self.now + period,
            payload,
        });
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    #[inline]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Virtual time elapsed since construction.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Advances the clock and collects due payloads.
    pub fn tick(&mut self, dt: Duration) -> Vec<(TimerId, T)> {
        self.now += dt;

        let mut fired: Vec<(Duration, u64, TimerId, T)> = Vec::new();
        let mut seq = 0u64;

        for t in self.timers.iter_mut() {
            while t.due <= self.now {
                fired.push((t.due, seq, t.id, t.payload.clone()));
                seq += 1;
                match t.kind {
                    TimerKind::Once => break,
                    TimerKind::Every => t.due += t.period,
                }
            }
        }

        let now = self.now;
        self.timers
            .retain(|t| !(t.kind == TimerKind::Once && t.due <= now));

        fired.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, id, p)| (id, p)).collect()
    }
}

impl<T: Clone> Default for Scheduler<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_fires_a_single_time() {
        let mut s = Scheduler::new();
        s.once(Duration::from_millis(100), "a");

        assert!(s.tick(Duration::from_millis(99)).is_empty());
        let fired = s.tick(Duration::from_millis(1));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].1, "a");
        assert!(s.is_empty());
        assert!(s.tick(Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn every_fires_per_elapsed_period_until_cancelled() {
        let mut s = Scheduler::new();
        let id = s.every(Duration::from_millis(10), 7u32);

        assert_eq!(s.tick(Duration::from_millis(35)).len(), 3);
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(s.tick(Duration::from_millis(100)).is_empty());
    }

    #[test]
    fn fired_payloads_are_ordered_by_due_time() {
        let mut s = Scheduler::new();
        s.once(Duration::from_millis(30), "late");
        s.once(Duration::from_millis(10), "early");

        let fired: Vec<_> = s
            .tick(Duration::from_millis(50))
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(fired, vec!["early", "late"]);
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut s = Scheduler::new();
        s.every(Duration::ZERO, ());
        assert_eq!(s.tick(Duration::from_millis(3)).len(), 3);
    }
}
