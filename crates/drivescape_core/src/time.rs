//! Frame time and deferred work
//!
//! [`Clock`] turns raw frame durations into [`Tick`]s with a capped delta.
//! [`Timers`] holds one-shot callbacks as plain payloads; the owner decides
//! what firing a payload means.

/// Reading of the clock for one frame, in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tick {
    pub elapsed: f32,
    pub delta: f32,
}

impl Tick {
    /// Elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed * 1000.0
    }
}

/// Accumulates frame time
#[derive(Clone, Debug)]
pub struct Clock {
    elapsed: f32,
    max_delta: f32,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(0.25)
    }
}

impl Clock {
    /// Clock whose delta never exceeds `max_delta`, so a stalled frame does
    /// not throw bodies through the floor
    pub fn new(max_delta: f32) -> Self {
        Self {
            elapsed: 0.0,
            max_delta: max_delta.max(0.0),
        }
    }

    pub fn advance(&mut self, raw_delta: f32) -> Tick {
        let delta = raw_delta.clamp(0.0, self.max_delta);
        self.elapsed += delta;
        Tick {
            elapsed: self.elapsed,
            delta,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Handle for cancelling a scheduled timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Pending<T> {
    id: TimerId,
    due: f32,
    payload: T,
}

/// One-shot timers keyed to a local clock
///
/// Timers that become due in the same advance fire in due order; ties keep
/// scheduling order.
#[derive(Clone, Debug)]
pub struct Timers<T> {
    now: f32,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Fire `payload` after `delay` seconds
    pub fn schedule(&mut self, delay: f32, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay.max(0.0);
        let index = self.pending.partition_point(|p| p.due <= due);
        self.pending.insert(index, Pending { id, due, payload });
        id
    }

    /// Returns the payload if the timer had not fired yet
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let index = self.pending.iter().position(|p| p.id == id)?;
        Some(self.pending.remove(index).payload)
    }

    /// Advance by `dt` seconds, returning every payload that came due
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += dt.max(0.0);
        let now = self.now;
        let due = self.pending.partition_point(|p| p.due <= now);
        self.pending.drain(..due).map(|p| p.payload).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
