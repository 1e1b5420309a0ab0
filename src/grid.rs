use crate::error::{Error, Result};
use crate::time::Time;

/// Bookable slot start times for a day.
///
/// Slots run from `start_hour:00` through the last step of `end_hour`
/// inclusive, so the default grid is 06:00, 06:30, ... 21:30.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    first: Time,
    last: Time,
    step: u32,
}

impl TimeGrid {
    pub const DEFAULT_START_HOUR: u32 = 6;
    pub const DEFAULT_END_HOUR: u32 = 21;
    pub const DEFAULT_STEP: u32 = 30;

    pub fn new(start_hour: u32, end_hour: u32, step_minutes: u32) -> Result<TimeGrid> {
        if step_minutes == 0 || 60 % step_minutes != 0 {
            return Err(Error::GridConfig(format!(
                "step of {} minutes does not evenly divide an hour",
                step_minutes
            )));
        }
        if end_hour > 23 {
            return Err(Error::GridConfig(format!("end hour {} is past 23", end_hour)));
        }
        if start_hour > end_hour {
            return Err(Error::GridConfig(format!(
                "start hour {} is after end hour {}",
                start_hour, end_hour
            )));
        }
        Ok(TimeGrid {
            first: Time(start_hour * 60),
            last: Time(end_hour * 60 + 60 - step_minutes),
            step: step_minutes,
        })
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn first(&self) -> Time {
        self.first
    }

    pub fn last(&self) -> Time {
        self.last
    }

    pub fn len(&self) -> usize {
        ((self.last.0 - self.first.0) / self.step + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn slots(&self) -> Slots {
        Slots {
            next: Some(self.first),
            last: self.last,
            step: self.step,
        }
    }

    pub fn contains(&self, t: Time) -> bool {
        t >= self.first && t <= self.last && (t.0 - self.first.0) % self.step == 0
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        TimeGrid {
            first: Time(Self::DEFAULT_START_HOUR * 60),
            last: Time(Self::DEFAULT_END_HOUR * 60 + 60 - Self::DEFAULT_STEP),
            step: Self::DEFAULT_STEP,
        }
    }
}

impl<'a> IntoIterator for &'a TimeGrid {
    type Item = Time;
    type IntoIter = Slots;

    fn into_iter(self) -> Self::IntoIter {
        self.slots()
    }
}

#[derive(Debug, Clone)]
pub struct Slots {
    next: Option<Time>,
    last: Time,
    step: u32,
}

impl Iterator for Slots {
    type Item = Time;

    fn next(&mut self) -> Option<Time> {
        let current = self.next?;
        let following = current + self.step;
        self.next = (following <= self.last).then_some(following);
        Some(current)
    }
}
