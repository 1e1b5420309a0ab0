use crate::aircraft::Aircraft;
use crate::authorization::SelectionFilter;
use crate::availability::{AvailabilityIndex, Resource};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::flight::Flight;
use crate::grid::{Slots, TimeGrid};
use crate::instructor::Instructor;
use crate::time::{Time, TimeRange};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_MINUTES: u32 = 120;

/// How a candidate window is tested against existing flights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityCheck {
    /// Every resource must be free for the whole window.
    #[default]
    FullWindow,
    /// Only the window's first minute is checked.
    StartInstant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Window {
    pub start_time: Time,
    pub end_time: Time,
    pub duration_hours: f64,
}

impl Window {
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// Turns the day grid and a selection filter into bookable windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAggregator {
    grid: TimeGrid,
    window_minutes: u32,
    check: AvailabilityCheck,
}

impl Default for SlotAggregator {
    fn default() -> Self {
        SlotAggregator {
            grid: TimeGrid::default(),
            window_minutes: DEFAULT_WINDOW_MINUTES,
            check: AvailabilityCheck::default(),
        }
    }
}

impl SlotAggregator {
    pub fn new(grid: TimeGrid, window_minutes: u32, check: AvailabilityCheck) -> Result<SlotAggregator> {
        if window_minutes == 0 || window_minutes > Time::END_OF_DAY.0 {
            return Err(Error::GridConfig(format!(
                "window of {} minutes is not bookable",
                window_minutes
            )));
        }
        Ok(SlotAggregator {
            grid,
            window_minutes,
            check,
        })
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn window_minutes(&self) -> u32 {
        self.window_minutes
    }

    pub fn check(&self) -> AvailabilityCheck {
        self.check
    }

    /// Windows on `date` where every filtered resource is free.
    ///
    /// `Ok(None)` means no filter has been applied yet, which callers must
    /// keep apart from `Ok(Some(..))` yielding nothing.
    pub fn aggregate<'a>(
        &self,
        catalog: &Catalog,
        flights: &'a [Flight],
        date: NaiveDate,
        filter: &SelectionFilter,
    ) -> Result<Option<AvailableWindows<'a>>> {
        if filter.is_empty() {
            return Ok(None);
        }
        let resources = Self::resources(catalog, filter)?;
        log::debug!(
            "aggregating {}-minute windows on {} over {} resources",
            self.window_minutes,
            date,
            resources.len()
        );
        Ok(Some(AvailableWindows {
            slots: self.grid.slots(),
            window_minutes: self.window_minutes,
            check: self.check,
            index: AvailabilityIndex::new(date, flights),
            resources,
        }))
    }

    /// Per slot and per filtered aircraft: whether the aircraft can be
    /// booked for the window, and which filtered instructors authorized for
    /// it are free as well. A cell is selectable only with at least one such
    /// instructor.
    pub fn aircraft_grid<'a>(
        &self,
        catalog: &'a Catalog,
        flights: &[Flight],
        date: NaiveDate,
        filter: &SelectionFilter,
    ) -> Result<Vec<GridRow<'a>>> {
        let aircraft = filter
            .aircraft
            .iter()
            .map(|reg| {
                catalog
                    .aircraft_by_registration(reg)
                    .ok_or_else(|| Error::UnknownAircraft(reg.to_string()))
            })
            .collect::<Result<Vec<&Aircraft>>>()?;
        let instructors = filter
            .instructors
            .iter()
            .map(|id| {
                catalog
                    .instructor_by_id(id)
                    .ok_or_else(|| Error::UnknownInstructor(id.to_string()))
            })
            .collect::<Result<Vec<&Instructor>>>()?;

        let index = AvailabilityIndex::new(date, flights);
        let rows = self
            .grid
            .slots()
            .map(|slot| {
                let window = self.window_at(slot);
                let cells = aircraft
                    .iter()
                    .map(|ac| {
                        let Some(window) = window else {
                            return GridCell {
                                aircraft: *ac,
                                selectable: false,
                                instructors: vec![],
                            };
                        };
                        let resource = Resource::Aircraft(ac.registration.clone());
                        let aircraft_free = admits(&index, self.check, &resource, &window);
                        let free_instructors = instructors
                            .iter()
                            .copied()
                            .filter(|i| i.authorized_aircraft.permits(&ac.registration))
                            .filter(|i| {
                                admits(&index, self.check, &Resource::Instructor(i.name.clone()), &window)
                            })
                            .collect::<Vec<&Instructor>>();
                        GridCell {
                            aircraft: *ac,
                            selectable: aircraft_free && !free_instructors.is_empty(),
                            instructors: free_instructors,
                        }
                    })
                    .collect();
                GridRow { slot, cells }
            })
            .collect();
        Ok(rows)
    }

    fn window_at(&self, slot: Time) -> Option<TimeRange> {
        let end = slot + self.window_minutes;
        (end <= Time::END_OF_DAY).then_some(TimeRange { start: slot, end })
    }

    fn resources(catalog: &Catalog, filter: &SelectionFilter) -> Result<Vec<Resource>> {
        let mut resources = Vec::with_capacity(filter.aircraft.len() + filter.instructors.len());
        for reg in &filter.aircraft {
            let ac = catalog
                .aircraft_by_registration(reg)
                .ok_or_else(|| Error::UnknownAircraft(reg.to_string()))?;
            resources.push(Resource::Aircraft(ac.registration.clone()));
        }
        for id in &filter.instructors {
            let instructor = catalog
                .instructor_by_id(id)
                .ok_or_else(|| Error::UnknownInstructor(id.to_string()))?;
            resources.push(Resource::Instructor(instructor.name.clone()));
        }
        Ok(resources)
    }
}

fn admits(index: &AvailabilityIndex, check: AvailabilityCheck, resource: &Resource, window: &TimeRange) -> bool {
    match check {
        AvailabilityCheck::FullWindow => index.is_free(resource, window),
        AvailabilityCheck::StartInstant => index.is_free_at(resource, window.start),
    }
}

/// Lazy sequence of bookable windows. Cloning restarts it from the
/// current position.
#[derive(Debug, Clone)]
pub struct AvailableWindows<'a> {
    slots: Slots,
    window_minutes: u32,
    check: AvailabilityCheck,
    index: AvailabilityIndex<'a>,
    resources: Vec<Resource>,
}

impl Iterator for AvailableWindows<'_> {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        loop {
            let slot = self.slots.next()?;
            let end = slot + self.window_minutes;
            if end > Time::END_OF_DAY {
                continue;
            }
            let window = TimeRange { start: slot, end };
            if self
                .resources
                .iter()
                .all(|r| admits(&self.index, self.check, r, &window))
            {
                return Some(Window {
                    start_time: window.start,
                    end_time: window.end,
                    duration_hours: window.hours(),
                });
            }
        }
    }
}

#[derive(Debug)]
pub struct GridRow<'a> {
    pub slot: Time,
    pub cells: Vec<GridCell<'a>>,
}

#[derive(Debug)]
pub struct GridCell<'a> {
    pub aircraft: &'a Aircraft,
    pub selectable: bool,
    pub instructors: Vec<&'a Instructor>,
}
