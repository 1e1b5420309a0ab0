use crate::aircraft::Registration;
use crate::flight::Flight;
use crate::grid::TimeGrid;
use crate::instructor::InstructorName;
use crate::time::{Time, TimeRange};
use chrono::NaiveDate;
use std::fmt;

/// Something that can be booked: an aircraft keyed by registration or an
/// instructor keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Aircraft(Registration),
    Instructor(InstructorName),
}

impl Resource {
    pub fn is_referenced_by(&self, flight: &Flight) -> bool {
        match self {
            Resource::Aircraft(reg) => flight.aircraft == *reg,
            Resource::Instructor(name) => flight.instructor == *name,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Aircraft(reg) => write!(f, "aircraft {}", reg),
            Resource::Instructor(name) => write!(f, "instructor {}", name),
        }
    }
}

/// Busy/free lookups for one calendar day.
///
/// Holds only the flights that occupy resources on `date`: cancelled
/// flights and flights on other days are dropped when the index is built.
#[derive(Debug, Clone)]
pub struct AvailabilityIndex<'a> {
    date: NaiveDate,
    flights: Vec<&'a Flight>,
}

impl<'a> AvailabilityIndex<'a> {
    pub fn new(date: NaiveDate, flights: &'a [Flight]) -> AvailabilityIndex<'a> {
        let flights = flights
            .iter()
            .filter(|f| f.is_on(date) && f.is_active())
            .collect::<Vec<&Flight>>();
        AvailabilityIndex { date, flights }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn flights(&self) -> &[&'a Flight] {
        &self.flights
    }

    pub fn flights_for<'r>(&'r self, resource: &'r Resource) -> impl Iterator<Item = &'a Flight> + 'r {
        self.flights
            .iter()
            .copied()
            .filter(move |f| resource.is_referenced_by(f))
    }

    /// True iff no active flight of `resource` overlaps any part of `window`.
    pub fn is_free(&self, resource: &Resource, window: &TimeRange) -> bool {
        !self
            .flights_for(resource)
            .any(|f| f.range().overlaps(window))
    }

    /// True iff no active flight of `resource` covers the instant `t`.
    pub fn is_free_at(&self, resource: &Resource, t: Time) -> bool {
        self.occupant_at(resource, t).is_none()
    }

    pub fn occupant_at(&self, resource: &Resource, t: Time) -> Option<&'a Flight> {
        self.flights_for(resource).find(|f| f.range().contains(t))
    }

    pub fn conflicts(&self, resource: &Resource, window: &TimeRange) -> Vec<&'a Flight> {
        self.flights_for(resource)
            .filter(|f| f.range().overlaps(window))
            .collect()
    }

    /// The day's flights of `resource` ordered by start time.
    pub fn schedule_for(&self, resource: &Resource) -> Vec<&'a Flight> {
        let mut flights = self.flights_for(resource).collect::<Vec<_>>();
        flights.sort_by_key(|f| (f.start_time, f.end_time));
        flights
    }

    /// Every active flight in progress at `t`.
    pub fn flights_at(&self, t: Time) -> Vec<&'a Flight> {
        self.flights
            .iter()
            .copied()
            .filter(|f| f.range().contains(t))
            .collect()
    }

    pub fn first_open_slot(
        &self,
        resource: &Resource,
        grid: &TimeGrid,
        not_before: Option<Time>,
    ) -> Option<Time> {
        grid.slots()
            .filter(|slot| not_before.map_or(true, |t| *slot >= t))
            .find(|slot| self.is_free_at(resource, *slot))
    }
}

/// One-shot form of [`AvailabilityIndex::is_free`].
pub fn is_resource_free(
    resource: &Resource,
    date: NaiveDate,
    window: &TimeRange,
    flights: &[Flight],
) -> bool {
    !flights
        .iter()
        .filter(|f| f.is_on(date) && f.is_active())
        .filter(|f| resource.is_referenced_by(f))
        .any(|f| f.range().overlaps(window))
}
