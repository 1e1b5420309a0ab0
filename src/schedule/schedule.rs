use crate::aircraft::Aircraft;
use crate::availability::{AvailabilityIndex, Resource, is_resource_free};
use crate::booking::{self, BookingRequest, Rejection};
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::flight::{Flight, FlightId, FlightStatus};
use crate::instructor::Instructor;
use crate::time::{Time, TimeRange};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlightStats {
    pub scheduled: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl FlightStats {
    pub fn total(&self) -> usize {
        self.scheduled + self.completed + self.cancelled
    }
}

/// The single in-memory flight store.
///
/// Every mutation goes through `&mut self`, so validating a booking and
/// committing it can never interleave with another write.
pub struct Schedule {
    pub catalog: Catalog,
    pub settings: EngineConfig,
    flights: Vec<Flight>,
    flights_index: HashMap<FlightId, usize>,
    next_id: u64,
}

impl Schedule {
    pub fn new(catalog: Catalog, mut flights: Vec<Flight>) -> Result<Schedule> {
        flights.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));

        let mut flights_index = HashMap::with_capacity(flights.len());
        for (i, flight) in flights.iter().enumerate() {
            Self::check_record(&catalog, flight)?;
            if flights_index.insert(flight.id.clone(), i).is_some() {
                return Err(Error::Catalog(format!("duplicate flight id {}", flight.id)));
            }
            if flight.is_active() {
                Self::check_overlap(flight, &flights[..i])?;
            }
        }

        let next_id = flights
            .iter()
            .filter_map(|f| f.id.strip_prefix('F').and_then(|n| n.parse::<u64>().ok()))
            .max()
            .unwrap_or(0)
            + 1;

        let schedule = Schedule {
            catalog,
            settings: EngineConfig::default(),
            flights,
            flights_index,
            next_id,
        };
        schedule.assert_invariants();
        Ok(schedule)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        #[derive(Deserialize)]
        struct RawData {
            aircraft: Vec<Aircraft>,
            instructors: Vec<Instructor>,
            #[serde(default)]
            flights: Vec<Flight>,
            #[serde(default)]
            settings: EngineConfig,
        }
        let raw: RawData = serde_json::from_str(&data)?;

        // fail early on unusable settings
        raw.settings.aggregator()?;

        let catalog = Catalog::new(raw.aircraft, raw.instructors)?;
        let mut schedule = Schedule::new(catalog, raw.flights)?;
        schedule.settings = raw.settings;
        log::info!(
            "loaded {} flights from {}",
            schedule.flights.len(),
            path.as_ref().display()
        );
        Ok(schedule)
    }

    fn check_record(catalog: &Catalog, flight: &Flight) -> Result<()> {
        if flight.start_time >= flight.end_time || flight.end_time > Time::END_OF_DAY {
            return Err(Error::InvalidInterval {
                start: flight.start_time.to_string(),
                end: flight.end_time.to_string(),
            });
        }
        if catalog.aircraft_by_registration(&flight.aircraft).is_none() {
            return Err(Error::UnknownAircraft(flight.aircraft.to_string()));
        }
        if catalog.instructor_by_name(&flight.instructor).is_none() {
            return Err(Error::UnknownInstructor(flight.instructor.to_string()));
        }
        Ok(())
    }

    fn check_overlap(flight: &Flight, earlier: &[Flight]) -> Result<()> {
        let range = flight.range();
        let aircraft = Resource::Aircraft(flight.aircraft.clone());
        let instructor = Resource::Instructor(flight.instructor.clone());
        let clash = |resource: &Resource| {
            earlier
                .iter()
                .filter(|f| f.is_active() && f.is_on(flight.date))
                .find(|f| resource.is_referenced_by(f) && f.range().overlaps(&range))
        };
        if let Some(other) = clash(&aircraft) {
            return Err(Rejection::AircraftConflict {
                registration: flight.aircraft.clone(),
                flight: other.id.clone(),
                range: other.range(),
            }
            .into());
        }
        if let Some(other) = clash(&instructor) {
            return Err(Rejection::InstructorConflict {
                instructor: flight.instructor.clone(),
                flight: other.id.clone(),
                range: other.range(),
            }
            .into());
        }
        Ok(())
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn flight(&self, id: &str) -> Option<&Flight> {
        self.flights_index.get(id).map(|i| &self.flights[*i])
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.flights_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownFlight(id.to_string()))
    }

    fn active_position(&self, id: &str) -> Result<usize> {
        let idx = self.position(id)?;
        if !self.flights[idx].is_active() {
            return Err(Error::AlreadyCancelled(id.to_string()));
        }
        Ok(idx)
    }

    pub fn index(&self, date: NaiveDate) -> AvailabilityIndex<'_> {
        AvailabilityIndex::new(date, &self.flights)
    }

    pub fn is_free(&self, resource: &Resource, date: NaiveDate, window: &TimeRange) -> bool {
        is_resource_free(resource, date, window, &self.flights)
    }

    fn allocate_id(&mut self) -> FlightId {
        loop {
            let id: FlightId = Arc::from(format!("F{}", self.next_id));
            self.next_id += 1;
            if !self.flights_index.contains_key(&id) {
                return id;
            }
        }
    }

    /// Validates `request` against the catalog and every committed flight,
    /// then stores it as a scheduled flight.
    pub fn book(&mut self, request: BookingRequest) -> Result<&Flight> {
        if let Err(rejection) = booking::validate(&request, &self.catalog, &self.flights) {
            log::warn!("booking rejected ({}): {}", rejection.code(), rejection);
            return Err(rejection.into());
        }

        let id = self.allocate_id();
        let flight = Flight {
            id: id.clone(),
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            aircraft: request.aircraft,
            instructor: request.instructor,
            student: request.student,
            kind: request.kind,
            status: FlightStatus::Scheduled,
            hobbs_time: None,
            cancel_reason: None,
            cancel_comments: None,
            flight_category: request.flight_category,
        };
        log::info!("booked {}", flight);

        let idx = self.flights.len();
        self.flights.push(flight);
        self.flights_index.insert(id, idx);

        self.assert_invariants();
        Ok(&self.flights[idx])
    }

    pub fn cancel(&mut self, id: &str, reason: &str, comments: Option<String>) -> Result<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::MissingCancelReason);
        }
        let idx = self.active_position(id)?;

        let flight = &mut self.flights[idx];
        flight.status = FlightStatus::Cancelled;
        flight.cancel_reason = Some(reason.to_string());
        flight.cancel_comments = comments.filter(|c| !c.trim().is_empty());
        log::info!("cancelled {} ({})", flight.id, reason);

        self.assert_invariants();
        Ok(())
    }

    /// Moves a flight to new times on the same day. The flight is checked
    /// against every other flight, never against itself.
    pub fn reschedule(&mut self, id: &str, start: Time, end: Time) -> Result<()> {
        let idx = self.active_position(id)?;
        let current = &self.flights[idx];
        let request = BookingRequest {
            date: current.date,
            start_time: start,
            end_time: end,
            aircraft: current.aircraft.clone(),
            instructor: current.instructor.clone(),
            student: current.student.clone(),
            kind: current.kind,
            flight_category: current.flight_category,
        };
        if let Err(rejection) =
            booking::validate_excluding(&request, &self.catalog, &self.flights, Some(id))
        {
            log::warn!("reschedule of {} rejected ({}): {}", id, rejection.code(), rejection);
            return Err(rejection.into());
        }

        let flight = &mut self.flights[idx];
        log::info!("rescheduled {} from {} to {}-{}", flight.id, flight.range(), start, end);
        flight.start_time = start;
        flight.end_time = end;

        self.assert_invariants();
        Ok(())
    }

    pub fn record_hobbs(&mut self, id: &str, hours: f64) -> Result<()> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(Error::InvalidHobbs(hours));
        }
        let idx = self.active_position(id)?;
        self.flights[idx].hobbs_time = Some(hours);
        log::info!("recorded {:.1} hobbs hours on {}", hours, id);
        self.assert_invariants();
        Ok(())
    }

    pub fn complete(&mut self, id: &str) -> Result<()> {
        let idx = self.active_position(id)?;
        self.flights[idx].status = FlightStatus::Completed;
        log::info!("completed {}", id);
        self.assert_invariants();
        Ok(())
    }

    pub fn stats(&self) -> FlightStats {
        self.flights
            .iter()
            .fold(FlightStats::default(), |mut stats, f| {
                match f.status {
                    FlightStatus::Scheduled => stats.scheduled += 1,
                    FlightStatus::Completed => stats.completed += 1,
                    FlightStatus::Cancelled => stats.cancelled += 1,
                }
                stats
            })
    }

    /// Logged hobbs hours over completed flights plus `previous` experience.
    pub fn total_hours(&self, previous: f64) -> f64 {
        self.flights
            .iter()
            .filter(|f| f.status == FlightStatus::Completed)
            .filter_map(|f| f.hobbs_time)
            .sum::<f64>()
            + previous
    }

    /// Scheduled flights from `today` on, soonest first.
    pub fn upcoming(&self, today: NaiveDate) -> Vec<&Flight> {
        let mut flights: Vec<&Flight> = self
            .flights
            .iter()
            .filter(|f| f.date >= today && f.status == FlightStatus::Scheduled)
            .collect();
        flights.sort_by_key(|f| (f.date, f.start_time));
        flights
    }

    /// Everything not upcoming, most recent first.
    pub fn past(&self, today: NaiveDate) -> Vec<&Flight> {
        let mut flights: Vec<&Flight> = self
            .flights
            .iter()
            .filter(|f| f.date < today || f.status != FlightStatus::Scheduled)
            .collect();
        flights.sort_by(|a, b| (b.date, b.start_time).cmp(&(a.date, a.start_time)));
        flights
    }

    #[cfg(not(debug_assertions))]
    fn assert_invariants(&self) {}

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        debug_assert_eq!(
            self.flights.len(),
            self.flights_index.len(),
            "Flight id uniqueness violated"
        );
        debug_assert!(
            self.flights_index
                .iter()
                .all(|(id, i)| self.flights.get(*i).is_some_and(|f| f.id == *id)),
            "Flight index consistency violated"
        );
        debug_assert!(
            self.flights.iter().all(|f| f.start_time < f.end_time),
            "Flight start < end violated"
        );
        debug_assert!(
            self.flights
                .iter()
                .filter_map(|f| f.hobbs_time)
                .all(|h| h.is_finite() && h >= 0.0),
            "Hobbs time >= 0 invariant violated"
        );

        let mut by_resource: HashMap<(NaiveDate, Resource), Vec<&Flight>> = HashMap::new();
        for flight in self.flights.iter().filter(|f| f.is_active()) {
            for resource in [
                Resource::Aircraft(flight.aircraft.clone()),
                Resource::Instructor(flight.instructor.clone()),
            ] {
                by_resource
                    .entry((flight.date, resource))
                    .or_default()
                    .push(flight);
            }
        }
        for ((date, resource), mut flights) in by_resource.into_iter() {
            flights.sort_by_key(|f| f.start_time);
            debug_assert!(
                flights.windows(2).all(|fs| fs[0].end_time <= fs[1].start_time),
                "Overlapping active flights for {} on {}",
                resource,
                date
            );
        }
    }
}
