use crate::aircraft::{AircraftStatus, Registration};
use crate::availability::{AvailabilityIndex, Resource};
use crate::catalog::Catalog;
use crate::flight::{Flight, FlightCategory, FlightId, FlightType};
use crate::instructor::InstructorName;
use crate::time::{Time, TimeRange};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A flight someone wants to book, before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub start_time: Time,
    pub end_time: Time,
    pub aircraft: Registration,
    pub instructor: InstructorName,
    pub student: String,
    #[serde(rename = "type")]
    pub kind: FlightType,
    #[serde(default)]
    pub flight_category: Option<FlightCategory>,
}

impl BookingRequest {
    /// End time for a booking of `hours` starting at `start`, rounded to the
    /// minute.
    pub fn end_after(start: Time, hours: f64) -> Result<Time, Rejection> {
        let invalid = Rejection::InvalidInterval {
            start,
            end: start,
        };
        let minutes = hours * 60.0;
        if !minutes.is_finite() || minutes <= 0.0 || minutes > Time::END_OF_DAY.0 as f64 {
            return Err(invalid);
        }
        start.checked_add(minutes.round() as u32).ok_or(invalid)
    }

    pub fn range(&self) -> Result<TimeRange, Rejection> {
        if self.start_time >= self.end_time || self.end_time > Time::END_OF_DAY {
            return Err(Rejection::InvalidInterval {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(TimeRange {
            start: self.start_time,
            end: self.end_time,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("start {start} is not before end {end} on the same day")]
    InvalidInterval { start: Time, end: Time },

    #[error("aircraft {0} is not in the catalog")]
    UnknownAircraft(Registration),

    #[error("instructor {0} is not in the catalog")]
    UnknownInstructor(InstructorName),

    #[error("aircraft {registration} is {status}")]
    AircraftNotBookable {
        registration: Registration,
        status: AircraftStatus,
    },

    #[error("instructor {0} is not taking bookings")]
    InstructorUnavailable(InstructorName),

    #[error("instructor {instructor} is not authorized to fly {aircraft}")]
    NotAuthorized {
        instructor: InstructorName,
        aircraft: Registration,
    },

    #[error("aircraft {registration} is already booked by flight {flight} ({range})")]
    AircraftConflict {
        registration: Registration,
        flight: FlightId,
        range: TimeRange,
    },

    #[error("instructor {instructor} is already booked by flight {flight} ({range})")]
    InstructorConflict {
        instructor: InstructorName,
        flight: FlightId,
        range: TimeRange,
    },
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::InvalidInterval { .. } => "invalid-interval",
            Rejection::UnknownAircraft(_) => "unknown-aircraft",
            Rejection::UnknownInstructor(_) => "unknown-instructor",
            Rejection::AircraftNotBookable { .. } => "aircraft-not-bookable",
            Rejection::InstructorUnavailable(_) => "instructor-unavailable",
            Rejection::NotAuthorized { .. } => "not-authorized",
            Rejection::AircraftConflict { .. } => "aircraft-conflict",
            Rejection::InstructorConflict { .. } => "instructor-conflict",
        }
    }

    /// Conflicts can be resolved by picking another slot or resource; every
    /// other rejection is an input error.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Rejection::AircraftConflict { .. } | Rejection::InstructorConflict { .. }
        )
    }
}

pub fn validate(request: &BookingRequest, catalog: &Catalog, flights: &[Flight]) -> Result<(), Rejection> {
    validate_excluding(request, catalog, flights, None)
}

/// Like [`validate`], ignoring the flight with id `exclude` so an existing
/// booking can be checked against everything but itself.
pub fn validate_excluding(
    request: &BookingRequest,
    catalog: &Catalog,
    flights: &[Flight],
    exclude: Option<&str>,
) -> Result<(), Rejection> {
    let range = request.range()?;

    let aircraft = catalog
        .aircraft_by_registration(&request.aircraft)
        .ok_or_else(|| Rejection::UnknownAircraft(request.aircraft.clone()))?;
    let instructor = catalog
        .instructor_by_name(&request.instructor)
        .ok_or_else(|| Rejection::UnknownInstructor(request.instructor.clone()))?;

    if !aircraft.is_bookable() {
        return Err(Rejection::AircraftNotBookable {
            registration: aircraft.registration.clone(),
            status: aircraft.status,
        });
    }
    if !instructor.available {
        return Err(Rejection::InstructorUnavailable(instructor.name.clone()));
    }
    if !instructor.authorized_aircraft.permits(&aircraft.registration) {
        return Err(Rejection::NotAuthorized {
            instructor: instructor.name.clone(),
            aircraft: aircraft.registration.clone(),
        });
    }

    let index = AvailabilityIndex::new(request.date, flights);
    let first_conflict = |resource: &Resource| {
        index
            .conflicts(resource, &range)
            .into_iter()
            .find(|f| exclude.map_or(true, |id| *f.id != *id))
    };

    if let Some(flight) = first_conflict(&Resource::Aircraft(aircraft.registration.clone())) {
        return Err(Rejection::AircraftConflict {
            registration: aircraft.registration.clone(),
            flight: flight.id.clone(),
            range: flight.range(),
        });
    }
    if let Some(flight) = first_conflict(&Resource::Instructor(instructor.name.clone())) {
        return Err(Rejection::InstructorConflict {
            instructor: instructor.name.clone(),
            flight: flight.id.clone(),
            range: flight.range(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::Aircraft;
    use crate::flight::FlightStatus;
    use crate::instructor::{Authorization, Instructor};
    use std::sync::Arc;

    fn id(s: &str) -> Arc<str> {
        Arc::from(s)
    }

    fn t(s: &str) -> Time {
        s.parse().unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn catalog() -> Catalog {
        let aircraft = |reg: &str, status: AircraftStatus| Aircraft {
            id: id(reg),
            name: "Skyhawk".to_string(),
            kind: "Cessna 172".to_string(),
            registration: id(reg),
            status,
            hobbs_time: None,
        };
        let instructor = |i: &str, name: &str, available: bool, auth: Authorization| Instructor {
            id: id(i),
            name: id(name),
            certifications: vec!["CFI".to_string()],
            available,
            phone: None,
            email: None,
            training_capabilities: vec![],
            authorized_aircraft: auth,
        };
        Catalog::new(
            vec![
                aircraft("N172PA", AircraftStatus::Available),
                aircraft("N51204", AircraftStatus::Available),
                aircraft("N6605F", AircraftStatus::Maintenance),
            ],
            vec![
                instructor("1", "Jane", true, Authorization::restricted_to(["N172PA", "N6605F"])),
                instructor("2", "Rocco", true, Authorization::Unrestricted),
                instructor("3", "Jason", false, Authorization::Unrestricted),
            ],
        )
        .unwrap()
    }

    fn request(date: NaiveDate, start: &str, end: &str, aircraft: &str, instructor: &str) -> BookingRequest {
        BookingRequest {
            date,
            start_time: t(start),
            end_time: t(end),
            aircraft: id(aircraft),
            instructor: id(instructor),
            student: "You".to_string(),
            kind: FlightType::Dual,
            flight_category: None,
        }
    }

    fn existing(fid: &str, start: &str, end: &str, aircraft: &str, instructor: &str) -> Flight {
        Flight {
            id: id(fid),
            date: day(10),
            start_time: t(start),
            end_time: t(end),
            aircraft: id(aircraft),
            instructor: id(instructor),
            student: "Alex".to_string(),
            kind: FlightType::Dual,
            status: FlightStatus::Scheduled,
            hobbs_time: None,
            cancel_reason: None,
            cancel_comments: None,
            flight_category: None,
        }
    }

    #[test]
    fn test_rejects_overlap_accepts_disjoint() {
        let catalog = catalog();
        let flights = vec![existing("F1", "09:00", "11:00", "N172PA", "Jane")];

        let same = request(day(10), "09:00", "11:00", "N172PA", "Rocco");
        assert_eq!(
            Err(Rejection::AircraftConflict {
                registration: id("N172PA"),
                flight: id("F1"),
                range: TimeRange::new(t("09:00"), t("11:00")).unwrap(),
            }),
            validate(&same, &catalog, &flights)
        );

        let partial = request(day(10), "10:30", "12:00", "N172PA", "Rocco");
        assert_eq!("aircraft-conflict", validate(&partial, &catalog, &flights).unwrap_err().code());

        assert_eq!(Ok(()), validate(&request(day(10), "11:00", "13:00", "N172PA", "Rocco"), &catalog, &flights));
        assert_eq!(Ok(()), validate(&request(day(10), "07:00", "09:00", "N172PA", "Rocco"), &catalog, &flights));
        assert_eq!(Ok(()), validate(&request(day(11), "09:00", "11:00", "N172PA", "Jane"), &catalog, &flights));
    }

    #[test]
    fn test_instructor_conflict() {
        let catalog = catalog();
        let flights = vec![existing("F1", "09:00", "11:00", "N51204", "Jane")];
        let rejection = validate(&request(day(10), "10:00", "11:00", "N172PA", "Jane"), &catalog, &flights).unwrap_err();
        assert_eq!("instructor-conflict", rejection.code());
        assert!(rejection.is_conflict());
    }

    #[test]
    fn test_cancelled_flight_does_not_block() {
        let catalog = catalog();
        let mut flight = existing("F1", "09:00", "11:00", "N172PA", "Jane");
        flight.status = FlightStatus::Cancelled;
        assert_eq!(Ok(()), validate(&request(day(10), "09:00", "11:00", "N172PA", "Jane"), &catalog, &[flight]));
    }

    #[test]
    fn test_input_errors() {
        let catalog = catalog();
        let codes = [
            (request(day(10), "11:00", "11:00", "N172PA", "Jane"), "invalid-interval"),
            (request(day(10), "12:00", "11:00", "N172PA", "Jane"), "invalid-interval"),
            (request(day(10), "09:00", "11:00", "N0000", "Jane"), "unknown-aircraft"),
            (request(day(10), "09:00", "11:00", "N172PA", "Nobody"), "unknown-instructor"),
            (request(day(10), "09:00", "11:00", "N6605F", "Jane"), "aircraft-not-bookable"),
            (request(day(10), "09:00", "11:00", "N172PA", "Jason"), "instructor-unavailable"),
            (request(day(10), "09:00", "11:00", "N51204", "Jane"), "not-authorized"),
        ];
        for (req, code) in codes {
            let rejection = validate(&req, &catalog, &[]).unwrap_err();
            assert_eq!(code, rejection.code(), "{}", rejection);
            assert!(!rejection.is_conflict());
        }
    }

    #[test]
    fn test_excluding_self() {
        let catalog = catalog();
        let flights = vec![existing("F1", "09:00", "11:00", "N172PA", "Jane")];
        let moved = request(day(10), "10:00", "12:00", "N172PA", "Jane");
        assert!(validate(&moved, &catalog, &flights).is_err());
        assert_eq!(Ok(()), validate_excluding(&moved, &catalog, &flights, Some("F1")));
        assert!(validate_excluding(&moved, &catalog, &flights, Some("F2")).is_err());
    }

    #[test]
    fn test_end_after_hours() {
        assert_eq!(Ok(t("11:00")), BookingRequest::end_after(t("09:00"), 2.0));
        assert_eq!(Ok(t("10:30")), BookingRequest::end_after(t("09:00"), 1.5));
        assert!(BookingRequest::end_after(t("09:00"), 0.0).is_err());
        assert!(BookingRequest::end_after(t("09:00"), f64::NAN).is_err());
        assert!(BookingRequest::end_after(t("09:00"), f64::INFINITY).is_err());
        assert_eq!("invalid-interval", BookingRequest::end_after(t("09:00"), 1e12).unwrap_err().code());
        assert!(BookingRequest::end_after(t("09:00"), 24.5).is_err());
        assert_eq!(Ok(Time::END_OF_DAY), BookingRequest::end_after(t("23:00"), 1.0));
        assert_eq!("invalid-interval", BookingRequest::end_after(t("23:00"), 2.0).unwrap_err().code());
        let late = BookingRequest {
            end_time: Time(Time::END_OF_DAY.0 + 30),
            ..request(day(10), "23:00", "23:30", "N172PA", "Jane")
        };
        assert_eq!("invalid-interval", late.range().unwrap_err().code());
    }
}
