use crate::aircraft::{Aircraft, AircraftStatus};
use crate::booking::BookingRequest;
use crate::catalog::Catalog;
use crate::flight::{Flight, FlightStatus, FlightType};
use crate::instructor::{Authorization, Instructor};
use crate::schedule::schedule::Schedule;
use crate::time::Time;
use chrono::NaiveDate;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn t(s: &str) -> Time {
    s.parse().unwrap()
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

pub fn add_aircraft(aircraft: &mut Vec<Aircraft>, registration: &str, status: AircraftStatus) {
    aircraft.push(Aircraft {
        id: id(registration),
        name: "Skyhawk".to_string(),
        kind: "Cessna 172P".to_string(),
        registration: id(registration),
        status,
        hobbs_time: None,
    });
}

pub fn add_instructor(instructors: &mut Vec<Instructor>, instructor_id: &str, name: &str, authorized: Authorization) {
    instructors.push(Instructor {
        id: id(instructor_id),
        name: id(name),
        certifications: vec!["CFI".to_string()],
        available: true,
        phone: None,
        email: None,
        training_capabilities: vec![],
        authorized_aircraft: authorized,
    });
}

pub fn add_flight(
    flights: &mut Vec<Flight>,
    flight_id: &str,
    date: NaiveDate,
    start: &str,
    end: &str,
    aircraft: &str,
    instructor: &str,
    status: FlightStatus,
) {
    flights.push(Flight {
        id: id(flight_id),
        date,
        start_time: t(start),
        end_time: t(end),
        aircraft: id(aircraft),
        instructor: id(instructor),
        student: "Alex".to_string(),
        kind: FlightType::Dual,
        status,
        hobbs_time: None,
        cancel_reason: None,
        cancel_comments: None,
        flight_category: None,
    });
}

pub fn request(date: NaiveDate, start: &str, end: &str, aircraft: &str, instructor: &str) -> BookingRequest {
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

/// Three aircraft and three instructors; Jane may only fly N172PA.
pub fn fleet() -> Catalog {
    let mut aircraft = Vec::new();
    let mut instructors = Vec::new();
    add_aircraft(&mut aircraft, "N172PA", AircraftStatus::Available);
    add_aircraft(&mut aircraft, "N51204", AircraftStatus::Available);
    add_aircraft(&mut aircraft, "N6605F", AircraftStatus::Available);
    add_instructor(&mut instructors, "1", "Jane", Authorization::restricted_to(["N172PA"]));
    add_instructor(&mut instructors, "2", "Rocco", Authorization::Unrestricted);
    add_instructor(&mut instructors, "3", "Justin", Authorization::Unrestricted);
    Catalog::new(aircraft, instructors).unwrap()
}

pub fn schedule_with(flights: Vec<Flight>) -> Schedule {
    Schedule::new(fleet(), flights).unwrap()
}

pub fn arb_registration() -> impl Strategy<Value = Arc<str>> {
    prop_oneof![
        Just(Arc::from("N172PA")),
        Just(Arc::from("N51204")),
        Just(Arc::from("N6605F")),
    ]
}

pub fn arb_instructor() -> impl Strategy<Value = Arc<str>> {
    prop_oneof![
        Just(Arc::from("Jane")),
        Just(Arc::from("Rocco")),
        Just(Arc::from("Justin")),
    ]
}

pub fn arb_request() -> impl Strategy<Value = BookingRequest> {
    (
        arb_registration(),
        arb_instructor(),
        1..3u32,
        0..32u32,
        1..9u32,
    )
        .prop_map(|(aircraft, instructor, d, slot, halves)| {
            let start = Time(6 * 60 + slot * 30);
            BookingRequest {
                date: day(d),
                start_time: start,
                end_time: start + halves * 30,
                aircraft,
                instructor,
                student: "Prop".to_string(),
                kind: FlightType::Dual,
                flight_category: None,
            }
        })
}
