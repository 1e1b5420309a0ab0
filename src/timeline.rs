use crate::authorization::SelectionFilter;
use crate::availability::{AvailabilityIndex, Resource};
use crate::catalog::Catalog;
use crate::flight::Flight;
use crate::grid::TimeGrid;
use crate::time::{Time, TimeRange};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Two-press range picker over grid slots.
///
/// The first press marks a pending one-slot range; the second press closes
/// the range over both slots regardless of the order they were pressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeSelection {
    #[default]
    Idle,
    Pending {
        start: Time,
    },
    Selected(TimeRange),
}

impl RangeSelection {
    pub fn press(self, slot: Time, step: u32) -> RangeSelection {
        match self {
            RangeSelection::Pending { start } => {
                let (first, last) = if start <= slot { (start, slot) } else { (slot, start) };
                RangeSelection::Selected(TimeRange {
                    start: first,
                    end: last + step,
                })
            }
            RangeSelection::Idle | RangeSelection::Selected(_) => RangeSelection::Pending { start: slot },
        }
    }

    /// The range currently shown as selected, if any.
    pub fn highlighted(&self, step: u32) -> Option<TimeRange> {
        match self {
            RangeSelection::Idle => None,
            RangeSelection::Pending { start } => Some(TimeRange {
                start: *start,
                end: *start + step,
            }),
            RangeSelection::Selected(range) => Some(*range),
        }
    }

    pub fn contains(&self, slot: Time, step: u32) -> bool {
        self.highlighted(step).is_some_and(|r| r.contains(slot))
    }

    /// The completed range, once both presses happened.
    pub fn selected(&self) -> Option<TimeRange> {
        match self {
            RangeSelection::Selected(range) => Some(*range),
            _ => None,
        }
    }
}

pub fn is_slot_in_past(date: NaiveDate, slot: Time, now: NaiveDateTime) -> bool {
    date.and_time(NaiveTime::MIN) + Duration::minutes(slot.0 as i64) < now
}

#[derive(Debug)]
pub struct SlotSummary<'a> {
    pub slot: Time,
    pub flights: Vec<&'a Flight>,
    pub free_aircraft: usize,
    pub free_instructors: usize,
}

/// One day of the combined timeline.
pub struct Timeline<'a> {
    grid: TimeGrid,
    catalog: &'a Catalog,
    index: AvailabilityIndex<'a>,
}

impl<'a> Timeline<'a> {
    pub fn new(grid: TimeGrid, catalog: &'a Catalog, flights: &'a [Flight], date: NaiveDate) -> Timeline<'a> {
        Timeline {
            grid,
            catalog,
            index: AvailabilityIndex::new(date, flights),
        }
    }

    pub fn index(&self) -> &AvailabilityIndex<'a> {
        &self.index
    }

    /// Per grid slot: flights in progress and how many of the considered
    /// resources are free at that instant. An empty side of the filter
    /// considers the whole catalog for that side.
    pub fn summary(&self, filter: &SelectionFilter) -> Vec<SlotSummary<'a>> {
        let aircraft = if filter.aircraft.is_empty() {
            self.catalog
                .aircraft()
                .iter()
                .map(|ac| Resource::Aircraft(ac.registration.clone()))
                .collect::<Vec<_>>()
        } else {
            filter
                .aircraft
                .iter()
                .filter_map(|reg| self.catalog.aircraft_by_registration(reg))
                .map(|ac| Resource::Aircraft(ac.registration.clone()))
                .collect()
        };
        let instructors = if filter.instructors.is_empty() {
            self.catalog
                .instructors()
                .iter()
                .map(|i| Resource::Instructor(i.name.clone()))
                .collect::<Vec<_>>()
        } else {
            filter
                .instructors
                .iter()
                .filter_map(|id| self.catalog.instructor_by_id(id))
                .map(|i| Resource::Instructor(i.name.clone()))
                .collect()
        };

        self.grid
            .slots()
            .map(|slot| SlotSummary {
                slot,
                flights: self.index.flights_at(slot),
                free_aircraft: aircraft
                    .iter()
                    .filter(|r| self.index.is_free_at(r, slot))
                    .count(),
                free_instructors: instructors
                    .iter()
                    .filter(|r| self.index.is_free_at(r, slot))
                    .count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::{Aircraft, AircraftStatus};
    use crate::flight::{FlightStatus, FlightType};
    use crate::instructor::{Authorization, Instructor};
    use std::sync::Arc;

    fn t(s: &str) -> Time {
        s.parse().unwrap()
    }

    fn id(s: &str) -> Arc<str> {
        Arc::from(s)
    }

    #[test]
    fn test_two_press_range() {
        let selection = RangeSelection::default().press(t("10:00"), 30);
        assert_eq!(RangeSelection::Pending { start: t("10:00") }, selection);
        assert!(selection.contains(t("10:00"), 30));
        assert!(!selection.contains(t("10:30"), 30));
        assert_eq!(None, selection.selected());

        let selection = selection.press(t("11:30"), 30);
        assert_eq!(Some(TimeRange::new(t("10:00"), t("12:00")).unwrap()), selection.selected());

        // reversed presses give the same range
        let reversed = RangeSelection::Idle.press(t("11:30"), 30).press(t("10:00"), 30);
        assert_eq!(selection, reversed);

        // a third press starts over
        assert_eq!(RangeSelection::Pending { start: t("08:00") }, selection.press(t("08:00"), 30));
    }

    #[test]
    fn test_same_slot_twice_selects_one_step() {
        let selection = RangeSelection::Idle.press(t("09:00"), 30).press(t("09:00"), 30);
        assert_eq!(Some(TimeRange::new(t("09:00"), t("09:30")).unwrap()), selection.selected());
    }

    #[test]
    fn test_past_slots() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let now = date.and_hms_opt(12, 15, 0).unwrap();
        assert!(is_slot_in_past(date, t("12:00"), now));
        assert!(!is_slot_in_past(date, t("12:30"), now));
        assert!(!is_slot_in_past(date.succ_opt().unwrap(), t("06:00"), now));
        assert!(is_slot_in_past(date.pred_opt().unwrap(), t("21:30"), now));
    }

    #[test]
    fn test_summary_counts() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let aircraft = ["N172PA", "N51204"]
            .iter()
            .map(|reg| Aircraft {
                id: id(reg),
                name: "Skyhawk".to_string(),
                kind: "Cessna 172".to_string(),
                registration: id(reg),
                status: AircraftStatus::Available,
                hobbs_time: None,
            })
            .collect();
        let instructors = vec![Instructor {
            id: id("1"),
            name: id("Jane"),
            certifications: vec!["CFI".to_string()],
            available: true,
            phone: None,
            email: None,
            training_capabilities: vec![],
            authorized_aircraft: Authorization::Unrestricted,
        }];
        let catalog = Catalog::new(aircraft, instructors).unwrap();
        let flights = vec![Flight {
            id: id("F1"),
            date,
            start_time: t("09:00"),
            end_time: t("10:00"),
            aircraft: id("N172PA"),
            instructor: id("Jane"),
            student: "Alex".to_string(),
            kind: FlightType::Dual,
            status: FlightStatus::Scheduled,
            hobbs_time: None,
            cancel_reason: None,
            cancel_comments: None,
            flight_category: None,
        }];

        let timeline = Timeline::new(TimeGrid::default(), &catalog, &flights, date);
        let summary = timeline.summary(&SelectionFilter::default());
        assert_eq!(32, summary.len());

        let at_nine = summary.iter().find(|s| s.slot == t("09:00")).unwrap();
        assert_eq!(1, at_nine.flights.len());
        assert_eq!(1, at_nine.free_aircraft);
        assert_eq!(0, at_nine.free_instructors);

        let at_ten = summary.iter().find(|s| s.slot == t("10:00")).unwrap();
        assert!(at_ten.flights.is_empty());
        assert_eq!(2, at_ten.free_aircraft);

        let filtered = timeline.summary(&SelectionFilter::new(vec![id("N51204")], vec![]));
        let at_nine = filtered.iter().find(|s| s.slot == t("09:00")).unwrap();
        assert_eq!(1, at_nine.free_aircraft);
        assert_eq!(0, at_nine.free_instructors);

        // registrations missing from the catalog are not counted as free
        let unknown = timeline.summary(&SelectionFilter::new(vec![id("N51204"), id("N0000")], vec![id("99")]));
        let at_ten = unknown.iter().find(|s| s.slot == t("10:00")).unwrap();
        assert_eq!(1, at_ten.free_aircraft);
        assert_eq!(0, at_ten.free_instructors);
    }
}
