use crate::aircraft::{Aircraft, Registration};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::instructor::{Instructor, InstructorId};
use std::fmt;

/// Instructors whose authorization shares at least one aircraft with the
/// selection.
pub fn instructors_for_aircraft<'a>(
    instructors: &'a [Instructor],
    selected: &[Registration],
) -> Vec<&'a Instructor> {
    instructors
        .iter()
        .filter(|i| i.authorized_aircraft.permits_any(selected))
        .collect()
}

/// Aircraft that at least one of the selected instructors may fly. Ids not
/// in the catalog contribute nothing.
pub fn aircraft_for_instructors<'a>(catalog: &'a Catalog, selected: &[InstructorId]) -> Vec<&'a Aircraft> {
    let instructors = selected
        .iter()
        .filter_map(|id| catalog.instructor_by_id(id))
        .collect::<Vec<&Instructor>>();
    catalog
        .aircraft()
        .iter()
        .filter(|ac| {
            instructors
                .iter()
                .any(|i| i.authorized_aircraft.permits(&ac.registration))
        })
        .collect()
}

/// The aircraft and instructors chosen for one filtering interaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionFilter {
    pub aircraft: Vec<Registration>,
    pub instructors: Vec<InstructorId>,
}

impl SelectionFilter {
    pub fn new(aircraft: Vec<Registration>, instructors: Vec<InstructorId>) -> SelectionFilter {
        SelectionFilter {
            aircraft,
            instructors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty() && self.instructors.is_empty()
    }

    fn toggle_aircraft(&mut self, registration: &Registration) {
        toggle(&mut self.aircraft, registration);
    }

    fn toggle_instructor(&mut self, id: &InstructorId) {
        toggle(&mut self.instructors, id);
    }

    fn primary_is_empty(&self, mode: FilterMode) -> bool {
        match mode {
            FilterMode::AircraftFirst => self.aircraft.is_empty(),
            FilterMode::InstructorFirst => self.instructors.is_empty(),
        }
    }

    fn without_secondary(&self, mode: FilterMode) -> SelectionFilter {
        match mode {
            FilterMode::AircraftFirst => SelectionFilter::new(self.aircraft.clone(), vec![]),
            FilterMode::InstructorFirst => SelectionFilter::new(vec![], self.instructors.clone()),
        }
    }
}

fn toggle<T: PartialEq + Clone>(items: &mut Vec<T>, item: &T) {
    if let Some(pos) = items.iter().position(|x| x == item) {
        items.remove(pos);
    } else {
        items.push(item.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    AircraftFirst,
    InstructorFirst,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::AircraftFirst => write!(f, "aircraft-first"),
            FilterMode::InstructorFirst => write!(f, "instructor-first"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    ChooseMode(FilterMode),
    ToggleAircraft(Registration),
    ToggleInstructor(InstructorId),
    Confirm,
    Back,
    Apply,
    Cancel,
}

impl fmt::Display for FilterEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterEvent::ChooseMode(mode) => write!(f, "choosing {}", mode),
            FilterEvent::ToggleAircraft(reg) => write!(f, "toggling aircraft {}", reg),
            FilterEvent::ToggleInstructor(id) => write!(f, "toggling instructor {}", id),
            FilterEvent::Confirm => write!(f, "confirm"),
            FilterEvent::Back => write!(f, "back"),
            FilterEvent::Apply => write!(f, "apply"),
            FilterEvent::Cancel => write!(f, "cancel"),
        }
    }
}

/// A filtering session as an immutable value.
///
/// `SelectMode -> SelectPrimary -> SelectSecondary -> Applied`, with
/// `Cancel` reachable from every non-terminal state. [`FilterSession::next`]
/// computes the successor and never mutates the current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterSession {
    #[default]
    SelectMode,
    SelectPrimary {
        mode: FilterMode,
        selection: SelectionFilter,
    },
    SelectSecondary {
        mode: FilterMode,
        selection: SelectionFilter,
    },
    Applied(SelectionFilter),
    Cancelled,
}

/// What may be picked in the current step.
#[derive(Debug, PartialEq)]
pub enum Candidates<'a> {
    Nothing,
    Aircraft(Vec<&'a Aircraft>),
    Instructors(Vec<&'a Instructor>),
}

impl FilterSession {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FilterSession::Applied(_) | FilterSession::Cancelled)
    }

    pub fn selection(&self) -> Option<&SelectionFilter> {
        match self {
            FilterSession::SelectPrimary { selection, .. }
            | FilterSession::SelectSecondary { selection, .. }
            | FilterSession::Applied(selection) => Some(selection),
            FilterSession::SelectMode | FilterSession::Cancelled => None,
        }
    }

    /// The committed filter, if the session ended with `Apply`.
    pub fn applied(&self) -> Option<&SelectionFilter> {
        match self {
            FilterSession::Applied(selection) => Some(selection),
            _ => None,
        }
    }

    pub fn next(&self, event: &FilterEvent, catalog: &Catalog) -> Result<FilterSession> {
        use FilterEvent::*;
        use FilterMode::*;
        use FilterSession::*;

        let next = match (self, event) {
            (Applied(_) | Cancelled, _) => return Err(self.rejects(event)),
            (_, Cancel) => Cancelled,
            (SelectMode | SelectPrimary { .. }, ChooseMode(mode)) => SelectPrimary {
                mode: *mode,
                selection: SelectionFilter::default(),
            },
            (
                SelectPrimary {
                    mode: AircraftFirst,
                    selection,
                },
                ToggleAircraft(reg),
            ) => {
                if catalog.aircraft_by_registration(reg).is_none() {
                    return Err(Error::UnknownAircraft(reg.to_string()));
                }
                let mut selection = selection.clone();
                selection.toggle_aircraft(reg);
                SelectPrimary {
                    mode: AircraftFirst,
                    selection,
                }
            }
            (
                SelectPrimary {
                    mode: InstructorFirst,
                    selection,
                },
                ToggleInstructor(id),
            ) => {
                if catalog.instructor_by_id(id).is_none() {
                    return Err(Error::UnknownInstructor(id.to_string()));
                }
                let mut selection = selection.clone();
                selection.toggle_instructor(id);
                SelectPrimary {
                    mode: InstructorFirst,
                    selection,
                }
            }
            (SelectPrimary { mode, selection }, Confirm) => {
                if selection.primary_is_empty(*mode) {
                    return Err(self.rejects(event));
                }
                SelectSecondary {
                    mode: *mode,
                    selection: selection.clone(),
                }
            }
            (
                SelectSecondary {
                    mode: AircraftFirst,
                    selection,
                },
                ToggleInstructor(id),
            ) => {
                let offered = instructors_for_aircraft(catalog.instructors(), &selection.aircraft)
                    .iter()
                    .any(|i| i.id == *id);
                if !offered {
                    return Err(self.rejects(event));
                }
                let mut selection = selection.clone();
                selection.toggle_instructor(id);
                SelectSecondary {
                    mode: AircraftFirst,
                    selection,
                }
            }
            (
                SelectSecondary {
                    mode: InstructorFirst,
                    selection,
                },
                ToggleAircraft(reg),
            ) => {
                let offered = aircraft_for_instructors(catalog, &selection.instructors)
                    .iter()
                    .any(|ac| ac.registration == *reg);
                if !offered {
                    return Err(self.rejects(event));
                }
                let mut selection = selection.clone();
                selection.toggle_aircraft(reg);
                SelectSecondary {
                    mode: InstructorFirst,
                    selection,
                }
            }
            (SelectSecondary { mode, selection }, Back) => SelectPrimary {
                mode: *mode,
                selection: selection.without_secondary(*mode),
            },
            (SelectSecondary { selection, .. }, Apply) => Applied(selection.clone()),
            _ => return Err(self.rejects(event)),
        };

        log::debug!("filter session: {} -> {} on {}", self, next, event);
        Ok(next)
    }

    pub fn candidates<'a>(&self, catalog: &'a Catalog) -> Candidates<'a> {
        match self {
            FilterSession::SelectPrimary {
                mode: FilterMode::AircraftFirst,
                ..
            } => Candidates::Aircraft(catalog.aircraft().iter().collect()),
            FilterSession::SelectPrimary {
                mode: FilterMode::InstructorFirst,
                ..
            } => Candidates::Instructors(catalog.instructors().iter().collect()),
            FilterSession::SelectSecondary {
                mode: FilterMode::AircraftFirst,
                selection,
            } => Candidates::Instructors(instructors_for_aircraft(
                catalog.instructors(),
                &selection.aircraft,
            )),
            FilterSession::SelectSecondary {
                mode: FilterMode::InstructorFirst,
                selection,
            } => Candidates::Aircraft(aircraft_for_instructors(catalog, &selection.instructors)),
            _ => Candidates::Nothing,
        }
    }

    fn rejects(&self, event: &FilterEvent) -> Error {
        Error::InvalidTransition {
            state: self.to_string(),
            event: event.to_string(),
        }
    }
}

impl fmt::Display for FilterSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSession::SelectMode => write!(f, "selecting mode"),
            FilterSession::SelectPrimary { mode, .. } => write!(f, "selecting primary ({})", mode),
            FilterSession::SelectSecondary { mode, .. } => {
                write!(f, "selecting secondary ({})", mode)
            }
            FilterSession::Applied(_) => write!(f, "applied"),
            FilterSession::Cancelled => write!(f, "cancelled"),
        }
    }
}
