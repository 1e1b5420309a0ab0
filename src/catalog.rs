use crate::aircraft::{Aircraft, AircraftStatus, Registration};
use crate::error::{Error, Result};
use crate::instructor::{Instructor, InstructorId, InstructorName};
use std::collections::HashMap;

/// Aircraft and instructors available to the booking engine, indexed by
/// their keys.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    aircraft: Vec<Aircraft>,
    instructors: Vec<Instructor>,
    aircraft_index: HashMap<Registration, usize>,
    instructor_ids: HashMap<InstructorId, usize>,
    instructor_names: HashMap<InstructorName, usize>,
}

impl Catalog {
    pub fn new(aircraft: Vec<Aircraft>, instructors: Vec<Instructor>) -> Result<Catalog> {
        let mut aircraft_index = HashMap::new();
        for (i, ac) in aircraft.iter().enumerate() {
            if aircraft_index.insert(ac.registration.clone(), i).is_some() {
                return Err(Error::Catalog(format!(
                    "duplicate aircraft registration {}",
                    ac.registration
                )));
            }
        }

        let mut instructor_ids = HashMap::new();
        let mut instructor_names = HashMap::new();
        for (i, instructor) in instructors.iter().enumerate() {
            if instructor.certifications.is_empty() {
                return Err(Error::Catalog(format!(
                    "instructor {} has no certifications",
                    instructor.name
                )));
            }
            if instructor_ids.insert(instructor.id.clone(), i).is_some() {
                return Err(Error::Catalog(format!("duplicate instructor id {}", instructor.id)));
            }
            if instructor_names.insert(instructor.name.clone(), i).is_some() {
                return Err(Error::Catalog(format!(
                    "duplicate instructor name {}",
                    instructor.name
                )));
            }
        }

        log::debug!(
            "catalog loaded with {} aircraft and {} instructors",
            aircraft.len(),
            instructors.len()
        );

        Ok(Catalog {
            aircraft,
            instructors,
            aircraft_index,
            instructor_ids,
            instructor_names,
        })
    }

    pub fn aircraft(&self) -> &[Aircraft] {
        &self.aircraft
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    pub fn aircraft_by_registration(&self, registration: &str) -> Option<&Aircraft> {
        self.aircraft_index
            .get(registration)
            .map(|i| &self.aircraft[*i])
    }

    pub fn instructor_by_id(&self, id: &str) -> Option<&Instructor> {
        self.instructor_ids.get(id).map(|i| &self.instructors[*i])
    }

    pub fn instructor_by_name(&self, name: &str) -> Option<&Instructor> {
        self.instructor_names.get(name).map(|i| &self.instructors[*i])
    }

    /// Looks an instructor up by id first, then by name.
    pub fn find_instructor(&self, key: &str) -> Option<&Instructor> {
        self.instructor_by_id(key)
            .or_else(|| self.instructor_by_name(key))
    }

    pub fn set_aircraft_status(&mut self, registration: &str, status: AircraftStatus) -> Result<()> {
        let idx = *self
            .aircraft_index
            .get(registration)
            .ok_or_else(|| Error::UnknownAircraft(registration.to_string()))?;
        log::info!("aircraft {} is now {}", registration, status);
        self.aircraft[idx].status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructor::Authorization;
    use std::sync::Arc;

    fn aircraft(reg: &str) -> Aircraft {
        Aircraft {
            id: Arc::from(reg),
            name: "Skyhawk".to_string(),
            kind: "Cessna 172P".to_string(),
            registration: Arc::from(reg),
            status: AircraftStatus::Available,
            hobbs_time: None,
        }
    }

    fn instructor(id: &str, name: &str, certifications: &[&str]) -> Instructor {
        Instructor {
            id: Arc::from(id),
            name: Arc::from(name),
            certifications: certifications.iter().map(|c| c.to_string()).collect(),
            available: true,
            phone: None,
            email: None,
            training_capabilities: vec![],
            authorized_aircraft: Authorization::Unrestricted,
        }
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::new(
            vec![aircraft("N172PA"), aircraft("N51204")],
            vec![instructor("1", "Jane", &["CFI"]), instructor("2", "Ciara Hoyt", &["CFII"])],
        )
        .unwrap();

        assert_eq!("N51204", &*catalog.aircraft_by_registration("N51204").unwrap().registration);
        assert!(catalog.aircraft_by_registration("N0000").is_none());
        assert_eq!("Ciara Hoyt", &*catalog.instructor_by_id("2").unwrap().name);
        assert_eq!("1", &*catalog.instructor_by_name("Jane").unwrap().id);
        assert_eq!("2", &*catalog.find_instructor("Ciara Hoyt").unwrap().id);
        assert_eq!("1", &*catalog.find_instructor("1").unwrap().id);
    }

    #[test]
    fn test_rejects_duplicates_and_uncertified() {
        assert!(Catalog::new(vec![aircraft("N1"), aircraft("N1")], vec![]).is_err());
        assert!(Catalog::new(vec![], vec![instructor("1", "A", &["CFI"]), instructor("1", "B", &["CFI"])]).is_err());
        assert!(Catalog::new(vec![], vec![instructor("1", "A", &["CFI"]), instructor("2", "A", &["CFI"])]).is_err());
        assert!(Catalog::new(vec![], vec![instructor("1", "A", &[])]).is_err());
    }

    #[test]
    fn test_status_mutation() {
        let mut catalog = Catalog::new(vec![aircraft("N172PA")], vec![]).unwrap();
        catalog.set_aircraft_status("N172PA", AircraftStatus::Maintenance).unwrap();
        assert!(!catalog.aircraft_by_registration("N172PA").unwrap().is_bookable());
        assert!(catalog.set_aircraft_status("N0000", AircraftStatus::Available).is_err());
    }
}
