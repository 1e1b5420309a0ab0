use crate::aircraft::Registration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

pub type InstructorId = Arc<str>;
/// Instructor name; the canonical key of an instructor in flight records.
pub type InstructorName = Arc<str>;

/// Aircraft an instructor may fly.
///
/// In scenario files an absent or `null` list means [`Authorization::Unrestricted`];
/// any list, including an empty one, is [`Authorization::RestrictedTo`] that set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    from = "Option<BTreeSet<Registration>>",
    into = "Option<BTreeSet<Registration>>"
)]
pub enum Authorization {
    #[default]
    Unrestricted,
    RestrictedTo(BTreeSet<Registration>),
}

impl Authorization {
    pub fn restricted_to<I, S>(registrations: I) -> Authorization
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Authorization::RestrictedTo(
            registrations
                .into_iter()
                .map(|r| Arc::from(r.as_ref()))
                .collect(),
        )
    }

    pub fn permits(&self, registration: &str) -> bool {
        match self {
            Authorization::Unrestricted => true,
            Authorization::RestrictedTo(set) => set.contains(registration),
        }
    }

    /// True iff the selection is non-empty and shares at least one aircraft
    /// with this authorization.
    pub fn permits_any<'a, I>(&self, selection: I) -> bool
    where
        I: IntoIterator<Item = &'a Registration>,
    {
        selection.into_iter().any(|r| self.permits(r))
    }
}

impl From<Option<BTreeSet<Registration>>> for Authorization {
    fn from(value: Option<BTreeSet<Registration>>) -> Self {
        match value {
            None => Authorization::Unrestricted,
            Some(set) => Authorization::RestrictedTo(set),
        }
    }
}

impl From<Authorization> for Option<BTreeSet<Registration>> {
    fn from(value: Authorization) -> Self {
        match value {
            Authorization::Unrestricted => None,
            Authorization::RestrictedTo(set) => Some(set),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub name: InstructorName,
    pub certifications: Vec<String>,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub training_capabilities: Vec<String>,
    #[serde(default)]
    pub authorized_aircraft: Authorization,
}

impl fmt::Display for Instructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
