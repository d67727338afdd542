//! Patient models.

use serde::{Deserialize, Serialize};

/// A stored patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Store-generated ID
    pub id: i64,
    /// Unique login/natural key
    pub username: String,
    /// Given name
    pub name: Option<String>,
    /// Family name
    pub surname: Option<String>,
}

/// Fields supplied when registering or updating a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
}

impl NewPatient {
    /// Create patient fields with only the username set.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: None,
            surname: None,
        }
    }

    pub fn with_names(mut self, name: impl Into<String>, surname: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.surname = Some(surname.into());
        self
    }
}

/// How to look up patients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientQuery {
    /// Exact primary key match
    ById(i64),
    /// Exact username match
    ByUsername(String),
    /// Primary-key ordered page over all patients
    Page {
        start_index: Option<u32>,
        count: Option<u32>,
    },
}

impl PatientQuery {
    /// Every patient, unpaged.
    pub fn all() -> Self {
        PatientQuery::Page {
            start_index: None,
            count: None,
        }
    }
}

/// Result of a [`PatientQuery`].
#[derive(Debug, Clone, PartialEq)]
pub enum PatientLookup {
    /// Outcome of an id or username lookup
    Single(Option<Patient>),
    /// Outcome of a page query
    Page(Vec<Patient>),
}

impl PatientLookup {
    /// Take the single patient, if this was a single lookup that matched.
    pub fn into_single(self) -> Option<Patient> {
        match self {
            PatientLookup::Single(patient) => patient,
            PatientLookup::Page(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient_fields() {
        let patient = NewPatient::new("u1").with_names("Ana", "Perez");
        assert_eq!(patient.username, "u1");
        assert_eq!(patient.name.as_deref(), Some("Ana"));
        assert_eq!(patient.surname.as_deref(), Some("Perez"));
    }

    #[test]
    fn test_names_optional_in_json() {
        let patient: NewPatient = serde_json::from_str(r#"{"username":"u1"}"#).unwrap();
        assert_eq!(patient, NewPatient::new("u1"));
    }

    #[test]
    fn test_into_single() {
        assert_eq!(PatientLookup::Page(vec![]).into_single(), None);
        assert_eq!(PatientLookup::Single(None).into_single(), None);
    }
}
