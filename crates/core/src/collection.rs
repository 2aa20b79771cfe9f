//! The five clinic collections and their naming.

use std::fmt;
use std::str::FromStr;

/// A named collection (database) of the clinic's document store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Patients,
    Doctors,
    History,
    Appointments,
    Images,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Patients,
        Collection::Doctors,
        Collection::History,
        Collection::Appointments,
        Collection::Images,
    ];

    /// Database name in the document store.
    pub fn database(self) -> &'static str {
        match self {
            Collection::Patients => "pacienti",
            Collection::Doctors => "doctori",
            Collection::History => "tratament_istoric",
            Collection::Appointments => "programari",
            Collection::Images => "imagini_medicale",
        }
    }

    /// Short name used in HTTP routes and on the command line.
    pub fn route(self) -> &'static str {
        match self {
            Collection::Patients => "pacienti",
            Collection::Doctors => "doctori",
            Collection::History => "istoric",
            Collection::Appointments => "programari",
            Collection::Images => "imagini",
        }
    }

    /// Plural genitive form used in listing error messages.
    pub fn label(self) -> &'static str {
        match self {
            Collection::Patients => "pacienților",
            Collection::Doctors => "doctorilor",
            Collection::History => "istoricului",
            Collection::Appointments => "programărilor",
            Collection::Images => "imaginilor medicale",
        }
    }

    /// Singular genitive form used in insertion error messages.
    pub fn record_label(self) -> &'static str {
        match self {
            Collection::Patients => "pacientului",
            Collection::Doctors => "doctorului",
            Collection::History => "tratamentului",
            Collection::Appointments => "programării",
            Collection::Images => "imaginii medicale",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.database())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown collection '{0}' (expected one of: pacienti, doctori, istoric, programari, imagini)")]
pub struct UnknownCollection(String);

impl FromStr for Collection {
    type Err = UnknownCollection;

    /// Accepts either the route name or the database name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Collection::ALL
            .into_iter()
            .find(|c| c.route() == s || c.database() == s)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}
