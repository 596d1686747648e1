//! FHIR release identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// FHIR release. Ordered by publication, so `R4 < R4B < R5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum FhirVersion {
    #[default]
    R4,
    R4B,
    R5,
}

impl FhirVersion {
    /// Published version string of the release.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::R4 => "4.0.1",
            Self::R4B => "4.3.0",
            Self::R5 => "5.0.0",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::R4 => "R4",
            Self::R4B => "R4B",
            Self::R5 => "R5",
        }
    }
}

impl fmt::Display for FhirVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FhirVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "R4" | "4.0" | "4.0.1" => Ok(Self::R4),
            "R4B" | "4.3" | "4.3.0" => Ok(Self::R4B),
            "R5" | "5.0" | "5.0.0" => Ok(Self::R5),
            other => Err(format!("unsupported FHIR version: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_release_numbers() {
        assert_eq!("r4".parse::<FhirVersion>(), Ok(FhirVersion::R4));
        assert_eq!("4.3.0".parse::<FhirVersion>(), Ok(FhirVersion::R4B));
        assert_eq!("R5".parse::<FhirVersion>(), Ok(FhirVersion::R5));
        assert!("STU3".parse::<FhirVersion>().is_err());
    }

    #[test]
    fn releases_are_ordered() {
        assert!(FhirVersion::R4 < FhirVersion::R4B);
        assert!(FhirVersion::R4B < FhirVersion::R5);
    }
}
