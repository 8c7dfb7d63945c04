// Closed sets of allowed string values shared with the backend.
//
// Purpose
// - Name every storage folder, collection, profile section and document type the portal knows.
//
// Responsibilities
// - Map each variant to its wire string and back.
// - List the wire strings in declaration order for error messages and membership checks.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("getEnumeratedValues: either enums is null or not typeof object")]
    NotAnObject,

    #[error("unknown {kind} `{value}`")]
    UnknownValue { kind: &'static str, value: String },
}

/// A closed enumeration with a stable wire string per variant.
pub trait Enumerated: Sized + Copy + 'static {
    const KIND: &'static str;
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;
}

/// Wire strings of `E`, in declaration order.
pub fn enumerated_values<E: Enumerated>() -> Vec<&'static str> {
    E::ALL.iter().map(Enumerated::as_str).collect()
}

/// Values of a JSON object in insertion order. An array yields its elements.
///
/// `null` and scalars are rejected.
pub fn get_enumerated_values(enums: &Value) -> Result<Vec<Value>, RegistryError> {
    match enums {
        Value::Object(map) => Ok(map.values().cloned().collect()),
        Value::Array(items) => Ok(items.clone()),
        _ => Err(RegistryError::NotAnObject),
    }
}

macro_rules! enumerated {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl Enumerated for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RegistryError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(RegistryError::UnknownValue {
                        kind: $kind,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

enumerated! {
    /// Top-level folders in blob storage.
    StorageFolder, "storage folder" {
        EmployeeDocuments => "employee_documents",
    }
}

enumerated! {
    /// Root collections in the document database.
    Collection, "collection" {
        Users => "users",
        Checkins => "checkins",
    }
}

enumerated! {
    /// Sections partitioning the updatable part of a user record.
    ProfileSection, "profile section" {
        Personal => "personal",
        Documents => "docs",
        Assignment => "assignment",
        Education => "education",
        PreviousJob => "previous_job",
        BankAccount => "bank_account",
        EmergencyContact => "emergency_contact",
        Enneagram => "enneagram",
    }
}

enumerated! {
    /// Identity documents an employee can upload.
    DocumentType, "document type" {
        Ktp => "ktp",
        Npwp => "npwp",
        KartuKeluarga => "kartu_keluarga",
    }
}
