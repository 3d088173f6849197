//! Records stored by the back-office and the request/response payloads the
//! API exchanges with the dashboard and the member app.
//!
//! Payloads use camelCase keys because both clients are JavaScript.

/// Declares an enum whose wire and storage form is a human-readable label
/// (`"Not Interested"`, `"Full Time"`), with `as_str`, `Display` and a
/// case-insensitive `FromStr`.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::GymError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        crate::errors::GymError::Validation(format!(
                            "Unknown {} '{}'",
                            stringify!($name),
                            s
                        ))
                    })
            }
        }
    };
}

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod diet;
pub mod employee;
pub mod enquiry;
pub mod follow_up;
pub mod gym;
pub mod member;
pub mod package;
pub mod pagination;
pub mod water;
pub mod workout;

use std::str::FromStr;

use crate::errors::GymResult;

labelled_enum!(
    /// Gender as captured on enquiry, member and employee forms.
    Gender {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
);

/// Parses an optional query-string value, treating a blank string the same
/// as an absent one (dropdowns send `status=` when "All" is selected).
pub fn parse_optional<T>(value: Option<&str>) -> GymResult<Option<T>>
where
    T: FromStr<Err = crate::errors::GymError>,
{
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some),
    }
}

/// Lowercased, trimmed keyword or `None` when blank.
pub fn normalize_keyword(keyword: Option<&str>) -> Option<String> {
    keyword
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_lowercase)
}

/// Case-insensitive substring match of `keyword` against any of `fields`.
pub fn keyword_matches(keyword: &str, fields: &[Option<&str>]) -> bool {
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(keyword))
}
