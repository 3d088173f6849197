//! Data-repair helpers used by the maintenance binaries.
//!
//! These are one-off heuristics for cleaning up legacy records, not
//! business rules: nothing in the request path depends on them.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::models::{enquiry::Enquiry, package::Package};

/// Number of leading characters of a legacy package name compared against
/// package names when no exact match exists.
pub const PACKAGE_PREFIX_LEN: usize = 10;

/// Names shorter than this only ever match exactly.
pub const MIN_FUZZY_LEN: usize = 3;

/// Finds the package a legacy free-text `name` refers to.
///
/// Exact (trimmed, case-insensitive) matches win. Otherwise, for names of at
/// least [`MIN_FUZZY_LEN`] characters, the first package in slice order whose
/// name starts with the first [`PACKAGE_PREFIX_LEN`] characters of `name` is
/// returned. When two packages share that prefix the earlier one wins.
pub fn match_package<'a>(name: &str, packages: &'a [Package]) -> Option<&'a Package> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    if let Some(exact) = packages
        .iter()
        .find(|p| p.name.trim().to_lowercase() == wanted)
    {
        return Some(exact);
    }

    if wanted.chars().count() < MIN_FUZZY_LEN {
        return None;
    }

    let prefix: String = wanted.chars().take(PACKAGE_PREFIX_LEN).collect();
    packages
        .iter()
        .find(|p| p.name.trim().to_lowercase().starts_with(&prefix))
}

/// Digits of a phone number, keeping only the last ten so that `+91`/`0`
/// prefixes do not hide duplicates.
pub fn normalize_mobile(mobile: &str) -> String {
    let digits: Vec<char> = mobile.chars().filter(char::is_ascii_digit).collect();
    let start = digits.len().saturating_sub(10);
    digits[start..].iter().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub key: String,
    pub ids: Vec<Uuid>,
    pub names: Vec<String>,
}

/// Enquiries sharing a normalized mobile number, ordered by key.
pub fn mobile_duplicates(enquiries: &[Enquiry]) -> Vec<DuplicateGroup> {
    group_by(enquiries, |e| normalize_mobile(&e.mobile))
}

/// Enquiries with the same name (case-insensitive) and mobile number.
pub fn exact_duplicates(enquiries: &[Enquiry]) -> Vec<DuplicateGroup> {
    group_by(enquiries, |e| {
        format!(
            "{}|{}",
            e.name.trim().to_lowercase(),
            normalize_mobile(&e.mobile)
        )
    })
}

fn group_by(enquiries: &[Enquiry], key: impl Fn(&Enquiry) -> String) -> Vec<DuplicateGroup> {
    let mut groups: BTreeMap<String, Vec<&Enquiry>> = BTreeMap::new();
    for enquiry in enquiries {
        let k = key(enquiry);
        if k.is_empty() || k == "|" {
            continue;
        }
        groups.entry(k).or_default().push(enquiry);
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(key, members)| DuplicateGroup {
            key,
            ids: members.iter().map(|e| e.id).collect(),
            names: members.iter().map(|e| e.name.clone()).collect(),
        })
        .collect()
}
