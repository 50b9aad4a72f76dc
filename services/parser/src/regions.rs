//! Region dictionary: two-digit region code → display name.
//!
//! Pass 1 takes names from section headers. Pass 2 fills regions without a
//! header from the first sufficiently long name under that region, in file
//! order. Regions with neither stay absent.

use std::collections::BTreeMap;

use crate::classify::{MUNICIPAL_PHRASE, SECTION_MARKER, SETTLEMENT_PHRASE};
use crate::code::NO_REGION;
use crate::record::EntityRecord;

/// Boilerplate in front of the region name in header rows, longest first
pub const HEADER_PREFIXES: &[&str] = &[
    "Раздел 2. Населенные пункты, входящие в состав муниципальных образований ",
    "Раздел 1. Муниципальные образования ",
    "Населенные пункты, входящие в состав муниципальных образований ",
    "Муниципальные образования ",
];

/// Settlement abbreviations stripped from fallback names
pub const FALLBACK_PREFIXES: &[&str] = &["г ", "с ", "п ", "д ", "рп "];

/// Fallback names must be longer than this many characters
pub const MIN_FALLBACK_CHARS: usize = 5;

pub type RegionDictionary = BTreeMap<String, String>;

/// Strip header boilerplate from a section name.
///
/// Unknown `Раздел N...` headers keep the text after the first `:` or `.`.
pub fn extract_region_name(name: &str) -> String {
    if let Some(rest) = HEADER_PREFIXES.iter().find_map(|p| name.strip_prefix(*p)) {
        return rest.trim().to_string();
    }
    if name.starts_with(&format!("{} ", SECTION_MARKER)) {
        if let Some((_, rest)) = name.split_once(':').or_else(|| name.split_once('.')) {
            return rest.trim().to_string();
        }
    }
    name.to_string()
}

fn is_clean_region_name(candidate: &str) -> bool {
    !candidate.is_empty()
        && !candidate.contains(SECTION_MARKER)
        && !candidate.contains(MUNICIPAL_PHRASE)
        && !candidate.contains(SETTLEMENT_PHRASE)
}

fn strip_fallback_prefix(name: &str) -> &str {
    FALLBACK_PREFIXES
        .iter()
        .find_map(|p| name.strip_prefix(*p))
        .unwrap_or(name)
}

/// Build the dictionary from the full record set. Keys come out sorted.
pub fn build_region_dictionary(records: &[EntityRecord]) -> RegionDictionary {
    let mut regions = RegionDictionary::new();

    // Pass 1: section headers, first clean candidate wins
    for record in records {
        if record.region == NO_REGION || regions.contains_key(&record.region) {
            continue;
        }
        if !record.name.contains(MUNICIPAL_PHRASE) && !record.name.contains(SETTLEMENT_PHRASE) {
            continue;
        }
        let candidate = extract_region_name(&record.name);
        if is_clean_region_name(&candidate) {
            regions.insert(record.region.clone(), candidate);
        }
    }

    // Pass 2: first long-enough name per region, in file order
    let mut first_names: BTreeMap<&str, &str> = BTreeMap::new();
    for record in records {
        if record.region == NO_REGION || record.name.chars().count() <= MIN_FALLBACK_CHARS {
            continue;
        }
        first_names.entry(record.region.as_str()).or_insert(record.name.as_str());
    }
    for (region, name) in first_names {
        if !regions.contains_key(region) {
            tracing::debug!("Region {} has no header; falling back to {:?}", region, name);
            regions.insert(region.to_string(), strip_fallback_prefix(name).to_string());
        }
    }

    regions
}
