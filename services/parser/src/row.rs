//! Positional view of one registry CSV line.
//!
//! Rosstat column order (no header row):
//!   TER;KOD1;KOD2;KOD3;KC;RAZDEL;NAME1;CENTRUM;NOMDESCR;NOMAKT;STATUS;DATEUTV;DATEVVED

use crate::normalize::clean_string;

/// Rows shorter than this carry no name and are skipped
pub const MIN_FIELDS: usize = 7;

const COL_TER: usize = 0;
const COL_KOD1: usize = 1;
const COL_KOD2: usize = 2;
const COL_KOD3: usize = 3;
const COL_KC: usize = 4;
const COL_RAZDEL: usize = 5;
const COL_NAME: usize = 6;
const COL_CENTRUM: usize = 7;
const COL_NOMDESCR: usize = 8;
const COL_STATUS: usize = 10;
const COL_DATEVVED: usize = 12;

/// One registry row with every cell cleaned. Missing trailing cells are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OktmoRow {
    pub territory: String,
    pub level1: String,
    pub level2: String,
    pub level3: String,
    /// Control digit (KC)
    pub control: String,
    /// Section flag (RAZDEL): "1" municipal formations, "2" settlements
    pub section: String,
    pub name: String,
    /// Administrative centre (CENTRUM)
    pub center: String,
    /// Free-text note (NOMDESCR)
    pub description: String,
    pub status: String,
    /// Date of introduction (DATEVVED)
    pub introduced: String,
}

impl OktmoRow {
    /// Build a row from raw cells. Returns `None` for rows with fewer than
    /// [`MIN_FIELDS`] cells.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        if fields.len() < MIN_FIELDS {
            return None;
        }
        let cell = |idx: usize| {
            fields
                .get(idx)
                .map(|s| clean_string(s.as_ref()))
                .unwrap_or_default()
        };

        Some(Self {
            territory: cell(COL_TER),
            level1: cell(COL_KOD1),
            level2: cell(COL_KOD2),
            level3: cell(COL_KOD3),
            control: cell(COL_KC),
            section: cell(COL_RAZDEL),
            name: cell(COL_NAME),
            center: cell(COL_CENTRUM),
            description: cell(COL_NOMDESCR),
            status: cell(COL_STATUS),
            introduced: cell(COL_DATEVVED),
        })
    }

    pub fn from_record(record: &csv::StringRecord) -> Option<Self> {
        let fields: Vec<&str> = record.iter().collect();
        Self::from_fields(&fields)
    }
}
