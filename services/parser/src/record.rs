//! Output records and their positional encodings.

use chrono::NaiveDate;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

use crate::classify::{classify_category, is_admin_center, type_code, Category};
use crate::code::{is_valid_code, CodeParts};
use crate::date::{iso_date, packed_date, parse_date};
use crate::normalize::{parse_number, truncate_chars};
use crate::row::OktmoRow;

/// Longest auxiliary note kept in the compact layout, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 50;

/// Field layout of the emitted record array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `[code, name, category, regionCode, adminCenterName, isoDate, controlDigit]`
    #[default]
    Descriptive,
    /// `[code, name, category, typeCode, isAdminCenter, status, yyyymmdd, note]`
    Compact,
}

impl Layout {
    pub fn field_count(self) -> usize {
        match self {
            Layout::Descriptive => 7,
            Layout::Compact => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Descriptive => "descriptive",
            Layout::Compact => "compact",
        }
    }
}

/// One classified registry entity, layout independent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    /// 8 or 11 digits, control digit excluded
    pub code: String,
    pub name: String,
    pub category: Category,
    /// Two-digit region code
    pub region: String,
    pub type_code: u8,
    pub center: String,
    pub is_admin_center: bool,
    pub status: u32,
    pub introduced: Option<NaiveDate>,
    pub control: String,
    /// Note truncated to [`MAX_DESCRIPTION_CHARS`]
    pub description: String,
}

impl EntityRecord {
    /// Classify a row and assemble its identifier.
    ///
    /// Returns `None` when the assembled code is not a well-formed 8- or
    /// 11-digit identifier (over-long source fragments).
    pub fn from_row(row: &OktmoRow) -> Option<Self> {
        let category = classify_category(&row.name, &row.section);
        let parts = CodeParts::from_raw(&row.territory, &row.level1, &row.level2, &row.level3);
        let code = parts.assemble(category);
        if !is_valid_code(&code) {
            tracing::debug!("Dropping row {:?}: malformed code {:?}", row.name, code);
            return None;
        }

        Some(Self {
            code,
            type_code: type_code(category, &row.name),
            is_admin_center: is_admin_center(&row.name, &row.center),
            name: row.name.clone(),
            category,
            region: parts.territory,
            center: row.center.clone(),
            status: parse_number(&row.status),
            introduced: parse_date(&row.introduced),
            control: row.control.clone(),
            description: truncate_chars(&row.description, MAX_DESCRIPTION_CHARS),
        })
    }

    /// Serialize view of this record in the given layout.
    pub fn positional(&self, layout: Layout) -> Positional<'_> {
        Positional {
            record: self,
            layout,
        }
    }
}

/// A record serialized as a fixed-position array
#[derive(Debug, Clone, Copy)]
pub struct Positional<'a> {
    record: &'a EntityRecord,
    layout: Layout,
}

impl Serialize for Positional<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let r = self.record;
        let mut seq = serializer.serialize_seq(Some(self.layout.field_count()))?;
        seq.serialize_element(&r.code)?;
        seq.serialize_element(&r.name)?;
        seq.serialize_element(&r.category)?;
        match self.layout {
            Layout::Descriptive => {
                seq.serialize_element(&r.region)?;
                seq.serialize_element(&r.center)?;
                seq.serialize_element(&iso_date(r.introduced))?;
                seq.serialize_element(&r.control)?;
            }
            Layout::Compact => {
                seq.serialize_element(&r.type_code)?;
                seq.serialize_element(&u8::from(r.is_admin_center))?;
                seq.serialize_element(&r.status)?;
                seq.serialize_element(&packed_date(r.introduced))?;
                seq.serialize_element(&r.description)?;
            }
        }
        seq.end()
    }
}
