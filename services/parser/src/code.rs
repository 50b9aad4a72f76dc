//! OKTMO identifier assembly.
//!
//! The control digit (KC) is never part of the identifier; it travels as a
//! separate output attribute.

use crate::classify::Category;
use crate::normalize::{clean_code_part, clean_territory};

/// Identifier of the "whole country" section
pub const COUNTRY_CODE: &str = "00000000";

/// Territory code of rows that belong to no region
pub const NO_REGION: &str = "00";

/// Normalized hierarchy fragments of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeParts {
    /// Region, two digits
    pub territory: String,
    pub level1: String,
    pub level2: String,
    pub level3: String,
}

impl CodeParts {
    /// Normalize raw cells into fixed-width fragments.
    pub fn from_raw(territory: &str, level1: &str, level2: &str, level3: &str) -> Self {
        Self {
            territory: clean_territory(territory),
            level1: clean_code_part(level1),
            level2: clean_code_part(level2),
            level3: clean_code_part(level3),
        }
    }

    /// Concatenate the fragments the category calls for.
    ///
    /// Municipal formations get 8 digits, settlements 11. Sections collapse to
    /// the region followed by zeroes, or [`COUNTRY_CODE`] without a region.
    pub fn assemble(&self, category: Category) -> String {
        match category {
            Category::Municipal => format!("{}{}{}", self.territory, self.level1, self.level2),
            Category::Settlement => format!(
                "{}{}{}{}",
                self.territory, self.level1, self.level2, self.level3
            ),
            Category::Section if self.territory != NO_REGION => {
                format!("{}000000", self.territory)
            }
            Category::Section => COUNTRY_CODE.to_string(),
        }
    }
}

/// Identifier lengths a well-formed row can produce
pub fn is_valid_code(code: &str) -> bool {
    matches!(code.len(), 8 | 11) && code.bytes().all(|b| b.is_ascii_digit())
}
