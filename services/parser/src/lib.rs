//! OKTMO registry converter.
//!
//! Turns the Rosstat OKTMO CSV export into a compact JS asset for
//! client-side lookup:
//! - Detect the text encoding of the export
//! - Clean cells and normalize hierarchical code fragments
//! - Classify each row as section header, municipal formation or settlement
//! - Assemble 8/11-digit identifiers (control digit excluded)
//! - Derive the region dictionary
//! - Emit records in the descriptive or compact layout
//!
//! Conversion is DETERMINISTIC: same input + same layout = same records.

pub mod classify;
pub mod code;
pub mod convert;
pub mod date;
pub mod encoding;
pub mod error;
pub mod normalize;
pub mod output;
pub mod record;
pub mod regions;
pub mod row;

pub use classify::Category;
pub use convert::{
    convert_file, convert_str, Conversion, ConversionStats, ConvertOptions, LogProgress,
    ProgressObserver,
};
pub use error::{ConvertError, Result};
pub use record::{EntityRecord, Layout};
