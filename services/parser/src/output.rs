//! JS asset emission: record array constant, metadata constant, export guard.

use chrono::{DateTime, Local};
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::classify::{Category, MUNICIPAL_TYPE_LABELS, SETTLEMENT_TYPE_LABELS};
use crate::error::Result;
use crate::record::{EntityRecord, Layout};
use crate::regions::RegionDictionary;

pub const SOURCE_URL: &str = "https://rosstat.gov.ru/opendata/7708234640-oktmo";
pub const DATA_BINDING: &str = "oktmoData";
pub const METADATA_BINDING: &str = "oktmoMetadata";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata constant written after the record array
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata<'a> {
    pub subjects: &'a RegionDictionary,
    pub types: BTreeMap<u8, &'static str>,
    pub generated: String,
    pub total: usize,
    pub layout: Layout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipal_types: Option<BTreeMap<u8, &'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_types: Option<BTreeMap<u8, &'static str>>,
}

impl<'a> Metadata<'a> {
    pub fn new(
        subjects: &'a RegionDictionary,
        total: usize,
        layout: Layout,
        generated: DateTime<Local>,
    ) -> Self {
        let vocabulary = |labels: &[(u8, &'static str)]| -> BTreeMap<u8, &'static str> {
            labels.iter().copied().collect()
        };
        let (municipal_types, settlement_types) = match layout {
            Layout::Descriptive => (None, None),
            Layout::Compact => (
                Some(vocabulary(MUNICIPAL_TYPE_LABELS)),
                Some(vocabulary(SETTLEMENT_TYPE_LABELS)),
            ),
        };

        Self {
            subjects,
            types: Category::ALL.iter().map(|c| (c.code(), c.label())).collect(),
            generated: generated.format(TIMESTAMP_FORMAT).to_string(),
            total,
            layout,
            municipal_types,
            settlement_types,
        }
    }
}

/// The record array in the given layout
struct Records<'a> {
    records: &'a [EntityRecord],
    layout: Layout,
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in self.records {
            seq.serialize_element(&record.positional(self.layout))?;
        }
        seq.end()
    }
}

/// Write the complete asset. JSON is compact and keeps Cyrillic as UTF-8.
pub fn write_js<W: Write>(
    mut out: W,
    records: &[EntityRecord],
    metadata: &Metadata<'_>,
) -> std::io::Result<()> {
    writeln!(out, "// Данные ОКТМО (оптимизированный формат)")?;
    writeln!(out, "// Источник: {}", SOURCE_URL)?;
    writeln!(out, "// Сгенерировано: {}", metadata.generated)?;
    writeln!(out, "// Формат: {}", metadata.layout.as_str())?;
    writeln!(out)?;

    write!(out, "const {} = ", DATA_BINDING)?;
    serde_json::to_writer(
        &mut out,
        &Records {
            records,
            layout: metadata.layout,
        },
    )?;
    writeln!(out, ";")?;
    writeln!(out)?;

    write!(out, "const {} = ", METADATA_BINDING)?;
    serde_json::to_writer(&mut out, metadata)?;
    writeln!(out, ";")?;
    writeln!(out)?;

    writeln!(out, "// Экспорт для использования")?;
    writeln!(out, "if (typeof module !== 'undefined' && module.exports) {{")?;
    writeln!(out, "    module.exports = {{ {}, {} }};", DATA_BINDING, METADATA_BINDING)?;
    writeln!(out, "}} else if (typeof window !== 'undefined') {{")?;
    writeln!(out, "    window.{0} = {0};", DATA_BINDING)?;
    writeln!(out, "    window.{0} = {0};", METADATA_BINDING)?;
    writeln!(out, "}}")?;
    out.flush()
}

/// Render the asset into memory.
pub fn render_js(records: &[EntityRecord], metadata: &Metadata<'_>) -> Result<String> {
    let mut buffer = Vec::new();
    write_js(&mut buffer, records, metadata).map_err(serde_json::Error::io)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
