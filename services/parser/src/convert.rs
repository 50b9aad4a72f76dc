//! The conversion pipeline: decode → split → classify → collect → regions.
//!
//! One pass over the rows in file order. The region dictionary is built only
//! after every row has been classified. Records are layout independent; the
//! layout is applied when the asset is written.

use chrono::{DateTime, Local};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::classify::Category;
use crate::encoding::read_source;
use crate::error::{ConvertError, Result};
use crate::output::{write_js, Metadata};
use crate::record::{EntityRecord, Layout};
use crate::regions::{build_region_dictionary, RegionDictionary};
use crate::row::OktmoRow;

/// Rows between two progress notifications
pub const PROGRESS_INTERVAL: usize = 50_000;

/// Receives periodic progress while rows are converted.
pub trait ProgressObserver {
    fn on_progress(&mut self, stats: &ConversionStats);
}

/// Logs progress through `tracing`
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, stats: &ConversionStats) {
        tracing::info!("Processed {} rows...", stats.rows_read);
    }
}

/// Discards progress
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _stats: &ConversionStats) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Field delimiter; detected from the first line when `None`
    pub delimiter: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub rows_read: usize,
    pub processed: usize,
    pub skipped: usize,
    pub sections: usize,
    pub municipal: usize,
    pub settlements: usize,
}

impl ConversionStats {
    fn count(&mut self, category: Category) {
        self.processed += 1;
        match category {
            Category::Section => self.sections += 1,
            Category::Municipal => self.municipal += 1,
            Category::Settlement => self.settlements += 1,
        }
    }

    pub fn by_category(&self, category: Category) -> usize {
        match category {
            Category::Section => self.sections,
            Category::Municipal => self.municipal,
            Category::Settlement => self.settlements,
        }
    }
}

/// Result of one conversion run
#[derive(Debug)]
pub struct Conversion {
    pub records: Vec<EntityRecord>,
    pub regions: RegionDictionary,
    pub stats: ConversionStats,
}

impl Conversion {
    pub fn metadata(&self, layout: Layout, generated: DateTime<Local>) -> Metadata<'_> {
        Metadata::new(&self.regions, self.records.len(), layout, generated)
    }

    /// Write the JS asset to `path`.
    pub fn write_to(&self, path: &Path, layout: Layout) -> Result<()> {
        let metadata = self.metadata(layout, Local::now());
        let write_error = |source| ConvertError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(write_error)?;
        write_js(BufWriter::new(file), &self.records, &metadata).map_err(write_error)
    }
}

/// `;` if the first line has one, `,` otherwise.
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Convert decoded registry text.
///
/// Short and malformed rows are skipped and counted. Fails only when no
/// record survives.
pub fn convert_str(
    content: &str,
    options: &ConvertOptions,
    observer: &mut dyn ProgressObserver,
) -> Result<Conversion> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let delimiter = options.delimiter.unwrap_or_else(|| detect_delimiter(content));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quote(b'"')
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    let mut stats = ConversionStats::default();

    for (line_idx, result) in reader.records().enumerate() {
        stats.rows_read += 1;

        let parsed = match result {
            Ok(record) => {
                OktmoRow::from_record(&record).and_then(|row| EntityRecord::from_row(&row))
            }
            Err(e) => {
                tracing::warn!("Skipping line {} due to error: {}", line_idx + 1, e);
                None
            }
        };

        match parsed {
            Some(record) => {
                stats.count(record.category);
                records.push(record);
            }
            None => stats.skipped += 1,
        }

        if stats.rows_read % PROGRESS_INTERVAL == 0 {
            observer.on_progress(&stats);
        }
    }

    if records.is_empty() {
        return Err(ConvertError::NoRecords);
    }

    let regions = build_region_dictionary(&records);
    Ok(Conversion {
        records,
        regions,
        stats,
    })
}

/// Detect the encoding of `input`, decode it, and convert.
pub fn convert_file(
    input: &Path,
    options: &ConvertOptions,
    observer: &mut dyn ProgressObserver,
) -> Result<Conversion> {
    let (content, _encoding) = read_source(input)?;
    convert_str(&content, options, observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::is_valid_code;
    use crate::output::render_js;
    use chrono::TimeZone;
    use std::io::Write;

    const REGISTRY: &str = "\
\"01\";\"000\";\"000\";\"000\";\"\";\"\";\"Раздел 1. Муниципальные образования Алтайского края\";\"\";\"\";\"\";\"\";\"\";\"\"
\"01\";\"002\";\"015\";\"000\";\"5\";\"1\";\"Зеркальное сельское поселение\";\"Зеркальное\";\"\";\"\";\"000\";\"\";\"01.01.2015\"
\"01\";\"002\";\"015\";\"101\";\"3\";\"2\";\"с Зеркальное\";\"\";\"\";\"\";\"000\";\"\";\"2015-01-01\"
\"01\";\"002\";\"015\"
\"66\";\"701\";\"000\";\"001\";\"7\";\"2\";\"г Смоленск\";\"\";\"\";\"\";\"000\";\"\";\"01/01/2014\"
";

    struct Counting(usize);

    impl ProgressObserver for Counting {
        fn on_progress(&mut self, _stats: &ConversionStats) {
            self.0 += 1;
        }
    }

    fn convert(content: &str) -> Result<Conversion> {
        convert_str(content, &ConvertOptions::default(), &mut NoProgress)
    }

    // -------------------------------------------------------------------------
    // PIPELINE
    // -------------------------------------------------------------------------

    #[test]
    fn test_convert_registry() {
        let conversion = convert(REGISTRY).unwrap();
        let codes: Vec<&str> = conversion.records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["01000000", "01002015", "01002015101", "66701000001"]);

        assert_eq!(conversion.stats.rows_read, 5);
        assert_eq!(conversion.stats.processed, 4);
        assert_eq!(conversion.stats.skipped, 1);
        assert_eq!(conversion.stats.by_category(Category::Section), 1);
        assert_eq!(conversion.stats.by_category(Category::Municipal), 1);
        assert_eq!(conversion.stats.by_category(Category::Settlement), 2);
    }

    #[test]
    fn test_codes_match_category_width() {
        let conversion = convert(REGISTRY).unwrap();
        for record in &conversion.records {
            assert!(is_valid_code(&record.code));
            match record.category {
                Category::Municipal | Category::Section => assert_eq!(record.code.len(), 8),
                Category::Settlement => assert_eq!(record.code.len(), 11),
            }
        }
    }

    #[test]
    fn test_regions_from_header_and_fallback() {
        let conversion = convert(REGISTRY).unwrap();
        assert_eq!(conversion.regions["01"], "Алтайского края");
        assert_eq!(conversion.regions["66"], "Смоленск");
    }

    #[test]
    fn test_short_rows_never_emit() {
        let content = "01;002;015;000;5;1\n01;002\n";
        assert!(matches!(convert(content), Err(ConvertError::NoRecords)));
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(matches!(convert(""), Err(ConvertError::NoRecords)));
    }

    #[test]
    fn test_comma_delimiter_detected() {
        let content = "01,002,015,000,5,1,Зеркальное сельское поселение\n";
        assert_eq!(detect_delimiter(content), b',');
        let conversion = convert(content).unwrap();
        assert_eq!(conversion.records[0].code, "01002015");
    }

    #[test]
    fn test_semicolon_delimiter_detected() {
        assert_eq!(detect_delimiter("01;002\n01,002"), b';');
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn test_explicit_delimiter_overrides_detection() {
        let content = "01|002|015|000|5|1|Зеркальное сельское поселение\n";
        let options = ConvertOptions {
            delimiter: Some(b'|'),
        };
        let conversion = convert_str(content, &options, &mut NoProgress).unwrap();
        assert_eq!(conversion.records.len(), 1);
    }

    #[test]
    fn test_bom_is_ignored() {
        let content = format!("\u{feff}{}", REGISTRY);
        let conversion = convert(&content).unwrap();
        assert_eq!(conversion.records[0].region, "01");
    }

    #[test]
    fn test_progress_observer_called_per_interval() {
        let line = "01;002;015;101;3;2;с Зеркальное\n";
        let content = line.repeat(PROGRESS_INTERVAL * 2 + 10);
        let mut observer = Counting(0);
        convert_str(&content, &ConvertOptions::default(), &mut observer).unwrap();
        assert_eq!(observer.0, 2);
    }

    #[test]
    fn test_conversion_determinism() {
        let generated = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap();
        let render = || {
            let conversion = convert(REGISTRY).unwrap();
            let metadata = conversion.metadata(Layout::Compact, generated);
            render_js(&conversion.records, &metadata).unwrap()
        };
        let baseline = render();
        for _ in 0..5 {
            assert_eq!(render(), baseline);
        }
    }

    // -------------------------------------------------------------------------
    // FILES
    // -------------------------------------------------------------------------

    #[test]
    fn test_convert_windows_1251_file_and_write() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(REGISTRY);
        let mut input = tempfile::NamedTempFile::new().unwrap();
        input.write_all(&bytes).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("data.js");

        let conversion =
            convert_file(input.path(), &ConvertOptions::default(), &mut NoProgress).unwrap();
        conversion.write_to(&output, Layout::Descriptive).unwrap();

        let js = std::fs::read_to_string(&output).unwrap();
        assert!(js.contains("\"г Смоленск\""));
        assert!(js.contains("\"subjects\":{\"01\":\"Алтайского края\",\"66\":\"Смоленск\"}"));
        assert!(js.contains("\"total\":4"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let conversion = convert(REGISTRY).unwrap();
        let result = conversion.write_to(Path::new("/nonexistent/dir/data.js"), Layout::Compact);
        assert!(matches!(result, Err(ConvertError::Write { .. })));
    }
}
