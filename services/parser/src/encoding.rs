//! Encoding detection for registry exports.
//!
//! Rosstat publishes the same file in different code pages depending on the
//! mirror, so the encoding is probed from a sample instead of assumed.

use encoding_rs::{DecoderResult, Encoding, IBM866, KOI8_R, UTF_8, WINDOWS_1251};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{ConvertError, Result};

/// Candidates in probe order. UTF-8 goes first because single-byte code
/// pages decode almost any byte sequence; the rest are ranked by score.
pub fn candidate_encodings() -> [&'static Encoding; 4] {
    [UTF_8, WINDOWS_1251, KOI8_R, IBM866]
}

/// Bytes read from the head of the file for probing
pub const SAMPLE_SIZE: usize = 4096;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode `sample` strictly. Returns `None` on the first malformed sequence.
///
/// The decoder runs with `last = false` so a multi-byte character cut at the
/// end of the sample is buffered instead of reported as malformed.
fn probe(encoding: &'static Encoding, sample: &[u8]) -> Option<String> {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let capacity = decoder.max_utf8_buffer_length_without_replacement(sample.len())?;
    let mut text = String::with_capacity(capacity);
    let (result, _) = decoder.decode_to_string_without_replacement(sample, &mut text, false);
    match result {
        DecoderResult::InputEmpty => Some(text),
        _ => None,
    }
}

/// True when decoded text looks like Russian: at least one lower-case
/// Cyrillic letter and no replacement marker.
pub fn looks_like_cyrillic(text: &str) -> bool {
    !text.contains('\u{FFFD}') && text.chars().any(is_russian_lowercase)
}

fn is_russian_lowercase(c: char) -> bool {
    matches!(c, 'а'..='я' | 'ё')
}

/// How Russian a decoded sample reads: lower-case letters over all non-ASCII
/// characters. Russian text is mostly lower case, while a wrong single-byte
/// code page swaps case or maps letters onto symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyrillicScore {
    pub lowercase: usize,
    pub non_ascii: usize,
}

impl CyrillicScore {
    pub fn of(text: &str) -> Self {
        text.chars()
            .filter(|c| !c.is_ascii())
            .fold(Self { lowercase: 0, non_ascii: 0 }, |score, c| Self {
                lowercase: score.lowercase + usize::from(is_russian_lowercase(c)),
                non_ascii: score.non_ascii + 1,
            })
    }

    /// Strictly higher share than `other`.
    pub fn beats(&self, other: &Self) -> bool {
        self.lowercase * other.non_ascii > other.lowercase * self.non_ascii
    }
}

/// Pick the encoding of `sample`.
///
/// A strict UTF-8 decode into Cyrillic text wins outright. Otherwise every
/// single-byte candidate that yields Cyrillic is scored and the best share
/// wins; on a tie the earlier candidate is kept.
pub fn detect_encoding(sample: &[u8]) -> Option<&'static Encoding> {
    let sample = sample.strip_prefix(UTF8_BOM).unwrap_or(sample);
    let mut best: Option<(&'static Encoding, CyrillicScore)> = None;

    for encoding in candidate_encodings() {
        let Some(text) = probe(encoding, sample) else {
            continue;
        };
        if !looks_like_cyrillic(&text) {
            continue;
        }
        if encoding == UTF_8 {
            return Some(UTF_8);
        }
        let score = CyrillicScore::of(&text);
        match best {
            Some((_, current)) if !score.beats(&current) => {}
            _ => best = Some((encoding, score)),
        }
    }

    best.map(|(encoding, _)| encoding)
}

/// Read a sample from `path` and detect its encoding.
pub fn detect_file_encoding(path: &Path) -> Result<&'static Encoding> {
    let file = File::open(path).map_err(|source| read_error(path, source))?;
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    file.take(SAMPLE_SIZE as u64)
        .read_to_end(&mut sample)
        .map_err(|source| read_error(path, source))?;

    detect_encoding(&sample).ok_or_else(|| ConvertError::UndetectableEncoding(path.to_path_buf()))
}

/// Read the whole file and decode it with the detected encoding.
pub fn read_source(path: &Path) -> Result<(String, &'static Encoding)> {
    if !path.exists() {
        return Err(ConvertError::InputNotFound(path.to_path_buf()));
    }

    let encoding = detect_file_encoding(path)?;
    tracing::info!("Detected encoding: {}", encoding.name());

    let bytes = std::fs::read(path).map_err(|source| read_error(path, source))?;
    let (text, had_errors) = encoding.decode_with_bom_removal(&bytes);
    if had_errors {
        tracing::warn!(
            "Input {} contains sequences invalid in {}; they were replaced",
            path.display(),
            encoding.name()
        );
    }

    Ok((text.into_owned(), encoding))
}

fn read_error(path: &Path, source: std::io::Error) -> ConvertError {
    ConvertError::Read {
        path: path.to_path_buf(),
        source,
    }
}
