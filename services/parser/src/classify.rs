//! Row classification: category and finer type code.
//!
//! The phrase and prefix tables are plain data, `(pattern, code)` pairs
//! checked top to bottom. More specific phrases must come before the phrases
//! they contain ("муниципальный район" before "район", "поселок" before
//! "село"). All matching is done on a lower-cased copy of the name.

use serde::{Serialize, Serializer};

/// Header marker for section rows
pub const SECTION_MARKER: &str = "Раздел";
/// Phrase of the municipal-formations section
pub const MUNICIPAL_PHRASE: &str = "Муниципальные образования";
/// Phrase of the settlements section
pub const SETTLEMENT_PHRASE: &str = "Населенные пункты";

/// Type code for names no rule recognizes
pub const UNKNOWN_TYPE: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Category {
    /// Region header row
    Section = 0,
    /// Municipal formation (8-digit code)
    Municipal = 1,
    /// Settlement (11-digit code)
    Settlement = 2,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Section, Category::Municipal, Category::Settlement];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Section => "Раздел",
            Category::Municipal => "Муниципальное образование",
            Category::Settlement => "Населенный пункт",
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

// =============================================================================
// RULE TABLES
// =============================================================================

/// Municipal formation kinds, matched as substrings
pub const MUNICIPAL_RULES: &[(&str, u8)] = &[
    ("внутригородской район", 6),
    ("муниципальный район", 2),
    ("муниципальный округ", 3),
    ("городской округ с внутригородским делением", 5),
    ("городской округ", 4),
    ("городское поселение", 7),
    ("сельское поселение", 8),
    ("сельсовет", 8),
    ("внутригородская территория", 9),
    ("внутригородское муниципальное образование", 9),
    ("межселенная территория", 10),
    ("район", 2),
    ("город ", 4),
];

/// Settlement abbreviations, matched as name prefixes
pub const SETTLEMENT_PREFIX_RULES: &[(&str, u8)] = &[
    ("ж/д ст ", 20),
    ("ж/д станция ", 20),
    ("ж/д рзд ", 22),
    ("ж/д оп ", 23),
    ("ж/д казарма ", 24),
    ("ж/д будка ", 24),
    ("ст-ца ", 14),
    ("пгт ", 2),
    ("рп ", 3),
    ("кп ", 4),
    ("дп ", 5),
    ("рзд ", 22),
    ("ст ", 21),
    ("аул ", 15),
    ("сл ", 16),
    ("город ", 1),
    ("г ", 1),
    ("село ", 10),
    ("с ", 10),
    ("деревня ", 11),
    ("д ", 11),
    ("поселок ", 12),
    ("пос ", 12),
    ("п ", 12),
    ("хутор ", 13),
    ("х ", 13),
    ("станица ", 14),
];

/// Spelled-out settlement kinds, matched as substrings when no prefix hits
pub const SETTLEMENT_KEYWORD_RULES: &[(&str, u8)] = &[
    ("поселок городского типа", 2),
    ("рабочий поселок", 3),
    ("курортный поселок", 4),
    ("дачный поселок", 5),
    ("железнодорожная станция", 20),
    ("разъезд", 22),
    ("остановочный пункт", 23),
    ("казарма", 24),
    ("станция", 21),
    ("станица", 14),
    ("хутор", 13),
    ("деревня", 11),
    ("поселок", 12),
    ("село", 10),
    ("город", 1),
];

pub const MUNICIPAL_TYPE_LABELS: &[(u8, &str)] = &[
    (0, "Не определен"),
    (2, "Муниципальный район"),
    (3, "Муниципальный округ"),
    (4, "Городской округ"),
    (5, "Городской округ с внутригородским делением"),
    (6, "Внутригородской район"),
    (7, "Городское поселение"),
    (8, "Сельское поселение"),
    (9, "Внутригородская территория"),
    (10, "Межселенная территория"),
];

pub const SETTLEMENT_TYPE_LABELS: &[(u8, &str)] = &[
    (0, "Не определен"),
    (1, "Город"),
    (2, "Поселок городского типа"),
    (3, "Рабочий поселок"),
    (4, "Курортный поселок"),
    (5, "Дачный поселок"),
    (10, "Село"),
    (11, "Деревня"),
    (12, "Поселок"),
    (13, "Хутор"),
    (14, "Станица"),
    (15, "Аул"),
    (16, "Слобода"),
    (20, "Железнодорожная станция"),
    (21, "Станция"),
    (22, "Разъезд"),
    (23, "Остановочный пункт"),
    (24, "Железнодорожная казарма"),
];

fn first_prefix(rules: &[(&str, u8)], lowered: &str) -> Option<u8> {
    rules
        .iter()
        .find(|(pattern, _)| lowered.starts_with(*pattern))
        .map(|&(_, code)| code)
}

fn first_contains(rules: &[(&str, u8)], lowered: &str) -> Option<u8> {
    rules
        .iter()
        .find(|(pattern, _)| lowered.contains(*pattern))
        .map(|&(_, code)| code)
}

// =============================================================================
// CLASSIFIERS
// =============================================================================

/// Decide the category of a row.
///
/// Header text is checked before the explicit flag because header rows may
/// carry a stale or empty flag.
pub fn classify_category(name: &str, section_flag: &str) -> Category {
    let is_section = name.contains(SECTION_MARKER);
    let has_municipal = name.contains(MUNICIPAL_PHRASE);
    let has_settlements = name.contains(SETTLEMENT_PHRASE);

    // Both header variants: municipal formations and settlements
    if is_section && (has_municipal || has_settlements) {
        Category::Section
    } else if section_flag == "1" {
        Category::Municipal
    } else if section_flag == "2" {
        Category::Settlement
    } else {
        Category::Section
    }
}

/// Municipal formation kind from the name, [`UNKNOWN_TYPE`] when unmatched.
pub fn municipal_type(name: &str) -> u8 {
    first_contains(MUNICIPAL_RULES, &name.to_lowercase()).unwrap_or(UNKNOWN_TYPE)
}

/// Settlement kind from the name: prefixes first, then spelled-out keywords.
pub fn settlement_type(name: &str) -> u8 {
    let lowered = name.to_lowercase();
    first_prefix(SETTLEMENT_PREFIX_RULES, &lowered)
        .or_else(|| first_contains(SETTLEMENT_KEYWORD_RULES, &lowered))
        .unwrap_or(UNKNOWN_TYPE)
}

/// Type code for a row of the given category. Section rows have none.
pub fn type_code(category: Category, name: &str) -> u8 {
    match category {
        Category::Section => UNKNOWN_TYPE,
        Category::Municipal => municipal_type(name),
        Category::Settlement => settlement_type(name),
    }
}

/// Compact-layout administrative centre heuristic: the centre field and the
/// name contain one another, case-insensitively.
pub fn is_admin_center(name: &str, center: &str) -> bool {
    if center.is_empty() || name.is_empty() {
        return false;
    }
    let name = name.to_lowercase();
    let center = center.to_lowercase();
    name.contains(&center) || center.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // CATEGORY
    // -------------------------------------------------------------------------

    #[test]
    fn test_municipal_section_header() {
        let name = "Раздел 1. Муниципальные образования Алтайского края";
        assert_eq!(classify_category(name, "1"), Category::Section);
        assert_eq!(classify_category(name, ""), Category::Section);
    }

    #[test]
    fn test_settlement_section_header_ignores_flag() {
        let name = "Раздел 2. Населенные пункты, входящие в состав муниципальных образований Алтайского края";
        assert_eq!(classify_category(name, "2"), Category::Section);
    }

    #[test]
    fn test_header_with_both_phrases() {
        let name = "Раздел 2. Населенные пункты. Муниципальные образования";
        assert_eq!(classify_category(name, "1"), Category::Section);
    }

    #[test]
    fn test_flag_decides_regular_rows() {
        assert_eq!(classify_category("Зеркальное сельское поселение", "1"), Category::Municipal);
        assert_eq!(classify_category("г Смоленск", "2"), Category::Settlement);
    }

    #[test]
    fn test_unknown_flag_defaults_to_section() {
        assert_eq!(classify_category("Что-то", ""), Category::Section);
        assert_eq!(classify_category("Что-то", "3"), Category::Section);
    }

    #[test]
    fn test_phrase_without_marker_uses_flag() {
        assert_eq!(
            classify_category("Муниципальные образования Алтайского края", "1"),
            Category::Municipal
        );
    }

    #[test]
    fn test_category_codes_and_labels() {
        assert_eq!(Category::Section.code(), 0);
        assert_eq!(Category::Municipal.code(), 1);
        assert_eq!(Category::Settlement.code(), 2);
        assert_eq!(Category::Settlement.label(), "Населенный пункт");
        assert_eq!(serde_json::to_string(&Category::Municipal).unwrap(), "1");
    }

    // -------------------------------------------------------------------------
    // MUNICIPAL TYPES
    // -------------------------------------------------------------------------

    #[test]
    fn test_municipal_types() {
        assert_eq!(municipal_type("Зеркальное сельское поселение"), 8);
        assert_eq!(municipal_type("Алейский муниципальный район"), 2);
        assert_eq!(municipal_type("Белокурихинский муниципальный округ"), 3);
        assert_eq!(municipal_type("Городской округ город Барнаул"), 4);
        assert_eq!(municipal_type("Заринское городское поселение"), 7);
        assert_eq!(municipal_type("Кировский внутригородской район"), 6);
    }

    #[test]
    fn test_specific_phrase_wins_over_generic() {
        assert_eq!(
            municipal_type("Городской округ с внутригородским делением город Самара"),
            5
        );
        assert_eq!(municipal_type("Центральный район"), 2);
    }

    #[test]
    fn test_unmatched_municipal_name() {
        assert_eq!(municipal_type("Остров Врангеля"), UNKNOWN_TYPE);
        assert_eq!(municipal_type(""), UNKNOWN_TYPE);
    }

    // -------------------------------------------------------------------------
    // SETTLEMENT TYPES
    // -------------------------------------------------------------------------

    #[test]
    fn test_city_prefix() {
        assert_eq!(settlement_type("г Смоленск"), 1);
        assert_eq!(settlement_type("Г Смоленск"), 1);
    }

    #[test]
    fn test_rural_prefixes() {
        assert_eq!(settlement_type("с Зеркальное"), 10);
        assert_eq!(settlement_type("д Ивановка"), 11);
        assert_eq!(settlement_type("п Новый"), 12);
        assert_eq!(settlement_type("х Лебяжий"), 13);
        assert_eq!(settlement_type("ст-ца Ленинградская"), 14);
        assert_eq!(settlement_type("аул Кош-Агач"), 15);
    }

    #[test]
    fn test_urban_type_prefixes() {
        assert_eq!(settlement_type("пгт Янтарный"), 2);
        assert_eq!(settlement_type("рп Тальменка"), 3);
    }

    #[test]
    fn test_rail_prefixes() {
        assert_eq!(settlement_type("ж/д ст Алтайская"), 20);
        assert_eq!(settlement_type("ст Озерки"), 21);
        assert_eq!(settlement_type("рзд Укладочный"), 22);
        assert_eq!(settlement_type("ж/д оп 105 км"), 23);
        assert_eq!(settlement_type("ж/д казарма 12 км"), 24);
    }

    #[test]
    fn test_keyword_fallback() {
        assert_eq!(settlement_type("Поселок Новый"), 12);
        assert_eq!(settlement_type("Новый поселок"), 12);
        assert_eq!(settlement_type("Старое село"), 10);
        assert_eq!(settlement_type("Станция Лесная"), 21);
    }

    #[test]
    fn test_unmatched_settlement_name() {
        assert_eq!(settlement_type("Заимка"), UNKNOWN_TYPE);
    }

    #[test]
    fn test_type_code_by_category() {
        assert_eq!(type_code(Category::Section, "г Смоленск"), UNKNOWN_TYPE);
        assert_eq!(type_code(Category::Settlement, "г Смоленск"), 1);
        assert_eq!(type_code(Category::Municipal, "Зеркальное сельское поселение"), 8);
    }

    #[test]
    fn test_every_rule_code_has_label() {
        for (_, code) in MUNICIPAL_RULES {
            assert!(MUNICIPAL_TYPE_LABELS.iter().any(|(c, _)| c == code), "code {}", code);
        }
        for (_, code) in SETTLEMENT_PREFIX_RULES.iter().chain(SETTLEMENT_KEYWORD_RULES) {
            assert!(SETTLEMENT_TYPE_LABELS.iter().any(|(c, _)| c == code), "code {}", code);
        }
    }

    // -------------------------------------------------------------------------
    // ADMIN CENTRE
    // -------------------------------------------------------------------------

    #[test]
    fn test_admin_center_heuristic() {
        assert!(is_admin_center("Зеркальное сельское поселение", "Зеркальное"));
        assert!(is_admin_center("Барнаул", "г Барнаул"));
        assert!(!is_admin_center("Алейский муниципальный район", "г Алейск"));
        assert!(!is_admin_center("с Зеркальное", ""));
    }
}
