//! Language utilities for ISO language code handling
//!
//! Codes are ISO 639-1 (2-letter) or ISO 639-2 (3-letter), optionally followed
//! by a region subtag as in `pt-BR` or `en_US`.

use anyhow::{Result, anyhow};
use isolang::Language;

/// ISO 639-2/B codes that differ from their 639-2/T form
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Split `pt-BR` into (`pt`, Some(`BR`))
pub fn split_region(code: &str) -> (&str, Option<&str>) {
    let code = code.trim();
    match code.split_once(['-', '_']) {
        Some((base, region)) if !region.is_empty() => (base, Some(region)),
        Some((base, _)) => (base, None),
        None => (code, None),
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let (base, _) = split_region(code);
    let normalized_code = base.to_lowercase();

    match normalized_code.len() {
        2 => {
            if let Some(lang) = Language::from_639_1(&normalized_code) {
                return Ok(lang.to_639_3().to_string());
            }
        }
        3 => {
            if Language::from_639_3(&normalized_code).is_some() {
                return Ok(normalized_code);
            }
            if let Some((_, part2t)) = PART2B_TO_PART2T.iter().find(|(b, _)| *b == normalized_code) {
                return Ok(part2t.to_string());
            }
        }
        _ => {}
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Validate a language code, with or without region subtag
pub fn validate_language_code(code: &str) -> Result<()> {
    normalize_to_part2t(code).map(|_| ())
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Human-readable description for prompts: `Portuguese (BR)` for `pt-BR`.
///
/// Unknown codes are returned as given so a custom label still reaches the
/// model.
pub fn describe_language(code: &str) -> String {
    let (_, region) = split_region(code);
    match (get_language_name(code), region) {
        (Ok(name), Some(region)) => format!("{} ({})", name, region.to_uppercase()),
        (Ok(name), None) => name,
        (Err(_), _) => code.trim().to_string(),
    }
}
