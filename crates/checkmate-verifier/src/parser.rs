//! Extract the verdict marker from model text
//!
//! Grammar, matched case-insensitively:
//!
//! ```text
//! bracketed := "[" ws* "verdict" ws* ":" ws* value ws* "]" punct?
//!              value runs up to the closing bracket or a newline;
//!              surrounding quotes and one trailing period are dropped
//! bare      := "verdict" ws* ":" ws* quote? word quote? punct?
//!              word is "partially true" or a run of characters that are
//!              not whitespace, '.', ']' or a quote
//! punct     := "." | ":" | ";" | ","
//! ```
//!
//! The bracketed form is tried first. The first match is removed from the
//! text (brackets and the punctuation closing the marker included) and the
//! remainder, trimmed, is the analysis.

use lazy_static::lazy_static;
use regex::Regex;

/// Token reported when no marker is found
pub const UNCLEAR_TOKEN: &str = "unclear";

lazy_static! {
    static ref BRACKETED_MARKER: Regex =
        Regex::new(r"(?i)\[\s*verdict\s*:([^\]\n]*)\][.:;,]?").expect("bracketed verdict pattern");
    static ref BARE_MARKER: Regex = Regex::new(
        r#"(?i)verdict\s*:\s*["']?(partially[ \t-]+true|[^\s.\]"']+)["']?[.:;,]?"#
    )
    .expect("bare verdict pattern");
}

/// Verdict token and analysis parsed from model text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVerdict {
    /// Marker value, lower-cased with whitespace collapsed
    pub result: String,
    /// Text with the marker removed
    pub analysis: String,
}

/// Parse model output into a verdict token and analysis
///
/// Without a marker the token is `unclear` and the analysis is the input,
/// unmodified.
///
/// # Examples
///
/// ```
/// use checkmate_verifier::parse_verdict;
///
/// let parsed = parse_verdict("[VERDICT: True] Confirmed by multiple sources.");
/// assert_eq!(parsed.result, "true");
/// assert_eq!(parsed.analysis, "Confirmed by multiple sources.");
/// ```
pub fn parse_verdict(text: &str) -> ParsedVerdict {
    let found = find_marker(&BRACKETED_MARKER, text).or_else(|| find_marker(&BARE_MARKER, text));

    match found {
        Some((start, end, value)) => {
            let mut analysis = String::with_capacity(text.len());
            analysis.push_str(&text[..start]);
            analysis.push_str(&text[end..]);
            ParsedVerdict {
                result: value,
                analysis: analysis.trim().to_string(),
            }
        }
        None => ParsedVerdict {
            result: UNCLEAR_TOKEN.to_string(),
            analysis: text.to_string(),
        },
    }
}

/// Byte range of the first usable marker and its normalized value
fn find_marker(pattern: &Regex, text: &str) -> Option<(usize, usize, String)> {
    pattern.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let value = normalize_value(caps.get(1)?.as_str());
        if value.is_empty() {
            None
        } else {
            Some((whole.start(), whole.end(), value))
        }
    })
}

fn normalize_value(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_end_matches('.')
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_end_matches('.')
        .trim();
    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
