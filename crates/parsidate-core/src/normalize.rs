//! Digit and separator canonicalization.
//!
//! Date input in the primary target locale arrives with Persian or
//! Arabic-Indic digit glyphs, locale-specific decimal/thousands separators,
//! a zoo of Unicode dash and slash forms, and zero-width non-joiners between
//! words. [`normalize`] maps all of that to a canonical ASCII form while
//! leaving every other character (including non-Latin words next to the
//! numeric date) untouched. [`normalize_for_date`] additionally strips
//! everything the date grammar cannot consume, so an embedded word such as
//! "ساعت" does not break the matcher.
//!
//! Both functions are total and deterministic; they never fail.

/// Canonicalize digits, separators, and whitespace to ASCII.
///
/// - Persian (`U+06F0..U+06F9`) and Arabic-Indic (`U+0660..U+0669`) digits
///   become `'0'..'9'`.
/// - The Arabic decimal separator, Arabic thousands separator, and comma
///   become `'.'`.
/// - Full-width, fraction, and division slashes become `'/'`; Unicode dash
///   forms and the minus sign become `'-'`.
/// - Every whitespace-class character, plus the zero-width non-joiner,
///   becomes a single space; runs of spaces collapse and the ends are
///   trimmed.
/// - Any other character passes through unchanged.
///
/// # Examples
///
/// ```
/// use parsidate_core::normalize;
///
/// assert_eq!(normalize("۱۴۰۲/۰۵/۱۱"), "1402/05/11");
/// assert_eq!(normalize("١٢:٠٥"), "12:05");
/// ```
pub fn normalize(input: &str) -> String {
    let mapped: String = input.chars().map(canonical_char).collect();
    collapse_spaces(&mapped)
}

/// [`normalize`], then delete every character that is not a digit, `'/'`,
/// `'-'`, `'.'`, `':'`, or space.
///
/// Used strictly before date-pattern matching; deleting a word can merge
/// two space runs, so the result is collapsed and trimmed again.
pub fn normalize_for_date(input: &str) -> String {
    let kept: String = normalize(input)
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '/' | '-' | '.' | ':' | ' '))
        .collect();
    collapse_spaces(&kept)
}

fn canonical_char(ch: char) -> char {
    match ch {
        // Persian digit block
        '\u{06F0}'..='\u{06F9}' => ascii_digit(ch as u32 - 0x06F0),
        // Arabic-Indic digit block
        '\u{0660}'..='\u{0669}' => ascii_digit(ch as u32 - 0x0660),
        // Arabic decimal separator, Arabic thousands separator, comma
        '\u{066B}' | '\u{066C}' | ',' => '.',
        // Full-width, fraction, and division slashes
        '\u{FF0F}' | '\u{2044}' | '\u{2215}' => '/',
        // Hyphen through horizontal bar, plus the minus sign
        '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
        // Zero-width non-joiner joins words in Persian text but separates
        // tokens for our purposes
        '\u{200C}' => ' ',
        c if c.is_whitespace() => ' ',
        c => c,
    }
}

fn ascii_digit(value: u32) -> char {
    char::from(b'0' + value as u8)
}

fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch == ' ' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
