//! Title Normalizer — canonicalizes free-text job titles into index keys.
//!
//! Total and idempotent: `normalize(normalize(x)) == normalize(x)` for every input.

/// Leading list markers scraped feeds like to prepend to titles.
const BULLET_MARKERS: &[char] = &['-', '*', '•', '–', '—', '·', '>', '+', '#', '~'];

/// Separators that introduce a trailing location/qualifier clause.
const CLAUSE_SEPARATORS: &[&str] = &[" - ", " – ", " — ", " | "];

const HONORIFICS: &[&str] = &["mr", "ms", "mrs", "dr", "engr", "jr", "sr", "ii", "iii"];

const QUALIFIERS: &[&str] = &[
    "senior",
    "junior",
    "lead",
    "principal",
    "trainee",
    "intern",
    "fulltime",
    "parttime",
    "contract",
    "contractual",
    "temporary",
    "permanent",
    "casual",
    "seasonal",
    "remote",
    "hybrid",
    "onsite",
    "urgent",
];

/// Two-token qualifiers, matched after punctuation has been collapsed
/// ("full-time" -> "full time").
const QUALIFIER_PAIRS: &[(&str, &str)] = &[("full", "time"), ("part", "time"), ("on", "site")];

/// Normalizes a raw job title into a matching key.
///
/// Steps: lowercase, strip leading bullets, drop bracketed and dash-appended
/// clauses, collapse punctuation, drop honorifics/qualifiers/level codes,
/// collapse whitespace. Falls back to the lowercase-trimmed original when
/// nothing is left; blank input yields an empty string.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let fallback = lowered.trim();

    let without_bullets = fallback.trim_start_matches(|c: char| {
        BULLET_MARKERS.contains(&c) || c.is_whitespace()
    });
    let without_brackets = strip_bracketed(without_bullets);
    let head = strip_trailing_clause(&without_brackets);

    let collapsed: String = head
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let tokens = strip_qualifiers(collapsed.split_whitespace().collect());

    if tokens.is_empty() {
        return fallback.to_string();
    }
    tokens.join(" ")
}

/// Splits a normalized (or any) text into whitespace-separated words.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Lowercases and collapses punctuation without removing any qualifier.
/// Used for context checks on the original title.
pub fn simplify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes every `(...)` and `[...]` group. An unclosed bracket swallows the rest.
fn strip_bracketed(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Keeps only the part before the first clause separator, if that part is non-blank.
fn strip_trailing_clause(text: &str) -> &str {
    let cut = CLAUSE_SEPARATORS
        .iter()
        .filter_map(|sep| text.find(sep))
        .min();
    match cut {
        Some(idx) if !text[..idx].trim().is_empty() => &text[..idx],
        _ => text,
    }
}

/// Repeatedly drops qualifier tokens until a pass removes nothing. Removing a
/// token can bring a qualifier pair together ("full senior time"), hence the loop.
fn strip_qualifiers(mut tokens: Vec<&str>) -> Vec<&str> {
    loop {
        let before = tokens.len();
        let mut kept: Vec<&str> = Vec::with_capacity(before);
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            if let Some(&next) = tokens.get(i + 1) {
                if QUALIFIER_PAIRS.contains(&(token, next)) {
                    i += 2;
                    continue;
                }
            }
            if !is_droppable(token) {
                kept.push(token);
            }
            i += 1;
        }
        tokens = kept;
        if tokens.len() == before {
            return tokens;
        }
    }
}

fn is_droppable(token: &str) -> bool {
    HONORIFICS.contains(&token) || QUALIFIERS.contains(&token) || is_level_code(token)
}

/// Letters followed by digits, e.g. `nc2`, `level3`.
fn is_level_code(token: &str) -> bool {
    let split = token.find(|c: char| c.is_ascii_digit());
    match split {
        Some(idx) if idx > 0 => {
            token[..idx].chars().all(|c| c.is_ascii_lowercase())
                && token[idx..].chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}
