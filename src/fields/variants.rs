// ABOUTME: Naming-convention variant generation for data record keys
// ABOUTME: Maps one key to the fixed list of spellings a template author might have typed

use indexmap::IndexSet;

const HYPHEN: char = '-';
const UNDERSCORE: char = '_';

/// Every spelling of `key` that should resolve to the key's value.
///
/// The list is fixed and ordered:
///
/// | form | `firstName` |
/// |------|-------------|
/// | lower-case | `firstname` |
/// | original | `firstName` |
/// | capitalized | `FirstName` |
/// | capitalized lower-case | `Firstname` |
/// | hyphenated, then its capitalized, title-cased and second-segment forms | `first-name`, `First-name`, `First-Name`, `first-Name` |
/// | the same four with underscores | `first_name`, `First_name`, `First_Name`, `first_Name` |
/// | screaming snake case | `FIRST_NAME` |
///
/// Duplicates are removed, keeping the first occurrence, so a key without
/// upper-case letters yields a short list.
pub fn key_variants(key: &str) -> Vec<String> {
    let lower = key.to_lowercase();

    let mut variants = IndexSet::new();
    variants.insert(lower.clone());
    variants.insert(key.to_string());
    variants.insert(capitalize(key));
    variants.insert(capitalize(&lower));

    for separator in [HYPHEN, UNDERSCORE] {
        let delimited = delimit(key, separator);
        variants.extend(delimited_forms(&delimited, separator));
    }

    variants.insert(delimit(key, UNDERSCORE).to_uppercase());

    variants.into_iter().collect()
}

/// Upper-case the first character, leaving the rest untouched.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split camel case at each internal upper-case letter and lower-case the result.
fn delimit(key: &str, separator: char) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (index, ch) in key.chars().enumerate() {
        if index > 0 && ch.is_uppercase() {
            out.push(separator);
        }
        out.extend(ch.to_lowercase());
    }
    out
}

fn delimited_forms(delimited: &str, separator: char) -> Vec<String> {
    let segments: Vec<&str> = delimited.split(separator).collect();
    let joiner = separator.to_string();

    let mut forms = vec![
        delimited.to_string(),
        capitalize(delimited),
        segments
            .iter()
            .map(|segment| capitalize(segment))
            .collect::<Vec<_>>()
            .join(&joiner),
    ];

    if segments.len() > 1 {
        let mut second = Vec::with_capacity(segments.len());
        second.push(segments[0].to_string());
        second.push(capitalize(segments[1]));
        second.extend(segments[2..].iter().map(|s| s.to_string()));
        forms.push(second.join(&joiner));
    }

    forms
}
