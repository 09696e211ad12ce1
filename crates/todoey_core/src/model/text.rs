//! Text normalization for user-entered names and titles, and the folding
//! used by title search.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Titlecases the first character and leaves the rest unchanged.
///
/// Empty input stays empty. When the uppercase form expands to several
/// characters (`ß` -> `SS`, `ﬁ` -> `FI`) only the first stays uppercase,
/// giving `Ss` and `Fi`.
pub fn capitalize_first_letter(value: &str) -> String {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut capitalized = String::with_capacity(value.len() + 2);
    match titlecase_digraph(first) {
        Some(title) => capitalized.push(title),
        None => {
            let mut upper = first.to_uppercase();
            capitalized.extend(upper.next());
            capitalized.extend(upper.flat_map(char::to_lowercase));
        }
    }
    capitalized.push_str(chars.as_str());
    capitalized
}

// Latin digraphs with a distinct titlecase form.
fn titlecase_digraph(ch: char) -> Option<char> {
    match ch {
        '\u{01C4}'..='\u{01C6}' => Some('\u{01C5}'),
        '\u{01C7}'..='\u{01C9}' => Some('\u{01C8}'),
        '\u{01CA}'..='\u{01CC}' => Some('\u{01CB}'),
        '\u{01F1}'..='\u{01F3}' => Some('\u{01F2}'),
        _ => None,
    }
}

/// Folds text for case- and diacritic-insensitive comparison.
///
/// Decomposes to NFKD, strips combining marks, then lowercases.
pub fn fold_for_search(value: &str) -> String {
    value
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns whether `haystack` contains `needle` ignoring case and
/// diacritics. An empty needle matches everything.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold_for_search(haystack).contains(fold_for_search(needle).as_str())
}

#[cfg(test)]
mod tests {
    use super::{capitalize_first_letter, contains_folded, fold_for_search};

    #[test]
    fn capitalize_touches_only_first_character() {
        assert_eq!(capitalize_first_letter("home"), "Home");
        assert_eq!(capitalize_first_letter("buy MILK"), "Buy MILK");
        assert_eq!(capitalize_first_letter("Work"), "Work");
        assert_eq!(capitalize_first_letter(""), "");
        assert_eq!(capitalize_first_letter("élan"), "Élan");
        assert_eq!(capitalize_first_letter("1st"), "1st");
    }

    #[test]
    fn capitalize_uses_titlecase_for_expanding_letters() {
        assert_eq!(capitalize_first_letter("ß"), "Ss");
        assert_eq!(capitalize_first_letter("ßtraße"), "Sstraße");
        assert_eq!(capitalize_first_letter("ﬁsh"), "Fish");
        assert_eq!(capitalize_first_letter("\u{01C6}ak"), "\u{01C5}ak");
        assert_eq!(capitalize_first_letter("\u{01C4}AK"), "\u{01C5}AK");
    }

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold_for_search("Crème Brûlée"), "creme brulee");
    }

    #[test]
    fn contains_folded_matches_across_case_and_accents() {
        assert!(contains_folded("Buy Bread", "buy"));
        assert!(contains_folded("Café order", "CAFE"));
        assert!(contains_folded("cafe order", "café"));
        assert!(!contains_folded("Call mom", "buy"));
        assert!(contains_folded("anything", ""));
    }
}
