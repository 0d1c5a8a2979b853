//! Identifier normalization.
//!
//! Every catalog lookup is keyed by an id: the name lowercased with
//! everything outside `[a-z0-9]` removed. `"Mr. Mime"` and `"mrmime"` are the
//! same species, `"U-turn"` and `"uturn"` the same move.

/// Normalize a display name into a lookup id.
///
/// Non-ASCII letters are dropped rather than transliterated, so accented
/// names collapse the same way on every side of a lookup.
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter_map(|c| {
            let c = c.to_ascii_lowercase();
            c.is_ascii_alphanumeric().then_some(c)
        })
        .collect()
}

/// Compare two names by id.
pub fn id_eq(a: &str, b: &str) -> bool {
    let mut lhs = a.chars().filter(char::is_ascii_alphanumeric).map(|c| c.to_ascii_lowercase());
    let mut rhs = b.chars().filter(char::is_ascii_alphanumeric).map(|c| c.to_ascii_lowercase());
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x == y => continue,
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_case() {
        assert_eq!(to_id("Mr. Mime"), "mrmime");
        assert_eq!(to_id("U-turn"), "uturn");
        assert_eq!(to_id("Porygon-Z"), "porygonz");
        assert_eq!(to_id("  Fire  "), "fire");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(to_id("Flabébé"), "flabb");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(to_id(""), "");
        assert_eq!(to_id("!!!"), "");
    }

    #[test]
    fn id_eq_matches_to_id() {
        assert!(id_eq("Mr. Mime", "mrmime"));
        assert!(id_eq("Farfetch'd", "FARFETCHD"));
        assert!(!id_eq("Mew", "Mewtwo"));
    }
}
