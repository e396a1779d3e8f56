use std::borrow::Cow;
use std::collections::HashSet;

/// Strips generic marketing words from card names before layout.
///
/// The stripped vocabulary is plain data: tokens are compared
/// case-insensitively after trimming surrounding punctuation. Names with no
/// denylisted token come back borrowed and byte-identical, and a name made
/// only of denylisted tokens is kept whole.
#[derive(Debug, Clone, Default)]
pub struct NameShortener {
    denylist: HashSet<String>,
}

impl NameShortener {
    #[must_use]
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            denylist: words
                .into_iter()
                .map(|word| word.as_ref().trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_denied(&self, token: &str) -> bool {
        let core = token.trim_matches(|c: char| !c.is_alphanumeric());
        !core.is_empty() && self.denylist.contains(&core.to_lowercase())
    }

    #[must_use]
    pub fn shorten<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if !name.split_whitespace().any(|token| self.is_denied(token)) {
            return Cow::Borrowed(name);
        }

        let kept: Vec<&str> = name
            .split_whitespace()
            .filter(|token| !self.is_denied(token))
            .collect();
        if kept.is_empty() {
            return Cow::Borrowed(name);
        }
        Cow::Owned(kept.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::NameShortener;

    fn shortener() -> NameShortener {
        NameShortener::new(["Premium", "Card", "Signature", "credit"])
    }

    #[test]
    fn strips_denylisted_words_case_insensitively() {
        assert_eq!(
            shortener().shorten("HDFC Regalia PREMIUM Credit Card"),
            "HDFC Regalia"
        );
        assert_eq!(shortener().shorten("Axis (Signature) Ace"), "Axis Ace");
    }

    #[test]
    fn names_without_matches_are_untouched() {
        let name = "  SBI   SimplyCLICK ";
        let shortened = shortener().shorten(name);
        assert!(matches!(shortened, Cow::Borrowed(_)));
        assert_eq!(shortened, name);
    }

    #[test]
    fn substrings_are_not_stripped() {
        assert_eq!(shortener().shorten("Cardinal Rewards"), "Cardinal Rewards");
    }

    #[test]
    fn all_generic_name_is_kept() {
        assert_eq!(shortener().shorten("Premium Card"), "Premium Card");
    }
}
