//! Reference token grammars.
//!
//! - Bracket: `[[Name]]`, optionally prefixed `#[[Name]]`. The name is the
//!   shortest run between the brackets.
//! - Hashtag: `#word`, where `word` is one or more word characters.
//!
//! Tokens are trimmed; tokens that trim to nothing are skipped.

use std::sync::LazyLock;

use anylink_core::enums::ReferenceKind;
use regex::Regex;

static BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#?\[\[(.+?)\]\]").expect("bracket pattern is valid"));

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("hashtag pattern is valid"));

/// Full-text needle whose highlights carry tokens of `kind`.
#[must_use]
pub const fn sweep_query(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::Bracket => "[[ ]]",
        ReferenceKind::Hashtag => "#",
    }
}

/// Every `kind` token in `snippet`, in order of appearance.
#[must_use]
pub fn tokens(kind: ReferenceKind, snippet: &str) -> Vec<String> {
    match kind {
        ReferenceKind::Bracket => bracket_tokens(snippet),
        ReferenceKind::Hashtag => hashtag_tokens(snippet),
    }
}

#[must_use]
pub fn bracket_tokens(snippet: &str) -> Vec<String> {
    captures(&BRACKET, snippet)
}

#[must_use]
pub fn hashtag_tokens(snippet: &str) -> Vec<String> {
    captures(&HASHTAG, snippet)
}

fn captures(pattern: &Regex, snippet: &str) -> Vec<String> {
    pattern
        .captures_iter(snippet)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("See [[Alpha]] and [[Beta]]", &["Alpha", "Beta"])]
    #[case("tagged #[[Project X]] here", &["Project X"])]
    #[case("[[ padded ]]", &["padded"])]
    #[case("[[   ]] and [[Real]]", &["Real"])]
    #[case("[[a]]]] [[b]]", &["a", "b"])]
    #[case("no references", &[])]
    #[case("[[unterminated", &[])]
    fn bracket_grammar(#[case] snippet: &str, #[case] expected: &[&str]) {
        assert_eq!(bracket_tokens(snippet), expected);
    }

    #[rstest]
    #[case("#alpha and #beta_2", &["alpha", "beta_2"])]
    #[case("price # 10", &[])]
    #[case("#Ünïcode words", &["Ünïcode"])]
    #[case("#[[Alpha]]", &[])]
    #[case("end#tag", &["tag"])]
    fn hashtag_grammar(#[case] snippet: &str, #[case] expected: &[&str]) {
        assert_eq!(hashtag_tokens(snippet), expected);
    }

    #[test]
    fn tokens_dispatch_on_kind() {
        let snippet = "[[Alpha]] #beta";
        assert_eq!(tokens(ReferenceKind::Bracket, snippet), vec!["Alpha"]);
        assert_eq!(tokens(ReferenceKind::Hashtag, snippet), vec!["beta"]);
    }

    #[test]
    fn sweep_queries() {
        assert_eq!(sweep_query(ReferenceKind::Bracket), "[[ ]]");
        assert_eq!(sweep_query(ReferenceKind::Hashtag), "#");
    }
}
