pub mod keywords;
pub mod language;
pub mod tagger;

/// Lowercased runs of Unicode letters and digits.
pub(crate) fn word_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}
