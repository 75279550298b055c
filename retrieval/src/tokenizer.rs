/// Split a raw query into whitespace-delimited tokens.
///
/// Blank input yields no tokens, which callers treat as "match nothing".
/// Any other input yields at least one token.
pub fn tokenize(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let tokens: Vec<String> = trimmed.split_whitespace().map(str::to_string).collect();
    if tokens.is_empty() {
        vec![trimmed.to_string()]
    } else {
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_input_has_no_tokens() {
        assert_eq!(tokenize(""), Vec::<String>::new());
        assert_eq!(tokenize("   \t\n "), Vec::<String>::new());
    }

    #[test]
    fn test_splits_on_any_whitespace() {
        assert_eq!(tokenize("  brown\tfox \n jumps "), vec!["brown", "fox", "jumps"]);
    }

    #[test]
    fn test_single_word_and_punctuation_kept() {
        assert_eq!(tokenize("fox"), vec!["fox"]);
        assert_eq!(tokenize("100% a_b"), vec!["100%", "a_b"]);
    }
}
