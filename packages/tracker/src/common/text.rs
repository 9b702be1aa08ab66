/// Normalize a job title for matching.
///
/// - Convert to lowercase
/// - Collapse runs of whitespace into single spaces
/// - Trim leading/trailing whitespace
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut a string to at most `max` characters without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_title("  IT   Specialist\t(INFOSEC) "), "it specialist (infosec)");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title(" \n\t "), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("short", 80), "short");
    }
}
