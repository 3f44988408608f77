use regex::Regex;
use std::sync::OnceLock;

static FILE_CODE_REGEX: OnceLock<Regex> = OnceLock::new();

// Bounded to 2-4 characters. The author resolver uses an unbounded
// variant; the two are intentionally separate rules.
fn file_code_regex() -> &'static Regex {
    FILE_CODE_REGEX.get_or_init(|| Regex::new("([a-z0-9]{2,4})@").unwrap())
}

/// Extracts the feature code from a raw feed author string, e.g.
/// "ab12@get.creators.com (Jane Doe)" -> "ab12". Returns None when the
/// string has no recognizable code; such items are skipped.
pub fn extract_file_code(author: &str) -> Option<String> {
    file_code_regex()
        .captures(author)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::extract_file_code;

    #[test]
    fn it_extracts_the_code_before_the_at_sign() {
        assert_eq!(
            extract_file_code("ab12@get.creators.com (Jane Doe)"),
            Some("ab12".to_string())
        );
        assert_eq!(extract_file_code("zz@get.creators.com"), Some("zz".to_string()));
    }

    #[test]
    fn it_skips_strings_without_a_code() {
        assert_eq!(extract_file_code("Jane Doe"), None);
        assert_eq!(extract_file_code("A@get.creators.com"), None);
        assert_eq!(extract_file_code("@get.creators.com"), None);
    }

    #[test]
    fn it_keeps_at_most_four_characters() {
        // longer runs still match through the 2-4 character window
        assert_eq!(
            extract_file_code("abcdef@get.creators.com"),
            Some("cdef".to_string())
        );
    }
}
