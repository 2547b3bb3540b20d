//! Canonical form of genre and author names.
//!
//! Names are trimmed and title-cased per whitespace-delimited word. Only
//! whitespace starts a new word, so punctuation such as `_` or `-` stays
//! word-internal: `"author_one"` becomes `"Author_one"`. Stored tags already
//! follow this rule, so it must not change.

/// Normalize a raw tag name to its canonical form.
///
/// # Examples
///
/// ```
/// use bookshelf_core::tag_name::normalize_tag_name;
///
/// assert_eq!(normalize_tag_name("  fantasy  "), "Fantasy");
/// assert_eq!(normalize_tag_name("AUTHOR_TWO"), "Author_two");
/// assert_eq!(normalize_tag_name("science FICTION"), "Science Fiction");
/// ```
pub fn normalize_tag_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut canonical = String::with_capacity(trimmed.len());
    let mut at_word_start = true;

    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            canonical.push(ch);
        } else if at_word_start {
            at_word_start = false;
            canonical.push(ch.to_ascii_uppercase());
        } else {
            canonical.push(ch.to_ascii_lowercase());
        }
    }

    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_capitalizes() {
        assert_eq!(normalize_tag_name("  fantasy  "), "Fantasy");
        assert_eq!(normalize_tag_name("FANTASY"), "Fantasy");
        assert_eq!(normalize_tag_name("\tmemoir\n"), "Memoir");
    }

    #[test]
    fn underscores_are_word_internal() {
        assert_eq!(normalize_tag_name("  author_one  "), "Author_one");
        assert_eq!(normalize_tag_name("AUTHOR_TWO"), "Author_two");
    }

    #[test]
    fn each_whitespace_word_is_capitalized() {
        assert_eq!(normalize_tag_name("j. r. r. TOLKIEN"), "J. R. R. Tolkien");
        assert_eq!(normalize_tag_name("science   fiction"), "Science   Fiction");
    }

    #[test]
    fn digits_and_non_ascii_pass_through() {
        assert_eq!(normalize_tag_name("19th century"), "19th Century");
        assert_eq!(normalize_tag_name("émile zola"), "émile Zola");
    }

    #[test]
    fn empty_and_blank_input_normalize_to_empty() {
        assert_eq!(normalize_tag_name(""), "");
        assert_eq!(normalize_tag_name("   "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "  fantasy  ",
            "AUTHOR_TWO",
            "mIxEd CaSe words",
            "émile zola",
            "a  b\tc",
            "",
        ];
        for raw in samples {
            let once = normalize_tag_name(raw);
            assert_eq!(normalize_tag_name(&once), once, "not idempotent for {raw:?}");
        }
    }
}
