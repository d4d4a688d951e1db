//! Normalization of delimited upstream fields.

/// Separator used by the upstream catalog for multi-valued text fields.
pub const FIELD_DELIMITER: char = ';';

/// Split a semicolon-delimited upstream field into trimmed segments.
///
/// Blank segments are dropped, so an empty input yields an empty list rather
/// than a list holding one empty string. Applying this to the joined output
/// gives the same list back.
pub fn split_delimited(raw: &str) -> Vec<String> {
    raw.split(FIELD_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_each_segment() {
        assert_eq!(
            split_delimited("Single Player; Multiplayer "),
            vec!["Single Player", "Multiplayer"]
        );
    }

    #[test]
    fn empty_input_is_empty_list() {
        assert!(split_delimited("").is_empty());
        assert!(split_delimited("   ").is_empty());
    }

    #[test]
    fn drops_blank_segments() {
        assert_eq!(split_delimited("en;; ja ;"), vec!["en", "ja"]);
    }

    #[test]
    fn idempotent_over_join() {
        let once = split_delimited(" en ; fr;de ");
        let twice = split_delimited(&once.join("; "));
        assert_eq!(once, twice);
    }
}
