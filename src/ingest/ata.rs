//! ATA chapter extraction from task identifiers.

use std::sync::LazyLock;

use regex::Regex;

static ATA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{2}(?:-\d{2}){0,2}").expect("ATA pattern is a valid regex")
});

/// First `NN`, `NN-NN` or `NN-NN-NN` group in the identifier.
///
/// `"212100-01"` gives `"21"` (no dash right after the first pair), while
/// `"TASK 32-11-05"` gives `"32-11-05"`.
pub fn extract_ata(task_id: &str) -> Option<String> {
    ATA_PATTERN.find(task_id).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashed_chapter_section_subject() {
        assert_eq!(extract_ata("32-11-05-200-801").as_deref(), Some("32-11-05"));
        assert_eq!(extract_ata("TASK 32-11-05").as_deref(), Some("32-11-05"));
    }

    #[test]
    fn test_partial_dash_groups() {
        assert_eq!(extract_ata("05-51").as_deref(), Some("05-51"));
        assert_eq!(extract_ata("212100-01").as_deref(), Some("21"));
    }

    #[test]
    fn test_no_digit_pair_means_no_chapter() {
        assert_eq!(extract_ata("ZONAL-A"), None);
        assert_eq!(extract_ata("A1B2"), None);
        assert_eq!(extract_ata(""), None);
    }
}
