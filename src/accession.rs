// Accession extraction from alignment target ids
use anyhow::{Context, Result};
use regex::Regex;

/// RefSeq-style target ids: `ref|NC_000913.3|` with a 1-2 letter prefix
/// and a 1-2 digit version suffix. The capture is the accession without
/// its version.
const REFSEQ_PATTERN: &str = r"ref\|([A-Za-z]{1,2}_[0-9A-Za-z]+)\.\d{1,2}\|";

/// Compiled pattern used to pull the accession out of a raw target id.
#[derive(Debug, Clone)]
pub struct AccessionPattern {
    regex: Regex,
}

impl AccessionPattern {
    /// The canonical pattern recognized by this tool.
    pub fn refseq() -> Result<Self> {
        Self::new(REFSEQ_PATTERN)
    }

    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("invalid accession pattern: {pattern}"))?;
        Ok(Self { regex })
    }

    /// Extract the accession from a target id. `None` means the target id
    /// does not carry a recognizable accession; callers must treat that as
    /// a distinct failure and never use it as a lookup key.
    pub fn extract<'t>(&self, target: &'t str) -> Option<&'t str> {
        self.regex
            .captures(target)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_refseq_accession() {
        let pattern = AccessionPattern::refseq().unwrap();
        assert_eq!(pattern.extract("ref|NC_000001.1|"), Some("NC_000001"));
        assert_eq!(pattern.extract("ref|NC_000913.3|"), Some("NC_000913"));
    }

    #[test]
    fn test_extracts_from_composite_target_id() {
        let pattern = AccessionPattern::refseq().unwrap();
        assert_eq!(
            pattern.extract("gi|556503834|ref|NC_000913.3|"),
            Some("NC_000913")
        );
    }

    #[test]
    fn test_two_letter_prefix_and_two_digit_version() {
        let pattern = AccessionPattern::refseq().unwrap();
        assert_eq!(
            pattern.extract("ref|NZ_ABCD01000001.12|"),
            Some("NZ_ABCD01000001")
        );
    }

    #[test]
    fn test_missing_version_fails_extraction() {
        let pattern = AccessionPattern::refseq().unwrap();
        assert_eq!(pattern.extract("ref|XX_badformat"), None);
    }

    #[test]
    fn test_unrelated_target_fails_extraction() {
        let pattern = AccessionPattern::refseq().unwrap();
        assert_eq!(pattern.extract("contig_42"), None);
        assert_eq!(pattern.extract(""), None);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(AccessionPattern::new("ref|(").is_err());
    }
}
