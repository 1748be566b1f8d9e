use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Families of sequential, human-readable codes
///
/// Yearly kinds look like `B-2024-0001`; process sessions carry no year
/// segment and look like `proceso-003`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeKind {
    Bin,
    Preselection,
    PackedBox,
    Pallet,
    Dispatch,
    Process,
}

impl CodeKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Bin => "B",
            Self::Preselection => "LI",
            Self::PackedBox => "C",
            Self::Pallet => "P",
            Self::Dispatch => "D",
            Self::Process => "proceso",
        }
    }

    /// Zero-padding width of the numeric suffix
    pub fn width(&self) -> usize {
        match self {
            Self::Bin | Self::Pallet | Self::Dispatch => 4,
            Self::Preselection | Self::Process => 3,
            Self::PackedBox => 5,
        }
    }

    pub fn is_yearly(&self) -> bool {
        !matches!(self, Self::Process)
    }

    /// Year under which the counter is kept (0 for kinds without a year)
    pub fn sequence_year(&self, year: i32) -> i32 {
        if self.is_yearly() { year } else { 0 }
    }

    /// Everything before the numeric suffix, e.g. `B-2024-`
    pub fn scope_prefix(&self, year: i32) -> String {
        if self.is_yearly() {
            format!("{}-{}-", self.prefix(), year)
        } else {
            format!("{}-", self.prefix())
        }
    }

    pub fn format(&self, year: i32, seq: u32) -> String {
        format!(
            "{}{:0width$}",
            self.scope_prefix(year),
            seq,
            width = self.width()
        )
    }

    /// Extracts the numeric suffix of a previously issued code
    pub fn parse_sequence(&self, code: &str) -> Result<u32> {
        let parts: Vec<&str> = code.split('-').collect();
        let expected_parts = if self.is_yearly() { 3 } else { 2 };

        if parts.len() != expected_parts || parts[0] != self.prefix() {
            return Err(DomainError::MalformedCode(code.to_string()));
        }

        if self.is_yearly() && parts[1].parse::<i32>().is_err() {
            return Err(DomainError::MalformedCode(code.to_string()));
        }

        let suffix = parts[expected_parts - 1];
        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::MalformedCode(code.to_string()));
        }

        suffix
            .parse::<u32>()
            .map_err(|_| DomainError::MalformedCode(code.to_string()))
    }

    /// Next code given the highest code already issued under the same
    /// prefix and year, starting at 1 when there is none.
    pub fn next_after(&self, year: i32, last: Option<&str>) -> Result<String> {
        let seq = match last {
            Some(code) => self.parse_sequence(code)? + 1,
            None => 1,
        };
        Ok(self.format(year, seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_widths() {
        assert_eq!(CodeKind::Bin.format(2024, 1), "B-2024-0001");
        assert_eq!(CodeKind::Preselection.format(2024, 3), "LI-2024-003");
        assert_eq!(CodeKind::PackedBox.format(2024, 1), "C-2024-00001");
        assert_eq!(CodeKind::Pallet.format(2024, 4), "P-2024-0004");
        assert_eq!(CodeKind::Dispatch.format(2024, 1), "D-2024-0001");
        assert_eq!(CodeKind::Process.format(2024, 3), "proceso-003");
    }

    #[test]
    fn test_next_after_increments() {
        for kind in [CodeKind::Bin, CodeKind::Pallet, CodeKind::Dispatch] {
            let last = kind.format(2024, 7);
            assert_eq!(
                kind.next_after(2024, Some(&last)).unwrap(),
                kind.format(2024, 8)
            );
        }
        assert_eq!(
            CodeKind::Bin.next_after(2024, Some("B-2024-0007")).unwrap(),
            "B-2024-0008"
        );
    }

    #[test]
    fn test_new_year_restarts_at_one() {
        // Nothing issued under the new year's prefix yet
        assert_eq!(CodeKind::Bin.next_after(2025, None).unwrap(), "B-2025-0001");
        assert_eq!(
            CodeKind::Process.next_after(2025, Some("proceso-041")).unwrap(),
            "proceso-042"
        );
    }

    #[test]
    fn test_suffix_overflowing_width_still_parses() {
        assert_eq!(CodeKind::Bin.parse_sequence("B-2024-10000").unwrap(), 10000);
        assert_eq!(CodeKind::Bin.format(2024, 10001), "B-2024-10001");
    }

    #[test]
    fn test_malformed_codes_are_errors() {
        assert_eq!(
            CodeKind::Bin.parse_sequence("B-2024-X1"),
            Err(DomainError::MalformedCode("B-2024-X1".into()))
        );
        assert!(CodeKind::Bin.parse_sequence("C-2024-0001").is_err());
        assert!(CodeKind::Bin.parse_sequence("B-0001").is_err());
        assert!(CodeKind::Process.parse_sequence("proceso-2024-001").is_err());
        assert!(CodeKind::Bin.next_after(2024, Some("garbage")).is_err());
    }

    #[test]
    fn test_sequence_year() {
        assert_eq!(CodeKind::Bin.sequence_year(2024), 2024);
        assert_eq!(CodeKind::Process.sequence_year(2024), 0);
        assert_eq!(CodeKind::Process.scope_prefix(2024), "proceso-");
    }
}
