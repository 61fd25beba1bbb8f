//! Row-validity rules: junk patterns, position codes, and the admission policy.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name-cell patterns that mark page chrome rather than players.
pub const DEFAULT_JUNK_PATTERNS: &[&str] = &[
    // pandas-style NaN artifacts
    r"^\s*nan\s*$",
    // navigation bars: "A | B | C | D"
    r"\|",
    // repeated header text
    r"^\s*(name|names|player|players|player name)\s*$",
    // single-letter index links
    r"^\s*[a-z]\s*$",
    // page banners and footers
    r"players?\s+(list|index|directory|by letter)",
    r"out of the park",
    r"copyright|©|all rights reserved",
    r"^\s*(last updated|generated)\b",
    r"^\s*(home|back to top|top|next|previous|prev)\s*$",
];

/// Position abbreviations accepted as proof of a player row.
pub const DEFAULT_POSITION_CODES: &[&str] = &[
    "P", "SP", "RP", "CL", "MR", "C", "1B", "2B", "3B", "SS", "LF", "CF", "RF", "OF", "IF",
    "DH", "UT", "PH", "PR",
];

/// Compiled junk patterns, matched case-insensitively anywhere in the text.
#[derive(Debug, Clone)]
pub struct JunkPatterns {
    patterns: Vec<Regex>,
}

impl JunkPatterns {
    /// Compile a list of patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| RegexBuilder::new(p.as_ref()).case_insensitive(true).build())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Compile the built-in pattern list.
    pub fn defaults() -> Result<Self> {
        Self::new(DEFAULT_JUNK_PATTERNS.iter().copied())
    }

    /// Whether any pattern matches `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Set of valid position codes, stored uppercase.
#[derive(Debug, Clone)]
pub struct PositionCodes {
    codes: HashSet<String>,
}

impl PositionCodes {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|c| c.as_ref().trim().to_uppercase())
                .collect(),
        }
    }

    /// Whether `code`, uppercased, is a known position.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(&code.trim().to_uppercase())
    }
}

impl Default for PositionCodes {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION_CODES.iter().copied())
    }
}

/// Which positive evidence a row needs before it is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionPolicy {
    /// Name contains a comma, or Pos is a known position code.
    #[default]
    CommaOrPosition,
    /// Name must contain a comma.
    CommaOnly,
    /// Pos must be a known position code.
    PositionOnly,
    /// No positive evidence required.
    Any,
}

impl AdmissionPolicy {
    /// Whether a row with this name and position is admitted.
    pub fn admits(&self, name: &str, pos: Option<&str>, codes: &PositionCodes) -> bool {
        let comma = name.contains(',');
        let known_position = pos.is_some_and(|p| codes.contains(p));
        match self {
            AdmissionPolicy::CommaOrPosition => comma || known_position,
            AdmissionPolicy::CommaOnly => comma,
            AdmissionPolicy::PositionOnly => known_position,
            AdmissionPolicy::Any => true,
        }
    }
}

/// Why a row was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Name matched a junk pattern.
    JunkPattern,
    /// Row repeats the header ("Name", "Pos", "Team").
    HeaderEcho,
    /// Name empty after trimming.
    BlankName,
    /// Row lacked the evidence the admission policy asks for.
    NotAdmitted,
    /// Team empty after cleanup.
    MissingTeam,
    /// Same (Name, Team) as an earlier row.
    Duplicate,
}

impl DropReason {
    /// Every reason, in the order checks are applied.
    pub const ALL: [DropReason; 6] = [
        DropReason::BlankName,
        DropReason::HeaderEcho,
        DropReason::JunkPattern,
        DropReason::NotAdmitted,
        DropReason::MissingTeam,
        DropReason::Duplicate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DropReason::JunkPattern => "junk pattern",
            DropReason::HeaderEcho => "header echo",
            DropReason::BlankName => "blank name",
            DropReason::NotAdmitted => "not admitted",
            DropReason::MissingTeam => "missing team",
            DropReason::Duplicate => "duplicate",
        }
    }
}

/// Row-validity rules applied to the Name, Pos, and Team cells of a row.
#[derive(Debug, Clone)]
pub struct RowRules {
    junk: JunkPatterns,
    positions: PositionCodes,
    admission: AdmissionPolicy,
}

impl RowRules {
    pub fn new(junk: JunkPatterns, positions: PositionCodes, admission: AdmissionPolicy) -> Self {
        Self {
            junk,
            positions,
            admission,
        }
    }

    /// Built-in patterns, position codes, and the comma-or-position policy.
    pub fn defaults() -> Result<Self> {
        Ok(Self::new(
            JunkPatterns::defaults()?,
            PositionCodes::default(),
            AdmissionPolicy::default(),
        ))
    }

    pub fn admission(&self) -> AdmissionPolicy {
        self.admission
    }

    /// Classify a row from its trimmed Name, Pos, and Team cells.
    ///
    /// `pos` and `team` are `None` when the table has no such column. Returns the
    /// reason to drop the row, or `None` to keep it.
    pub fn classify(&self, name: &str, pos: Option<&str>, team: Option<&str>) -> Option<DropReason> {
        if name.trim().is_empty() {
            return Some(DropReason::BlankName);
        }
        if name.trim().eq_ignore_ascii_case("name")
            || pos.is_some_and(|p| p == "Pos" || p == "Position")
            || team.is_some_and(|t| t == "Team")
        {
            return Some(DropReason::HeaderEcho);
        }
        if self.junk.is_match(name) {
            return Some(DropReason::JunkPattern);
        }
        if !self.admission.admits(name, pos, &self.positions) {
            return Some(DropReason::NotAdmitted);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RowRules {
        RowRules::defaults().unwrap()
    }

    #[test]
    fn test_player_rows_are_kept() {
        let rules = rules();
        assert_eq!(rules.classify("Smith, John", Some("SS"), Some("Tigers")), None);
        assert_eq!(rules.classify("Lee, Min", None, Some("Hawks")), None);
        assert_eq!(rules.classify("Ichiro", Some("rf"), Some("Hawks")), None);
    }

    #[test]
    fn test_navigation_bar_is_junk() {
        let rules = rules();
        assert_eq!(
            rules.classify("A | B | C | D", Some("SS"), Some("Tigers")),
            Some(DropReason::JunkPattern)
        );
    }

    #[test]
    fn test_header_echo() {
        let rules = rules();
        assert_eq!(rules.classify("NAME", None, None), Some(DropReason::HeaderEcho));
        assert_eq!(
            rules.classify("Smith, John", Some("Position"), None),
            Some(DropReason::HeaderEcho)
        );
        assert_eq!(
            rules.classify("Smith, John", Some("SS"), Some("Team")),
            Some(DropReason::HeaderEcho)
        );
    }

    #[test]
    fn test_blank_and_nan_names() {
        let rules = rules();
        assert_eq!(rules.classify("   ", Some("SS"), None), Some(DropReason::BlankName));
        assert_eq!(rules.classify("NaN", Some("SS"), None), Some(DropReason::JunkPattern));
    }

    #[test]
    fn test_unformatted_text_not_admitted() {
        let rules = rules();
        assert_eq!(
            rules.classify("League Leaders", Some(""), Some("Tigers")),
            Some(DropReason::NotAdmitted)
        );
        assert_eq!(
            rules.classify("League Leaders", None, None),
            Some(DropReason::NotAdmitted)
        );
    }

    #[test]
    fn test_names_resembling_nav_words_survive() {
        let rules = rules();
        assert_eq!(rules.classify("Back, Jim", None, Some("Tigers")), None);
        assert_eq!(rules.classify("Homer, Bob", None, Some("Tigers")), None);
    }

    #[test]
    fn test_admission_policies() {
        let codes = PositionCodes::default();
        assert!(AdmissionPolicy::CommaOrPosition.admits("Smith, John", None, &codes));
        assert!(AdmissionPolicy::CommaOrPosition.admits("Ichiro", Some("RF"), &codes));
        assert!(!AdmissionPolicy::CommaOnly.admits("Ichiro", Some("RF"), &codes));
        assert!(!AdmissionPolicy::PositionOnly.admits("Smith, John", Some("XX"), &codes));
        assert!(AdmissionPolicy::Any.admits("anything", None, &codes));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(JunkPatterns::new(["("]).is_err());
    }
}
