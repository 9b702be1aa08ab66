//! Job title classification against the "stop using IT Specialist" directive.
//!
//! Titles are normalized (lowercase, trimmed, whitespace collapsed) and run
//! through [`TITLE_RULES`] top to bottom. The first rule that matches decides
//! the label; titles no rule matches are [`TitleLabel::Other`].
//!
//! Rule order is part of the contract. "Information Technology Specialist,
//! Cybersecurity" satisfies both the specialty-qualified rule and the generic
//! IT-specialist rule, and must come out `Compliant`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::normalize_title;

/// Label attached to a job title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleLabel {
    /// Specific, specialty-qualified title the directive asks for
    Compliant,
    /// The generic "IT Specialist" designation (primary non-compliant target)
    ItSpecialist,
    /// Another generic IT designation (IT Program Manager, IT System Administrator, ...)
    OtherGenericTitle,
    /// Nothing matched
    Other,
}

impl TitleLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleLabel::Compliant => "compliant",
            TitleLabel::ItSpecialist => "it_specialist",
            TitleLabel::OtherGenericTitle => "other_generic_title",
            TitleLabel::Other => "other",
        }
    }

    pub fn is_non_compliant(&self) -> bool {
        matches!(self, TitleLabel::ItSpecialist | TitleLabel::OtherGenericTitle)
    }
}

impl fmt::Display for TitleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule decides whether a normalized title matches.
pub enum TitlePredicate {
    /// Single pattern anywhere in the title
    Pattern(Regex),
    /// Every pattern somewhere in the title, in any order
    AllOf(Vec<Regex>),
    /// `pattern` matches and its first capture is not matched by `reject`
    Qualified { pattern: Regex, reject: Regex },
}

impl TitlePredicate {
    fn matches(&self, normalized: &str) -> bool {
        match self {
            TitlePredicate::Pattern(re) => re.is_match(normalized),
            TitlePredicate::AllOf(patterns) => patterns.iter().all(|re| re.is_match(normalized)),
            TitlePredicate::Qualified { pattern, reject } => pattern
                .captures(normalized)
                .and_then(|caps| caps.get(1))
                .is_some_and(|qualifier| !reject.is_match(qualifier.as_str())),
        }
    }
}

pub struct TitleRule {
    pub name: &'static str,
    pub label: TitleLabel,
    pub predicate: TitlePredicate,
}

// "IT" as a standalone word, or spelled out
const IT_DESIGNATION: &str = r"\b(?:it|information technology)\b";

// Grade, series and appointment suffixes that follow a comma but name no
// specialty: "GS-2210-12", "2210-13", "Term", "Remote"
const NOT_A_SPECIALTY: &str = r"^(?:.*\d.*|term|temp|temporary|permanent|remote|telework|nte|part-time|full-time|intern|trainee|supervisory|lead|senior|junior)$";

fn pattern(re: &str) -> Regex {
    Regex::new(re).unwrap()
}

lazy_static! {
    /// Ordered rule list. Evaluated top to bottom, first match wins.
    pub static ref TITLE_RULES: Vec<TitleRule> = vec![
        TitleRule {
            name: "specialty-qualified",
            label: TitleLabel::Compliant,
            predicate: TitlePredicate::Qualified {
                pattern: pattern(r"\b(?:it|information technology) specialist\s*,\s*([^\s,()]+)"),
                reject: pattern(NOT_A_SPECIALTY),
            },
        },
        TitleRule {
            name: "itspec-abbreviation",
            label: TitleLabel::ItSpecialist,
            predicate: TitlePredicate::Pattern(pattern(r"\bitspec")),
        },
        TitleRule {
            name: "it-spec-abbreviation",
            label: TitleLabel::ItSpecialist,
            predicate: TitlePredicate::Pattern(pattern(r"\bit\s+spec\b")),
        },
        TitleRule {
            name: "it-specialist",
            label: TitleLabel::ItSpecialist,
            predicate: TitlePredicate::AllOf(vec![
                pattern(IT_DESIGNATION),
                pattern(r"\bspecialist\b"),
            ]),
        },
        TitleRule {
            name: "generic-it-manager",
            label: TitleLabel::OtherGenericTitle,
            predicate: TitlePredicate::AllOf(vec![
                pattern(IT_DESIGNATION),
                pattern(r"\b(?:manager|administrator)\b"),
            ]),
        },
        TitleRule {
            name: "computer-systems-administrator",
            label: TitleLabel::OtherGenericTitle,
            predicate: TitlePredicate::Pattern(pattern(r"\bcomputer systems? administrator\b")),
        },
    ];
}

/// Classify a job title.
///
/// Total: empty or malformed input is `Other`, never a panic.
pub fn classify(title: &str) -> TitleLabel {
    classify_with_rule(title).0
}

/// Classify a job title and report which rule decided it (`None` for the default).
pub fn classify_with_rule(title: &str) -> (TitleLabel, Option<&'static str>) {
    let normalized = normalize_title(title);
    if normalized.is_empty() {
        return (TitleLabel::Other, None);
    }

    TITLE_RULES
        .iter()
        .find(|rule| rule.predicate.matches(&normalized))
        .map(|rule| (rule.label, Some(rule.name)))
        .unwrap_or((TitleLabel::Other, None))
}

/// Whether a title uses the generic "IT Specialist" designation.
pub fn is_it_specialist(title: &str) -> bool {
    classify(title) == TitleLabel::ItSpecialist
}

/// Classify every title in order.
pub fn classify_all<'a>(titles: impl IntoIterator<Item = &'a str>) -> Vec<TitleLabel> {
    titles.into_iter().map(classify).collect()
}
