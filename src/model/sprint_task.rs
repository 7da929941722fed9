use itertools::Itertools;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Risk,
    NoRisks,
    NotYetIdentified,
    Other(String),
}

impl RiskCategory {
    /// Case-folds the cell; blank cells carry no category.
    pub fn parse(text: &str) -> Option<Self> {
        let folded = text
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .join(" ");
        match folded.as_str() {
            "" => None,
            "risk" => Some(Self::Risk),
            "no risks" => Some(Self::NoRisks),
            "not yet identified" => Some(Self::NotYetIdentified),
            _ => Some(Self::Other(folded)),
        }
    }

    pub fn color(&self) -> Option<&'static str> {
        match self {
            Self::Risk => Some("red"),
            Self::NoRisks => Some("green"),
            Self::NotYetIdentified => Some("yellow"),
            Self::Other(_) => None,
        }
    }
}

impl Display for RiskCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Risk => write!(f, "risk"),
            Self::NoRisks => write!(f, "no risks"),
            Self::NotYetIdentified => write!(f, "not yet identified"),
            Self::Other(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintTaskRecord {
    pub task_name: String,
    pub assignee: String,
    pub estimate_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub risk_category: Option<RiskCategory>,
    pub dev_time_difference: Option<f64>,
}

impl SprintTaskRecord {
    pub fn new(
        task_name: impl ToString,
        assignee: impl ToString,
        estimate: &str,
        actual: &str,
        risks: &str,
    ) -> Self {
        let estimate_hours = coerce_hours(estimate);
        let actual_hours = coerce_hours(actual);
        Self {
            task_name: task_name.to_string(),
            assignee: assignee.to_string(),
            estimate_hours,
            actual_hours,
            risk_category: RiskCategory::parse(risks),
            dev_time_difference: actual_hours
                .zip(estimate_hours)
                .map(|(actual, estimate)| actual - estimate),
        }
    }

    /// First ten characters of the task name followed by `...`.
    pub fn short_name(&self) -> String {
        format!("{}...", self.task_name.chars().take(10).collect::<String>())
    }

    pub fn is_pulled(&self) -> bool {
        self.actual_hours.is_none()
    }
}

/// Non-numeric text becomes absent instead of failing the row.
pub fn coerce_hours(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_hours_are_absent() {
        for text in ["", "  ", "n/a", "four", "3h", "NaN", "inf"] {
            assert_eq!(coerce_hours(text), None, "{text:?}");
        }
        assert_eq!(coerce_hours(" 2.5 "), Some(2.5));
        assert_eq!(coerce_hours("0"), Some(0.0));
    }

    #[test]
    fn difference_requires_both_numbers() {
        let task = SprintTaskRecord::new("Login", "ann", "4", "6.5", "Risk");
        assert_eq!(task.dev_time_difference, Some(2.5));
        let task = SprintTaskRecord::new("Login", "ann", "4", "pending", "Risk");
        assert_eq!(task.actual_hours, None);
        assert_eq!(task.dev_time_difference, None);
        assert!(task.is_pulled());
    }

    #[test]
    fn risk_case_folding() {
        for text in ["Risk", "RISK", "risk", " risk "] {
            assert_eq!(RiskCategory::parse(text), Some(RiskCategory::Risk));
        }
        assert_eq!(RiskCategory::parse("No Risks"), Some(RiskCategory::NoRisks));
        assert_eq!(RiskCategory::parse("NO_RISKS"), Some(RiskCategory::NoRisks));
        assert_eq!(
            RiskCategory::parse("Not  yet identified"),
            Some(RiskCategory::NotYetIdentified)
        );
        assert_eq!(
            RiskCategory::parse("Blocked"),
            Some(RiskCategory::Other("blocked".into()))
        );
        assert_eq!(RiskCategory::parse(""), None);
    }

    #[test]
    fn short_name_counts_characters() {
        let task = SprintTaskRecord::new("Überarbeitung der API", "ann", "1", "1", "");
        assert_eq!(task.short_name(), "Überarbeit...");
        let task = SprintTaskRecord::new("Fix", "ann", "1", "1", "");
        assert_eq!(task.short_name(), "Fix...");
    }
}
