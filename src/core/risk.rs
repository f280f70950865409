//! Medical risk scoring
//!
//! Normalizes the medical history answer into a score used as a model
//! feature, and derives the human-readable risk factor summary and
//! recommendations shown next to a prediction.
//!
//! The normalized score is:
//!     score = sum(risk(term) for term in history.split(" & ")) / 14
//!
//! where 14 is heart disease (8) plus diabetes or high blood pressure (6).

use serde::{Deserialize, Serialize};

use crate::models::InputRecord;

/// Per-condition risk points
const RISK_SCORES: [(&str, u32); 6] = [
    ("diabetes", 6),
    ("heart disease", 8),
    ("high blood pressure", 6),
    ("thyroid", 5),
    ("no disease", 0),
    ("none", 0),
];

/// Highest score reachable with two conditions
pub const MAX_RISK_SCORE: f64 = 14.0;

/// Separator between conditions in a medical history answer
pub const CONDITION_SEPARATOR: &str = " & ";

/// Genetical risk above this counts as a risk factor
const HIGH_GENETIC_RISK: u32 = 3;

/// Risk points for one condition; unknown conditions score 0
pub fn condition_risk(condition: &str) -> u32 {
    let condition = condition.trim().to_lowercase();
    RISK_SCORES
        .iter()
        .find(|(name, _)| *name == condition)
        .map(|(_, score)| *score)
        .unwrap_or(0)
}

/// Normalized risk score for a medical history answer
///
/// Not clamped: repeated or more than two conditions can exceed 1.0.
///
/// # Examples
/// ```
/// use insurance::core::risk::calculate_normalized_risk;
/// assert_eq!(calculate_normalized_risk("No Disease"), 0.0);
/// assert_eq!(calculate_normalized_risk("Diabetes & Heart disease"), 1.0);
/// ```
pub fn calculate_normalized_risk(medical_history: &str) -> f64 {
    let total: u32 = medical_history
        .to_lowercase()
        .split(CONDITION_SEPARATOR)
        .map(condition_risk)
        .sum();

    total as f64 / MAX_RISK_SCORE
}

/// Risk factor flagged in the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Smoking,
    HighGeneticRisk,
    BmiRisk,
    MedicalHistory,
}

impl RiskFactor {
    pub fn label(self) -> &'static str {
        match self {
            RiskFactor::Smoking => "Smoking",
            RiskFactor::HighGeneticRisk => "High Genetic Risk",
            RiskFactor::BmiRisk => "BMI Risk",
            RiskFactor::MedicalHistory => "Medical History",
        }
    }
}

fn is_smoker(record: &InputRecord) -> bool {
    matches!(record.smoking_status.as_deref(), Some(s) if s != "No Smoking")
}

fn has_bmi_risk(record: &InputRecord) -> bool {
    matches!(
        record.bmi_category.as_deref(),
        Some("Obesity") | Some("Underweight")
    )
}

/// Risk factors present in a record, in display order
pub fn risk_factors(record: &InputRecord) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    if is_smoker(record) {
        factors.push(RiskFactor::Smoking);
    }
    if record.genetical_risk.unwrap_or(0) > HIGH_GENETIC_RISK {
        factors.push(RiskFactor::HighGeneticRisk);
    }
    if has_bmi_risk(record) {
        factors.push(RiskFactor::BmiRisk);
    }
    if matches!(record.medical_history.as_deref(), Some(h) if h != "No Disease") {
        factors.push(RiskFactor::MedicalHistory);
    }

    factors
}

/// Suggestions that could lower the premium
pub fn recommendations(record: &InputRecord) -> Vec<String> {
    let mut recs = Vec::new();

    if is_smoker(record) {
        recs.push(
            "Consider quitting smoking to potentially reduce your insurance costs.".to_string(),
        );
    }
    if has_bmi_risk(record) {
        recs.push(
            "Working towards a normal BMI range could help lower your insurance costs."
                .to_string(),
        );
    }

    recs
}

/// Relative impact of a factor on the predicted cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorImpact {
    pub factor: String,
    pub impact: f64,
}

const FACTOR_IMPACTS: [(&str, f64); 5] = [
    ("Age", 0.30),
    ("BMI", 0.25),
    ("Smoking", 0.20),
    ("Medical History", 0.15),
    ("Genetic Risk", 0.10),
];

/// Static relative impact table for the risk analysis view
pub fn factor_impacts() -> Vec<FactorImpact> {
    FACTOR_IMPACTS
        .iter()
        .map(|(factor, impact)| FactorImpact {
            factor: factor.to_string(),
            impact: *impact,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_risk_known_histories() {
        assert_eq!(calculate_normalized_risk("No Disease"), 0.0);
        assert!((calculate_normalized_risk("Diabetes") - 6.0 / 14.0).abs() < 1e-12);
        assert!((calculate_normalized_risk("Diabetes & Heart disease") - 1.0).abs() < 1e-12);
        assert!((calculate_normalized_risk("Thyroid & Diabetes") - 11.0 / 14.0).abs() < 1e-12);
        assert!(
            (calculate_normalized_risk("High blood pressure & Heart disease") - 1.0).abs() < 1e-12
        );
    }

    #[test]
    fn test_normalized_risk_case_insensitive() {
        assert_eq!(
            calculate_normalized_risk("HEART DISEASE"),
            calculate_normalized_risk("heart disease")
        );
        assert!((calculate_normalized_risk("thyroid") - 5.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_risk_trims_terms() {
        // Split happens on " & " first; leftover whitespace is trimmed per term
        assert!((calculate_normalized_risk("  Diabetes  &  Thyroid ") - 11.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_risk_unknown_and_empty() {
        assert_eq!(calculate_normalized_risk("Asthma"), 0.0);
        assert_eq!(calculate_normalized_risk(""), 0.0);
        assert_eq!(calculate_normalized_risk("none"), 0.0);
        // Only " & " separates conditions
        assert_eq!(calculate_normalized_risk("Diabetes&Thyroid"), 0.0);
    }

    #[test]
    fn test_normalized_risk_not_clamped() {
        let score = calculate_normalized_risk("Heart disease & Heart disease");
        assert!((score - 16.0 / 14.0).abs() < 1e-12);
        assert!(score > 1.0);

        let three = calculate_normalized_risk("Diabetes & Thyroid & Heart disease");
        assert!((three - 19.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_condition_risk() {
        assert_eq!(condition_risk("High Blood Pressure"), 6);
        assert_eq!(condition_risk(" thyroid "), 5);
        assert_eq!(condition_risk("unknown"), 0);
    }

    fn healthy_record() -> InputRecord {
        InputRecord {
            age: Some(30),
            genetical_risk: Some(1),
            smoking_status: Some("No Smoking".to_string()),
            bmi_category: Some("Normal".to_string()),
            medical_history: Some("No Disease".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_risk_factors() {
        let record = healthy_record();
        assert!(risk_factors(&record).is_empty());
        assert!(recommendations(&record).is_empty());
    }

    #[test]
    fn test_all_risk_factors() {
        let record = InputRecord {
            smoking_status: Some("Regular".to_string()),
            genetical_risk: Some(4),
            bmi_category: Some("Obesity".to_string()),
            medical_history: Some("Diabetes".to_string()),
            ..healthy_record()
        };

        assert_eq!(
            risk_factors(&record),
            vec![
                RiskFactor::Smoking,
                RiskFactor::HighGeneticRisk,
                RiskFactor::BmiRisk,
                RiskFactor::MedicalHistory
            ]
        );
        assert_eq!(recommendations(&record).len(), 2);
    }

    #[test]
    fn test_genetic_risk_threshold() {
        let record = InputRecord {
            genetical_risk: Some(3),
            ..healthy_record()
        };
        assert!(!risk_factors(&record).contains(&RiskFactor::HighGeneticRisk));
    }

    #[test]
    fn test_overweight_is_not_bmi_risk() {
        let record = InputRecord {
            bmi_category: Some("Overweight".to_string()),
            ..healthy_record()
        };
        assert!(risk_factors(&record).is_empty());
    }

    #[test]
    fn test_factor_impacts_sum_to_one() {
        let impacts = factor_impacts();
        assert_eq!(impacts.len(), 5);
        let total: f64 = impacts.iter().map(|f| f.impact).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(impacts[0].factor, "Age");
    }
}
