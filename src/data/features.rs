//! Feature Engineering
//!
//! Encode an applicant record into the model's feature schema.
//! Categorical levels are one-hot encoded against a baseline level that
//! maps to all zeros; unrecognised or missing values also map to the baseline.

use crate::core::risk::calculate_normalized_risk;
use crate::data::schema::FeatureVector;
use crate::models::{CategoricalField, InputRecord};

/// One-hot column set by a categorical level
#[derive(Debug, Clone, Copy)]
pub struct OneHotColumn {
    pub field: CategoricalField,
    pub value: &'static str,
    pub column: &'static str,
}

const fn one_hot(
    field: CategoricalField,
    value: &'static str,
    column: &'static str,
) -> OneHotColumn {
    OneHotColumn {
        field,
        value,
        column,
    }
}

/// Non-baseline categorical levels and their columns.
///
/// Baselines: Female, Northeast, Married, Normal, No Smoking, Freelancer/empty.
pub static ONE_HOT_COLUMNS: [OneHotColumn; 12] = [
    one_hot(CategoricalField::Gender, "Male", "gender_Male"),
    one_hot(CategoricalField::Region, "Northwest", "region_Northwest"),
    one_hot(CategoricalField::Region, "Southeast", "region_Southeast"),
    one_hot(CategoricalField::Region, "Southwest", "region_Southwest"),
    one_hot(
        CategoricalField::MaritalStatus,
        "Unmarried",
        "marital_status_Unmarried",
    ),
    one_hot(CategoricalField::BmiCategory, "Obesity", "bmi_category_Obesity"),
    one_hot(CategoricalField::BmiCategory, "Overweight", "bmi_category_Overweight"),
    one_hot(CategoricalField::BmiCategory, "Underweight", "bmi_category_Underweight"),
    one_hot(
        CategoricalField::SmokingStatus,
        "Occasional",
        "smoking_status_Occasional",
    ),
    one_hot(CategoricalField::SmokingStatus, "Regular", "smoking_status_Regular"),
    one_hot(
        CategoricalField::EmploymentStatus,
        "Salaried",
        "employment_status_Salaried",
    ),
    one_hot(
        CategoricalField::EmploymentStatus,
        "Self-Employed",
        "employment_status_Self-Employed",
    ),
];

/// Ordinal encoding of the insurance plan
const INSURANCE_PLAN_LEVELS: [(&str, f64); 3] = [("Bronze", 1.0), ("Silver", 2.0), ("Gold", 3.0)];

/// Medical history assumed when the field is missing
const DEFAULT_MEDICAL_HISTORY: &str = "none";

/// Feature encoder for applicant records
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Encode a record into a zero-initialised vector over the model schema
    pub fn encode(record: &InputRecord) -> FeatureVector {
        let mut vector = FeatureVector::new();

        let numeric = [
            ("age", record.age),
            ("number_of_dependants", record.number_of_dependants),
            ("income_lakhs", record.income_lakhs),
            ("genetical_risk", record.genetical_risk),
        ];
        for (column, value) in numeric {
            Self::put(&mut vector, column, value.unwrap_or(0) as f64);
        }

        Self::put(
            &mut vector,
            "insurance_plan",
            Self::encode_insurance_plan(record.insurance_plan.as_deref()),
        );

        let medical_history = record
            .medical_history
            .as_deref()
            .unwrap_or(DEFAULT_MEDICAL_HISTORY);
        Self::put(
            &mut vector,
            "normalized_risk_score",
            calculate_normalized_risk(medical_history),
        );

        for entry in &ONE_HOT_COLUMNS {
            if record.categorical(entry.field) == Some(entry.value) {
                Self::put(&mut vector, entry.column, 1.0);
            }
        }

        vector
    }

    /// Ordinal plan level; unrecognised or missing plans count as Bronze
    pub fn encode_insurance_plan(plan: Option<&str>) -> f64 {
        plan.and_then(|p| {
            INSURANCE_PLAN_LEVELS
                .iter()
                .find(|(name, _)| *name == p)
                .map(|(_, level)| *level)
        })
        .unwrap_or(1.0)
    }

    /// One-hot columns belonging to a categorical field
    pub fn one_hot_columns(field: CategoricalField) -> impl Iterator<Item = &'static OneHotColumn> {
        ONE_HOT_COLUMNS.iter().filter(move |c| c.field == field)
    }

    fn put(vector: &mut FeatureVector, column: &str, value: f64) {
        vector
            .set(column, value)
            .expect("encoder columns are checked against the feature schema in tests");
    }
}
