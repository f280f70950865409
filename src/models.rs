use serde::{Deserialize, Serialize};

use crate::core::risk::RiskFactor;

/// Upper age bound (inclusive) of the young cohort
pub const YOUNG_MAX_AGE: u32 = 25;

/// Applicant record as submitted by the form.
///
/// Keys are the form labels. Every field except `Age` may be omitted and
/// falls back to its zero/baseline encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    #[serde(rename = "Age")]
    pub age: Option<u32>,
    #[serde(rename = "Number of Dependants")]
    pub number_of_dependants: Option<u32>,
    #[serde(rename = "Income in Lakhs")]
    pub income_lakhs: Option<u32>,
    #[serde(rename = "Genetical Risk")]
    pub genetical_risk: Option<u32>,
    #[serde(rename = "Insurance Plan")]
    pub insurance_plan: Option<String>,
    #[serde(rename = "Employment Status")]
    pub employment_status: Option<String>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Marital Status")]
    pub marital_status: Option<String>,
    #[serde(rename = "BMI Category")]
    pub bmi_category: Option<String>,
    #[serde(rename = "Smoking Status")]
    pub smoking_status: Option<String>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Medical History")]
    pub medical_history: Option<String>,
}

impl InputRecord {
    /// Value of a categorical field, if present
    pub fn categorical(&self, field: CategoricalField) -> Option<&str> {
        let value = match field {
            CategoricalField::InsurancePlan => &self.insurance_plan,
            CategoricalField::EmploymentStatus => &self.employment_status,
            CategoricalField::Gender => &self.gender,
            CategoricalField::MaritalStatus => &self.marital_status,
            CategoricalField::BmiCategory => &self.bmi_category,
            CategoricalField::SmokingStatus => &self.smoking_status,
            CategoricalField::Region => &self.region,
            CategoricalField::MedicalHistory => &self.medical_history,
        };
        value.as_deref()
    }

    /// Set a categorical field from its form label value
    pub fn set_categorical(&mut self, field: CategoricalField, value: Option<String>) {
        let slot = match field {
            CategoricalField::InsurancePlan => &mut self.insurance_plan,
            CategoricalField::EmploymentStatus => &mut self.employment_status,
            CategoricalField::Gender => &mut self.gender,
            CategoricalField::MaritalStatus => &mut self.marital_status,
            CategoricalField::BmiCategory => &mut self.bmi_category,
            CategoricalField::SmokingStatus => &mut self.smoking_status,
            CategoricalField::Region => &mut self.region,
            CategoricalField::MedicalHistory => &mut self.medical_history,
        };
        *slot = value;
    }
}

/// Categorical fields of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    InsurancePlan,
    EmploymentStatus,
    Gender,
    MaritalStatus,
    BmiCategory,
    SmokingStatus,
    Region,
    MedicalHistory,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 8] = [
        CategoricalField::InsurancePlan,
        CategoricalField::EmploymentStatus,
        CategoricalField::Gender,
        CategoricalField::MaritalStatus,
        CategoricalField::BmiCategory,
        CategoricalField::SmokingStatus,
        CategoricalField::Region,
        CategoricalField::MedicalHistory,
    ];

    /// Form label (also the JSON and CSV key)
    pub fn label(self) -> &'static str {
        match self {
            CategoricalField::InsurancePlan => "Insurance Plan",
            CategoricalField::EmploymentStatus => "Employment Status",
            CategoricalField::Gender => "Gender",
            CategoricalField::MaritalStatus => "Marital Status",
            CategoricalField::BmiCategory => "BMI Category",
            CategoricalField::SmokingStatus => "Smoking Status",
            CategoricalField::Region => "Region",
            CategoricalField::MedicalHistory => "Medical History",
        }
    }

    /// Values the form offers for this field
    pub fn options(self) -> &'static [&'static str] {
        match self {
            CategoricalField::InsurancePlan => &["Bronze", "Silver", "Gold"],
            CategoricalField::EmploymentStatus => &["Salaried", "Self-Employed", "Freelancer", ""],
            CategoricalField::Gender => &["Male", "Female"],
            CategoricalField::MaritalStatus => &["Unmarried", "Married"],
            CategoricalField::BmiCategory => &["Normal", "Obesity", "Overweight", "Underweight"],
            CategoricalField::SmokingStatus => &["No Smoking", "Regular", "Occasional"],
            CategoricalField::Region => &["Northwest", "Southeast", "Northeast", "Southwest"],
            CategoricalField::MedicalHistory => &[
                "No Disease",
                "Diabetes",
                "High blood pressure",
                "Diabetes & High blood pressure",
                "Thyroid",
                "Heart disease",
                "High blood pressure & Heart disease",
                "Diabetes & Thyroid",
                "Diabetes & Heart disease",
            ],
        }
    }
}

/// Age cohort selecting the model/scaler pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    Young,
    Rest,
}

impl Cohort {
    /// Cohort for an age; the young cohort includes `YOUNG_MAX_AGE`
    pub fn for_age(age: u32) -> Self {
        if age <= YOUNG_MAX_AGE {
            Cohort::Young
        } else {
            Cohort::Rest
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cohort::Young => "young",
            Cohort::Rest => "rest",
        }
    }
}

/// Prediction response
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_cost: u64,
    pub cohort: Cohort,
    pub risk_factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
}

/// One entry of a batch prediction
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchItem {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_cost: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohort: Option<Cohort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch prediction response
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPredictResponse {
    pub results: Vec<BatchItem>,
}

/// Option list for one categorical field
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldOptions {
    pub field: String,
    pub options: Vec<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub feature_count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Form label of the offending field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
