//! Core business logic modules

pub mod risk;

// Re-export commonly used types
pub use risk::{
    calculate_normalized_risk, factor_impacts, recommendations, risk_factors, FactorImpact,
    RiskFactor,
};
