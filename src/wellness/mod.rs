//! Adaptive wellness heuristics shared by the mood and progress endpoints.

mod heuristics;

pub use heuristics::{
    engagement_dropoff_risk, optimal_study_time, predict_stress, MoodSample, OptimalWindow,
    Prediction, RiskLevel, DEFAULT_WINDOW_START,
};
