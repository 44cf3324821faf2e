//! Predictive wellness scoring.
//!
//! Deterministic functions over a handful of scalar inputs. Each returns a
//! labeled bucket plus a fixed recommendation string; callers supply the
//! metrics, nothing here touches the clock or the database.

use serde::{Deserialize, Serialize};

const LEVEL_MEDIUM_MIN: f32 = 35.0;
const LEVEL_HIGH_MIN: f32 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f32) -> Self {
        if score >= LEVEL_HIGH_MIN {
            RiskLevel::High
        } else if score >= LEVEL_MEDIUM_MIN {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// One self-reported check-in, oldest first when passed as a slice.
/// Mood is bounded 1-5, stress 1-10.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoodSample {
    pub mood: i16,
    pub stress: i16,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub score: f32,
    pub level: RiskLevel,
    pub recommendation: &'static str,
}

fn stress_recommendation(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Keep up your current routine and keep logging daily check-ins.",
        RiskLevel::Medium => {
            "Schedule a short break before your next session and try a stress-relief journal prompt."
        }
        RiskLevel::High => {
            "Pause new material for today; a breathing exercise and a short journal entry will help more than another lesson."
        }
    }
}

fn engagement_recommendation(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "You're on a steady rhythm. Keep your streak going.",
        RiskLevel::Medium => "Pick one short module section today to keep momentum.",
        RiskLevel::High => "Start with a five-minute review session; small wins rebuild the habit.",
    }
}

/// Predicts near-term stress from recent check-ins.
///
/// Score blends mean stress (50%), inverted mean mood (30%) and the
/// short-term stress trend (20%), normalised to 0-100. An empty history
/// scores 0 (low).
pub fn predict_stress(samples: &[MoodSample]) -> Prediction {
    if samples.is_empty() {
        let level = RiskLevel::Low;
        return Prediction {
            score: 0.0,
            level,
            recommendation: stress_recommendation(level),
        };
    }

    let n = samples.len() as f32;
    let mean_stress: f32 = samples.iter().map(|s| s.stress as f32).sum::<f32>() / n;
    let mean_mood: f32 = samples.iter().map(|s| s.mood as f32).sum::<f32>() / n;

    // Normalise onto 0..1. Stress is 1-10, mood 1-5 (inverted: low mood
    // pushes the score up).
    let stress_component = ((mean_stress - 1.0) / 9.0).clamp(0.0, 1.0);
    let mood_component = ((5.0 - mean_mood) / 4.0).clamp(0.0, 1.0);

    // Trend: mean of the newer half minus mean of the older half. Only a
    // worsening trend contributes.
    let trend_component = if samples.len() >= 4 {
        let mid = samples.len() / 2;
        let older: f32 =
            samples[..mid].iter().map(|s| s.stress as f32).sum::<f32>() / mid as f32;
        let newer: f32 = samples[mid..].iter().map(|s| s.stress as f32).sum::<f32>()
            / (samples.len() - mid) as f32;
        ((newer - older) / 9.0).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let score = (100.0
        * (0.5 * stress_component + 0.3 * mood_component + 0.2 * trend_component))
        .clamp(0.0, 100.0);
    let level = RiskLevel::from_score(score);

    Prediction {
        score,
        level,
        recommendation: stress_recommendation(level),
    }
}

/// Scores the risk that a user is disengaging from the course.
///
/// Inputs: days since the last completed section or check-in, number of
/// active days in the last 14, and mean session length in minutes.
pub fn engagement_dropoff_risk(
    days_since_last_activity: u32,
    active_days_last_14: u32,
    avg_session_minutes: f32,
) -> Prediction {
    let recency = (days_since_last_activity as f32 / 7.0).clamp(0.0, 1.0);
    let frequency_deficit = 1.0 - (active_days_last_14 as f32 / 8.0).clamp(0.0, 1.0);
    let depth_deficit = 1.0 - (avg_session_minutes / 20.0).clamp(0.0, 1.0);

    let score =
        (100.0 * (0.5 * recency + 0.3 * frequency_deficit + 0.2 * depth_deficit)).clamp(0.0, 100.0);
    let level = RiskLevel::from_score(score);

    Prediction {
        score,
        level,
        recommendation: engagement_recommendation(level),
    }
}

/// Default window suggested when a user has no completion history yet.
pub const DEFAULT_WINDOW_START: u8 = 18;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OptimalWindow {
    /// Inclusive start hour of the best two-hour window, 0-23.
    pub start_hour: u8,
    /// Exclusive end hour, 1-24 (wraps past midnight as start+2 mod 24).
    pub end_hour: u8,
    /// Share of all completions that fell inside the window, 0.0-1.0.
    pub confidence: f32,
}

/// Finds the two-hour window with the most section completions.
/// Ties resolve to the earliest window so the result is stable.
pub fn optimal_study_time(histogram: &[u32; 24]) -> OptimalWindow {
    let total: u32 = histogram.iter().sum();
    if total == 0 {
        return OptimalWindow {
            start_hour: DEFAULT_WINDOW_START,
            end_hour: DEFAULT_WINDOW_START + 2,
            confidence: 0.0,
        };
    }

    let mut best_start = 0usize;
    let mut best_count = 0u32;
    for start in 0..24 {
        let count = histogram[start] + histogram[(start + 1) % 24];
        if count > best_count {
            best_count = count;
            best_start = start;
        }
    }

    OptimalWindow {
        start_hour: best_start as u8,
        end_hour: ((best_start + 2) % 24) as u8,
        confidence: best_count as f32 / total as f32,
    }
}
