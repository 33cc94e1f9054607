use serde::Serialize;

/// Decision boundary of the trained classifier. Scores strictly above it are healthy.
pub const HEALTHY_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Healthy,
    GlaucomaSigns,
}

impl Diagnosis {
    pub fn from_score(score: f32) -> Self {
        if score > HEALTHY_THRESHOLD {
            Diagnosis::Healthy
        } else {
            Diagnosis::GlaucomaSigns
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Diagnosis::Healthy => "healthy",
            Diagnosis::GlaucomaSigns => "glaucoma_signs",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Diagnosis::Healthy)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Diagnosis::Healthy => {
                "Good news! Your eyes are healthy! Keep looking at the bright side, \
                 but remember, no direct staring at the sun!"
            }
            Diagnosis::GlaucomaSigns => {
                "Uh-oh, we’ve spotted some signs of glaucoma. Better get it checked out \
                 by a professional. Your eyes deserve the best care! No need to panic, \
                 but definitely don't turn a blind eye to this."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub score: f32,
    pub diagnosis: Diagnosis,
}

impl Prediction {
    pub fn from_score(score: f32) -> Self {
        Self {
            score,
            diagnosis: Diagnosis::from_score(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(Diagnosis::from_score(0.5), Diagnosis::GlaucomaSigns);
        assert_eq!(Diagnosis::from_score(0.500_001), Diagnosis::Healthy);
    }

    #[test]
    fn test_score_extremes() {
        assert_eq!(Diagnosis::from_score(0.0), Diagnosis::GlaucomaSigns);
        assert_eq!(Diagnosis::from_score(1.0), Diagnosis::Healthy);
        assert_eq!(Diagnosis::from_score(0.9), Diagnosis::Healthy);
        assert_eq!(Diagnosis::from_score(0.1), Diagnosis::GlaucomaSigns);
    }

    #[test]
    fn test_nan_score_is_not_healthy() {
        assert_eq!(Diagnosis::from_score(f32::NAN), Diagnosis::GlaucomaSigns);
    }

    #[test]
    fn test_messages() {
        assert!(Diagnosis::Healthy.message().starts_with("Good news!"));
        assert!(Diagnosis::GlaucomaSigns
            .message()
            .contains("signs of glaucoma"));
    }

    #[test]
    fn test_prediction_from_score() {
        let prediction = Prediction::from_score(0.25);
        assert_eq!(prediction.score, 0.25);
        assert!(!prediction.diagnosis.is_healthy());
        assert_eq!(prediction.diagnosis.as_str(), "glaucoma_signs");
    }
}
