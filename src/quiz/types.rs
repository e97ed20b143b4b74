use serde::{Deserialize, Serialize};

use crate::quiz::error::{QuizError, QuizResult};

/// 3PL item parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemParameters {
    pub difficulty: f64,
    pub discrimination: f64,
    pub guessing: f64,
}

impl Default for ItemParameters {
    fn default() -> Self {
        Self {
            difficulty: 0.0,
            discrimination: 1.0,
            guessing: 0.0,
        }
    }
}

impl ItemParameters {
    pub fn new(difficulty: f64, discrimination: f64, guessing: f64) -> QuizResult<Self> {
        let params = Self {
            difficulty,
            discrimination,
            guessing,
        };
        params.validate()?;
        Ok(params)
    }

    /// `discrimination > 0`, `0 <= guessing < 1`, finite difficulty.
    pub fn validate(&self) -> QuizResult<()> {
        if !self.difficulty.is_finite() {
            return Err(QuizError::InvalidParameter {
                field: "difficulty",
                value: self.difficulty,
            });
        }
        if !self.discrimination.is_finite() || self.discrimination <= 0.0 {
            return Err(QuizError::InvalidParameter {
                field: "discrimination",
                value: self.discrimination,
            });
        }
        if !(0.0..1.0).contains(&self.guessing) {
            return Err(QuizError::InvalidParameter {
                field: "guessing",
                value: self.guessing,
            });
        }
        Ok(())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_difficulty(difficulty: f64) -> Self {
        if difficulty < -0.5 {
            Self::Easy
        } else if difficulty > 0.5 {
            Self::Hard
        } else {
            Self::Medium
        }
    }
}

/// Read-only view of an item in the external item bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    pub id: String,
    pub params: ItemParameters,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub difficulty_band: DifficultyBand,
    #[serde(default = "default_estimated_time")]
    pub estimated_time_seconds: f64,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_estimated_time() -> f64 {
    30.0
}

impl CandidateItem {
    pub fn new(id: impl Into<String>, params: ItemParameters) -> Self {
        Self {
            id: id.into(),
            params,
            category: default_category(),
            difficulty_band: DifficultyBand::from_difficulty(params.difficulty),
            estimated_time_seconds: default_estimated_time(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_estimated_time(mut self, seconds: f64) -> Self {
        self.estimated_time_seconds = seconds;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub item_id: String,
    pub correct: bool,
    pub params: ItemParameters,
    pub response_time_seconds: Option<f64>,
}

impl ResponseRecord {
    pub fn new(item_id: impl Into<String>, correct: bool, params: ItemParameters) -> Self {
        Self {
            item_id: item_id.into(),
            correct,
            params,
            response_time_seconds: None,
        }
    }

    pub fn with_response_time(mut self, seconds: f64) -> Self {
        self.response_time_seconds = Some(seconds);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityEstimate {
    pub theta: f64,
    /// In `[0, 1)`, derived from `test_information`.
    pub confidence: f64,
    /// Sum of item information at `theta`.
    pub test_information: f64,
    pub history: Vec<f64>,
}

impl Default for AbilityEstimate {
    fn default() -> Self {
        Self::prior()
    }
}

impl AbilityEstimate {
    /// Population mean, no information.
    pub fn prior() -> Self {
        Self {
            theta: 0.0,
            confidence: 0.0,
            test_information: 0.0,
            history: Vec::new(),
        }
    }

    pub fn standard_error(&self) -> Option<f64> {
        if self.test_information > 0.0 {
            Some(1.0 / self.test_information.sqrt())
        } else {
            None
        }
    }
}

/// CEFR-like proficiency bands, ordered lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProficiencyBand {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl ProficiencyBand {
    pub fn from_theta(theta: f64) -> Self {
        if theta < -2.0 {
            Self::A1
        } else if theta < -1.0 {
            Self::A2
        } else if theta < 0.0 {
            Self::B1
        } else if theta < 1.0 {
            Self::B2
        } else if theta < 2.0 {
            Self::C1
        } else {
            Self::C2
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::A1 => "A1 Beginner",
            Self::A2 => "A2 Elementary",
            Self::B1 => "B1 Intermediate",
            Self::B2 => "B2 Upper Intermediate",
            Self::C1 => "C1 Advanced",
            Self::C2 => "C2 Proficient",
        }
    }

    pub fn highest() -> Self {
        Self::C2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalResult {
    pub score: u32,
    pub proficiency_label: String,
    pub band: ProficiencyBand,
    pub confidence_percent: u32,
    pub recommendations: Vec<String>,
    pub theta: f64,
    pub correct_count: u32,
    pub questions_answered: u32,
}
