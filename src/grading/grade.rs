// src/grading/grade.rs

use serde::Serialize;

/// Display intensity shared by letter grades, subject bars and component cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Excellent,
    Good,
    Satisfactory,
    Poor,
}

impl Band {
    /// Breakpoints 80 / 60 / 40, inclusive at the lower bound.
    pub fn for_percentage(percentage: f64) -> Self {
        match percentage {
            p if p >= 80.0 => Band::Excellent,
            p if p >= 60.0 => Band::Good,
            p if p >= 40.0 => Band::Satisfactory,
            _ => Band::Poor,
        }
    }
}

/// Letter grade for an overall percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    F,
}

impl LetterGrade {
    pub const ALL: [LetterGrade; 7] = [
        LetterGrade::APlus,
        LetterGrade::A,
        LetterGrade::BPlus,
        LetterGrade::B,
        LetterGrade::CPlus,
        LetterGrade::C,
        LetterGrade::F,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::F => "F",
        }
    }

    pub fn tier(&self) -> Band {
        match self {
            LetterGrade::APlus | LetterGrade::A => Band::Excellent,
            LetterGrade::BPlus | LetterGrade::B => Band::Good,
            LetterGrade::CPlus | LetterGrade::C => Band::Satisfactory,
            LetterGrade::F => Band::Poor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub label: LetterGrade,
    pub tier: Band,
}

/// Maps an overall percentage to its letter grade.
///
/// | percentage >= | grade |
/// |---------------|-------|
/// | 90            | A+    |
/// | 80            | A     |
/// | 70            | B+    |
/// | 60            | B     |
/// | 50            | C+    |
/// | 40            | C     |
/// | otherwise     | F     |
pub fn grade(percentage: f64) -> Grade {
    let label = match percentage {
        p if p >= 90.0 => LetterGrade::APlus,
        p if p >= 80.0 => LetterGrade::A,
        p if p >= 70.0 => LetterGrade::BPlus,
        p if p >= 60.0 => LetterGrade::B,
        p if p >= 50.0 => LetterGrade::CPlus,
        p if p >= 40.0 => LetterGrade::C,
        _ => LetterGrade::F,
    };

    Grade {
        label,
        tier: label.tier(),
    }
}

/// Colour band for a raw score against its maximum.
/// A zero or missing maximum is treated as 1.
pub fn score_band(score: f64, max: Option<f64>) -> Band {
    Band::for_percentage(score / denominator(max) * 100.0)
}

/// Denominator used for ratios: the maximum unless it is missing or zero, otherwise 1.
pub(crate) fn denominator(max: Option<f64>) -> f64 {
    match max {
        Some(m) if m != 0.0 => m,
        _ => 1.0,
    }
}
