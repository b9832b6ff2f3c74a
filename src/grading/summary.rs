// src/grading/summary.rs

use serde::Serialize;

use super::subject::{SubjectMark, SubjectOutcome};

/// Failing this many subjects fails the whole exam.
pub const EXAM_FAIL_SUBJECTS: usize = 3;

/// Overall remark shown under "Performance Analysis".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Remark {
    FailedInExam { failed_subjects: usize },
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
}

impl Remark {
    /// First match wins: the failed-subject rule overrides any percentage.
    pub fn select(failed_subjects: usize, percentage: f64) -> Self {
        if failed_subjects >= EXAM_FAIL_SUBJECTS {
            Remark::FailedInExam { failed_subjects }
        } else if percentage >= 80.0 {
            Remark::Excellent
        } else if percentage >= 60.0 {
            Remark::Good
        } else if percentage >= 40.0 {
            Remark::Satisfactory
        } else {
            Remark::NeedsImprovement
        }
    }

    pub fn message(&self) -> String {
        match self {
            Remark::FailedInExam { failed_subjects } => {
                format!("Failed in Exam (Failed in {} subjects)", failed_subjects)
            }
            Remark::Excellent => "Excellent performance! Keep up the outstanding work.".to_string(),
            Remark::Good => {
                "Good performance with room for improvement in some subjects.".to_string()
            }
            Remark::Satisfactory => {
                "Satisfactory performance. Focus on weaker subjects for better results.".to_string()
            }
            Remark::NeedsImprovement => {
                "Needs significant improvement. Consider additional support and practice."
                    .to_string()
            }
        }
    }
}

/// Grand maximum for the "out of" figure.
/// Only non-computed components with a numeric maximum count.
pub fn max_total(subjects: &[SubjectMark]) -> f64 {
    subjects
        .iter()
        .flat_map(|s| s.subject.scoring_scheme.iter())
        .filter(|c| !c.computed)
        .filter_map(|c| c.max)
        .sum()
}

pub fn failed_subjects(outcomes: &[SubjectOutcome]) -> usize {
    outcomes.iter().filter(|o| o.is_failed).count()
}

/// Ordinal suffix for a class rank. 11, 12 and 13 get "th" like any other number.
pub fn rank_suffix(rank: u32) -> &'static str {
    match rank {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
