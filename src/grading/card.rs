// src/grading/card.rs

use serde::{Deserialize, Serialize};

use super::{
    grade::{Band, Grade, grade},
    subject::{SubjectMark, SubjectOutcome, aggregate},
    summary::{Remark, failed_subjects, max_total, rank_suffix},
};

/// Shown when a student has no profile photo.
pub const DEFAULT_AVATAR: &str = "/images/student-avatar.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStudent {
    pub reg_number: String,
    pub name: String,
    pub profile_photo: Option<String>,
}

/// Everything needed to render one student's result card.
///
/// `grand_total`, `rank` and `percentage` are authoritative values computed upstream;
/// the card never recomputes them from the subject marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCardInput {
    pub exam_title: String,
    pub class_name: String,
    pub student: CardStudent,
    pub subjects: Vec<SubjectMark>,
    pub grand_total: f64,
    pub rank: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    pub grand_total: f64,
    /// "out of" figure. Excludes computed components.
    pub max_total: f64,
    pub percentage: f64,
    pub grade: Grade,
    /// Overall performance indicator.
    pub band: Band,
    pub rank: u32,
    pub rank_suffix: &'static str,
    pub failed_subjects: usize,
    pub remark: Remark,
    pub remark_message: String,
}

/// Display-ready result card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub exam_title: String,
    pub class_name: String,
    pub student: CardStudent,
    pub photo_url: String,
    pub subjects: Vec<SubjectRow>,
    pub summary: CardSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRow {
    #[serde(flatten)]
    pub outcome: SubjectOutcome,
    pub percentage_label: String,
    pub bar_fill: f64,
}

impl ResultCard {
    pub fn build(input: &ResultCardInput) -> Self {
        let outcomes: Vec<SubjectOutcome> = input.subjects.iter().map(aggregate).collect();
        let failed = failed_subjects(&outcomes);
        let remark = Remark::select(failed, input.percentage);

        let summary = CardSummary {
            grand_total: input.grand_total,
            max_total: max_total(&input.subjects),
            percentage: input.percentage,
            grade: grade(input.percentage),
            band: Band::for_percentage(input.percentage),
            rank: input.rank,
            rank_suffix: rank_suffix(input.rank),
            failed_subjects: failed,
            remark,
            remark_message: remark.message(),
        };

        let subjects = outcomes
            .into_iter()
            .map(|outcome| SubjectRow {
                percentage_label: outcome.percentage_label(),
                bar_fill: outcome.bar_fill(),
                outcome,
            })
            .collect();

        Self {
            exam_title: input.exam_title.clone(),
            class_name: input.class_name.clone(),
            photo_url: input
                .student
                .profile_photo
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            student: input.student.clone(),
            subjects,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{
        grade::LetterGrade,
        marks::{MarkSet, Score, ScoringComponent},
        subject::Subject,
    };
    use serde_json::json;

    fn input_from_json() -> ResultCardInput {
        serde_json::from_value(json!({
            "exam_title": "Final Semester 2024-25",
            "class_name": "Grade 7",
            "student": { "reg_number": "R-101", "name": "Amina", "profile_photo": null },
            "subjects": [
                {
                    "subject": {
                        "name": "Physics",
                        "name_arabic": "الفيزياء",
                        "scoring_scheme": [
                            { "key": "theory", "label": "Theory", "max": 80 },
                            { "key": "practical", "label": "Practical", "max": 20 }
                        ]
                    },
                    "marks": { "theory": 60, "practical": 15 }
                },
                {
                    "subject": {
                        "name": "Arabic",
                        "name_arabic": "العربية",
                        "scoring_scheme": [
                            { "key": "written", "label": "Written", "max": 50 },
                            { "key": "oral", "label": "Oral", "max": 50 },
                            { "key": "total", "label": "Total", "max": 100, "computed": true }
                        ]
                    },
                    "marks": { "absent": true }
                }
            ],
            "grand_total": 75,
            "rank": 2,
            "percentage": 83.5
        }))
        .unwrap()
    }

    #[test]
    fn card_trusts_supplied_totals() {
        let card = ResultCard::build(&input_from_json());

        assert_eq!(card.summary.grand_total, 75.0);
        assert_eq!(card.summary.percentage, 83.5);
        assert_eq!(card.summary.grade.label, LetterGrade::A);
        assert_eq!(card.summary.rank, 2);
        assert_eq!(card.summary.rank_suffix, "nd");
        assert_eq!(card.summary.max_total, 200.0);
        assert_eq!(card.summary.failed_subjects, 1);
        assert_eq!(card.summary.remark, Remark::Excellent);
        assert_eq!(card.photo_url, DEFAULT_AVATAR);
    }

    #[test]
    fn absent_subject_row_renders_as_absent() {
        let card = ResultCard::build(&input_from_json());
        let arabic = &card.subjects[1];

        assert!(arabic.outcome.is_absent);
        assert!(arabic.outcome.is_failed);
        assert_eq!(arabic.outcome.total_max, 200.0);
        assert_eq!(arabic.percentage_label, "--");

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["subjects"][1]["is_absent"], true);
        assert_eq!(json["subjects"][0]["percentage_label"], "75.0%");
    }

    #[test]
    fn profile_photo_is_kept_when_present() {
        let input = ResultCardInput {
            exam_title: "Midterm".to_string(),
            class_name: "Grade 5".to_string(),
            student: CardStudent {
                reg_number: "R-7".to_string(),
                name: "Yusuf".to_string(),
                profile_photo: Some("https://cdn.example.org/p/7.png".to_string()),
            },
            subjects: vec![SubjectMark {
                subject: Subject {
                    name: "Maths".to_string(),
                    name_arabic: String::new(),
                    scoring_scheme: vec![ScoringComponent::new("t", "Theory", Some(100.0))],
                },
                marks: MarkSet::present([("t", Score::Numeric(30.0))]),
            }],
            grand_total: 30.0,
            rank: 11,
            percentage: 30.0,
        };

        let card = ResultCard::build(&input);
        assert_eq!(card.photo_url, "https://cdn.example.org/p/7.png");
        assert_eq!(card.summary.rank_suffix, "th");
        assert_eq!(card.summary.remark, Remark::NeedsImprovement);
        assert_eq!(card.summary.band, Band::Poor);
    }
}
