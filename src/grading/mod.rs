// src/grading/mod.rs

//! Result-card arithmetic: letter grades, per-subject aggregation and the overall summary.
//! Everything here is pure and synchronous.

pub mod card;
pub mod grade;
pub mod marks;
pub mod subject;
pub mod summary;

pub use card::{CardStudent, ResultCard, ResultCardInput};
pub use grade::{Band, Grade, LetterGrade, grade, score_band};
pub use marks::{MarkSet, Score, ScoringComponent};
pub use subject::{Subject, SubjectMark, SubjectOutcome, aggregate};
pub use summary::{Remark, rank_suffix};
