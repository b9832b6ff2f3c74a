use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'exams' table. One exam is sat by one batch.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub title: String,
    pub batch_id: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub batch_id: i64,
}

/// Ranking outcome for one result row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankAssignment {
    pub result_id: i64,
    pub rank: i32,
}

/// Standard competition ranking ("1224") by descending grand total.
/// Equal totals share a rank and the next rank skips; ties list by result id.
pub fn assign_ranks(totals: &[(i64, f64)]) -> Vec<RankAssignment> {
    let mut sorted: Vec<(i64, f64)> = totals.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut out = Vec::with_capacity(sorted.len());
    let mut previous: Option<f64> = None;
    let mut rank = 0;

    for (position, (result_id, total)) in sorted.into_iter().enumerate() {
        if previous != Some(total) {
            rank = position as i32 + 1;
            previous = Some(total);
        }
        out.push(RankAssignment { result_id, rank });
    }
    out
}
