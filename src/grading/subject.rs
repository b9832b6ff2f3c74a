// src/grading/subject.rs

use serde::{Deserialize, Serialize};

use super::{
    grade::{Band, denominator, score_band},
    marks::{MarkSet, Score, ScoringComponent},
};

/// A subject fails below this percentage.
pub const PASS_PERCENTAGE: f64 = 35.0;

/// Subject reference data as it appears on a result card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub name_arabic: String,
    pub scoring_scheme: Vec<ScoringComponent>,
}

/// One student's performance in one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMark {
    pub subject: Subject,
    pub marks: MarkSet,
}

/// What a single component cell shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentDisplay {
    /// The component was recorded as `"A"`.
    Absent,
    Score {
        obtained: f64,
        max: Option<f64>,
        band: Band,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentCell {
    pub key: String,
    pub label: String,
    pub display: ComponentDisplay,
}

/// Derived figures for one subject row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectOutcome {
    pub name: String,
    pub name_arabic: String,
    pub is_absent: bool,
    /// Sum of every numeric component maximum, computed components included.
    pub total_max: f64,
    pub total_obtained: f64,
    pub percentage: f64,
    pub is_failed: bool,
    /// `None` for a wholly absent subject.
    pub band: Option<Band>,
    /// Empty when the subject is wholly absent.
    pub components: Vec<ComponentCell>,
}

impl SubjectOutcome {
    /// Percentage as printed on the card: one decimal, or `--` when absent.
    pub fn percentage_label(&self) -> String {
        if self.is_absent {
            "--".to_string()
        } else {
            format!("{:.1}%", self.percentage)
        }
    }

    /// Progress bar fill, clamped to 100. An absent subject shows a full grey bar.
    pub fn bar_fill(&self) -> f64 {
        if self.is_absent {
            100.0
        } else {
            self.percentage.clamp(0.0, 100.0)
        }
    }
}

pub fn total_max(scheme: &[ScoringComponent]) -> f64 {
    scheme.iter().filter_map(|c| c.max).sum()
}

/// Aggregates one subject's marks against its scoring scheme.
pub fn aggregate(mark: &SubjectMark) -> SubjectOutcome {
    let scheme = &mark.subject.scoring_scheme;
    let total_max = total_max(scheme);

    let (total_obtained, percentage, components) = match &mark.marks {
        MarkSet::Absent => (0.0, 0.0, Vec::new()),
        present @ MarkSet::Present(_) => {
            let obtained: f64 = scheme.iter().map(|c| present.score(&c.key).value()).sum();
            let percentage = obtained / denominator(Some(total_max)) * 100.0;
            let cells = scheme.iter().map(|c| component_cell(c, present)).collect();
            (obtained, percentage, cells)
        }
    };

    let is_absent = mark.marks.is_absent();

    SubjectOutcome {
        name: mark.subject.name.clone(),
        name_arabic: mark.subject.name_arabic.clone(),
        is_absent,
        total_max,
        total_obtained,
        percentage,
        is_failed: is_absent || percentage < PASS_PERCENTAGE,
        band: (!is_absent).then(|| Band::for_percentage(percentage)),
        components,
    }
}

fn component_cell(component: &ScoringComponent, marks: &MarkSet) -> ComponentCell {
    let display = match marks.score(&component.key) {
        Score::ComponentAbsent => ComponentDisplay::Absent,
        score => ComponentDisplay::Score {
            obtained: score.value(),
            max: component.max,
            band: score_band(score.value(), component.max),
        },
    };

    ComponentCell {
        key: component.key.clone(),
        label: component.label.clone(),
        display,
    }
}
