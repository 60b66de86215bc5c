//! Exercise catalog input: rep-range text, labels and CSV import
//!
//! Users author prescriptions as text ("8", "6-8", "6 – 8") and can paste a
//! whole day as CSV lines of `name, warmups, working, reps, rpe`.

use serde::{Deserialize, Serialize};

use crate::models::exercise::{MAX_EFFORT, MIN_EFFORT};
use crate::models::{ExerciseTarget, NewExercise};

// ---------------------------------------------------------------------------
/// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("name is required")]
    MissingName,

    #[error("\"{0}\": reps must be like 10 or 10-12")]
    BadReps(String),

    #[error("\"{0}\": rpe must be between 6 and 10")]
    BadEffort(String),

    #[error("Row {row}: {source}")]
    InRow {
        row: usize,
        #[source]
        source: Box<CatalogError>,
    },

    #[error("No rows found")]
    NoRows,
}

impl Serialize for CatalogError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// ---------------------------------------------------------------------------
/// Rep Ranges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

/// Parse "10", "10-12" (spaces and en/em dashes tolerated) or "" (no range)
pub fn parse_rep_range(text: &str) -> Option<RepRange> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '–' || c == '—' { '-' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Some(RepRange::default());
    }

    let (start, end) = match cleaned.split_once('-') {
        Some((a, b)) => (parse_reps(a)?, parse_reps(b)?),
        None => {
            let n = parse_reps(&cleaned)?;
            (n, n)
        }
    };

    if start > end {
        return None;
    }
    Some(RepRange {
        start: Some(start),
        end: Some(end),
    })
}

fn parse_reps(s: &str) -> Option<i32> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<i32>().ok().filter(|n| *n > 0)
}

/// Display form of a range: "6-8", "8" or "-"
pub fn rep_range_label(start: Option<i32>, end: Option<i32>) -> String {
    match (start, end) {
        (Some(a), Some(b)) if a == b => a.to_string(),
        (Some(a), Some(b)) => format!("{}-{}", a, b),
        (Some(a), None) => a.to_string(),
        (None, Some(b)) => b.to_string(),
        (None, None) => "-".to_string(),
    }
}

/// Lenient integer field: blank or non-numeric is absent, decimals truncate
pub fn int_or_none(text: &str) -> Option<i64> {
    let n: f64 = text.trim().parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    Some(n.trunc() as i64)
}

// ---------------------------------------------------------------------------
/// Exercise Drafts
// ---------------------------------------------------------------------------

/// Validated exercise fields, not yet tied to a user or stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDraft {
    pub name: String,
    pub target: ExerciseTarget,
}

impl ExerciseDraft {
    /// Validate the text fields of one exercise
    pub fn from_fields(
        name: &str,
        warmups: &str,
        working: &str,
        reps: &str,
        rpe: &str,
    ) -> Result<Self, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::MissingName);
        }

        let range = parse_rep_range(reps).ok_or_else(|| CatalogError::BadReps(name.to_string()))?;

        let effort = int_or_none(rpe);
        if let Some(e) = effort {
            if !(i64::from(MIN_EFFORT)..=i64::from(MAX_EFFORT)).contains(&e) {
                return Err(CatalogError::BadEffort(name.to_string()));
            }
        }

        let target = ExerciseTarget::normalized(
            range.start.map(i64::from),
            range.end.map(i64::from),
            effort,
            int_or_none(warmups),
            int_or_none(working),
        )
        .ok_or_else(|| CatalogError::BadReps(name.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            target,
        })
    }

    pub fn into_new_exercise(
        self,
        user_id: &str,
        split_day_id: Option<i64>,
        order_index: i64,
    ) -> NewExercise {
        NewExercise {
            user_id: user_id.to_string(),
            split_day_id,
            name: self.name,
            order_index,
            target: self.target,
        }
    }
}

/// Parse pasted CSV (or tab separated) exercise lines.
///
/// A leading header line (mentions "name" plus one of warm/working/reps/rpe)
/// is skipped. Errors name the 1-based data row.
pub fn parse_exercise_csv(text: &str) -> Result<Vec<ExerciseDraft>, CatalogError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let Some(first) = lines.first() else {
        return Err(CatalogError::NoRows);
    };

    let header = first.to_lowercase();
    let looks_like_header = header.contains("name")
        && ["warm", "working", "reps", "rpe"]
            .iter()
            .any(|k| header.contains(*k));
    let data = if looks_like_header { &lines[1..] } else { &lines[..] };

    let mut drafts = Vec::with_capacity(data.len());
    for (i, line) in data.iter().enumerate() {
        let cols: Vec<&str> = if line.contains(',') {
            line.split(',').map(str::trim).collect()
        } else {
            line.split('\t').map(str::trim).collect()
        };
        let col = |idx: usize| cols.get(idx).copied().unwrap_or("");

        let draft = ExerciseDraft::from_fields(col(0), col(1), col(2), col(3), col(4))
            .map_err(|e| CatalogError::InRow {
                row: i + 1,
                source: Box::new(e),
            })?;
        drafts.push(draft);
    }

    if drafts.is_empty() {
        return Err(CatalogError::NoRows);
    }
    Ok(drafts)
}
