use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use anyhow::{bail, Context, Result};
use serde::Serialize;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 5;

/// Cell text the dataset uses for "this option does not exist".
pub const NOT_AVAILABLE: &str = "N/A";

/// Columns every dataset file must provide.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    "video_id",
    "duration",
    "duration_group",
    "topic_category",
    "question_category",
    "video_path",
    "subtitle_path",
    "question",
    "option0",
    "option1",
    "option2",
    "option3",
    "option4",
    "correct_choice",
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
/// Rows are decoded through this type before they become [`DatasetRow`]s,
/// and columns outside the known schema stay in this form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// List columns and JSON arrays.
    List(Vec<CellValue>),
    /// Struct columns and JSON objects.
    Object(BTreeMap<String, CellValue>),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::List(_) | CellValue::Object(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{json}")
            }
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Integers, integral floats and numeric text.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            CellValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text rendering of any non-null scalar.
    pub fn into_text(self) -> Option<String> {
        match self {
            CellValue::String(s) => Some(s),
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// DurationGroup – coarse duration bucket
// ---------------------------------------------------------------------------

/// Pre-computed duration bucket. Numeric buckets sort numerically and
/// before free-form labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum DurationGroup {
    Seconds(i64),
    Label(String),
}

impl DurationGroup {
    pub fn from_cell(cell: CellValue) -> Option<Self> {
        if let Some(secs) = cell.as_i64() {
            return Some(DurationGroup::Seconds(secs));
        }
        cell.into_text().map(DurationGroup::Label)
    }
}

impl fmt::Display for DurationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationGroup::Seconds(s) => write!(f, "{s}"),
            DurationGroup::Label(l) => write!(f, "{l}"),
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetRow – one benchmark example
// ---------------------------------------------------------------------------

/// One row of the benchmark: a video reference, its metadata and a
/// multiple-choice question.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub video_id: String,
    /// Seconds.
    pub duration: f64,
    pub duration_group: DurationGroup,
    pub topic_category: String,
    pub question_category: String,
    pub video_path: String,
    pub subtitle_path: String,
    pub question: String,
    /// `None` where the source holds `"N/A"` or null.
    pub options: [Option<String>; OPTION_COUNT],
    /// Zero-based index into `options`.
    pub correct_choice: i64,
    /// Columns outside the known schema, kept for the full-row view.
    pub extra: BTreeMap<String, CellValue>,
}

impl DatasetRow {
    /// Build a typed row from decoded cells, consuming the known columns.
    /// Whatever is left over ends up in `extra`.
    pub fn from_cells(row: usize, mut cells: BTreeMap<String, CellValue>) -> Result<Self> {
        let mut take = |col: &str| -> Result<CellValue> {
            cells
                .remove(col)
                .with_context(|| format!("Row {row}: missing column '{col}'"))
        };

        let video_id = text(row, "video_id", take("video_id")?)?;
        let duration = take("duration")?
            .as_f64()
            .with_context(|| format!("Row {row}: 'duration' is not a number"))?;
        let duration_group = DurationGroup::from_cell(take("duration_group")?)
            .with_context(|| format!("Row {row}: 'duration_group' is null"))?;
        let topic_category = text(row, "topic_category", take("topic_category")?)?;
        let question_category = text(row, "question_category", take("question_category")?)?;
        let video_path = text(row, "video_path", take("video_path")?)?;
        let subtitle_path = text(row, "subtitle_path", take("subtitle_path")?)?;
        let question = text(row, "question", take("question")?)?;

        let mut options: [Option<String>; OPTION_COUNT] = Default::default();
        for (i, slot) in options.iter_mut().enumerate() {
            *slot = take(&format!("option{i}"))?
                .into_text()
                .filter(|s| s != NOT_AVAILABLE);
        }

        let correct_choice = take("correct_choice")?
            .as_i64()
            .with_context(|| format!("Row {row}: 'correct_choice' is not an integer"))?;

        Ok(DatasetRow {
            video_id,
            duration,
            duration_group,
            topic_category,
            question_category,
            video_path,
            subtitle_path,
            question,
            options,
            correct_choice,
            extra: cells,
        })
    }

    /// The correct option's text, if `correct_choice` points at one.
    pub fn correct_option(&self) -> Option<&str> {
        usize::try_from(self.correct_choice)
            .ok()
            .and_then(|i| self.options.get(i))
            .and_then(|o| o.as_deref())
    }

    /// Data-level inconsistencies worth reporting. The viewer keeps such
    /// rows and displays them as they are.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.correct_option().is_none() {
            issues.push(format!(
                "correct_choice {} does not point at an available option",
                self.correct_choice
            ));
        }
        if self.duration < 0.0 || self.duration.is_nan() {
            issues.push(format!("duration {} is not a valid length", self.duration));
        }
        issues
    }
}

fn text(row: usize, col: &str, cell: CellValue) -> Result<String> {
    match cell.into_text() {
        Some(s) => Ok(s),
        None => bail!("Row {row}: '{col}' is null"),
    }
}

// ---------------------------------------------------------------------------
// VideoTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter indices.
#[derive(Debug, Clone)]
pub struct VideoTable {
    pub rows: Vec<DatasetRow>,
    pub topics: BTreeSet<String>,
    pub question_categories: BTreeSet<String>,
    pub duration_groups: BTreeSet<DurationGroup>,
    /// Observed `(min, max)` of `duration`; `(0.0, 0.0)` when empty.
    pub duration_bounds: (f64, f64),
}

impl VideoTable {
    pub fn from_rows(rows: Vec<DatasetRow>) -> Self {
        let mut topics = BTreeSet::new();
        let mut question_categories = BTreeSet::new();
        let mut duration_groups = BTreeSet::new();
        let mut bounds: Option<(f64, f64)> = None;

        for row in &rows {
            topics.insert(row.topic_category.clone());
            question_categories.insert(row.question_category.clone());
            duration_groups.insert(row.duration_group.clone());
            bounds = Some(match bounds {
                None => (row.duration, row.duration),
                Some((lo, hi)) => (lo.min(row.duration), hi.max(row.duration)),
            });
        }

        VideoTable {
            rows,
            topics,
            question_categories,
            duration_groups,
            duration_bounds: bounds.unwrap_or((0.0, 0.0)),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
