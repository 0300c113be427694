use serde_json::{Map, Value as JsonValue};

use super::model::{DatasetRow, NOT_AVAILABLE};
use crate::config::{EMBED_URL_PREFIX, WATCH_URL_PREFIX};

// ---------------------------------------------------------------------------
// What the detail panel shows for one row
// ---------------------------------------------------------------------------

/// Selector label for a row.
pub fn row_label(row: &DatasetRow) -> String {
    format!("{} - {}", row.video_id, row.topic_category)
}

/// Inline player address for `video_id`.
pub fn embed_url(video_id: &str) -> String {
    format!("{EMBED_URL_PREFIX}{video_id}")
}

/// Canonical watch page for `video_id`.
pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL_PREFIX}{video_id}")
}

/// Ordered `(label, value)` pairs for the "Basic info" grid.
/// Duration groups are bucket sizes in seconds, so every group label,
/// numeric or not, carries the unit.
pub fn info_fields(row: &DatasetRow) -> Vec<(&'static str, String)> {
    let group = format!("{} s", row.duration_group);
    vec![
        ("Video ID", row.video_id.clone()),
        ("Duration", format!("{:.2} s", row.duration)),
        ("Duration Group", group),
        ("Topic Category", row.topic_category.clone()),
        ("Question Category", row.question_category.clone()),
        ("Video Path", row.video_path.clone()),
        ("Subtitle Path", row.subtitle_path.clone()),
    ]
}

/// One answer option as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLine<'a> {
    pub index: usize,
    pub text: &'a str,
    pub correct: bool,
}

/// Available options in index order; absent ones are skipped.
pub fn option_lines(row: &DatasetRow) -> Vec<OptionLine<'_>> {
    row.options
        .iter()
        .enumerate()
        .filter_map(|(index, opt)| {
            opt.as_deref().map(|text| OptionLine {
                index,
                text,
                correct: i64::try_from(index).is_ok_and(|i| i == row.correct_choice),
            })
        })
        .collect()
}

/// The whole row as a JSON object, including columns outside the known
/// schema. Keys come out sorted.
pub fn row_json(row: &DatasetRow) -> JsonValue {
    let mut obj = Map::new();
    obj.insert("video_id".into(), row.video_id.clone().into());
    obj.insert("duration".into(), row.duration.into());
    obj.insert(
        "duration_group".into(),
        serde_json::to_value(&row.duration_group).unwrap_or(JsonValue::Null),
    );
    obj.insert("topic_category".into(), row.topic_category.clone().into());
    obj.insert("question_category".into(), row.question_category.clone().into());
    obj.insert("video_path".into(), row.video_path.clone().into());
    obj.insert("subtitle_path".into(), row.subtitle_path.clone().into());
    obj.insert("question".into(), row.question.clone().into());
    for (i, opt) in row.options.iter().enumerate() {
        let text = opt.as_deref().unwrap_or(NOT_AVAILABLE);
        obj.insert(format!("option{i}"), text.into());
    }
    obj.insert("correct_choice".into(), row.correct_choice.into());
    for (key, value) in &row.extra {
        obj.insert(
            key.clone(),
            serde_json::to_value(value).unwrap_or(JsonValue::Null),
        );
    }
    JsonValue::Object(obj)
}
