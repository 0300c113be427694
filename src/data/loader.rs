use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, DatasetRow, VideoTable, REQUIRED_COLUMNS};
use crate::error::ViewerError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a benchmark table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – the format the benchmark is published in (recommended)
/// * `.json`    – `[{ "video_id": ..., "question": ..., ... }, ...]`
/// * `.csv`     – header row, one example per record
pub fn load_file(path: &Path) -> Result<VideoTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    for (i, row) in rows.iter().enumerate() {
        for issue in row.issues() {
            log::warn!("Row {i} ({}): {issue}", row.video_id);
        }
    }

    Ok(VideoTable::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Load-once data store
// ---------------------------------------------------------------------------

/// Data-access service for one dataset file. The file is read at most once
/// per store; later calls hand out the same shared table.
#[derive(Debug)]
pub struct DataStore {
    path: PathBuf,
    table: Option<Arc<VideoTable>>,
    loads: usize,
}

impl DataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: None,
            loads: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How many times the backing file has been read.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    /// Return the cached table, reading the file on first use.
    /// Failures are not cached.
    pub fn load_table(&mut self) -> std::result::Result<Arc<VideoTable>, ViewerError> {
        if let Some(table) = &self.table {
            return Ok(Arc::clone(table));
        }

        if matches!(self.path.try_exists(), Ok(false)) {
            return Err(ViewerError::DataFileMissing {
                path: self.path.clone(),
            });
        }

        self.loads += 1;
        let table = load_file(&self.path)
            .with_context(|| format!("loading {}", self.path.display()))
            .map_err(|e| ViewerError::from_load(self.path.clone(), e))?;

        log::info!(
            "Loaded {} rows ({} topics, {} question categories) from {}",
            table.len(),
            table.topics.len(),
            table.question_categories.len(),
            self.path.display()
        );

        let table = Arc::new(table);
        self.table = Some(Arc::clone(&table));
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "video_id": "86CxyhFV9MI",
///     "duration": 23.96,
///     "duration_group": 15,
///     "question": "...",
///     "option0": "...",
///     ...
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<DatasetRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            let cells = obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_cell(val)))
                .collect();
            DatasetRow::from_cells(i, cells)
        })
        .collect()
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        JsonValue::Array(items) => CellValue::List(items.iter().map(json_to_cell).collect()),
        JsonValue::Object(obj) => CellValue::Object(
            obj.iter()
                .map(|(key, val)| (key.clone(), json_to_cell(val)))
                .collect(),
        ),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one example per record.
/// Known columns are kept as text and typed by [`DatasetRow::from_cells`];
/// other columns get their type guessed.
fn load_csv(path: &Path) -> Result<Vec<DatasetRow>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!("CSV missing '{col}' column");
        }
    }

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let cells: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| {
                let cell = if value.is_empty() {
                    CellValue::Null
                } else if REQUIRED_COLUMNS.contains(&col.as_str()) {
                    CellValue::String(value.to_string())
                } else {
                    guess_cell_type(value)
                };
                (col.clone(), cell)
            })
            .collect();

        rows.push(DatasetRow::from_cells(row_no, cells)?);
    }

    Ok(rows)
}

fn guess_cell_type(s: &str) -> CellValue {
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load the benchmark's Parquet file.
///
/// Every column in [`REQUIRED_COLUMNS`] must be present; any other
/// column is carried along as an extra. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`),
/// including dictionary-encoded (categorical) columns.
fn load_parquet(path: &Path) -> Result<Vec<DatasetRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for col in REQUIRED_COLUMNS {
            if schema.index_of(col).is_err() {
                bail!("Parquet file missing '{col}' column");
            }
        }

        let columns: Vec<(String, ArrayRef)> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, col)| Ok((field.name().clone(), decode_dictionary(col)?)))
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            let row_no = rows.len();
            let cells = columns
                .iter()
                .map(|(name, col)| (name.clone(), extract_cell(col, row)))
                .collect();
            rows.push(DatasetRow::from_cells(row_no, cells)?);
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Categorical columns arrive dictionary-encoded; flatten them to plain
/// value arrays.
fn decode_dictionary(col: &ArrayRef) -> Result<ArrayRef> {
    match col.data_type() {
        DataType::Dictionary(_, value_type) => {
            cast(col, value_type).context("decoding dictionary column")
        }
        _ => Ok(Arc::clone(col)),
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Utf8View => CellValue::String(col.as_string_view().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(CellValue::Integer)
                .unwrap_or(CellValue::Float(v as f64))
        }
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row).into())
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::List(_) => list_cell(&col.as_list::<i32>().value(row)),
        DataType::LargeList(_) => list_cell(&col.as_list::<i64>().value(row)),
        DataType::FixedSizeList(_, _) => list_cell(&col.as_fixed_size_list().value(row)),
        DataType::Struct(_) => {
            let st = col.as_struct();
            CellValue::Object(
                st.column_names()
                    .into_iter()
                    .zip(st.columns())
                    .map(|(name, child)| (name.to_string(), extract_cell(child, row)))
                    .collect(),
            )
        }
        _ => formatted_cell(col, row),
    }
}

fn list_cell(values: &ArrayRef) -> CellValue {
    CellValue::List((0..values.len()).map(|i| extract_cell(values, i)).collect())
}

/// Temporal, decimal, binary and other types: Arrow's own value rendering.
fn formatted_cell(col: &ArrayRef, row: usize) -> CellValue {
    match ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default()) {
        Ok(formatter) => CellValue::String(formatter.value(row).to_string()),
        Err(e) => {
            log::warn!("Cannot display {:?} value: {e}", col.data_type());
            CellValue::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int32Array, Int64Array, Int64Builder, ListBuilder, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use crate::data::model::DurationGroup;

    fn strings(values: &[Option<&str>]) -> ArrayRef {
        Arc::new(StringArray::from(values.to_vec()))
    }

    fn write_parquet(path: &Path) -> Result<()> {
        let text = |name: &str| Field::new(name, DataType::Utf8, true);
        let schema = Arc::new(Schema::new(vec![
            text("video_id"),
            Field::new("duration", DataType::Float64, false),
            Field::new("duration_group", DataType::Int64, false),
            text("topic_category"),
            text("question_category"),
            text("video_path"),
            text("subtitle_path"),
            text("question"),
            text("option0"),
            text("option1"),
            text("option2"),
            text("option3"),
            text("option4"),
            Field::new("correct_choice", DataType::Int64, false),
            Field::new("view_count", DataType::Int32, true),
            Field::new(
                "position",
                DataType::List(Arc::new(Field::new("item", DataType::Int64, true))),
                true,
            ),
        ]));

        let mut position = ListBuilder::new(Int64Builder::new());
        position.values().append_slice(&[12, 40]);
        position.append(true);
        position.append(true);

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                strings(&[Some("vid_a"), Some("vid_b")]),
                Arc::new(Float64Array::from(vec![12.5, 640.0])),
                Arc::new(Int64Array::from(vec![15, 600])),
                strings(&[Some("Movie"), Some("News")]),
                strings(&[Some("S2E"), Some("TOS")]),
                strings(&[Some("vid_a.mp4"), Some("vid_b.mp4")]),
                strings(&[Some("vid_a_en.json"), Some("vid_b_en.json")]),
                strings(&[Some("Who speaks first?"), Some("What is shown last?")]),
                strings(&[Some("cat"), Some("a map")]),
                strings(&[Some("N/A"), Some("a car")]),
                strings(&[Some("dog"), Some("a boat")]),
                strings(&[None, Some("a plane")]),
                strings(&[Some("bird"), Some("N/A")]),
                Arc::new(Int64Array::from(vec![2, 0])),
                Arc::new(Int32Array::from(vec![Some(1200), None])),
                Arc::new(position.finish()),
            ],
        )?;

        let file = std::fs::File::create(path)?;
        let mut writer = ArrowWriter::try_new(file, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    const JSON_ROWS: &str = r#"[
        {"video_id": "j1", "duration": 70.2, "duration_group": 60,
         "topic_category": "Vlog", "question_category": "E2O",
         "video_path": "j1.mp4", "subtitle_path": "j1_en.json",
         "question": "What color is the car?",
         "option0": "red", "option1": "blue", "option2": "N/A",
         "option3": "N/A", "option4": "N/A", "correct_choice": 1,
         "position": [1, 2]}
    ]"#;

    const CSV_ROWS: &str = "\
video_id,duration,duration_group,topic_category,question_category,video_path,subtitle_path,question,option0,option1,option2,option3,option4,correct_choice,view_count
00123,14.0,15,Movie,S2E,a.mp4,a.json,Who?,Ann,Bob,N/A,N/A,N/A,0,77
";

    #[test]
    fn parquet_rows_are_typed_and_extras_kept() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bench.parquet");
        write_parquet(&path)?;

        let table = load_file(&path)?;
        assert_eq!(table.len(), 2);

        let first = &table.rows[0];
        assert_eq!(first.video_id, "vid_a");
        assert_eq!(first.duration_group, DurationGroup::Seconds(15));
        assert_eq!(first.options[1], None);
        assert_eq!(first.options[3], None);
        assert_eq!(first.correct_option(), Some("dog"));
        assert_eq!(first.extra.get("view_count"), Some(&CellValue::Integer(1200)));
        assert_eq!(table.rows[1].extra.get("view_count"), Some(&CellValue::Null));
        assert_eq!(table.duration_bounds, (12.5, 640.0));
        Ok(())
    }

    #[test]
    fn parquet_list_columns_keep_their_values() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bench.parquet");
        write_parquet(&path)?;

        let table = load_file(&path)?;
        assert_eq!(
            table.rows[0].extra.get("position"),
            Some(&CellValue::List(vec![
                CellValue::Integer(12),
                CellValue::Integer(40)
            ]))
        );
        assert_eq!(table.rows[1].extra.get("position"), Some(&CellValue::List(vec![])));

        let json = crate::data::detail::row_json(&table.rows[0]);
        assert_eq!(json["position"], serde_json::json!([12, 40]));
        Ok(())
    }

    #[test]
    fn json_records_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bench.json");
        std::fs::write(&path, JSON_ROWS)?;

        let table = load_file(&path)?;
        let row = &table.rows[0];
        assert_eq!(row.duration_group, DurationGroup::Seconds(60));
        assert_eq!(row.correct_option(), Some("blue"));
        assert_eq!(
            row.extra.get("position"),
            Some(&CellValue::List(vec![
                CellValue::Integer(1),
                CellValue::Integer(2)
            ]))
        );
        Ok(())
    }

    #[test]
    fn csv_keeps_identifiers_verbatim() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bench.csv");
        std::fs::write(&path, CSV_ROWS)?;

        let table = load_file(&path)?;
        let row = &table.rows[0];
        assert_eq!(row.video_id, "00123");
        assert_eq!(row.duration, 14.0);
        assert_eq!(row.correct_option(), Some("Ann"));
        assert_eq!(row.extra.get("view_count"), Some(&CellValue::Integer(77)));
        Ok(())
    }

    #[test]
    fn csv_without_required_column_fails() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bench.csv");
        std::fs::write(&path, "video_id,duration\nabc,1.0\n")?;

        let err = load_file(&path).unwrap_err().to_string();
        assert!(err.contains("duration_group"), "{err}");
        Ok(())
    }

    #[test]
    fn store_reads_file_once() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bench.parquet");
        write_parquet(&path)?;

        let mut store = DataStore::new(&path);
        let first = store.load_table()?;
        let second = store.load_table()?;

        assert_eq!(store.load_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.rows, second.rows);
        Ok(())
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.parquet");
        let mut store = DataStore::new(&path);

        let err = store.load_table().unwrap_err();
        assert!(matches!(err, ViewerError::DataFileMissing { path: ref p } if *p == path));
        assert_eq!(store.load_count(), 0);
    }

    #[test]
    fn unreachable_path_is_unexpected_not_missing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("plain_file");
        std::fs::write(&blocker, "not a directory")?;
        let path = blocker.join("bench.parquet");

        let mut store = DataStore::new(&path);
        assert!(matches!(store.load_table(), Err(ViewerError::Unexpected(_))));
        Ok(())
    }

    #[test]
    fn malformed_file_is_unexpected_and_not_cached() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.parquet");
        std::fs::write(&path, b"not a parquet file")?;

        let mut store = DataStore::new(&path);
        assert!(matches!(store.load_table(), Err(ViewerError::Unexpected(_))));
        assert!(matches!(store.load_table(), Err(ViewerError::Unexpected(_))));
        assert_eq!(store.load_count(), 2);
        Ok(())
    }

    #[test]
    fn unsupported_extension_is_unexpected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bench.txt");
        std::fs::write(&path, "hello")?;

        let err = DataStore::new(&path).load_table().unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
        Ok(())
    }
}
