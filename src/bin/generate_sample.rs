use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const DEFAULT_OUTPUT: &str = "data/test-00000-of-00001 (1).parquet";
const ROWS: usize = 120;

const TOPICS: [&str; 6] = [
    "Movie Recaps",
    "Life Vlogs",
    "News Programs",
    "Knowledge",
    "Travel Guides",
    "Cooking",
];
const QUESTION_CATEGORIES: [&str; 6] = ["S2E", "E2O", "T2E", "TOS", "SSS", "O3O"];

/// `(group, min seconds, max seconds)`
const DURATION_GROUPS: [(i64, f64, f64); 4] = [
    (15, 8.0, 15.0),
    (60, 15.0, 60.0),
    (600, 180.0, 600.0),
    (3600, 900.0, 3600.0),
];

const SUBJECTS: [&str; 8] = [
    "a red car",
    "a woman in a hat",
    "a brown dog",
    "a wooden boat",
    "a street market",
    "a kitchen counter",
    "a city skyline",
    "a mountain trail",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// An 11-character id in the video platform's alphabet.
    fn video_id(&mut self) -> String {
        const ALPHABET: &[u8] =
            b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
        (0..11)
            .map(|_| ALPHABET[self.below(ALPHABET.len())] as char)
            .collect()
    }
}

#[derive(Default)]
struct Columns {
    video_id: Vec<String>,
    duration: Vec<f64>,
    duration_group: Vec<i64>,
    topic_category: Vec<String>,
    question_category: Vec<String>,
    video_path: Vec<String>,
    subtitle_path: Vec<String>,
    question: Vec<String>,
    options: [Vec<String>; 5],
    correct_choice: Vec<i64>,
    view_count: Vec<i64>,
}

fn text_array(values: &[String]) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(values))
}

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let mut rng = SimpleRng::new(42);
    let mut cols = Columns::default();

    for _ in 0..ROWS {
        let id = rng.video_id();
        let (group, lo, hi) = DURATION_GROUPS[rng.below(DURATION_GROUPS.len())];
        let duration = ((lo + rng.next_f64() * (hi - lo)) * 100.0).round() / 100.0;

        // Four or five real options; the rest are "N/A".
        let n_options = 4 + rng.below(2);
        let correct = rng.below(n_options);
        for (i, col) in cols.options.iter_mut().enumerate() {
            let value = if i < n_options {
                rng.pick(&SUBJECTS).to_string()
            } else {
                "N/A".to_string()
            };
            col.push(value);
        }

        cols.question.push(format!(
            "Which of these appears right after the narrator mentions {}?",
            rng.pick(&SUBJECTS)
        ));
        cols.video_path.push(format!("{id}.mp4"));
        cols.subtitle_path.push(format!("{id}_en.json"));
        cols.video_id.push(id);
        cols.duration.push(duration);
        cols.duration_group.push(group);
        cols.topic_category.push(rng.pick(&TOPICS).to_string());
        cols.question_category
            .push(rng.pick(&QUESTION_CATEGORIES).to_string());
        cols.correct_choice.push(correct as i64);
        cols.view_count.push((rng.next_f64() * 1_000_000.0) as i64);
    }

    let text = |name: &str| Field::new(name, DataType::Utf8, false);
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
        Field::new("view_count", DataType::Int64, false),
    ]));

    let mut arrays: Vec<ArrayRef> = vec![
        text_array(&cols.video_id),
        Arc::new(Float64Array::from(cols.duration)),
        Arc::new(Int64Array::from(cols.duration_group)),
        text_array(&cols.topic_category),
        text_array(&cols.question_category),
        text_array(&cols.video_path),
        text_array(&cols.subtitle_path),
        text_array(&cols.question),
    ];
    arrays.extend(cols.options.iter().map(|o| text_array(o)));
    arrays.push(Arc::new(Int64Array::from(cols.correct_choice)));
    arrays.push(Arc::new(Int64Array::from(cols.view_count)));

    let batch =
        RecordBatch::try_new(schema.clone(), arrays).context("Failed to create RecordBatch")?;

    // Write Parquet
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = std::fs::File::create(&output).context("Failed to create output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;

    println!("Wrote {ROWS} benchmark rows to {}", output.display());
    Ok(())
}
