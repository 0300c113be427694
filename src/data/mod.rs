/// Data layer: core types, loading, filtering and the per-row view model.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → VideoTable (DataStore loads it once)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ VideoTable │  Vec<DatasetRow>, distinct values, duration bounds
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  categorical + duration predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  detail   │  selected row → label, URLs, info, options, JSON
///   └──────────┘
/// ```

pub mod detail;
pub mod filter;
pub mod loader;
pub mod model;
