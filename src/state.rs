use std::path::PathBuf;
use std::sync::Arc;

use crate::data::filter::{filtered_indices, FilterState};
use crate::data::loader::DataStore;
use crate::data::model::{DatasetRow, VideoTable};
use crate::error::ViewerError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Load-once access to the current dataset file.
    pub store: DataStore,

    /// Loaded table (None until a load succeeds).
    pub table: Option<Arc<VideoTable>>,

    /// Current filter selections.
    pub filters: Option<FilterState>,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Position of the selected row within `visible_indices`.
    pub selected: usize,

    /// Error from the last load attempt.
    pub error: Option<ViewerError>,
}

impl AppState {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            store: DataStore::new(data_path),
            table: None,
            filters: None,
            visible_indices: Vec::new(),
            selected: 0,
            error: None,
        }
    }

    /// Pull the table through the store and reset filters and selection.
    pub fn load(&mut self) {
        match self.store.load_table() {
            Ok(table) => {
                log::debug!(
                    "{} served from a store that has read its file {} time(s)",
                    self.store.path().display(),
                    self.store.load_count()
                );
                let filters = FilterState::for_table(&table);
                self.visible_indices = (0..table.len()).collect();
                self.filters = Some(filters);
                self.table = Some(table);
                self.selected = 0;
                self.error = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.store.path().display());
                self.table = None;
                self.filters = None;
                self.visible_indices.clear();
                self.selected = 0;
                self.error = Some(e);
            }
        }
    }

    /// Switch to another dataset file.
    pub fn open(&mut self, path: PathBuf) {
        log::info!("Opening {}", path.display());
        self.store = DataStore::new(path);
        self.load();
    }

    /// Re-read the current file from disk.
    pub fn reload(&mut self) {
        let path = self.store.path().to_path_buf();
        self.open(path);
    }

    /// Recompute `visible_indices` after a filter change and keep the
    /// selection in range.
    pub fn refilter(&mut self) {
        if let (Some(table), Some(filters)) = (&self.table, &self.filters) {
            self.visible_indices = filtered_indices(table, filters);
            log::debug!(
                "{} of {} rows match the filters",
                self.visible_indices.len(),
                table.len()
            );
        }
        if self.selected >= self.visible_indices.len() {
            self.selected = 0;
        }
    }

    /// Back to the identity filter.
    pub fn reset_filters(&mut self) {
        if let Some(table) = &self.table {
            self.filters = Some(FilterState::for_table(table));
            self.refilter();
        }
    }

    /// Update filters through `edit`, refiltering only when they changed.
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut FilterState)) {
        let Some(filters) = self.filters.as_mut() else {
            return;
        };
        let before = filters.clone();
        edit(filters);
        if *filters != before {
            self.refilter();
        }
    }

    /// Choose the row at `position` within the visible rows.
    pub fn select(&mut self, position: usize) {
        if position < self.visible_indices.len() {
            self.selected = position;
        }
    }

    /// The selected row, or `None` when no row passes the filters.
    pub fn selected_row(&self) -> Option<&DatasetRow> {
        let table = self.table.as_ref()?;
        let idx = *self.visible_indices.get(self.selected)?;
        table.rows.get(idx)
    }

    /// Number of rows in the loaded table.
    pub fn total_rows(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.len())
    }
}
