use std::path::Path;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::export::export_csv;
use crate::data::filter::{FilterKind, FilterSelection, FilteredView, Range, SessionContext};
use crate::data::model::{Column, Dataset};
use crate::data::pipeline::{recompute, PipelineConfig, Snapshot};
use crate::data::sort::SortKey;
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One user session, independent of rendering.
///
/// Every mutator ends with [`AppState::refresh`], so `snapshot` always
/// reflects the current selection, page and sort order.
pub struct AppState {
    /// Loaded catalog, shared with the load-once cache.
    pub dataset: Arc<Dataset>,

    pub settings: Settings,

    /// Default category sample, fixed for the session.
    pub session: SessionContext,

    pub selection: FilterSelection,

    /// Requested page, 1-based. Clamped on every refresh.
    pub page_number: usize,

    pub sort: Option<SortKey>,

    /// Output of the last recompute pass.
    pub snapshot: Snapshot,

    /// Colour per category for charts and checkboxes.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start a session with a freshly sampled default category set.
    pub fn new(dataset: Arc<Dataset>, settings: Settings) -> Self {
        let session =
            SessionContext::new(&dataset, settings.default_category_count, &mut rand::rng());
        Self::with_session(dataset, settings, session)
    }

    pub fn with_session(dataset: Arc<Dataset>, settings: Settings, session: SessionContext) -> Self {
        let color_map = ColorMap::new(&dataset.categories);
        let mut state = Self {
            dataset,
            settings,
            session,
            selection: FilterSelection::default(),
            page_number: 1,
            sort: None,
            snapshot: Snapshot::default(),
            color_map,
            status_message: None,
        };
        state.refresh();
        state
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            page_size: self.settings.page_size,
            top_n: self.settings.top_n,
        }
    }

    /// Rerun filter → report → pager and resolve pending range parameters.
    pub fn refresh(&mut self) {
        match recompute(
            &self.dataset,
            &self.selection,
            self.page_number,
            self.sort,
            self.config(),
        ) {
            Ok(snapshot) => {
                let sel = &mut self.selection;
                if sel.is_active(FilterKind::Installs) && sel.installs.is_none() {
                    sel.installs = snapshot.installs_max.map(|max| Range::new(0, max));
                    sel.installs_bound = snapshot.installs_max;
                }
                if sel.is_active(FilterKind::Reviews) && sel.reviews.is_none() {
                    sel.reviews = snapshot.reviews_max.map(|max| Range::new(0, max));
                    sel.reviews_bound = snapshot.reviews_max;
                }
                self.page_number = snapshot.page_number;
                self.snapshot = snapshot;
            }
            Err(e) => {
                log::error!("Recompute failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Current filtered view, borrowed from the dataset.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::from_indices(&self.dataset, self.snapshot.visible.clone())
    }

    pub fn set_filter_active(&mut self, kind: FilterKind, active: bool) {
        if active {
            self.selection.activate(kind, &self.session);
        } else {
            self.selection.deactivate(kind);
        }
        self.refresh();
    }

    pub fn set_rating(&mut self, range: Range<f64>) {
        self.selection.rating = range;
        self.refresh();
    }

    pub fn set_installs(&mut self, range: Range<u64>) {
        self.selection.installs = Some(range);
        self.refresh();
    }

    pub fn set_reviews(&mut self, range: Range<u64>) {
        self.selection.reviews = Some(range);
        self.refresh();
    }

    pub fn toggle_category(&mut self, category: &str) {
        if !self.selection.categories.remove(category) {
            self.selection.categories.insert(category.to_string());
        }
        self.refresh();
    }

    pub fn toggle_genre(&mut self, tag: &str) {
        if !self.selection.genres.remove(tag) {
            self.selection.genres.insert(tag.to_string());
        }
        self.refresh();
    }

    pub fn set_page(&mut self, page_number: usize) {
        self.page_number = page_number;
        self.refresh();
    }

    /// Header click in the grid.
    pub fn sort_by(&mut self, column: Column) {
        self.sort = Some(SortKey::clicked(self.sort, column));
        self.refresh();
    }

    /// Write the current view to `path`, reporting the outcome in the status line.
    pub fn export_view(&mut self, path: &Path) {
        match export_csv(&self.view(), path) {
            Ok(rows) => {
                self.status_message = Some(format!("Exported {rows} rows to {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
