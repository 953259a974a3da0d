use std::collections::BTreeSet;

use super::error::PageError;
use super::filter::{apply_staged, EmptySelection, FilterSelection};
use super::model::Dataset;
use super::pager::{clamp_page, page, total_pages};
use super::report::{report, ReportOutcome};
use super::sort::{sort_indices, SortKey};

/// Knobs of one recompute pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub page_size: usize,
    pub top_n: usize,
}

/// Owned result of one pass through filter → report → pager.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Dataset indices of the filtered view.
    pub visible: Vec<usize>,
    pub installs_max: Option<u64>,
    pub reviews_max: Option<u64>,
    pub genre_tags: Option<BTreeSet<String>>,
    pub empty_selections: Vec<EmptySelection>,
    pub report: ReportOutcome,
    /// Dataset indices of the current page, in grid order.
    pub page_rows: Vec<usize>,
    pub page_number: usize,
    pub total_pages: usize,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            visible: Vec::new(),
            installs_max: None,
            reviews_max: None,
            genre_tags: None,
            empty_selections: Vec::new(),
            report: ReportOutcome::Hidden,
            page_rows: Vec::new(),
            page_number: 1,
            total_pages: 1,
        }
    }
}

/// Recompute everything the UI shows from scratch.
///
/// `requested_page` is clamped to the new page count before paging.
pub fn recompute(
    dataset: &Dataset,
    selection: &FilterSelection,
    requested_page: usize,
    sort: Option<SortKey>,
    config: PipelineConfig,
) -> Result<Snapshot, PageError> {
    let pass = apply_staged(dataset, selection);
    let report = report(&pass.view, selection, config.top_n);

    let page_number = clamp_page(requested_page, total_pages(pass.view.len(), config.page_size));
    let current = page(pass.view.indices(), config.page_size, page_number)?;
    let mut page_rows = current.rows.to_vec();
    if let Some(key) = sort {
        sort_indices(&mut page_rows, dataset, key);
    }

    log::debug!(
        "recompute: {} of {} rows visible, page {}/{}",
        pass.view.len(),
        dataset.len(),
        current.page_number,
        current.total_pages
    );

    Ok(Snapshot {
        page_number: current.page_number,
        total_pages: current.total_pages,
        page_rows,
        visible: pass.view.into_indices(),
        installs_max: pass.installs_max,
        reviews_max: pass.reviews_max,
        genre_tags: pass.genre_tags,
        empty_selections: pass.empty_selections,
        report,
    })
}
