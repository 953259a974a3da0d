use std::collections::BTreeMap;

use super::filter::{FilterKind, FilterSelection, FilteredView};
use super::model::AppType;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One per-category statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryValue<T> {
    pub category: String,
    pub value: T,
}

/// Projection of a row for the top-rated table.
#[derive(Debug, Clone, PartialEq)]
pub struct TopRated {
    pub app: String,
    pub rating: f64,
    pub genres: String,
}

/// Everything the charts and summary tables show.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    /// Categories the user picked, for the heading.
    pub selected: Vec<String>,
    /// Ascending by category. `None` when no row of the group is rated.
    pub mean_rating: Vec<CategoryValue<Option<f64>>>,
    /// Ascending by category, in percent.
    pub percent_free: Vec<CategoryValue<f64>>,
    /// Descending by rating, ties in view order.
    pub top_rated: Vec<TopRated>,
    /// Descending by installs, ties by category.
    pub installs_sum: Vec<CategoryValue<u64>>,
}

/// What the report area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// Category filter is off.
    Hidden,
    /// Category filter is on with nothing selected.
    SelectCategory,
    Ready(AggregateReport),
}

/// Build the reports for `view`, gated on the Category filter.
pub fn report(view: &FilteredView<'_>, selection: &FilterSelection, top_n: usize) -> ReportOutcome {
    if !selection.is_active(FilterKind::Category) {
        return ReportOutcome::Hidden;
    }
    if selection.categories.is_empty() {
        return ReportOutcome::SelectCategory;
    }
    ReportOutcome::Ready(AggregateReport {
        selected: selection.categories.iter().cloned().collect(),
        mean_rating: mean_rating_by_category(view),
        percent_free: percent_free_by_category(view),
        top_rated: top_rated(view, top_n),
        installs_sum: installs_sum_by_category(view),
    })
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Mean rating per category, ignoring unrated rows.
pub fn mean_rating_by_category(view: &FilteredView<'_>) -> Vec<CategoryValue<Option<f64>>> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in view.rows() {
        let (sum, count) = groups.entry(row.category.as_str()).or_default();
        if let Some(rating) = row.rating {
            *sum += rating;
            *count += 1;
        }
    }
    groups
        .into_iter()
        .map(|(category, (sum, count))| CategoryValue {
            category: category.to_string(),
            value: (count > 0).then(|| sum / count as f64),
        })
        .collect()
}

/// `100 * free / rows` per category.
pub fn percent_free_by_category(view: &FilteredView<'_>) -> Vec<CategoryValue<f64>> {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for row in view.rows() {
        let (free, total) = groups.entry(row.category.as_str()).or_default();
        if row.app_type == Some(AppType::Free) {
            *free += 1;
        }
        *total += 1;
    }
    groups
        .into_iter()
        .map(|(category, (free, total))| CategoryValue {
            category: category.to_string(),
            value: 100.0 * free as f64 / total as f64,
        })
        .collect()
}

/// The `n` highest-rated rows. Unrated rows never qualify.
pub fn top_rated(view: &FilteredView<'_>, n: usize) -> Vec<TopRated> {
    let mut rated: Vec<_> = view
        .rows()
        .filter_map(|row| row.rating.map(|rating| (row, rating)))
        .collect();
    // Stable: equal ratings keep view order.
    rated.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    rated
        .into_iter()
        .take(n)
        .map(|(row, rating)| TopRated {
            app: row.app.clone(),
            rating,
            genres: row.genres.clone(),
        })
        .collect()
}

/// Total installs per category, largest first.
pub fn installs_sum_by_category(view: &FilteredView<'_>) -> Vec<CategoryValue<u64>> {
    let mut groups: BTreeMap<&str, u64> = BTreeMap::new();
    for row in view.rows() {
        *groups.entry(row.category.as_str()).or_default() += row.installs;
    }
    let mut sums: Vec<CategoryValue<u64>> = groups
        .into_iter()
        .map(|(category, value)| CategoryValue {
            category: category.to_string(),
            value,
        })
        .collect();
    sums.sort_by(|a, b| b.value.cmp(&a.value));
    sums
}
