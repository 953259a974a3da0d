use std::collections::BTreeSet;
use std::fmt;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::model::{AppRecord, Dataset};

// ---------------------------------------------------------------------------
// Filter kinds and parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKind {
    Category,
    Rating,
    Reviews,
    Installs,
    Genres,
}

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        FilterKind::Category,
        FilterKind::Rating,
        FilterKind::Reviews,
        FilterKind::Installs,
        FilterKind::Genres,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterKind::Category => "Category",
            FilterKind::Rating => "Rating",
            FilterKind::Reviews => "Reviews",
            FilterKind::Installs => "Installs",
            FilterKind::Genres => "Genres",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive `[low, high]` range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range<T> {
    pub low: T,
    pub high: T,
}

impl<T: PartialOrd + Copy> Range<T> {
    pub fn new(low: T, high: T) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: T) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Fixed slider bounds of the rating filter.
pub const RATING_BOUNDS: Range<f64> = Range {
    low: 0.0,
    high: 5.0,
};

/// Per-session state that must survive interactions: the random default
/// category sample offered when the Category filter is switched on.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    default_categories: Vec<String>,
}

impl SessionContext {
    /// Sample `sample_size` distinct categories uniformly at random.
    /// Datasets with fewer categories yield all of them.
    pub fn new<R: Rng + ?Sized>(dataset: &Dataset, sample_size: usize, rng: &mut R) -> Self {
        let mut picked: Vec<String> = dataset
            .categories
            .choose_multiple(rng, sample_size)
            .cloned()
            .collect();
        picked.sort();
        Self {
            default_categories: picked,
        }
    }

    pub fn default_categories(&self) -> &[String] {
        &self.default_categories
    }
}

/// Which filters are on and what each one is set to.
///
/// Parameters of inactive filters are kept but ignored. Installs and Reviews
/// ranges are `None` right after activation ("pending"): their slider bounds
/// depend on the view the stage receives, so the session fills them in after
/// the next pass. A pending range lets every row through.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    active: BTreeSet<FilterKind>,
    pub categories: BTreeSet<String>,
    pub rating: Range<f64>,
    pub installs: Option<Range<u64>>,
    pub reviews: Option<Range<u64>>,
    /// Slider maxima captured when the Installs / Reviews range resolved.
    /// They stay put while other filters change the view.
    pub installs_bound: Option<u64>,
    pub reviews_bound: Option<u64>,
    pub genres: BTreeSet<String>,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            active: BTreeSet::new(),
            categories: BTreeSet::new(),
            rating: RATING_BOUNDS,
            installs: None,
            reviews: None,
            installs_bound: None,
            reviews_bound: None,
            genres: BTreeSet::new(),
        }
    }
}

impl FilterSelection {
    pub fn is_active(&self, kind: FilterKind) -> bool {
        self.active.contains(&kind)
    }

    /// Switch a filter on with its default parameters. No-op if already on.
    pub fn activate(&mut self, kind: FilterKind, session: &SessionContext) {
        if !self.active.insert(kind) {
            return;
        }
        match kind {
            FilterKind::Category => {
                self.categories = session.default_categories().iter().cloned().collect();
            }
            FilterKind::Rating => self.rating = RATING_BOUNDS,
            FilterKind::Installs => {
                self.installs = None;
                self.installs_bound = None;
            }
            FilterKind::Reviews => {
                self.reviews = None;
                self.reviews_bound = None;
            }
            FilterKind::Genres => self.genres.clear(),
        }
    }

    pub fn deactivate(&mut self, kind: FilterKind) {
        self.active.remove(&kind);
    }
}

// ---------------------------------------------------------------------------
// FilteredView – borrowed subsequence of the dataset
// ---------------------------------------------------------------------------

/// Rows of a [`Dataset`] that passed the active filters, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// The unfiltered view.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from indices produced by an earlier pass.
    pub fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }

    /// Dataset row indices, in order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a AppRecord> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    pub fn max_installs(&self) -> u64 {
        self.rows().map(|r| r.installs).max().unwrap_or(0)
    }

    pub fn max_reviews(&self) -> u64 {
        self.rows().map(|r| r.reviews).max().unwrap_or(0)
    }

    /// Distinct genre tags over the view.
    pub fn genre_tags(&self) -> BTreeSet<String> {
        self.rows()
            .flat_map(|r| r.genre_tags())
            .map(str::to_string)
            .collect()
    }

    fn retain(&mut self, keep: impl Fn(&AppRecord) -> bool) {
        let dataset = self.dataset;
        self.indices.retain(|&i| keep(&dataset.records[i]));
    }
}

// ---------------------------------------------------------------------------
// Applying the selection
// ---------------------------------------------------------------------------

/// A multi-select filter is on but nothing is chosen. The filter is skipped
/// and the user is prompted instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptySelection(pub FilterKind);

impl EmptySelection {
    pub fn prompt(&self) -> String {
        match self.0 {
            FilterKind::Genres => "Please select at least one genre to see the charts.".into(),
            FilterKind::Category => "Please select at least one category to see the charts.".into(),
            other => format!("Please select at least one {} value.", other.label()),
        }
    }
}

/// Result of one filter pass, with what the controls need to render.
#[derive(Debug, Clone)]
pub struct FilterPass<'a> {
    pub view: FilteredView<'a>,
    /// Installs slider maximum, from the view entering the Installs stage.
    pub installs_max: Option<u64>,
    /// Reviews slider maximum, from the view entering the Reviews stage.
    pub reviews_max: Option<u64>,
    /// Genre tags offered by the Genres stage.
    pub genre_tags: Option<BTreeSet<String>>,
    pub empty_selections: Vec<EmptySelection>,
}

/// Filter `dataset` by every active predicate of `selection`.
pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    apply_staged(dataset, selection).view
}

/// Run the filter stages in order Rating → Installs → Reviews → Genres →
/// Category, each on the output of the previous one.
pub fn apply_staged<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilterPass<'a> {
    let mut pass = FilterPass {
        view: FilteredView::all(dataset),
        installs_max: None,
        reviews_max: None,
        genre_tags: None,
        empty_selections: Vec::new(),
    };
    let view = &mut pass.view;

    if selection.is_active(FilterKind::Rating) {
        let range = selection.rating;
        view.retain(|r| r.rating.is_some_and(|v| range.contains(v)));
    }

    if selection.is_active(FilterKind::Installs) {
        pass.installs_max = Some(view.max_installs());
        if let Some(range) = selection.installs {
            view.retain(|r| range.contains(r.installs));
        }
    }

    if selection.is_active(FilterKind::Reviews) {
        pass.reviews_max = Some(view.max_reviews());
        if let Some(range) = selection.reviews {
            view.retain(|r| range.contains(r.reviews));
        }
    }

    if selection.is_active(FilterKind::Genres) {
        pass.genre_tags = Some(view.genre_tags());
        if selection.genres.is_empty() {
            pass.empty_selections.push(EmptySelection(FilterKind::Genres));
        } else {
            let chosen = &selection.genres;
            view.retain(|r| r.genre_tags().any(|tag| chosen.contains(tag)));
        }
    }

    if selection.is_active(FilterKind::Category) {
        if selection.categories.is_empty() {
            pass.empty_selections.push(EmptySelection(FilterKind::Category));
        } else {
            let chosen = &selection.categories;
            view.retain(|r| chosen.contains(&r.category));
        }
    }

    pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::AppType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("Chess", "GAME", Some(4.5), 1_000, 100_000, AppType::Free, "Board;Brain Games"),
            record("Sketch", "ART", Some(3.9), 200, 10_000, AppType::Free, "Art & Design"),
            record("Ledger", "FINANCE", None, 5, 100, AppType::Paid, "Finance"),
            record("Racer", "GAME", Some(4.9), 90_000, 5_000_000, AppType::Free, "Racing;Action"),
            record("Paint", "ART", Some(2.0), 10, 1_000, AppType::Paid, "Art & Design;Creativity"),
            record("Budget", "FINANCE", Some(4.1), 3_000, 50_000, AppType::Free, "Finance"),
            record("Maps", "TRAVEL", Some(4.3), 70_000, 1_000_000, AppType::Free, "Travel & Local"),
        ])
    }

    fn session(ds: &Dataset) -> SessionContext {
        SessionContext::new(ds, 6, &mut StdRng::seed_from_u64(7))
    }

    fn names<'a>(view: &FilteredView<'a>) -> Vec<&'a str> {
        view.rows().map(|r| r.app.as_str()).collect()
    }

    #[test]
    fn no_active_filters_keeps_everything() {
        let ds = dataset();
        let view = apply(&ds, &FilterSelection::default());
        assert_eq!(view.len(), ds.len());
        assert_eq!(view.indices(), (0..ds.len()).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn rating_range_is_inclusive_and_drops_absent() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.activate(FilterKind::Rating, &session(&ds));
        sel.rating = Range::new(3.9, 4.5);
        assert_eq!(names(&apply(&ds, &sel)), vec!["Chess", "Sketch", "Budget", "Maps"]);
    }

    #[test]
    fn installs_filter_uses_installs_column() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.activate(FilterKind::Installs, &session(&ds));
        sel.installs = Some(Range::new(10_000, 100_000));
        assert_eq!(names(&apply(&ds, &sel)), vec!["Chess", "Sketch", "Budget"]);
    }

    #[test]
    fn reviews_filter_uses_reviews_column() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.activate(FilterKind::Reviews, &session(&ds));
        sel.reviews = Some(Range::new(0, 200));
        assert_eq!(names(&apply(&ds, &sel)), vec!["Sketch", "Ledger", "Paint"]);
    }

    #[test]
    fn pending_ranges_pass_everything_and_report_bounds() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        let ctx = session(&ds);
        sel.activate(FilterKind::Rating, &ctx);
        sel.rating = Range::new(4.0, 5.0);
        sel.activate(FilterKind::Installs, &ctx);
        sel.activate(FilterKind::Reviews, &ctx);

        let pass = apply_staged(&ds, &sel);
        assert_eq!(names(&pass.view), vec!["Chess", "Racer", "Budget", "Maps"]);
        assert_eq!(pass.installs_max, Some(5_000_000));
        assert_eq!(pass.reviews_max, Some(90_000));
    }

    #[test]
    fn bounds_come_from_the_stage_input() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        let ctx = session(&ds);
        sel.activate(FilterKind::Installs, &ctx);
        sel.installs = Some(Range::new(0, 100_000));
        sel.activate(FilterKind::Reviews, &ctx);

        let pass = apply_staged(&ds, &sel);
        // Racer and Maps are gone before the Reviews stage runs.
        assert_eq!(pass.reviews_max, Some(3_000));
    }

    #[test]
    fn genres_match_any_selected_tag() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.activate(FilterKind::Genres, &session(&ds));
        sel.genres = ["Creativity", "Action"].into_iter().map(String::from).collect();
        let pass = apply_staged(&ds, &sel);
        assert_eq!(names(&pass.view), vec!["Racer", "Paint"]);
        assert!(pass.empty_selections.is_empty());
        let tags = pass.genre_tags.unwrap();
        assert!(tags.contains("Brain Games"));
        assert!(tags.contains("Travel & Local"));
    }

    #[test]
    fn empty_genre_selection_signals_instead_of_filtering() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.activate(FilterKind::Genres, &session(&ds));
        let pass = apply_staged(&ds, &sel);
        assert_eq!(pass.view.len(), ds.len());
        assert_eq!(pass.empty_selections, vec![EmptySelection(FilterKind::Genres)]);
        assert_eq!(
            pass.empty_selections[0].prompt(),
            "Please select at least one genre to see the charts."
        );
    }

    #[test]
    fn filters_compose_conjunctively() {
        let ds = dataset();
        let ctx = session(&ds);
        let mut sel = FilterSelection::default();
        sel.activate(FilterKind::Category, &ctx);
        sel.categories = ["GAME", "FINANCE"].into_iter().map(String::from).collect();
        sel.activate(FilterKind::Rating, &ctx);
        sel.rating = Range::new(4.0, 4.6);
        sel.activate(FilterKind::Reviews, &ctx);
        sel.reviews = Some(Range::new(0, 2_000));

        let view = apply(&ds, &sel);
        assert_eq!(names(&view), vec!["Chess"]);
        for row in view.rows() {
            assert!(sel.categories.contains(&row.category));
            assert!(sel.rating.contains(row.rating.unwrap()));
            assert!(sel.reviews.unwrap().contains(row.reviews));
        }
    }

    #[test]
    fn apply_is_idempotent() {
        let ds = dataset();
        let ctx = session(&ds);
        let mut sel = FilterSelection::default();
        sel.activate(FilterKind::Category, &ctx);
        sel.activate(FilterKind::Rating, &ctx);
        sel.rating = Range::new(2.0, 4.4);
        assert_eq!(apply(&ds, &sel), apply(&ds, &sel));
    }

    #[test]
    fn category_activation_uses_session_sample() {
        let ds = dataset();
        let ctx = session(&ds);
        let mut sel = FilterSelection::default();
        sel.activate(FilterKind::Category, &ctx);
        let expected: BTreeSet<String> = ctx.default_categories().iter().cloned().collect();
        assert_eq!(sel.categories, expected);
        // Only four distinct categories exist, so all are sampled.
        assert_eq!(ctx.default_categories(), &["ART", "FINANCE", "GAME", "TRAVEL"]);
    }

    #[test]
    fn session_sample_is_bounded_and_distinct() {
        let categories: Vec<_> = (0..20)
            .map(|i| record("x", &format!("CAT_{i:02}"), None, 0, 0, AppType::Free, ""))
            .collect();
        let ds = Dataset::from_records(categories);
        let ctx = SessionContext::new(&ds, 6, &mut StdRng::seed_from_u64(1));
        let picked: BTreeSet<&String> = ctx.default_categories().iter().collect();
        assert_eq!(picked.len(), 6);
        assert!(picked.iter().all(|c| ds.categories.contains(*c)));
    }

    #[test]
    fn empty_category_selection_is_skipped_with_prompt() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.activate(FilterKind::Category, &session(&ds));
        sel.categories.clear();
        let pass = apply_staged(&ds, &sel);
        assert_eq!(pass.view.len(), ds.len());
        assert_eq!(pass.empty_selections, vec![EmptySelection(FilterKind::Category)]);
    }

    #[test]
    fn reactivating_resets_parameters() {
        let ds = dataset();
        let ctx = session(&ds);
        let mut sel = FilterSelection::default();
        sel.activate(FilterKind::Installs, &ctx);
        sel.installs = Some(Range::new(5, 10));
        sel.deactivate(FilterKind::Installs);
        assert!(!sel.is_active(FilterKind::Installs));
        sel.activate(FilterKind::Installs, &ctx);
        assert_eq!(sel.installs, None);
    }
}
