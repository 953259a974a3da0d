use std::cmp::Ordering;

use super::model::{AppRecord, Column, Dataset};

/// Grid sort order: one column, ascending or descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: Column,
    pub descending: bool,
}

impl SortKey {
    pub fn ascending(column: Column) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    /// Key after the user clicks `column`'s header: same column flips
    /// direction, another column starts ascending.
    pub fn clicked(current: Option<SortKey>, column: Column) -> Self {
        match current {
            Some(key) if key.column == column => Self {
                column,
                descending: !key.descending,
            },
            _ => Self::ascending(column),
        }
    }

    /// Absent ratings and types go last in both directions.
    pub fn compare(&self, a: &AppRecord, b: &AppRecord) -> Ordering {
        match self.column {
            Column::App => self.directed(a.app.cmp(&b.app)),
            Column::Category => self.directed(a.category.cmp(&b.category)),
            Column::Rating => self.absent_last(a.rating, b.rating, |x, y| x.total_cmp(&y)),
            Column::Reviews => self.directed(a.reviews.cmp(&b.reviews)),
            Column::Installs => self.directed(a.installs.cmp(&b.installs)),
            Column::Type => self.absent_last(a.app_type, b.app_type, |x, y| x.cmp(&y)),
            Column::Genres => self.directed(a.genres.cmp(&b.genres)),
        }
    }

    fn directed(&self, ord: Ordering) -> Ordering {
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }

    fn absent_last<T>(&self, a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
        match (a, b) {
            (Some(x), Some(y)) => self.directed(cmp(x, y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Stable in-place sort of grid rows given as dataset indices.
pub fn sort_indices(rows: &mut [usize], dataset: &Dataset, key: SortKey) {
    rows.sort_by(|&a, &b| key.compare(&dataset.records[a], &dataset.records[b]));
}
