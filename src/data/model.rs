use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Columns every input file must provide, in the order the loader reads them.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "App", "Category", "Rating", "Reviews", "Installs", "Type", "Genres",
];

// ---------------------------------------------------------------------------
// AppType – the Free / Paid flag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AppType {
    Free,
    Paid,
}

impl AppType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Free" => Some(AppType::Free),
            "Paid" => Some(AppType::Paid),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppType::Free => "Free",
            AppType::Paid => "Paid",
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Column – the fixed schema, used by the grid for headers and sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    App,
    Category,
    Rating,
    Reviews,
    Installs,
    Type,
    Genres,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::App,
        Column::Category,
        Column::Rating,
        Column::Reviews,
        Column::Installs,
        Column::Type,
        Column::Genres,
    ];

    /// Header name as it appears in the source file.
    pub fn name(self) -> &'static str {
        match self {
            Column::App => "App",
            Column::Category => "Category",
            Column::Rating => "Rating",
            Column::Reviews => "Reviews",
            Column::Installs => "Installs",
            Column::Type => "Type",
            Column::Genres => "Genres",
        }
    }
}

// ---------------------------------------------------------------------------
// AppRecord – one row of the catalog
// ---------------------------------------------------------------------------

/// A single app (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct AppRecord {
    pub app: String,
    pub category: String,
    /// 0–5, absent when the source cell is empty or `NaN`.
    pub rating: Option<f64>,
    pub reviews: u64,
    /// Normalized from strings like `"10,000+"`.
    pub installs: u64,
    /// Absent when the source cell is neither `Free` nor `Paid`.
    pub app_type: Option<AppType>,
    /// Raw semicolon-delimited genre tags, e.g. `"Art & Design;Creativity"`.
    pub genres: String,
}

impl AppRecord {
    /// Individual genre tags, trimmed, empty tags skipped.
    pub fn genre_tags(&self) -> impl Iterator<Item = &str> {
        self.genres
            .split(';')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    /// Text shown in a grid cell for `column`.
    pub fn cell_text(&self, column: Column) -> String {
        match column {
            Column::App => self.app.clone(),
            Column::Category => self.category.clone(),
            Column::Rating => self
                .rating
                .map(|r| format!("{r:.1}"))
                .unwrap_or_default(),
            Column::Reviews => self.reviews.to_string(),
            Column::Installs => self.installs.to_string(),
            Column::Type => self
                .app_type
                .map(|t| t.to_string())
                .unwrap_or_default(),
            Column::Genres => self.genres.clone(),
        }
    }
}

/// Turn an install-count label such as `"1,000,000+"` into `1000000`.
///
/// Thousands separators and a trailing `+` are stripped; plain integers pass
/// through unchanged. Returns `None` when what remains is not an integer.
pub fn normalize_installs(raw: &str) -> Option<u64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let digits = cleaned.strip_suffix('+').unwrap_or(&cleaned);
    digits.trim().parse().ok()
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed catalog. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// All rows, in file order.
    pub records: Vec<AppRecord>,
    /// Sorted distinct categories.
    pub categories: Vec<String>,
}

impl Dataset {
    pub fn from_records(records: Vec<AppRecord>) -> Self {
        let categories: BTreeSet<&str> = records.iter().map(|r| r.category.as_str()).collect();
        let categories = categories.into_iter().map(str::to_string).collect();
        Dataset {
            records,
            categories,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
