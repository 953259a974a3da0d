/// Data layer: core types, loading, filtering, reporting and paging.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (cached once per process)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  active predicates → FilteredView
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  report   │   │  pager    │  + sort for the grid
///   └──────────┘   └──────────┘
///        │              │
///        └──── pipeline ┘        one pass → Snapshot for the UI
/// ```

pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pager;
pub mod pipeline;
pub mod report;
pub mod sort;
