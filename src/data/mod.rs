/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  bundled csv / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → Dataset   (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Arc<Vec<Record>>, immutable
///   └──────────┘
///        │      FilterState + FilterMode
///        ▼
///   ┌──────────┐
///   │  filter   │  filtered_data → FilteredView (visible indices)
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;

pub use loader::{DataSource, load};
