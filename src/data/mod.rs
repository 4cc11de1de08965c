/// Data layer: survey table model, loading, cleanup and chart assembly.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (cells as stored)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  trim headers, clean units → NormalizedTable
///   └───────────┘      (memoized per source in cache)
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  catalog lookup → Series + threshold lines
///   └──────────┘
/// ```

pub mod cache;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod series;
