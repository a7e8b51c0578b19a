/// Data layer: core types, loading, enrichment, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RentalRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  enrich   │  labels + calendar fields → RentalDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply Constraints → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────────┐
///   │ aggregate / stats    │  sums, box plots, correlation, histogram
///   └──────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  DashboardView consumed by the UI
///   └──────────┘
/// ```

pub mod aggregate;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod view;
