/// Data layer: measurement table, records, and file import/export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet        keyboard / cell edits
///        │                               │
///        ▼                               ▼
///   ┌──────────┐               ┌──────────────────┐
///   │  loader   │──records──▶  │ MeasurementTable  │  operators × trials
///   └──────────┘               └──────────────────┘
///        ▲                               │
///        │ export (.csv)                 ▼
///        └──────────────────  Vec<MeasurementRecord>, operator → values
/// ```

pub mod loader;
pub mod model;
