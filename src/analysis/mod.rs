/// Analysis layer: pure Gage R&R arithmetic, no UI types.
///
/// Architecture:
/// ```text
///   Vec<MeasurementRecord>        operator → Vec<f64>  + nominal, tolerance
///        │                                │
///        ▼                                ▼
///   ┌──────────┐                  ┌────────────────────┐
///   │   gage   │  3 metrics       │ gage::reproducibility│  per-operator summary
///   └──────────┘                  └────────────────────┘
///        │                                │
///        └──────────────┬─────────────────┘
///                       ▼
///                 ┌──────────┐
///                 │ variance  │  population variance, group averages
///                 └──────────┘
///                       │
///                       ▼
///                 ┌──────────┐
///                 │ tolerance │  6σ spread vs tolerance width
///                 └──────────┘
/// ```
///
/// Degenerate inputs are not rejected: empty groups yield NaN and the value
/// is displayed as-is.

pub mod gage;
pub mod tolerance;
pub mod variance;
