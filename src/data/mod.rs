/// Data layer: core types, loading, slicing and reshaping.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (row ids = positions)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  check declared columns, resolve indicator columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  slice    │  criteria → membership vector → in / out subsets
///   └──────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌──────────┐  ┌──────────┐  ┌──────────┐
///   │ metrics   │  │ reshape   │  │ sample    │
///   └──────────┘  └──────────┘  └──────────┘
///   % / mean       long reasons   random person
/// ```

pub mod loader;
pub mod metrics;
pub mod model;
pub mod reshape;
pub mod sample;
pub mod schema;
pub mod slice;
