//! plantbook-eval: care summaries and sensor condition reports
//!
//! Pure functions of a plant's care record and (for comparisons) a sparse
//! sensor reading. Nothing here performs I/O or keeps state between calls,
//! so rendering the same inputs twice yields byte-identical text.
//!
//!   summary   - markdown care summary with qualitative light/moisture tags
//!   compare   - per-dimension verdicts and the condition analysis report
//!   reading   - decoding a loosely-typed JSON object into a SensorReading
//!   levels    - threshold ladders used for the qualitative tags

pub mod compare;
pub mod levels;
pub mod reading;
pub mod summary;

pub use compare::{compare_conditions, ConditionReport, Dimension, DimensionVerdict, Verdict};
pub use levels::{light_level, moisture_level, Ladder};
pub use reading::{ReadingError, SensorReading};
pub use summary::{render_care_summary, UnitSystem};
