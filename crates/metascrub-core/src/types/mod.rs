//! Validated value types shared by the pipeline.
//!
//! All types are validated upon construction and cannot be created from raw
//! strings or paths without going through validation.

pub mod entry;
pub mod gps;
pub mod safe_path;
pub mod tag;

pub use entry::ArchiveEntry;
pub use entry::CompressionHint;
pub use entry::EntryKind;
pub use gps::GpsCoordinates;
pub use safe_path::SafePath;
pub use tag::TagAssignment;
pub use tag::TagName;
