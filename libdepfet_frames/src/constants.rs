// Frame sequencing
pub const AGGREGATE_FRAME_INDEX: usize = 0;
pub const AGGREGATE_FRAME_TITLE: &str = "All Frames";

// Tags leading sequence header lines. Any other tag is a malformed header.
pub const EVENT_TAG: &str = "event";
pub const MODULE_TAG: &str = "module";

// Number of fields in each header line
pub const STATIC_HEADER_FIELDS: usize = 2;
pub const RECORD_HEADER_FIELDS: usize = 4;
pub const MODULE_HEADER_FIELDS: usize = 4;

// Upper bound on up-front sample allocation; larger grids grow as samples arrive
pub const MAX_PREALLOCATED_SAMPLES: usize = 1 << 20;

// Output layout
pub const MANIFEST_FILE_NAME: &str = "frames.yml";
pub const SUMMARY_FILE_NAME: &str = "summary.yml";
pub const FRAME_FILE_EXTENSION: &str = "dat";
pub const DEFAULT_FRAME_RATE: u32 = 10;
