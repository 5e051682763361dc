use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::constants::{
    EVENT_TAG, MODULE_HEADER_FIELDS, MODULE_TAG, RECORD_HEADER_FIELDS, STATIC_HEADER_FIELDS,
};
use super::masked_grid::MaskedGrid;

/// Parse every field of a header line, None on any failure
fn parse_fields<T: FromStr>(fields: &[String]) -> Option<Vec<T>> {
    fields.iter().map(|field| field.parse::<T>().ok()).collect()
}

/// First line of a static (hitmap) input: `<columns> <rows>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticHeader {
    pub columns: usize,
    pub rows: usize,
}

impl StaticHeader {
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        if fields.len() != STATIC_HEADER_FIELDS {
            return None;
        }
        let values: Vec<usize> = parse_fields(fields)?;
        Some(Self {
            columns: values[0],
            rows: values[1],
        })
    }
}

/// Start of one event in a sequence (movie) input: `event <run> <event> <moduleCount>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub run: u32,
    pub event: u32,
    pub module_count: usize,
}

impl RecordHeader {
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        if fields.len() != RECORD_HEADER_FIELDS || fields[0] != EVENT_TAG {
            return None;
        }
        let ids: Vec<u32> = parse_fields(&fields[1..3])?;
        let module_count = fields[3].parse::<usize>().ok().filter(|n| *n > 0)?;
        Some(Self {
            run: ids[0],
            event: ids[1],
            module_count,
        })
    }
}

/// Start of one module block within an event: `module <moduleId> <columns> <rows>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHeader {
    pub module_id: u32,
    pub columns: usize,
    pub rows: usize,
}

impl ModuleHeader {
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        if fields.len() != MODULE_HEADER_FIELDS || fields[0] != MODULE_TAG {
            return None;
        }
        let module_id = fields[1].parse::<u32>().ok()?;
        let dims: Vec<usize> = parse_fields(&fields[2..4])?;
        Some(Self {
            module_id,
            columns: dims[0],
            rows: dims[1],
        })
    }
}

/// Identifies an event in a sequence input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId {
    pub run: u32,
    pub event: u32,
}

impl Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Run {}, event {}", self.run, self.event)
    }
}

/// One module's masked grid within an event. Static inputs carry no module id.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRecord {
    pub module_id: Option<u32>,
    pub grid: MaskedGrid,
}

/// One or more module records sharing an id, in order of appearance in the stream.
///
/// The single event of a static input has no id.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Option<EventId>,
    pub modules: Vec<ModuleRecord>,
}
