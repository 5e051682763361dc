use serde::{Deserialize, Serialize};
use std::io::BufRead;

use super::error::MalformedGridError;
use super::grid::decode_grid;
use super::masked_grid::mask;
use super::record::{Event, EventId, ModuleHeader, ModuleRecord, RecordHeader, StaticHeader};
use super::token_stream::TokenStream;

/// The readout file layouts understood by the RecordParser.
///
/// The variant is chosen by the caller; it is never guessed from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputVariant {
    /// A single hitmap grid: `<columns> <rows>` followed by the samples
    Static,
    /// Repeated event records, each holding one or more module grids
    #[default]
    Sequence,
}

/// RecordParser turns a readout text stream into Events.
///
/// The stream is pulled forward only, one complete event at a time; its length is never
/// needed up front. Each event is decoded atomically: either every module grid of the
/// record is read and masked, or a MalformedGridError is returned and the parser stops.
#[derive(Debug)]
pub struct RecordParser<R: BufRead> {
    tokens: TokenStream<R>,
    variant: InputVariant,
    is_ended: bool,
}

impl<R: BufRead> RecordParser<R> {
    pub fn new(reader: R, variant: InputVariant) -> Self {
        Self {
            tokens: TokenStream::new(reader),
            variant,
            is_ended: false,
        }
    }

    /// Get the next event in the stream
    ///
    /// Returns a `Result<Option<Event>>`. The Option is None if the stream has no more
    /// data. After an error or the end of the stream every call returns `Ok(None)`.
    pub fn get_next_event(&mut self) -> Result<Option<Event>, MalformedGridError> {
        if self.is_ended {
            return Ok(None);
        }

        let result = match self.variant {
            InputVariant::Static => self.read_static_event(),
            InputVariant::Sequence => self.read_sequence_event(),
        };

        if self.variant == InputVariant::Static || !matches!(result, Ok(Some(_))) {
            self.is_ended = true;
        }
        result
    }

    pub fn variant(&self) -> InputVariant {
        self.variant
    }

    /// Number of bytes consumed from the underlying reader so far
    pub fn bytes_read(&self) -> u64 {
        self.tokens.bytes_read()
    }

    pub fn line_number(&self) -> usize {
        self.tokens.line_number()
    }

    /// The whole stream is one grid. An empty stream yields no event.
    fn read_static_event(&mut self) -> Result<Option<Event>, MalformedGridError> {
        let fields = match self.read_header_fields()? {
            Some(fields) => fields,
            None => return Ok(None),
        };
        let header = StaticHeader::from_fields(&fields).ok_or_else(|| {
            MalformedGridError::BadStaticHeader {
                line: self.tokens.line_number(),
                text: fields.join(" "),
            }
        })?;

        let grid = decode_grid(&mut self.tokens, header.rows, header.columns)?;
        if let Some(token) = self.tokens.next_token()? {
            let token = token.to_string();
            return Err(MalformedGridError::TrailingTokens {
                line: self.tokens.line_number(),
                token,
            });
        }

        Ok(Some(Event {
            id: None,
            modules: vec![ModuleRecord {
                module_id: None,
                grid: mask(grid),
            }],
        }))
    }

    /// Read one `event` record and all of its module blocks
    fn read_sequence_event(&mut self) -> Result<Option<Event>, MalformedGridError> {
        let fields = match self.read_header_fields()? {
            Some(fields) => fields,
            None => return Ok(None),
        };
        let header = RecordHeader::from_fields(&fields).ok_or_else(|| {
            MalformedGridError::BadRecordHeader {
                line: self.tokens.line_number(),
                text: fields.join(" "),
            }
        })?;

        let mut modules: Vec<ModuleRecord> = Vec::new();
        for module in 0..header.module_count {
            let fields = match self.read_header_fields()? {
                Some(fields) => fields,
                None => {
                    return Err(MalformedGridError::MissingModuleHeader {
                        line: self.tokens.line_number(),
                        run: header.run,
                        event: header.event,
                        module: module + 1,
                        module_count: header.module_count,
                    })
                }
            };
            let module_header = ModuleHeader::from_fields(&fields).ok_or_else(|| {
                MalformedGridError::BadModuleHeader {
                    line: self.tokens.line_number(),
                    text: fields.join(" "),
                }
            })?;
            let grid = decode_grid(&mut self.tokens, module_header.rows, module_header.columns)?;
            modules.push(ModuleRecord {
                module_id: Some(module_header.module_id),
                grid: mask(grid),
            });
        }

        Ok(Some(Event {
            id: Some(EventId {
                run: header.run,
                event: header.event,
            }),
            modules,
        }))
    }

    /// Read the fields of the next header line. A header must start on a fresh line.
    fn read_header_fields(&mut self) -> Result<Option<Vec<String>>, MalformedGridError> {
        match self.tokens.next_line()? {
            Some(Ok(fields)) => Ok(Some(fields)),
            Some(Err(token)) => Err(MalformedGridError::TrailingTokens {
                line: self.tokens.line_number(),
                token,
            }),
            None => Ok(None),
        }
    }
}

impl<R: BufRead> Iterator for RecordParser<R> {
    type Item = Result<Event, MalformedGridError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.get_next_event().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn parse_all(input: &str, variant: InputVariant) -> Result<Vec<Event>, MalformedGridError> {
        RecordParser::new(input.as_bytes(), variant).collect()
    }

    #[test]
    fn test_static_input() {
        let events = parse_all("2 2\n1 -1 3 4\n", InputVariant::Static).unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, None);
        assert_eq!(event.modules.len(), 1);
        let grid = &event.modules[0].grid;
        assert_eq!(grid.values(), &array![[1.0, -1.0], [3.0, 4.0]]);
        assert_eq!(grid.valid(), &array![[true, false], [true, true]]);
        assert_eq!(grid.valid_sum(), 8.0);
    }

    #[test]
    fn test_static_shape_follows_header() {
        let events = parse_all("3 2\n1 2 3\n4 5 6\n", InputVariant::Static).unwrap();
        assert_eq!(events[0].modules[0].grid.shape(), (2, 3));
    }

    #[test]
    fn test_static_empty_stream() {
        let events = parse_all("", InputVariant::Static).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_static_trailing_samples() {
        let result = parse_all("1 1\n1 2\n", InputVariant::Static);
        assert!(matches!(
            result,
            Err(MalformedGridError::TrailingTokens { line: 2, .. })
        ));
    }

    #[test]
    fn test_static_bad_header() {
        let result = parse_all("2 x\n1 2\n", InputVariant::Static);
        assert!(matches!(
            result,
            Err(MalformedGridError::BadStaticHeader { line: 1, .. })
        ));
    }

    #[test]
    fn test_sequence_single_record() {
        let input = "event 5 7 1\nmodule 0 2 1\n10 20\n";
        let events = parse_all(input, InputVariant::Sequence).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, Some(EventId { run: 5, event: 7 }));
        assert_eq!(events[0].modules[0].module_id, Some(0));
        assert_eq!(events[0].modules[0].grid.values(), &array![[10.0, 20.0]]);
    }

    #[test]
    fn test_sequence_multiple_modules_and_blank_lines() {
        let input = concat!(
            "event 1 1 2\nmodule 0 2 1\n1 2\nmodule 3 1 2\n3\n4\n\n",
            "event 1 2 1\nmodule 0 2 1\n5 -6\n\n",
        );
        let events = parse_all(input, InputVariant::Sequence).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].modules.len(), 2);
        assert_eq!(events[0].modules[1].module_id, Some(3));
        assert_eq!(events[0].modules[1].grid.values(), &array![[3.0], [4.0]]);
        assert_eq!(events[1].id, Some(EventId { run: 1, event: 2 }));
        assert!(!events[1].modules[0].grid.is_valid(0, 1));
    }

    #[test]
    fn test_sequence_empty_stream() {
        assert!(parse_all("\n\n", InputVariant::Sequence).unwrap().is_empty());
    }

    #[test]
    fn test_sequence_missing_module_header() {
        let result = parse_all("event 1 1 2\nmodule 0 1 1\n7\n", InputVariant::Sequence);
        match result {
            Err(MalformedGridError::MissingModuleHeader {
                module,
                module_count,
                ..
            }) => {
                assert_eq!(module, 2);
                assert_eq!(module_count, 2);
            }
            other => panic!("Expected a missing module header, got {other:?}"),
        }
    }

    #[test]
    fn test_sequence_truncated_samples() {
        let result = parse_all("event 1 1 1\nmodule 0 2 2\n1 2 3\n", InputVariant::Sequence);
        assert!(matches!(
            result,
            Err(MalformedGridError::TruncatedGrid { found: 3, .. })
        ));
    }

    #[test]
    fn test_sequence_short_block_runs_into_next_header() {
        let input = "event 1 1 1\nmodule 0 2 2\n1 2 3\nevent 1 2 1\n";
        let result = parse_all(input, InputVariant::Sequence);
        assert!(matches!(
            result,
            Err(MalformedGridError::BadSample { line: 4, .. })
        ));
    }

    #[test]
    fn test_sequence_bad_record_header() {
        let result = parse_all("event 1 1\n", InputVariant::Sequence);
        assert!(matches!(
            result,
            Err(MalformedGridError::BadRecordHeader { line: 1, .. })
        ));
    }

    #[test]
    fn test_sequence_header_tags_checked() {
        let result = parse_all("module 5 7 1\nevent 0 2 1\n10 20\n", InputVariant::Sequence);
        assert!(matches!(
            result,
            Err(MalformedGridError::BadRecordHeader { line: 1, .. })
        ));

        let result = parse_all("event 5 7 1\nevent 0 2 1\n10 20\n", InputVariant::Sequence);
        assert!(matches!(
            result,
            Err(MalformedGridError::BadModuleHeader { line: 2, .. })
        ));
    }

    #[test]
    fn test_parser_stops_after_error() {
        let input = "event 1 1\nevent 1 2 1\n";
        let mut parser = RecordParser::new(input.as_bytes(), InputVariant::Sequence);
        assert!(parser.get_next_event().is_err());
        assert!(parser.get_next_event().unwrap().is_none());
    }
}
