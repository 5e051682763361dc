use std::io::Write;

use super::constants::{EVENT_TAG, MODULE_TAG};
use super::grid::Grid;
use super::record::Event;

/// Write the samples of a grid, one text row per grid row.
///
/// Values use the shortest representation that parses back to the same f64.
pub fn write_grid<W: Write>(writer: &mut W, grid: &Grid) -> std::io::Result<()> {
    for row in grid.rows() {
        let line: Vec<String> = row.iter().map(|value| value.to_string()).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Write a grid in the static (hitmap) layout: `<columns> <rows>` then the samples
pub fn write_static<W: Write>(writer: &mut W, grid: &Grid) -> std::io::Result<()> {
    let (rows, columns) = grid.dim();
    writeln!(writer, "{columns} {rows}")?;
    write_grid(writer, grid)
}

/// Write one event record in the sequence (movie) layout, followed by a blank line.
///
/// Events without an id, and modules without one, are written with id 0.
pub fn write_event<W: Write>(writer: &mut W, event: &Event) -> std::io::Result<()> {
    let (run, event_id) = event.id.map_or((0, 0), |id| (id.run, id.event));
    writeln!(writer, "{EVENT_TAG} {run} {event_id} {}", event.modules.len())?;
    for module in event.modules.iter() {
        let (rows, columns) = module.grid.shape();
        writeln!(
            writer,
            "{MODULE_TAG} {} {columns} {rows}",
            module.module_id.unwrap_or(0)
        )?;
        write_grid(writer, module.grid.values())?;
    }
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masked_grid::mask;
    use crate::record::{EventId, ModuleRecord};
    use crate::record_parser::{InputVariant, RecordParser};
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    #[test]
    fn test_static_layout() {
        let mut buffer: Vec<u8> = Vec::new();
        write_static(&mut buffer, &array![[1.0, -1.0, 2.5], [3.0, 4.0, 0.0]]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "3 2\n1 -1 2.5\n3 4 0\n");
    }

    #[test]
    fn test_event_layout() {
        let event = Event {
            id: Some(EventId { run: 5, event: 7 }),
            modules: vec![ModuleRecord {
                module_id: Some(2),
                grid: mask(array![[10.0, 20.0]]),
            }],
        };
        let mut buffer: Vec<u8> = Vec::new();
        write_event(&mut buffer, &event).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "event 5 7 1\nmodule 2 2 1\n10 20\n\n"
        );
    }

    #[test]
    fn test_sequence_round_trip() {
        let events = vec![
            Event {
                id: Some(EventId { run: 1, event: 1 }),
                modules: vec![
                    ModuleRecord {
                        module_id: Some(0),
                        grid: mask(array![[1.5, -1.0], [0.25, 8.0]]),
                    },
                    ModuleRecord {
                        module_id: Some(1),
                        grid: mask(array![[3.0, 4.0], [5.0, 6.0]]),
                    },
                ],
            },
            Event {
                id: Some(EventId { run: 1, event: 2 }),
                modules: vec![ModuleRecord {
                    module_id: Some(0),
                    grid: mask(array![[-0.5, 7.0], [9.0, 10.0]]),
                }],
            },
        ];
        let mut buffer: Vec<u8> = Vec::new();
        for event in events.iter() {
            write_event(&mut buffer, event).unwrap();
        }
        let decoded: Vec<Event> = RecordParser::new(buffer.as_slice(), InputVariant::Sequence)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(decoded, events);
    }

    proptest! {
        #[test]
        fn prop_static_round_trip(
            rows in 1_usize..6,
            columns in 1_usize..6,
            seed in prop::collection::vec(-1.0e6_f64..1.0e6, 36),
        ) {
            let samples = seed[..rows * columns].to_vec();
            let grid = Array2::from_shape_vec((rows, columns), samples).unwrap();
            let mut buffer: Vec<u8> = Vec::new();
            write_static(&mut buffer, &grid).unwrap();
            let mut parser = RecordParser::new(buffer.as_slice(), InputVariant::Static);
            let event = parser.get_next_event().unwrap().unwrap();
            prop_assert_eq!(event.modules[0].grid.values(), &grid);
        }
    }
}
