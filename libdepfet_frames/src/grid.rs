use ndarray::Array2;
use std::io::BufRead;

use super::constants::MAX_PREALLOCATED_SAMPLES;
use super::error::MalformedGridError;
use super::token_stream::TokenStream;

/// A row-major grid of ADC samples, shaped `(rows, columns)`
pub type Grid = Array2<f64>;

/// Parse a single ADC sample. NaN and infinities are not valid readings.
fn parse_sample(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Decode one `rows x columns` grid from the token stream.
///
/// Consumes exactly `rows * columns` tokens in row-major order. Fails if the stream runs
/// out first or if any token is not a finite number.
pub fn decode_grid<R: BufRead>(
    tokens: &mut TokenStream<R>,
    rows: usize,
    columns: usize,
) -> Result<Grid, MalformedGridError> {
    let expected = match rows.checked_mul(columns) {
        Some(n) if n > 0 => n,
        _ => {
            return Err(MalformedGridError::BadDimensions {
                line: tokens.line_number(),
                rows,
                columns,
            })
        }
    };

    let mut samples: Vec<f64> = Vec::with_capacity(expected.min(MAX_PREALLOCATED_SAMPLES));
    while samples.len() < expected {
        match tokens.next_token()? {
            Some(token) => match parse_sample(token) {
                Some(value) => samples.push(value),
                None => {
                    let token = token.to_string();
                    return Err(MalformedGridError::BadSample {
                        line: tokens.line_number(),
                        token,
                    });
                }
            },
            None => {
                return Err(MalformedGridError::TruncatedGrid {
                    line: tokens.line_number(),
                    rows,
                    columns,
                    expected,
                    found: samples.len(),
                })
            }
        }
    }

    Ok(Array2::from_shape_vec((rows, columns), samples)?)
}
