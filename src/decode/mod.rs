//! Text decoders for driver cells.
//!
//! The driver returns every value in text form; these helpers turn the
//! decimal text into machine integers with C library parsing rules.
//!
//! | Target | Function |
//! |--------|----------|
//! | 8/16/32-bit integers | `parse_decimal` (then truncated) |
//! | 64-bit integers | `parse_unsigned_stream` |

mod integer;

pub use integer::{parse_decimal, parse_unsigned_stream};
