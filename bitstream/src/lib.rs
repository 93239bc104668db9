//! Bit-granular message cursor for the opdec decoding engine.
//!
//! This crate provides [`BitCursor`], the single read path every decoding
//! procedure goes through, and [`BitWriter`], its mirror used to build test
//! fixtures.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about opcodes, builds, or identifiers.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitCursor, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bit(true);
//! writer.write_bits(42, 7).unwrap();
//! writer.write_u32(7);
//!
//! let bytes = writer.finish();
//!
//! let mut cursor = BitCursor::new(&bytes);
//! assert!(cursor.read_bit().unwrap());
//! assert_eq!(cursor.read_bits(7).unwrap(), 42);
//! assert_eq!(cursor.read_u32().unwrap(), 7);
//! assert!(cursor.is_at_end());
//! ```

mod cursor;
mod error;
mod writer;

pub use cursor::BitCursor;
pub use error::{BitError, BitResult};
pub use writer::BitWriter;
