//! Fixed-capacity bit buffer and scalar wire encodings for the qdelta codec.
//!
//! [`MsgBuffer`] is a bounded message buffer with a sub-byte cursor. Scalar
//! helpers (`write_short`, `read_angle16`, `write_string`, ...) are provided as
//! methods on the same type.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - Writes never pass the capacity; reads never pass the written length.
//! - **Explicit overflow policy** - Chosen at construction: drop silently or fail the message.
//! - **No domain knowledge** - This crate knows nothing about entities or players.
//!
//! # Example
//!
//! ```
//! use bitstream::{MsgBuffer, OverflowPolicy};
//!
//! let mut msg = MsgBuffer::with_capacity(64, OverflowPolicy::Fatal).unwrap();
//! msg.write_bits(5, 3).unwrap();
//! msg.write_short(-2).unwrap();
//! msg.write_string("hi").unwrap();
//!
//! msg.begin_reading();
//! assert_eq!(msg.read_bits(3).unwrap(), 5);
//! assert_eq!(msg.read_short().unwrap(), -2);
//! assert_eq!(msg.read_string().unwrap(), "hi");
//! ```

mod buffer;
mod error;
mod scalar;

pub use buffer::{MsgBuffer, OverflowPolicy, MAX_BITS};
pub use error::{BitError, BitResult};
pub use scalar::{
    angle_to_short, coord_to_short, short_to_angle, short_to_coord, MAX_STRING_CHARS,
};
