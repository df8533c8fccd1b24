//! A `no_std` reader for Apple's XML property list format, small enough to use from firmware. Documents can be
//! walked as a tree of [`Value`]s, or deserialized straight into a type with `serde`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod de;
mod error;
mod lexer;
mod parser;
mod value;

pub use de::{from_slice, from_str, from_value};
pub use error::{Error, ErrorKind, Expected, Result};
pub use lexer::Token;
pub use parser::{parse, parse_slice, MAX_NESTING_DEPTH};
pub use value::{Dict, Value};
