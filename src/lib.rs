//! A fast TOML v1.0.0 parser.
//!
//! One forward pass over the input produces an owned tree of typed values;
//! any violation of the grammar, the calendar, or the redefinition rules
//! halts the parse with a span-carrying [`Error`]. Whitespace skipping and
//! string-content scanning run over 32-byte chunks when the build enables
//! AVX2, with a scalar path that behaves identically everywhere else.
//!
//! # Quick start
//!
//! ```
//! # fn main() -> Result<(), fasttoml::Error> {
//! let root = fasttoml::parse("title = \"TOML\"\n[owner]\nage = 42\n")?;
//! assert_eq!(root.get("title").and_then(|v| v.as_str()), Some("TOML"));
//!
//! let owner = root.get("owner").and_then(|v| v.as_table()).unwrap();
//! assert_eq!(owner.get("age").and_then(|v| v.as_integer()), Some(42));
//! # Ok(())
//! # }
//! ```
//!
//! Match on [`Value`] to walk the tree:
//!
//! ```
//! # let root = fasttoml::parse("point = { x = 1, y = 2 }").unwrap();
//! for (key, value) in &root {
//!     match value {
//!         fasttoml::Value::String(s) => println!("{key} is the string {s:?}"),
//!         fasttoml::Value::Table(t) => println!("{key} has {} entries", t.len()),
//!         other => println!("{key} is {}", other.type_str()),
//!     }
//! }
//! ```
//!
//! Date-times with a UTC offset become an absolute instant
//! ([`OffsetDatetime`]); date-times, dates, and times without one have no
//! absolute instant and are carried as their source text:
//!
//! ```
//! # fn main() -> Result<(), fasttoml::Error> {
//! let root = fasttoml::parse("utc = 1979-05-27T07:32:00Z\nwall = 07:32:00\n")?;
//! let utc = root.get("utc").unwrap().as_offset_datetime().unwrap();
//! assert_eq!(utc.epoch_seconds, 296_638_320);
//! assert_eq!(root.get("wall").unwrap().as_local_lexeme(), Some("07:32:00"));
//! # Ok(())
//! # }
//! ```

mod builder;
mod datetime;
mod error;
mod parser;
mod scanner;
mod span;
mod table;
mod value;

pub use datetime::OffsetDatetime;
pub use error::{Error, ErrorKind};
pub use parser::parse;
pub use span::Span;
pub use table::Table;
pub use value::{Array, Key, Value};

#[cfg(feature = "serde")]
mod impl_serde;
