//! Configuration values for vista.
//!
//! A [`Namespace`] is the mutable configuration a scope resolves: an
//! insertion-ordered, string-keyed mapping whose entries are [`Value`]s.
//! Nested mappings are addressed with dotted paths (`"model.depth"`).
//!
//! [`parse_text`] turns the value half of a `key=value` override into a
//! [`Value`]:
//!
//! | Text | Value |
//! |---|---|
//! | `%Hello World%` | `Str("Hello World")` |
//! | `[1, 4, [1, 2]]` | `List([Int(1), Int(4), List(..)])` |
//! | `{a: 1, b: %x y%}` | `Map({a: Int(1), b: Str("x y")})` |
//! | `true` / `False` | `Bool` |
//! | `None` / `null` | `Null` |
//! | `42`, `1_000` | `Int` |
//! | `0.1`, `1e-3` | `Float` |
//! | anything else | `Str` |

pub mod error;
mod namespace;
mod parse;
mod value;

pub use error::{Result, ValueError};
pub use namespace::{Namespace, PATH_SEPARATOR};
pub use parse::parse_text;
pub use value::Value;
