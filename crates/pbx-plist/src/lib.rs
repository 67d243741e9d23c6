//! Legacy property-list dialect used by Xcode project files.
//!
//! The dialect is the old NeXTSTEP text plist with one twist: values may be
//! followed by `/* ... */` comments that tools write for humans. This crate
//! parses that syntax into a small tree ([`PlistValue`]) that keeps those
//! comments and the quoting of every scalar, and renders trees back in the
//! single-line or multi-line layouts the format uses.
//!
//! # Example
//!
//! ```
//! use pbx_plist::{PlistValue, parse_plist, to_plist_string};
//!
//! let value = parse_plist("{ mainGroup = ABC /* Main */; }").unwrap();
//! let dict = value.as_dictionary().unwrap();
//! let main = dict.get("mainGroup").and_then(PlistValue::as_string).unwrap();
//! assert_eq!(main.comment(), Some("Main"));
//! assert_eq!(to_plist_string(&value), "{\n\tmainGroup = ABC /* Main */;\n}\n");
//! ```

mod error;
mod parser;
mod value;
pub mod writer;

pub use error::{PlistError, Result};
pub use parser::parse_plist;
pub use value::{PlistDictionary, PlistString, PlistValue};
pub use writer::{Layout, to_plist_string};
