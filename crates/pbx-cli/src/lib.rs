//! Library side of the `pbxproj` command-line tool.

pub mod actions;
pub mod logging;
pub mod types;
