//! Presentation components shared by the pages
//!
//! Components render what they are given and report user intent as
//! actions; they never call the bridge.

mod version_table;

pub use version_table::{TableAction, VersionRow, VersionTable};
