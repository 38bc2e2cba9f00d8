//! langvm library - shared code for the `langvm` frontend and the `langvmd` backend
//!
//! The backend half (`runtimes`, `daemon`) discovers, installs and switches
//! runtime versions. The frontend half (`cli`) never touches the filesystem
//! itself; it talks to the backend through the [`bridge`].

#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suspicious)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::items_after_statements)]

pub mod bridge;
pub mod cli;
pub mod config;
pub mod core;
pub mod daemon;
pub mod runtimes;
