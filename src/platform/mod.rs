// BizDirectory - platform/mod.rs
//
// Platform abstraction layer: paths and config, filesystem helpers, and the
// document store collaborator.
// Dependencies: util, core model types, directories, toml, walkdir, glob.
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
pub mod store;
