// BizDirectory - core/mod.rs
//
// Core business logic layer: record model, normalisation, the filter/sort
// pipeline, facets, view projections, exports, and the admin gate.
// Dependencies: util, serde, serde_json, chrono, csv.
// Must NOT depend on: ui, platform, app.

pub mod admin;
pub mod export;
pub mod facets;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod view;
pub mod view_state;
