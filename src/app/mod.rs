// BizDirectory - app/mod.rs
//
// Application layer: synchronisation, session persistence, state, and the
// headless export runner.
// Dependencies: core layer, platform traits.
// Must NOT depend on: ui.

pub mod headless;
pub mod session;
pub mod state;
pub mod sync;
