pub mod calibrate;
pub mod columns;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod keys;
pub mod ledger;
pub mod render;
pub mod selection;
pub mod session;
pub mod store;
// cmd and reports are binary modules (declared in main.rs).

pub use error::{ScResult, ScorecardError};
