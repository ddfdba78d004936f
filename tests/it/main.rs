//! Single test binary entry point.
//!
//! Structure:
//! - helpers: surface builder, event recorder, manually driven animator
//! - integration: full drag sessions through the engine
//! - unit: single-component tests

mod helpers;
mod integration;
mod unit;
