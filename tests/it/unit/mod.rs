//! Unit tests for Dragzone.

mod logging_tests;
mod orchestrator_tests;
mod registry_tests;
