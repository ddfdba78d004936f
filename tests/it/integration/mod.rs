//! Integration tests for the drag engine.
//!
//! These tests run complete drag sessions against an in-memory scene and
//! check the emitted event protocol, zone collections and tree placement.

mod preview_tests;
