//! Integration test crate for the Wishstone service.
//!
//! This crate has no library code. It only contains integration tests that
//! drive the submission pipeline and the HTTP surface across the workspace
//! crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p wishstone-integration-tests
//! ```
