//! vcast-si End-to-End Test Infrastructure
//!
//! Generation runs are driven through the real shell runner against a fake
//! `clicast` script that touches each requested output file and logs its
//! arguments.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vcast-si-tests
//! ```
//!
//! The end-to-end tests need a POSIX shell and are skipped on Windows.

pub mod fixtures;

pub use fixtures::{files_under, FakeClicast, UnitFixture};
