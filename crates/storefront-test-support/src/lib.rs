#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unused, dead_code)]

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (sample section documents), recorder.rs (shared callback recorder).

pub mod fixtures;
pub mod recorder;

pub use recorder::Recorder;
