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
#![allow(clippy::redundant_pub_crate)]

//! Offline administrative CLI for storefront section documents.
//!
//! Layout:
//! - `cli.rs`: argument parsing, logging setup and command dispatch
//! - `context.rs`: resolved profile, document I/O and CLI errors
//! - `commands/`: one handler per subcommand
//! - `output.rs`: renderers for documents and row listings
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod commands;
pub(crate) mod context;
pub(crate) mod output;

pub use cli::run;
