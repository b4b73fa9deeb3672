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
#![allow(clippy::module_name_repetitions)]

//! Section-configuration synchronization engine for multi-row storefront editors.
//!
//! Layout: `model.rs` (row types, patches, collections), `validate.rs` (tolerant coercion),
//! `profile.rs` (per-editor defaults), `parser.rs` (current + legacy schemas),
//! `equality.rs`, `serialize.rs`, `ops.rs` (pure row commands), `sync.rs` (`SyncController`).

pub mod defaults;
pub mod equality;
pub mod error;
pub mod ids;
pub mod model;
pub mod ops;
pub mod parser;
pub mod profile;
pub mod serialize;
pub mod sync;
pub mod validate;

pub use equality::{row_equal, rows_equal};
pub use error::{SectionError, SectionResult};
pub use ids::{RowIdGenerator, SequentialIds, TimestampIds, UuidIds};
pub use model::{
    ConfigurationDocument, DisplayStyle, Row, RowCollection, RowPatch, Strategy,
    create_default_row, document_from_value,
};
pub use ops::MoveDirection;
pub use parser::{DocumentShape, ParseReport, ShapeKind, parse_document, parse_rows};
pub use profile::{Bounds, SectionKind, SectionProfile};
pub use serialize::{project_row, serialize, serialize_with};
pub use sync::{ChangeSink, EchoToken, Emission, RowView, SyncController, SyncOutcome, SyncState};
pub use validate::{clamp_int, ensure_number};
