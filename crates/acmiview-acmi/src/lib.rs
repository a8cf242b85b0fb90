//! # acmiview ACMI
//!
//! Importer for the ACMI flight recording text format.
//!
//! A document starts with a `FileType=` line naming the ACMI family, declares a
//! `ReferenceTime=` and then alternates `#<seconds>` time frames with
//! `<id>,<key>=<value>,...` entity lines. Positions (`T=lon|lat|alt[|pitch|yaw|roll]`)
//! are projected into a local East-North-Up frame around a configured reference point.
//!
//! Fatal header problems abort the import with an
//! [`ImportError`](acmiview_core::ImportError). Broken records are skipped and listed in
//! the [`ImportReport`].
//!
//! # Example
//!
//! ```rust
//! use acmiview_acmi::AcmiImporter;
//!
//! let text = "FileType=text/acmi/tacview\n\
//!             ReferenceTime=2020-01-01T00:00:00Z\n\
//!             #1.0\n\
//!             101,Name=Eagle,Type=Air,T=120.001|60.001|1000\n";
//!
//! let replay = AcmiImporter::default().import(text).expect("valid document");
//! assert_eq!(replay.registry.len(), 1);
//! assert_eq!(replay.report.samples, 1);
//! ```

pub mod attributes;
pub mod header;
pub mod importer;
pub mod parser;
pub mod report;
pub mod session;

pub use importer::AcmiImporter;
pub use parser::{AcmiParser, ParseState, ParsedReplay};
pub use report::{ImportReport, RecordWarning};
pub use session::ReplaySession;
