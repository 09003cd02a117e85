//! # IO BIO Core
//!
//! Pure logic for the IO BIO biography loader: the document model, DOCX
//! parsing, document-to-HTML transformation, extraction heuristics, record
//! models, and the content store abstraction.
//!
//! This crate does no filesystem walking, watching, or CLI work; the host
//! crate (`iobio`) drives it.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`document`] | Parsed document tree |
//! | [`docx`] | `DocumentParser` trait and the native DOCX parser |
//! | [`markup`] | Markup tree and HTML serializer |
//! | [`transform`] | Document node → markup |
//! | [`heuristics`] | Pattern heuristics over the intro sentence |
//! | [`reference`] | UN member states and international organisations |
//! | [`namecase`] | Surname casing |
//! | [`extract`] | Field extraction and node claiming |
//! | [`models`] | Biography record and stored entry |
//! | [`slug`] | Path-derived entry identifiers |
//! | [`digest`] | Content digests |
//! | [`store`] | `ContentStore` trait and in-memory store |

pub mod digest;
pub mod document;
pub mod docx;
pub mod extract;
pub mod heuristics;
pub mod markup;
pub mod models;
pub mod namecase;
pub mod reference;
pub mod slug;
pub mod store;
pub mod transform;
