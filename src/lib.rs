//! # IO BIO
//!
//! Content loader for the IO BIO biographical dictionary. Discovers DOCX
//! biographies, extracts structured fields and HTML with [`iobio_core`],
//! and keeps a content store in step with the source directory.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌──────────────┐   ┌───────────┐
//! │ discover  │──▶│ Synchronizer │──▶│ parse+extract│──▶│  Content  │
//! │ + watcher │   │ digest, id   │   │ render       │   │  Store    │
//! └───────────┘   └──────────────┘   └──────────────┘   └─────┬─────┘
//!                                                             ▼
//!                                                       JSON export
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! iobio sync --config ./config/iobio.toml --output dist/biographies.json
//! iobio watch
//! iobio extract ./src/content/biographies/lie-trygve.docx
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`discover`] | Glob matching over the base directory |
//! | [`sync`] | Per-file entry synchronization |
//! | [`ingest`] | Full pass and watch loop |
//! | [`render`] | Render step |
//! | [`watch`] | `notify` events → watch events |
//! | [`progress`] | Progress reporting |
//! | [`export`] | JSON export |

pub mod config;
pub mod discover;
pub mod export;
pub mod ingest;
pub mod progress;
pub mod render;
pub mod sync;
pub mod watch;
