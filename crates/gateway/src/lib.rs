//! Blokhouse export gateway.
//!
//! This crate provides:
//! - Asset catalog loading (YAML/JSON files, in-memory lists)
//! - HTTP endpoints serving Ansible inventory, Puppet ENC and Chef objects
//! - The `blokhouse` binary, usable as an Ansible inventory script and a
//!   Puppet `external_nodes` script

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
pub mod config;
pub mod server;

pub use catalog::{AssetSource, CatalogError, FileCatalog, StaticCatalog};
pub use config::Config;
pub use server::{build_router, ApiError, AppState};
