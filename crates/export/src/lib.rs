//! Asset projection for external automation tools.
//!
//! This crate turns Blokhouse asset records into the documents that
//! configuration-management tooling consumes:
//!
//! - Ansible dynamic inventory JSON ([`ansible`])
//! - Puppet External Node Classifier YAML ([`puppet`])
//! - Chef node and data bag item JSON ([`chef`])
//!
//! Every builder is a pure function of its input. Nothing here touches the
//! filesystem or network; callers fetch assets and serialize the result.
//!
//! # Example
//!
//! ```rust
//! use blokhouse_export::{ansible, Asset, AssetStatus};
//!
//! let web = Asset::new("a1", "web-01", AssetStatus::Active)
//!     .with_ip("10.0.0.10")
//!     .with_type("WebServer");
//!
//! let inventory = ansible::build_inventory(&[web]);
//! assert_eq!(inventory.all.hosts, vec!["web-01".to_string()]);
//! assert!(inventory.groups.contains_key("WebServer"));
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ansible;
pub mod asset;
pub mod chef;
pub mod normalize;
pub mod puppet;

pub use ansible::{build_inventory, AnsibleInventory, HostVars, InventoryGroup};
pub use asset::{Asset, AssetStatus, AssetType};
pub use chef::{build_data_bag_item, build_node, ChefNode, DataBagItem, DATA_BAG_NAME};
pub use normalize::{data_bag_slug, normalize};
pub use puppet::{build_default_enc_yaml, build_enc_yaml};
