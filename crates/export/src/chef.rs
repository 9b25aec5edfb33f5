//! Chef node and data bag item objects.
//!
//! Nodes follow the `Chef::Node` JSON shape that `knife` and the Chef client
//! expect. Data bag items mirror each asset into the `blokhouse` data bag so
//! recipes can look assets up by slug.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::asset::Asset;
use crate::normalize::{data_bag_slug, normalize};

/// Name of the data bag assets are published into.
pub const DATA_BAG_NAME: &str = "blokhouse";

/// Environment for nodes whose asset has no type.
const DEFAULT_ENVIRONMENT: &str = "_default";

/// Role for nodes whose asset has no type.
const DEFAULT_ROLE: &str = "base";

/// Ohai-style attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomaticAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipaddress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macaddress: Option<String>,
    pub hostname: String,
    pub fqdn: String,
}

/// Blokhouse bookkeeping stored under `normal.blokhouse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlokhouseAttributes {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    pub managed: bool,
}

/// The `normal` attribute level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalAttributes {
    pub blokhouse: BlokhouseAttributes,
}

/// A `Chef::Node` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChefNode {
    pub name: String,
    pub chef_type: String,
    pub json_class: String,
    pub chef_environment: String,
    pub run_list: Vec<String>,
    pub automatic: AutomaticAttributes,
    pub normal: NormalAttributes,
    /// Default attribute level. Always empty.
    #[serde(rename = "default")]
    pub default_attributes: Map<String, Value>,
    /// Override attribute level. Always empty.
    #[serde(rename = "override")]
    pub override_attributes: Map<String, Value>,
}

/// An item of the `blokhouse` data bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBagItem {
    /// Item id, slugged from the asset name.
    pub id: String,
    pub blokhouse_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    pub chef_type: String,
    pub data_bag: String,
}

/// Build the Chef node object for an asset.
#[must_use]
pub fn build_node(asset: &Asset) -> ChefNode {
    let type_ident = asset.type_name().map(normalize);
    let environment = type_ident.as_deref().unwrap_or(DEFAULT_ENVIRONMENT);
    let role = type_ident.as_deref().unwrap_or(DEFAULT_ROLE);

    ChefNode {
        name: asset.name.clone(),
        chef_type: "node".to_string(),
        json_class: "Chef::Node".to_string(),
        chef_environment: environment.to_string(),
        run_list: vec![format!("role[{role}]")],
        automatic: AutomaticAttributes {
            ipaddress: asset.ip().map(str::to_string),
            macaddress: asset.mac().map(str::to_string),
            hostname: asset.name.clone(),
            fqdn: asset.name.clone(),
        },
        normal: NormalAttributes {
            blokhouse: BlokhouseAttributes {
                id: asset.id.clone(),
                name: asset.name.clone(),
                description: asset.description().map(str::to_string),
                item_type: asset.type_name().map(str::to_string),
                managed: true,
            },
        },
        default_attributes: Map::new(),
        override_attributes: Map::new(),
    }
}

/// Build the data bag item mirroring an asset.
#[must_use]
pub fn build_data_bag_item(asset: &Asset) -> DataBagItem {
    DataBagItem {
        id: data_bag_slug(&asset.name),
        blokhouse_id: asset.id.clone(),
        name: asset.name.clone(),
        description: asset.description().map(str::to_string),
        ip_address: asset.ip().map(str::to_string),
        mac_address: asset.mac().map(str::to_string),
        item_type: asset.type_name().map(str::to_string),
        chef_type: "data_bag_item".to_string(),
        data_bag: DATA_BAG_NAME.to_string(),
    }
}
