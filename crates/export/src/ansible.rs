//! Ansible dynamic inventory.
//!
//! Produces the JSON document an inventory script returns for `--list`:
//!
//! ```json
//! {
//!   "all": { "hosts": ["web-01", "db-01"], "vars": {} },
//!   "WebServer": { "hosts": ["web-01"], "vars": {} },
//!   "ungrouped": { "hosts": ["db-01"], "vars": {} },
//!   "_meta": { "hostvars": { "web-01": { "ansible_host": "10.0.0.10", "status": "ACTIVE" } } }
//! }
//! ```
//!
//! Only assets with an IP address are hosts. Group names are type names used
//! verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::asset::{Asset, AssetStatus};

/// Group for hosts whose asset has no type.
const UNGROUPED: &str = "ungrouped";

/// Top-level keys with fixed meaning in the inventory document.
const RESERVED_KEYS: [&str; 2] = ["all", "_meta"];

/// A host group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryGroup {
    /// Host names in input order.
    pub hosts: Vec<String>,
    /// Group variables. Always empty.
    pub vars: Map<String, Value>,
}

/// Per-host variables published under `_meta.hostvars`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostVars {
    /// Address Ansible connects to.
    pub ansible_host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: AssetStatus,
}

/// The `_meta` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryMeta {
    /// Host variables keyed by host name.
    pub hostvars: BTreeMap<String, HostVars>,
}

/// Complete dynamic inventory document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnsibleInventory {
    /// Every host.
    pub all: InventoryGroup,
    /// Type groups, serialized as sibling top-level keys.
    #[serde(flatten)]
    pub groups: BTreeMap<String, InventoryGroup>,
    #[serde(rename = "_meta")]
    pub meta: InventoryMeta,
}

impl AnsibleInventory {
    /// Variables for a single host, as returned for `--host <name>`.
    #[must_use]
    pub fn host_vars(&self, name: &str) -> Option<&HostVars> {
        self.meta.hostvars.get(name)
    }
}

/// Build the dynamic inventory for a list of assets.
///
/// Assets without an IP are skipped entirely. When two hosts share a name
/// the later one's variables replace the earlier one's. Assets typed `all` or
/// `_meta` would clash with the reserved top-level keys, so they are listed
/// under `ungrouped` instead of a group of their own.
#[must_use]
pub fn build_inventory(assets: &[Asset]) -> AnsibleInventory {
    let mut inventory = AnsibleInventory::default();

    for asset in assets {
        let Some(ip) = asset.ip() else {
            continue;
        };

        inventory.all.hosts.push(asset.name.clone());

        inventory
            .groups
            .entry(group_name(asset).to_string())
            .or_default()
            .hosts
            .push(asset.name.clone());

        inventory.meta.hostvars.insert(
            asset.name.clone(),
            HostVars {
                ansible_host: ip.to_string(),
                mac: asset.mac().map(str::to_string),
                description: asset.description().map(str::to_string),
                status: asset.status,
            },
        );
    }

    debug!(
        assets = assets.len(),
        hosts = inventory.all.hosts.len(),
        groups = inventory.groups.len(),
        "Built Ansible inventory"
    );

    inventory
}

fn group_name(asset: &Asset) -> &str {
    match asset.type_name() {
        Some(name) if !RESERVED_KEYS.contains(&name) => name,
        _ => UNGROUPED,
    }
}
