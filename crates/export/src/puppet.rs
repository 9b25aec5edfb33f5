//! Puppet External Node Classifier output.
//!
//! The document is rendered line by line instead of through a YAML encoder
//! so the layout stays byte-stable for deployed Puppet masters:
//!
//! ```yaml
//! ---
//! classes:
//!   webserver:
//! parameters:
//!   blokhouse_id: "a1"
//!   blokhouse_name: "web-01"
//!   ip_address: "10.0.0.10"
//!   item_type: "WebServer"
//!   managed_by: "blokhouse"
//! environment: webserver
//! ```
//!
//! Only double quotes are escaped. Values containing other YAML-significant
//! text (newlines, `: ` sequences) pass through unchanged.

use crate::asset::Asset;
use crate::normalize::normalize;

/// Class assigned to assets without a type.
const DEFAULT_CLASS: &str = "base";

/// Environment assigned to assets without a type.
const DEFAULT_ENVIRONMENT: &str = "production";

/// Render the ENC document for one asset.
#[must_use]
pub fn build_enc_yaml(asset: &Asset) -> String {
    let type_ident = asset.type_name().map(normalize);
    let class_name = type_ident.as_deref().unwrap_or(DEFAULT_CLASS);
    let environment = type_ident.as_deref().unwrap_or(DEFAULT_ENVIRONMENT);

    let mut lines = vec![
        "---".to_string(),
        "classes:".to_string(),
        format!("  {class_name}:"),
        "parameters:".to_string(),
        format!("  blokhouse_id: \"{}\"", asset.id),
        format!("  blokhouse_name: \"{}\"", escape_quotes(&asset.name)),
    ];

    if let Some(description) = asset.description() {
        lines.push(format!("  description: \"{}\"", escape_quotes(description)));
    }
    if let Some(ip) = asset.ip() {
        lines.push(format!("  ip_address: \"{ip}\""));
    }
    if let Some(mac) = asset.mac() {
        lines.push(format!("  mac_address: \"{mac}\""));
    }
    if let Some(type_name) = asset.type_name() {
        lines.push(format!("  item_type: \"{}\"", escape_quotes(type_name)));
    }

    lines.push("  managed_by: \"blokhouse\"".to_string());
    lines.push(format!("environment: {environment}"));

    render(&lines)
}

/// Render the document returned for nodes that match no asset.
#[must_use]
pub fn build_default_enc_yaml() -> String {
    render(&[
        "---",
        "classes:",
        "  base:",
        "parameters:",
        "  blokhouse_managed: false",
        "environment: production",
    ])
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}

fn render<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}
