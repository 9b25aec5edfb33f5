//! Asset records as handed over by the storage layer.

use serde::{de, Deserialize, Deserializer, Serialize};

/// Lifecycle status of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    /// Asset is in service.
    Active,
    /// Asset is being phased out.
    Deprecated,
    /// Asset is temporarily out of service.
    Maintenance,
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Deprecated => write!(f, "DEPRECATED"),
            Self::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

/// Category an asset belongs to (e.g. "WebServer", "Database").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetType {
    /// Human-readable type name, not identifier-safe.
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
}

/// A configuration item tracked by Blokhouse.
///
/// Optional fields may arrive absent, `null` or as an empty string. Use the
/// accessor methods rather than the raw fields: they fold all three into
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Opaque stable identifier.
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    /// Display name. Not guaranteed unique.
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
    /// IPv4/IPv6 literal.
    #[serde(default)]
    pub ip: Option<String>,
    /// MAC address literal.
    #[serde(default)]
    pub mac: Option<String>,
    /// Free-text description.
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: AssetStatus,
    /// Asset category.
    #[serde(default, alias = "type")]
    pub item_type: Option<AssetType>,
}

impl Asset {
    /// Create an asset with only the mandatory fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: AssetStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ip: None,
            mac: None,
            description: None,
            status,
            item_type: None,
        }
    }

    /// Set the IP address.
    #[must_use]
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Set the MAC address.
    #[must_use]
    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the asset type by name.
    #[must_use]
    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.item_type = Some(AssetType { name: name.into() });
        self
    }

    /// IP address, if present and non-empty.
    #[must_use]
    pub fn ip(&self) -> Option<&str> {
        present(self.ip.as_deref())
    }

    /// MAC address, if present and non-empty.
    #[must_use]
    pub fn mac(&self) -> Option<&str> {
        present(self.mac.as_deref())
    }

    /// Description, if present and non-empty.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        present(self.description.as_deref())
    }

    /// Name of the asset type, if the asset has one.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.item_type.as_ref().map(|t| t.name.as_str())
    }

    /// Whether the asset qualifies as an inventory host.
    #[must_use]
    pub fn is_host(&self) -> bool {
        self.ip().is_some()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// A string field that hand-written catalogs may spell as a bare number or
/// boolean (`id: 42`, `name: 2024`).
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl de::Visitor<'_> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
                Ok(Scalar(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(|s| s.0)
}

fn optional_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<Scalar>::deserialize(deserializer).map(|s| s.map(|s| s.0))
}
