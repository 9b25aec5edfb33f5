//! HTTP server exposing assets to automation tools.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use blokhouse_export::{
    ansible, build_data_bag_item, build_default_enc_yaml, build_enc_yaml, build_node, ChefNode,
    DataBagItem, DATA_BAG_NAME,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::catalog::{find_data_bag_item, find_node, AssetSource, CatalogError};

/// Content type of Puppet ENC responses.
const YAML_CONTENT_TYPE: &str = "text/yaml";

/// Shared application state.
pub struct AppState {
    /// Where assets are read from.
    pub source: Arc<dyn AssetSource>,
}

impl AppState {
    /// Create state over an asset source.
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

/// Errors returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Requested node or item does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Asset catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Catalog(e) => {
                error!("Failed to load asset catalog: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the HTTP router for the gateway.
pub fn build_router(state: Arc<AppState>) -> Router {
    let data_bag = format!("/api/integrations/chef/data_bags/{DATA_BAG_NAME}");

    Router::new()
        .route("/health", get(health_check))
        .route("/api/integrations/ansible/inventory", get(ansible_inventory))
        .route("/api/integrations/puppet/enc/{node}", get(puppet_enc))
        .route("/api/integrations/chef/nodes", get(chef_nodes))
        .route("/api/integrations/chef/nodes/{name}", get(chef_node))
        .route(&data_bag, get(chef_data_bag))
        .route(&format!("{data_bag}/{{id}}"), get(chef_data_bag_item))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[derive(Debug, Deserialize)]
struct InventoryQuery {
    host: Option<String>,
}

/// Ansible dynamic inventory.
///
/// With `?host=<name>` returns only that host's variables, or `{}` when the
/// host is unknown, as Ansible's `--host` call expects.
async fn ansible_inventory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let assets = state.source.list_assets().await?;
    let inventory = ansible::build_inventory(&assets);

    let body = match query.host {
        Some(host) => {
            debug!(host = %host, "Serving Ansible host vars");
            inventory
                .host_vars(&host)
                .map_or_else(|| json!({}), |vars| json!(vars))
        }
        None => {
            info!(
                hosts = inventory.all.hosts.len(),
                groups = inventory.groups.len(),
                "Serving Ansible inventory"
            );
            json!(inventory)
        }
    };

    Ok(Json(body))
}

/// Puppet ENC for a single node. Unknown nodes get the default document.
async fn puppet_enc(
    State(state): State<Arc<AppState>>,
    Path(node): Path<String>,
) -> Result<Response, ApiError> {
    let assets = state.source.list_assets().await?;

    let yaml = if let Some(asset) = find_node(&assets, &node) {
        info!(node = %node, asset_id = %asset.id, "Classified Puppet node");
        build_enc_yaml(asset)
    } else {
        info!(node = %node, "No asset for Puppet node, serving default classification");
        build_default_enc_yaml()
    };

    Ok(([(header::CONTENT_TYPE, YAML_CONTENT_TYPE)], yaml).into_response())
}

/// All Chef node objects.
async fn chef_nodes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ChefNode>>, ApiError> {
    let assets = state.source.list_assets().await?;
    Ok(Json(assets.iter().map(build_node).collect()))
}

/// A single Chef node, looked up by name or IP.
async fn chef_node(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ChefNode>, ApiError> {
    let assets = state.source.list_assets().await?;
    let asset =
        find_node(&assets, &name).ok_or_else(|| ApiError::NotFound(format!("Node {name}")))?;
    Ok(Json(build_node(asset)))
}

/// Every item of the data bag.
async fn chef_data_bag(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DataBagItem>>, ApiError> {
    let assets = state.source.list_assets().await?;
    Ok(Json(assets.iter().map(build_data_bag_item).collect()))
}

/// A single data bag item, looked up by its slugged id.
async fn chef_data_bag_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DataBagItem>, ApiError> {
    let assets = state.source.list_assets().await?;
    let asset = find_data_bag_item(&assets, &id)
        .ok_or_else(|| ApiError::NotFound(format!("Data bag item {id}")))?;
    Ok(Json(build_data_bag_item(asset)))
}
