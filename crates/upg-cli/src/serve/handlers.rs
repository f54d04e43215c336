//! HTTP route handlers for the viewer server.
//!
//! Handlers are kept thin, delegating to the explorer and the graph builder.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::warn;
use upg_core::icons::ICON_BUNDLE;
use upg_core::{Navigation, Panel, SourceError, ViewType, ALL_VIEW_TYPES, PANELS};

use super::graph::GraphBuilder;
use super::models::{
    Entry, FunctionView, GraphData, GraphQuery, ItemView, MenuGroup, Meta, PanelQuery, PanelTab,
    PanelText, SearchQuery,
};
use super::templates;
use super::AppState;

// =============================================================================
// Error Mapping
// =============================================================================

/// Error returned by API handlers.
pub struct ApiError(StatusCode, String);

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        ApiError(StatusCode::BAD_REQUEST, message.into())
    }
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        let status = match &err {
            SourceError::NotFound(_) | SourceError::UnknownPath(_) => StatusCode::NOT_FOUND,
            SourceError::InvalidName(_) | SourceError::NotAFunction(_) => StatusCode::BAD_REQUEST,
            SourceError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        };
        if status.is_server_error() {
            warn!(error = %err, "request failed");
        }
        ApiError(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.1 });
        (self.0, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn panel_tabs() -> Vec<PanelTab> {
    PANELS
        .iter()
        .map(|p| PanelTab {
            id: p.id(),
            label: p.label(),
        })
        .collect()
}

fn entry(navi: &Navigation, idx: usize) -> Option<Entry> {
    let seg = navi.path(idx)?.last()?;
    Some(Entry::new(idx, &seg.name, &seg.kind, navi.is_fn(idx)))
}

// =============================================================================
// Page Handlers
// =============================================================================

/// GET `/` - Main viewer page.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(templates::render_page(&state.source_label))
}

// =============================================================================
// API Handlers
// =============================================================================

/// GET `/api/meta` - Panels, views, icon bundle and root entries.
pub async fn api_meta(State(state): State<Arc<AppState>>) -> Json<Meta> {
    let explorer = state.session().await;
    let navi = explorer.navigation();
    Json(Meta {
        source: state.source_label.clone(),
        panels: panel_tabs(),
        views: ALL_VIEW_TYPES.iter().map(ViewType::as_str).collect(),
        icons: ICON_BUNDLE,
        roots: navi
            .roots()
            .into_iter()
            .filter_map(|idx| entry(navi, idx))
            .collect(),
    })
}

/// GET `/api/navi` - The raw navigation document.
pub async fn api_navi(State(state): State<Arc<AppState>>) -> Json<Arc<Navigation>> {
    Json(state.session().await.navigation_handle())
}

/// POST `/api/reload` - Replace the navigation index.
///
/// The download runs outside the lock; only the swap takes the write lock.
pub async fn api_reload(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    let navi = state.session().await.fetch_navigation().await?;
    state.explorer.write().await.replace(navi);
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/api/item/{idx}` - Breadcrumb and grouped menu for a path.
pub async fn api_item(
    State(state): State<Arc<AppState>>,
    Path(idx): Path<usize>,
) -> ApiResult<ItemView> {
    let explorer = state.session().await;
    let navi = explorer.navigation();

    let item = entry(navi, idx).ok_or(SourceError::UnknownPath(idx))?;
    let qualified_name = navi.name_of(idx).unwrap_or_default().to_string();
    let breadcrumb = navi
        .breadcrumb(idx)
        .into_iter()
        .filter_map(|(i, _)| entry(navi, i))
        .collect();
    let groups = navi
        .grouped(idx)
        .into_iter()
        .map(|group| MenuGroup {
            kind: group.kind.as_str().to_string(),
            icon: group.icon,
            color: group.color,
            items: group
                .items
                .iter()
                .map(|sub| Entry::new(sub.idx, &sub.name, &sub.kind, navi.is_fn(sub.idx)))
                .collect(),
        })
        .collect();

    Ok(Json(ItemView {
        item,
        qualified_name,
        breadcrumb,
        groups,
    }))
}

/// GET `/api/fn/{name}` - Function record with rendered tags.
pub async fn api_function(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<FunctionView> {
    let explorer = state.session().await;
    let function = explorer.function(&name).await?;
    let tags = function.tags().render_all();
    Ok(Json(FunctionView {
        function,
        tags,
        panels: panel_tabs(),
    }))
}

/// GET `/api/panel/{name}?panel=mir` - Text of one panel.
pub async fn api_panel(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<PanelQuery>,
) -> ApiResult<PanelText> {
    let panel: Panel = query
        .panel
        .parse()
        .map_err(|e| ApiError::bad_request(format!("{e}")))?;
    let text = state.session().await.panel(&name, panel).await?;
    Ok(Json(PanelText {
        panel: panel.id(),
        label: panel.label(),
        text,
    }))
}

/// GET `/api/graph/{name}?view=Adts` - Neighbourhood graph of a function.
pub async fn api_graph(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<GraphQuery>,
) -> ApiResult<GraphData> {
    let view = match query.view.as_deref() {
        Some(v) => v
            .parse()
            .map_err(|e| ApiError::bad_request(format!("{e}")))?,
        None => ViewType::default(),
    };
    let explorer = state.session().await;
    let function = explorer.function(&name).await?;
    let graph = GraphBuilder::new(explorer.navigation()).build(&name, &function, view);
    Ok(Json(graph))
}

/// GET `/api/search` - Search qualified names.
///
/// Query parameters:
/// - `q`: Search query string (required)
/// - `limit`: Maximum results (default: 20)
pub async fn api_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<Entry>> {
    let explorer = state.session().await;
    let navi = explorer.navigation();
    let results = navi
        .search(&params.q)
        .into_iter()
        .take(params.limit)
        .filter_map(|(idx, name)| {
            let kind = navi.kind_of(idx)?;
            Some(Entry::new(idx, name, kind, navi.is_fn(idx)))
        })
        .collect();
    Json(results)
}
