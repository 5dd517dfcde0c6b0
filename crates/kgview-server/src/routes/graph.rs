//! Graph view routes.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, warn};

use kgview_core::Error;

use crate::cache::ViewParams;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/graph/data", get(get_graph_data))
        .route("/graph/stats", get(get_graph_stats))
}

#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    pub top_communities: Option<usize>,
}

/// GET /api/graph/data: the three-level drill-down payload.
async fn get_graph_data(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<GraphQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!("Rejected graph query: {}", rejection.body_text());
            return (
                rejection.status(),
                Json(serde_json::json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    let params = ViewParams {
        top_communities: query
            .top_communities
            .unwrap_or(state.config.viz.top_communities),
    };

    let task_state = state.clone();
    let result = tokio::task::spawn_blocking(move || task_state.graph_payload(params)).await;

    match result {
        Ok(Ok(payload)) => (StatusCode::OK, Json(payload.as_ref())).into_response(),
        Ok(Err(e)) => error_response(e),
        Err(e) => error_response(Error::Internal(format!("view task failed: {}", e))),
    }
}

/// GET /api/graph/stats: store row counts and freshness.
async fn get_graph_stats(State(state): State<Arc<AppState>>) -> Response {
    let task_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        task_state.open_store().and_then(|store| store.get_stats())
    })
    .await;

    match result {
        Ok(Ok(stats)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "entities": stats.entities,
                "relationships": stats.relationships,
                "communitySummaries": stats.community_summaries,
                "chunks": stats.chunks,
                "semanticGroups": stats.semantic_groups,
                "entityChunkRefs": stats.entity_chunk_refs,
                "dbPath": stats.db_path,
                "dbSizeMb": stats.db_size_mb,
                "freshness": stats.freshness.0,
                "modifiedAt": stats.modified_at,
                "cachedViews": state.cache.len(),
            })),
        )
            .into_response(),
        Ok(Err(e)) => error_response(e),
        Err(e) => error_response(Error::Internal(format!("stats task failed: {}", e))),
    }
}

/// Map an error to a JSON body. Never carries a partial payload.
fn error_response(err: Error) -> Response {
    let status = if err.is_source_unavailable() {
        warn!("Graph source unavailable: {}", err);
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        error!("Graph view failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::build_router;
    use axum::body::Body;
    use axum::http::Request;
    use kgview_core::{DataPaths, KgViewConfig, VizConfig};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const ROWS: &str = r#"
        INSERT INTO entities (id, name, type, pagerank, community_id)
        VALUES (1, 'Rust', 'LANGUAGE', 0.6, 0),
               (2, 'Cargo', 'TOOL', 0.3, 0),
               (3, 'Python', 'LANGUAGE', 0.5, 1),
               (4, 'pip', 'TOOL', 0.2, 1),
               (5, 'Lonely', 'CONCEPT', 0.9, 1);
        INSERT INTO relationships (source_id, target_id, description, weight)
        VALUES (1, 2, 'Rust ships Cargo', 1.0),
               (3, 4, 'pip installs Python packages', 0.5),
               (1, 3, 'Rust extensions for Python', NULL);
        INSERT INTO community_summaries (community_id, title, summary)
        VALUES (0, 'Rust', 'systems'), (1, 'Python', 'scripting');
    "#;

    fn state_with_db(rows: Option<&str>) -> (TempDir, Arc<AppState>) {
        let dir = TempDir::new().unwrap();
        let data_paths = DataPaths::new(dir.path());
        if let Some(rows) = rows {
            let conn = rusqlite::Connection::open(&data_paths.database).unwrap();
            conn.execute_batch(&kgview_store::schema::full_schema()).unwrap();
            conn.execute_batch(rows).unwrap();
        }
        let config = KgViewConfig {
            port: 0,
            db_path: data_paths.database.clone(),
            data_paths,
            viz: VizConfig::default(),
        };
        (dir, Arc::new(AppState::new(config)))
    }

    async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = build_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_graph_data() {
        let (_dir, state) = state_with_db(Some(ROWS));
        let (status, json) = get_json(state.clone(), "/api/graph/data").await;

        assert_eq!(status, StatusCode::OK);
        let meta = json["metaElements"].as_array().unwrap();
        // Two community nodes and one meta-edge.
        assert_eq!(meta.len(), 3);
        assert_eq!(meta[0]["data"]["id"], "comm-0");
        assert_eq!(meta[2]["data"]["id"], "comm-0-->comm-1");
        assert_eq!(json["stats"]["isolated_excluded"], 1);
        assert_eq!(
            json["communityData"]["1"]["edges"][0]["data"]["weight"],
            0.5
        );
        assert_eq!(state.cache.len(), 1);
    }

    #[tokio::test]
    async fn test_graph_data_is_cached_per_params() {
        let (_dir, state) = state_with_db(Some(ROWS));
        let (_, first) = get_json(state.clone(), "/api/graph/data").await;
        let (_, second) = get_json(state.clone(), "/api/graph/data").await;
        assert_eq!(first, second);
        assert_eq!(state.cache.len(), 1);

        let (status, top) = get_json(state.clone(), "/api/graph/data?top_communities=1").await;
        assert_eq!(status, StatusCode::OK);
        // Lonely is isolated, so both communities have two visible members
        // and the lower id wins.
        assert_eq!(top["metaElements"][0]["data"]["id"], "comm-0");
        assert_eq!(top["metaElements"].as_array().unwrap().len(), 1);
        assert_eq!(state.cache.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_bad_request() {
        let (_dir, state) = state_with_db(Some(ROWS));
        for uri in [
            "/api/graph/data?top_communities=abc",
            "/api/graph/data?top_communities=-1",
        ] {
            let (status, json) = get_json(state.clone(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(json["error"].is_string(), "{}", uri);
            assert!(json.get("metaElements").is_none());
        }
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_missing_database_is_unavailable() {
        let (_dir, state) = state_with_db(None);
        let (status, json) = get_json(state.clone(), "/api/graph/data").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(json["error"].as_str().unwrap().contains("Source unavailable"));
        assert!(json.get("metaElements").is_none());
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_record_is_server_error() {
        let rows = format!(
            "{}\nINSERT INTO semantic_groups (group_id, canonical, members) VALUES ('g', 'Rust', 'not json');",
            ROWS
        );
        let (_dir, state) = state_with_db(Some(&rows));
        let (status, json) = get_json(state.clone(), "/api/graph/data").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("semantic_groups"));
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_graph_stats() {
        let (_dir, state) = state_with_db(Some(ROWS));
        let (status, json) = get_json(state, "/api/graph/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["entities"], 5);
        assert_eq!(json["relationships"], 3);
        assert_eq!(json["communitySummaries"], 2);
        assert_eq!(json["chunks"], 0);
        assert!(json["freshness"].as_i64().unwrap() > 0);
        assert_eq!(json["cachedViews"], 0);
    }
}
