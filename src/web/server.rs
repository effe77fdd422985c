use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use super::api::{create_api_router, AppState};

/// API under `/api`, plus the renderer's static files for every other path
/// when a directory is configured.
pub fn build_router(state: AppState, static_dir: Option<&str>) -> Router {
    let mut app = Router::new().nest("/api", create_api_router(state));
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }
    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

pub async fn start_web_server(
    state: AppState,
    port: u16,
    static_dir: Option<String>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = build_router(state, static_dir.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Web server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_state::DisplaySnapshot;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio::sync::{mpsc, watch};
    use tower::ServiceExt;

    fn state() -> (AppState, mpsc::Receiver<crate::display_controller::Input>) {
        let (_, snapshot) = watch::channel(DisplaySnapshot::default());
        let (commands, rx) = mpsc::channel(1);
        (AppState { snapshot, commands }, rx)
    }

    #[tokio::test]
    async fn test_api_is_nested() {
        let (state, _rx) = state();
        let app = build_router(state, None);
        let response = app
            .oneshot(Request::get("/api/calibration").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_without_static_dir() {
        let (state, _rx) = state();
        let app = build_router(state, None);
        let response = app
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_files_are_served() {
        let dir = std::env::temp_dir().join(format!("compassi-static-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("dial.html"), "<svg/>").unwrap();

        let (state, _rx) = state();
        let app = build_router(state, dir.to_str());
        let response = app
            .oneshot(Request::get("/dial.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<svg/>");
        let _ = std::fs::remove_dir_all(dir);
    }
}
