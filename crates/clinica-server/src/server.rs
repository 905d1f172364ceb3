use std::net::SocketAddr;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use clinica_records::{ConsultaService, ProntuarioService};
use clinica_storage::DynDocumentStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::AppConfig, handlers, storage::create_store};

/// Shared handler state: one service per entity over the same store.
#[derive(Clone)]
pub struct AppState {
    pub consultas: ConsultaService,
    pub prontuarios: ProntuarioService,
    pub backend: &'static str,
}

impl AppState {
    pub fn new(store: DynDocumentStore) -> Self {
        Self {
            backend: store.backend_name(),
            consultas: ConsultaService::new(store.clone()),
            prontuarios: ProntuarioService::new(store),
        }
    }
}

pub fn build_app(cfg: &AppConfig, state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/consultas",
            get(handlers::list_consultas).post(handlers::create_consulta),
        )
        .route(
            "/consultas/{id}",
            get(handlers::get_consulta)
                .put(handlers::update_consulta)
                .delete(handlers::delete_consulta),
        )
        .route(
            "/prontuarios",
            get(handlers::list_prontuarios).post(handlers::create_prontuario),
        )
        .route(
            "/prontuarios/{id}",
            get(handlers::get_prontuario)
                .put(handlers::update_prontuario)
                .delete(handlers::delete_prontuario),
        )
        .route("/prontuarios/{id}/exams", post(handlers::add_exam))
        .route(
            "/prontuarios/{id}/exams/{name}",
            delete(handlers::remove_exams),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(cfg.server.body_limit_bytes))
        .with_state(state)
}

pub struct ClinicaServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    store: Option<DynDocumentStore>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            store: None,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Uses `store` instead of building one from the storage settings.
    pub fn with_store(mut self, store: DynDocumentStore) -> Self {
        self.store = Some(store);
        self
    }

    pub async fn build(self) -> anyhow::Result<ClinicaServer> {
        let store = match self.store {
            Some(store) => store,
            None => create_store(&self.config.storage).await?,
        };
        let app = build_app(&self.config, AppState::new(store));

        Ok(ClinicaServer {
            addr: self.addr,
            app,
        })
    }
}

impl ClinicaServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let store = clinica_db_memory::create_document_store();
        build_app(&AppConfig::default(), AppState::new(store))
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = app()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_body_limit_applies() {
        let mut cfg = AppConfig::default();
        cfg.server.body_limit_bytes = 16;
        let app = build_app(
            &cfg,
            AppState::new(clinica_db_memory::create_document_store()),
        );

        let body = format!(r#"{{"reason": "{}"}}"#, "x".repeat(64));
        let response = app
            .oneshot(
                Request::post("/consultas")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app()
            .oneshot(Request::get("/pacientes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
