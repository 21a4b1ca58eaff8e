use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    middleware, Router,
};
use procura_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    entities::user,
    events::{self, EventSender},
    handlers::AppServices,
    health,
    notifications::{InMemoryMailer, Mailer},
    AppState,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

const TEST_JWT_SECRET: &str =
    "integration-test-signing-key-integration-test-signing-key-0123456789";

/// Helper harness for spinning up an application state backed by a throwaway
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub mailer: Arc<InMemoryMailer>,
    /// Owning account created at startup, already verified.
    pub user: user::Model,
    pub tenant_id: Uuid,
    token: String,
    auth_service: Arc<AuthService>,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: tempfile::TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = db_dir.path().join("procura_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            TEST_JWT_SECRET.to_string(),
            3600,
            86_400,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let mailer = Arc::new(InMemoryMailer::new());
        let mailer_dyn: Arc<dyn Mailer> = mailer.clone();

        let auth_cfg = AuthConfig::from_app_config(&cfg);
        let auth_service = Arc::new(AuthService::new(auth_cfg, db_arc.clone()));

        let base_logger =
            procura_api::logging::setup_logger(procura_api::logging::LoggerConfig::default());
        let services = AppServices::new(
            db_arc.clone(),
            Arc::new(event_sender.clone()),
            auth_service.clone(),
            mailer_dyn,
            Arc::new(cfg.clone()),
            base_logger,
        );

        let state = AppState {
            db: db_arc.clone(),
            config: cfg.clone(),
            event_sender,
            services,
        };

        // Seed an owning account through the real registration path so every
        // test starts from a verified login.
        let registration = state
            .services
            .tenants
            .register(
                "Acme Procurement".to_string(),
                "Test Admin".to_string(),
                "admin@acme-procurement.test".to_string(),
                "correct-horse-battery".to_string(),
            )
            .await
            .expect("seed tenant registration");
        let verification_token = auth_service
            .generate_verification_token(&registration.user)
            .expect("verification token for seeded account");
        state
            .services
            .tenants
            .verify_email(&verification_token)
            .await
            .expect("verify seeded account");
        let tokens = auth_service
            .issue_token_pair(&registration.user, Some(registration.tenant.id))
            .await
            .expect("issue token pair for seeded account");

        let auth_service_for_layer = auth_service.clone();
        let api_router = procura_api::api_v1_routes().layer(middleware::from_fn_with_state(
            auth_service_for_layer,
            |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
             mut req: Request<Body>,
             next: axum::middleware::Next| async move {
                req.extensions_mut().insert(auth);
                next.run(req).await
            },
        ));

        let router = Router::new()
            .nest("/api/v1", api_router)
            .nest_service("/health", health::health_routes_with_state(db_arc))
            .with_state(state.clone());

        Self {
            router,
            state,
            mailer,
            user: registration.user,
            tenant_id: registration.tenant.id,
            token: tokens.access_token,
            auth_service,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    /// Access the auth service used by the test application.
    #[allow(dead_code)]
    pub fn auth_service(&self) -> Arc<AuthService> {
        self.auth_service.clone()
    }

    /// Access the bearer token for the seeded account.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Convenience helper for authenticated JSON requests.
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(self.token())).await
    }

    /// Create a vendor through the API and return its id.
    pub async fn seed_vendor(&self, company_name: &str, email: &str) -> Uuid {
        let response = self
            .request_authenticated(
                Method::POST,
                "/api/v1/vendors",
                Some(serde_json::json!({
                    "company_name": company_name,
                    "email": email,
                })),
            )
            .await;
        assert_eq!(response.status(), 201, "seed vendor for tests");
        let body = response_json(response).await;
        body["data"]["id"]
            .as_str()
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .expect("seeded vendor id")
    }

    /// Create a product for the given vendor through the API and return its id.
    pub async fn seed_product(&self, name: &str, vendor_id: Uuid) -> Uuid {
        let response = self
            .request_authenticated(
                Method::POST,
                "/api/v1/products",
                Some(serde_json::json!({
                    "name": name,
                    "product_type": "consumable",
                    "vendor_id": vendor_id.to_string(),
                    "cost_price": "10.00",
                    "selling_price": "15.00",
                })),
            )
            .await;
        assert_eq!(response.status(), 201, "seed product for tests");
        let body = response_json(response).await;
        body["data"]["id"]
            .as_str()
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .expect("seeded product id")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Read a response body as JSON.
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
