//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;
use uuid::Uuid;

use estoque_facil::config::{AppConfig, AppState};
use estoque_facil::routes::build_router;

const BOUNDARY: &str = "----estoque-facil-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: SqlitePool,
    /// Directory receiving uploaded images
    pub upload_dir: PathBuf,
    /// SQLite file, when the database lives on disk
    pub db_file: Option<PathBuf>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Fresh in-memory database, migrated, with no accounts.
    pub async fn new() -> Self {
        // Uma única conexão, sem expirar: o banco em memória vive enquanto ela viver
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("Invalid SQLite URL")
            .foreign_keys(true);
        Self::build(options, 1, None).await
    }

    /// Fresh on-disk database shared by several connections (concurrent requests).
    pub async fn on_disk(max_connections: u32) -> Self {
        let db_file = std::env::temp_dir().join(format!("estoque-facil-test-{}.db", Uuid::new_v4()));
        let options = SqliteConnectOptions::new()
            .filename(&db_file)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(10));
        Self::build(options, max_connections, Some(db_file)).await
    }

    async fn build(options: SqliteConnectOptions, max_connections: u32, db_file: Option<PathBuf>) -> Self {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("Failed to open test database");

        sqlx::migrate!()
            .run(&db_pool)
            .await
            .expect("Failed to run migrations");

        let upload_dir = std::env::temp_dir().join(format!("estoque-facil-test-{}", Uuid::new_v4()));

        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
            bcrypt_cost: 4,
            upload_dir: upload_dir.clone(),
            server_addr: "127.0.0.1:0".to_string(),
            db_max_connections: max_connections,
            request_timeout: Duration::from_secs(30),
        };

        let state = AppState::from_pool(db_pool.clone(), config);
        let router = build_router(state);

        Self { router, db_pool, upload_dir, db_file }
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req.body(Body::from(body_str)).expect("Failed to build request");
        self.send(req).await
    }

    /// Make a multipart/form-data request (product create/update)
    pub async fn multipart(
        &self,
        method: &str,
        path: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut body: Vec<u8> = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"imagem\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}"));

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Registers an account with a random valid CPF
    pub async fn register(&self, username: &str, password: &str) -> TestResponse {
        let cpf = format!("{:011}", Uuid::new_v4().as_u128() % 100_000_000_000);
        self.request(
            "POST",
            "/api/register",
            Some(json!({
                "username": username,
                "password": password,
                "nomeCompleto": format!("{username} da Silva"),
                "documento": cpf,
                "tipoDocumento": "CPF",
            })),
            None,
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/login",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;

        assert_eq!(response.status, StatusCode::OK, "Login failed: {:?}", response.body);

        response
            .body
            .get("token")
            .and_then(|v| v.as_str())
            .expect("No token in login response")
            .to_string()
    }

    /// First account of a fresh database: becomes the administrator
    pub async fn bootstrap_admin(&self) -> (Uuid, String) {
        let response = self.register("alice", "secret1").await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let id = user_id(&response.body);
        (id, self.login("alice", "secret1").await)
    }

    /// Registers, approves with the admin token and logs in
    pub async fn approved_user(&self, admin_token: &str, username: &str) -> (Uuid, String) {
        let response = self.register(username, "password123").await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let id = user_id(&response.body);

        let approve = self
            .request("POST", &format!("/api/admin/users/{id}/approve"), None, Some(admin_token))
            .await;
        assert_eq!(approve.status, StatusCode::OK, "{:?}", approve.body);

        (id, self.login(username, "password123").await)
    }

    /// Creates a product and returns its JSON
    pub async fn create_produto(&self, token: &str, nome: &str, preco: &str, quantidade: &str) -> Value {
        let response = self
            .multipart(
                "POST",
                "/api/produtos",
                &[("nome", nome), ("precoCompra", preco), ("quantidadeComprada", quantidade)],
                None,
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body
    }

    pub async fn vender(&self, token: &str, produto_id: &str, quantidade: i64, preco: f64) -> TestResponse {
        self.request(
            "POST",
            "/api/vendas",
            Some(json!({
                "produtoId": produto_id,
                "quantidadeVendida": quantidade,
                "precoVenda": preco,
            })),
            Some(token),
        )
        .await
    }

    pub async fn produto(&self, token: &str, produto_id: &str) -> Value {
        let response = self
            .request("GET", &format!("/api/produtos/{produto_id}"), None, Some(token))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
        if let Some(db_file) = &self.db_file {
            for suffix in ["", "-wal", "-shm", "-journal"] {
                let mut path = db_file.clone().into_os_string();
                path.push(suffix);
                let _ = std::fs::remove_file(path);
            }
        }
    }
}

pub fn user_id(body: &Value) -> Uuid {
    body.get("id")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("No id in response")
}

pub fn str_field<'a>(body: &'a Value, field: &str) -> &'a str {
    body.get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| panic!("No string field '{field}' in {body:?}"))
}

pub fn num_field(body: &Value, field: &str) -> f64 {
    body.get(field)
        .and_then(|v| v.as_f64())
        .unwrap_or_else(|| panic!("No numeric field '{field}' in {body:?}"))
}
