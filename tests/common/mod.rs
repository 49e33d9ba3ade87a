// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use poem::Route;
use poem::test::TestClient;
use sea_orm::{Database, DatabaseConnection};
use serde_json::json;

use migration::{Migrator, MigratorTrait};
use visitdesk::api::build_routes;
use visitdesk::app_data::AppData;
use visitdesk::config::{MockEnvironment, Settings};
use visitdesk::types::db::user::{self, Role};

pub const PASSWORD: &str = "correct-horse-battery";

pub const TEST_VARS: [(&str, &str); 5] = [
    ("DATABASE_URL", "sqlite::memory:"),
    ("JWT_SECRET", "test-secret-key-minimum-32-characters-long"),
    ("REFRESH_TOKEN_SECRET", "test-refresh-secret-minimum-32-chars"),
    ("PASSWORD_PEPPER", "test-pepper-for-integration"),
    ("CHECKIN_SECRET", "test-checkin-secret-minimum-32-chars!"),
];

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Full route tree over a fresh database
pub async fn setup_app() -> (TestClient<Route>, Arc<AppData>) {
    let settings = Settings::from_env_provider(Arc::new(MockEnvironment::empty().with_vars(&TEST_VARS)))
        .expect("Failed to load test settings");

    let app_data = Arc::new(AppData::init(setup_test_db().await, settings));
    let client = TestClient::new(build_routes(app_data.clone()));

    (client, app_data)
}

/// Inserts a user whose password is `PASSWORD`
pub async fn create_user(app_data: &AppData, username: &str, role: Role) -> user::Model {
    let hash = app_data
        .password_hasher
        .hash(PASSWORD)
        .expect("Failed to hash password");

    app_data
        .user_store
        .create_user(&app_data.db, username, &format!("{} Example", username), hash, role)
        .await
        .expect("Failed to create user")
}

/// Signs in through the API and returns the access token
pub async fn sign_in(client: &TestClient<Route>, username: &str) -> String {
    let resp = client
        .post("/api/auth/signin")
        .body_json(&json!({ "username": username, "password": PASSWORD }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let json = resp.json().await;
    json.value().object().get("access_token").string().to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
