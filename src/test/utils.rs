// Test utilities shared by unit tests
// Only compiled when running tests

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use migration::{Migrator, MigratorTrait};

use crate::app_data::AppData;
use crate::config::{MockEnvironment, Settings};
use crate::services::PasswordHasherService;
use crate::types::db::access_point;
use crate::types::db::user::{self, Role};
use crate::types::internal::context::{RequestContext, Session};

pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Settings with fixed test secrets
pub fn test_settings() -> Settings {
    let env = MockEnvironment::empty().with_vars(&[
        ("DATABASE_URL", "sqlite::memory:"),
        ("JWT_SECRET", "test-secret-key-minimum-32-characters-long"),
        ("REFRESH_TOKEN_SECRET", "test-refresh-secret-minimum-32-chars"),
        ("PASSWORD_PEPPER", TEST_PASSWORD_PEPPER),
        ("CHECKIN_SECRET", "test-checkin-secret-minimum-32-chars!"),
    ]);

    Settings::from_env_provider(Arc::new(env)).expect("Failed to load test settings")
}

/// Creates the full application graph over a fresh in-memory database
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    Arc::new(AppData::init(db, test_settings()))
}

/// Inserts a user with `TEST_PASSWORD` and returns it
pub async fn create_test_user(db: &DatabaseConnection, username: &str, role: Role) -> user::Model {
    let hasher = PasswordHasherService::new(TEST_PASSWORD_PEPPER.to_string());
    let now = Utc::now().timestamp();

    user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        username: Set(username.to_string()),
        full_name: Set(format!("{} Test", username)),
        password_hash: Set(hasher.hash(TEST_PASSWORD).expect("Failed to hash password")),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert test user")
}

/// Inserts an access point
pub async fn create_test_access_point(db: &DatabaseConnection, name: &str, is_active: bool) -> access_point::Model {
    access_point::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(name.to_string()),
        location: Set(None),
        is_active: Set(is_active),
        created_at: Set(Utc::now().timestamp()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test access point")
}

/// Request context carrying a session for the given user
pub fn session_context(user: &user::Model) -> RequestContext {
    RequestContext::new().with_session(Session::from_user(
        user.clone(),
        Utc::now().timestamp() + 900,
    ))
}
