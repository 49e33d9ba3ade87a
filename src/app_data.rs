use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::services::{CheckinCodeService, PasswordHasherService, TokenService};
use crate::stores::{AccessPointStore, CredentialStore, NotificationStore, UserStore, VisitorStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across
/// coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings)
///   ├─ db (DatabaseConnection)
///   ├─ settings (Arc<Settings>)
///   ├─ services: token, password hasher, check-in codes
///   └─ stores: users, credentials, access points, visitors, notifications
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   └─ XxxCoordinator::new(app_data) → clones the Arcs it needs
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Arc<Settings>,

    pub token_service: Arc<TokenService>,
    pub password_hasher: Arc<PasswordHasherService>,
    pub checkin_codes: Arc<CheckinCodeService>,

    pub user_store: Arc<UserStore>,
    pub credential_store: Arc<CredentialStore>,
    pub access_point_store: Arc<AccessPointStore>,
    pub visitor_store: Arc<VisitorStore>,
    pub notification_store: Arc<NotificationStore>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database should be connected and migrated before calling this.
    pub fn init(db: DatabaseConnection, settings: Settings) -> Self {
        tracing::info!("Initializing AppData...");

        let token_service = Arc::new(TokenService::new(
            settings.jwt_secret().to_string(),
            settings.refresh_token_secret().to_string(),
            settings.jwt_expiration_minutes(),
            settings.refresh_expiration_days(),
        ));
        let password_hasher = Arc::new(PasswordHasherService::new(
            settings.password_pepper().to_string(),
        ));
        let checkin_codes = Arc::new(CheckinCodeService::new(settings.checkin_secret().to_string()));

        tracing::debug!("Creating stores...");
        let app_data = Self {
            db,
            settings: Arc::new(settings),
            token_service,
            password_hasher,
            checkin_codes,
            user_store: Arc::new(UserStore::new()),
            credential_store: Arc::new(CredentialStore::new()),
            access_point_store: Arc::new(AccessPointStore::new()),
            visitor_store: Arc::new(VisitorStore::new()),
            notification_store: Arc::new(NotificationStore::new()),
        };

        tracing::info!("AppData initialized");
        app_data
    }
}
