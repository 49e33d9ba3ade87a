// Stores layer - Data access, one store per entity family
pub mod access_point_store;
pub mod credential_store;
pub mod notification_store;
pub mod user_store;
pub mod visitor_store;

pub use access_point_store::AccessPointStore;
pub use credential_store::CredentialStore;
pub use notification_store::NotificationStore;
pub use user_store::UserStore;
pub use visitor_store::VisitorStore;

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{DbErr, SqlErr};

/// True when the error is a unique constraint violation
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// SQLite insertion order. Timestamps have one-second resolution, so lists
/// sorted newest first break ties on this.
pub(crate) fn insertion_order() -> SimpleExpr {
    Expr::cust("rowid")
}
