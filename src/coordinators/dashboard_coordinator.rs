use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::stores::VisitorStore;
use crate::types::db::visitor::{self, VisitorStatus};
use crate::types::dto::dashboard::DashboardSummary;

/// Visitor overviews for the dashboard
pub struct DashboardCoordinator {
    db: DatabaseConnection,
    visitor_store: Arc<VisitorStore>,
}

impl DashboardCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            visitor_store: app_data.visitor_store.clone(),
        }
    }

    /// Visitors currently checked in
    pub async fn active_visitors(&self) -> Result<Vec<visitor::Model>, InternalError> {
        self.visitor_store.list_active(&self.db).await
    }

    /// Visitors not currently checked in: registered or checked out
    pub async fn unactive_visitors(&self) -> Result<Vec<visitor::Model>, InternalError> {
        self.visitor_store.list_not_active(&self.db).await
    }

    pub async fn summary(&self) -> Result<DashboardSummary, InternalError> {
        let midnight = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc().timestamp();

        Ok(DashboardSummary {
            registered: self.visitor_store.count_by_status(&self.db, VisitorStatus::Registered).await?,
            active: self.visitor_store.count_by_status(&self.db, VisitorStatus::Active).await?,
            inactive: self.visitor_store.count_by_status(&self.db, VisitorStatus::Inactive).await?,
            checked_in_today: self.visitor_store.count_checked_in_since(&self.db, midnight).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::visitor_store::NewVisitor;
    use crate::test::utils::{create_test_access_point, setup_test_app_data};

    fn guest(name: &str) -> NewVisitor {
        NewVisitor {
            full_name: name.to_string(),
            phone: "555".to_string(),
            email: None,
            company: None,
            purpose: "Delivery".to_string(),
            host_user_id: None,
            registered_by: None,
            expected_at: None,
        }
    }

    #[tokio::test]
    async fn test_summary_counts_statuses_and_today() {
        let app_data = setup_test_app_data().await;
        let coordinator = DashboardCoordinator::new(app_data.clone());
        let store = &app_data.visitor_store;
        let db = &app_data.db;
        let gate = create_test_access_point(db, "Lobby", true).await;

        store.create_visitor(db, guest("A")).await.unwrap();
        let b = store.create_visitor(db, guest("B")).await.unwrap();
        let c = store.create_visitor(db, guest("C")).await.unwrap();
        let now = Utc::now().timestamp();
        store.mark_checked_in(db, &b.id, &gate.id, now).await.unwrap();
        store.mark_checked_in(db, &c.id, &gate.id, 1_000).await.unwrap();
        store.mark_checked_out(db, &c.id, 2_000).await.unwrap();

        let summary = coordinator.summary().await.unwrap();

        assert_eq!(
            summary,
            DashboardSummary { registered: 1, active: 1, inactive: 1, checked_in_today: 1 }
        );
        assert_eq!(coordinator.active_visitors().await.unwrap().len(), 1);
        assert_eq!(coordinator.unactive_visitors().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let app_data = setup_test_app_data().await;
        let coordinator = DashboardCoordinator::new(app_data);

        assert!(coordinator.active_visitors().await.unwrap().is_empty());
        assert!(coordinator.unactive_visitors().await.unwrap().is_empty());
        assert_eq!(coordinator.summary().await.unwrap().registered, 0);
    }
}
