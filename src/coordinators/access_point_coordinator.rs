use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::stores::AccessPointStore;
use crate::types::db::access_point;
use crate::types::internal::context::RequestContext;

/// Orchestrates access point listing and administration
pub struct AccessPointCoordinator {
    db: DatabaseConnection,
    access_point_store: Arc<AccessPointStore>,
}

impl AccessPointCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            access_point_store: app_data.access_point_store.clone(),
        }
    }

    pub async fn list_access_points(&self) -> Result<Vec<access_point::Model>, InternalError> {
        self.access_point_store.list_access_points(&self.db).await
    }

    pub async fn create_access_point(
        &self,
        ctx: &RequestContext,
        name: &str,
        location: Option<String>,
    ) -> Result<access_point::Model, InternalError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InternalError::validation("name", "must not be blank"));
        }
        let location = location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        let access_point = self
            .access_point_store
            .create_access_point(&self.db, name, location)
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id(),
            access_point_id = %access_point.id,
            "Access point created: {}",
            access_point.name
        );

        Ok(access_point)
    }

    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        access_point_id: &str,
        is_active: bool,
    ) -> Result<access_point::Model, InternalError> {
        let access_point = self
            .access_point_store
            .set_active(&self.db, access_point_id, is_active)
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id(),
            access_point_id = %access_point.id,
            is_active,
            "Access point status changed"
        );

        Ok(access_point)
    }
}
