use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::AccessPointError;
use crate::stores::is_unique_violation;
use crate::types::db::access_point;

/// Data access for check-in access points (gates, desks)
#[derive(Debug, Default)]
pub struct AccessPointStore;

impl AccessPointStore {
    pub fn new() -> Self {
        Self
    }

    /// All access points ordered by name
    pub async fn list_access_points(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<access_point::Model>, InternalError> {
        access_point::Entity::find()
            .order_by_asc(access_point::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_access_points", e))
    }

    pub async fn create_access_point(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        location: Option<String>,
    ) -> Result<access_point::Model, InternalError> {
        let existing = access_point::Entity::find()
            .filter(access_point::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_access_point_by_name", e))?;

        if existing.is_some() {
            return Err(AccessPointError::DuplicateName { name: name.to_string() }.into());
        }

        let new_access_point = access_point::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            location: Set(location),
            is_active: Set(true),
            created_at: Set(Utc::now().timestamp()),
        };

        new_access_point.insert(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                AccessPointError::DuplicateName { name: name.to_string() }.into()
            } else {
                InternalError::database("create_access_point", e)
            }
        })
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        access_point_id: &str,
    ) -> Result<access_point::Model, InternalError> {
        access_point::Entity::find_by_id(access_point_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_access_point_by_id", e))?
            .ok_or_else(|| {
                AccessPointError::AccessPointNotFound {
                    access_point_id: access_point_id.to_string(),
                }
                .into()
            })
    }

    /// Access point that may accept check-ins right now
    ///
    /// # Returns
    /// * `Err(AccessPointError::AccessPointNotFound)` - Unknown id
    /// * `Err(AccessPointError::Inactive)` - Access point disabled
    pub async fn get_active(
        &self,
        conn: &impl ConnectionTrait,
        access_point_id: &str,
    ) -> Result<access_point::Model, InternalError> {
        let access_point = self.get_by_id(conn, access_point_id).await?;

        if !access_point.is_active {
            return Err(AccessPointError::Inactive {
                access_point_id: access_point_id.to_string(),
            }
            .into());
        }

        Ok(access_point)
    }

    pub async fn set_active(
        &self,
        conn: &impl ConnectionTrait,
        access_point_id: &str,
        is_active: bool,
    ) -> Result<access_point::Model, InternalError> {
        let existing = self.get_by_id(conn, access_point_id).await?;

        let mut active: access_point::ActiveModel = existing.into();
        active.is_active = Set(is_active);

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_access_point_active", e))
    }
}
