use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::VisitorError;
use crate::stores::insertion_order;
use crate::types::db::visitor::{self, VisitorStatus};
use crate::types::db::visitor_log::{self, VisitorLogEvent};

/// Fields captured when a visitor is registered
#[derive(Debug, Clone)]
pub struct NewVisitor {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub purpose: String,
    pub host_user_id: Option<String>,
    pub registered_by: Option<String>,
    pub expected_at: Option<i64>,
}

/// Data access for visitors and their check-in/check-out log
#[derive(Debug, Default)]
pub struct VisitorStore;

impl VisitorStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_visitor(
        &self,
        conn: &impl ConnectionTrait,
        new_visitor: NewVisitor,
    ) -> Result<visitor::Model, InternalError> {
        let model = visitor::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            full_name: Set(new_visitor.full_name),
            phone: Set(new_visitor.phone),
            email: Set(new_visitor.email),
            company: Set(new_visitor.company),
            purpose: Set(new_visitor.purpose),
            host_user_id: Set(new_visitor.host_user_id),
            registered_by: Set(new_visitor.registered_by),
            status: Set(VisitorStatus::Registered),
            expected_at: Set(new_visitor.expected_at),
            checked_in_at: Set(None),
            checked_out_at: Set(None),
            access_point_id: Set(None),
            created_at: Set(Utc::now().timestamp()),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_visitor", e))
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        visitor_id: &str,
    ) -> Result<visitor::Model, InternalError> {
        visitor::Entity::find_by_id(visitor_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_visitor_by_id", e))?
            .ok_or_else(|| VisitorError::VisitorNotFound { visitor_id: visitor_id.to_string() }.into())
    }

    /// Visitors currently on site, most recent check-in first
    pub async fn list_active(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<visitor::Model>, InternalError> {
        visitor::Entity::find()
            .filter(visitor::Column::Status.eq(VisitorStatus::Active))
            .order_by_desc(visitor::Column::CheckedInAt)
            .order_by_desc(insertion_order())
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_active_visitors", e))
    }

    /// Visitors not on site (registered or checked out), newest first
    pub async fn list_not_active(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<visitor::Model>, InternalError> {
        visitor::Entity::find()
            .filter(visitor::Column::Status.ne(VisitorStatus::Active))
            .order_by_desc(visitor::Column::CreatedAt)
            .order_by_desc(insertion_order())
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_not_active_visitors", e))
    }

    pub async fn count_by_status(
        &self,
        conn: &impl ConnectionTrait,
        status: VisitorStatus,
    ) -> Result<u64, InternalError> {
        visitor::Entity::find()
            .filter(visitor::Column::Status.eq(status))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_visitors_by_status", e))
    }

    pub async fn count_checked_in_since(
        &self,
        conn: &impl ConnectionTrait,
        since: i64,
    ) -> Result<u64, InternalError> {
        visitor::Entity::find()
            .filter(visitor::Column::CheckedInAt.gte(since))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_checked_in_since", e))
    }

    /// Move a visitor from registered to active
    ///
    /// Returns false when the visitor was no longer `registered`, leaving
    /// the row untouched.
    pub async fn mark_checked_in(
        &self,
        conn: &impl ConnectionTrait,
        visitor_id: &str,
        access_point_id: &str,
        at: i64,
    ) -> Result<bool, InternalError> {
        let result = visitor::Entity::update_many()
            .col_expr(visitor::Column::Status, Expr::value(VisitorStatus::Active.as_str()))
            .col_expr(visitor::Column::CheckedInAt, Expr::value(at))
            .col_expr(visitor::Column::AccessPointId, Expr::value(access_point_id))
            .filter(visitor::Column::Id.eq(visitor_id))
            .filter(visitor::Column::Status.eq(VisitorStatus::Registered))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("mark_visitor_checked_in", e))?;

        Ok(result.rows_affected == 1)
    }

    /// Move a visitor from active to inactive
    ///
    /// Returns false when the visitor was not `active`.
    pub async fn mark_checked_out(
        &self,
        conn: &impl ConnectionTrait,
        visitor_id: &str,
        at: i64,
    ) -> Result<bool, InternalError> {
        let result = visitor::Entity::update_many()
            .col_expr(visitor::Column::Status, Expr::value(VisitorStatus::Inactive.as_str()))
            .col_expr(visitor::Column::CheckedOutAt, Expr::value(at))
            .filter(visitor::Column::Id.eq(visitor_id))
            .filter(visitor::Column::Status.eq(VisitorStatus::Active))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("mark_visitor_checked_out", e))?;

        Ok(result.rows_affected == 1)
    }

    pub async fn append_log(
        &self,
        conn: &impl ConnectionTrait,
        visitor_id: &str,
        access_point_id: Option<String>,
        event: VisitorLogEvent,
        recorded_by: Option<String>,
        recorded_at: i64,
    ) -> Result<visitor_log::Model, InternalError> {
        let entry = visitor_log::ActiveModel {
            id: NotSet,
            visitor_id: Set(visitor_id.to_string()),
            access_point_id: Set(access_point_id),
            event: Set(event),
            recorded_by: Set(recorded_by),
            recorded_at: Set(recorded_at),
        };

        entry
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("append_visitor_log", e))
    }

    /// Log entries for a visitor, oldest first
    pub async fn list_logs(
        &self,
        conn: &impl ConnectionTrait,
        visitor_id: &str,
    ) -> Result<Vec<visitor_log::Model>, InternalError> {
        visitor_log::Entity::find()
            .filter(visitor_log::Column::VisitorId.eq(visitor_id))
            .order_by_asc(visitor_log::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_visitor_logs", e))
    }
}
