use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::UserError;
use crate::stores::is_unique_violation;
use crate::types::db::user::{self, Role};

/// Data access for user accounts
///
/// Every method takes the connection to run on, so coordinators can pass
/// either the pool or an open transaction.
#[derive(Debug, Default)]
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert a new user
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created user
    /// * `Err(UserError::DuplicateUsername)` - Username already taken
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        full_name: &str,
        password_hash: String,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        if self.find_by_username(conn, username).await?.is_some() {
            return Err(UserError::DuplicateUsername { username: username.to_string() }.into());
        }

        let now = Utc::now().timestamp();
        let new_user = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(username.to_string()),
            full_name: Set(full_name.to_string()),
            password_hash: Set(password_hash),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_user.insert(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                UserError::DuplicateUsername { username: username.to_string() }.into()
            } else {
                InternalError::database("create_user", e)
            }
        })
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Like `find_by_id`, but a missing user is an error
    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        self.find_by_id(conn, user_id)
            .await?
            .ok_or_else(|| UserError::UserIdNotFound { user_id: user_id.to_string() }.into())
    }

    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    /// All users ordered by username
    pub async fn list_users(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<user::Model>, InternalError> {
        user::Entity::find()
            .order_by_asc(user::Column::Username)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn update_role(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let existing = self.get_by_id(conn, user_id).await?;

        let mut active: user::ActiveModel = existing.into();
        active.role = Set(role);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_role", e))
    }

    pub async fn update_password(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        password_hash: String,
    ) -> Result<(), InternalError> {
        let existing = self.get_by_id(conn, user_id).await?;

        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_password", e))?;

        Ok(())
    }

    /// Delete a user. Their refresh tokens and notifications cascade.
    pub async fn delete_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<(), InternalError> {
        let result = user::Entity::delete_by_id(user_id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        if result.rows_affected == 0 {
            return Err(UserError::UserIdNotFound { user_id: user_id.to_string() }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_user, setup_test_db};

    #[tokio::test]
    async fn test_create_user_persists_fields() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        let created = store
            .create_user(&db, "alice", "Alice Doe", "hash".to_string(), Role::Staff)
            .await
            .unwrap();

        let found = store.find_by_username(&db, "alice").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.role, Role::Staff);
        assert_eq!(found.full_name, "Alice Doe");
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_username() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        create_test_user(&db, "alice", Role::Staff).await;

        let result = store
            .create_user(&db, "alice", "Other", "hash".to_string(), Role::Admin)
            .await;

        match result {
            Err(InternalError::User(UserError::DuplicateUsername { username })) => {
                assert_eq!(username, "alice");
            }
            other => panic!("Expected DuplicateUsername, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_users_sorted_by_username() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        create_test_user(&db, "charlie", Role::Staff).await;
        create_test_user(&db, "alice", Role::Admin).await;
        create_test_user(&db, "bob", Role::Staff).await;

        let names: Vec<String> = store
            .list_users(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();

        assert_eq!(names, vec!["alice", "bob", "charlie"]);
    }

    #[tokio::test]
    async fn test_update_role() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        let user = create_test_user(&db, "alice", Role::Staff).await;

        let updated = store.update_role(&db, &user.id, Role::Admin).await.unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert_eq!(store.get_by_id(&db, &user.id).await.unwrap().role, Role::Admin);
    }

    #[tokio::test]
    async fn test_update_role_unknown_user() {
        let db = setup_test_db().await;

        let result = UserStore::new().update_role(&db, "missing", Role::Admin).await;

        match result {
            Err(InternalError::User(UserError::UserIdNotFound { .. })) => {}
            other => panic!("Expected UserIdNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_password_replaces_hash() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        let user = create_test_user(&db, "alice", Role::Staff).await;

        store.update_password(&db, &user.id, "new-hash".to_string()).await.unwrap();

        let found = store.get_by_id(&db, &user.id).await.unwrap();
        assert_eq!(found.password_hash, "new-hash");
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        let user = create_test_user(&db, "alice", Role::Staff).await;

        store.delete_user(&db, &user.id).await.unwrap();

        assert!(store.find_by_id(&db, &user.id).await.unwrap().is_none());
        match store.delete_user(&db, &user.id).await {
            Err(InternalError::User(UserError::UserIdNotFound { .. })) => {}
            other => panic!("Expected UserIdNotFound, got {:?}", other),
        }
    }
}
