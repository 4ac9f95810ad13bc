//! SeaORM-based `User` repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::{prelude::Users, users};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::User;

use super::traits::UserRepository;

#[derive(Clone)]
pub struct UserSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl UserSeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

fn model_to_user(model: users::Model) -> User {
    User {
        user_id: model.user_id,
        username: model.username,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

#[async_trait]
impl UserRepository for UserSeaOrmRepository {
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let model = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(model.map(model_to_user))
    }

    async fn find_by_id(&self, user_id: Uuid) -> RepositoryResult<Option<User>> {
        let model = Users::find_by_id(user_id)
            .one(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(model.map(model_to_user))
    }

    async fn create(&self, username: String, password_hash: String) -> RepositoryResult<User> {
        let active_model = users::ActiveModel {
            user_id: Set(Uuid::new_v4()),
            username: Set(username),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
        };

        let model = active_model
            .insert(&*self.connection)
            .await
            .map_err(|e| {
                if e.to_string().to_lowercase().contains("unique") {
                    RepositoryError::ConstraintViolation {
                        constraint: "users_username_key".to_string(),
                        message: e.to_string(),
                    }
                } else {
                    RepositoryError::Database(e)
                }
            })?;

        Ok(model_to_user(model))
    }
}
