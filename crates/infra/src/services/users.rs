//! User management façade (main API)

use std::sync::Arc;

use opsdeck_core::ToQuery;
use opsdeck_domain::{
    CreateUserRequest, UpdateUserRequest, UpdateUserStatusRequest, UploadConfig, User, UserFilters,
    UserStats, UserStatus, UsersListResponse,
};
use serde_json::Value;
use tracing::instrument;

use crate::api::{ApiClient, ApiError, ApiResponse};
use crate::http::Upload;

pub struct UsersService {
    client: Arc<ApiClient>,
    uploads: UploadConfig,
}

impl UsersService {
    pub fn new(client: Arc<ApiClient>, uploads: UploadConfig) -> Self {
        Self { client, uploads }
    }

    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        filters: &UserFilters,
    ) -> Result<ApiResponse<UsersListResponse>, ApiError> {
        self.client.get(&filters.to_query().append_to("/users")).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> Result<ApiResponse<User>, ApiError> {
        self.client.get(&user_path(id)?).await
    }

    #[instrument(skip_all, fields(email = %request.email, role = %request.role))]
    pub async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<ApiResponse<User>, ApiError> {
        self.client.post("/users", request).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        id: &str,
        request: &UpdateUserRequest,
    ) -> Result<ApiResponse<User>, ApiError> {
        self.client.put(&user_path(id)?, request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> Result<ApiResponse<Value>, ApiError> {
        self.client.delete(&user_path(id)?).await
    }

    #[instrument(skip(self))]
    pub async fn update_user_status(
        &self,
        id: &str,
        status: UserStatus,
    ) -> Result<ApiResponse<User>, ApiError> {
        let path = format!("{}/status", user_path(id)?);
        self.client.patch(&path, &UpdateUserStatusRequest { status }).await
    }

    #[instrument(skip(self))]
    pub async fn get_user_stats(&self) -> Result<ApiResponse<UserStats>, ApiError> {
        self.client.get("/users/stats").await
    }

    /// Upload an avatar after checking it against the configured limits.
    #[instrument(skip(self, upload), fields(file = %upload.file_name, size = upload.size()))]
    pub async fn upload_avatar(&self, id: &str, upload: Upload) -> Result<ApiResponse<User>, ApiError> {
        upload.validate(&self.uploads)?;
        let path = format!("{}/avatar", user_path(id)?);
        self.client.upload(&path, upload).await
    }
}

fn user_path(id: &str) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidInput("user id must not be empty".into()));
    }
    Ok(format!("/users/{}", urlencoding::encode(id)))
}
