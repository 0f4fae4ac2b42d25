//! Wire types for the FileVault REST API.
//!
//! Flat `success`/`message` envelopes, role strings on the wire, RFC 3339
//! timestamps — the contract the FileVault frontend consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// `POST /login` request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

/// `POST /login` success response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRes {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
    pub message: String,
}

/// `GET /auth/check` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthCheckRes {
    pub authenticated: bool,
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
}

/// One catalog entry as exposed over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileEntryRes {
    pub filename: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub is_local: bool,
    pub allowed_roles: Vec<String>,
}

/// `GET /files` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListFilesRes {
    pub success: bool,
    pub files: Vec<FileEntryRes>,
}

/// `GET /files/check/{filename}` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileCheckRes {
    pub success: bool,
    pub exists: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_available: Option<bool>,
}

/// `GET /files/download/{filename}` success response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DownloadRes {
    pub success: bool,
    pub message: String,
    pub local_path: String,
}

/// `GET /files/open/{filename}` success response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OpenFileRes {
    pub success: bool,
    pub message: String,
    pub local_path: String,
}

/// One audit trail entry as exposed over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityEntryRes {
    pub id: Uuid,
    pub user_name: String,
    pub user_role: String,
    pub filename: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// `GET /activity-logs` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityLogsRes {
    pub success: bool,
    pub activities: Vec<ActivityEntryRes>,
}

/// Generic success envelope (logout and friends).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub success: bool,
    pub message: String,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub success: bool,
    pub message: String,
}

impl ErrorRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
