//! API Models
//!
//! Wire shapes of the HTTP surface. Every response body is wrapped in
//! [`ApiResponse`].

use serde::{Deserialize, Serialize};

use crate::application::dto::{AccountView, ComplaintView};
use crate::domain::Department;
use crate::lifecycle::ComplaintStatus;
use crate::policy::{SortOrder, StatusFilter};

/// Standard API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

// ============ Auth ============

/// Which login screen the credentials were entered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginPortal {
    Citizen,
    Admin,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub portal: LoginPortal,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub actor: AccountView,
}

// ============ Complaints ============

#[derive(Debug, Serialize, Deserialize)]
pub struct ComplaintCreate {
    pub description: String,
    pub location: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ComplaintStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Query string of `GET /api/complaints`
#[derive(Debug, Default, Deserialize)]
pub struct ComplaintListParams {
    pub status: Option<StatusFilter>,
    /// Ignored unless the caller is a super admin
    pub department: Option<Department>,
    pub order: Option<SortOrder>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComplaintList {
    pub total: usize,
    pub items: Vec<ComplaintView>,
}
