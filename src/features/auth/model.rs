use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Roles that can hold an admin session.
///
/// `SuperAdmin` manages prompt templates and seeding on top of everything
/// an `Admin` can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::SuperAdmin => "super_admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub role: AdminRole,
    /// Random id minted per login, useful for correlating logs
    pub session_id: String,
    /// Unix timestamp (seconds) at which the session token expires
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }

    /// Admin panels are open to both roles
    pub fn has_admin_access(&self) -> bool {
        matches!(self.role, AdminRole::Admin | AdminRole::SuperAdmin)
    }
}

/// Claims carried in the session JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: AdminRole,
    pub sid: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            sub: claims.sub,
            role: claims.role,
            session_id: claims.sid,
            expires_at: claims.exp,
        }
    }
}
