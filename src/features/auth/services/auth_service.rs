use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto};
use crate::features::auth::model::AdminRole;
use crate::features::auth::JwtValidator;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Password check for one role. Stores only the HMAC tag of the password.
struct RoleCredential {
    role: AdminRole,
    tag: Vec<u8>,
}

/// Service for admin login
pub struct AuthService {
    validator: Arc<JwtValidator>,
    mac_key: Vec<u8>,
    credentials: Vec<RoleCredential>,
}

impl AuthService {
    pub fn new(config: &AuthConfig, validator: Arc<JwtValidator>) -> Result<Self> {
        let mac_key = config.jwt_secret.as_bytes().to_vec();

        // Super admin first so a shared password resolves to the higher role
        let mut credentials = Vec::new();
        for (role, password) in [
            (AdminRole::SuperAdmin, config.superadmin_password.as_deref()),
            (AdminRole::Admin, config.admin_password.as_deref()),
        ] {
            if let Some(password) = password {
                credentials.push(RoleCredential {
                    role,
                    tag: mac_tag(&mac_key, password)?,
                });
            } else {
                tracing::warn!("No password configured for role {}", role.as_str());
            }
        }

        Ok(Self {
            validator,
            mac_key,
            credentials,
        })
    }

    /// Resolve the role for a password. Comparison is constant-time.
    fn resolve_role(&self, password: &str) -> Result<Option<AdminRole>> {
        for credential in &self.credentials {
            let mut mac = HmacSha256::new_from_slice(&self.mac_key)
                .map_err(|e| AppError::Internal(format!("Invalid HMAC key: {}", e)))?;
            mac.update(password.as_bytes());
            if mac.verify_slice(&credential.tag).is_ok() {
                return Ok(Some(credential.role));
            }
        }
        Ok(None)
    }

    pub fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let role = self
            .resolve_role(&dto.password)?
            .ok_or_else(|| {
                tracing::warn!("Rejected admin login attempt");
                AppError::Unauthorized("Invalid credentials".to_string())
            })?;

        let (access_token, claims) = self.validator.issue_token(role)?;
        tracing::info!(role = role.as_str(), session_id = %claims.sid, "Admin session issued");

        Ok(AuthResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: claims.exp - claims.iat,
            role,
        })
    }
}

fn mac_tag(key: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(format!("Invalid HMAC key: {}", e)))?;
    mac.update(password.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            admin_password: Some("admin-pass".to_string()),
            superadmin_password: Some("super-pass".to_string()),
            token_ttl: Duration::from_secs(600),
        }
    }

    fn service() -> AuthService {
        let config = test_config();
        let validator = Arc::new(JwtValidator::new(&config.jwt_secret, config.token_ttl));
        AuthService::new(&config, validator).unwrap()
    }

    #[test]
    fn test_login_resolves_roles() {
        let service = service();

        let admin = service
            .login(LoginRequestDto {
                password: "admin-pass".to_string(),
            })
            .unwrap();
        assert_eq!(admin.role, AdminRole::Admin);
        assert_eq!(admin.expires_in, 600);

        let super_admin = service
            .login(LoginRequestDto {
                password: "super-pass".to_string(),
            })
            .unwrap();
        assert_eq!(super_admin.role, AdminRole::SuperAdmin);
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let result = service().login(LoginRequestDto {
            password: "elevateai2024".to_string(),
        });
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_unset_role_cannot_log_in() {
        let mut config = test_config();
        config.admin_password = None;
        let validator = Arc::new(JwtValidator::new(&config.jwt_secret, config.token_ttl));
        let service = AuthService::new(&config, validator).unwrap();

        assert!(service
            .login(LoginRequestDto {
                password: "admin-pass".to_string(),
            })
            .is_err());
    }

    #[test]
    fn test_issued_token_validates() {
        let config = test_config();
        let validator = Arc::new(JwtValidator::new(&config.jwt_secret, config.token_ttl));
        let service = AuthService::new(&config, Arc::clone(&validator)).unwrap();

        let response = service
            .login(LoginRequestDto {
                password: "super-pass".to_string(),
            })
            .unwrap();
        let user = validator.validate_token(&response.access_token).unwrap();
        assert!(user.is_super_admin());
    }
}
