use async_trait::async_trait;
use dashmap::DashMap;
use jwt_simple::prelude::*;
use sqlgate_common::{GatewayError, Result};

use crate::principal::Principal;

/// Resolves a bearer credential to a [`Principal`]. Unknown credentials
/// fail with `Unauthenticated` (spec §4.11).
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal>;
}

/// A dev/test authenticator backed by a static token → principal map.
#[derive(Default)]
pub struct StaticAuthenticator {
    tokens: DashMap<String, Principal>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        StaticAuthenticator { tokens: DashMap::new() }
    }

    pub fn with_token(self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal> {
        self.tokens
            .get(bearer_token)
            .map(|p| p.clone())
            .ok_or(GatewayError::Unauthenticated)
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct PrincipalClaims {
    sub_name: String,
    roles: Vec<String>,
}

/// A production authenticator that verifies HS256-signed JWT bearer
/// tokens (the teacher's `databend-query` depends on `jwt-simple` for the
/// same purpose). The token's `sub` becomes the principal id; custom
/// claims carry the display name and role list.
pub struct JwtAuthenticator {
    key: HS256Key,
}

impl JwtAuthenticator {
    pub fn new(secret: &[u8]) -> Self {
        JwtAuthenticator { key: HS256Key::from_bytes(secret) }
    }

    pub fn issue_token(&self, principal: &Principal, valid_for: std::time::Duration) -> String {
        let claims = Claims::with_custom_claims(
            PrincipalClaims { sub_name: principal.name.clone(), roles: principal.roles.clone() },
            jwt_simple::prelude::Duration::from_millis(valid_for.as_millis() as u64),
        )
        .with_subject(principal.id.clone());
        self.key.authenticate(claims).expect("HS256 signing does not fail")
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal> {
        let claims = self
            .key
            .verify_token::<PrincipalClaims>(bearer_token, None)
            .map_err(|_| GatewayError::Unauthenticated)?;
        let id = claims.subject.ok_or(GatewayError::Unauthenticated)?;
        let custom = claims.custom;
        Ok(Principal::new(id, custom.sub_name, custom.roles))
    }
}

/// A tenant of multiple authenticators tried in order; used when a
/// gateway accepts both long-lived static tokens and short-lived JWTs.
pub struct ChainAuthenticator {
    authenticators: Vec<Box<dyn Authenticator>>,
}

impl ChainAuthenticator {
    pub fn new(authenticators: Vec<Box<dyn Authenticator>>) -> Self {
        ChainAuthenticator { authenticators }
    }
}

#[async_trait]
impl Authenticator for ChainAuthenticator {
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal> {
        for authenticator in &self.authenticators {
            if let Ok(principal) = authenticator.authenticate(bearer_token).await {
                return Ok(principal);
            }
        }
        Err(GatewayError::Unauthenticated)
    }
}
