//! Authentication extractors.
//!
//! This module provides extractors for:
//! - `MemberAuth` - end-member identity forwarded by the identity gateway
//! - `ServiceAuth` - service-to-service authentication via API key
//! - `AdminAuth` - admin console authentication, yielding the capability
//!   token the ledger's adjust path requires
//!
//! The ledger does not authenticate users itself; the identity gateway
//! validates the session and forwards the member UUID in `x-member-id`.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use loyalty_core::MemberId;
use loyalty_ledger::AdminCapability;

use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated member, as asserted by the upstream identity gateway.
#[derive(Debug, Clone)]
pub struct MemberAuth {
    /// The member ID.
    pub member_id: MemberId,
}

impl FromRequestParts<Arc<AppState>> for MemberAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let member_id = parts
                .headers
                .get("x-member-id")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?
                .parse::<MemberId>()
                .map_err(|_| ApiError::Unauthorized)?;

            Ok(MemberAuth { member_id })
        })
    }
}

/// Service authentication via API key.
///
/// Used by the check-in, referral, purchase, challenge, and achievement
/// services when crediting points.
#[derive(Debug, Clone)]
pub struct ServiceAuth {
    /// The calling service's name (from `x-service-name`, for logging).
    pub service_name: String,
}

impl FromRequestParts<Arc<AppState>> for ServiceAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let api_key = parts
                .headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            let expected = state
                .config
                .service_api_key
                .as_deref()
                .ok_or(ApiError::Unauthorized)?;

            if api_key != expected {
                return Err(ApiError::Unauthorized);
            }

            let service_name = parts
                .headers
                .get("x-service-name")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();

            Ok(ServiceAuth { service_name })
        })
    }
}

/// Admin authentication via the admin API key.
///
/// The identity system vets admin access before handing out the key; a
/// successful extraction yields the `AdminCapability` that the ledger's
/// privileged adjust path demands.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// The validated capability token.
    pub capability: AdminCapability,
}

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let admin_key = parts
                .headers
                .get("x-admin-key")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            let expected = state
                .config
                .admin_api_key
                .as_deref()
                .ok_or(ApiError::Unauthorized)?;

            if admin_key != expected {
                return Err(ApiError::Unauthorized);
            }

            let actor = parts
                .headers
                .get("x-admin-user")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("admin-console");

            Ok(AdminAuth {
                capability: AdminCapability::new(actor),
            })
        })
    }
}
