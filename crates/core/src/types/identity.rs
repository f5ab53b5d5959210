//! Cart ownership identities.
//!
//! A cart belongs to exactly one identity: a durable user id once the visitor
//! has authenticated, or an opaque session token while they browse as a guest.
//! Modelling this as an enum makes the "both keys populated" state
//! unrepresentable.

use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::session::SessionToken;

/// The key under which a cart is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CartIdentity {
    /// Cart owned by an authenticated user.
    User(UserId),
    /// Cart owned by an anonymous session.
    Session(SessionToken),
}

impl CartIdentity {
    /// Resolve the identity for the current visitor.
    ///
    /// A user id is authoritative when present; the session token only applies
    /// for guests. Neither present means the visitor has no cart, which callers
    /// treat as an empty cart rather than an error.
    #[must_use]
    pub fn resolve(user_id: Option<UserId>, session_token: Option<SessionToken>) -> Option<Self> {
        match (user_id, session_token) {
            (Some(user_id), _) => Some(Self::User(user_id)),
            (None, Some(token)) => Some(Self::Session(token)),
            (None, None) => None,
        }
    }

    /// Returns the user id if this identity is user-owned.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(user_id) => Some(*user_id),
            Self::Session(_) => None,
        }
    }

    /// Returns the session token if this identity is session-owned.
    #[must_use]
    pub const fn session_token(&self) -> Option<&SessionToken> {
        match self {
            Self::User(_) => None,
            Self::Session(token) => Some(token),
        }
    }
}
