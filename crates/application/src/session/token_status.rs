//! Access token freshness, as shown next to the signed-in user.

use chrono::{DateTime, Utc};
use projecthub_domain::session::access_token_expiry;

use crate::ports::SessionStore;

/// Seconds before expiry at which a token counts as expiring.
pub const DEFAULT_EXPIRY_BUFFER_SECS: i64 = 60;

/// Status of the cached access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// No access token is cached.
    NotAuthenticated,
    /// Token is valid and not expiring soon.
    Valid {
        /// Seconds until expiry, or None for tokens without an `exp` claim.
        seconds_remaining: Option<i64>,
    },
    /// Token is valid but will expire soon.
    Expiring {
        /// Seconds until expiry.
        seconds_remaining: i64,
        /// Whether a refresh token is available.
        can_refresh: bool,
    },
    /// Token has expired.
    Expired {
        /// Whether a refresh token is available.
        can_refresh: bool,
    },
}

impl TokenStatus {
    /// Classifies a token expiring at `expires_at`.
    #[must_use]
    pub fn evaluate(
        expires_at: Option<DateTime<Utc>>,
        can_refresh: bool,
        buffer_secs: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let Some(expires_at) = expires_at else {
            return Self::Valid {
                seconds_remaining: None,
            };
        };

        let seconds_remaining = (expires_at - now).num_seconds();
        if seconds_remaining <= 0 {
            Self::Expired { can_refresh }
        } else if seconds_remaining <= buffer_secs {
            Self::Expiring {
                seconds_remaining,
                can_refresh,
            }
        } else {
            Self::Valid {
                seconds_remaining: Some(seconds_remaining),
            }
        }
    }

    /// Reads the status of the token cached in `session`.
    #[must_use]
    pub fn of_session(session: &dyn SessionStore, buffer_secs: i64) -> Self {
        let Some(access) = session.access_token() else {
            return Self::NotAuthenticated;
        };
        Self::evaluate(
            access_token_expiry(&access),
            session.refresh_token().is_some(),
            buffer_secs,
            Utc::now(),
        )
    }

    /// Returns true if the token is valid (not expired).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. } | Self::Expiring { .. })
    }

    /// Returns true if the token is expiring or expired.
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        matches!(self, Self::Expiring { .. } | Self::Expired { .. })
    }

    /// Get a user-friendly display message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not signed in".to_string(),
            Self::Valid {
                seconds_remaining: Some(secs),
            } => {
                if *secs > 3600 {
                    format!("Valid for {} hours", secs / 3600)
                } else if *secs > 60 {
                    format!("Valid for {} minutes", secs / 60)
                } else {
                    format!("Valid for {secs} seconds")
                }
            }
            Self::Valid {
                seconds_remaining: None,
            } => "Valid (no expiry)".to_string(),
            Self::Expiring {
                seconds_remaining,
                can_refresh,
            } => {
                let hint = if *can_refresh {
                    " (renewed on next request)"
                } else {
                    ""
                };
                format!("Expiring in {seconds_remaining} seconds{hint}")
            }
            Self::Expired { can_refresh: true } => "Expired (can refresh)".to_string(),
            Self::Expired { can_refresh: false } => "Expired".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InMemorySessionStore;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use projecthub_domain::TokenPair;

    #[test]
    fn test_not_authenticated_without_token() {
        let session = InMemorySessionStore::new();
        let status = TokenStatus::of_session(&session, DEFAULT_EXPIRY_BUFFER_SECS);
        assert_eq!(status, TokenStatus::NotAuthenticated);
        assert!(!status.is_valid());
    }

    #[test]
    fn test_opaque_token_has_no_expiry() {
        let session = InMemorySessionStore::new();
        session.set_tokens(TokenPair::new("opaque", "r1"));

        let status = TokenStatus::of_session(&session, DEFAULT_EXPIRY_BUFFER_SECS);

        assert_eq!(
            status,
            TokenStatus::Valid {
                seconds_remaining: None
            }
        );
        assert_eq!(status.display_message(), "Valid (no expiry)");
    }

    #[test]
    fn test_evaluate_buckets() {
        let now = Utc::now();

        assert_eq!(
            TokenStatus::evaluate(Some(now + Duration::hours(2)), true, 60, now),
            TokenStatus::Valid {
                seconds_remaining: Some(7200)
            }
        );
        assert_eq!(
            TokenStatus::evaluate(Some(now + Duration::seconds(30)), true, 60, now),
            TokenStatus::Expiring {
                seconds_remaining: 30,
                can_refresh: true
            }
        );
        assert_eq!(
            TokenStatus::evaluate(Some(now - Duration::seconds(1)), false, 60, now),
            TokenStatus::Expired { can_refresh: false }
        );
    }

    #[test]
    fn test_display_messages() {
        let expiring = TokenStatus::Expiring {
            seconds_remaining: 30,
            can_refresh: true,
        };
        assert!(expiring.needs_attention());
        assert_eq!(
            expiring.display_message(),
            "Expiring in 30 seconds (renewed on next request)"
        );

        let valid = TokenStatus::Valid {
            seconds_remaining: Some(600),
        };
        assert_eq!(valid.display_message(), "Valid for 10 minutes");
    }
}
