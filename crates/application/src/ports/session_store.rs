//! Session store port

use projecthub_domain::{ProjectId, TokenPair, UserProfile};
use secrecy::SecretString;

/// Port for the cached browser-session state.
///
/// All keys live and die together: [`SessionStore::clear`] removes the
/// credentials, the user profile and the active project in one step.
pub trait SessionStore: Send + Sync {
    /// The cached access token, if any.
    fn access_token(&self) -> Option<SecretString>;

    /// The cached refresh token, if any.
    fn refresh_token(&self) -> Option<SecretString>;

    /// Stores a freshly issued token pair.
    fn set_tokens(&self, tokens: TokenPair);

    /// Replaces the access token after a refresh.
    fn set_access_token(&self, access: SecretString);

    /// Replaces the refresh token when the server rotates it.
    fn set_refresh_token(&self, refresh: SecretString);

    /// The signed-in user's profile.
    fn user(&self) -> Option<UserProfile>;

    /// Stores the signed-in user's profile.
    fn set_user(&self, user: UserProfile);

    /// The project the user is working in.
    fn active_project(&self) -> Option<ProjectId>;

    /// Records (or forgets) the project the user is working in.
    fn set_active_project(&self, project: Option<ProjectId>);

    /// Removes every cached key.
    fn clear(&self);
}
