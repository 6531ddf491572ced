//! Session and account domain types

mod account;
mod credentials;

pub use account::{
    LoginCredentials, LoginResponse, MIN_PASSWORD_LENGTH, PASSWORD_SPECIALS, Registration,
    UserProfile,
};
pub use credentials::{RefreshedAccess, TokenPair, access_token_expiry};
