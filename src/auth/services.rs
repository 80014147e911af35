use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use crate::{
    auth::password::{hash_password, verify_password},
    error::AppError,
    ledger::{LedgerStore, UserRecord},
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.\-]{1,64}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

lazy_static! {
    /// Verified against on a username miss so both failure paths pay for one
    /// Argon2 run with the same parameters.
    static ref DUMMY_PASSWORD_HASH: Option<String> =
        hash_password("merch-store-unknown-user").ok();
}

/// Burn one password verification for a username that does not exist.
/// Returns whether a verification actually ran.
pub(crate) fn verify_against_dummy(password: &str) -> bool {
    match DUMMY_PASSWORD_HASH.as_deref() {
        Some(hash) => verify_password(password, hash).is_ok(),
        None => false,
    }
}

/// Resolve credentials to a user. Unknown usernames and wrong passwords are
/// indistinguishable to the caller, in body and in timing.
pub async fn authenticate(
    ledger: &dyn LedgerStore,
    username: &str,
    password: &str,
) -> Result<UserRecord, AppError> {
    let user = match ledger.find_user_by_username(username).await? {
        Some(u) => u,
        None => {
            verify_against_dummy(password);
            warn!(username, "login unknown username");
            return Err(AppError::InvalidCredentials);
        }
    };

    let ok = verify_password(password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = %user.id, "stored password hash is unreadable");
        AppError::Internal(e)
    })?;

    if !ok {
        warn!(username, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }
    Ok(user)
}

/// Create a user out of band. Not reachable over HTTP.
pub async fn register_user(
    ledger: &dyn LedgerStore,
    username: &str,
    password: &str,
    coins: i64,
) -> Result<UserRecord, AppError> {
    let username = username.trim();
    if !is_valid_username(username) {
        return Err(AppError::Validation("Invalid username".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation("Password too short".into()));
    }
    if coins < 0 {
        return Err(AppError::Validation("Initial balance must not be negative".into()));
    }

    let hash = hash_password(password)?;
    let user = ledger.create_user(username, &hash, coins).await?;
    info!(user_id = %user.id, username = %user.username, coins, "user registered");
    Ok(user)
}
