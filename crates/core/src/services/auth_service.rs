use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use log::debug;

use crate::errors::CoreError;
use crate::models::holding::UserId;
use crate::models::user::{ProfileUpdate, User, UserProfile};
use crate::store::traits::UserStore;

/// Argon2id cost parameters for password hashes.
///
/// The parameters are embedded in each PHC string, so changing them only
/// affects newly hashed passwords.
#[derive(Debug, Clone, Copy)]
pub struct HashParams {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Number of iterations (default: 2)
    pub time_cost: u32,
    /// Degree of parallelism (default: 1)
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_cost: 19_456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

/// Registration, login and profile management.
///
/// Issuing and checking session tokens is left to the HTTP layer; it
/// passes the verified [`UserId`] into everything else.
pub struct AuthService {
    params: HashParams,
}

impl AuthService {
    pub fn new() -> Self {
        Self::with_params(HashParams::default())
    }

    pub fn with_params(params: HashParams) -> Self {
        Self { params }
    }

    /// Create an account. Returns the new user's id.
    pub fn register<S: UserStore>(
        &self,
        store: &mut S,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, CoreError> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(CoreError::ValidationError("All fields required".into()));
        }
        if store.find_user_by_email(&email)?.is_some() {
            return Err(CoreError::EmailExists(email));
        }

        let user = User::new(name, email, self.hash_password(password)?);
        let id = user.user_id;
        store.insert_user(user)?;
        debug!("registered user {id}");
        Ok(id)
    }

    /// Check credentials. Unknown email and wrong password fail the same way.
    pub fn login<S: UserStore>(
        &self,
        store: &S,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, CoreError> {
        let user = store
            .find_user_by_email(&normalize_email(email))?
            .ok_or(CoreError::InvalidCredentials)?;
        if !self.verify_password(password, &user.password_hash)? {
            return Err(CoreError::InvalidCredentials);
        }
        Ok(user.profile())
    }

    pub fn get_profile<S: UserStore>(
        &self,
        store: &S,
        user_id: UserId,
    ) -> Result<UserProfile, CoreError> {
        store
            .get_user(user_id)?
            .map(|u| u.profile())
            .ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))
    }

    /// Update name and email, and optionally the password.
    ///
    /// A new password is only accepted together with the correct current one.
    pub fn update_profile<S: UserStore>(
        &self,
        store: &mut S,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<(), CoreError> {
        let name = update.name.trim();
        let email = normalize_email(&update.email);
        if name.is_empty() || email.is_empty() {
            return Err(CoreError::ValidationError(
                "Name and email are required".into(),
            ));
        }

        let mut user = store
            .get_user(user_id)?
            .ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))?;

        if let Some(other) = store.find_user_by_email(&email)? {
            if other.user_id != user_id {
                return Err(CoreError::EmailExists(email));
            }
        }

        if let Some(new_password) = update.new_password.filter(|p| !p.is_empty()) {
            let current = update
                .current_password
                .filter(|p| !p.is_empty())
                .ok_or_else(|| CoreError::ValidationError("Current password required".into()))?;
            if !self.verify_password(&current, &user.password_hash)? {
                return Err(CoreError::InvalidCredentials);
            }
            user.password_hash = self.hash_password(&new_password)?;
        }

        user.name = name.to_string();
        user.email = email;
        if !store.update_user(user)? {
            return Err(CoreError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }

    fn hasher(&self) -> Result<Argon2<'static>, CoreError> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            None,
        )
        .map_err(|e| CoreError::PasswordHash(format!("Invalid Argon2 params: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a password into an Argon2id PHC string with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, CoreError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|e| CoreError::PasswordHash(format!("Failed to generate random salt: {e}")))?;
        let salt = SaltString::encode_b64(&salt_bytes)?;
        let hash = self.hasher()?.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Verify against a stored PHC string, using the parameters embedded
    /// in it. A malformed hash is an error, a mismatch is `Ok(false)`.
    pub fn verify_password(&self, password: &str, phc: &str) -> Result<bool, CoreError> {
        let parsed = PasswordHash::new(phc)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
