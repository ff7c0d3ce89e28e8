#![warn(missing_docs)]
//! # nutrition-track-auth
//!
//! ## Purpose
//! Implements the local session lifecycle for `nutrition-track`.
//!
//! ## Responsibilities
//! - Abstract the persistent key-value storage behind [`KeyValueStore`].
//! - Validate login/signup form input.
//! - Persist, read, and delete the single [`SessionRecord`].
//! - Project raw storage into the [`SessionState`] sum type.
//!
//! ## Data flow
//! UI collects form fields -> [`SessionStore::login`] / [`SessionStore::signup`]
//! validate and write the record -> the controller re-reads
//! [`SessionStore::state`] to pick the visible screen.
//!
//! ## Error model
//! Form problems return [`SessionError::Validation`]. A failed storage write
//! returns [`SessionError::Storage`]. Malformed stored data is never an error:
//! it projects to [`SessionState::Anonymous`].
//!
//! ## Security and privacy notes
//! This is a placeholder scheme that only gates UI state. There is no
//! credential verification against any authority, passwords are never stored,
//! and nothing in this crate logs form values.
//!
//! ## Example
//! ```rust
//! use nutrition_track_auth::{MemoryStorage, SessionStore};
//!
//! let store = SessionStore::new(MemoryStorage::new());
//! assert!(!store.is_logged_in());
//! store.login("alice@example.com", "secret1").unwrap();
//! assert_eq!(store.display_name(), "Alice");
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use nutrition_track_core::SessionRecord;
use thiserror::Error;

/// Storage key holding the session record.
pub const SESSION_STORAGE_KEY: &str = "nutritiontrack_user";

/// Name used when no usable record is stored.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Minimum signup password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Persistent string key-value storage.
pub trait KeyValueStore {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the backend refuses the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes the value under `key`. Missing keys are not an error.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the backend refuses the delete.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage for tests and non-browser hosts.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        storage
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Session projection derived from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// A well-formed record is stored.
    Authenticated(SessionRecord),
    /// Nothing usable is stored.
    Anonymous,
}

impl SessionState {
    /// Projects a raw stored value. Absence and shape mismatch both map to
    /// [`SessionState::Anonymous`].
    pub fn load(raw: Option<&str>) -> Self {
        raw.and_then(|raw| SessionRecord::from_json(raw).ok())
            .map_or(SessionState::Anonymous, SessionState::Authenticated)
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        match self {
            SessionState::Authenticated(record) if !record.name.is_empty() => &record.name,
            _ => DEFAULT_DISPLAY_NAME,
        }
    }
}

/// Session store bound to one storage backend and key.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Creates a store using [`SESSION_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, SESSION_STORAGE_KEY)
    }

    /// Creates a store using a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Returns the storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns `true` when the storage key holds any value.
    pub fn is_logged_in(&self) -> bool {
        self.storage.get(&self.key).is_some()
    }

    /// Reads the current session projection.
    pub fn state(&self) -> SessionState {
        SessionState::load(self.storage.get(&self.key).as_deref())
    }

    /// Returns the stored name, or [`DEFAULT_DISPLAY_NAME`].
    pub fn display_name(&self) -> String {
        self.state().display_name().to_string()
    }

    /// Logs in with an email and password.
    ///
    /// The display name is the email's local part with its first character
    /// upper-cased. The password is only checked for presence.
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingField`] when either field is blank,
    /// and [`SessionError::Storage`] when the record cannot be written.
    pub fn login(&self, email: &str, password: &str) -> Result<SessionRecord, SessionError> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(ValidationError::MissingField.into());
        }

        let record = SessionRecord::new(email, display_name_from_email(email));
        self.persist(&record)?;
        tracing::info!(stage = "auth", action = "login_success", "session established");
        Ok(record)
    }

    /// Creates an account record from a signup form.
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingField`] when any field is blank,
    /// [`ValidationError::PasswordTooShort`] when the password has fewer than
    /// [`MIN_PASSWORD_LEN`] characters, and [`SessionError::Storage`] when the
    /// record cannot be written.
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionRecord, SessionError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.trim().is_empty() {
            return Err(ValidationError::MissingField.into());
        }

        // Counted in UTF-16 units, as browser form validation does.
        if password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min_len: MIN_PASSWORD_LEN,
            }
            .into());
        }

        let record = SessionRecord::new(email, name);
        self.persist(&record)?;
        tracing::info!(stage = "auth", action = "signup_success", "session established");
        Ok(record)
    }

    /// Deletes the stored record.
    ///
    /// A storage failure is logged and otherwise ignored; logout never fails.
    pub fn logout(&self) {
        match self.storage.remove(&self.key) {
            Ok(()) => tracing::info!(stage = "auth", action = "logout", "session cleared"),
            Err(error) => tracing::warn!(
                stage = "auth",
                action = "logout",
                error = %error,
                "failed to clear session record"
            ),
        }
    }

    fn persist(&self, record: &SessionRecord) -> Result<(), SessionError> {
        let encoded = record
            .to_json()
            .map_err(|error| SessionError::Storage(StorageError(error.to_string())))?;
        self.storage.set(&self.key, &encoded)?;
        Ok(())
    }
}

/// Derives a display name from an email address.
///
/// Uses the text before the first `@` (the whole input when there is none)
/// and upper-cases its first character.
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Storage backend failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage failure: {0}")]
pub struct StorageError(pub String);

/// Form validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is blank.
    #[error("Please fill in all fields")]
    MissingField,
    /// Signup password is too short.
    #[error("Password must be at least {min_len} characters")]
    PasswordTooShort {
        /// Required minimum length.
        min_len: usize,
    },
}

/// Errors produced by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Form input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Storage backend rejected a write.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Validation(error) => error.to_string(),
            SessionError::Storage(_) => "Could not save your session. Please try again.".to_string(),
        }
    }
}
