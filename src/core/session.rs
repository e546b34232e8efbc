//! Registered-user directory and the signed-in session

use crate::core::data::{Role, UserProfile};
use crate::core::traits::KvStore;
use crate::storage::{SESSION_KEY, USERS_KEY};
use crate::utils::error::{AppError, AppResult};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Built-in administrator that exists outside the directory
pub const SUPER_ADMIN_PHONE: &str = "000";
const SUPER_ADMIN_PASSWORD: &str = "admin";
const SUPER_ADMIN_ID: &str = "super-admin";

/// Fields collected by the registration form
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

/// Profile fields to change; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.password.is_none()
            && self.photo_url.is_none()
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    users: Vec<UserProfile>,
    current: Option<UserProfile>,
}

impl SessionStore {
    /// Load the directory and any persisted session
    pub fn load(store: &impl KvStore) -> AppResult<Self> {
        let mut users: Vec<UserProfile> = match store.get(USERS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };

        // Accounts written before internal ids existed get one now
        let mut assigned = false;
        for user in &mut users {
            if user.id.is_empty() {
                user.id = Uuid::new_v4().to_string();
                assigned = true;
            }
        }

        let mut current: Option<UserProfile> = match store.get(SESSION_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => None,
        };
        if let Some(session) = current.as_mut()
            && session.id.is_empty()
        {
            session.id = users
                .iter()
                .find(|u| u.phone == session.phone)
                .map(|u| u.id.clone())
                .unwrap_or_else(|| Uuid::new_v4().to_string());
        }

        let sessions = Self { users, current };
        if assigned {
            debug!("Assigned ids to legacy accounts");
            sessions.save_users(store)?;
            sessions.save_session(store)?;
        }
        debug!(
            users = sessions.users.len(),
            signed_in = sessions.current.is_some(),
            "Loaded session store"
        );
        Ok(sessions)
    }

    pub fn users(&self) -> &[UserProfile] {
        &self.users
    }

    pub fn current(&self) -> Option<&UserProfile> {
        self.current.as_ref()
    }

    /// Add an account to the directory. Does not sign the new user in.
    pub fn register(
        &mut self,
        store: &impl KvStore,
        form: RegistrationForm,
    ) -> AppResult<UserProfile> {
        if form.phone.is_empty() || form.password.is_empty() {
            return Err(AppError::Validation(
                "Please enter both phone and password".to_string(),
            ));
        }
        if form.name.trim().is_empty() {
            return Err(AppError::Validation("Please enter your full name".to_string()));
        }
        if form.role == Role::Admin {
            return Err(AppError::Validation(
                "Only Passenger or Conductor accounts can be registered".to_string(),
            ));
        }
        if self.users.iter().any(|u| u.phone == form.phone) {
            return Err(AppError::DuplicatePhone(form.phone));
        }

        let profile =
            UserProfile::new(form.name, form.phone, form.role).with_password(form.password);
        self.users.push(profile.clone());
        if let Err(e) = self.save_users(store) {
            self.users.pop();
            return Err(e);
        }

        info!(role = %profile.role, "Registered new account");
        Ok(profile)
    }

    pub fn login(
        &mut self,
        store: &impl KvStore,
        phone: &str,
        password: &str,
    ) -> AppResult<&UserProfile> {
        if phone.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Please enter both phone and password".to_string(),
            ));
        }

        let profile = if phone == SUPER_ADMIN_PHONE && password == SUPER_ADMIN_PASSWORD {
            super_admin()
        } else {
            self.users
                .iter()
                .find(|u| u.phone == phone && u.password.as_deref() == Some(password))
                .cloned()
                .ok_or(AppError::InvalidCredentials)?
        };

        write_session(store, Some(&profile))?;
        info!(role = %profile.role, "Signed in");
        Ok(&*self.current.insert(profile))
    }

    /// Clear the session. Storage failures are logged, never surfaced.
    pub fn logout(&mut self, store: &impl KvStore) {
        self.current = None;
        if let Err(e) = store.remove(SESSION_KEY) {
            warn!(error = %e, "Failed to clear persisted session");
        }
        info!("Signed out");
    }

    /// Apply profile changes to the session and its directory entry
    pub fn update_profile(
        &mut self,
        store: &impl KvStore,
        update: ProfileUpdate,
    ) -> AppResult<&UserProfile> {
        let current = self
            .current
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("sign in to edit your profile".to_string()))?;

        let mut updated = current.clone();
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Name cannot be empty".to_string()));
            }
            updated.name = name;
        }
        if let Some(phone) = update.phone {
            if phone.is_empty() {
                return Err(AppError::Validation("Phone cannot be empty".to_string()));
            }
            if self.users.iter().any(|u| u.phone == phone && u.id != updated.id) {
                return Err(AppError::DuplicatePhone(phone));
            }
            updated.phone = phone;
        }
        if let Some(password) = update.password {
            if password.is_empty() {
                return Err(AppError::Validation("Password cannot be empty".to_string()));
            }
            updated.password = Some(password);
        }
        if let Some(photo) = update.photo_url {
            updated.photo_url = if photo.is_empty() { None } else { Some(photo) };
        }

        // Both copies are written before either is replaced in memory
        let users = match self.users.iter().position(|u| u.id == updated.id) {
            Some(index) => {
                let mut users = self.users.clone();
                users[index] = updated.clone();
                write_users(store, &users)?;
                Some(users)
            }
            None => {
                if updated.id != SUPER_ADMIN_ID {
                    warn!("Signed-in profile has no directory entry; updating session only");
                }
                None
            }
        };
        if let Err(e) = write_session(store, Some(&updated)) {
            if users.is_some()
                && let Err(restore) = self.save_users(store)
            {
                warn!(error = %restore, "Failed to restore stored directory");
            }
            return Err(e);
        }

        if let Some(users) = users {
            self.users = users;
        }
        info!("Updated profile");
        Ok(&*self.current.insert(updated))
    }

    fn save_users(&self, store: &impl KvStore) -> AppResult<()> {
        write_users(store, &self.users)
    }

    fn save_session(&self, store: &impl KvStore) -> AppResult<()> {
        write_session(store, self.current.as_ref())
    }
}

fn write_users(store: &impl KvStore, users: &[UserProfile]) -> AppResult<()> {
    let raw = serde_json::to_string_pretty(users)?;
    store.set(USERS_KEY, &raw)
}

fn write_session(store: &impl KvStore, profile: Option<&UserProfile>) -> AppResult<()> {
    match profile {
        Some(profile) => store.set(SESSION_KEY, &serde_json::to_string(profile)?),
        None => store.remove(SESSION_KEY),
    }
}

fn super_admin() -> UserProfile {
    UserProfile {
        id: SUPER_ADMIN_ID.to_string(),
        name: "System Admin".to_string(),
        phone: SUPER_ADMIN_PHONE.to_string(),
        role: Role::Admin,
        password: None,
        photo_url: None,
    }
}
