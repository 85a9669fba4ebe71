//! User entity representing a registered account.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use tours_shared::utils::{is_valid_email, normalize_email};

use crate::errors::{DomainError, DomainResult, ValidationErrors};
use crate::query::{Field, FieldType, Schema};

use super::{Entity, UniqueKey};

pub const DEFAULT_PHOTO: &str = "default.jpg";
pub const MIN_PASSWORD_LENGTH: usize = 8;

static USER_FIELDS: [Field; 6] = [
    Field::new("id", "id", FieldType::Uuid),
    Field::new("name", "name", FieldType::Text),
    Field::new("email", "email", FieldType::Text),
    Field::new("role", "role", FieldType::Text),
    Field::new("photo", "photo", FieldType::Text),
    Field::new("createdAt", "created_at", FieldType::DateTime),
];

pub static USER_SCHEMA: Schema = Schema {
    resource: "user",
    table: "users",
    fields: &USER_FIELDS,
    multi_value_fields: &[],
    hidden_clause: Some("active = TRUE"),
};

/// Access level of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[default]
    User,
    Guide,
    LeadGuide,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Guide => "guide",
            Role::LeadGuide => "lead-guide",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "guide" => Ok(Role::Guide),
            "lead-guide" => Ok(Role::LeadGuide),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::Cast {
                field: "role".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// User entity
///
/// Credential and lifecycle fields are never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub role: Role,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[serde(skip_serializing)]
    pub password_changed_at: Option<DateTime<Utc>>,

    /// sha256 hex digest of the outstanding reset token
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,

    #[serde(skip_serializing)]
    pub password_reset_expires: Option<DateTime<Utc>>,

    /// Soft-delete flag; inactive users are invisible to every query
    #[serde(skip_serializing)]
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub version: u32,
}

/// Creation payload; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub photo: Option<String>,
}

/// Administrative partial update; passwords are changed through the auth flow only
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub role: Option<Role>,
}

impl User {
    /// Creates a new active user with the default role
    pub fn new(name: impl Into<String>, email: &str, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            email: normalize_email(email),
            photo: DEFAULT_PHOTO.to_string(),
            role: Role::User,
            password_hash: password_hash.into(),
            password_changed_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            active: true,
            created_at: Utc::now(),
            version: 0,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// First word of the name, used in greetings
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// True when the password changed at or after the issue time of a token
    /// (unix milliseconds)
    pub fn changed_password_after(&self, issued_at_millis: i64) -> bool {
        match self.password_changed_at {
            Some(changed_at) => issued_at_millis <= changed_at.timestamp_millis(),
            None => false,
        }
    }

    /// Earliest issue time a new session token may carry.
    ///
    /// Tokens must be issued strictly after the last password change.
    pub fn session_issued_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.password_changed_at {
            Some(changed_at) if now <= changed_at => changed_at + Duration::milliseconds(1),
            _ => now,
        }
    }

    /// Replaces the password hash and invalidates any outstanding reset token.
    ///
    /// The change time is kept to whole milliseconds, the precision the
    /// database stores.
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.password_changed_at = Some(Utc::now().trunc_subsecs(3));
        self.clear_password_reset();
    }

    pub fn set_password_reset(&mut self, token_hash: impl Into<String>, expires_at: DateTime<Utc>) {
        self.password_reset_token = Some(token_hash.into());
        self.password_reset_expires = Some(expires_at);
    }

    pub fn clear_password_reset(&mut self) {
        self.password_reset_token = None;
        self.password_reset_expires = None;
    }

    /// Checks a hashed reset token against the stored hash and expiry
    pub fn reset_token_matches(&self, token_hash: &str, now: DateTime<Utc>) -> bool {
        match (&self.password_reset_token, self.password_reset_expires) {
            (Some(stored), Some(expires)) => stored == token_hash && expires > now,
            _ => false,
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Fields shown when a user is embedded in another document
    pub fn public_profile(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "photo": self.photo,
        })
    }

    /// Fields shown for tour guides
    pub fn guide_profile(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "photo": self.photo,
            "role": self.role,
        })
    }

    /// Updates name and email from the account page or `updateMe`
    pub fn update_profile(&mut self, name: Option<String>, email: Option<String>) -> DomainResult<()> {
        if let Some(name) = name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = email {
            self.email = normalize_email(&email);
        }
        self.validate()
    }
}

/// Password rules applied on signup, reset and update
pub fn validate_new_password(password: &str, password_confirm: &str) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    errors.check(password.is_empty(), "Please provide a password");
    errors.check(
        !password.is_empty() && password.chars().count() < MIN_PASSWORD_LENGTH,
        format!("A password must have at least {} characters", MIN_PASSWORD_LENGTH),
    );
    errors.check(password_confirm.is_empty(), "Please confirm your password");
    errors.check(
        !password_confirm.is_empty() && password != password_confirm,
        "Passwords are not the same!",
    );
    errors.into_result()
}

impl Entity for User {
    type Input = NewUser;
    type Patch = UserPatch;

    fn schema() -> &'static Schema {
        &USER_SCHEMA
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_input(input: NewUser) -> DomainResult<Self> {
        let mut user = User::new(input.name, &input.email, input.password_hash).with_role(input.role);
        if let Some(photo) = input.photo {
            user.photo = photo;
        }
        user.validate()?;
        Ok(user)
    }

    fn apply_patch(&mut self, patch: UserPatch) -> DomainResult<()> {
        if let Some(photo) = patch.photo {
            self.photo = photo;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        self.update_profile(patch.name, patch.email)
    }

    fn validate(&self) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        let name_len = self.name.chars().count();

        errors.check(self.name.is_empty(), "A user must have a name");
        errors.check(
            name_len > 0 && name_len < 3,
            "A user name must have at least 3 characters",
        );
        errors.check(name_len > 40, "A user name must have at most 40 characters");
        errors.check(self.email.is_empty(), "A user must have an email");
        errors.check(
            !self.email.is_empty() && !is_valid_email(&self.email),
            "Please provide a valid email",
        );
        errors.check(self.password_hash.is_empty(), "Please provide a password");
        errors.into_result()
    }

    fn to_document(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("email", self.email.clone())]
    }

    fn is_hidden(&self) -> bool {
        !self.active
    }
}
