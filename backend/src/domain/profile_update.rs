//! Allowlisted profile update.
//!
//! Only the fields enumerated by [`ProfileField`] can ever be written through
//! the profile update path. Identifier, follower count, and password hash have
//! no representation here, so no caller-supplied key can reach them.

use std::fmt;

use super::{Email, PersonName, ProfileInfo, Username};

/// Profile columns a user may change about themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FirstName,
    LastName,
    Email,
    Username,
}

impl ProfileField {
    /// Every writable field, in wire order.
    pub const ALL: [Self; 4] = [Self::FirstName, Self::LastName, Self::Email, Self::Username];

    /// JSON key used by clients for this field.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Username => "username",
        }
    }

    /// Resolve a client key against the allowlist.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::ProfileField;
    ///
    /// assert_eq!(ProfileField::from_wire("email"), Some(ProfileField::Email));
    /// assert_eq!(ProfileField::from_wire("password"), None);
    /// ```
    pub fn from_wire(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.wire_name() == key)
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A validated value for one writable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileFieldValue {
    FirstName(PersonName),
    LastName(PersonName),
    Email(Email),
    Username(Username),
}

impl ProfileFieldValue {
    /// Field this value targets.
    pub fn field(&self) -> ProfileField {
        match self {
            Self::FirstName(_) => ProfileField::FirstName,
            Self::LastName(_) => ProfileField::LastName,
            Self::Email(_) => ProfileField::Email,
            Self::Username(_) => ProfileField::Username,
        }
    }
}

/// Reasons a set of field values cannot form an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProfileUpdateError {
    /// No writable field was supplied.
    #[error("at least one of firstName, lastName, email, username is required")]
    Empty,
    /// The same field was supplied twice.
    #[error("{0} supplied more than once")]
    Duplicate(ProfileField),
}

/// Non-empty set of profile field assignments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileUpdate {
    first_name: Option<PersonName>,
    last_name: Option<PersonName>,
    email: Option<Email>,
    username: Option<Username>,
}

impl ProfileUpdate {
    /// Build an update from individually validated values.
    pub fn from_values(
        values: impl IntoIterator<Item = ProfileFieldValue>,
    ) -> Result<Self, ProfileUpdateError> {
        let mut update = Self::default();
        for value in values {
            let field = value.field();
            let duplicate = match value {
                ProfileFieldValue::FirstName(name) => update.first_name.replace(name).is_some(),
                ProfileFieldValue::LastName(name) => update.last_name.replace(name).is_some(),
                ProfileFieldValue::Email(email) => update.email.replace(email).is_some(),
                ProfileFieldValue::Username(username) => {
                    update.username.replace(username).is_some()
                }
            };
            if duplicate {
                return Err(ProfileUpdateError::Duplicate(field));
            }
        }
        if update.fields().is_empty() {
            return Err(ProfileUpdateError::Empty);
        }
        Ok(update)
    }

    pub fn first_name(&self) -> Option<&PersonName> {
        self.first_name.as_ref()
    }

    pub fn last_name(&self) -> Option<&PersonName> {
        self.last_name.as_ref()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn username(&self) -> Option<&Username> {
        self.username.as_ref()
    }

    /// Fields assigned by this update.
    pub fn fields(&self) -> Vec<ProfileField> {
        let mut fields = Vec::with_capacity(ProfileField::ALL.len());
        if self.first_name.is_some() {
            fields.push(ProfileField::FirstName);
        }
        if self.last_name.is_some() {
            fields.push(ProfileField::LastName);
        }
        if self.email.is_some() {
            fields.push(ProfileField::Email);
        }
        if self.username.is_some() {
            fields.push(ProfileField::Username);
        }
        fields
    }

    /// Apply the assignments to a profile row. Applying twice yields the same
    /// row as applying once.
    pub fn apply_to(&self, info: &mut ProfileInfo) {
        if let Some(name) = &self.first_name {
            info.first_name = name.as_ref().to_owned();
        }
        if let Some(name) = &self.last_name {
            info.last_name = name.as_ref().to_owned();
        }
        if let Some(email) = &self.email {
            info.email = email.as_ref().to_owned();
        }
        if let Some(username) = &self.username {
            info.username = username.as_ref().to_owned();
        }
    }
}
