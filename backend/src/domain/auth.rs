//! Authentication primitives: login credentials and account registration.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{DisplayName, EmailAddress, UserValidationError, Username};

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use barter_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada", "password").unwrap();
/// assert_eq!(creds.username(), "ada");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while validating a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// A profile field failed validation.
    Profile(UserValidationError),
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Password and confirmation differ.
    PasswordMismatch,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(err) => err.fmt(f),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordMismatch => write!(f, "passwords do not match"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Profile(value)
    }
}

/// Raw registration inputs as received from an inbound adapter.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationParts<'a> {
    /// Requested login handle.
    pub username: &'a str,
    /// Contact address.
    pub email: &'a str,
    /// Name shown to other users.
    pub display_name: &'a str,
    /// Chosen password.
    pub password: &'a str,
    /// Repeated password.
    pub password_confirmation: &'a str,
}

/// Validated account registration.
///
/// # Examples
/// ```
/// use barter_backend::domain::{Registration, RegistrationParts};
///
/// let registration = Registration::try_from_parts(RegistrationParts {
///     username: "ada",
///     email: "ada@example.com",
///     display_name: "Ada",
///     password: "correct horse",
///     password_confirmation: "correct horse",
/// })
/// .unwrap();
/// assert_eq!(registration.username().as_ref(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    display_name: DisplayName,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration inputs.
    pub fn try_from_parts(
        parts: RegistrationParts<'_>,
    ) -> Result<Self, RegistrationValidationError> {
        let username = Username::new(parts.username)?;
        let email = EmailAddress::new(parts.email)?;
        let display_name = DisplayName::new(parts.display_name)?;

        if parts.password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if parts.password != parts.password_confirmation {
            return Err(RegistrationValidationError::PasswordMismatch);
        }

        Ok(Self {
            username,
            email,
            display_name,
            password: Zeroizing::new(parts.password.to_owned()),
        })
    }

    /// Requested login handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Plain-text password, zeroized on drop.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Encoded password hash in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an encoded hash produced by a credential hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada  ", "secret")]
    #[case("alice", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    fn parts<'a>(password: &'a str, confirmation: &'a str) -> RegistrationParts<'a> {
        RegistrationParts {
            username: "ada",
            email: "ada@example.com",
            display_name: "Ada Lovelace",
            password,
            password_confirmation: confirmation,
        }
    }

    #[rstest]
    #[case("short", "short", RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    #[case("long enough", "long enougH", RegistrationValidationError::PasswordMismatch)]
    fn registration_password_rules(
        #[case] password: &str,
        #[case] confirmation: &str,
        #[case] expected: RegistrationValidationError,
    ) {
        let err = Registration::try_from_parts(parts(password, confirmation))
            .expect_err("invalid registration");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn registration_surfaces_profile_errors() {
        let err = Registration::try_from_parts(RegistrationParts {
            email: "nope",
            ..parts("long enough", "long enough")
        })
        .expect_err("invalid email");
        assert_eq!(
            err,
            RegistrationValidationError::Profile(UserValidationError::InvalidEmail)
        );
    }

    #[rstest]
    fn registration_accepts_valid_parts() {
        let registration = Registration::try_from_parts(parts("long enough", "long enough"))
            .expect("valid registration");
        assert_eq!(registration.username().as_ref(), "ada");
        assert_eq!(registration.password(), "long enough");
    }
}
