//! Login credentials type.

use std::fmt;

/// How the cluster should authenticate the supplied credentials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMethod {
    /// Local cluster user database.
    #[default]
    Local,
    /// OpenID Connect single sign-on.
    Oidc,
}

/// Login credentials for cluster authentication.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental
/// logging.
///
/// # Example
///
/// ```
/// use hycore::Credentials;
///
/// let creds = Credentials::new("admin", "hunter2");
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    auth_method: AuthMethod,
}

impl Credentials {
    /// Create new credentials for the local user database.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            auth_method: AuthMethod::Local,
        }
    }

    /// Select the authentication method for these credentials.
    pub fn with_auth_method(mut self, auth_method: AuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing the login request.
    /// Never log or display this value.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Returns the authentication method.
    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    /// Whether the login request should set the OIDC flag.
    pub(crate) fn use_oidc(&self) -> bool {
        self.auth_method == AuthMethod::Oidc
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("auth_method", &self.auth_method)
            .finish()
    }
}
