use std::fmt;

/// Role letters the register prefixes to account identifiers
/// (`S` student, `G` parent).
const ROLE_PREFIXES: [char; 2] = ['S', 'G'];

/// Login identifier and password for one account.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential {
    identifier: String,
    secret: String,
}

impl Credential {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Identifier as given, role prefix included.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Identifier without its role letter, used in every resource path.
    pub fn account_key(&self) -> &str {
        self.identifier
            .strip_prefix(ROLE_PREFIXES)
            .unwrap_or(&self.identifier)
    }

    /// Two credentials name the same login when key and secret both match.
    pub fn same_login(&self, other: &Credential) -> bool {
        self.account_key() == other.account_key() && self.secret == other.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
