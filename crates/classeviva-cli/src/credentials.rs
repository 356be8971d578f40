use anyhow::{bail, Context, Result};
use keyring::Entry;
use tracing::{debug, warn};

const SERVICE_NAME: &str = "classeviva";

const PASSWORD_ENV_PREFIX: &str = "CLASSEVIVA_PASSWORD_";

/// Where account passwords come from.
pub struct CredentialStore;

impl CredentialStore {
    fn entry(identifier: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, identifier)
            .with_context(|| format!("No keychain entry for {}", identifier))
    }

    /// Save a password to the OS keychain, replacing any previous one.
    pub fn store(identifier: &str, password: &str) -> Result<()> {
        Self::entry(identifier)?
            .set_password(password)
            .with_context(|| format!("Failed to save password for {}", identifier))
    }

    /// Environment first, then keychain, then an interactive prompt. A
    /// prompted password is saved to the keychain for next time.
    pub fn resolve(identifier: &str) -> Result<String> {
        if let Some(password) = std::env::var(password_env_var(identifier))
            .ok()
            .filter(|p| !p.is_empty())
        {
            debug!(account = identifier, "Password from environment");
            return Ok(password);
        }

        let stored = Self::entry(identifier)
            .and_then(|entry| entry.get_password().map_err(anyhow::Error::from));
        match stored {
            Ok(password) => {
                debug!(account = identifier, "Password from keychain");
                return Ok(password);
            }
            Err(e) => debug!(account = identifier, error = %e, "No stored password"),
        }

        let password = Self::prompt(identifier)?;
        if let Err(e) = Self::store(identifier, &password) {
            warn!(account = identifier, error = %e, "Could not save password");
        }
        Ok(password)
    }

    pub fn prompt(identifier: &str) -> Result<String> {
        let password = rpassword::prompt_password(format!("Password for {}: ", identifier))
            .context("Failed to read password")?;
        if password.is_empty() {
            bail!("Empty password for {}", identifier);
        }
        Ok(password)
    }
}

/// `CLASSEVIVA_PASSWORD_<IDENTIFIER>`, identifier upper-cased.
pub fn password_env_var(identifier: &str) -> String {
    format!("{}{}", PASSWORD_ENV_PREFIX, identifier.trim().to_ascii_uppercase())
}
