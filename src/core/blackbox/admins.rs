//! Administrator management.

use std::path::PathBuf;

use tracing::info;

use super::Blackbox;
use crate::core::registry::AdminRegistry;
use crate::core::types::RecipientId;
use crate::error::Result;

impl Blackbox {
    /// Listed administrators in registry order.
    pub fn list_admins(&self) -> Result<Vec<RecipientId>> {
        Ok(self.admins()?.list().to_vec())
    }

    /// Add an administrator and commit the change.
    ///
    /// Copies the identity's public key from the local keychain into the
    /// keyring directory, appends it to the admin registry and commits both.
    /// Existing envelopes are not re-encrypted; run
    /// [`reencrypt_all`](Self::reencrypt_all) for that.
    ///
    /// Returns false, changing nothing, if the identity is already listed.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::SecretKeyLeakDetected` if the keyring holds
    /// private material, before or after the key is published.
    pub fn add_admin(&self, identity: &str) -> Result<bool> {
        self.keyring.assert_no_private_key_leak()?;

        let admins_file = self.keyring.admins_file();
        let mut admins = AdminRegistry::load_or_default(self.repo.path(&admins_file))?;
        if !admins.insert(identity)? {
            info!(identity, "already an admin");
            return Ok(false);
        }
        let identity = identity.trim();

        self.cipher.publish_key(identity, &self.keyring)?;
        self.keyring.assert_no_private_key_leak()?;
        admins.save()?;

        let mut paths: Vec<PathBuf> = vec![admins_file];
        paths.extend(self.keyring.public_files());
        let vcs = self.repo.vcs();
        vcs.add(&paths)?;
        vcs.commit(&format!("NEW ADMIN: {}", identity), &paths)?;
        info!(identity, "admin added");
        Ok(true)
    }

    /// Remove an administrator and commit the change.
    ///
    /// Key material is left alone and envelopes still open for the removed
    /// identity until they are re-encrypted.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::SecretKeyLeakDetected` if the keyring holds
    /// private material, `RegistryError::Missing` if there is no admin
    /// registry and `RegistryError::UnknownAdmin` if the identity is not
    /// listed.
    pub fn remove_admin(&self, identity: &str) -> Result<()> {
        self.keyring.assert_no_private_key_leak()?;
        let mut admins = self.admins()?;
        admins.remove(identity)?;
        admins.save()?;

        let paths = vec![self.keyring.admins_file()];
        let vcs = self.repo.vcs();
        vcs.add(&paths)?;
        vcs.commit(&format!("REMOVED ADMIN: {}", identity), &paths)?;
        info!(identity, "admin removed");
        Ok(())
    }
}
