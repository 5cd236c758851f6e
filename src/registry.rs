// Creator registry
//
// One market per creator identity. The registry also anchors admin
// authority: it keeps the digest of the admin secret issued at initialization.

use serde::{Deserialize, Serialize};

use crate::auth::{admin_digest, AdminCap};
use crate::errors::{EscrowError, EscrowResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    /// Creators in registration order
    addresses: Vec<String>,
    admin_digest: String,
}

impl Registry {
    /// Create the registry and the single admin credential that goes with it
    pub fn initialize() -> (Self, AdminCap) {
        let admin = AdminCap::generate();
        let registry = Self { addresses: Vec::new(), admin_digest: admin.digest() };
        tracing::info!("registry initialized with a fresh admin credential");
        (registry, admin)
    }

    /// Like `initialize`, but with an operator-supplied admin secret
    pub fn initialize_with_secret(secret: &str) -> (Self, AdminCap) {
        let registry = Self { addresses: Vec::new(), admin_digest: admin_digest(secret) };
        tracing::info!("registry initialized with configured admin credential");
        (registry, AdminCap::from_bearer(secret))
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.addresses.iter().any(|a| a == identity)
    }

    pub fn register_creator(&mut self, identity: &str) -> EscrowResult<()> {
        if self.contains(identity) {
            return Err(EscrowError::DuplicateCreator(identity.to_string()));
        }
        self.addresses.push(identity.to_string());
        Ok(())
    }

    pub fn verify_admin(&self, cap: &AdminCap) -> EscrowResult<()> {
        if cap.digest() != self.admin_digest {
            return Err(EscrowError::NotAdmin);
        }
        Ok(())
    }

    pub fn creators(&self) -> &[String] {
        &self.addresses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_once() {
        let (mut registry, _admin) = Registry::initialize();
        registry.register_creator("0xA").unwrap();
        registry.register_creator("0xB").unwrap();

        assert_eq!(
            registry.register_creator("0xA"),
            Err(EscrowError::DuplicateCreator("0xA".into()))
        );
        assert_eq!(registry.creators(), ["0xA".to_string(), "0xB".to_string()]);
    }

    #[test]
    fn test_verify_admin() {
        let (registry, admin) = Registry::initialize();
        assert!(registry.verify_admin(&admin).is_ok());
        assert_eq!(
            registry.verify_admin(&AdminCap::from_bearer("guess")),
            Err(EscrowError::NotAdmin)
        );

        let bearer = AdminCap::from_bearer(admin.secret());
        assert!(registry.verify_admin(&bearer).is_ok());
    }

    #[test]
    fn test_configured_secret_is_never_announced() {
        let (registry, admin) = Registry::initialize_with_secret("adm_from_env");
        assert!(registry.verify_admin(&admin).is_ok());
        assert!(!admin.was_generated());
        assert!(admin.issuance_notice().is_none());

        let (_, minted) = Registry::initialize();
        assert!(minted.issuance_notice().is_some());
    }

    #[test]
    fn test_admin_of_another_registry_rejected() {
        let (registry, _) = Registry::initialize();
        let (_, other_admin) = Registry::initialize();
        assert_eq!(registry.verify_admin(&other_admin), Err(EscrowError::NotAdmin));
    }

    #[test]
    fn test_configured_secret() {
        let (registry, admin) = Registry::initialize_with_secret("operator-secret");
        assert_eq!(admin.secret(), "operator-secret");
        assert!(registry.verify_admin(&AdminCap::from_bearer("operator-secret")).is_ok());
    }
}
