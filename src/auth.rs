// Capability tokens
//
// Authority is proven by holding a credential, never by naming a role.
// Neither capability implements `Clone`: a holder can lend it by reference
// but cannot duplicate it.

use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::market_resolve::Market;

/// Hex SHA-256 of an admin secret; the only form the registry keeps
pub fn admin_digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Authority to resolve any market
pub struct AdminCap {
    secret: String,
    generated: bool,
}

impl AdminCap {
    pub(crate) fn generate() -> Self {
        let secret = format!("adm_{}", Uuid::new_v4().simple());
        Self { secret, generated: true }
    }

    /// Rebuild a credential presented at the API boundary. Holding one proves
    /// nothing until the registry has checked its digest.
    pub fn from_bearer(secret: impl Into<String>) -> Self {
        Self { secret: secret.into(), generated: false }
    }

    /// The bearer secret, to be handed to the operator once
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// True only for a secret minted by this process
    pub fn was_generated(&self) -> bool {
        self.generated
    }

    /// One-time terminal notice carrying a freshly minted secret.
    /// Secrets the operator supplied are never echoed back.
    pub fn issuance_notice(&self) -> Option<String> {
        self.generated.then(|| {
            format!("admin bearer token (shown once, store it now): {}", self.secret)
        })
    }

    pub(crate) fn digest(&self) -> String {
        admin_digest(&self.secret)
    }
}

impl std::fmt::Debug for AdminCap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCap")
            .field("secret", &"<redacted>")
            .field("generated", &self.generated)
            .finish()
    }
}

/// Proof of having created one particular market
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CreatorCap {
    id: Uuid,
    market_id: Uuid,
}

impl CreatorCap {
    pub(crate) fn mint(market_id: Uuid) -> Self {
        Self { id: Uuid::new_v4(), market_id }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn market_id(&self) -> Uuid {
        self.market_id
    }

    pub fn is_for(&self, market: &Market) -> bool {
        self.market_id == market.id
    }
}
