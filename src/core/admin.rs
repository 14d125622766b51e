// BizDirectory - core/admin.rs
//
// Admin visibility gate. Controls whether update/delete affordances are
// rendered. This is a client-local convenience toggle, not access control.

use crate::util::constants::DEFAULT_ADMIN_ACCOUNTS;
use serde::{Deserialize, Serialize};

/// One entry in the static admin registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub name: String,
    pub code: String,
}

impl AdminAccount {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Registered identities and their codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRegistry {
    pub accounts: Vec<AdminAccount>,
}

impl Default for AdminRegistry {
    fn default() -> Self {
        Self {
            accounts: DEFAULT_ADMIN_ACCOUNTS
                .iter()
                .map(|(name, code)| AdminAccount::new(*name, *code))
                .collect(),
        }
    }
}

impl AdminRegistry {
    pub fn new(accounts: Vec<AdminAccount>) -> Self {
        if accounts.is_empty() {
            Self::default()
        } else {
            Self { accounts }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(|a| a.name.as_str())
    }

    /// True when `identity` is registered and `code` is its code.
    pub fn verify(&self, identity: &str, code: &str) -> bool {
        self.accounts
            .iter()
            .any(|a| a.name == identity && a.code == code)
    }
}

/// Persisted gate toggle plus the entered identity and code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    #[serde(rename = "adminMode", default)]
    pub enabled: bool,
    #[serde(rename = "selectedAdmin", default)]
    pub identity: String,
    #[serde(rename = "secretCode", default)]
    pub code: String,
}

/// Gate state as evaluated right now. Verification is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminGateState {
    Disabled,
    EnabledUnverified,
    EnabledVerified,
}

impl AdminSession {
    /// Toggle the gate. Either direction clears identity and code.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.identity.clear();
        self.code.clear();
    }

    pub fn is_verified(&self, registry: &AdminRegistry) -> bool {
        registry.verify(&self.identity, &self.code)
    }

    pub fn gate_state(&self, registry: &AdminRegistry) -> AdminGateState {
        if !self.enabled {
            AdminGateState::Disabled
        } else if self.is_verified(registry) {
            AdminGateState::EnabledVerified
        } else {
            AdminGateState::EnabledUnverified
        }
    }

    /// Whether update/delete affordances are rendered and may be invoked.
    ///
    /// Requires the toggle plus a registered identity and matching code,
    /// re-evaluated on every call.
    pub fn allows_mutation(&self, registry: &AdminRegistry) -> bool {
        self.gate_state(registry) == AdminGateState::EnabledVerified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = AdminRegistry::default();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Admin 1", "Admin 2"]);
        assert!(registry.verify("Admin 1", "admin1code"));
        assert!(!registry.verify("Admin 1", "admin2code"));
        assert!(!registry.verify("Nobody", "admin1code"));
    }

    #[test]
    fn test_empty_registry_falls_back_to_default() {
        assert_eq!(AdminRegistry::new(Vec::new()), AdminRegistry::default());
        let custom = AdminRegistry::new(vec![AdminAccount::new("Ops", "s3cret")]);
        assert!(custom.verify("Ops", "s3cret"));
        assert!(!custom.verify("Admin 1", "admin1code"));
    }

    #[test]
    fn test_enabling_clears_identity_and_code() {
        let mut session = AdminSession {
            enabled: false,
            identity: "Admin 1".to_string(),
            code: "admin1code".to_string(),
        };
        session.set_enabled(true);
        assert!(session.enabled);
        assert!(session.identity.is_empty());
        assert!(session.code.is_empty());
        assert_eq!(
            session.gate_state(&AdminRegistry::default()),
            AdminGateState::EnabledUnverified
        );
    }

    #[test]
    fn test_verification_is_evaluated_on_demand() {
        let registry = AdminRegistry::default();
        let mut session = AdminSession::default();
        session.set_enabled(true);
        session.identity = "Admin 2".to_string();
        session.code = "admin2code".to_string();
        assert_eq!(session.gate_state(&registry), AdminGateState::EnabledVerified);
        session.code.push('x');
        assert_eq!(session.gate_state(&registry), AdminGateState::EnabledUnverified);
    }

    #[test]
    fn test_disabled_gate_blocks_mutation_regardless_of_credentials() {
        let session = AdminSession {
            enabled: false,
            identity: "Admin 1".to_string(),
            code: "admin1code".to_string(),
        };
        assert!(!session.allows_mutation(&AdminRegistry::default()));
        assert_eq!(session.gate_state(&AdminRegistry::default()), AdminGateState::Disabled);
    }

    #[test]
    fn test_enabled_gate_needs_matching_credentials() {
        let registry = AdminRegistry::default();
        let mut session = AdminSession::default();
        session.set_enabled(true);
        assert!(!session.allows_mutation(&registry));

        session.identity = "Admin 1".to_string();
        session.code = "WRONG".to_string();
        assert!(!session.allows_mutation(&registry));

        session.code = "admin1code".to_string();
        assert!(session.allows_mutation(&registry));

        // Another account's code does not open this identity.
        session.code = "admin2code".to_string();
        assert!(!session.allows_mutation(&registry));
    }

    #[test]
    fn test_session_keys() {
        let session = AdminSession {
            enabled: true,
            identity: "Admin 1".to_string(),
            code: "c".to_string(),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["adminMode"], true);
        assert_eq!(json["selectedAdmin"], "Admin 1");
        assert_eq!(json["secretCode"], "c");
    }
}
