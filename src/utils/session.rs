use log::{info, warn};
use std::sync::Arc;

use crate::db::KeyValueStore;
use crate::errors::AppError;

pub const SESSION_KEY: &str = "isAuthenticated";
pub const MOCK_EMAIL: &str = "admin@admin.com";
pub const MOCK_PASSWORD: &str = "admin";

const LOGIN_FAILED: &str = "Invalid email or password. Try admin@admin.com / admin";

/// Decides whether a credential pair may open a session.
pub trait CredentialCheck: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> bool;
}

/// Accepts a single hardcoded pair. Not a security boundary.
#[derive(Debug, Clone)]
pub struct MockCredentials {
    email: String,
    password: String,
}

impl MockCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Default for MockCredentials {
    fn default() -> Self {
        Self::new(MOCK_EMAIL, MOCK_PASSWORD)
    }
}

impl CredentialCheck for MockCredentials {
    fn verify(&self, email: &str, password: &str) -> bool {
        email == self.email && password == self.password
    }
}

/// Process-wide session flag persisted next to the employee data.
pub struct SessionGate {
    credentials: Box<dyn CredentialCheck>,
    kv: Arc<dyn KeyValueStore>,
}

impl SessionGate {
    pub fn new(credentials: Box<dyn CredentialCheck>, kv: Arc<dyn KeyValueStore>) -> Self {
        Self { credentials, kv }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<(), AppError> {
        if !self.credentials.verify(email, password) {
            warn!("rejected login attempt");
            return Err(AppError::Unauthorized(LOGIN_FAILED.to_string()));
        }
        self.kv.set_item(SESSION_KEY, "true")?;
        info!("session opened");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.kv.remove_item(SESSION_KEY)?;
        info!("session closed");
        Ok(())
    }

    /// A storage failure reads as "not logged in".
    pub fn is_authenticated(&self) -> bool {
        match self.kv.get_item(SESSION_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(err) => {
                warn!("failed to read session flag: {}", err);
                false
            }
        }
    }

    pub fn require(&self) -> Result<(), AppError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::Unauthorized("Login required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryKeyValueStore;

    fn gate() -> (Arc<dyn KeyValueStore>, SessionGate) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let gate = SessionGate::new(Box::new(MockCredentials::default()), kv.clone());
        (kv, gate)
    }

    #[test]
    fn starts_unauthenticated() {
        let (_, gate) = gate();
        assert!(!gate.is_authenticated());
        assert!(matches!(gate.require(), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn login_with_mock_pair_sets_flag() {
        let (kv, gate) = gate();
        gate.login("admin@admin.com", "admin").unwrap();

        assert!(gate.is_authenticated());
        assert_eq!(kv.get_item(SESSION_KEY).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn wrong_credentials_are_rejected_with_hint() {
        let (_, gate) = gate();
        match gate.login("admin@admin.com", "wrong") {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("admin@admin.com / admin")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn logout_clears_flag() {
        let (kv, gate) = gate();
        gate.login(MOCK_EMAIL, MOCK_PASSWORD).unwrap();
        gate.logout().unwrap();

        assert!(!gate.is_authenticated());
        assert_eq!(kv.get_item(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn only_literal_true_counts() {
        let (kv, gate) = gate();
        kv.set_item(SESSION_KEY, "yes").unwrap();
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn credential_check_can_be_swapped() {
        struct AllowAll;
        impl CredentialCheck for AllowAll {
            fn verify(&self, _: &str, _: &str) -> bool {
                true
            }
        }

        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let gate = SessionGate::new(Box::new(AllowAll), kv);
        gate.login("anyone@example.com", "x").unwrap();
        assert!(gate.is_authenticated());
    }
}
