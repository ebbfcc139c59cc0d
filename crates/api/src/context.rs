use househunter_auth::Identity;

/// Authenticated identity for a request, inserted by the access guard.
///
/// Present on every request that passed the guard; absent everywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityContext {
    identity: Identity,
}

impl IdentityContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.email()
    }
}
