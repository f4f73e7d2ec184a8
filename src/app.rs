use crate::{
    ClientState,
    error::AuthError,
    models::{Identity, RegisterRequest, Role},
    router::{self, NavigationState, Screen, Section},
    session::{SessionStatus, SessionStore},
};

/// HmsApp
///
/// Owns the session and the navigation state and drives every transition of the
/// `Checking / Unauthenticated / Authenticated(section)` machine. Each transition
/// takes `&mut self`, so transitions can never overlap.
pub struct HmsApp {
    session: SessionStore,
    navigation: NavigationState,
}

impl HmsApp {
    pub fn new(state: &ClientState) -> Self {
        Self {
            session: SessionStore::new(state),
            navigation: NavigationState::new(),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    /// boot
    ///
    /// `Checking → Authenticated(dashboard)` or `Checking → Unauthenticated`.
    pub async fn boot(&mut self) {
        self.session.restore().await;
        self.navigation.reset();
    }

    /// `Unauthenticated → Authenticated(dashboard)` from an external login exchange.
    pub async fn login(&mut self, identity: Identity, token: String) {
        self.session.login(identity, token).await;
        self.navigation.reset();
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        self.session.sign_in(email, password).await?;
        self.navigation.reset();
        Ok(())
    }

    pub async fn demo_sign_in(&mut self, role: Role) -> Result<(), AuthError> {
        self.session.demo_sign_in(role).await?;
        self.navigation.reset();
        Ok(())
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Identity, AuthError> {
        self.session.register(request).await
    }

    /// `Authenticated(*) → Unauthenticated`.
    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.navigation.reset();
    }

    /// `Authenticated(s) → Authenticated(s')`. Accepted as-is; see `router::render`.
    pub fn set_active_section(&mut self, section: Section) {
        self.navigation.set_active_section(section);
    }

    pub fn status(&self) -> &SessionStatus {
        self.session.status()
    }

    pub fn screen(&self) -> Screen {
        router::render(self.session.status(), &self.navigation)
    }
}
