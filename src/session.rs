use tracing::{debug, info, warn};

use crate::{
    ClientState,
    auth::{AuthApiState, BearerAttachment},
    error::AuthError,
    models::{Identity, LoginRequest, RegisterRequest, Role},
    notify::NotifierState,
    storage::TokenStoreState,
};

/// Session
///
/// A validated bearer token paired with the identity it resolved to. The two only
/// ever exist together: there is no way to hold an identity without its token.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: String,
    identity: Identity,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

/// SessionStatus
///
/// `Checking` is the only initial state and lasts until `restore()` resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Checking,
    Unauthenticated,
    Authenticated(Session),
}

/// SessionStore
///
/// The single source of truth for who, if anyone, is logged in. It is also the
/// only writer of the durable token entry and of the outbound bearer attachment,
/// and keeps both consistent with the in-memory session.
pub struct SessionStore {
    status: SessionStatus,
    api: AuthApiState,
    tokens: TokenStoreState,
    bearer: BearerAttachment,
    notifier: NotifierState,
}

impl SessionStore {
    pub fn new(state: &ClientState) -> Self {
        Self {
            status: SessionStatus::Checking,
            api: state.api.clone(),
            tokens: state.tokens.clone(),
            bearer: state.bearer.clone(),
            notifier: state.notifier.clone(),
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.status {
            SessionStatus::Authenticated(session) => Some(session.identity()),
            _ => None,
        }
    }

    pub fn is_checking(&self) -> bool {
        matches!(self.status, SessionStatus::Checking)
    }

    /// restore
    ///
    /// Startup path. Reads the persisted token and, if there is one, resolves it
    /// through `GET /auth/me`. Every failure (explicit 401, transport error,
    /// unreadable store) ends in `Unauthenticated` with the token deleted and the
    /// bearer detached. No toast is emitted on this path.
    pub async fn restore(&mut self) {
        let stored = match self.tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Persisted token unreadable; discarding it");
                self.invalidate().await;
                return;
            }
        };

        let Some(token) = stored else {
            debug!("No persisted session found");
            self.bearer.clear();
            self.status = SessionStatus::Unauthenticated;
            return;
        };

        if token.trim().is_empty() {
            debug!("Persisted token is empty; discarding it");
            self.invalidate().await;
            return;
        }

        self.bearer.set(&token);

        match self.api.me().await {
            Ok(identity) => {
                info!(user_id = %identity.id, role = %identity.role, "Session restored");
                self.status = SessionStatus::Authenticated(Session { token, identity });
            }
            Err(e) => {
                // Both cases are handled identically; only the log level differs.
                if e.is_unauthorized() {
                    debug!(error = %e, "Persisted token rejected by backend");
                } else {
                    warn!(error = %e, "Could not verify persisted token");
                }
                self.invalidate().await;
            }
        }
    }

    /// login
    ///
    /// Unconditionally installs `identity` and `token` as the current session,
    /// persists the token and attaches it to every subsequent request.
    pub async fn login(&mut self, identity: Identity, token: String) {
        if let Err(e) = self.tokens.save(&token).await {
            // The session still works for this process; it just won't survive a restart.
            warn!(error = %e, "Failed to persist token");
        }
        self.bearer.set(&token);

        info!(user_id = %identity.id, role = %identity.role, "Logged in");
        self.status = SessionStatus::Authenticated(Session { token, identity });
        self.notifier.success("Login successful!");
    }

    /// logout
    ///
    /// Drops the session, deletes the persisted token and detaches the bearer.
    /// Resetting the active section is the caller's half of the transition.
    pub async fn logout(&mut self) {
        if let Some(identity) = self.identity() {
            info!(user_id = %identity.id, "Logging out");
        }
        self.invalidate().await;
        self.notifier.success("Logged out successfully!");
    }

    /// sign_in
    ///
    /// Exchanges credentials via `POST /auth/login` and feeds the result into
    /// `login()`. A rejection is shown to the user with the backend's message
    /// when one is provided; the session is left untouched.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.api.login(&credentials).await {
            Ok(response) => {
                self.login(response.user, response.access_token).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Login rejected");
                self.notifier.error(e.detail().unwrap_or("Login failed"));
                Err(e)
            }
        }
    }

    /// demo_sign_in
    ///
    /// Signs in with the well-known demo account for `role`.
    pub async fn demo_sign_in(&mut self, role: Role) -> Result<(), AuthError> {
        let credentials = demo_credentials(role);

        match self.api.login(&credentials).await {
            Ok(response) => {
                self.login(response.user, response.access_token).await;
                self.notifier.success(&format!("Logged in as demo {role}"));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, %role, "Demo login failed");
                self.notifier.error(&format!(
                    "Demo {role} account not found. Please create one first."
                ));
                Err(e)
            }
        }
    }

    /// register
    ///
    /// Creates an account via `POST /auth/register`. Registration never logs the
    /// new account in; the user signs in afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Identity, AuthError> {
        match self.api.register(request).await {
            Ok(identity) => {
                info!(user_id = %identity.id, role = %identity.role, "Account registered");
                self.notifier.success("Registration successful! Please login.");
                Ok(identity)
            }
            Err(e) => {
                warn!(error = %e, "Registration rejected");
                self.notifier
                    .error(e.detail().unwrap_or("Registration failed"));
                Err(e)
            }
        }
    }

    /// Forgets the session, the durable token and the bearer attachment.
    async fn invalidate(&mut self) {
        if let Err(e) = self.tokens.remove().await {
            warn!(error = %e, "Failed to delete persisted token");
        }
        self.bearer.clear();
        self.status = SessionStatus::Unauthenticated;
    }
}

/// demo_credentials
///
/// The demo accounts seeded on development backends, one per role.
pub fn demo_credentials(role: Role) -> LoginRequest {
    let (email, password) = match role {
        Role::Admin => ("admin@hospital.com", "admin123"),
        Role::Doctor => ("doctor@hospital.com", "doctor123"),
        Role::Nurse => ("nurse@hospital.com", "nurse123"),
        Role::Patient => ("patient@hospital.com", "patient123"),
    };
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}
