use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use uuid::Uuid;

use crate::{
    config::ClientConfig,
    error::AuthError,
    models::{Identity, LoginRequest, LoginResponse, RegisterRequest},
};

// --- Outbound Authorization ---

/// BearerAttachment
///
/// The process-wide "attach this bearer token to every outgoing request" default.
/// Every `AuthApi` implementation reads it per request; only the Session Store
/// (inside this crate) may set or clear it.
#[derive(Clone, Default)]
pub struct BearerAttachment {
    token: Arc<RwLock<Option<String>>>,
}

impl BearerAttachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
    }

    pub(crate) fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn is_attached(&self) -> bool {
        self.token.read().is_some()
    }

    /// The `Authorization` header value, when a token is attached.
    pub fn header_value(&self) -> Option<String> {
        self.token
            .read()
            .as_ref()
            .map(|token| format!("Bearer {token}"))
    }
}

// 1. AuthApi Contract
/// AuthApi
///
/// The authentication endpoints of the REST backend. The Session Store only
/// depends on this trait, so the HTTP client can be swapped for the in-memory
/// `MockAuthApi` in tests.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `GET /auth/me`: resolves the currently attached bearer token to an Identity.
    async fn me(&self) -> Result<Identity, AuthError>;

    /// `POST /auth/login`: exchanges credentials for an identity and a token.
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AuthError>;

    /// `POST /auth/register`: creates an account. Does not log it in.
    async fn register(&self, request: &RegisterRequest) -> Result<Identity, AuthError>;
}

/// AuthApiState
///
/// The concrete type used to share the authentication client across the client state.
pub type AuthApiState = Arc<dyn AuthApi>;

// 2. The Real Implementation (reqwest)
/// HttpAuthApi
///
/// JSON-over-HTTP client rooted at `<backend>/api`. There is no explicit timeout:
/// failures surface through the transport's own errors.
#[derive(Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    api_base: String,
    bearer: BearerAttachment,
}

impl HttpAuthApi {
    pub fn new(config: &ClientConfig, bearer: BearerAttachment) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("medcare-hms/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base(),
            bearer,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Applies the outbound authorization default to a request.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer.header_value() {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    /// read_json
    ///
    /// Maps a response to either the decoded body or an `AuthError::Rejected`
    /// carrying the backend's `detail` string (when the error body has one).
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AuthError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AuthError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn me(&self) -> Result<Identity, AuthError> {
        let response = self
            .authorized(self.client.get(self.url("/auth/me")))
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let response = self
            .authorized(self.client.post(self.url("/auth/login")))
            .json(credentials)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Identity, AuthError> {
        let response = self
            .authorized(self.client.post(self.url("/auth/register")))
            .json(request)
            .send()
            .await?;
        Self::read_json(response).await
    }
}

// 3. The Mock Implementation (For Tests)
struct MockAccount {
    password: String,
    identity: Identity,
}

/// MockAuthApi
///
/// In-memory backend used by the tests and the offline demo. It keeps accounts
/// keyed by email, hands out opaque tokens on login and resolves `me()` from the
/// shared `BearerAttachment`, exactly like the HTTP client would.
pub struct MockAuthApi {
    bearer: BearerAttachment,
    accounts: Mutex<HashMap<String, MockAccount>>,
    sessions: Mutex<HashMap<String, Identity>>,
    me_calls: AtomicUsize,
    /// When true, every call fails as if the backend could not be reached.
    pub unreachable: bool,
}

impl MockAuthApi {
    pub fn new(bearer: BearerAttachment) -> Self {
        Self {
            bearer,
            accounts: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
            me_calls: AtomicUsize::new(0),
            unreachable: false,
        }
    }

    pub fn new_unreachable(bearer: BearerAttachment) -> Self {
        Self {
            unreachable: true,
            ..Self::new(bearer)
        }
    }

    /// Seeds an account that `login()` will accept.
    pub fn with_account(self, password: &str, identity: Identity) -> Self {
        self.accounts.lock().insert(
            identity.email.clone(),
            MockAccount {
                password: password.to_string(),
                identity,
            },
        );
        self
    }

    /// Issues a token that `me()` resolves to `identity`, as if it had been
    /// obtained by an earlier login.
    pub fn issue_token(&self, identity: &Identity) -> String {
        let token = format!("mock-token-{}", Uuid::new_v4());
        self.sessions.lock().insert(token.clone(), identity.clone());
        token
    }

    /// Invalidates a previously issued token (expiry, server-side logout).
    pub fn revoke_token(&self, token: &str) {
        self.sessions.lock().remove(token);
    }

    /// How many times `me()` has been called.
    pub fn me_calls(&self) -> usize {
        self.me_calls.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), AuthError> {
        if self.unreachable {
            return Err(AuthError::Transport(
                "Mock Auth Error: backend unreachable".to_string(),
            ));
        }
        Ok(())
    }

    fn unauthorized(detail: &str) -> AuthError {
        AuthError::Rejected {
            status: 401,
            detail: Some(detail.to_string()),
        }
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn me(&self) -> Result<Identity, AuthError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;

        let header = self
            .bearer
            .header_value()
            .ok_or_else(|| Self::unauthorized("Not authenticated"))?;
        let token = header.strip_prefix("Bearer ").unwrap_or_default();

        self.sessions
            .lock()
            .get(token)
            .cloned()
            .ok_or_else(|| Self::unauthorized("Could not validate credentials"))
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AuthError> {
        self.check_reachable()?;

        let identity = {
            let accounts = self.accounts.lock();
            match accounts.get(&credentials.email) {
                Some(account) if account.password == credentials.password => {
                    account.identity.clone()
                }
                _ => return Err(Self::unauthorized("Incorrect email or password")),
            }
        };

        let access_token = self.issue_token(&identity);
        Ok(LoginResponse {
            user: identity,
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Identity, AuthError> {
        self.check_reachable()?;

        let mut accounts = self.accounts.lock();
        if accounts.contains_key(&request.email) {
            return Err(AuthError::Rejected {
                status: 400,
                detail: Some("Email already registered".to_string()),
            });
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            email: request.email.clone(),
            full_name: request.full_name.clone(),
            role: request.role,
            phone: request.phone.clone(),
            created_at: Some(chrono::Utc::now()),
        };
        accounts.insert(
            request.email.clone(),
            MockAccount {
                password: request.password.clone(),
                identity: identity.clone(),
            },
        );
        Ok(identity)
    }
}
