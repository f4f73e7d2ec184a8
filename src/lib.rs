// --- Module Structure ---

// Boundary contracts and their implementations (REST backend, token storage, toasts).
pub mod auth;
pub mod notify;
pub mod storage;

// Core: session lifecycle, role-scoped routing and the coordinating app.
pub mod app;
pub mod router;
pub mod session;

pub mod config;
pub mod error;
pub mod models;
pub mod views;

// --- Public Re-exports ---

pub use app::HmsApp;
pub use auth::{AuthApiState, BearerAttachment, HttpAuthApi, MockAuthApi};
pub use config::ClientConfig;
pub use notify::{NotifierState, ToastQueue};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStoreState};

/// ClientState
///
/// The single container for the collaborators the core talks to. The bearer
/// attachment here must be the same one the `api` reads from, otherwise restored
/// and freshly issued tokens would never reach the wire.
#[derive(Clone)]
pub struct ClientState {
    /// Authentication endpoints of the REST backend.
    pub api: AuthApiState,
    /// Durable storage for the bearer token.
    pub tokens: TokenStoreState,
    /// User-visible notification channel.
    pub notifier: NotifierState,
    /// Process-wide outbound authorization default.
    pub bearer: BearerAttachment,
}
