//! # Session Manager
//!
//! The one piece of state shared across the whole admin: who is logged in.
//!
//! [`SessionManager`] is an explicit object with a lifecycle
//! (`init` → `login` / `switch_role` / `logout` → `dispose`) that callers
//! hold by reference or `Arc`. Every write goes through
//! [`reduce`], a pure function from `(session, action)` to the next session,
//! so the set of possible transitions is listed in exactly one `match`.
//! Reads are unrestricted: anyone may `session()` or `subscribe()`.
//!
//! ```text
//! anonymous ──Loading──▶ checking ──AuthChecked(Some)──▶ authenticated
//!                            └──AuthChecked(None) / AuthCheckFailed──▶ anonymous
//! ```
//!
//! `login` and `switch_role` never return `Err`: failures are reported in
//! the returned [`AuthOutcome`] and in the session's `error`.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Login form input.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Server endpoints backing the session.
#[async_trait]
pub trait AuthApi<U>: Send + Sync {
    /// The user bound to the current session cookie. 401 means "nobody".
    async fn current_user(&self) -> Result<U, ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<U, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    /// Switches the active role of the logged-in user and returns the updated user.
    async fn switch_role(&self, role: &str) -> Result<U, ApiError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession<U> {
    pub user: Option<U>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
    /// Set once the first session check has settled, successfully or not.
    pub initialized: bool,
}

impl<U> Default for AuthSession<U> {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            loading: false,
            error: None,
            initialized: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction<U> {
    Loading,
    AuthChecked(Option<U>),
    AuthCheckFailed(String),
    LoginSuccess(U),
    LoginFailure(String),
    RoleSwitched(U),
    RoleSwitchFailed(String),
    Logout,
    ClearError,
    Reset,
}

/// Computes the next session. Pure; the only place sessions change.
pub fn reduce<U: Clone>(session: &AuthSession<U>, action: AuthAction<U>) -> AuthSession<U> {
    match action {
        AuthAction::Loading => AuthSession {
            loading: true,
            error: None,
            ..session.clone()
        },
        AuthAction::AuthChecked(user) => AuthSession {
            is_authenticated: user.is_some(),
            user,
            loading: false,
            error: None,
            initialized: true,
        },
        AuthAction::AuthCheckFailed(message) | AuthAction::LoginFailure(message) => AuthSession {
            user: None,
            is_authenticated: false,
            loading: false,
            error: Some(message),
            initialized: true,
        },
        AuthAction::LoginSuccess(user) => AuthSession {
            user: Some(user),
            is_authenticated: true,
            loading: false,
            error: None,
            initialized: true,
        },
        AuthAction::RoleSwitched(user) => AuthSession {
            user: Some(user),
            loading: false,
            error: None,
            ..session.clone()
        },
        AuthAction::RoleSwitchFailed(message) => AuthSession {
            loading: false,
            error: Some(message),
            ..session.clone()
        },
        AuthAction::Logout => AuthSession {
            initialized: session.initialized,
            ..AuthSession::default()
        },
        AuthAction::ClearError => AuthSession {
            error: None,
            ..session.clone()
        },
        AuthAction::Reset => AuthSession::default(),
    }
}

/// Result of a login or role switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl AuthOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

pub struct SessionManager<U> {
    api: Arc<dyn AuthApi<U>>,
    state: watch::Sender<AuthSession<U>>,
}

impl<U> SessionManager<U>
where
    U: Clone + fmt::Debug + Send + Sync + 'static,
{
    pub fn new(api: Arc<dyn AuthApi<U>>) -> Self {
        let (state, _) = watch::channel(AuthSession::default());
        Self { api, state }
    }

    fn dispatch(&self, action: AuthAction<U>) {
        debug!(?action, "Session action");
        self.state.send_modify(|session| *session = reduce(session, action));
    }

    /// Runs the boot-time session check.
    pub async fn init(&self) {
        self.check_auth().await;
        let session = self.session();
        info!(
            authenticated = session.is_authenticated,
            error = session.error.is_some(),
            "Session initialized"
        );
    }

    /// Asks the server who is logged in.
    ///
    /// A 401 settles to anonymous without an error; any other failure is
    /// recorded. Either way the session ends up `initialized`.
    pub async fn check_auth(&self) {
        self.dispatch(AuthAction::Loading);
        match self.api.current_user().await {
            Ok(user) => self.dispatch(AuthAction::AuthChecked(Some(user))),
            Err(e) if e.is_unauthorized() => {
                debug!("No active session");
                self.dispatch(AuthAction::AuthChecked(None));
            }
            Err(e) => {
                let message = e.display_message();
                warn!(error = %message, "Session check failed");
                self.dispatch(AuthAction::AuthCheckFailed(message));
            }
        }
    }

    pub async fn login(&self, credentials: Credentials) -> AuthOutcome {
        self.dispatch(AuthAction::Loading);
        match self.api.login(&credentials).await {
            Ok(user) => {
                info!(email = %credentials.email, "Logged in");
                self.dispatch(AuthAction::LoginSuccess(user));
                AuthOutcome::ok()
            }
            Err(e) => {
                let message = e.display_message();
                warn!(email = %credentials.email, error = %message, "Login failed");
                self.dispatch(AuthAction::LoginFailure(message.clone()));
                AuthOutcome::failed(message)
            }
        }
    }

    /// Tells the server (best effort) and always resets locally.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e.display_message(), "Logout request failed, clearing session anyway");
        }
        self.dispatch(AuthAction::Logout);
        info!("Logged out");
    }

    /// Changes the active role. On failure the current user is kept.
    pub async fn switch_role(&self, role: &str) -> AuthOutcome {
        self.dispatch(AuthAction::Loading);
        match self.api.switch_role(role).await {
            Ok(user) => {
                info!(role, "Role switched");
                self.dispatch(AuthAction::RoleSwitched(user));
                AuthOutcome::ok()
            }
            Err(e) => {
                let message = e.display_message();
                warn!(role, error = %message, "Role switch failed");
                self.dispatch(AuthAction::RoleSwitchFailed(message.clone()));
                AuthOutcome::failed(message)
            }
        }
    }

    pub fn clear_error(&self) {
        self.dispatch(AuthAction::ClearError);
    }

    /// Drops the session back to its pre-`init` state.
    pub fn dispose(&self) {
        self.dispatch(AuthAction::Reset);
    }

    pub fn session(&self) -> AuthSession<U> {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSession<U>> {
        self.state.subscribe()
    }
}
