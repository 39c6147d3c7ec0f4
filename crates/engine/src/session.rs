//! Session gate: observes authentication state and decides which surface to
//! present.
//!
//! The identity provider is an external collaborator; it pushes state changes
//! over a watch channel. Dropping the gate drops the subscription.

use thiserror::Error;
use tokio::sync::watch;

/// A resolved authenticated identity. `user_id` is the stable unique
/// identifier that namespaces all persisted data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

/// Authentication state as reported by the identity provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Resolution still in flight.
    #[default]
    Pending,
    SignedOut,
    SignedIn(Identity),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("identity provider closed the auth stream")]
    Closed,
    #[error("sign-out failed: {0}")]
    SignOut(String),
}

/// External identity provider interface.
pub trait IdentityProvider {
    /// Subscribes to authentication-state changes. The receiver always holds
    /// the latest state; dropping it unsubscribes.
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    /// Ends the current session.
    fn end_session(&self) -> impl Future<Output = Result<(), SessionError>>;
}

/// What the gate presents for the current auth state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateView {
    /// Resolution pending: show a loading indicator.
    Loading,
    /// No identity: show the login surface.
    Login,
    /// Identity resolved: hand over to the finance engine.
    Main(Identity),
}

pub struct SessionGate {
    auth: watch::Receiver<AuthState>,
}

impl SessionGate {
    pub fn new<P: IdentityProvider>(provider: &P) -> Self {
        Self {
            auth: provider.subscribe(),
        }
    }

    /// Maps the current auth state to a view, without waiting.
    pub fn view(&self) -> GateView {
        match &*self.auth.borrow() {
            AuthState::Pending => GateView::Loading,
            AuthState::SignedOut => GateView::Login,
            AuthState::SignedIn(identity) => GateView::Main(identity.clone()),
        }
    }

    /// Waits until resolution finishes and returns the signed-in identity, or
    /// `None` when login is required.
    ///
    /// A provider that drops the stream while still pending is fatal to this
    /// resolution; there is no retry.
    pub async fn resolved(&mut self) -> Result<Option<Identity>, SessionError> {
        loop {
            match &*self.auth.borrow_and_update() {
                AuthState::Pending => {}
                AuthState::SignedOut => return Ok(None),
                AuthState::SignedIn(identity) => return Ok(Some(identity.clone())),
            }
            self.auth.changed().await.map_err(|_| SessionError::Closed)?;
        }
    }
}

/// Ends the session; failures are logged, not surfaced.
pub async fn logout<P: IdentityProvider>(provider: &P) {
    if let Err(err) = provider.end_session().await {
        tracing::error!("failed to end session: {err}");
    }
}

/// Identity provider with a locally-driven state, used by the app binary
/// (single pre-resolved identity) and by tests.
#[derive(Debug)]
pub struct StaticProvider {
    state: watch::Sender<AuthState>,
}

impl StaticProvider {
    pub fn pending() -> Self {
        let (state, _) = watch::channel(AuthState::Pending);
        Self { state }
    }

    pub fn signed_in(identity: Identity) -> Self {
        let (state, _) = watch::channel(AuthState::SignedIn(identity));
        Self { state }
    }

    /// Pushes a new auth state to every subscriber.
    pub fn resolve(&self, state: AuthState) {
        self.state.send_replace(state);
    }
}

impl IdentityProvider for StaticProvider {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    async fn end_session(&self) -> Result<(), SessionError> {
        self.state.send_replace(AuthState::SignedOut);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            user_id: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn gate_shows_loading_while_pending() {
        let provider = StaticProvider::pending();
        let gate = SessionGate::new(&provider);
        assert_eq!(gate.view(), GateView::Loading);
    }

    #[tokio::test]
    async fn gate_resolves_to_identity() {
        let provider = StaticProvider::pending();
        let mut gate = SessionGate::new(&provider);

        provider.resolve(AuthState::SignedIn(identity()));
        let resolved = gate.resolved().await.unwrap();
        assert_eq!(resolved, Some(identity()));
        assert_eq!(gate.view(), GateView::Main(identity()));
    }

    #[tokio::test]
    async fn gate_resolves_to_login_when_signed_out() {
        let provider = StaticProvider::pending();
        let mut gate = SessionGate::new(&provider);

        provider.resolve(AuthState::SignedOut);
        assert_eq!(gate.resolved().await.unwrap(), None);
        assert_eq!(gate.view(), GateView::Login);
    }

    #[tokio::test]
    async fn dropped_provider_is_fatal_to_resolution() {
        let provider = StaticProvider::pending();
        let mut gate = SessionGate::new(&provider);

        drop(provider);
        assert!(matches!(gate.resolved().await, Err(SessionError::Closed)));
    }

    #[tokio::test]
    async fn logout_swallows_provider_errors() {
        struct FailingProvider;

        impl IdentityProvider for FailingProvider {
            fn subscribe(&self) -> watch::Receiver<AuthState> {
                let (sender, receiver) = watch::channel(AuthState::Pending);
                drop(sender);
                receiver
            }

            async fn end_session(&self) -> Result<(), SessionError> {
                Err(SessionError::SignOut("network down".to_string()))
            }
        }

        // Must not panic or propagate.
        logout(&FailingProvider).await;
    }

    #[tokio::test]
    async fn end_session_signs_out_subscribers() {
        let provider = StaticProvider::signed_in(identity());
        let gate = SessionGate::new(&provider);
        assert_eq!(gate.view(), GateView::Main(identity()));

        provider.end_session().await.unwrap();
        assert_eq!(gate.view(), GateView::Login);
    }
}
