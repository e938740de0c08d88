use crate::client::{error::StoreError, remote::RemoteStore};

/// Authentication state, passed explicitly into every remote operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated {
        username: String,
        token: String,
    },
}

impl Session {
    pub async fn login<S: RemoteStore + ?Sized>(
        store: &S,
        username: &str,
        password: &str,
    ) -> Result<Session, StoreError> {
        let token = store.login(username, password).await?;
        tracing::info!(username, "logged in");
        Ok(Session::Authenticated {
            username: username.to_string(),
            token,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Authenticated { username, .. } => Some(username),
            Session::Unauthenticated => None,
        }
    }

    /// The bearer token, or `Unauthorized` without a round trip.
    pub fn token(&self) -> Result<&str, StoreError> {
        match self {
            Session::Authenticated { token, .. } => Ok(token),
            Session::Unauthenticated => Err(StoreError::Unauthorized("Not logged in".into())),
        }
    }

    pub fn logout(&mut self) {
        if let Session::Authenticated { username, .. } = self {
            tracing::info!(username = %username, "logged out");
        }
        *self = Session::Unauthenticated;
    }
}
