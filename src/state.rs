use std::sync::Arc;

use crate::db::OrmConn;

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub auth: Arc<AuthSettings>,
}

/// Signing material for session tokens.
#[derive(Debug)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
}

impl AppState {
    pub fn new(orm: OrmConn, jwt_secret: impl Into<String>, jwt_ttl_hours: i64) -> Self {
        Self {
            orm,
            auth: Arc::new(AuthSettings {
                jwt_secret: jwt_secret.into(),
                jwt_ttl_hours,
            }),
        }
    }
}
