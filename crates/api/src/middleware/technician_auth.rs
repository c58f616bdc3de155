//! Technician authentication middleware.
//!
//! Guards the ledger pages with HTTP Basic authentication against the single
//! configured technician account.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use tracing::warn;

use crate::app::AppState;
use crate::config::TechnicianConfig;

/// Challenge sent with every 401.
pub const BASIC_CHALLENGE: &str = "Basic realm=\"Login tecnico\"";

const CHALLENGE_BODY: &str = "Acesso restrito. Faça login como técnico.";

/// Authenticated technician, stored in request extensions.
#[derive(Debug, Clone)]
pub struct Technician {
    pub username: String,
}

/// Exact-match check against the configured credential pair.
pub fn authenticate(config: &TechnicianConfig, username: &str, password: &str) -> bool {
    username == config.username && password == config.password
}

/// Middleware that requires technician credentials.
///
/// Missing, malformed or wrong credentials get a 401 carrying a Basic
/// challenge so browsers prompt for a login.
pub async fn require_technician(
    State(state): State<AppState>,
    credentials: Option<TypedHeader<Authorization<Basic>>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(TypedHeader(basic)) = credentials else {
        return challenge_response();
    };

    if !authenticate(&state.config.technician, basic.username(), basic.password()) {
        warn!(
            username = %basic.username(),
            path = %req.uri().path(),
            "Technician authentication failed"
        );
        return challenge_response();
    }

    req.extensions_mut().insert(Technician {
        username: basic.username().to_string(),
    });
    next.run(req).await
}

/// Helper to create the 401 challenge response.
fn challenge_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static(BASIC_CHALLENGE),
        )],
        CHALLENGE_BODY,
    )
        .into_response()
}
