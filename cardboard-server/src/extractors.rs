use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{self, request},
};
use cardboard_api::{AuthContext, AuthToken, User};

use crate::{Board, Error};

pub const TOKEN_COOKIE: &str = "token";
pub const CLEAR_TOKEN_COOKIE: &str = "token=; Path=/; Max-Age=0";

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub board: Board,
    pub admin_token: Option<AuthToken>,
}

/// Reads the credential from a non-empty `token` cookie, falling back to a
/// bearer `Authorization` header
pub fn presented_token(headers: &http::HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|kv| kv.trim().split_once('='))
        .find(|(k, v)| *k == TOKEN_COOKIE && !v.is_empty())
        .map(|(_, v)| v.to_string());
    from_cookie.or_else(|| {
        let auth = headers.get(http::header::AUTHORIZATION)?.to_str().ok()?;
        let (scheme, token) = auth.split_once(' ')?;
        scheme
            .eq_ignore_ascii_case("bearer")
            .then(|| token.trim().to_string())
    })
}

pub struct PreAuth(pub AuthContext);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for PreAuth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<PreAuth, Error> {
        Ok(PreAuth(AuthContext::new(presented_token(&req.headers))))
    }
}

pub struct Auth(pub User);

#[async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, state: &AppState) -> Result<Auth, Error> {
        let PreAuth(ctx) = PreAuth::from_request_parts(req, state).await?;
        let user = state.board.read().await.whoami(&ctx);
        match user {
            Ok(user) => Ok(Auth(user)),
            Err(e) => {
                tracing::debug!(uri = %req.uri, "identity resolution failed");
                Err(Error::Api(e))
            }
        }
    }
}

pub struct AdminAuth;

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = Error;

    async fn from_request_parts(
        req: &mut request::Parts,
        state: &AppState,
    ) -> Result<AdminAuth, Error> {
        let PreAuth(ctx) = PreAuth::from_request_parts(req, state).await?;
        let token = ctx.token().map_err(|_| Error::permission_denied())?;
        if Some(token) == state.admin_token {
            Ok(AdminAuth)
        } else {
            Err(Error::permission_denied())
        }
    }
}
