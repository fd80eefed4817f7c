use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::IntoResponse,
    Json,
};
use cardboard_api::{Card, CardId, CardInList, NewSession, NewUser, User, Uuid};

use crate::{
    extractors::{AdminAuth, Auth, PreAuth, CLEAR_TOKEN_COOKIE, TOKEN_COOKIE},
    Board, Error,
};

pub async fn admin_create_user(
    _admin: AdminAuth,
    State(board): State<Board>,
    Json(data): Json<NewUser>,
) -> Result<(), Error> {
    board.write().await.admin_create_user(data)?;
    Ok(())
}

pub async fn auth(
    State(board): State<Board>,
    Json(data): Json<NewSession>,
) -> Result<impl IntoResponse, Error> {
    let token = board.write().await.auth(data)?;
    let cookie = HeaderValue::from_str(&format!(
        "{TOKEN_COOKIE}={}; Path=/; HttpOnly; SameSite=Strict",
        token.0
    ))
    .context("building session cookie")?;
    Ok(([(header::SET_COOKIE, cookie)], Json(token)))
}

pub async fn unauth(
    PreAuth(ctx): PreAuth,
    State(board): State<Board>,
) -> Result<impl IntoResponse, Error> {
    let token = ctx.token().map_err(|_| Error::permission_denied())?;
    board.write().await.unauth(token)?;
    Ok(([(header::SET_COOKIE, CLEAR_TOKEN_COOKIE)], ()))
}

pub async fn authuser(Auth(user): Auth) -> Json<User> {
    Json(user)
}

pub async fn create_card(
    Auth(user): Auth,
    State(board): State<Board>,
    Json(data): Json<CardInList>,
) -> Result<(), Error> {
    board.write().await.create_card(user.id, data)?;
    Ok(())
}

pub async fn fetch_card(
    Auth(user): Auth,
    State(board): State<Board>,
    Path(id): Path<Uuid>,
) -> Result<Json<CardInList>, Error> {
    Ok(Json(board.read().await.fetch_card(user.id, CardId(id))?))
}

pub async fn update_card(
    Auth(user): Auth,
    State(board): State<Board>,
    Json(card): Json<Card>,
) -> Result<(), Error> {
    board.write().await.update_card(user.id, card)?;
    Ok(())
}

pub async fn delete_card(
    Auth(user): Auth,
    State(board): State<Board>,
    Json(id): Json<CardId>,
) -> Result<(), Error> {
    board.write().await.delete_card(user.id, id)?;
    Ok(())
}
