use cardboard_api::Error as ApiError;

use crate::extractors::CLEAR_TOKEN_COOKIE;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    pub fn permission_denied() -> Error {
        Error::Api(ApiError::PermissionDenied)
    }
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let err = match self {
            Error::Anyhow(err) => {
                tracing::error!(?err, "internal server error");
                #[cfg(not(test))]
                let err =
                    ApiError::Unknown(String::from("Internal server error, see logs for details"));
                #[cfg(test)]
                let err = ApiError::Unknown(format!("Internal server error: {err:?}"));
                err
            }
            Error::Api(err) => {
                tracing::info!("returning error to client: {err}");
                err
            }
        };
        match err {
            // the client-held token is useless from now on
            ApiError::Unauthenticated => (
                err.status_code(),
                [(http::header::SET_COOKIE, CLEAR_TOKEN_COOKIE)],
                err.contents(),
            )
                .into_response(),
            _ => (err.status_code(), err.contents()).into_response(),
        }
    }
}
