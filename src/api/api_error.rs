use crate::error::Error;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub(crate) struct APIError(anyhow::Error);

impl IntoResponse for APIError {
    fn into_response(self) -> Response {
        let any_err = self.0;
        let status = status_for(&any_err);
        let body = Json(json!({
            "error": format!("{any_err}"),
        }));
        (status, body).into_response()
    }
}

fn status_for(any_err: &anyhow::Error) -> StatusCode {
    if let Some(err) = any_err.downcast_ref::<Error>() {
        return match err {
            Error::UnknownDomain(_) => StatusCode::NOT_FOUND,
            Error::InvalidEntry(_) => StatusCode::BAD_REQUEST,
            Error::JsonExtractorRejection(err) => rejection_status(err),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
    }
    // `WithRejection` hands the raw rejection to the blanket From below.
    if let Some(err) = any_err.downcast_ref::<JsonRejection>() {
        return rejection_status(err);
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

fn rejection_status(err: &JsonRejection) -> StatusCode {
    match err {
        JsonRejection::JsonDataError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
        JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<E> From<E> for APIError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
