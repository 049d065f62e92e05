//! HTTP handlers.

pub mod frame;
pub mod health;

use axum::http::StatusCode;
use planframe_core::FrameError;
use tracing::error;

/// Map a library error to a status code and a plain-text detail.
pub fn error_response(err: FrameError) -> (StatusCode, String) {
    let status = match &err {
        FrameError::NotFound { .. } => StatusCode::NOT_FOUND,
        FrameError::NotSupported { .. } => StatusCode::NOT_IMPLEMENTED,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
        error!("Request failed: {}", err);
    }
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        assert_eq!(
            error_response(FrameError::frame_not_found("X")).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(FrameError::schema("bad")).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(FrameError::ValidationFailed { errors: vec![] }).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(FrameError::NotSupported {
                capability: "optimizer".into(),
                message: "later".into(),
            })
            .0,
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            error_response(FrameError::Storage { message: "disk".into() }).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
