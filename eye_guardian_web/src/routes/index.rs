use crate::{
    classify::{classify, PredictError},
    html::{error_message, render_page, PageBody},
    server::SharedState,
};
use axum::{
    body::Bytes,
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, State},
    response::Html,
};
use tracing::instrument;

const ROUTE: &str = "/";
const FILE_FIELD: &str = "file";

pub async fn index(State(state): State<SharedState>) -> Html<String> {
    state.metrics.record_request(ROUTE);
    Html(render_page(&PageBody::AwaitingUpload))
}

/// Handles the upload form. Failures are rendered into the page, never surfaced as HTTP errors.
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Html<String> {
    state.metrics.record_request(ROUTE);

    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::warn!("Rejected upload form: {}", e);
            state.metrics.record_error(ROUTE);
            return Html(render_page(&PageBody::Error(error_message(&e.body_text()))));
        }
    };

    let image_data = match read_file_field(multipart).await {
        Ok(Some(image_data)) => image_data,
        Ok(None) => return Html(render_page(&PageBody::AwaitingUpload)),
        Err(e) => {
            tracing::warn!("Failed to read upload: {}", e);
            state.metrics.record_error(ROUTE);
            return Html(render_page(&PageBody::Error(error_message(&e))));
        }
    };

    let body = match classify(&state, image_data, ROUTE).await {
        Ok(classified) => PageBody::Prediction {
            prediction: classified.prediction,
            preview_png: classified.preview_png,
        },
        Err(PredictError::EmptyUpload) => PageBody::AwaitingUpload,
        Err(e) => PageBody::Error(error_message(&e)),
    };

    Html(render_page(&body))
}

async fn read_file_field(mut multipart: Multipart) -> Result<Option<Bytes>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            let data = field.bytes().await?;
            return Ok((!data.is_empty()).then_some(data));
        }
    }
    Ok(None)
}
