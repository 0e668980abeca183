//! Axum route handlers for the upload form and tailoring submissions.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::flash::{clear_cookie, FlashSigner};
use crate::render;
use crate::state::AppState;
use crate::tailoring::error::{ErrorKind, TailorError};
use crate::tailoring::pipeline::TailorSubmission;
use crate::tailoring::upload::UploadedFile;

/// GET /
///
/// Renders the upload form, showing and clearing any pending notice.
pub async fn handle_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let notice = state.flash.take_notice(&headers);
    let had_notice = notice.is_some();
    let page = render::index_page(notice, state.config.max_upload_mb())?;
    if had_notice {
        Ok(([(header::SET_COOKIE, clear_cookie())], page).into_response())
    } else {
        Ok(page.into_response())
    }
}

/// POST /tailor
///
/// Runs the tailoring pipeline. Success renders the result page; every
/// handled failure redirects to `/` with a notice.
pub async fn handle_tailor(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    info!("Received POST request to /tailor");

    let declared_len = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared_len.is_some_and(|len| len > state.config.max_upload_bytes) {
        return Ok(payload_too_large(&state));
    }

    let submission = match multipart {
        Ok(multipart) => read_submission(multipart).await,
        Err(rejection) => {
            warn!("Rejected non-multipart submission: {rejection}");
            return Ok(redirect_with_notice(
                &state.flash,
                &TailorError::MissingFilePart,
            ));
        }
    };

    let submission = match submission {
        Ok(s) => s,
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Ok(payload_too_large(&state));
        }
        Err(e) if e.status().is_server_error() => {
            return Err(AppError::Internal(anyhow::Error::new(e)));
        }
        Err(e) => {
            let err = TailorError::MalformedForm(e.body_text());
            return Ok(redirect_with_notice(&state.flash, &err));
        }
    };

    match state.tailor.run(submission).await {
        Ok(tailored) => Ok(render::result_page(tailored.text)?.into_response()),
        Err(err) => Ok(redirect_with_notice(&state.flash, &err)),
    }
}

/// Collects the known form fields. Unknown fields are skipped; text values are kept raw.
async fn read_submission(mut multipart: Multipart) -> Result<TailorSubmission, MultipartError> {
    let mut submission = TailorSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resumeFile" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                submission.resume = Some(UploadedFile { filename, data });
            }
            "jobLink" => submission.job.job_link = field.text().await?,
            "jobRole" => submission.job.job_role = field.text().await?,
            "company" => submission.job.company = field.text().await?,
            "jobDescription" => submission.job.job_description = field.text().await?,
            _ => {}
        }
    }

    Ok(submission)
}

fn payload_too_large(state: &AppState) -> Response {
    warn!("413 Payload Too Large");
    let err = TailorError::PayloadTooLarge {
        max_mb: state.config.max_upload_mb(),
    };
    redirect_with_notice(&state.flash, &err)
}

fn redirect_with_notice(flash: &FlashSigner, err: &TailorError) -> Response {
    match err {
        TailorError::Unexpected(detail) => error!("Unexpected error in /tailor processing: {detail}"),
        TailorError::SaveFailed(source) => error!("Saving upload failed: {source:?}"),
        TailorError::MalformedForm(detail) => warn!("Malformed form submission: {detail}"),
        _ => {}
    }
    let kind: ErrorKind = err.kind();
    match err.service_error() {
        Some(service) => warn!(?kind, ?service, "Tailoring request aborted: {err}"),
        None => warn!(?kind, "Tailoring request aborted: {err}"),
    }

    (
        [(header::SET_COOKIE, flash.set_cookie(&err.to_string()))],
        Redirect::to("/"),
    )
        .into_response()
}
