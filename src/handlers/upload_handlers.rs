// worklog-backend/src/handlers/upload_handlers.rs
use super::redirect;
use crate::error_handler::ServiceError;
use crate::forms;
use crate::store::{FileRecordStore, StoreError};
use actix_multipart::{Field, Multipart};
use actix_web::http::header::ContentType;
use actix_web::{post, web, HttpResponse};
use futures_util::TryStreamExt;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// Where to send the browser after an upload in `category`.
pub fn redirect_target(category: &str) -> &'static str {
    match category {
        "weekly" => "/work/weekly",
        "evtx" => "/work/evtx",
        _ => "/",
    }
}

fn plain_bad_request(message: &'static str) -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type(ContentType::plaintext())
        .body(message)
}

async fn read_text(field: &mut Field) -> Result<String, ServiceError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        bytes.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn skip(field: &mut Field) -> Result<(), ServiceError> {
    while field.try_next().await?.is_some() {}
    Ok(())
}

/// Streams the part to `<upload dir>/<sanitized name>`, replacing any file
/// of the same name once the whole part has arrived. Returns the sanitized
/// name, "" if nothing was written.
///
/// The bytes go to a temporary file in the upload dir first; an interrupted
/// upload drops it and leaves the previous file untouched.
async fn save_file_part(store: &FileRecordStore, field: &mut Field) -> Result<String, ServiceError> {
    let original = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or_default()
        .to_string();
    let sanitized = forms::sanitize_filename(&original);

    if sanitized.is_empty() {
        skip(field).await?;
        return Ok(sanitized);
    }

    tokio::fs::create_dir_all(store.upload_dir()).await?;
    let path = store.upload_path(&sanitized);
    let (partial, partial_path) = NamedTempFile::new_in(store.upload_dir())?.into_parts();
    let mut file = tokio::fs::File::from_std(partial);
    while let Some(chunk) = field.try_next().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    drop(file);
    partial_path.persist(&path).map_err(std::io::Error::from)?;

    log::info!("Saved upload '{}' as {}", original, path.display());
    Ok(sanitized)
}

#[post("/upload")]
pub async fn upload_file_handler(
    store: web::Data<FileRecordStore>,
    mut payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    let mut category: Option<String> = None;
    let mut filename: Option<String> = None;

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") if filename.is_none() => {
                filename = Some(save_file_part(&store, &mut field).await?)
            }
            Some("file") => {
                log::warn!("Upload carries more than one file part; keeping the first");
                skip(&mut field).await?
            }
            Some("category") => category = Some(read_text(&mut field).await?),
            _ => skip(&mut field).await?,
        }
    }

    let Some(filename) = filename else {
        log::warn!("Upload rejected: no file part");
        return Ok(plain_bad_request("No file part in the request."));
    };

    match store.record_upload(&filename, category.as_deref()).await {
        Ok(record) => Ok(redirect(redirect_target(
            record.category.as_deref().unwrap_or_default(),
        ))),
        Err(StoreError::InvalidFilename) => {
            log::warn!("Upload rejected: empty filename");
            Ok(plain_bad_request("No file selected."))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_pick_their_page() {
        assert_eq!(redirect_target("weekly"), "/work/weekly");
        assert_eq!(redirect_target("evtx"), "/work/evtx");
        assert_eq!(redirect_target("general"), "/");
        assert_eq!(redirect_target("Weekly"), "/");
    }
}
