use super::model::{NewUpload, UploadForm};
use std::convert::Infallible;

/// Parse a `multipart/form-data` upload body into `userId` plus its `files` parts.
/// Unknown fields are skipped; parts without a file name are rejected.
pub async fn parse_upload_form(content_type: &str, body: Vec<u8>) -> Result<UploadForm, String> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| format!("Invalid multipart content type: {}", e))?;

    let stream = futures::stream::once(async move { Ok::<Vec<u8>, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Malformed multipart body: {}", e))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("userId") => {
                form.user_id = field
                    .text()
                    .await
                    .map_err(|e| format!("Unreadable userId field: {}", e))?;
            }
            Some("files") => {
                let file_name = field
                    .file_name()
                    .map(str::to_owned)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| "File part is missing a file name".to_string())?;
                let content_type = field.content_type().map(|m| m.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Unreadable file part {}: {}", file_name, e))?;

                form.files.push(NewUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => {
                tracing::debug!("Skipping unexpected multipart field {:?}", other);
            }
        }
    }

    Ok(form)
}
