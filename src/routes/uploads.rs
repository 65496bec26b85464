use crate::{config::Config, errors::ApiError};
use actix_files::NamedFile;
use actix_web::{HttpRequest, HttpResponse, web};
use sanitize_filename::sanitize;
use std::path::Path;

pub async fn get_upload(
    cfg: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filename = path.into_inner();
    // Stored names are already sanitized; anything that isn't can't be ours.
    if filename.is_empty() || sanitize(&filename) != filename {
        return Err(ApiError::NotFound);
    }

    let p = Path::new(&cfg.uploads_dir).join(&filename);
    if !p.is_file() {
        return Err(ApiError::NotFound);
    }

    let named = NamedFile::open_async(p).await?.use_last_modified(true);
    Ok(named.into_response(&req))
}
