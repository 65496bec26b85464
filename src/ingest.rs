use crate::{
    config::Config,
    errors::ApiError,
    models::photo::PhotoRecord,
    store::server::{AllocateId, AppendPhoto, StoreServer},
};
use actix::Addr;
use actix_web::web;
use chrono::{SubsecRound, Utc};
use sanitize_filename::sanitize;
use std::path::PathBuf;

/// URL prefix under which `uploads_dir` is served.
pub const UPLOADS_PREFIX: &str = "/uploads";

pub struct IncomingFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct IncomingUpload {
    pub file: Option<IncomingFile>,
    pub title: Option<String>,
}

/// `<id>-<original>` with the original reduced to something safe to create
/// inside the upload directory and to put in a URL path unescaped.
pub fn stored_name(id: i64, original: &str) -> String {
    let sanitized = sanitize(original);
    let safe: String = sanitized
        .trim()
        .chars()
        .filter(|c| !matches!(c, '#' | '%'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    if safe.is_empty() {
        format!("{}-upload.bin", id)
    } else {
        format!("{}-{}", id, safe)
    }
}

pub async fn ingest(
    cfg: &Config,
    store: &Addr<StoreServer>,
    upload: IncomingUpload,
) -> Result<PhotoRecord, ApiError> {
    let file = upload
        .file
        .ok_or_else(|| ApiError::BadRequest("No file uploaded!".into()))?;

    let id = store.send(AllocateId).await?;
    let name = stored_name(id, &file.filename);

    let dir = PathBuf::from(&cfg.uploads_dir);
    let target = dir.join(&name);
    let bytes = file.bytes;
    web::block(move || -> std::io::Result<()> {
        std::fs::create_dir_all(&dir)?;
        std::fs::write(&target, &bytes)
    })
    .await??;

    let record = PhotoRecord {
        id,
        title: upload.title,
        image_url: format!("{}/{}", UPLOADS_PREFIX, name),
        upload_date: Utc::now().trunc_subsecs(3),
    };
    let record = store.send(AppendPhoto { record }).await??;
    log::info!("stored photo {} as {}", record.id, name);
    Ok(record)
}
