use crate::{
    config::Config,
    errors::ApiError,
    ingest::{self, IncomingFile, IncomingUpload},
    store::server::{ListPhotos, StoreServer},
};
use actix::Addr;
use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures_util::TryStreamExt as _;

const PHOTO_FIELD: &str = "photo";
const TITLE_FIELD: &str = "title";

pub async fn list_photos(store: web::Data<Addr<StoreServer>>) -> Result<HttpResponse, ApiError> {
    let photos = store.send(ListPhotos).await?;
    Ok(HttpResponse::Ok().json(photos))
}

pub async fn upload_photo(
    cfg: web::Data<Config>,
    store: web::Data<Addr<StoreServer>>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let upload = read_upload(&cfg, payload).await?;
    log::info!(
        "upload request received: title={:?} file={:?}",
        upload.title,
        upload.file.as_ref().map(|f| (&f.filename, f.bytes.len()))
    );
    let record = ingest::ingest(&cfg, store.get_ref(), upload).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Collects the first `photo` part that carries a non-empty filename and the
/// `title` text part. Anything else is drained and dropped, including the
/// empty `photo` part a browser sends when no file was picked.
async fn read_upload(cfg: &Config, mut payload: Multipart) -> Result<IncomingUpload, ApiError> {
    let mut upload = IncomingUpload::default();
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|_| ApiError::BadRequest("invalid multipart".into()))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        match (field_name.as_str(), filename) {
            (PHOTO_FIELD, Some(filename)) if upload.file.is_none() => {
                let bytes = read_field(&mut field, cfg.max_upload_size).await?;
                upload.file = Some(IncomingFile { filename, bytes });
            }
            (TITLE_FIELD, None) => {
                let buf = read_field(&mut field, cfg.max_upload_size).await?;
                let title = String::from_utf8(buf)
                    .map_err(|_| ApiError::BadRequest("invalid title".into()))?;
                upload.title = Some(title);
            }
            _ => {
                while field
                    .try_next()
                    .await
                    .map_err(|_| ApiError::BadRequest("upload read error".into()))?
                    .is_some()
                {}
            }
        }
    }
    Ok(upload)
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut data: Vec<u8> = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|_| ApiError::BadRequest("upload read error".into()))?
    {
        data.extend_from_slice(&chunk);
        if data.len() > limit {
            return Err(ApiError::BadRequest("file too large".into()));
        }
    }
    Ok(data)
}
