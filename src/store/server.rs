use actix::{Actor, Context, Handler, Message, MessageResult};
use chrono::Utc;
use super::{PhotoStore, StoreError};
use crate::models::photo::PhotoRecord;

/// Owns the metadata document. The mailbox runs one message at a time, so
/// every load-modify-save happens without another writer in between.
pub struct StoreServer {
    store: PhotoStore,
    last_id: i64,
}

impl StoreServer {
    pub fn new(store: PhotoStore) -> Self {
        let last_id = store.load().iter().map(|p| p.id).max().unwrap_or(0);
        Self { store, last_id }
    }

    /// Millisecond timestamp, bumped past the previous id when the clock
    /// hasn't moved (or has moved backwards).
    fn next_id(&mut self, now_ms: i64) -> i64 {
        self.last_id = now_ms.max(self.last_id + 1);
        self.last_id
    }
}

impl Actor for StoreServer {
    type Context = Context<Self>;
}

#[derive(Message)]
#[rtype(result="Vec<PhotoRecord>")]
pub struct ListPhotos;

#[derive(Message)]
#[rtype(result="i64")]
pub struct AllocateId;

#[derive(Message)]
#[rtype(result="Result<PhotoRecord, StoreError>")]
pub struct AppendPhoto { pub record: PhotoRecord }

impl Handler<ListPhotos> for StoreServer {
    type Result = MessageResult<ListPhotos>;
    fn handle(&mut self, _: ListPhotos, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.store.load())
    }
}

impl Handler<AllocateId> for StoreServer {
    type Result = MessageResult<AllocateId>;
    fn handle(&mut self, _: AllocateId, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.next_id(Utc::now().timestamp_millis()))
    }
}

impl Handler<AppendPhoto> for StoreServer {
    type Result = Result<PhotoRecord, StoreError>;
    fn handle(&mut self, msg: AppendPhoto, _: &mut Context<Self>) -> Self::Result {
        self.last_id = self.last_id.max(msg.record.id);
        self.store.append(msg.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> PhotoRecord {
        PhotoRecord {
            id,
            title: None,
            image_url: format!("/uploads/{id}-x.jpg"),
            upload_date: Utc::now(),
        }
    }

    #[test]
    fn ids_strictly_increase_within_one_millisecond() {
        let dir = tempfile::tempdir().unwrap();
        let mut srv = StoreServer::new(PhotoStore::new(dir.path().join("db.json")));
        assert_eq!(srv.next_id(1000), 1000);
        assert_eq!(srv.next_id(1000), 1001);
        assert_eq!(srv.next_id(999), 1002);
        assert_eq!(srv.next_id(5000), 5000);
    }

    #[test]
    fn id_generator_resumes_after_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path().join("db.json"));
        store.save(&[record(10), record(9_000_000_000_000)]).unwrap();

        let mut srv = StoreServer::new(store);
        assert_eq!(srv.next_id(1), 9_000_000_000_001);
    }

    #[actix_web::test]
    async fn concurrent_appends_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path().join("db.json"));
        let addr = StoreServer::new(store.clone()).start();

        let mut pending = Vec::new();
        for _ in 0..20 {
            let addr = addr.clone();
            pending.push(async move {
                let id = addr.send(AllocateId).await.unwrap();
                addr.send(AppendPhoto { record: record(id) }).await.unwrap().unwrap()
            });
        }
        let created = futures_util::future::join_all(pending).await;

        let listed = addr.send(ListPhotos).await.unwrap();
        assert_eq!(listed.len(), 20);
        let mut ids: Vec<i64> = created.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert_eq!(store.load(), listed);
    }
}
