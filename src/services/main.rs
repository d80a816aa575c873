use crate::dto::main::IndexPageData;
use crate::repository::EventReader;
use crate::store::TrackerStore;

/// Loads everything the tracker page shows, performing the first event load
/// lazily if it has not happened yet.
pub async fn load_index_page<R>(repo: &R, store: &TrackerStore) -> IndexPageData
where
    R: EventReader + ?Sized,
{
    crate::services::events::ensure_initialized(repo, store).await;
    IndexPageData::from(store.snapshot())
}
