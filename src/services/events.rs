//! Event editing, shareable-link lookup and slug backfill.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{BackfillReport, Event, EventInput, NewEvent, SlugFailure, SluggedEvent};
use crate::services::non_blank;
use crate::services::slug::{dedupe_slug, generate_slug, slug_family_prefix};
use crate::store::EventStore;
use crate::utils::error::{AppError, AppResult};

#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
    backfill_concurrency: usize,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>, config: &Config) -> Self {
        Self {
            store,
            backfill_concurrency: config.backfill_concurrency.max(1),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Event>> {
        self.store.list_events().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Event> {
        self.store
            .get_event(id)
            .await?
            .ok_or_else(|| event_not_found(id))
    }

    /// Shareable-link lookup. Private events are indistinguishable from
    /// missing ones.
    pub async fn get_public_by_slug(&self, slug: &str) -> AppResult<Event> {
        match self.store.get_event_by_slug(slug).await? {
            Some(event) if event.is_public => Ok(event),
            _ => Err(AppError::NotFound(format!(
                "No public event with slug '{}'",
                slug
            ))),
        }
    }

    pub async fn create(&self, input: EventInput) -> AppResult<Event> {
        let input = validate(input)?;
        let slug = self.unique_slug_for(&input.title).await?;
        if input.is_public && slug.is_none() {
            return Err(unusable_title());
        }

        let event = self
            .store
            .insert_event(NewEvent {
                title: input.title,
                description: input.description,
                location: input.location,
                date: input.date,
                is_public: input.is_public,
                slug,
            })
            .await?;

        tracing::info!(event_id = %event.id, slug = ?event.slug, "event created");
        Ok(event)
    }

    /// Apply an edit. A slug that already exists is kept so shared links
    /// survive title changes; an event without one gets one generated.
    pub async fn update(&self, id: Uuid, input: EventInput) -> AppResult<Event> {
        let input = validate(input)?;
        let current = self.get(id).await?;

        let slug = if current.missing_slug() {
            self.unique_slug_for(&input.title).await?
        } else {
            current.slug
        };
        if input.is_public && slug.is_none() {
            return Err(unusable_title());
        }

        let event = self
            .store
            .update_event(
                id,
                NewEvent {
                    title: input.title,
                    description: input.description,
                    location: input.location,
                    date: input.date,
                    is_public: input.is_public,
                    slug,
                },
            )
            .await?
            .ok_or_else(|| event_not_found(id))?;

        tracing::info!(event_id = %event.id, "event updated");
        Ok(event)
    }

    /// Assign slugs to every event that has none.
    ///
    /// Candidates and slugs in use are read once up front, slugs are planned
    /// in memory, then conditional per-row updates run with bounded
    /// concurrency. Rows that fail are reported, not rolled back.
    pub async fn backfill_slugs(&self) -> AppResult<BackfillReport> {
        let candidates = self.store.list_events_missing_slug().await?;
        let mut report = BackfillReport {
            candidates: candidates.len(),
            ..Default::default()
        };

        let mut taken: HashSet<String> = self.store.list_slugs().await?.into_iter().collect();
        let mut planned: Vec<(Event, String)> = Vec::with_capacity(candidates.len());
        for event in candidates {
            let base = generate_slug(&event.title);
            if base.is_empty() {
                tracing::warn!(event_id = %event.id, title = %event.title, "title yields no usable slug");
                report.skipped.push(event.id);
                continue;
            }

            let slug = dedupe_slug(&base, &taken);
            taken.insert(slug.clone());
            planned.push((event, slug));
        }

        let store = self.store.clone();
        let outcomes: Vec<(Event, String, AppResult<Option<Event>>)> = stream::iter(planned)
            .map(move |(event, slug)| {
                let store = store.clone();
                async move {
                    let result = store.assign_slug(event.id, &slug).await;
                    (event, slug, result)
                }
            })
            .buffer_unordered(self.backfill_concurrency)
            .collect()
            .await;

        for (event, slug, result) in outcomes {
            match result {
                Ok(Some(updated)) => report.updated.push(SluggedEvent {
                    id: updated.id,
                    title: updated.title,
                    slug,
                }),
                Ok(None) => {
                    tracing::debug!(event_id = %event.id, "event already has a slug, skipping");
                    report.skipped.push(event.id);
                }
                Err(e) => {
                    tracing::error!(event_id = %event.id, error = ?e, "failed to assign slug");
                    report.failed.push(SlugFailure {
                        id: event.id,
                        title: event.title,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            candidates = report.candidates,
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "event slug backfill done"
        );

        Ok(report)
    }

    /// Generate a slug for `title` that no other event uses. `None` when the
    /// title has nothing slug-worthy in it.
    async fn unique_slug_for(&self, title: &str) -> AppResult<Option<String>> {
        let base = generate_slug(title);
        if base.is_empty() {
            return Ok(None);
        }

        let taken: HashSet<String> = self
            .store
            .slugs_with_prefix(slug_family_prefix(&base))
            .await?
            .into_iter()
            .collect();
        Ok(Some(dedupe_slug(&base, &taken)))
    }
}

fn validate(mut input: EventInput) -> AppResult<EventInput> {
    input.title = input.title.trim().to_string();
    if input.title.is_empty() {
        return Err(AppError::ValidationError(
            "Event title is required".to_string(),
        ));
    }
    input.description = non_blank(input.description);
    input.location = non_blank(input.location);
    Ok(input)
}

fn unusable_title() -> AppError {
    AppError::ValidationError(
        "A public event needs a title containing letters or digits".to_string(),
    )
}

fn event_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Event '{}' was not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn input(title: &str, is_public: bool) -> EventInput {
        EventInput {
            title: title.to_string(),
            description: None,
            location: Some("Estadio Municipal".to_string()),
            date: Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap(),
            is_public,
        }
    }

    fn raw_event(title: &str, slug: Option<&str>) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            location: None,
            date: now + Duration::days(7),
            is_public: false,
            slug: slug.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(store: &MemoryStore) -> EventService {
        EventService::new(Arc::new(store.clone()), &Config::default())
    }

    #[tokio::test]
    async fn test_create_assigns_slug() {
        let store = MemoryStore::new();
        let event = service(&store)
            .create(input("Torneo Inter Puerto Rico 2024!", true))
            .await
            .unwrap();
        assert_eq!(event.slug.as_deref(), Some("torneo-inter-puerto-rico-2024"));
    }

    #[tokio::test]
    async fn test_create_same_title_gets_distinct_slug() {
        let store = MemoryStore::new();
        let service = service(&store);
        let first = service.create(input("Final", true)).await.unwrap();
        let second = service.create(input("Final", true)).await.unwrap();
        assert_eq!(first.slug.as_deref(), Some("final"));
        assert_eq!(second.slug.as_deref(), Some("final-2"));
    }

    const LONG_TITLE: &str = "Campeonato Nacional de Baloncesto Juvenil Puerto Rico 2024";

    #[tokio::test]
    async fn test_create_long_title_repeatedly() {
        let store = MemoryStore::new();
        let service = service(&store);

        let mut slugs = HashSet::new();
        for _ in 0..3 {
            let event = service.create(input(LONG_TITLE, true)).await.unwrap();
            let slug = event.slug.unwrap();
            assert!(slug.len() <= 50);
            assert!(slugs.insert(slug));
        }
        assert!(slugs.contains("campeonato-nacional-de-baloncesto-juvenil-puerto-r"));
        assert!(slugs.contains("campeonato-nacional-de-baloncesto-juvenil-puerto-2"));
        assert!(slugs.contains("campeonato-nacional-de-baloncesto-juvenil-puerto-3"));
    }

    #[tokio::test]
    async fn test_public_event_needs_usable_title() {
        let store = MemoryStore::new();
        let service = service(&store);

        let err = service.create(input("!!!", true)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let private = service.create(input("!!!", false)).await.unwrap();
        assert!(private.slug.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let store = MemoryStore::new();
        let err = service(&store)
            .create(input("   ", false))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_existing_slug() {
        let store = MemoryStore::new();
        let service = service(&store);
        let created = service.create(input("Copa Verano", true)).await.unwrap();

        let updated = service
            .update(created.id, input("Copa Verano 2025", true))
            .await
            .unwrap();
        assert_eq!(updated.title, "Copa Verano 2025");
        assert_eq!(updated.slug.as_deref(), Some("copa-verano"));
    }

    #[tokio::test]
    async fn test_update_generates_missing_slug() {
        let store = MemoryStore::new();
        let event = raw_event("Clinic Day", None);
        store.put_event(event.clone()).await;

        let updated = service(&store)
            .update(event.id, input("Clinic Day", true))
            .await
            .unwrap();
        assert_eq!(updated.slug.as_deref(), Some("clinic-day"));
        assert!(updated.is_public);
    }

    #[tokio::test]
    async fn test_update_unknown_event() {
        let store = MemoryStore::new();
        let err = service(&store)
            .update(Uuid::new_v4(), input("Anything", false))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_public_lookup_hides_private_events() {
        let store = MemoryStore::new();
        let service = service(&store);
        service.create(input("Open Day", true)).await.unwrap();
        service.create(input("Board Meeting", false)).await.unwrap();

        let found = service.get_public_by_slug("open-day").await.unwrap();
        assert_eq!(found.title, "Open Day");

        let err = service.get_public_by_slug("board-meeting").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_backfill_only_touches_missing_slugs() {
        let store = MemoryStore::new();
        let slugged = raw_event("Already Done", Some("already-done"));
        let null_slug = raw_event("Liga de Verano", None);
        let empty_slug = raw_event("Café Final", Some(""));
        store.put_event(slugged.clone()).await;
        store.put_event(null_slug.clone()).await;
        store.put_event(empty_slug.clone()).await;

        let report = service(&store).backfill_slugs().await.unwrap();

        assert_eq!(report.candidates, 2);
        assert_eq!(report.updated.len(), 2);
        assert!(report.failed.is_empty());

        let untouched = store.get_event(slugged.id).await.unwrap().unwrap();
        assert_eq!(untouched.slug.as_deref(), Some("already-done"));
        assert_eq!(untouched.updated_at, slugged.updated_at);

        let verano = store.get_event(null_slug.id).await.unwrap().unwrap();
        assert_eq!(verano.slug.as_deref(), Some("liga-de-verano"));
        let cafe = store.get_event(empty_slug.id).await.unwrap().unwrap();
        assert_eq!(cafe.slug.as_deref(), Some("cafe-final"));
    }

    #[tokio::test]
    async fn test_backfill_identical_titles_get_distinct_slugs() {
        let store = MemoryStore::new();
        store.put_event(raw_event("Final", Some("final"))).await;
        let a = raw_event("Final", None);
        let b = raw_event("Final", None);
        store.put_event(a.clone()).await;
        store.put_event(b.clone()).await;

        let report = service(&store).backfill_slugs().await.unwrap();
        assert_eq!(report.updated.len(), 2);

        let mut slugs: Vec<String> = report.updated.iter().map(|u| u.slug.clone()).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["final-2".to_string(), "final-3".to_string()]);
    }

    #[tokio::test]
    async fn test_backfill_long_identical_titles() {
        let store = MemoryStore::new();
        let service = service(&store);
        service.create(input(LONG_TITLE, true)).await.unwrap();
        service.create(input(LONG_TITLE, true)).await.unwrap();
        for _ in 0..3 {
            store.put_event(raw_event(LONG_TITLE, None)).await;
        }

        let report = service.backfill_slugs().await.unwrap();
        assert!(report.failed.is_empty(), "{:?}", report.failed);
        assert_eq!(report.updated.len(), 3);

        let mut slugs: Vec<String> = report.updated.iter().map(|u| u.slug.clone()).collect();
        slugs.sort();
        assert_eq!(
            slugs,
            vec![
                "campeonato-nacional-de-baloncesto-juvenil-puerto-3".to_string(),
                "campeonato-nacional-de-baloncesto-juvenil-puerto-4".to_string(),
                "campeonato-nacional-de-baloncesto-juvenil-puerto-5".to_string(),
            ]
        );
    }

    /// Counts the reads a backfill issues against the wrapped store.
    #[derive(Clone)]
    struct CountingStore {
        inner: MemoryStore,
        prefix_lookups: Arc<AtomicUsize>,
        slug_listings: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EventStore for CountingStore {
        async fn list_events(&self) -> AppResult<Vec<Event>> {
            self.inner.list_events().await
        }

        async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>> {
            self.inner.get_event(id).await
        }

        async fn get_event_by_slug(&self, slug: &str) -> AppResult<Option<Event>> {
            self.inner.get_event_by_slug(slug).await
        }

        async fn insert_event(&self, event: NewEvent) -> AppResult<Event> {
            self.inner.insert_event(event).await
        }

        async fn update_event(&self, id: Uuid, event: NewEvent) -> AppResult<Option<Event>> {
            self.inner.update_event(id, event).await
        }

        async fn list_events_missing_slug(&self) -> AppResult<Vec<Event>> {
            self.inner.list_events_missing_slug().await
        }

        async fn list_slugs(&self) -> AppResult<Vec<String>> {
            self.slug_listings.fetch_add(1, Ordering::SeqCst);
            self.inner.list_slugs().await
        }

        async fn slugs_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
            self.prefix_lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.slugs_with_prefix(prefix).await
        }

        async fn assign_slug(&self, id: Uuid, slug: &str) -> AppResult<Option<Event>> {
            self.inner.assign_slug(id, slug).await
        }
    }

    #[tokio::test]
    async fn test_backfill_reads_existing_slugs_once() {
        let store = CountingStore {
            inner: MemoryStore::new(),
            prefix_lookups: Arc::new(AtomicUsize::new(0)),
            slug_listings: Arc::new(AtomicUsize::new(0)),
        };
        store.inner.put_event(raw_event("Final", Some("final"))).await;
        for title in ["Final", "Semi Final", "Kickoff", "Final"] {
            store.inner.put_event(raw_event(title, None)).await;
        }

        let service = EventService::new(Arc::new(store.clone()), &Config::default());
        let report = service.backfill_slugs().await.unwrap();

        assert_eq!(report.updated.len(), 4);
        assert_eq!(store.slug_listings.load(Ordering::SeqCst), 1);
        assert_eq!(store.prefix_lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backfill_skips_unusable_titles() {
        let store = MemoryStore::new();
        let event = raw_event("???", None);
        store.put_event(event.clone()).await;

        let report = service(&store).backfill_slugs().await.unwrap();
        assert_eq!(report.skipped, vec![event.id]);
        assert!(report.updated.is_empty());
    }

    #[tokio::test]
    async fn test_backfill_twice_is_a_no_op() {
        let store = MemoryStore::new();
        store.put_event(raw_event("Kickoff", None)).await;
        let service = service(&store);

        assert_eq!(service.backfill_slugs().await.unwrap().updated.len(), 1);
        let second = service.backfill_slugs().await.unwrap();
        assert_eq!(second.candidates, 0);
        assert!(second.updated.is_empty());
    }
}
