//! Time-boxed cache around the recipe-of-the-day flow.
//!
//! One slot, regenerated when it is empty, older than the revalidation window,
//! or invalidated. Fresh reads only take the read lock; stale readers queue on
//! a single regeneration lock and re-check freshness once they hold it, so
//! concurrent callers share one backend round-trip.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use crate::error::GenerationError;
use crate::types::Recipe;

/// Tag that invalidates the recipe of the day.
pub const RECIPE_OF_THE_DAY_TAG: &str = "recipe-of-the-day";

/// How long a generated recipe is served before it is regenerated.
pub const REVALIDATE_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let by = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::MAX);
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = now.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Produces a new recipe when the cache needs one.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn generate(&self) -> Result<Recipe, GenerationError>;
}

/// The cached recipe and when it was generated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedRecipe {
    pub recipe: Recipe,
    pub generated_at: DateTime<Utc>,
    #[serde(skip)]
    epoch: u64,
}

/// Cache for the daily featured recipe.
pub struct DailyRecipeCache {
    source: Arc<dyn RecipeSource>,
    clock: Arc<dyn Clock>,
    window: Duration,
    slot: RwLock<Option<CachedRecipe>>,
    epoch: AtomicU64,
    regenerate: Mutex<()>,
}

impl DailyRecipeCache {
    /// Create an empty cache using the default 24 hour window.
    pub fn new(source: Arc<dyn RecipeSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            window: REVALIDATE_WINDOW,
            slot: RwLock::new(None),
            epoch: AtomicU64::new(0),
            regenerate: Mutex::new(()),
        }
    }

    /// Override the revalidation window.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Return the cached recipe, regenerating it first if stale.
    ///
    /// A failed regeneration leaves the slot untouched and propagates the error.
    pub async fn get(&self) -> Result<Recipe, GenerationError> {
        Ok(self.get_entry().await?.recipe)
    }

    /// Like [`get`](Self::get) but includes the generation time.
    pub async fn get_entry(&self) -> Result<CachedRecipe, GenerationError> {
        if let Some(entry) = self.fresh().await {
            tracing::debug!(generated_at = %entry.generated_at, "Recipe of the day cache hit");
            return Ok(entry);
        }

        let _guard = self.regenerate.lock().await;

        // Someone else may have regenerated while we waited.
        if let Some(entry) = self.fresh().await {
            return Ok(entry);
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        tracing::info!(epoch, "Regenerating recipe of the day");

        let recipe = match self.source.generate().await {
            Ok(recipe) => recipe,
            Err(e) => {
                tracing::warn!(error = %e, "Recipe of the day regeneration failed");
                return Err(e);
            }
        };

        let entry = CachedRecipe {
            recipe,
            generated_at: self.clock.now(),
            epoch,
        };
        *self.slot.write().await = Some(entry.clone());

        tracing::info!(recipe = %entry.recipe.name, "Recipe of the day regenerated");
        Ok(entry)
    }

    /// Force the next [`get`](Self::get) to regenerate.
    ///
    /// A regeneration already in flight still stores its result, but that
    /// result counts as stale.
    pub fn invalidate(&self) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(epoch, "Recipe of the day invalidated");
    }

    /// Invalidate if `tag` names this cache. Returns whether it did.
    pub fn invalidate_tag(&self, tag: &str) -> bool {
        if tag == RECIPE_OF_THE_DAY_TAG {
            self.invalidate();
            true
        } else {
            tracing::debug!(tag = tag, "Ignoring invalidation for unknown tag");
            false
        }
    }

    /// Current slot contents, fresh or not, without regenerating.
    pub async fn peek(&self) -> Option<CachedRecipe> {
        self.slot.read().await.clone()
    }

    async fn fresh(&self) -> Option<CachedRecipe> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|entry| self.is_fresh(entry))
            .cloned()
    }

    fn is_fresh(&self, entry: &CachedRecipe) -> bool {
        if entry.epoch != self.epoch.load(Ordering::SeqCst) {
            return false;
        }
        // A clock that moved backwards yields a negative age, which counts as fresh.
        match self
            .clock
            .now()
            .signed_duration_since(entry.generated_at)
            .to_std()
        {
            Ok(age) => age < self.window,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiError, FakeAiClient, RecipeOfTheDayFlow};
    use crate::types::Difficulty;
    use chrono::TimeZone;
    use std::sync::atomic::AtomicUsize;

    /// Numbered recipes, optionally slow, optionally failing.
    struct CountingSource {
        calls: AtomicUsize,
        delay: Duration,
        fail: bool,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RecipeSource for CountingSource {
        async fn generate(&self) -> Result<Recipe, GenerationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(AiError::RequestFailed("backend down".to_string()).into());
            }
            Ok(Recipe {
                name: format!("Daily Special #{n}"),
                ingredients: vec!["rice".to_string()],
                instructions: "Cook it.".to_string(),
                difficulty: Difficulty::Easy,
                cooking_time: "10 minutes".to_string(),
                cuisine: "Any".to_string(),
                nutritional_info: None,
                image_url: Some("data:image/png;base64,AAAA".to_string()),
            })
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    fn cache(source: Arc<CountingSource>, clock: Arc<ManualClock>) -> DailyRecipeCache {
        DailyRecipeCache::new(source, clock)
    }

    #[tokio::test]
    async fn test_cold_then_warm() {
        let source = Arc::new(CountingSource::new());
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(source.clone(), clock.clone());

        let first = cache.get().await.unwrap();
        assert_eq!(source.calls(), 1);

        let second = cache.get().await.unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(first, second);

        let entry = cache.peek().await.unwrap();
        assert_eq!(entry.generated_at, start());
    }

    #[tokio::test]
    async fn test_window_expiry() {
        let source = Arc::new(CountingSource::new());
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(source.clone(), clock.clone());

        cache.get().await.unwrap();
        clock.advance(Duration::from_secs(23 * 60 * 60));
        cache.get().await.unwrap();
        assert_eq!(source.calls(), 1);

        clock.advance(Duration::from_secs(60 * 60));
        let recipe = cache.get().await.unwrap();
        assert_eq!(source.calls(), 2);
        assert_eq!(recipe.name, "Daily Special #2");
        assert_eq!(cache.peek().await.unwrap().generated_at, clock.now());
    }

    #[tokio::test]
    async fn test_custom_window() {
        let source = Arc::new(CountingSource::new());
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(source.clone(), clock.clone()).with_window(Duration::from_secs(60));

        cache.get().await.unwrap();
        clock.advance(Duration::from_secs(61));
        cache.get().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_regeneration() {
        let source = Arc::new(CountingSource::new());
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(source.clone(), clock.clone());

        cache.get().await.unwrap();
        cache.invalidate();
        let recipe = cache.get().await.unwrap();
        assert_eq!(source.calls(), 2);
        assert_eq!(recipe.name, "Daily Special #2");
    }

    #[tokio::test]
    async fn test_invalidate_tag() {
        let source = Arc::new(CountingSource::new());
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(source.clone(), clock.clone());

        cache.get().await.unwrap();
        assert!(!cache.invalidate_tag("saved-recipes"));
        cache.get().await.unwrap();
        assert_eq!(source.calls(), 1);

        assert!(cache.invalidate_tag(RECIPE_OF_THE_DAY_TAG));
        cache.get().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_entry() {
        let clock = Arc::new(ManualClock::new(start()));
        let failing = Arc::new(CountingSource {
            fail: true,
            ..CountingSource::new()
        });
        let cache = cache(failing.clone(), clock);

        assert!(cache.get().await.is_err());
        assert!(cache.peek().await.is_none());
        assert!(cache.get().await.is_err());
        assert_eq!(failing.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_stale_reads_share_one_regeneration() {
        let source = Arc::new(CountingSource {
            delay: Duration::from_millis(200),
            ..CountingSource::new()
        });
        let clock = Arc::new(ManualClock::new(start()));
        let cache = Arc::new(cache(source.clone(), clock));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get().await })
            })
            .collect();

        for handle in handles {
            let recipe = handle.await.unwrap().unwrap();
            assert_eq!(recipe.name, "Daily Special #1");
        }
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_during_regeneration_marks_result_stale() {
        let source = Arc::new(CountingSource {
            delay: Duration::from_millis(200),
            ..CountingSource::new()
        });
        let clock = Arc::new(ManualClock::new(start()));
        let cache = Arc::new(cache(source.clone(), clock));

        let in_flight = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.invalidate();

        let first = in_flight.await.unwrap().unwrap();
        assert_eq!(first.name, "Daily Special #1");

        let next = cache.get().await.unwrap();
        assert_eq!(next.name, "Daily Special #2");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_with_recipe_of_the_day_flow() {
        let client = Arc::new(FakeAiClient::with_recipe_responses());
        let flow = Arc::new(RecipeOfTheDayFlow::new(client.clone(), false));
        let cache = DailyRecipeCache::new(flow, Arc::new(SystemClock));

        let recipe = cache.get().await.unwrap();
        assert!(recipe.image_url.is_some());
        cache.get().await.unwrap();
        assert_eq!(client.completion_calls(), 1);
        assert_eq!(client.image_calls(), 1);
    }
}
