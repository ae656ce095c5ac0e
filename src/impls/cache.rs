use crate::core::models::survey::Survey;
use moka::sync::Cache;
use std::time::Duration;

pub const TTL: Duration = Duration::from_secs(60);
const CAPACITY: u64 = 1_000;

/// Short-lived copies of survey rows for read paths. Never authoritative; every
/// write touching a survey or its children drops the entry.
#[derive(Clone)]
pub struct SurveyCache {
    inner: Cache<i64, Survey>,
}

impl SurveyCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().time_to_live(ttl).max_capacity(CAPACITY).build(),
        }
    }

    pub fn get(&self, id: i64) -> Option<Survey> {
        self.inner.get(&id)
    }

    pub fn insert(&self, survey: Survey) {
        self.inner.insert(survey.id, survey);
    }

    pub fn invalidate(&self, id: i64) {
        self.inner.invalidate(&id);
    }
}

impl Default for SurveyCache {
    fn default() -> Self {
        Self::new(TTL)
    }
}
