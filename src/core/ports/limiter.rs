use crate::error::Error;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub max_requests: usize,
    pub window: Duration,
}

impl Limit {
    pub const fn per_minute(max_requests: usize) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(60),
        }
    }
}

pub trait RateLimiter {
    /// Records one request for `action` by `identity`; `Error::RateLimited` once over the limit.
    fn check(&self, action: &str, identity: &str, limit: Limit) -> Result<(), Error>;
}
