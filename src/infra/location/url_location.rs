use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use url::Url;

use crate::usecase::ports::location::LocationAccessor;

/// In-process stand-in for the browser address bar.
#[derive(Debug)]
pub struct UrlLocation {
    url: Mutex<Url>,
}

impl UrlLocation {
    pub fn new(url: Url) -> Self {
        Self {
            url: Mutex::new(url),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("invalid shareable url: {raw}"))?;
        Ok(Self::new(url))
    }

    pub fn current(&self) -> Url {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Url> {
        self.url.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocationAccessor for UrlLocation {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.lock()
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    fn replace_query_pairs(&self, pairs: &[(String, String)]) {
        let mut url = self.lock();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !pairs.iter().any(|(replaced, _)| replaced == key))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept.iter().chain(pairs.iter()));
    }
}
