//! Cache of display names and avatars keyed by uid.
//!
//! Lookups never block rendering: `get` answers from the cache or with a
//! placeholder, and `request` schedules a background batch fetch. Every id
//! requested before the flush task first runs goes out in a single call.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::WeekboardResult;
use crate::protocol::lenient_offset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_offset", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<f64>,
}

impl UserInfo {
    /// Stand-in shown until (or instead of) a real lookup: the id as its name.
    pub fn placeholder(id: &str) -> Self {
        UserInfo {
            id: id.to_string(),
            name: id.to_string(),
            email: None,
            avatar_path: None,
            time_zone: None,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Batch lookup of user info, implemented by the API client.
#[async_trait]
pub trait UserInfoFetcher: Send + Sync + 'static {
    async fn fetch(&self, ids: &[String]) -> WeekboardResult<Vec<UserInfo>>;
}

#[derive(Debug, Default)]
struct DirectoryState {
    cache: HashMap<String, UserInfo>,
    in_flight: HashSet<String>,
    pending: Vec<String>,
    flush_scheduled: bool,
}

pub struct UserDirectory<F> {
    fetcher: Arc<F>,
    state: Arc<Mutex<DirectoryState>>,
}

impl<F> Clone for UserDirectory<F> {
    fn clone(&self) -> Self {
        UserDirectory {
            fetcher: Arc::clone(&self.fetcher),
            state: Arc::clone(&self.state),
        }
    }
}

impl<F: UserInfoFetcher> UserDirectory<F> {
    pub fn new(fetcher: F) -> Self {
        UserDirectory {
            fetcher: Arc::new(fetcher),
            state: Arc::new(Mutex::new(DirectoryState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DirectoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue ids for lookup, skipping ones already cached, in flight or queued.
    ///
    /// Returns the handle of the flush task when this call scheduled one.
    /// Outside a tokio runtime nothing is fetched and `None` is returned.
    pub fn request<I, S>(&self, ids: I) -> Option<JoinHandle<()>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.lock();
        for id in ids {
            let id = id.as_ref();
            if id.is_empty()
                || state.cache.contains_key(id)
                || state.in_flight.contains(id)
                || state.pending.iter().any(|p| p == id)
            {
                continue;
            }
            state.pending.push(id.to_string());
        }

        if state.pending.is_empty() || state.flush_scheduled {
            return None;
        }

        let Ok(handle) = Handle::try_current() else {
            tracing::warn!("no async runtime, user info lookups skipped");
            return None;
        };
        state.flush_scheduled = true;
        drop(state);

        let directory = self.clone();
        Some(handle.spawn(async move {
            tokio::task::yield_now().await;
            directory.flush().await;
        }))
    }

    async fn flush(&self) {
        let batch = {
            let mut state = self.lock();
            state.flush_scheduled = false;
            let batch = std::mem::take(&mut state.pending);
            state.in_flight.extend(batch.iter().cloned());
            batch
        };

        if batch.is_empty() {
            return;
        }

        tracing::debug!(count = batch.len(), "fetching user info");
        let result = self.fetcher.fetch(&batch).await;

        let mut state = self.lock();
        match result {
            Ok(users) => {
                for user in users {
                    if batch.contains(&user.id) {
                        state.cache.insert(user.id.clone(), user);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, count = batch.len(), "user info lookup failed, using placeholders");
            }
        }

        for id in batch {
            state.in_flight.remove(&id);
            state
                .cache
                .entry(id)
                .or_insert_with_key(|id| UserInfo::placeholder(id));
        }
    }

    /// Cached info for `id`, or a placeholder when it is not known yet.
    pub fn get(&self, id: &str) -> UserInfo {
        self.lock()
            .cache
            .get(id)
            .cloned()
            .unwrap_or_else(|| UserInfo::placeholder(id))
    }

    pub fn is_cached(&self, id: &str) -> bool {
        self.lock().cache.contains_key(id)
    }
}
