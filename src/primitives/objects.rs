//! Object history queries.
//!
//! Lookups against the custody timeline, keyed by object or by person. The `find_*` forms poll until the
//! object appears or the budget runs out; no store lock is held between
//! polls, so camera workers keep appending while a caller waits.

use crate::config::QueryConfig;
use crate::error::{Error, Result};
use crate::types::{is_trackable, ObjectHistory, PersonActivity, PersonId, TimelineEvent};
use backtrack_primitives::{EmbeddingStore, Timeline};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of a lost-object lookup
#[derive(Debug, Clone, PartialEq)]
pub struct LostObject {
    /// Registered identity the embedding matched
    pub person: PersonId,
    /// The object's history, if it appeared within the budget
    pub history: Option<ObjectHistory>,
}

/// Object history operations.
///
/// Access via `bt.objects`.
pub struct Objects {
    timeline: Arc<Timeline>,
    embeddings: Arc<EmbeddingStore>,
    query: QueryConfig,
}

impl Objects {
    pub(crate) fn new(
        timeline: Arc<Timeline>,
        embeddings: Arc<EmbeddingStore>,
        query: QueryConfig,
    ) -> Self {
        Self {
            timeline,
            embeddings,
            query,
        }
    }

    /// Current history of `label`, without waiting.
    pub fn history(&self, label: &str) -> Option<ObjectHistory> {
        self.timeline.history(label)
    }

    /// Raw events of `label`, oldest first.
    pub fn events(&self, label: &str) -> Vec<TimelineEvent> {
        self.timeline.events(label)
    }

    /// Labels with at least one event, sorted.
    pub fn tracked(&self) -> Vec<String> {
        self.timeline.tracked_objects()
    }

    /// What `person` carried, across every object, and where they were last
    /// seen holding or putting something down. `None` if the timeline never
    /// names them.
    ///
    /// # Example
    ///
    /// ```ignore
    /// if let Some(a) = bt.objects.by_person(&PersonId::from("Person_003")) {
    ///     println!("carried {:?}, last on camera {}", a.objects, a.last_camera);
    /// }
    /// ```
    pub fn by_person(&self, person: &PersonId) -> Option<PersonActivity> {
        self.timeline.person_activity(person)
    }

    /// Activity summary for every person in the timeline, by person id
    pub fn people(&self) -> Vec<PersonActivity> {
        self.timeline.people()
    }

    /// Append an event directly, bypassing the camera workers.
    ///
    /// # Errors
    /// - `InvalidInput` for an untrackable label or an event older than the
    ///   label's latest
    pub fn append(&self, event: TimelineEvent) -> Result<()> {
        Ok(self.timeline.append(event)?)
    }

    /// Poll for `label`'s history using the configured budget.
    pub fn find_history(&self, label: &str) -> Result<Option<ObjectHistory>> {
        self.find_history_within(label, self.query.find_timeout())
    }

    /// Poll for `label`'s history until it exists or `budget` elapses.
    ///
    /// Returns the first successful lookup, or `None` when the budget runs
    /// out. A zero budget looks exactly once.
    ///
    /// # Errors
    /// - `InvalidInput` if `label` is not a trackable object
    ///
    /// # Example
    ///
    /// ```ignore
    /// match bt.objects.find_history_within("backpack", Duration::from_secs(5))? {
    ///     Some(h) => println!("{} at camera {}", h.current_status, h.current_camera),
    ///     None => println!("never seen"),
    /// }
    /// ```
    pub fn find_history_within(
        &self,
        label: &str,
        budget: Duration,
    ) -> Result<Option<ObjectHistory>> {
        check_label(label)?;
        let found = poll(budget, self.query.poll_interval(), || {
            self.timeline.history(label)
        });
        if found.is_none() {
            debug!(object = %label, budget_ms = budget.as_millis() as u64, "history lookup timed out");
        }
        Ok(found)
    }

    /// Identify who is asking, then poll for the object's history.
    ///
    /// # Errors
    /// - `NotFound` if the embedding matches no registered identity
    /// - `InvalidInput` for a bad embedding or an untrackable label
    pub fn find_lost(
        &self,
        person_embedding: &[f32],
        label: &str,
        budget: Duration,
    ) -> Result<LostObject> {
        check_label(label)?;
        let person = self
            .embeddings
            .match_registered(person_embedding)?
            .ok_or_else(|| Error::NotFound("no registered identity matches".to_string()))?;
        let history = self.find_history_within(label, budget)?;
        Ok(LostObject { person, history })
    }
}

fn check_label(label: &str) -> Result<()> {
    if is_trackable(label) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("unknown object label: {}", label)))
    }
}

/// Call `check` every `interval` until it yields or `budget` elapses.
///
/// A budget too large to land on a representable instant never runs out.
fn poll<T>(budget: Duration, interval: Duration, mut check: impl FnMut() -> Option<T>) -> Option<T> {
    if let Some(hit) = check() {
        return Some(hit);
    }
    let deadline = Instant::now().checked_add(budget);
    loop {
        let wait = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return None;
                }
                interval.min(deadline - now)
            }
            None => interval,
        };
        thread::sleep(wait);
        if let Some(hit) = check() {
            return Some(hit);
        }
    }
}
