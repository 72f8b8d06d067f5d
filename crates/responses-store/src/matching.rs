//! Trigger matching.

use crate::error::StoreError;
use crate::types::{MatchMode, ResponseRecord};
use fancy_regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::warn;

/// Upper bound on the compiled non-backtracking parts of a trigger, since
/// patterns come from chat users.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Backtracking steps allowed per match before giving up.
const BACKTRACK_LIMIT: usize = 1_000_000;

/// Compiled triggers kept across messages. Cleared wholesale when full.
const CACHE_CAPACITY: usize = 512;

static PATTERN_CACHE: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();

/// Check a single trigger against message text.
///
/// Only `Regex` mode can fail: `InvalidPattern` when the trigger does not
/// compile, `MatchAborted` when matching hits the backtracking limit.
pub fn trigger_matches(
    record: &ResponseRecord,
    text: &str,
    mode: MatchMode,
) -> Result<bool, StoreError> {
    match mode {
        MatchMode::Exact => Ok(text == record.trigger),
        MatchMode::Includes => Ok(text.contains(record.trigger.as_str())),
        MatchMode::Regex => {
            let re = cached_pattern(&record.trigger).map_err(|source| {
                StoreError::InvalidPattern {
                    name: record.name.clone(),
                    source,
                }
            })?;
            run_pattern(record, &re, text)
        }
    }
}

fn compile(trigger: &str, backtrack_limit: usize) -> Result<Regex, fancy_regex::Error> {
    RegexBuilder::new(trigger)
        .case_insensitive(true)
        .delegate_size_limit(REGEX_SIZE_LIMIT)
        .backtrack_limit(backtrack_limit)
        .build()
}

fn lock_cache() -> MutexGuard<'static, HashMap<String, Regex>> {
    PATTERN_CACHE
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Compile `trigger`, reusing an earlier compilation when there is one.
/// Failed compilations are not cached.
fn cached_pattern(trigger: &str) -> Result<Regex, fancy_regex::Error> {
    if let Some(re) = lock_cache().get(trigger) {
        return Ok(re.clone());
    }

    let re = compile(trigger, BACKTRACK_LIMIT)?;

    let mut cache = lock_cache();
    if cache.len() >= CACHE_CAPACITY {
        cache.clear();
    }
    cache.insert(trigger.to_string(), re.clone());
    Ok(re)
}

fn run_pattern(record: &ResponseRecord, re: &Regex, text: &str) -> Result<bool, StoreError> {
    re.is_match(text).map_err(|source| StoreError::MatchAborted {
        name: record.name.clone(),
        source,
    })
}

/// First record, in the given order, whose trigger matches `text`.
///
/// Records whose pattern is invalid or too expensive to match are logged
/// and skipped.
pub fn first_match<'a, I>(records: I, text: &str, mode: MatchMode) -> Option<&'a ResponseRecord>
where
    I: IntoIterator<Item = &'a ResponseRecord>,
{
    records
        .into_iter()
        .find(|record| match trigger_matches(record, text, mode) {
            Ok(matched) => matched,
            Err(e) => {
                warn!(guild_id = %record.guild_id, "Skipping trigger {}: {}", record.name, e);
                false
            }
        })
}
