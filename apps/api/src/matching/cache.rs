//! Redis-backed match score cache.
//!
//! Scores are cached per resume for 24 hours and invalidated by an explicit
//! re-match (`refresh=true`). Every failure here is non-fatal: a broken cache
//! degrades to a recompute, never to an error response.

use redis::AsyncCommands;
use tracing::warn;
use uuid::Uuid;

use crate::matching::pipeline::MatchScore;

/// Cached scores expire after 24 hours.
pub const SCORE_TTL_SECS: u64 = 86_400;

pub fn cache_key(resume_id: Uuid) -> String {
    format!("match_scores:{resume_id}")
}

pub async fn get_cached_scores(client: &redis::Client, resume_id: Uuid) -> Option<Vec<MatchScore>> {
    let mut conn = match client.get_multiplexed_async_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("score cache unavailable: {e}");
            return None;
        }
    };

    let raw: Option<String> = match conn.get(cache_key(resume_id)).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("score cache read failed: {e}");
            return None;
        }
    };

    raw.and_then(|raw| serde_json::from_str(&raw).ok())
}

pub async fn put_cached_scores(client: &redis::Client, resume_id: Uuid, scores: &[MatchScore]) {
    let Ok(mut conn) = client.get_multiplexed_async_connection().await else {
        return;
    };
    let Ok(raw) = serde_json::to_string(scores) else {
        return;
    };
    if let Err(e) = conn
        .set_ex::<_, _, ()>(cache_key(resume_id), raw, SCORE_TTL_SECS)
        .await
    {
        warn!("score cache write failed: {e}");
    }
}

pub async fn invalidate_cached_scores(client: &redis::Client, resume_id: Uuid) {
    let Ok(mut conn) = client.get_multiplexed_async_connection().await else {
        return;
    };
    if let Err(e) = conn.del::<_, ()>(cache_key(resume_id)).await {
        warn!("score cache invalidation failed: {e}");
    }
}
