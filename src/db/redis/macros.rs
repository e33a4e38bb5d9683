/// Read-through caching over a [`Cache`](crate::db::Cache).
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues
/// the result for a background write with `$ttl` seconds to live, and returns
/// it. A failing cache read is logged and handled as a miss, so an
/// unavailable Redis never fails the underlying request.
///
/// # Arguments
/// * `$cache`: value with `get_from_cache` and `set_in_background` methods.
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: future producing `AppResult<T>` on a miss.
///
/// # Example
/// ```rust,ignore
/// let film: FilmDetail = cached!(self.cache, CacheKey::Film(id), FILM_CACHE_TTL, async move {
///     self.request_film(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, cache_key = %key, "Cache read failed, treating as miss");
                None
            }
        };

        match hit {
            Some(cached) => {
                tracing::debug!(cache_key = %key, "Cache hit");
                Ok(cached)
            }
            None => match $block.await {
                Ok(value) => {
                    $cache.set_in_background(&key, &value, $ttl);
                    Ok(value)
                }
                Err(e) => Err(e),
            },
        }
    }};
}
