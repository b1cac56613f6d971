// ABOUTME: Parsing for the `latest` and `no` query parameters.
// ABOUTME: Both are lenient: a bad value never rejects the request, it falls back to a fixed value.

/// Number of results returned when `no` is missing or unusable.
pub const DEFAULT_RESULT_COUNT: usize = 100;

/// Value recorded for `latest` when it is missing or not an integer.
pub const UNPARSEABLE_LATEST: i64 = -1;

/// Parse the `latest` query parameter. A missing or malformed value yields
/// -1 rather than `None` so that the tracker reports it instead of keeping
/// stale data.
pub fn parse_latest(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(UNPARSEABLE_LATEST)
}

/// Parse the `no` query parameter. Only strictly positive integers replace
/// the default of 100.
pub fn parse_result_count(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|n| *n > 0)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(DEFAULT_RESULT_COUNT)
}
