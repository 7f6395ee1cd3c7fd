use anyhow::Context;
use chrono::NaiveDateTime;
use serde_json::Value;
use url::Url;

use crate::{http::Fetch, schema::strip_schema};

/// The closest usable Wayback Machine capture of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub url: String,
    /// Compact `YYYYMMDDhhmmss` capture time, as the API reports it.
    pub timestamp: String,
}

/// Ask the availability API at `endpoint` for the closest snapshot of `url`.
///
/// Anything short of an available capture with status `"200"` is `Ok(None)`; only transport
/// failures are errors.
pub fn lookup(fetch: &dyn Fetch, endpoint: &Url, url: &str) -> anyhow::Result<Option<Snapshot>> {
    if url.is_empty() {
        return Ok(None);
    }
    let mut api = endpoint.clone();
    api.query_pairs_mut().append_pair("url", strip_schema(url));

    let page = fetch
        .get(&api)
        .with_context(|| format!("archive lookup failed for {url}"))?;
    if !page.is_ok() {
        tracing::debug!(status = page.status, "archive API answered without data");
        return Ok(None);
    }
    let body: Value = match serde_json::from_str(&page.body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("archive API returned unreadable JSON: {e}");
            return Ok(None);
        }
    };
    Ok(closest_snapshot(&body))
}

/// Pull the closest snapshot out of an availability response.
pub fn closest_snapshot(body: &Value) -> Option<Snapshot> {
    let closest = body.get("archived_snapshots")?.get("closest")?;
    if !closest.get("available")?.as_bool()? {
        return None;
    }
    if closest.get("status")?.as_str()? != "200" {
        return None;
    }
    Some(Snapshot {
        url: closest.get("url")?.as_str()?.to_string(),
        timestamp: closest.get("timestamp")?.as_str()?.to_string(),
    })
}

/// `20200615143022` → `2020-06-15T14:30:22`.
pub fn iso_timestamp(compact: &str) -> Option<String> {
    if compact.len() != 14 || !compact.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(compact, "%Y%m%d%H%M%S")
        .ok()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::fake::FakeWeb;

    fn endpoint() -> Url {
        Url::parse("https://archive.org/wayback/available").unwrap()
    }

    fn success() -> Value {
        json!({
            "url": "example.com",
            "archived_snapshots": {
                "closest": {
                    "status": "200",
                    "available": true,
                    "url": "http://web.archive.org/web/20190101000000/https://example.com",
                    "timestamp": "20190101000000"
                }
            }
        })
    }

    #[test]
    fn well_formed_body_yields_snapshot() {
        let snap = closest_snapshot(&success()).expect("snapshot");
        assert_eq!(
            snap.url,
            "http://web.archive.org/web/20190101000000/https://example.com"
        );
        assert_eq!(snap.timestamp, "20190101000000");
    }

    #[test]
    fn unavailable_snapshot_is_no_result() {
        let mut body = success();
        body["archived_snapshots"]["closest"]["available"] = json!(false);
        assert!(closest_snapshot(&body).is_none());
    }

    #[test]
    fn non_200_capture_is_no_result() {
        let mut body = success();
        body["archived_snapshots"]["closest"]["status"] = json!("404");
        assert!(closest_snapshot(&body).is_none());
    }

    #[test]
    fn missing_keys_are_no_result() {
        assert!(closest_snapshot(&json!({"url": "x", "archived_snapshots": {}})).is_none());
        assert!(closest_snapshot(&json!({})).is_none());
        let mut body = success();
        body["archived_snapshots"]["closest"]
            .as_object_mut()
            .unwrap()
            .remove("url");
        assert!(closest_snapshot(&body).is_none());
    }

    #[test]
    fn lookup_sends_schemeless_key() {
        let web = FakeWeb::new().page(
            "https://archive.org/wayback/available?url=example.com%2Fpage",
            200,
            &success().to_string(),
        );
        let snap = lookup(&web, &endpoint(), "https://example.com/page").unwrap();
        assert!(snap.is_some());
        assert_eq!(web.request_count(), 1);
    }

    #[test]
    fn lookup_skips_empty_url_and_error_statuses() {
        let web = FakeWeb::new();
        assert_eq!(lookup(&web, &endpoint(), "").unwrap(), None);
        assert_eq!(web.request_count(), 0);
        assert_eq!(lookup(&web, &endpoint(), "https://example.com").unwrap(), None);
        assert_eq!(web.request_count(), 1);
    }

    #[test]
    fn lookup_tolerates_garbage_json() {
        let web = FakeWeb::new().page(
            "https://archive.org/wayback/available?url=example.com",
            200,
            "<html>busy</html>",
        );
        assert_eq!(lookup(&web, &endpoint(), "http://example.com").unwrap(), None);
    }

    #[test]
    fn timestamp_to_iso() {
        assert_eq!(
            iso_timestamp("20200615143022").as_deref(),
            Some("2020-06-15T14:30:22")
        );
        assert_eq!(
            iso_timestamp("20190101000000").as_deref(),
            Some("2019-01-01T00:00:00")
        );
        assert_eq!(iso_timestamp("2019010100000"), None);
        assert_eq!(iso_timestamp("20191301000000"), None);
    }
}
