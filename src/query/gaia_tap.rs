//! Gaia archive TAP client
//!
//! This module queries the ESA Gaia archive with synchronous ADQL requests
//! and decodes the CSV results into star records.

use std::io::Cursor;
use std::thread;
use std::time::Duration;

use super::{ConeQuery, StarQuery, StarStream};
use crate::catalogs::{read_gaia_csv, GAIA_COLUMNS};
use crate::{ExoskyError, Result};

/// Gaia archive TAP service root
pub const GAIA_TAP_URL: &str = "https://gea.esac.esa.int/tap-server/tap";

/// Table queried for bright stars
const GAIA_SOURCE_TABLE: &str = "gaiadr3.gaia_source";

/// Longest slice of an error body kept in a message
const ERROR_BODY_PREVIEW: usize = 200;

/// Client for the Gaia TAP synchronous endpoint
#[derive(Debug, Clone)]
pub struct GaiaTapClient {
    client: reqwest::blocking::Client,
    base_url: String,
    retries: u32,
    backoff: Duration,
}

impl GaiaTapClient {
    /// Create a client with a per-request timeout and a retry budget
    ///
    /// `retries` counts extra attempts after the first. Waits between attempts
    /// double, starting at 500 ms.
    pub fn new(base_url: impl Into<String>, timeout: Duration, retries: u32) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExoskyError::Query(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retries,
            backoff: Duration::from_millis(500),
        })
    }

    /// Override the initial wait between retries
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn sync_url(&self) -> String {
        format!("{}/sync", self.base_url)
    }

    /// ADQL text for a cone query
    pub fn adql(query: &ConeQuery) -> String {
        let mut adql = format!(
            "SELECT TOP {} source_id, ra, dec, parallax, phot_g_mean_mag \
             FROM {} \
             WHERE parallax > 0 AND phot_g_mean_mag < {}",
            query.limit, GAIA_SOURCE_TABLE, query.max_magnitude
        );

        if let Some(radius) = query.radius_deg {
            adql.push_str(&format!(
                " AND 1 = CONTAINS(POINT('ICRS', ra, dec), CIRCLE('ICRS', {}, {}, {}))",
                query.ra_deg, query.dec_deg, radius
            ));
        }

        adql
    }

    /// Run one ADQL request, retrying transport failures and 5xx responses
    fn fetch(&self, adql: &str) -> Result<Vec<u8>> {
        let url = self.sync_url();
        let form = [
            ("REQUEST", "doQuery"),
            ("LANG", "ADQL"),
            ("FORMAT", "csv"),
            ("QUERY", adql),
        ];

        let mut attempt = 0;
        loop {
            let failure = match self.client.post(&url).form(&form).send() {
                Ok(response) if response.status().is_success() => {
                    return response
                        .bytes()
                        .map(|body| body.to_vec())
                        .map_err(|e| ExoskyError::Query(format!("Failed to read TAP response: {}", e)));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.bytes().map(|b| b.to_vec()).unwrap_or_default();
                    let message = format!("Gaia TAP returned {}: {}", status, preview(&body));
                    if status.is_client_error() {
                        return Err(ExoskyError::Query(message));
                    }
                    message
                }
                Err(e) if e.is_timeout() => format!("Gaia TAP request timed out: {}", e),
                Err(e) => format!("Gaia TAP request failed: {}", e),
            };

            if attempt >= self.retries {
                return Err(ExoskyError::Query(failure));
            }

            let wait = self.backoff * 2u32.saturating_pow(attempt);
            log::warn!(
                "{} (attempt {}/{}), retrying in {:?}",
                failure,
                attempt + 1,
                self.retries + 1,
                wait
            );
            thread::sleep(wait);
            attempt += 1;
        }
    }
}

impl StarQuery for GaiaTapClient {
    fn query(&self, query: &ConeQuery) -> Result<StarStream> {
        let adql = Self::adql(query);
        log::debug!("Gaia ADQL: {}", adql);

        let body = self.fetch(&adql)?;
        log::debug!("Gaia TAP returned {} bytes", body.len());
        check_csv_body(&body)?;

        Ok(Box::new(read_gaia_csv(Cursor::new(body)).take(query.limit)))
    }
}

/// First characters of a response body, for error messages
fn preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .trim()
        .chars()
        .take(ERROR_BODY_PREVIEW)
        .collect()
}

/// Reject a successful response that is not a Gaia CSV table
///
/// TAP services report query failures as VOTable documents with status 200,
/// and proxies answer with HTML pages.
fn check_csv_body(body: &[u8]) -> Result<()> {
    if body.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'<') {
        return Err(ExoskyError::Query(format!(
            "Gaia TAP returned markup instead of CSV: {}",
            preview(body)
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(body);
    let headers = reader.headers().map_err(|e| {
        ExoskyError::Query(format!("Gaia TAP returned unreadable CSV: {}", e))
    })?;

    let missing: Vec<&str> = GAIA_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(ExoskyError::Query(format!(
            "Gaia TAP result lacks columns {}: {}",
            missing.join(", "),
            preview(body)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const CSV_BODY: &str = "\
source_id,ra,dec,parallax,phot_g_mean_mag
6752096595359340032,101.2874,-16.7161,379.21,-1.46
4472832130942575872,269.45,4.69,546.98,5.19
";

    const VOTABLE_ERROR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<VOTABLE version="1.3"><RESOURCE type="results">
<INFO name="QUERY_STATUS" value="ERROR">Query timed out</INFO>
</RESOURCE></VOTABLE>"#;

    /// Read one HTTP request, headers plus a Content-Length body
    fn read_request(stream: &mut std::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = match stream.read(&mut chunk) {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);

            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }

    /// Local TAP stand-in answering with `responses` in turn (the last one
    /// repeats). Returns the service root and a request counter.
    fn tap_server(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/tap", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                read_request(&mut stream);
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses[n.min(responses.len() - 1)];
                let reply = format!(
                    "HTTP/1.1 {} Status\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(reply.as_bytes());
                let _ = stream.flush();
            }
        });

        (url, hits)
    }

    fn client(url: &str, retries: u32) -> GaiaTapClient {
        GaiaTapClient::new(url, Duration::from_secs(5), retries)
            .unwrap()
            .with_backoff(Duration::from_millis(1))
    }

    fn query_error(result: Result<StarStream>) -> String {
        match result {
            Err(ExoskyError::Query(message)) => message,
            Err(other) => panic!("expected query error, got {:?}", other),
            Ok(_) => panic!("expected query error, got stars"),
        }
    }

    #[test]
    fn test_adql_whole_sky() {
        let adql = GaiaTapClient::adql(&ConeQuery::around(10.0, 20.0));
        assert_eq!(
            adql,
            "SELECT TOP 1000 source_id, ra, dec, parallax, phot_g_mean_mag \
             FROM gaiadr3.gaia_source \
             WHERE parallax > 0 AND phot_g_mean_mag < 6"
        );
    }

    #[test]
    fn test_adql_cone() {
        let query = ConeQuery::around(217.5, -62.5)
            .with_radius(Some(15.0))
            .with_limit(50)
            .with_max_magnitude(4.5);
        let adql = GaiaTapClient::adql(&query);

        assert!(adql.starts_with("SELECT TOP 50 "));
        assert!(adql.contains("phot_g_mean_mag < 4.5"));
        assert!(adql.ends_with(
            "AND 1 = CONTAINS(POINT('ICRS', ra, dec), CIRCLE('ICRS', 217.5, -62.5, 15))"
        ));
    }

    #[test]
    fn test_sync_url_trims_slash() {
        let client =
            GaiaTapClient::new("https://example.org/tap/", Duration::from_secs(5), 0).unwrap();
        assert_eq!(client.sync_url(), "https://example.org/tap/sync");
    }

    #[test]
    fn test_unreachable_service_is_query_error() {
        // Port 9 on localhost refuses connections immediately
        let client = GaiaTapClient::new("http://127.0.0.1:9/tap", Duration::from_secs(2), 1)
            .unwrap()
            .with_backoff(Duration::from_millis(1));

        let result = client.query(&ConeQuery::around(0.0, 0.0));
        match result {
            Err(ExoskyError::Query(message)) => assert!(message.contains("Gaia TAP")),
            Err(other) => panic!("expected query error, got {:?}", other),
            Ok(_) => panic!("expected query error, got stars"),
        }
    }

    #[test]
    fn test_server_errors_retried_until_budget_spent() {
        let (url, hits) = tap_server(vec![(503, "busy")]);
        let message = query_error(client(&url, 2).query(&ConeQuery::around(0.0, 0.0)));
        assert!(message.contains("503"), "{}", message);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_client_errors_not_retried() {
        let (url, hits) = tap_server(vec![(400, "bad ADQL")]);
        let message = query_error(client(&url, 2).query(&ConeQuery::around(0.0, 0.0)));
        assert!(message.contains("bad ADQL"), "{}", message);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_success_after_server_error() {
        let (url, hits) = tap_server(vec![(502, "gateway"), (200, CSV_BODY)]);
        let stars: Vec<_> = client(&url, 2)
            .query(&ConeQuery::around(0.0, 0.0))
            .unwrap()
            .collect();
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].id, "6752096595359340032");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_votable_error_document_is_query_error() {
        let (url, hits) = tap_server(vec![(200, VOTABLE_ERROR)]);
        let message = query_error(client(&url, 2).query(&ConeQuery::around(0.0, 0.0)));
        assert!(message.contains("Query timed out"), "{}", message);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_markup_body_rejected() {
        let html = b"  <!DOCTYPE html><html><body>Down for maintenance</body></html>";
        assert!(matches!(check_csv_body(html), Err(ExoskyError::Query(_))));
        assert!(matches!(
            check_csv_body(VOTABLE_ERROR.as_bytes()),
            Err(ExoskyError::Query(_))
        ));
    }

    #[test]
    fn test_missing_columns_named() {
        let body = b"source_id,ra,dec,parallax,g_mag\n1,10.0,20.0,5.0,3.0\n";
        match check_csv_body(body) {
            Err(ExoskyError::Query(message)) => {
                assert!(message.contains("phot_g_mean_mag"), "{}", message)
            }
            other => panic!("expected query error, got {:?}", other),
        }

        assert!(check_csv_body(b"").is_err());
    }

    #[test]
    fn test_header_only_csv_is_empty_result() {
        let body = b"source_id,ra,dec,parallax,phot_g_mean_mag\n";
        assert!(check_csv_body(body).is_ok());
        assert!(check_csv_body(CSV_BODY.as_bytes()).is_ok());
    }
}
