#![allow(dead_code)]

use filings_nse::{NseClient, paths};
use filings_utils::NseConfig;
use httpmock::{Method::GET, Mock, MockServer};
use std::path::Path;
use std::time::Duration;

pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

pub fn client(server: &MockServer) -> NseClient {
    let config = NseConfig {
        base_url: server.base_url(),
        warmup_delay: Duration::ZERO,
        requests_per_second: 50,
        ..NseConfig::default()
    };
    NseClient::new(&config).unwrap()
}

pub fn mock_page<'a>(server: &'a MockServer, path: &'a str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path(path);
        then.status(200)
            .header("content-type", "text/html")
            .header("set-cookie", "nsit=session-token; Path=/")
            .body("<html></html>");
    })
}

pub fn mock_announcements_page(server: &MockServer) -> Mock<'_> {
    mock_page(server, paths::ANNOUNCEMENTS_PAGE)
}
