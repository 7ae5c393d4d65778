mod common;

use filings_core::FilingsError;
use filings_nse::{ListingSnapshot, new_listings, paths};
use httpmock::{Method::GET, MockServer};
use serde_json::json;

#[tokio::test]
async fn offline_fno_symbols() {
    let server = MockServer::start();
    let home = common::mock_page(&server, paths::HOME);
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/api/equity-stockIndices")
            .query_param("index", "SECURITIES IN F&O");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "SECURITIES IN F&O",
                "data": [{"symbol": "INFY", "lastPrice": 1480.5}, {"symbol": "TCS"}]
            }));
    });

    let symbols = common::client(&server).fno_symbols().await.unwrap();

    home.assert();
    api.assert();
    assert_eq!(symbols, vec!["INFY", "TCS"]);
}

#[tokio::test]
async fn offline_empty_constituents_is_failure() {
    let server = MockServer::start();
    common::mock_page(&server, paths::HOME);
    server.mock(|when, then| {
        when.method(GET).path("/api/equity-stockIndices");
        then.status(200).json_body(json!({"data": []}));
    });

    let err = common::client(&server).fno_symbols().await.unwrap_err();
    assert!(matches!(err, FilingsError::FetchFailure(_)));
}

#[tokio::test]
async fn offline_new_listings_against_snapshot() {
    let server = MockServer::start();
    common::mock_page(&server, paths::HOME);
    server.mock(|when, then| {
        when.method(GET).path("/api/equity-stockIndices");
        then.status(200)
            .json_body(json!({"data": [{"symbol": "INFY"}, {"symbol": "JIOFIN"}]}));
    });

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nse_stock_list.json");
    ListingSnapshot::new(vec!["INFY".to_string()])
        .save(&path)
        .await
        .unwrap();

    let current = common::client(&server).fno_symbols().await.unwrap();
    let previous = ListingSnapshot::load(&path)
        .await
        .map(|s| s.symbols)
        .unwrap_or_default();

    assert_eq!(new_listings(&previous, &current), vec!["JIOFIN"]);
}
