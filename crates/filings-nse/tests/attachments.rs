mod common;

use filings_core::FilingsError;
use httpmock::{Method::GET, MockServer};

#[tokio::test]
async fn offline_download_relative_attachment() {
    let server = MockServer::start();
    let pdf = server.mock(|when, then| {
        when.method(GET).path("/corporate/Infosys_PressRelease.pdf");
        then.status(200)
            .header("content-type", "application/pdf")
            .body("%PDF-1.4 fake");
    });

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("INFY_announcement.pdf");

    let written = common::client(&server)
        .download_attachment("/corporate/Infosys_PressRelease.pdf", &dest)
        .await
        .unwrap();

    pdf.assert();
    assert_eq!(written, 13);
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "%PDF-1.4 fake");
}

#[tokio::test]
async fn offline_download_absolute_attachment() {
    let server = MockServer::start();
    let pdf = server.mock(|when, then| {
        when.method(GET).path("/archive/x.pdf");
        then.status(200).body("pdf");
    });

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("x.pdf");

    common::client(&server)
        .download_attachment(&server.url("/archive/x.pdf"), &dest)
        .await
        .unwrap();
    pdf.assert();
}

#[tokio::test]
async fn offline_download_missing_attachment() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/corporate/gone.pdf");
        then.status(404);
    });

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("gone.pdf");

    let err = common::client(&server)
        .download_attachment("/corporate/gone.pdf", &dest)
        .await
        .unwrap_err();

    assert!(matches!(err, FilingsError::FetchFailure(_)));
    assert!(!dest.exists());
}
