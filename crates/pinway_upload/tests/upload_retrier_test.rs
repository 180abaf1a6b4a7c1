//! Tests for the upload retry loop against a scripted transport.

mod test_utils;

use pinway_core::MediaKind;
use pinway_error::{PinwayErrorKind, UploadErrorKind};
use pinway_upload::{UploadPolicy, UploadRetrier, UploadSource};
use std::time::Duration;
use test_utils::{MockPinTransport, MockResponse};

fn photo() -> UploadSource {
    UploadSource::new(vec![0xFF, 0xD8, 0xFF], "selfie.jpg", MediaKind::Image)
}

fn clip() -> UploadSource {
    UploadSource::new(vec![0x1A, 0x45, 0xDF, 0xA3], "clip.webm", MediaKind::Video)
}

fn retrier(mock: &MockPinTransport) -> UploadRetrier<MockPinTransport> {
    UploadRetrier::new(mock.clone(), UploadPolicy::default())
}

#[tokio::test(start_paused = true)]
async fn test_success_on_first_attempt() -> anyhow::Result<()> {
    let mock = MockPinTransport::always("bafyfirst");

    let cid = retrier(&mock).upload(photo(), "0xA11ce").await?;

    assert_eq!(cid.as_str(), "bafyfirst");
    assert_eq!(mock.call_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_server_errors_retry_with_same_file_name() -> anyhow::Result<()> {
    let mock = MockPinTransport::new([
        MockResponse::server(500),
        MockResponse::server(503),
        MockResponse::Pinned("bafythird".to_string()),
    ]);

    let cid = retrier(&mock).upload(photo(), "0xA11ce").await?;

    assert_eq!(cid.as_str(), "bafythird");
    assert_eq!(mock.call_count(), 3);
    let names = mock.file_names();
    assert!(names.iter().all(|name| name == &names[0]));
    assert!(names[0].starts_with("0xA11ce_"));
    assert!(names[0].ends_with("_selfie.jpg"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_network_errors_are_retried() -> anyhow::Result<()> {
    let mock = MockPinTransport::new([
        MockResponse::network(),
        MockResponse::Pinned("bafyafterreset".to_string()),
    ]);

    let cid = retrier(&mock).upload(clip(), "owner").await?;

    assert_eq!(cid.as_str(), "bafyafterreset");
    assert_eq!(mock.call_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_client_error_is_not_retried() {
    let mock = MockPinTransport::new([
        MockResponse::rejected(401),
        MockResponse::Pinned("bafynever".to_string()),
    ]);

    let err = retrier(&mock)
        .upload(photo(), "0xA11ce")
        .await
        .unwrap_err();

    assert!(matches!(err.kind, UploadErrorKind::Rejected { status: 401, .. }));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_success_is_not_retried() {
    let mock = MockPinTransport::new([
        MockResponse::Error(UploadErrorKind::MalformedResponse("no IpfsHash".to_string())),
        MockResponse::Pinned("bafynever".to_string()),
    ]);

    let err = retrier(&mock).upload(photo(), "u").await.unwrap_err();

    assert!(matches!(err.kind, UploadErrorKind::MalformedResponse(_)));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_reports_attempts_and_last_error() {
    let mock = MockPinTransport::new([MockResponse::server(502)]);

    let err = retrier(&mock).upload(photo(), "u").await.unwrap_err();

    match err.kind {
        UploadErrorKind::Exhausted {
            file_name,
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 3);
            assert!(file_name.ends_with("_selfie.jpg"));
            assert!(last_error.contains("502"));
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_retry_budget_overrides_policy() {
    let mock = MockPinTransport::new([MockResponse::server(500)]);

    let err = retrier(&mock)
        .upload_with_retries(photo(), "u", 1)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, UploadErrorKind::Exhausted { attempts: 1, .. }));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_waits_follow_schedule() -> anyhow::Result<()> {
    let mock = MockPinTransport::new([
        MockResponse::server(500),
        MockResponse::server(500),
        MockResponse::server(500),
        MockResponse::Pinned("bafyfourth".to_string()),
    ]);
    let started = tokio::time::Instant::now();

    let cid = retrier(&mock)
        .upload_with_retries(photo(), "u", 4)
        .await?;

    assert_eq!(cid.as_str(), "bafyfourth");
    let times = mock.call_times();
    let gaps: Vec<Duration> = times.windows(2).map(|w| w[1] - w[0]).collect();
    assert_eq!(
        gaps,
        vec![
            Duration::from_millis(1_000),
            Duration::from_millis(2_000),
            Duration::from_millis(4_000)
        ]
    );
    assert_eq!(times[0] - started, Duration::ZERO);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_backoff_is_capped() {
    let mock = MockPinTransport::new([MockResponse::server(500)]);

    let _ = retrier(&mock).upload_with_retries(photo(), "u", 8).await;

    let times = mock.call_times();
    let gaps: Vec<u128> = times
        .windows(2)
        .map(|w| (w[1] - w[0]).as_millis())
        .collect();
    assert_eq!(gaps, vec![1_000, 2_000, 4_000, 8_000, 10_000, 10_000, 10_000]);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_input_makes_no_calls() {
    let mock = MockPinTransport::always("bafy");
    let retrier = retrier(&mock);

    let empty = UploadSource::new(Vec::<u8>::new(), "selfie.jpg", MediaKind::Image);
    let err = retrier.upload(empty, "u").await.unwrap_err();
    assert!(matches!(err.kind, UploadErrorKind::InvalidInput(_)));

    let unnamed = UploadSource::new(vec![1], "  ", MediaKind::Image);
    let err = retrier.upload(unnamed, "u").await.unwrap_err();
    assert!(matches!(err.kind, UploadErrorKind::InvalidInput(_)));

    let err = retrier
        .upload_with_retries(photo(), "u", 0)
        .await
        .unwrap_err();
    assert!(matches!(err.kind, UploadErrorKind::InvalidInput(_)));

    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_paired_upload_returns_both_cids() -> anyhow::Result<()> {
    let mock = MockPinTransport::new([MockResponse::PinnedByName]);

    let pair = retrier(&mock).upload_pair(clip(), photo(), "u").await?;

    assert!(pair.video_cid().as_str().ends_with("_clip.webm"));
    assert!(pair.selfie_cid().as_str().ends_with("_selfie.jpg"));
    assert_eq!(mock.call_count(), 2);

    let reference = pair.into_media_reference();
    assert!(reference.cid_for(MediaKind::Video).is_some());
    assert!(reference.cid_for(MediaKind::Image).is_some());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_paired_upload_rejects_equal_cids() {
    let mock = MockPinTransport::always("bafysame");

    let err = retrier(&mock)
        .upload_pair(clip(), photo(), "u")
        .await
        .unwrap_err();

    let upload = err.as_upload().expect("upload error");
    assert!(matches!(&upload.kind, UploadErrorKind::CidCollision(cid) if cid == "bafysame"));
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_paired_upload_rejects_swapped_kinds() {
    let mock = MockPinTransport::always("bafy");

    let err = retrier(&mock)
        .upload_pair(photo(), clip(), "u")
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), PinwayErrorKind::Upload(_)));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unpin_passes_through_once() -> anyhow::Result<()> {
    let mock = MockPinTransport::always("bafy");
    let cid = pinway_core::ContentId::new("bafyold")?;

    retrier(&mock).unpin(&cid).await?;

    assert_eq!(mock.unpinned(), vec!["bafyold".to_string()]);
    Ok(())
}
