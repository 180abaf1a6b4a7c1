//! Upload command handlers.

use pinway::{
    ContentId, MediaKind, PinataTransport, PinwayConfig, PinwayResult, UploadError,
    UploadErrorKind, UploadPolicy, UploadRetrier, UploadSource,
};
use std::path::Path;

use super::media::print_reference;

fn retrier(config: &PinwayConfig) -> PinwayResult<UploadRetrier<PinataTransport>> {
    Ok(UploadRetrier::new(
        PinataTransport::from_config(config)?,
        UploadPolicy::from_config(&config.upload),
    ))
}

fn read_source(path: &Path, kind: MediaKind) -> PinwayResult<UploadSource> {
    let payload = std::fs::read(path).map_err(|e| {
        UploadError::new(UploadErrorKind::InvalidInput(format!(
            "cannot read {}: {e}",
            path.display()
        )))
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadSource::new(payload, file_name, kind))
}

/// Pin one file and print its CID.
pub async fn upload(
    config: &PinwayConfig,
    file: &Path,
    owner: &str,
    kind: MediaKind,
    mime: Option<String>,
    max_retries: Option<u32>,
) -> PinwayResult<()> {
    let retrier = retrier(config)?;
    let mut source = read_source(file, kind)?;
    if let Some(mime) = mime {
        source = source.with_mime_type(mime);
    }

    let max_retries = max_retries.unwrap_or(*retrier.policy().max_retries());
    let cid = retrier
        .upload_with_retries(source, owner, max_retries)
        .await?;
    println!("{cid}");
    Ok(())
}

/// Pin a video and a selfie together and print the resulting media reference.
pub async fn upload_pair(
    config: &PinwayConfig,
    video: &Path,
    selfie: &Path,
    owner: &str,
) -> PinwayResult<()> {
    let retrier = retrier(config)?;
    let video = read_source(video, MediaKind::Video)?;
    let selfie = read_source(selfie, MediaKind::Image)?;

    let reference = retrier
        .upload_pair(video, selfie, owner)
        .await?
        .into_media_reference();
    print_reference(&reference)
}

/// Unpin one CID.
pub async fn unpin(config: &PinwayConfig, cid: &str) -> PinwayResult<()> {
    let cid = ContentId::new(cid)?;
    retrier(config)?.unpin(&cid).await?;
    println!("unpinned {cid}");
    Ok(())
}
