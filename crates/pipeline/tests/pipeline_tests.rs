use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use object_store::path::Path;
use object_store::{Attribute, AttributeValue};
use tempfile::tempdir;

use blobstore::StoreHandle;
use pipeline::{MirrorOptions, PreprocessOptions, ResizeSettings, mirror, preprocess};

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Encode a solid-color PNG test fixture
fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("encode fixture");
    out
}

/// Store `data` at `subpath` below the handle's prefix
async fn seed(handle: &StoreHandle, subpath: &str, data: Vec<u8>) -> TestResult {
    let key = handle.full_key(&Path::from(subpath));
    handle.put_bytes(&key, Bytes::from(data), None).await?;
    Ok(())
}

#[tokio::test]
async fn mirror_downloads_only_png_objects() -> TestResult {
    let source = StoreHandle::in_memory("raw");
    seed(&source, "2024/01/cat.png", png_bytes(6, 4, [1, 2, 3])).await?;
    seed(&source, "2024/02/dog.png", png_bytes(5, 5, [9, 9, 9])).await?;
    seed(&source, "notes/readme.txt", b"not an image".to_vec()).await?;

    let dir = tempdir()?;
    let stats = mirror(&source, dir.path(), &MirrorOptions::default()).await?;

    assert_eq!(stats.listed, 3);
    assert_eq!(stats.downloaded, 2);
    assert_eq!(stats.ignored, 1);
    assert_eq!(stats.skipped_existing, 0);
    assert!(dir.path().join("2024/01/cat.png").is_file());
    assert!(dir.path().join("2024/02/dog.png").is_file());
    assert!(!dir.path().join("notes/readme.txt").exists());

    // Mirrored bytes are untouched
    let mirrored = std::fs::read(dir.path().join("2024/01/cat.png"))?;
    assert_eq!(mirrored, png_bytes(6, 4, [1, 2, 3]));
    Ok(())
}

#[tokio::test]
async fn mirror_of_empty_source_creates_only_the_directory() -> TestResult {
    let source = StoreHandle::in_memory("raw");
    let dir = tempdir()?;
    let target = dir.path().join("mirror");

    let stats = mirror(&source, &target, &MirrorOptions::default()).await?;
    assert_eq!(stats.listed, 0);
    assert_eq!(stats.downloaded, 0);
    assert!(target.is_dir());
    assert_eq!(std::fs::read_dir(&target)?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn mirror_skip_existing_leaves_local_files_alone() -> TestResult {
    let source = StoreHandle::in_memory("raw");
    seed(&source, "cat.png", png_bytes(4, 4, [1, 2, 3])).await?;

    let dir = tempdir()?;
    mirror(&source, dir.path(), &MirrorOptions::default()).await?;

    // A local edit survives a skip-existing rerun
    std::fs::write(dir.path().join("cat.png"), b"sentinel")?;
    let skip = MirrorOptions {
        skip_existing: true,
    };
    let stats = mirror(&source, dir.path(), &skip).await?;
    assert_eq!(stats.downloaded, 0);
    assert_eq!(stats.skipped_existing, 1);
    assert_eq!(std::fs::read(dir.path().join("cat.png"))?, b"sentinel".to_vec());

    // A default rerun replaces it
    let stats = mirror(&source, dir.path(), &MirrorOptions::default()).await?;
    assert_eq!(stats.downloaded, 1);
    assert_eq!(
        std::fs::read(dir.path().join("cat.png"))?,
        png_bytes(4, 4, [1, 2, 3])
    );
    Ok(())
}

#[tokio::test]
async fn preprocess_resizes_uploads_and_tags_content_type() -> TestResult {
    let source = StoreHandle::in_memory("raw");
    let destination = StoreHandle::in_memory("resized");
    seed(&source, "2024/01/cat.png", png_bytes(320, 240, [10, 20, 30])).await?;
    seed(&source, "2024/02/dog.png", png_bytes(16, 16, [40, 50, 60])).await?;
    seed(&source, "logs/run.txt", b"not an image".to_vec()).await?;

    let stats = preprocess(&source, &destination, &PreprocessOptions::default()).await?;

    assert_eq!(stats.listed, 3);
    assert_eq!(stats.uploaded, 2);
    // The text file is attempted (stage two has no suffix filter) and
    // skipped when it fails to decode.
    assert_eq!(stats.skipped, 1);
    assert!(stats.bytes_in > 0);
    assert!(stats.bytes_out > 0);

    let mut keys: Vec<String> = destination
        .list()
        .await?
        .into_iter()
        .map(|meta| meta.location.to_string())
        .collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "resized/2024/01/cat.png".to_string(),
            "resized/2024/02/dog.png".to_string(),
        ]
    );

    let result = destination
        .store()
        .get(&Path::from("resized/2024/01/cat.png"))
        .await?;
    assert_eq!(
        result.attributes.get(&Attribute::ContentType),
        Some(&AttributeValue::from("image/png"))
    );

    let data = result.bytes().await?;
    assert_eq!(image::guess_format(&data)?, ImageFormat::Png);
    let img = image::load_from_memory(&data)?;
    assert_eq!(img.dimensions(), (100, 100));
    Ok(())
}

#[tokio::test]
async fn preprocess_honors_custom_dimensions_and_nested_prefixes() -> TestResult {
    let source = StoreHandle::in_memory("in");
    let destination = StoreHandle::in_memory("out/deep");
    seed(&source, "a/b/c.png", png_bytes(9, 9, [0, 0, 0])).await?;

    let options = PreprocessOptions {
        resize: ResizeSettings {
            width: 32,
            height: 48,
        },
        workers: Some(2),
        partition_multiplier: 2,
    };
    let stats = preprocess(&source, &destination, &options).await?;
    assert_eq!(stats.uploaded, 1);
    assert_eq!(stats.partitions, 1);

    let data = destination
        .get_bytes(&Path::from("out/deep/a/b/c.png"))
        .await?;
    let img = image::load_from_memory(&data)?;
    assert_eq!(img.dimensions(), (32, 48));
    Ok(())
}

#[tokio::test]
async fn preprocess_spreads_work_across_partitions() -> TestResult {
    let source = StoreHandle::in_memory("raw");
    let destination = StoreHandle::in_memory("resized");
    for i in 0..10u8 {
        seed(&source, &format!("img-{i}.png"), png_bytes(4, 4, [i, i, i])).await?;
    }

    let options = PreprocessOptions {
        resize: ResizeSettings::default(),
        workers: Some(2),
        partition_multiplier: 3,
    };
    let stats = preprocess(&source, &destination, &options).await?;
    assert_eq!(stats.listed, 10);
    assert_eq!(stats.partitions, 6);
    assert_eq!(stats.uploaded, 10);
    assert_eq!(destination.list().await?.len(), 10);
    Ok(())
}

#[tokio::test]
async fn preprocess_of_empty_source_is_a_noop() -> TestResult {
    let source = StoreHandle::in_memory("raw");
    let destination = StoreHandle::in_memory("resized");

    let stats = preprocess(&source, &destination, &PreprocessOptions::default()).await?;
    assert_eq!(stats.listed, 0);
    assert_eq!(stats.partitions, 0);
    assert_eq!(stats.uploaded, 0);
    assert!(destination.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn preprocess_reruns_overwrite_existing_outputs() -> TestResult {
    let source = StoreHandle::in_memory("raw");
    let destination = StoreHandle::in_memory("resized");
    seed(&source, "cat.png", png_bytes(8, 8, [1, 1, 1])).await?;

    preprocess(&source, &destination, &PreprocessOptions::default()).await?;
    preprocess(&source, &destination, &PreprocessOptions::default()).await?;

    assert_eq!(destination.list().await?.len(), 1);
    Ok(())
}
