#[cfg(test)]
mod consumer_tests {
    use crabshot::config::CrabshotConfig;
    use crabshot::photo::write_pending_jpeg;
    use crabshot::{
        CameraError, CameraFacing, CaptureOptions, CapturedPhoto, ChannelConsumer,
        DirectoryConsumer, PhotoConsumer,
    };
    use image::RgbImage;
    use std::path::Path;
    use tempfile::TempDir;

    fn pending_photo(dir: &Path) -> CapturedPhoto {
        let image = RgbImage::from_pixel(32, 24, image::Rgb([120, 80, 40]));
        write_pending_jpeg(&image, dir, CameraFacing::Back, &CaptureOptions::default()).unwrap()
    }

    #[test]
    fn test_directory_consumer_flat() {
        let dir = TempDir::new().unwrap();
        let photo = pending_photo(&dir.path().join("pending"));
        let mut consumer = DirectoryConsumer::new(dir.path().join("out"));
        let original = std::fs::read(&photo.uri).unwrap();

        consumer.accept(&photo).unwrap();

        let stored = consumer.last_stored().unwrap();
        assert!(!photo.uri.exists());
        assert_eq!(stored.parent().unwrap(), consumer.root());
        assert_eq!(stored.extension().unwrap(), "jpg");
        assert!(stored
            .file_name()
            .unwrap()
            .to_string_lossy()
            .contains(&photo.id.simple().to_string()));
        assert_eq!(std::fs::read(stored).unwrap(), original);
    }

    #[test]
    fn test_directory_consumer_by_date() {
        let dir = TempDir::new().unwrap();
        let photo = pending_photo(&dir.path().join("pending"));

        let mut config = CrabshotConfig::default();
        config.storage.output_directory = dir.path().join("out").to_string_lossy().into_owned();
        config.storage.date_format = "%Y".to_string();
        let mut consumer = DirectoryConsumer::from_config(&config.storage);

        consumer.accept(&photo).unwrap();

        let expected_dir = dir
            .path()
            .join("out")
            .join(photo.captured_at.format("%Y").to_string());
        assert_eq!(consumer.last_stored().unwrap().parent().unwrap(), expected_dir);
    }

    #[test]
    fn test_directory_consumer_keeps_history() {
        let dir = TempDir::new().unwrap();
        let mut consumer = DirectoryConsumer::new(dir.path().join("out"));

        for _ in 0..3 {
            let photo = pending_photo(&dir.path().join("pending"));
            consumer.accept(&photo).unwrap();
        }

        assert_eq!(consumer.stored().len(), 3);
        for path in consumer.stored() {
            assert!(path.exists());
        }
    }

    #[test]
    fn test_missing_source_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let photo = CapturedPhoto::new(dir.path().join("gone.jpg"), 640, 480, CameraFacing::Front);
        let mut consumer = DirectoryConsumer::new(dir.path().join("out"));

        let result = consumer.accept(&photo);
        assert!(matches!(result, Err(CameraError::StorageError(_))));
        assert!(consumer.stored().is_empty());
    }

    #[tokio::test]
    async fn test_channel_consumer() {
        let dir = TempDir::new().unwrap();
        let photo = pending_photo(dir.path());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut consumer = ChannelConsumer::new(tx);

        consumer.accept(&photo).unwrap();
        assert_eq!(rx.recv().await.unwrap(), photo);

        drop(rx);
        assert!(matches!(consumer.accept(&photo), Err(CameraError::StorageError(_))));
    }

    #[test]
    fn test_pending_jpeg_is_decodable() {
        let dir = TempDir::new().unwrap();
        let photo = pending_photo(dir.path());

        assert_eq!((photo.width, photo.height), (32, 24));
        let decoded = image::open(&photo.uri).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }
}
