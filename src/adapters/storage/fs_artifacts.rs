use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::application::ports::ArtifactStorePort;
use crate::domain::errors::DomainResult;

pub const RESULTS_URL_PREFIX: &str = "/static/results";

/// Write-once PNG store. Names carry a random 10-hex-digit suffix; nothing
/// here reads, overwrites or deletes files.
pub struct FsArtifactStore {
    result_dir: PathBuf,
    url_prefix: String,
}

impl FsArtifactStore {
    pub fn new(result_dir: impl Into<PathBuf>) -> DomainResult<Self> {
        let result_dir = result_dir.into();
        std::fs::create_dir_all(&result_dir)?;
        Ok(Self {
            result_dir,
            url_prefix: RESULTS_URL_PREFIX.to_string(),
        })
    }

    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }
}

fn unique_name(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}.png", prefix, &suffix[..10])
}

impl ArtifactStorePort for FsArtifactStore {
    fn save_png(&self, image: &DynamicImage, prefix: &str) -> DomainResult<String> {
        let name = unique_name(prefix);
        let path = self.result_dir.join(&name);
        image.save_with_format(&path, ImageFormat::Png)?;
        debug!("artifact written: {}", path.display());
        Ok(format!("{}/{}", self.url_prefix, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn names_follow_prefix_and_hex_suffix() {
        let name = unique_name("overlay");
        assert!(name.starts_with("overlay_"));
        assert!(name.ends_with(".png"));
        let suffix = &name["overlay_".len()..name.len() - 4];
        assert_eq!(suffix.len(), 10);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_prefix_writes_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("results")).unwrap();
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([10, 20, 30])));

        let a = store.save_png(&image, "orig").unwrap();
        let b = store.save_png(&image, "orig").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("/static/results/orig_"));

        for url in [&a, &b] {
            let name = url.rsplit('/').next().unwrap();
            let reread = image::open(store.result_dir().join(name)).unwrap();
            assert_eq!(reread.to_rgb8().get_pixel(1, 1), &Rgb([10, 20, 30]));
        }
    }
}
