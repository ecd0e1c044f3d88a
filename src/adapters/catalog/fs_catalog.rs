use std::path::{Component, Path, PathBuf};

use crate::application::ports::ImageCatalogPort;
use crate::domain::catalog::CatalogImage;
use crate::domain::errors::{DomainError, DomainResult};

pub const TEST_IMAGES_URL_PREFIX: &str = "/static/test_images";
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Test images served from a flat directory; the file name is the id.
pub struct FsImageCatalog {
    dir: PathBuf,
}

impl FsImageCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl ImageCatalogPort for FsImageCatalog {
    fn list_images(&self) -> DomainResult<Vec<CatalogImage>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && is_image(p))
            .collect();
        paths.sort();

        Ok(paths
            .into_iter()
            .filter_map(|path| {
                let id = path.file_name()?.to_string_lossy().to_string();
                let name = path.file_stem()?.to_string_lossy().to_string();
                let url = format!("{TEST_IMAGES_URL_PREFIX}/{id}");
                Some(CatalogImage {
                    id,
                    name,
                    thumbnail_url: url.clone(),
                    image_url: url,
                    tags: vec!["ade20k-real".to_string(), "local".to_string()],
                })
            })
            .collect())
    }

    fn resolve(&self, image_id: &str) -> DomainResult<PathBuf> {
        let candidate = Path::new(image_id);
        let plain = candidate.components().count() == 1
            && matches!(candidate.components().next(), Some(Component::Normal(_)));
        if image_id.is_empty() || !plain {
            return Err(DomainError::InvalidInput(format!("Invalid image_id: {image_id}")));
        }
        Ok(self.dir.join(image_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_images_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.webp", "a.jpg", "b.png", "ignore.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let images = FsImageCatalog::new(dir.path()).list_images().unwrap();
        let ids: Vec<&str> = images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a.jpg", "b.png", "c.webp"]);
        assert_eq!(images[0].name, "a");
        assert_eq!(images[0].image_url, "/static/test_images/a.jpg");
        assert!(images.iter().all(|i| i.tags == vec!["ade20k-real", "local"]));
    }

    #[test]
    fn extension_match_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Shot.JPEG"), b"x").unwrap();
        let images = FsImageCatalog::new(dir.path()).list_images().unwrap();
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn resolve_joins_plain_names() {
        let catalog = FsImageCatalog::new("/data/imgs");
        assert_eq!(catalog.resolve("abc.jpg").unwrap(), PathBuf::from("/data/imgs/abc.jpg"));
    }

    #[test]
    fn resolve_rejects_traversal() {
        let catalog = FsImageCatalog::new("/data/imgs");
        for bad in ["../secret.png", "sub/a.jpg", "/etc/passwd", ".", ""] {
            assert!(matches!(catalog.resolve(bad), Err(DomainError::InvalidInput(_))), "{bad}");
        }
    }
}
