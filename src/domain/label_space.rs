use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::errors::{DomainError, DomainResult};

/// Class-id to human-readable name mapping for one model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSpace {
    id2label: BTreeMap<u32, String>,
}

#[derive(Deserialize)]
struct HfConfig {
    id2label: BTreeMap<String, String>,
}

impl LabelSpace {
    pub fn new(id2label: BTreeMap<u32, String>) -> Self {
        Self { id2label }
    }

    pub fn ade20k() -> Self {
        Self::new(
            ADE20K_CLASSES
                .iter()
                .enumerate()
                .map(|(id, name)| (id as u32, (*name).to_string()))
                .collect(),
        )
    }

    /// Reads `id2label` out of a checkpoint `config.json`.
    pub fn from_config_file(path: &Path) -> DomainResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: HfConfig = serde_json::from_str(&raw)
            .map_err(|e| DomainError::InvalidInput(format!("bad config {}: {e}", path.display())))?;

        let mut id2label = BTreeMap::new();
        for (id, name) in cfg.id2label {
            let id = id
                .parse::<u32>()
                .map_err(|_| DomainError::InvalidInput(format!("non-numeric class id '{id}'")))?;
            id2label.insert(id, name);
        }
        Ok(Self::new(id2label))
    }

    /// Name for `class_id`, or the id itself when unmapped.
    pub fn label(&self, class_id: u32) -> String {
        self.id2label
            .get(&class_id)
            .cloned()
            .unwrap_or_else(|| class_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.id2label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2label.is_empty()
    }
}

impl<const N: usize> From<[(u32, &str); N]> for LabelSpace {
    fn from(pairs: [(u32, &str); N]) -> Self {
        Self::new(pairs.into_iter().map(|(id, n)| (id, n.to_string())).collect())
    }
}

const ADE20K_CLASSES: [&str; 150] = [
    "wall", "building", "sky", "floor", "tree", "ceiling", "road", "bed ", "windowpane", "grass",
    "cabinet", "sidewalk", "person", "earth", "door", "table", "mountain", "plant", "curtain",
    "chair", "car", "water", "painting", "sofa", "shelf", "house", "sea", "mirror", "rug",
    "field", "armchair", "seat", "fence", "desk", "rock", "wardrobe", "lamp", "bathtub",
    "railing", "cushion", "base", "box", "column", "signboard", "chest of drawers", "counter",
    "sand", "sink", "skyscraper", "fireplace", "refrigerator", "grandstand", "path", "stairs",
    "runway", "case", "pool table", "pillow", "screen door", "stairway", "river", "bridge",
    "bookcase", "blind", "coffee table", "toilet", "flower", "book", "hill", "bench",
    "countertop", "stove", "palm", "kitchen island", "computer", "swivel chair", "boat", "bar",
    "arcade machine", "hovel", "bus", "towel", "light", "truck", "tower", "chandelier",
    "awning", "streetlight", "booth", "television receiver", "airplane", "dirt track",
    "apparel", "pole", "land", "bannister", "escalator", "ottoman", "bottle", "buffet",
    "poster", "stage", "van", "ship", "fountain", "conveyer belt", "canopy", "washer",
    "plaything", "swimming pool", "stool", "barrel", "basket", "waterfall", "tent", "bag",
    "minibike", "cradle", "oven", "ball", "food", "step", "tank", "trade name", "microwave",
    "pot", "animal", "bicycle", "lake", "dishwasher", "screen", "blanket", "sculpture", "hood",
    "sconce", "vase", "traffic light", "tray", "ashcan", "fan", "pier", "crt screen", "plate",
    "monitor", "bulletin board", "shower", "radiator", "glass", "clock", "flag",
];
