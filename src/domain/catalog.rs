use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogImage {
    pub id: String,   // file name, e.g. "ade20k_val_0001.jpg"
    pub name: String, // file stem
    pub thumbnail_url: String,
    pub image_url: String,
    pub tags: Vec<String>,
}
