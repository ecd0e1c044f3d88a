pub mod catalog;
pub mod check;
pub mod description;
pub mod errors;
pub mod label_map;
pub mod label_space;
pub mod model;
pub mod prediction;
pub mod probability;
pub mod segmentation;
pub mod stats;
pub mod tensor_ops;
pub mod visualization;
