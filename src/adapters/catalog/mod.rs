pub mod fs_catalog;
