pub mod fs_artifacts;
