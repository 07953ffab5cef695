// Services module for directory safety, lifecycle handling and generation
pub mod cleanup;
pub mod directory_guard;
pub mod env_generator;
pub mod lifecycle_guard;
pub mod path_resolver;
pub mod scaffolder;
