// Models module for data structures
pub mod framework;
pub mod project;
