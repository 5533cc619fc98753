//! Catalog kernel: layered settings and the module lifecycle framework.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
