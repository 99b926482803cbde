//! Type definitions for module configuration and packager settings

mod module_config;
mod reference;
mod settings;

pub use module_config::{GroupVersionKind, Link, LinkMap, Manager, ModuleConfig};
pub use reference::FileReference;
pub use settings::{LabelSettings, NamingSettings, NetworkSettings, PackagerSettings};
