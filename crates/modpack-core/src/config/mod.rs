//! Configuration loading and validation

mod reader;
mod settings_loader;
mod validator;

pub use reader::ModuleConfigReader;
pub use settings_loader::SettingsLoader;
pub use validator::validate_module_config;
