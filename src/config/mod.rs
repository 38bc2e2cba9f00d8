//! Configuration loading

mod settings;

pub use settings::{
    BridgeMode, BridgeSettings, CacheSettings, FrontendSettings, PythonSettings, Settings,
};
