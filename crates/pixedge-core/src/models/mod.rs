pub mod action;
pub mod processing;

pub use action::{
    ActionKind, ActionMode, ActionOption, ActionParam, ProviderAction, ProviderActionList,
    WatermarkParam,
};
pub use processing::{OutputFormat, ProcessingConfig};
