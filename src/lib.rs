pub mod config;

pub use config::{
    empty_fields, load_config, validate, ApiSection, BaseConfig, ConfigError, Environment,
    FieldSpec, Layered, Loader, Schema, Visitor,
};
