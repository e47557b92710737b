//! Layered configuration loading and validation.

mod base;
mod builder;
mod env;
mod environment;
mod error;
mod file;
mod locate;
mod merge;
mod schema;
mod source;

pub use base::{
    ApiSection, BaseConfig, DatabaseSection, ElasticsearchSection, EnvironmentSection,
    MailSection, MonitoringSection, OutboundMailSection, PublicSection, RabbitMqSection,
    SessionsSection, TlsSection, TracingSection,
};
pub use builder::{
    load_config, Loader, DEFAULT_BASE_DEPTH, DEFAULT_BASE_FILE, DEFAULT_ENV_DEPTH,
    DEFAULT_ENV_FILE_PATTERN,
};
pub use env::{EnvLookup, ProcessEnv};
pub use environment::Environment;
pub use error::ConfigError;
pub use locate::Locator;
pub use merge::{merge_base, Layered};
pub use schema::{empty_fields, validate, FieldSpec, Leaf, LeafKind, Schema, Visitor};
