use std::any::Any;

use config_strata::{ApiSection, BaseConfig, FieldSpec, Layered, Loader, Schema, Visitor};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkerConfig {
    #[serde(flatten)]
    base: BaseConfig,
    worker: WorkerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkerSection {
    queue: String,
    concurrency: u32,
}

impl Schema for WorkerSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::required("queue", "QUEUE"), &self.queue);
        v.leaf(&FieldSpec::optional("concurrency", "CONCURRENCY"), &self.concurrency);
    }
}

impl Schema for WorkerConfig {
    fn visit(&self, v: &mut dyn Visitor) {
        self.base.visit(v);
        v.section(&FieldSpec::required("worker", "WORKER_"), &self.worker);
    }
}

impl Layered for WorkerConfig {
    fn section_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
        self.base.section_mut(name)
    }
}

fn main() -> Result<(), config_strata::ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Run from the crate root: `cargo run --example layered`
    let config: WorkerConfig = Loader::builder().with_root("demos").load("")?;

    let ApiSection { base_url, token } = &config.base.api;
    println!("Environment: {}", config.base.environment.name);
    println!("API: {base_url} (token={token})");
    println!(
        "Worker: queue={} concurrency={}",
        config.worker.queue, config.worker.concurrency
    );

    Ok(())
}
