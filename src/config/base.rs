//! The base configuration shared by every service in an environment.

use std::any::Any;

use serde::Deserialize;

use super::merge::{Assign, Layered};
use super::schema::{FieldSpec, Schema, Visitor};

/// Settings shared across an environment-named family of services.
///
/// Loaded from `.env.local.base.yaml` in local development and from
/// environment variables everywhere else. Caller configurations receive these
/// sections through [`Layered`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseConfig {
    pub environment: EnvironmentSection,
    pub public: PublicSection,
    pub api: ApiSection,
    pub database: DatabaseSection,
    pub rabbitmq: RabbitMqSection,
    pub elasticsearch: ElasticsearchSection,
    pub mail: MailSection,
    pub sessions: SessionsSection,
    pub monitoring: MonitoringSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvironmentSection {
    pub name: String,
    pub containerized: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicSection {
    pub hostname: String,
    pub tls: TlsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TlsSection {
    pub disabled: bool,
    pub cert: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiSection {
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseSection {
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RabbitMqSection {
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElasticsearchSection {
    pub url: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MailSection {
    pub outbound: OutboundMailSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutboundMailSection {
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionsSection {
    pub public_key: String,
    pub private_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitoringSection {
    pub enabled: bool,
    pub tracing: TracingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TracingSection {
    pub enabled: bool,
    pub collector: String,
}

impl BaseConfig {
    /// Names of the sections offered to caller configurations, in merge order.
    pub const SECTIONS: [&'static str; 9] = [
        "environment",
        "public",
        "api",
        "database",
        "rabbitmq",
        "elasticsearch",
        "mail",
        "sessions",
        "monitoring",
    ];

    pub(crate) fn sections(&self) -> [(&'static str, &dyn Assign); 9] {
        [
            ("environment", &self.environment),
            ("public", &self.public),
            ("api", &self.api),
            ("database", &self.database),
            ("rabbitmq", &self.rabbitmq),
            ("elasticsearch", &self.elasticsearch),
            ("mail", &self.mail),
            ("sessions", &self.sessions),
            ("monitoring", &self.monitoring),
        ]
    }
}

impl Schema for BaseConfig {
    fn visit(&self, v: &mut dyn Visitor) {
        v.section(&FieldSpec::required("environment", "ENVIRONMENT_"), &self.environment);
        v.section(&FieldSpec::required("public", "PUBLIC_"), &self.public);
        v.section(&FieldSpec::required("api", "API_"), &self.api);
        v.section(&FieldSpec::optional("database", "DATABASE_"), &self.database);
        v.section(&FieldSpec::optional("rabbitmq", "RABBITMQ_"), &self.rabbitmq);
        v.section(&FieldSpec::required("elasticsearch", "ELASTICSEARCH_"), &self.elasticsearch);
        v.section(&FieldSpec::optional("mail", "MAIL_"), &self.mail);
        v.section(&FieldSpec::optional("sessions", "SESSIONS_"), &self.sessions);
        v.section(&FieldSpec::required("monitoring", "MONITORING_"), &self.monitoring);
    }
}

impl Layered for BaseConfig {
    fn section_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
        let slot: &mut dyn Any = match name {
            "environment" => &mut self.environment,
            "public" => &mut self.public,
            "api" => &mut self.api,
            "database" => &mut self.database,
            "rabbitmq" => &mut self.rabbitmq,
            "elasticsearch" => &mut self.elasticsearch,
            "mail" => &mut self.mail,
            "sessions" => &mut self.sessions,
            "monitoring" => &mut self.monitoring,
            _ => return None,
        };
        Some(slot)
    }
}

impl Schema for EnvironmentSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::required("name", "NAME"), &self.name);
        v.leaf(&FieldSpec::optional("containerized", "CONTAINERIZED"), &self.containerized);
    }
}

impl Schema for PublicSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::required("hostname", "HOSTNAME"), &self.hostname);
        v.section(&FieldSpec::optional("tls", "TLS_"), &self.tls);
    }
}

impl Schema for TlsSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::optional("disabled", "DISABLED"), &self.disabled);
        v.leaf(&FieldSpec::optional("cert", "CERT"), &self.cert);
        v.leaf(&FieldSpec::optional("key", "KEY"), &self.key);
    }
}

impl Schema for ApiSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::optional("baseUrl", "BASE_URL"), &self.base_url);
        v.leaf(&FieldSpec::optional("token", "TOKEN"), &self.token);
    }
}

impl Schema for DatabaseSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::optional("uri", "URI"), &self.uri);
    }
}

impl Schema for RabbitMqSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::optional("uri", "URI"), &self.uri);
    }
}

impl Schema for ElasticsearchSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::required("url", "URL"), &self.url);
        v.leaf(&FieldSpec::required("username", "USERNAME"), &self.username);
        v.leaf(&FieldSpec::required("password", "PASSWORD"), &self.password);
    }
}

impl Schema for MailSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.section(&FieldSpec::optional("outbound", "OUTBOUND_"), &self.outbound);
    }
}

impl Schema for OutboundMailSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::optional("key", "KEY"), &self.key);
    }
}

impl Schema for SessionsSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::optional("publicKey", "PUBLIC_KEY"), &self.public_key);
        v.leaf(&FieldSpec::optional("privateKey", "PRIVATE_KEY"), &self.private_key);
    }
}

impl Schema for MonitoringSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::required("enabled", "ENABLED"), &self.enabled);
        v.section(&FieldSpec::optional("tracing", "TRACING_"), &self.tracing);
    }
}

impl Schema for TracingSection {
    fn visit(&self, v: &mut dyn Visitor) {
        v.leaf(&FieldSpec::optional("enabled", "ENABLED"), &self.enabled);
        v.leaf(&FieldSpec::optional("collector", "COLLECTOR"), &self.collector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::empty_fields;

    #[test]
    fn test_required_fields_of_empty_base() {
        assert_eq!(
            empty_fields(&BaseConfig::default()),
            vec![
                "environment.name",
                "public.hostname",
                "elasticsearch.url",
                "elasticsearch.username",
                "elasticsearch.password",
                "monitoring.enabled",
            ]
        );
    }

    #[test]
    fn test_deserialize_camel_case_keys() {
        let base: BaseConfig = toml::from_str(
            r#"
            [api]
            baseUrl = "https://api.example.com"
            [sessions]
            publicKey = "pub"
            [monitoring.tracing]
            collector = "otel:4317"
            "#,
        )
        .unwrap();

        assert_eq!(base.api.base_url, "https://api.example.com");
        assert_eq!(base.sessions.public_key, "pub");
        assert_eq!(base.monitoring.tracing.collector, "otel:4317");
        assert_eq!(base.public, PublicSection::default());
    }

    #[test]
    fn test_section_names_match_slots() {
        let mut base = BaseConfig::default();
        for name in BaseConfig::SECTIONS {
            assert!(base.section_mut(name).is_some(), "missing slot {name}");
        }
        assert!(base.section_mut("foo").is_none());
        let names: Vec<_> = base.sections().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, BaseConfig::SECTIONS);
    }
}
