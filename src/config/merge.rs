//! Copying base sections into caller configuration types.

use std::any::Any;

use serde::de::DeserializeOwned;

use super::base::BaseConfig;
use super::schema::Schema;

/// A configuration type that can be loaded on top of [`BaseConfig`].
///
/// During loading every base section is offered to the caller by name
/// through [`section_mut`](Self::section_mut). The section is copied only if
/// the returned slot has exactly the base section's type; any other slot is
/// left untouched. The default implementation accepts nothing.
///
/// ```
/// use std::any::Any;
/// use config_strata::{ApiSection, FieldSpec, Layered, Schema, Visitor};
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, Deserialize)]
/// #[serde(default)]
/// struct WorkerConfig {
///     api: ApiSection,
///     queue: String,
/// }
///
/// impl Schema for WorkerConfig {
///     fn visit(&self, v: &mut dyn Visitor) {
///         v.section(&FieldSpec::required("api", "API_"), &self.api);
///         v.leaf(&FieldSpec::required("queue", "QUEUE"), &self.queue);
///     }
/// }
///
/// impl Layered for WorkerConfig {
///     fn section_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
///         match name {
///             "api" => Some(&mut self.api),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Layered: Schema + DeserializeOwned + Default + 'static {
    fn section_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
        let _ = name;
        None
    }
}

/// A base section that can be written into a type-erased slot.
pub(crate) trait Assign {
    /// Overwrites `slot` with a copy of `self` if the types match.
    fn assign_to(&self, slot: &mut dyn Any) -> bool;
}

impl<S: Clone + 'static> Assign for S {
    fn assign_to(&self, slot: &mut dyn Any) -> bool {
        match slot.downcast_mut::<S>() {
            Some(slot) => {
                *slot = self.clone();
                true
            }
            None => false,
        }
    }
}

/// Copies every base section whose name and type match a slot on `target`.
///
/// Returns the names of the sections that were copied.
pub fn merge_base<T: Layered>(base: &BaseConfig, target: &mut T) -> Vec<&'static str> {
    let mut copied = Vec::new();
    for (name, section) in base.sections() {
        let Some(slot) = target.section_mut(name) else {
            continue;
        };
        if section.assign_to(slot) {
            tracing::trace!(section = name, "copied base section");
            copied.push(name);
        } else {
            tracing::trace!(section = name, "skipped base section with different type");
        }
    }
    copied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::base::{ApiSection, PublicSection};
    use crate::config::schema::{FieldSpec, Visitor};
    use serde::Deserialize;

    fn sample_base() -> BaseConfig {
        let mut base = BaseConfig::default();
        base.environment.name = "local".into();
        base.public.hostname = "example.com".into();
        base.api.token = "changeme".into();
        base.elasticsearch.url = "http://localhost:9200".into();
        base
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Mirror {
        api: ApiSection,
        public: PublicSection,
        name: String,
    }

    impl Schema for Mirror {
        fn visit(&self, v: &mut dyn Visitor) {
            v.section(&FieldSpec::required("api", "API_"), &self.api);
            v.section(&FieldSpec::required("public", "PUBLIC_"), &self.public);
            v.leaf(&FieldSpec::required("name", "NAME"), &self.name);
        }
    }

    impl Layered for Mirror {
        fn section_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
            match name {
                "api" => Some(&mut self.api),
                "public" => Some(&mut self.public),
                _ => None,
            }
        }
    }

    #[derive(Debug, Default, Clone, PartialEq, Deserialize)]
    #[serde(default)]
    struct LegacyApi {
        token: u64,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Legacy {
        api: LegacyApi,
    }

    impl Schema for Legacy {
        fn visit(&self, v: &mut dyn Visitor) {
            v.leaf(&FieldSpec::optional("apiToken", "API_TOKEN"), &self.api.token);
        }
    }

    impl Layered for Legacy {
        fn section_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
            match name {
                "api" => Some(&mut self.api),
                _ => None,
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    struct Opaque {}

    impl Schema for Opaque {
        fn visit(&self, _: &mut dyn Visitor) {}
    }

    impl Layered for Opaque {}

    #[test]
    fn test_matching_sections_are_copied() {
        let base = sample_base();
        let mut mirror = Mirror {
            name: "worker".into(),
            ..Default::default()
        };
        mirror.api.token = "overlay".into();

        let copied = merge_base(&base, &mut mirror);

        assert_eq!(copied, vec!["public", "api"]);
        assert_eq!(mirror.api.token, "changeme");
        assert_eq!(mirror.public.hostname, "example.com");
        assert_eq!(mirror.name, "worker");
    }

    #[test]
    fn test_type_mismatch_is_left_untouched() {
        let base = sample_base();
        let mut legacy = Legacy {
            api: LegacyApi { token: 42 },
        };

        let copied = merge_base(&base, &mut legacy);

        assert!(copied.is_empty());
        assert_eq!(legacy.api, LegacyApi { token: 42 });
    }

    #[test]
    fn test_default_layered_accepts_nothing() {
        let mut opaque = Opaque {};
        assert!(merge_base(&sample_base(), &mut opaque).is_empty());
    }

    #[test]
    fn test_base_into_base_equals_assignment() {
        let base = sample_base();
        let mut target = BaseConfig::default();
        target.database.uri = "postgres://stale".into();

        let copied = merge_base(&base, &mut target);

        assert_eq!(copied.len(), BaseConfig::SECTIONS.len());
        assert_eq!(target, base);
    }
}
