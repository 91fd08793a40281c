use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

use super::info::{AnnotationAttribute, AnnotationItem, Showability};

/// Everything a classifier may consult about one annotation identity.
#[derive(Clone, Copy, Debug)]
pub struct AnnotationContext<'a> {
    pub qualified_name: &'a str,
    pub attributes: &'a [AnnotationAttribute],
    /// Annotations on the annotation class itself, when the codebase defines it.
    pub meta_annotations: &'a [AnnotationItem],
}

/// Known annotation semantics layered over the name-only nullability classification.
pub trait AnnotationClassifier: Send + Sync + fmt::Debug {
    /// Attributes that distinguish annotation identities for this classifier.
    fn relevant_attributes(
        &self,
        _qualified_name: &str,
        _attributes: &[AnnotationAttribute],
    ) -> Vec<AnnotationAttribute> {
        Vec::new()
    }

    fn showability(&self, _context: &AnnotationContext<'_>) -> Showability {
        Showability::NO_EFFECT
    }

    fn hide(&self, _context: &AnnotationContext<'_>) -> bool {
        false
    }

    fn suppress_compatibility(&self, _context: &AnnotationContext<'_>) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoEffectClassifier;

impl AnnotationClassifier for NoEffectClassifier {}

/// Filter lists as written in configuration, e.g.
/// `android.annotation.SystemApi(client=MODULE_LIBRARIES)`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationFilters {
    #[serde(default)]
    pub show_annotations: Vec<String>,
    #[serde(default)]
    pub show_single_annotations: Vec<String>,
    #[serde(default)]
    pub show_for_stub_purposes_annotations: Vec<String>,
    #[serde(default)]
    pub hide_annotations: Vec<String>,
    #[serde(default)]
    pub hide_meta_annotations: Vec<String>,
    #[serde(default)]
    pub suppress_compatibility_meta_annotations: Vec<String>,
}

impl AnnotationFilters {
    pub fn from_json(content: &str) -> Result<Self, ModelError> {
        serde_json::from_str(content)
            .map_err(|err| ModelError::from(err).context("annotation filters"))
    }

    /// Reads filters from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|err| err.context(path.display()))
    }
}

/// One parsed filter entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationFilter {
    qualified_name: String,
    attributes: Vec<AnnotationAttribute>,
}

impl AnnotationFilter {
    pub fn parse(source: &str) -> Result<Self, ModelError> {
        static FILTER_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = FILTER_REGEX.get_or_init(|| {
            Regex::new(r"^\s*([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)\s*(?:\((.*)\))?\s*$")
                .expect("annotation filter regex is valid")
        });

        let captures = regex
            .captures(source)
            .ok_or_else(|| ModelError::InvalidAnnotationFilter(source.to_string()))?;
        let qualified_name = captures[1].to_string();

        let mut attributes = Vec::new();
        if let Some(list) = captures.get(2) {
            for pair in list.as_str().split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let (name, value) = pair
                    .split_once('=')
                    .ok_or_else(|| ModelError::InvalidAnnotationFilter(source.to_string()))?;
                let name = name.trim();
                let value = value.trim();
                if name.is_empty() || value.is_empty() {
                    return Err(ModelError::InvalidAnnotationFilter(source.to_string()));
                }
                attributes.push(AnnotationAttribute::new(name, value));
            }
        }

        Ok(Self {
            qualified_name,
            attributes,
        })
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn matches(&self, qualified_name: &str, attributes: &[AnnotationAttribute]) -> bool {
        qualified_name == self.qualified_name
            && self.attributes.iter().all(|expected| {
                attributes.iter().any(|actual| {
                    actual.name == expected.name
                        && attribute_value_matches(&actual.value, &expected.value)
                })
            })
    }
}

/// Enum constants may be written qualified in source and unqualified in filters.
fn attribute_value_matches(actual: &str, expected: &str) -> bool {
    let actual = actual.trim();
    actual == expected
        || actual
            .strip_suffix(expected)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn parse_all(sources: &[String]) -> Result<Vec<AnnotationFilter>, ModelError> {
    sources
        .iter()
        .map(|source| AnnotationFilter::parse(source))
        .collect()
}

fn any_matches(
    filters: &[AnnotationFilter],
    name: &str,
    attributes: &[AnnotationAttribute],
) -> bool {
    filters.iter().any(|filter| filter.matches(name, attributes))
}

/// Classifier driven by [`AnnotationFilters`].
#[derive(Clone, Debug, Default)]
pub struct FilterClassifier {
    show: Vec<AnnotationFilter>,
    show_single: Vec<AnnotationFilter>,
    show_for_stub_purposes: Vec<AnnotationFilter>,
    hide: Vec<AnnotationFilter>,
    hide_meta: Vec<AnnotationFilter>,
    suppress_compatibility_meta: Vec<AnnotationFilter>,
}

impl FilterClassifier {
    pub fn new(filters: &AnnotationFilters) -> Result<Self, ModelError> {
        Ok(Self {
            show: parse_all(&filters.show_annotations)?,
            show_single: parse_all(&filters.show_single_annotations)?,
            show_for_stub_purposes: parse_all(&filters.show_for_stub_purposes_annotations)?,
            hide: parse_all(&filters.hide_annotations)?,
            hide_meta: parse_all(&filters.hide_meta_annotations)?,
            suppress_compatibility_meta: parse_all(
                &filters.suppress_compatibility_meta_annotations,
            )?,
        })
    }

    fn all_filters(&self) -> impl Iterator<Item = &AnnotationFilter> {
        self.show
            .iter()
            .chain(&self.show_single)
            .chain(&self.show_for_stub_purposes)
            .chain(&self.hide)
            .chain(&self.hide_meta)
            .chain(&self.suppress_compatibility_meta)
    }
}

impl AnnotationClassifier for FilterClassifier {
    fn relevant_attributes(
        &self,
        qualified_name: &str,
        attributes: &[AnnotationAttribute],
    ) -> Vec<AnnotationAttribute> {
        let names: BTreeSet<&str> = self
            .all_filters()
            .filter(|filter| filter.qualified_name == qualified_name)
            .flat_map(|filter| filter.attributes.iter().map(|a| a.name.as_str()))
            .collect();

        let mut relevant: Vec<AnnotationAttribute> = attributes
            .iter()
            .filter(|attribute| names.contains(attribute.name.as_str()))
            .cloned()
            .collect();
        relevant.sort();
        relevant
    }

    fn showability(&self, context: &AnnotationContext<'_>) -> Showability {
        let name = context.qualified_name;
        let attributes = context.attributes;
        if any_matches(&self.show, name, attributes) {
            Showability::new(true, true, false)
        } else if any_matches(&self.show_single, name, attributes) {
            Showability::new(true, false, false)
        } else if any_matches(&self.show_for_stub_purposes, name, attributes) {
            Showability::new(true, true, true)
        } else {
            Showability::NO_EFFECT
        }
    }

    fn hide(&self, context: &AnnotationContext<'_>) -> bool {
        any_matches(&self.hide, context.qualified_name, context.attributes)
            || context
                .meta_annotations
                .iter()
                .any(|meta| any_matches(&self.hide_meta, &meta.qualified_name, &meta.attributes))
    }

    fn suppress_compatibility(&self, context: &AnnotationContext<'_>) -> bool {
        context.meta_annotations.iter().any(|meta| {
            any_matches(
                &self.suppress_compatibility_meta,
                &meta.qualified_name,
                &meta.attributes,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(
        name: &'a str,
        attributes: &'a [AnnotationAttribute],
        meta: &'a [AnnotationItem],
    ) -> AnnotationContext<'a> {
        AnnotationContext {
            qualified_name: name,
            attributes,
            meta_annotations: meta,
        }
    }

    #[test]
    fn parses_plain_and_attributed_filters() {
        let plain = AnnotationFilter::parse("android.annotation.SystemApi").unwrap();
        assert_eq!(plain.qualified_name(), "android.annotation.SystemApi");
        assert!(plain.attributes.is_empty());

        let attributed =
            AnnotationFilter::parse("android.annotation.SystemApi(client=MODULE_LIBRARIES)")
                .unwrap();
        assert_eq!(
            attributed.attributes,
            vec![AnnotationAttribute::new("client", "MODULE_LIBRARIES")]
        );
    }

    #[test]
    fn rejects_malformed_filters() {
        assert!(AnnotationFilter::parse("not a name").is_err());
        assert!(AnnotationFilter::parse("a.B(client)").is_err());
    }

    #[test]
    fn attribute_filter_accepts_qualified_enum_values() {
        let filter =
            AnnotationFilter::parse("android.annotation.SystemApi(client=MODULE_LIBRARIES)")
                .unwrap();
        let qualified = [AnnotationAttribute::new(
            "client",
            "android.annotation.SystemApi.Client.MODULE_LIBRARIES",
        )];
        let other = [AnnotationAttribute::new("client", "PRIVILEGED_APPS")];

        assert!(filter.matches("android.annotation.SystemApi", &qualified));
        assert!(!filter.matches("android.annotation.SystemApi", &other));
        assert!(!filter.matches("android.annotation.SystemApi", &[]));
    }

    #[test]
    fn filter_classifier_assigns_showability() {
        let classifier = FilterClassifier::new(&AnnotationFilters {
            show_annotations: vec!["test.Show".into()],
            show_single_annotations: vec!["test.ShowSingle".into()],
            show_for_stub_purposes_annotations: vec!["test.ForStubs".into()],
            ..AnnotationFilters::default()
        })
        .unwrap();

        let show = classifier.showability(&context("test.Show", &[], &[]));
        assert!(show.show() && show.recursive());

        let single = classifier.showability(&context("test.ShowSingle", &[], &[]));
        assert!(single.show_non_recursive());

        let stubs = classifier.showability(&context("test.ForStubs", &[], &[]));
        assert!(stubs.show_for_stubs_only());

        assert_eq!(
            classifier.showability(&context("test.Other", &[], &[])),
            Showability::NO_EFFECT
        );
    }

    #[test]
    fn hide_follows_direct_and_meta_annotations() {
        let classifier = FilterClassifier::new(&AnnotationFilters {
            hide_annotations: vec!["test.Hide".into()],
            hide_meta_annotations: vec!["test.HideMeta".into()],
            suppress_compatibility_meta_annotations: vec!["test.Experimental".into()],
            ..AnnotationFilters::default()
        })
        .unwrap();

        assert!(classifier.hide(&context("test.Hide", &[], &[])));

        let meta = [AnnotationItem::new("test.HideMeta")];
        assert!(classifier.hide(&context("test.Internal", &[], &meta)));
        assert!(!classifier.hide(&context("test.Internal", &[], &[])));

        let experimental = [AnnotationItem::new("test.Experimental")];
        assert!(classifier.suppress_compatibility(&context("test.Preview", &[], &experimental)));
    }

    #[test]
    fn relevant_attributes_are_those_named_by_filters() {
        let classifier = FilterClassifier::new(&AnnotationFilters {
            show_annotations: vec!["test.Api(client=A)".into()],
            ..AnnotationFilters::default()
        })
        .unwrap();

        let attributes = [
            AnnotationAttribute::new("process", "ALL"),
            AnnotationAttribute::new("client", "A"),
        ];
        assert_eq!(
            classifier.relevant_attributes("test.Api", &attributes),
            vec![AnnotationAttribute::new("client", "A")]
        );
        assert!(classifier.relevant_attributes("test.Other", &attributes).is_empty());
    }

    #[test]
    fn filters_load_from_json() {
        let filters = AnnotationFilters::from_json(
            r#"{ "showAnnotations": ["test.Show"], "hideAnnotations": ["test.Hide"] }"#,
        )
        .unwrap();
        assert_eq!(filters.show_annotations, vec!["test.Show".to_string()]);
        assert!(filters.show_single_annotations.is_empty());

        let err = AnnotationFilters::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ModelError::Serialization(_)));
    }
}
