use serde::{Deserialize, Serialize};

/// A single `name = value` pair of an annotation usage, value kept as source text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationAttribute {
    pub name: String,
    pub value: String,
}

impl AnnotationAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One usage of an annotation on a declaration or a type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AnnotationItem {
    pub qualified_name: String,
    #[serde(default)]
    pub attributes: Vec<AnnotationAttribute>,
}

impl AnnotationItem {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(AnnotationAttribute::new(name, value));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    pub fn nullability(&self) -> AnnotationNullability {
        AnnotationNullability::classify(&self.qualified_name)
    }
}

/// Nullability verdict of an annotation, derived from its qualified name alone.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AnnotationNullability {
    Nullable,
    NonNull,
    #[default]
    NotNullability,
}

impl AnnotationNullability {
    pub fn classify(qualified_name: &str) -> Self {
        if is_nullable_annotation(qualified_name) {
            AnnotationNullability::Nullable
        } else if is_non_null_annotation(qualified_name) {
            AnnotationNullability::NonNull
        } else {
            AnnotationNullability::NotNullability
        }
    }

    pub fn is_nullability(self) -> bool {
        !matches!(self, AnnotationNullability::NotNullability)
    }
}

pub fn is_nullable_annotation(qualified_name: &str) -> bool {
    qualified_name.ends_with("Nullable")
}

pub fn is_non_null_annotation(qualified_name: &str) -> bool {
    qualified_name.ends_with("NonNull")
        || qualified_name.ends_with("NotNull")
        || qualified_name.ends_with("Nonnull")
}

/// How an annotation affects inclusion of the annotated item in generated API artifacts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Showability {
    show: bool,
    recursive: bool,
    for_stubs_only: bool,
}

impl Showability {
    pub const NO_EFFECT: Showability = Showability {
        show: false,
        recursive: false,
        for_stubs_only: false,
    };

    pub const fn new(show: bool, recursive: bool, for_stubs_only: bool) -> Self {
        Self {
            show,
            recursive,
            for_stubs_only,
        }
    }

    pub fn show(&self) -> bool {
        self.show
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn show_for_stubs_only(&self) -> bool {
        self.for_stubs_only
    }

    /// Shows the annotated item without propagating to the items it encloses.
    pub fn show_non_recursive(&self) -> bool {
        self.show && !self.recursive
    }

    /// Merges the verdicts of two annotations on the same item.
    pub fn combine(self, other: Showability) -> Showability {
        match (self.show, other.show) {
            (false, _) => other,
            (_, false) => self,
            _ => Showability {
                show: true,
                recursive: self.recursive || other.recursive,
                for_stubs_only: self.for_stubs_only && other.for_stubs_only,
            },
        }
    }
}

/// Classification shared by every usage of one annotation identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationInfo {
    pub(crate) qualified_name: String,
    pub(crate) attributes: Vec<AnnotationAttribute>,
    pub(crate) nullability: AnnotationNullability,
    pub(crate) showability: Showability,
    pub(crate) hide: bool,
    pub(crate) suppress_compatibility: bool,
}

impl AnnotationInfo {
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The attributes that took part in the classification, sorted by name.
    pub fn relevant_attributes(&self) -> &[AnnotationAttribute] {
        &self.attributes
    }

    pub fn nullability(&self) -> AnnotationNullability {
        self.nullability
    }

    pub fn showability(&self) -> Showability {
        self.showability
    }

    pub fn hide(&self) -> bool {
        self.hide
    }

    pub fn suppress_compatibility(&self) -> bool {
        self.suppress_compatibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullability_is_derived_from_the_name() {
        assert_eq!(
            AnnotationNullability::classify("androidx.annotation.Nullable"),
            AnnotationNullability::Nullable
        );
        assert_eq!(
            AnnotationNullability::classify("org.jetbrains.annotations.NotNull"),
            AnnotationNullability::NonNull
        );
        assert_eq!(
            AnnotationNullability::classify("javax.annotation.Nonnull"),
            AnnotationNullability::NonNull
        );
        assert_eq!(
            AnnotationNullability::classify("android.annotation.NonNull"),
            AnnotationNullability::NonNull
        );
        assert_eq!(
            AnnotationNullability::classify("java.lang.Deprecated"),
            AnnotationNullability::NotNullability
        );
    }

    #[test]
    fn showability_derivations() {
        let recursive = Showability::new(true, true, false);
        assert!(recursive.show());
        assert!(!recursive.show_non_recursive());
        assert!(!recursive.show_for_stubs_only());

        let single = Showability::new(true, false, true);
        assert!(single.show_non_recursive());
        assert!(single.show_for_stubs_only());

        assert_eq!(Showability::default(), Showability::NO_EFFECT);
        assert!(!Showability::NO_EFFECT.show_non_recursive());
    }

    #[test]
    fn combine_prefers_showing_verdicts() {
        let single = Showability::new(true, false, false);
        let stubs = Showability::new(true, true, true);

        assert_eq!(Showability::NO_EFFECT.combine(single), single);
        assert_eq!(single.combine(Showability::NO_EFFECT), single);

        let merged = single.combine(stubs);
        assert!(merged.show());
        assert!(merged.recursive());
        assert!(!merged.show_for_stubs_only());
    }

    #[test]
    fn annotation_attribute_lookup() {
        let annotation = AnnotationItem::new("android.annotation.SystemApi")
            .with_attribute("client", "MODULE_LIBRARIES");
        assert_eq!(annotation.attribute("client"), Some("MODULE_LIBRARIES"));
        assert_eq!(annotation.attribute("process"), None);
        assert_eq!(annotation.simple_name(), "SystemApi");
    }
}
