use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::filter::{AnnotationClassifier, AnnotationContext};
use super::info::{AnnotationAttribute, AnnotationInfo, AnnotationItem, AnnotationNullability};

/// Interning key: qualified name plus the attributes the classifier cares about.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct AnnotationKey {
    qualified_name: String,
    attributes: Vec<AnnotationAttribute>,
}

/// Interning table holding one [`AnnotationInfo`] per annotation identity.
///
/// Lookups take the read lock; a miss classifies outside any lock and then
/// inserts under the write lock, keeping whichever entry landed first.
#[derive(Debug, Default)]
pub struct AnnotationInfoCache {
    entries: RwLock<HashMap<AnnotationKey, Arc<AnnotationInfo>>>,
}

impl AnnotationInfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the shared classification for `annotation`, computing it on first use.
    ///
    /// `meta_annotations` resolves the annotations placed on the annotation
    /// class itself and is only called on a miss.
    pub fn get_or_classify<F>(
        &self,
        annotation: &AnnotationItem,
        classifier: &dyn AnnotationClassifier,
        meta_annotations: F,
    ) -> Arc<AnnotationInfo>
    where
        F: FnOnce(&str) -> Vec<AnnotationItem>,
    {
        let key = AnnotationKey {
            qualified_name: annotation.qualified_name.clone(),
            attributes: classifier
                .relevant_attributes(&annotation.qualified_name, &annotation.attributes),
        };

        if let Some(info) = self.entries.read().get(&key) {
            return Arc::clone(info);
        }

        let meta = meta_annotations(&key.qualified_name);
        let context = AnnotationContext {
            qualified_name: &key.qualified_name,
            attributes: &key.attributes,
            meta_annotations: &meta,
        };
        let info = Arc::new(AnnotationInfo {
            qualified_name: key.qualified_name.clone(),
            attributes: key.attributes.clone(),
            nullability: AnnotationNullability::classify(&key.qualified_name),
            showability: classifier.showability(&context),
            hide: classifier.hide(&context),
            suppress_compatibility: classifier.suppress_compatibility(&context),
        });
        debug!(
            annotation = %key.qualified_name,
            attributes = key.attributes.len(),
            "classified annotation"
        );

        let mut entries = self.entries.write();
        Arc::clone(entries.entry(key).or_insert(info))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::annotation::filter::{AnnotationFilters, FilterClassifier, NoEffectClassifier};

    #[test]
    fn same_identity_is_interned_once() {
        let cache = AnnotationInfoCache::new();
        let lookups = AtomicUsize::new(0);
        let lookup = |_: &str| {
            lookups.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        };

        let first = cache.get_or_classify(
            &AnnotationItem::new("androidx.annotation.Nullable"),
            &NoEffectClassifier,
            lookup,
        );
        let second = cache.get_or_classify(
            &AnnotationItem::new("androidx.annotation.Nullable"),
            &NoEffectClassifier,
            |_| {
                lookups.fetch_add(1, Ordering::SeqCst);
                Vec::new()
            },
        );

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        assert_eq!(first.nullability(), AnnotationNullability::Nullable);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn irrelevant_attributes_share_an_entry() {
        let classifier = FilterClassifier::new(&AnnotationFilters {
            show_annotations: vec!["test.Api(client=A)".into()],
            ..AnnotationFilters::default()
        })
        .unwrap();
        let cache = AnnotationInfoCache::new();

        let a = cache.get_or_classify(
            &AnnotationItem::new("test.Api")
                .with_attribute("client", "A")
                .with_attribute("since", "1"),
            &classifier,
            |_| Vec::new(),
        );
        let a_again = cache.get_or_classify(
            &AnnotationItem::new("test.Api")
                .with_attribute("since", "2")
                .with_attribute("client", "A"),
            &classifier,
            |_| Vec::new(),
        );
        let b = cache.get_or_classify(
            &AnnotationItem::new("test.Api").with_attribute("client", "B"),
            &classifier,
            |_| Vec::new(),
        );

        assert!(Arc::ptr_eq(&a, &a_again));
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(a.showability().show());
        assert!(!b.showability().show());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_classification_converges_on_one_entry() {
        let cache = Arc::new(AnnotationInfoCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.get_or_classify(
                        &AnnotationItem::new("test.Shared"),
                        &NoEffectClassifier,
                        |_| Vec::new(),
                    )
                })
            })
            .collect();

        let infos: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.len(), 1);
        let interned = cache.get_or_classify(
            &AnnotationItem::new("test.Shared"),
            &NoEffectClassifier,
            |_| Vec::new(),
        );
        for info in &infos {
            assert_eq!(**info, *interned);
        }
    }
}
