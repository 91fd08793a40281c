mod cache;
mod filter;
mod info;

pub use cache::AnnotationInfoCache;
pub use filter::{
    AnnotationClassifier, AnnotationContext, AnnotationFilter, AnnotationFilters,
    FilterClassifier, NoEffectClassifier,
};
pub use info::{
    AnnotationAttribute, AnnotationInfo, AnnotationItem, AnnotationNullability, Showability,
    is_non_null_annotation, is_nullable_annotation,
};
