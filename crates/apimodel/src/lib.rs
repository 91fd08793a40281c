pub mod annotation;
pub mod error;
pub mod format;
pub mod item;
pub mod options;
pub mod types;

pub use annotation::{
    AnnotationAttribute, AnnotationClassifier, AnnotationFilters, AnnotationInfo,
    AnnotationInfoCache, AnnotationItem, AnnotationNullability, FilterClassifier,
    NoEffectClassifier, Showability,
};
pub use error::ModelError;
pub use format::FileFormat;
pub use item::{
    ClassContentItem, ClassDeclaration, ClassItem, ClassKind, ClassOrigin, Codebase,
    CodebaseBuilder, DelegatedVisitor, InheritableItem, Item, ItemKey, ItemModifiers,
    MemberDeclaration, MemberItem, MemberKind, PackageDeclaration, PackageItem,
    ParameterDeclaration, ParameterItem, ParentItem, TypeAliasDeclaration, TypeAliasItem,
    TypeParameter, TypeTarget, TypedItem, VisibilityLevel,
};
pub use options::{ModelOptions, ModelOptionsBuilder, OptionKey};
pub use types::{
    BaseTypeTransformer, BaseTypeVisitor, TypeItem, TypeModifiers, TypeNullability,
    TypeParameterBindings, TypeStringOptions, TypeTransformer, TypeVisitor,
};
