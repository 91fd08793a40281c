mod display;
mod model;
mod transform;
mod visitor;

pub use display::TypeStringOptions;
pub use model::{
    ArrayTypeItem, ClassTypeItem, JAVA_LANG_OBJECT, LambdaTypeItem, PrimitiveKind,
    PrimitiveTypeItem, TypeItem, TypeModifiers, TypeNullability, VariableTypeItem,
    WildcardTypeItem,
};
pub use transform::{
    BaseTypeTransformer, TypeParameterBindings, TypeTransformer, rebuild_array, rebuild_class,
    rebuild_lambda, rebuild_primitive, rebuild_variable, rebuild_wildcard,
};
pub use visitor::{BaseTypeVisitor, TypeVisitor};
