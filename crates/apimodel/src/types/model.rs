use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationItem, AnnotationNullability};
use crate::error::ModelError;

pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";

/// Nullability marker attached to one usage of a type.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TypeNullability {
    /// Unknown nullability, as for types read from unannotated Java.
    #[default]
    Platform,
    Nullable,
    NonNull,
    /// Nullability depends on a type argument.
    Undefined,
}

impl TypeNullability {
    pub fn kotlin_suffix(self) -> &'static str {
        match self {
            TypeNullability::Platform => "!",
            TypeNullability::Nullable => "?",
            TypeNullability::NonNull | TypeNullability::Undefined => "",
        }
    }
}

/// Per-usage attributes of a type, distinct from the annotations of the declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct TypeModifiers {
    nullability: TypeNullability,
    annotations: Vec<AnnotationItem>,
}

impl TypeModifiers {
    pub fn new(nullability: TypeNullability, annotations: Vec<AnnotationItem>) -> Arc<Self> {
        Arc::new(Self {
            nullability,
            annotations,
        })
    }

    pub fn platform() -> Arc<Self> {
        Self::new(TypeNullability::Platform, Vec::new())
    }

    pub fn with(nullability: TypeNullability) -> Arc<Self> {
        Self::new(nullability, Vec::new())
    }

    /// Derives the nullability marker from the first nullability annotation, if any.
    pub fn from_annotations(annotations: Vec<AnnotationItem>) -> Arc<Self> {
        let nullability = annotations
            .iter()
            .find_map(|annotation| match annotation.nullability() {
                AnnotationNullability::Nullable => Some(TypeNullability::Nullable),
                AnnotationNullability::NonNull => Some(TypeNullability::NonNull),
                AnnotationNullability::NotNullability => None,
            })
            .unwrap_or_default();
        Self::new(nullability, annotations)
    }

    pub fn nullability(&self) -> TypeNullability {
        self.nullability
    }

    pub fn annotations(&self) -> &[AnnotationItem] {
        &self.annotations
    }

    pub fn with_nullability(&self, nullability: TypeNullability) -> Arc<Self> {
        Self::new(nullability, self.annotations.clone())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Void,
}

impl PrimitiveKind {
    pub fn java_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Void => "void",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveTypeItem {
    kind: PrimitiveKind,
    modifiers: Arc<TypeModifiers>,
}

impl PrimitiveTypeItem {
    pub fn new(kind: PrimitiveKind, modifiers: Arc<TypeModifiers>) -> Arc<Self> {
        Arc::new(Self { kind, modifiers })
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn modifiers(&self) -> &Arc<TypeModifiers> {
        &self.modifiers
    }

    pub fn substitute(&self, modifiers: Arc<TypeModifiers>) -> Arc<Self> {
        Self::new(self.kind, modifiers)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArrayTypeItem {
    component_type: TypeItem,
    is_varargs: bool,
    modifiers: Arc<TypeModifiers>,
}

impl ArrayTypeItem {
    pub fn new(
        component_type: TypeItem,
        is_varargs: bool,
        modifiers: Arc<TypeModifiers>,
    ) -> Arc<Self> {
        Arc::new(Self {
            component_type,
            is_varargs,
            modifiers,
        })
    }

    pub fn component_type(&self) -> &TypeItem {
        &self.component_type
    }

    pub fn is_varargs(&self) -> bool {
        self.is_varargs
    }

    pub fn modifiers(&self) -> &Arc<TypeModifiers> {
        &self.modifiers
    }

    pub fn substitute(&self, modifiers: Arc<TypeModifiers>, component_type: TypeItem) -> Arc<Self> {
        Self::new(component_type, self.is_varargs, modifiers)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassTypeItem {
    qualified_name: String,
    arguments: Vec<TypeItem>,
    outer_class_type: Option<Arc<ClassTypeItem>>,
    modifiers: Arc<TypeModifiers>,
}

impl ClassTypeItem {
    pub fn new(
        qualified_name: impl Into<String>,
        arguments: Vec<TypeItem>,
        outer_class_type: Option<Arc<ClassTypeItem>>,
        modifiers: Arc<TypeModifiers>,
    ) -> Arc<Self> {
        Arc::new(Self {
            qualified_name: qualified_name.into(),
            arguments,
            outer_class_type,
            modifiers,
        })
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Name relative to the outer class type, or the last segment for top-level types.
    pub fn simple_name(&self) -> &str {
        if let Some(outer) = &self.outer_class_type {
            if let Some(rest) = self
                .qualified_name
                .strip_prefix(outer.qualified_name())
                .and_then(|rest| rest.strip_prefix('.'))
            {
                return rest;
            }
        }
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    pub fn arguments(&self) -> &[TypeItem] {
        &self.arguments
    }

    pub fn outer_class_type(&self) -> Option<&Arc<ClassTypeItem>> {
        self.outer_class_type.as_ref()
    }

    pub fn modifiers(&self) -> &Arc<TypeModifiers> {
        &self.modifiers
    }

    pub fn substitute(
        &self,
        modifiers: Arc<TypeModifiers>,
        outer_class_type: Option<Arc<ClassTypeItem>>,
        arguments: Vec<TypeItem>,
    ) -> Arc<Self> {
        Self::new(
            self.qualified_name.clone(),
            arguments,
            outer_class_type,
            modifiers,
        )
    }
}

/// A class type of function shape (`kotlin.jvm.functions.FunctionN` and friends).
///
/// Arguments are laid out as `[receiver,] parameters..., return`, so the
/// function-shaped accessors stay consistent with any substitution of the
/// class type's arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LambdaTypeItem {
    class_type: ClassTypeItem,
    is_suspend: bool,
    has_receiver: bool,
}

impl LambdaTypeItem {
    pub fn new(
        class_type: ClassTypeItem,
        is_suspend: bool,
        has_receiver: bool,
    ) -> Result<Arc<Self>, ModelError> {
        let required = if has_receiver { 2 } else { 1 };
        if class_type.arguments.len() < required {
            return Err(ModelError::InvalidType(format!(
                "lambda type {} needs at least {required} type arguments",
                class_type.qualified_name
            )));
        }
        Ok(Arc::new(Self {
            class_type,
            is_suspend,
            has_receiver,
        }))
    }

    pub fn as_class_type(&self) -> &ClassTypeItem {
        &self.class_type
    }

    pub fn qualified_name(&self) -> &str {
        &self.class_type.qualified_name
    }

    pub fn arguments(&self) -> &[TypeItem] {
        &self.class_type.arguments
    }

    pub fn outer_class_type(&self) -> Option<&Arc<ClassTypeItem>> {
        self.class_type.outer_class_type.as_ref()
    }

    pub fn modifiers(&self) -> &Arc<TypeModifiers> {
        &self.class_type.modifiers
    }

    pub fn is_suspend(&self) -> bool {
        self.is_suspend
    }

    pub fn receiver_type(&self) -> Option<&TypeItem> {
        if self.has_receiver {
            self.class_type.arguments.first()
        } else {
            None
        }
    }

    pub fn parameter_types(&self) -> &[TypeItem] {
        let arguments = &self.class_type.arguments;
        let start = usize::from(self.has_receiver).min(arguments.len());
        let end = arguments.len().saturating_sub(1).max(start);
        &arguments[start..end]
    }

    pub fn return_type(&self) -> Option<&TypeItem> {
        self.class_type.arguments.last()
    }

    pub fn substitute(
        &self,
        modifiers: Arc<TypeModifiers>,
        outer_class_type: Option<Arc<ClassTypeItem>>,
        arguments: Vec<TypeItem>,
    ) -> Arc<Self> {
        Arc::new(Self {
            class_type: ClassTypeItem {
                qualified_name: self.class_type.qualified_name.clone(),
                arguments,
                outer_class_type,
                modifiers,
            },
            is_suspend: self.is_suspend,
            has_receiver: self.has_receiver,
        })
    }
}

/// Reference to a type parameter by name; the bound lives on the parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariableTypeItem {
    name: String,
    modifiers: Arc<TypeModifiers>,
}

impl VariableTypeItem {
    pub fn new(name: impl Into<String>, modifiers: Arc<TypeModifiers>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            modifiers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modifiers(&self) -> &Arc<TypeModifiers> {
        &self.modifiers
    }

    pub fn substitute(&self, modifiers: Arc<TypeModifiers>) -> Arc<Self> {
        Self::new(self.name.clone(), modifiers)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WildcardTypeItem {
    extends_bound: Option<TypeItem>,
    super_bound: Option<TypeItem>,
    modifiers: Arc<TypeModifiers>,
}

impl WildcardTypeItem {
    /// Creates a wildcard, rejecting two explicit bounds.
    ///
    /// `? super T` may carry `java.lang.Object` as its implicit extends bound.
    pub fn new(
        extends_bound: Option<TypeItem>,
        super_bound: Option<TypeItem>,
        modifiers: Arc<TypeModifiers>,
    ) -> Result<Arc<Self>, ModelError> {
        if let (Some(extends), Some(_)) = (&extends_bound, &super_bound) {
            let implicit_object = extends
                .as_class()
                .is_some_and(|class| class.qualified_name() == JAVA_LANG_OBJECT);
            if !implicit_object {
                return Err(ModelError::InvalidType(format!(
                    "wildcard cannot have both an extends bound ({extends}) and a super bound"
                )));
            }
        }
        Ok(Arc::new(Self {
            extends_bound,
            super_bound,
            modifiers,
        }))
    }

    pub fn extends_bound(&self) -> Option<&TypeItem> {
        self.extends_bound.as_ref()
    }

    pub fn super_bound(&self) -> Option<&TypeItem> {
        self.super_bound.as_ref()
    }

    pub fn modifiers(&self) -> &Arc<TypeModifiers> {
        &self.modifiers
    }

    pub fn substitute(
        &self,
        modifiers: Arc<TypeModifiers>,
        extends_bound: Option<TypeItem>,
        super_bound: Option<TypeItem>,
    ) -> Arc<Self> {
        Arc::new(Self {
            extends_bound,
            super_bound,
            modifiers,
        })
    }
}

/// The shape of one type usage. Cloning is cheap; children are shared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeItem {
    Primitive(Arc<PrimitiveTypeItem>),
    Array(Arc<ArrayTypeItem>),
    Class(Arc<ClassTypeItem>),
    Lambda(Arc<LambdaTypeItem>),
    Variable(Arc<VariableTypeItem>),
    Wildcard(Arc<WildcardTypeItem>),
}

impl TypeItem {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeItem::Primitive(PrimitiveTypeItem::new(
            kind,
            TypeModifiers::with(TypeNullability::NonNull),
        ))
    }

    pub fn array(component_type: TypeItem) -> Self {
        TypeItem::Array(ArrayTypeItem::new(component_type, false, TypeModifiers::platform()))
    }

    pub fn varargs(component_type: TypeItem) -> Self {
        TypeItem::Array(ArrayTypeItem::new(component_type, true, TypeModifiers::platform()))
    }

    pub fn class(qualified_name: impl Into<String>, arguments: Vec<TypeItem>) -> Self {
        TypeItem::Class(ClassTypeItem::new(
            qualified_name,
            arguments,
            None,
            TypeModifiers::platform(),
        ))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        TypeItem::Variable(VariableTypeItem::new(name, TypeModifiers::platform()))
    }

    pub fn unbounded_wildcard() -> Self {
        TypeItem::Wildcard(Arc::new(WildcardTypeItem {
            extends_bound: None,
            super_bound: None,
            modifiers: TypeModifiers::with(TypeNullability::Undefined),
        }))
    }

    pub fn extends_wildcard(bound: TypeItem) -> Self {
        TypeItem::Wildcard(Arc::new(WildcardTypeItem {
            extends_bound: Some(bound),
            super_bound: None,
            modifiers: TypeModifiers::with(TypeNullability::Undefined),
        }))
    }

    pub fn super_wildcard(bound: TypeItem) -> Self {
        TypeItem::Wildcard(Arc::new(WildcardTypeItem {
            extends_bound: None,
            super_bound: Some(bound),
            modifiers: TypeModifiers::with(TypeNullability::Undefined),
        }))
    }

    pub fn modifiers(&self) -> &Arc<TypeModifiers> {
        match self {
            TypeItem::Primitive(ty) => ty.modifiers(),
            TypeItem::Array(ty) => ty.modifiers(),
            TypeItem::Class(ty) => ty.modifiers(),
            TypeItem::Lambda(ty) => ty.modifiers(),
            TypeItem::Variable(ty) => ty.modifiers(),
            TypeItem::Wildcard(ty) => ty.modifiers(),
        }
    }

    pub fn nullability(&self) -> TypeNullability {
        self.modifiers().nullability()
    }

    /// Same children, different modifiers.
    pub fn with_modifiers(&self, modifiers: Arc<TypeModifiers>) -> TypeItem {
        match self {
            TypeItem::Primitive(ty) => TypeItem::Primitive(ty.substitute(modifiers)),
            TypeItem::Array(ty) => {
                TypeItem::Array(ty.substitute(modifiers, ty.component_type().clone()))
            }
            TypeItem::Class(ty) => TypeItem::Class(ty.substitute(
                modifiers,
                ty.outer_class_type().cloned(),
                ty.arguments().to_vec(),
            )),
            TypeItem::Lambda(ty) => TypeItem::Lambda(ty.substitute(
                modifiers,
                ty.outer_class_type().cloned(),
                ty.arguments().to_vec(),
            )),
            TypeItem::Variable(ty) => TypeItem::Variable(ty.substitute(modifiers)),
            TypeItem::Wildcard(ty) => TypeItem::Wildcard(ty.substitute(
                modifiers,
                ty.extends_bound().cloned(),
                ty.super_bound().cloned(),
            )),
        }
    }

    pub fn with_nullability(&self, nullability: TypeNullability) -> TypeItem {
        self.with_modifiers(self.modifiers().with_nullability(nullability))
    }

    /// Reference identity of the top node; children are not compared.
    pub fn ptr_eq(&self, other: &TypeItem) -> bool {
        match (self, other) {
            (TypeItem::Primitive(a), TypeItem::Primitive(b)) => Arc::ptr_eq(a, b),
            (TypeItem::Array(a), TypeItem::Array(b)) => Arc::ptr_eq(a, b),
            (TypeItem::Class(a), TypeItem::Class(b)) => Arc::ptr_eq(a, b),
            (TypeItem::Lambda(a), TypeItem::Lambda(b)) => Arc::ptr_eq(a, b),
            (TypeItem::Variable(a), TypeItem::Variable(b)) => Arc::ptr_eq(a, b),
            (TypeItem::Wildcard(a), TypeItem::Wildcard(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_class(&self) -> Option<&ClassTypeItem> {
        match self {
            TypeItem::Class(ty) => Some(ty),
            TypeItem::Lambda(ty) => Some(ty.as_class_type()),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeItem::Primitive(_))
    }
}

impl From<Arc<ClassTypeItem>> for TypeItem {
    fn from(ty: Arc<ClassTypeItem>) -> Self {
        TypeItem::Class(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_rejects_two_explicit_bounds() {
        let err = WildcardTypeItem::new(
            Some(TypeItem::class("java.lang.Number", vec![])),
            Some(TypeItem::class("java.lang.Integer", vec![])),
            TypeModifiers::platform(),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidType(_)));
    }

    #[test]
    fn wildcard_accepts_implicit_object_extends_bound() {
        let wildcard = WildcardTypeItem::new(
            Some(TypeItem::class(JAVA_LANG_OBJECT, vec![])),
            Some(TypeItem::class("java.lang.Integer", vec![])),
            TypeModifiers::platform(),
        )
        .unwrap();
        assert!(wildcard.extends_bound().is_some());
        assert!(wildcard.super_bound().is_some());
    }

    #[test]
    fn lambda_accessors_follow_argument_layout() {
        let class_type = ClassTypeItem::new(
            "kotlin.jvm.functions.Function2",
            vec![
                TypeItem::class("java.lang.String", vec![]),
                TypeItem::class("java.lang.Integer", vec![]),
                TypeItem::class("kotlin.Unit", vec![]),
            ],
            None,
            TypeModifiers::platform(),
        );
        let lambda = LambdaTypeItem::new((*class_type).clone(), false, true).unwrap();

        assert_eq!(
            lambda.receiver_type().and_then(TypeItem::as_class).map(ClassTypeItem::qualified_name),
            Some("java.lang.String")
        );
        assert_eq!(lambda.parameter_types().len(), 1);
        assert_eq!(
            lambda.return_type().and_then(TypeItem::as_class).map(ClassTypeItem::qualified_name),
            Some("kotlin.Unit")
        );
    }

    #[test]
    fn lambda_needs_a_return_type() {
        let class_type = ClassTypeItem::new(
            "kotlin.jvm.functions.Function0",
            vec![],
            None,
            TypeModifiers::platform(),
        );
        assert!(LambdaTypeItem::new((*class_type).clone(), false, false).is_err());
    }

    #[test]
    fn modifiers_pick_up_nullability_annotations() {
        let modifiers = TypeModifiers::from_annotations(vec![
            AnnotationItem::new("java.lang.Deprecated"),
            AnnotationItem::new("androidx.annotation.Nullable"),
        ]);
        assert_eq!(modifiers.nullability(), TypeNullability::Nullable);
        assert_eq!(modifiers.annotations().len(), 2);

        let plain = TypeModifiers::from_annotations(vec![]);
        assert_eq!(plain.nullability(), TypeNullability::Platform);
    }

    #[test]
    fn nested_class_simple_name_is_relative_to_outer() {
        let outer = ClassTypeItem::new("test.Outer", vec![], None, TypeModifiers::platform());
        let inner = ClassTypeItem::new(
            "test.Outer.Inner",
            vec![],
            Some(outer),
            TypeModifiers::platform(),
        );
        assert_eq!(inner.simple_name(), "Inner");
    }

    #[test]
    fn with_nullability_keeps_children_shared() {
        let argument = TypeItem::class("java.lang.String", vec![]);
        let list = TypeItem::class("java.util.List", vec![argument.clone()]);
        let nullable = list.with_nullability(TypeNullability::Nullable);

        assert!(!nullable.ptr_eq(&list));
        let shared = &nullable.as_class().unwrap().arguments()[0];
        assert!(shared.ptr_eq(&argument));
    }
}
