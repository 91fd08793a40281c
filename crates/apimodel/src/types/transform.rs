use std::collections::HashMap;
use std::sync::Arc;

use super::model::{
    ArrayTypeItem, ClassTypeItem, LambdaTypeItem, PrimitiveTypeItem, TypeItem, TypeModifiers,
    TypeNullability, VariableTypeItem, WildcardTypeItem,
};

/// One transform per variant, each defaulting to identity.
///
/// A variable may be replaced by any type, every other variant maps to
/// the same variant.
pub trait TypeTransformer {
    fn transform_primitive(&self, ty: &Arc<PrimitiveTypeItem>) -> Arc<PrimitiveTypeItem> {
        Arc::clone(ty)
    }

    fn transform_array(&self, ty: &Arc<ArrayTypeItem>) -> Arc<ArrayTypeItem> {
        Arc::clone(ty)
    }

    fn transform_class(&self, ty: &Arc<ClassTypeItem>) -> Arc<ClassTypeItem> {
        Arc::clone(ty)
    }

    fn transform_lambda(&self, ty: &Arc<LambdaTypeItem>) -> Arc<LambdaTypeItem> {
        Arc::clone(ty)
    }

    fn transform_variable(&self, ty: &Arc<VariableTypeItem>) -> TypeItem {
        TypeItem::Variable(Arc::clone(ty))
    }

    fn transform_wildcard(&self, ty: &Arc<WildcardTypeItem>) -> Arc<WildcardTypeItem> {
        Arc::clone(ty)
    }
}

impl TypeItem {
    pub fn transform<T: TypeTransformer + ?Sized>(&self, transformer: &T) -> TypeItem {
        match self {
            TypeItem::Primitive(ty) => TypeItem::Primitive(transformer.transform_primitive(ty)),
            TypeItem::Array(ty) => TypeItem::Array(transformer.transform_array(ty)),
            TypeItem::Class(ty) => TypeItem::Class(transformer.transform_class(ty)),
            TypeItem::Lambda(ty) => TypeItem::Lambda(transformer.transform_lambda(ty)),
            TypeItem::Variable(ty) => transformer.transform_variable(ty),
            TypeItem::Wildcard(ty) => TypeItem::Wildcard(transformer.transform_wildcard(ty)),
        }
    }

    /// Replaces every variable bound in `bindings`, sharing untouched subtrees.
    pub fn substitute_type_parameters(&self, bindings: &TypeParameterBindings) -> TypeItem {
        if bindings.is_empty() {
            return self.clone();
        }
        self.transform(&BindingsTransformer { bindings })
    }
}

/// Rebuilding transformer: transforms modifiers and children, and only
/// substitutes a node when one of them came back as a different instance.
///
/// Overriding a variant method replaces the rebuild for that variant; call
/// the matching `rebuild_*` function to keep the recursion.
pub trait BaseTypeTransformer {
    fn transform_modifiers(&self, modifiers: &Arc<TypeModifiers>) -> Arc<TypeModifiers> {
        Arc::clone(modifiers)
    }

    fn transform_primitive_type(&self, ty: &Arc<PrimitiveTypeItem>) -> Arc<PrimitiveTypeItem> {
        rebuild_primitive(self, ty)
    }

    fn transform_array_type(&self, ty: &Arc<ArrayTypeItem>) -> Arc<ArrayTypeItem> {
        rebuild_array(self, ty)
    }

    fn transform_class_type(&self, ty: &Arc<ClassTypeItem>) -> Arc<ClassTypeItem> {
        rebuild_class(self, ty)
    }

    fn transform_lambda_type(&self, ty: &Arc<LambdaTypeItem>) -> Arc<LambdaTypeItem> {
        rebuild_lambda(self, ty)
    }

    fn transform_variable_type(&self, ty: &Arc<VariableTypeItem>) -> TypeItem {
        TypeItem::Variable(rebuild_variable(self, ty))
    }

    fn transform_wildcard_type(&self, ty: &Arc<WildcardTypeItem>) -> Arc<WildcardTypeItem> {
        rebuild_wildcard(self, ty)
    }
}

impl<T: BaseTypeTransformer + ?Sized> TypeTransformer for T {
    fn transform_primitive(&self, ty: &Arc<PrimitiveTypeItem>) -> Arc<PrimitiveTypeItem> {
        self.transform_primitive_type(ty)
    }

    fn transform_array(&self, ty: &Arc<ArrayTypeItem>) -> Arc<ArrayTypeItem> {
        self.transform_array_type(ty)
    }

    fn transform_class(&self, ty: &Arc<ClassTypeItem>) -> Arc<ClassTypeItem> {
        self.transform_class_type(ty)
    }

    fn transform_lambda(&self, ty: &Arc<LambdaTypeItem>) -> Arc<LambdaTypeItem> {
        self.transform_lambda_type(ty)
    }

    fn transform_variable(&self, ty: &Arc<VariableTypeItem>) -> TypeItem {
        self.transform_variable_type(ty)
    }

    fn transform_wildcard(&self, ty: &Arc<WildcardTypeItem>) -> Arc<WildcardTypeItem> {
        self.transform_wildcard_type(ty)
    }
}

/// Transforms each item; `None` when every result is the original instance.
fn transform_each<T: BaseTypeTransformer + ?Sized>(
    transformer: &T,
    items: &[TypeItem],
) -> Option<Vec<TypeItem>> {
    let mut changed: Option<Vec<TypeItem>> = None;
    for (index, item) in items.iter().enumerate() {
        let transformed = item.transform(transformer);
        match &mut changed {
            Some(list) => list.push(transformed),
            None if !transformed.ptr_eq(item) => {
                let mut list = Vec::with_capacity(items.len());
                list.extend(items[..index].iter().cloned());
                list.push(transformed);
                changed = Some(list);
            }
            None => {}
        }
    }
    changed
}

fn transform_optional<T: BaseTypeTransformer + ?Sized>(
    transformer: &T,
    item: Option<&TypeItem>,
) -> (Option<TypeItem>, bool) {
    match item {
        Some(item) => {
            let transformed = item.transform(transformer);
            let same = transformed.ptr_eq(item);
            (Some(transformed), same)
        }
        None => (None, true),
    }
}

pub fn rebuild_primitive<T: BaseTypeTransformer + ?Sized>(
    transformer: &T,
    ty: &Arc<PrimitiveTypeItem>,
) -> Arc<PrimitiveTypeItem> {
    let modifiers = transformer.transform_modifiers(ty.modifiers());
    if Arc::ptr_eq(&modifiers, ty.modifiers()) {
        Arc::clone(ty)
    } else {
        ty.substitute(modifiers)
    }
}

pub fn rebuild_array<T: BaseTypeTransformer + ?Sized>(
    transformer: &T,
    ty: &Arc<ArrayTypeItem>,
) -> Arc<ArrayTypeItem> {
    let modifiers = transformer.transform_modifiers(ty.modifiers());
    let component = ty.component_type().transform(transformer);
    if Arc::ptr_eq(&modifiers, ty.modifiers()) && component.ptr_eq(ty.component_type()) {
        Arc::clone(ty)
    } else {
        ty.substitute(modifiers, component)
    }
}

fn rebuild_class_parts<T: BaseTypeTransformer + ?Sized>(
    transformer: &T,
    ty: &ClassTypeItem,
) -> Option<(Arc<TypeModifiers>, Option<Arc<ClassTypeItem>>, Vec<TypeItem>)> {
    let modifiers = transformer.transform_modifiers(ty.modifiers());
    let outer = ty
        .outer_class_type()
        .map(|outer| transformer.transform_class_type(outer));
    let arguments = transform_each(transformer, ty.arguments());

    let same_modifiers = Arc::ptr_eq(&modifiers, ty.modifiers());
    let same_outer = match (&outer, ty.outer_class_type()) {
        (Some(new), Some(old)) => Arc::ptr_eq(new, old),
        _ => true,
    };
    if same_modifiers && same_outer && arguments.is_none() {
        return None;
    }
    let arguments = arguments.unwrap_or_else(|| ty.arguments().to_vec());
    Some((modifiers, outer, arguments))
}

pub fn rebuild_class<T: BaseTypeTransformer + ?Sized>(
    transformer: &T,
    ty: &Arc<ClassTypeItem>,
) -> Arc<ClassTypeItem> {
    match rebuild_class_parts(transformer, ty) {
        Some((modifiers, outer, arguments)) => ty.substitute(modifiers, outer, arguments),
        None => Arc::clone(ty),
    }
}

pub fn rebuild_lambda<T: BaseTypeTransformer + ?Sized>(
    transformer: &T,
    ty: &Arc<LambdaTypeItem>,
) -> Arc<LambdaTypeItem> {
    match rebuild_class_parts(transformer, ty.as_class_type()) {
        Some((modifiers, outer, arguments)) => ty.substitute(modifiers, outer, arguments),
        None => Arc::clone(ty),
    }
}

pub fn rebuild_variable<T: BaseTypeTransformer + ?Sized>(
    transformer: &T,
    ty: &Arc<VariableTypeItem>,
) -> Arc<VariableTypeItem> {
    let modifiers = transformer.transform_modifiers(ty.modifiers());
    if Arc::ptr_eq(&modifiers, ty.modifiers()) {
        Arc::clone(ty)
    } else {
        ty.substitute(modifiers)
    }
}

pub fn rebuild_wildcard<T: BaseTypeTransformer + ?Sized>(
    transformer: &T,
    ty: &Arc<WildcardTypeItem>,
) -> Arc<WildcardTypeItem> {
    let modifiers = transformer.transform_modifiers(ty.modifiers());
    let (extends_bound, same_extends) = transform_optional(transformer, ty.extends_bound());
    let (super_bound, same_super) = transform_optional(transformer, ty.super_bound());
    if Arc::ptr_eq(&modifiers, ty.modifiers()) && same_extends && same_super {
        Arc::clone(ty)
    } else {
        ty.substitute(modifiers, extends_bound, super_bound)
    }
}

/// Type parameter name to the type that replaces it.
pub type TypeParameterBindings = HashMap<String, TypeItem>;

struct BindingsTransformer<'a> {
    bindings: &'a TypeParameterBindings,
}

impl BaseTypeTransformer for BindingsTransformer<'_> {
    fn transform_variable_type(&self, ty: &Arc<VariableTypeItem>) -> TypeItem {
        match self.bindings.get(ty.name()) {
            // `T?` stays nullable whatever `T` is bound to.
            Some(replacement) if ty.modifiers().nullability() == TypeNullability::Nullable => {
                replacement.with_nullability(TypeNullability::Nullable)
            }
            Some(replacement) => replacement.clone(),
            None => TypeItem::Variable(rebuild_variable(self, ty)),
        }
    }
}
