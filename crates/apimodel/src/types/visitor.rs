use std::sync::Arc;

use super::model::{
    ArrayTypeItem, ClassTypeItem, LambdaTypeItem, PrimitiveTypeItem, TypeItem, VariableTypeItem,
    WildcardTypeItem,
};

/// Single dispatch over the closed set of type variants.
///
/// Implementations that want depth-first traversal with a generic hook
/// should implement [`BaseTypeVisitor`] instead.
pub trait TypeVisitor {
    fn visit_primitive(&mut self, _ty: &Arc<PrimitiveTypeItem>) {}
    fn visit_array(&mut self, _ty: &Arc<ArrayTypeItem>) {}
    fn visit_class(&mut self, _ty: &Arc<ClassTypeItem>) {}
    fn visit_lambda(&mut self, _ty: &Arc<LambdaTypeItem>) {}
    fn visit_variable(&mut self, _ty: &Arc<VariableTypeItem>) {}
    fn visit_wildcard(&mut self, _ty: &Arc<WildcardTypeItem>) {}
}

impl TypeItem {
    pub fn accept<V: TypeVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            TypeItem::Primitive(ty) => visitor.visit_primitive(ty),
            TypeItem::Array(ty) => visitor.visit_array(ty),
            TypeItem::Class(ty) => visitor.visit_class(ty),
            TypeItem::Lambda(ty) => visitor.visit_lambda(ty),
            TypeItem::Variable(ty) => visitor.visit_variable(ty),
            TypeItem::Wildcard(ty) => visitor.visit_wildcard(ty),
        }
    }
}

/// Pre-order, depth-first observation of a type tree.
///
/// `visit_type` runs for every node before the variant hook. Children are
/// visited afterwards: an array's component; a class's outer class type and
/// then its arguments in order; a wildcard's extends bound and then its
/// super bound. A lambda is also reported through `visit_class_type`.
pub trait BaseTypeVisitor {
    fn visit_type(&mut self, _ty: &TypeItem) {}
    fn visit_primitive_type(&mut self, _ty: &PrimitiveTypeItem) {}
    fn visit_array_type(&mut self, _ty: &ArrayTypeItem) {}
    fn visit_class_type(&mut self, _ty: &ClassTypeItem) {}
    fn visit_lambda_type(&mut self, _ty: &LambdaTypeItem) {}
    fn visit_variable_type(&mut self, _ty: &VariableTypeItem) {}
    fn visit_wildcard_type(&mut self, _ty: &WildcardTypeItem) {}
}

fn visit_class_children<V: BaseTypeVisitor + ?Sized>(visitor: &mut V, ty: &ClassTypeItem) {
    if let Some(outer) = ty.outer_class_type() {
        visitor.visit_class(outer);
    }
    for argument in ty.arguments() {
        argument.accept(visitor);
    }
}

impl<V: BaseTypeVisitor + ?Sized> TypeVisitor for V {
    fn visit_primitive(&mut self, ty: &Arc<PrimitiveTypeItem>) {
        self.visit_type(&TypeItem::Primitive(Arc::clone(ty)));
        self.visit_primitive_type(ty);
    }

    fn visit_array(&mut self, ty: &Arc<ArrayTypeItem>) {
        self.visit_type(&TypeItem::Array(Arc::clone(ty)));
        self.visit_array_type(ty);
        ty.component_type().accept(self);
    }

    fn visit_class(&mut self, ty: &Arc<ClassTypeItem>) {
        self.visit_type(&TypeItem::Class(Arc::clone(ty)));
        self.visit_class_type(ty);
        visit_class_children(self, ty);
    }

    fn visit_lambda(&mut self, ty: &Arc<LambdaTypeItem>) {
        self.visit_type(&TypeItem::Lambda(Arc::clone(ty)));
        self.visit_class_type(ty.as_class_type());
        self.visit_lambda_type(ty);
        visit_class_children(self, ty.as_class_type());
    }

    fn visit_variable(&mut self, ty: &Arc<VariableTypeItem>) {
        self.visit_type(&TypeItem::Variable(Arc::clone(ty)));
        self.visit_variable_type(ty);
    }

    fn visit_wildcard(&mut self, ty: &Arc<WildcardTypeItem>) {
        self.visit_type(&TypeItem::Wildcard(Arc::clone(ty)));
        self.visit_wildcard_type(ty);
        if let Some(bound) = ty.extends_bound() {
            bound.accept(self);
        }
        if let Some(bound) = ty.super_bound() {
            bound.accept(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    struct CountClasses(usize);

    impl TypeVisitor for CountClasses {
        fn visit_class(&mut self, _ty: &Arc<ClassTypeItem>) {
            self.0 += 1;
        }
    }

    #[test]
    fn plain_visitor_dispatches_once_without_recursing() {
        let list = TypeItem::class(
            "java.util.List",
            vec![TypeItem::class("java.lang.String", vec![])],
        );
        let mut counter = CountClasses(0);
        list.accept(&mut counter);
        assert_eq!(counter.0, 1);

        TypeItem::primitive(PrimitiveKind::Int).accept(&mut counter);
        assert_eq!(counter.0, 1);
    }
}
