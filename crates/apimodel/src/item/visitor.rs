use tracing::trace;

use super::class::ClassItem;
use super::codebase::Codebase;
use super::member::MemberItem;
use super::package::{PackageItem, TypeAliasItem};
use super::MemberKind;

/// Item-graph visitor with paired hooks for codebase, package and class, and
/// single hooks for the leaf declarations.
///
/// Every hook defaults to doing nothing.
pub trait DelegatedVisitor<'a> {
    /// When true, nested classes are visited inside their container's
    /// `visit_class`/`after_visit_class` bracket. When false, a class is closed
    /// before its nested classes are visited as siblings.
    fn requires_class_nesting(&self) -> bool {
        false
    }

    fn visit_codebase(&mut self, _codebase: &'a Codebase) {}
    fn after_visit_codebase(&mut self, _codebase: &'a Codebase) {}

    fn visit_package(&mut self, _package: PackageItem<'a>) {}
    fn after_visit_package(&mut self, _package: PackageItem<'a>) {}

    fn visit_class(&mut self, _class: ClassItem<'a>) {}
    fn after_visit_class(&mut self, _class: ClassItem<'a>) {}

    fn visit_constructor(&mut self, _constructor: MemberItem<'a>) {}
    fn visit_method(&mut self, _method: MemberItem<'a>) {}
    fn visit_property(&mut self, _property: MemberItem<'a>) {}
    fn visit_field(&mut self, _field: MemberItem<'a>) {}

    fn visit_type_alias(&mut self, _type_alias: TypeAliasItem<'a>) {}
}

impl Codebase {
    /// Walks packages in name order.
    pub fn accept<'a, V: DelegatedVisitor<'a> + ?Sized>(&'a self, visitor: &mut V) {
        trace!(codebase = %self.description(), "visiting codebase");
        visitor.visit_codebase(self);
        for package in self.packages() {
            package.accept(visitor);
        }
        visitor.after_visit_codebase(self);
    }
}

impl<'a> PackageItem<'a> {
    /// Type aliases first, then top-level classes in declaration order.
    pub fn accept<V: DelegatedVisitor<'a> + ?Sized>(self, visitor: &mut V) {
        trace!(package = %self.name(), "visiting package");
        visitor.visit_package(self);
        for type_alias in self.type_aliases() {
            visitor.visit_type_alias(type_alias);
        }
        for class in self.top_level_classes() {
            class.accept(visitor);
        }
        visitor.after_visit_package(self);
    }
}

impl<'a> ClassItem<'a> {
    /// Members are visited grouped by kind: constructors, methods, properties, fields.
    pub fn accept<V: DelegatedVisitor<'a> + ?Sized>(self, visitor: &mut V) {
        trace!(class = %self.qualified_name(), "visiting class");
        visitor.visit_class(self);
        for kind in [
            MemberKind::Constructor,
            MemberKind::Method,
            MemberKind::Property,
            MemberKind::Field,
        ] {
            for member in self.members().filter(|member| member.kind() == kind) {
                match kind {
                    MemberKind::Constructor => visitor.visit_constructor(member),
                    MemberKind::Method => visitor.visit_method(member),
                    MemberKind::Property => visitor.visit_property(member),
                    MemberKind::Field => visitor.visit_field(member),
                }
            }
        }

        if visitor.requires_class_nesting() {
            for nested in self.nested_classes() {
                nested.accept(visitor);
            }
            visitor.after_visit_class(self);
        } else {
            visitor.after_visit_class(self);
            for nested in self.nested_classes() {
                nested.accept(visitor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ClassDeclaration, MemberDeclaration};
    use crate::types::{PrimitiveKind, TypeItem};

    #[derive(Default)]
    struct MemberOrder(Vec<String>);

    impl<'a> DelegatedVisitor<'a> for MemberOrder {
        fn visit_constructor(&mut self, constructor: MemberItem<'a>) {
            self.0.push(format!("constructor {}", constructor.name()));
        }

        fn visit_method(&mut self, method: MemberItem<'a>) {
            self.0.push(format!("method {}", method.name()));
        }

        fn visit_field(&mut self, field: MemberItem<'a>) {
            self.0.push(format!("field {}", field.name()));
        }
    }

    #[test]
    fn members_are_grouped_by_kind() {
        let mut builder = Codebase::builder("visitor");
        let package = builder.package("test.pkg");
        let class = builder
            .add_class(package, None, ClassDeclaration::new("test.pkg.C"))
            .expect("class");
        let int = TypeItem::primitive(PrimitiveKind::Int);
        builder
            .add_member(class, MemberDeclaration::field("count", int.clone()))
            .expect("field");
        builder
            .add_member(class, MemberDeclaration::method("size", int))
            .expect("method");
        builder
            .add_member(class, MemberDeclaration::constructor())
            .expect("constructor");
        let codebase = builder.build();

        let mut visitor = MemberOrder::default();
        codebase.accept(&mut visitor);
        assert_eq!(
            visitor.0,
            vec!["constructor C", "method size", "field count"]
        );
    }
}
