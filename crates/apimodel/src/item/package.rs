use std::fmt;
use std::ptr;

use crate::types::TypeItem;

use super::class::ClassItem;
use super::codebase::{Codebase, PackageData, TypeAliasData};
use super::{
    ClassOrigin, Item, ItemKey, ItemModifiers, PackageId, ParentItem, TypeAliasId, TypeParameter,
    TypedItem,
};

#[derive(Clone, Copy)]
pub struct PackageItem<'a> {
    codebase: &'a Codebase,
    id: PackageId,
}

impl<'a> PackageItem<'a> {
    pub(crate) fn new(codebase: &'a Codebase, id: PackageId) -> Self {
        Self { codebase, id }
    }

    fn data(&self) -> &'a PackageData {
        self.codebase.package_data(self.id)
    }

    pub fn id(&self) -> PackageId {
        self.id
    }

    /// Dotted package name; empty for the default package.
    pub fn name(&self) -> &'a str {
        &self.data().decl.name
    }

    pub fn top_level_classes(self) -> impl Iterator<Item = ClassItem<'a>> + 'a {
        let codebase = self.codebase;
        self.data()
            .classes
            .iter()
            .map(move |id| ClassItem::new(codebase, *id))
    }

    /// Every class in the package, each followed by its nested classes.
    pub fn all_classes(self) -> Vec<ClassItem<'a>> {
        let mut classes = Vec::new();
        let mut pending: Vec<ClassItem<'a>> = self.top_level_classes().collect();
        pending.reverse();
        while let Some(class) = pending.pop() {
            classes.push(class);
            let nested: Vec<_> = class.nested_classes().collect();
            pending.extend(nested.into_iter().rev());
        }
        classes
    }

    pub fn type_aliases(self) -> impl Iterator<Item = TypeAliasItem<'a>> + 'a {
        let codebase = self.codebase;
        self.data()
            .type_aliases
            .iter()
            .map(move |id| TypeAliasItem::new(codebase, *id))
    }
}

impl<'a> Item<'a> for PackageItem<'a> {
    fn codebase(&self) -> &'a Codebase {
        self.codebase
    }

    fn modifiers(&self) -> &'a ItemModifiers {
        &self.data().decl.modifiers
    }

    fn documentation(&self) -> &'a str {
        &self.data().decl.documentation
    }

    fn key(&self) -> ItemKey {
        ItemKey::Package(self.name().to_string())
    }

    fn origin(&self) -> ClassOrigin {
        self.codebase.default_origin()
    }

    fn parent(&self) -> Option<ParentItem<'a>> {
        None
    }
}

impl PartialEq for PackageItem<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.codebase, other.codebase) && self.id == other.id
    }
}

impl Eq for PackageItem<'_> {}

impl fmt::Debug for PackageItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PackageItem").field(&self.name()).finish()
    }
}

/// A package-level type alias. Its type is fixed once declared.
#[derive(Clone, Copy)]
pub struct TypeAliasItem<'a> {
    codebase: &'a Codebase,
    id: TypeAliasId,
}

impl<'a> TypeAliasItem<'a> {
    pub(crate) fn new(codebase: &'a Codebase, id: TypeAliasId) -> Self {
        Self { codebase, id }
    }

    fn data(&self) -> &'a TypeAliasData {
        self.codebase.type_alias_data(self.id)
    }

    pub fn id(&self) -> TypeAliasId {
        self.id
    }

    pub fn qualified_name(&self) -> &'a str {
        &self.data().decl.qualified_name
    }

    pub fn simple_name(&self) -> &'a str {
        let qualified_name = self.qualified_name();
        qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(qualified_name)
    }

    pub fn package(&self) -> PackageItem<'a> {
        PackageItem::new(self.codebase, self.data().package)
    }

    pub fn type_parameters(&self) -> &'a [TypeParameter] {
        &self.data().decl.type_parameters
    }
}

impl<'a> Item<'a> for TypeAliasItem<'a> {
    fn codebase(&self) -> &'a Codebase {
        self.codebase
    }

    fn modifiers(&self) -> &'a ItemModifiers {
        &self.data().decl.modifiers
    }

    fn documentation(&self) -> &'a str {
        &self.data().decl.documentation
    }

    fn key(&self) -> ItemKey {
        ItemKey::TypeAlias(self.qualified_name().to_string())
    }

    fn origin(&self) -> ClassOrigin {
        self.codebase.default_origin()
    }

    fn parent(&self) -> Option<ParentItem<'a>> {
        Some(ParentItem::Package(self.package()))
    }
}

impl<'a> TypedItem<'a> for TypeAliasItem<'a> {
    fn ty(&self) -> &'a TypeItem {
        &self.data().decl.ty
    }
}

impl PartialEq for TypeAliasItem<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.codebase, other.codebase) && self.id == other.id
    }
}

impl Eq for TypeAliasItem<'_> {}

impl fmt::Debug for TypeAliasItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeAliasItem")
            .field(&self.qualified_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::item::{ClassDeclaration, Codebase, Item, TypeAliasDeclaration, TypedItem};
    use crate::types::{PrimitiveKind, TypeItem};

    #[test]
    fn all_classes_lists_nested_after_their_container() {
        let mut builder = Codebase::builder("packages");
        let package = builder.package("test.pkg");
        let a = builder
            .add_class(package, None, ClassDeclaration::new("test.pkg.A"))
            .expect("A");
        builder
            .add_class(package, Some(a), ClassDeclaration::new("test.pkg.A.Inner"))
            .expect("A.Inner");
        builder
            .add_class(package, None, ClassDeclaration::new("test.pkg.B"))
            .expect("B");
        builder
            .add_type_alias(
                package,
                TypeAliasDeclaration::new(
                    "test.pkg.Count",
                    TypeItem::primitive(PrimitiveKind::Int),
                ),
            )
            .expect("alias");
        let codebase = builder.build();

        let package = codebase.find_package("test.pkg").expect("package");
        let names: Vec<_> = package
            .all_classes()
            .into_iter()
            .map(|class| class.qualified_name())
            .collect();
        assert_eq!(names, vec!["test.pkg.A", "test.pkg.A.Inner", "test.pkg.B"]);
        assert_eq!(package.top_level_classes().count(), 2);

        let alias = codebase.find_type_alias("test.pkg.Count").expect("alias");
        assert_eq!(alias.simple_name(), "Count");
        assert_eq!(alias.ty().to_string(), "int");
        assert!(alias.parent().is_some());
        assert_eq!(package.parent(), None);
    }
}
