use std::collections::HashSet;
use std::fmt;
use std::ptr;
use std::sync::Arc;

use crate::types::{ClassTypeItem, TypeItem, TypeParameterBindings};

use super::codebase::{ClassData, Codebase};
use super::member::MemberItem;
use super::package::PackageItem;
use super::{
    ClassContentItem, ClassId, ClassKind, ClassOrigin, InheritableItem, Item, ItemKey,
    ItemModifiers, MemberKind, ParentItem, TypeParameter, VisibilityLevel,
};

/// A class, interface, enum, annotation type or object declared in a codebase.
#[derive(Clone, Copy)]
pub struct ClassItem<'a> {
    codebase: &'a Codebase,
    id: ClassId,
}

impl<'a> ClassItem<'a> {
    pub(crate) fn new(codebase: &'a Codebase, id: ClassId) -> Self {
        Self { codebase, id }
    }

    fn data(&self) -> &'a ClassData {
        self.codebase.class_data(self.id)
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn qualified_name(&self) -> &'a str {
        &self.data().decl.qualified_name
    }

    /// Name relative to the containing class, or to the package for top-level classes.
    pub fn simple_name(&self) -> &'a str {
        let qualified_name = self.qualified_name();
        let prefix = match self.containing_class() {
            Some(outer) => outer.qualified_name(),
            None => self.package().name(),
        };
        qualified_name
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(qualified_name)
    }

    pub fn kind(&self) -> ClassKind {
        self.data().decl.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind() == ClassKind::Interface
    }

    pub fn package(&self) -> PackageItem<'a> {
        PackageItem::new(self.codebase, self.data().package)
    }

    pub fn is_top_level(&self) -> bool {
        self.data().containing.is_none()
    }

    pub fn nested_classes(self) -> impl Iterator<Item = ClassItem<'a>> + 'a {
        let codebase = self.codebase;
        self.data()
            .nested
            .iter()
            .map(move |id| ClassItem::new(codebase, *id))
    }

    /// Members declared directly in this class, in declaration order.
    pub fn members(self) -> impl Iterator<Item = MemberItem<'a>> + 'a {
        let codebase = self.codebase;
        self.data()
            .members
            .iter()
            .map(move |id| MemberItem::declared(codebase.member_data(*id), self))
    }

    pub fn constructors(self) -> impl Iterator<Item = MemberItem<'a>> + 'a {
        self.members_of_kind(MemberKind::Constructor)
    }

    pub fn methods(self) -> impl Iterator<Item = MemberItem<'a>> + 'a {
        self.members_of_kind(MemberKind::Method)
    }

    pub fn properties(self) -> impl Iterator<Item = MemberItem<'a>> + 'a {
        self.members_of_kind(MemberKind::Property)
    }

    pub fn fields(self) -> impl Iterator<Item = MemberItem<'a>> + 'a {
        self.members_of_kind(MemberKind::Field)
    }

    fn members_of_kind(self, kind: MemberKind) -> impl Iterator<Item = MemberItem<'a>> + 'a {
        self.members().filter(move |member| member.kind() == kind)
    }

    pub fn type_parameters(&self) -> &'a [TypeParameter] {
        &self.data().decl.type_parameters
    }

    pub fn super_class_type(&self) -> Option<&'a Arc<ClassTypeItem>> {
        self.data().decl.super_class_type.as_ref()
    }

    pub fn interface_types(&self) -> &'a [Arc<ClassTypeItem>] {
        &self.data().decl.interface_types
    }

    /// The superclass, when this codebase declares it.
    pub fn super_class(&self) -> Option<ClassItem<'a>> {
        self.super_class_type()
            .and_then(|ty| self.codebase.find_class(ty.qualified_name()))
    }

    /// Superclass chain, nearest first, stopping at the first class outside this codebase.
    pub fn super_classes(&self) -> Vec<ClassItem<'a>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([self.id]);
        let mut current = self.super_class();
        while let Some(class) = current {
            if !seen.insert(class.id) {
                break;
            }
            chain.push(class);
            current = class.super_class();
        }
        chain
    }

    /// The type of this class as seen from inside it.
    pub fn to_class_type(&self) -> Arc<ClassTypeItem> {
        self.codebase.class_type(self.id)
    }

    pub fn to_type(&self) -> TypeItem {
        TypeItem::Class(self.to_class_type())
    }

    /// Binds the superclass's type parameters to the arguments this class passes it.
    pub fn super_class_bindings(&self) -> TypeParameterBindings {
        let (Some(super_class), Some(super_type)) = (self.super_class(), self.super_class_type())
        else {
            return TypeParameterBindings::new();
        };
        super_class
            .type_parameters()
            .iter()
            .zip(super_type.arguments())
            .map(|(parameter, argument)| (parameter.name.clone(), argument.clone()))
            .collect()
    }

    /// Looks up a member by signature, declared members first, then inherited ones.
    pub fn find_member(&self, key: &ItemKey) -> Option<MemberItem<'a>> {
        self.members()
            .find(|member| member.key() == *key)
            .or_else(|| {
                self.inherited_members()
                    .into_iter()
                    .find(|member| member.key() == *key)
            })
    }

    /// Members of every superclass that this class does not redeclare, projected into it.
    ///
    /// Constructors and private members are not inherited. The nearest
    /// declaration of a signature wins.
    pub fn inherited_members(&self) -> Vec<MemberItem<'a>> {
        let mut seen: HashSet<ItemKey> = self.members().map(|member| member.key()).collect();
        let mut inherited = Vec::new();
        for ancestor in self.super_classes() {
            for member in ancestor.members() {
                if member.kind() == MemberKind::Constructor
                    || member.modifiers().visibility == VisibilityLevel::Private
                {
                    continue;
                }
                if seen.insert(member.key()) {
                    inherited.push(member.duplicate(*self));
                }
            }
        }
        inherited
    }
}

impl<'a> Item<'a> for ClassItem<'a> {
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
        ItemKey::Class(self.qualified_name().to_string())
    }

    /// Recorded on the top-level class; nested classes take the top-level one's.
    fn origin(&self) -> ClassOrigin {
        let mut top = *self;
        while let Some(outer) = top.containing_class() {
            top = outer;
        }
        top.data()
            .decl
            .origin
            .unwrap_or_else(|| self.codebase.default_origin())
    }

    fn parent(&self) -> Option<ParentItem<'a>> {
        Some(match self.containing_class() {
            Some(outer) => ParentItem::Class(outer),
            None => ParentItem::Package(self.package()),
        })
    }
}

impl<'a> ClassContentItem<'a> for ClassItem<'a> {
    fn containing_class(&self) -> Option<ClassItem<'a>> {
        self.data()
            .containing
            .map(|id| ClassItem::new(self.codebase, id))
    }
}

impl PartialEq for ClassItem<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.codebase, other.codebase) && self.id == other.id
    }
}

impl Eq for ClassItem<'_> {}

impl fmt::Debug for ClassItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassItem")
            .field(&self.qualified_name())
            .finish()
    }
}

impl fmt::Display for ClassItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

#[cfg(test)]
mod tests {
    use crate::item::{
        ClassContentItem, ClassDeclaration, Codebase, InheritableItem, Item, ItemKey, ItemModifiers,
        MemberDeclaration, TypeParameter, TypedItem, VisibilityLevel,
    };
    use crate::types::{ClassTypeItem, PrimitiveKind, TypeItem, TypeModifiers};

    fn hierarchy() -> Codebase {
        let mut builder = Codebase::builder("hierarchy");
        let package = builder.package("test.pkg");
        let base = builder
            .add_class(
                package,
                None,
                ClassDeclaration::new("test.pkg.Base").with_type_parameter(TypeParameter::new("T")),
            )
            .expect("base");
        builder
            .add_member(base, MemberDeclaration::constructor())
            .expect("base constructor");
        builder
            .add_member(base, MemberDeclaration::method("get", TypeItem::variable("T")))
            .expect("get");
        builder
            .add_member(
                base,
                MemberDeclaration::method("size", TypeItem::primitive(PrimitiveKind::Int)),
            )
            .expect("size");
        builder
            .add_member(
                base,
                MemberDeclaration::field("secret", TypeItem::primitive(PrimitiveKind::Int))
                    .with_modifiers(ItemModifiers::with_visibility(VisibilityLevel::Private)),
            )
            .expect("secret");

        let string = TypeItem::class("java.lang.String", vec![]);
        let child = builder
            .add_class(
                package,
                None,
                ClassDeclaration::new("test.pkg.Child").extending(ClassTypeItem::new(
                    "test.pkg.Base",
                    vec![string],
                    None,
                    TypeModifiers::platform(),
                )),
            )
            .expect("child");
        builder
            .add_member(
                child,
                MemberDeclaration::method("size", TypeItem::primitive(PrimitiveKind::Int)),
            )
            .expect("child size");
        builder.build()
    }

    #[test]
    fn inherited_members_skip_redeclared_private_and_constructors() {
        let codebase = hierarchy();
        let child = codebase.find_class("test.pkg.Child").expect("child");
        let inherited = child.inherited_members();
        assert_eq!(inherited.len(), 1);
        let get = inherited[0];
        assert_eq!(get.name(), "get");
        assert_eq!(
            get.containing_class().map(|class| class.qualified_name()),
            Some("test.pkg.Child")
        );
        assert_eq!(
            get.inherited_from().map(|class| class.qualified_name()),
            Some("test.pkg.Base")
        );
    }

    #[test]
    fn find_member_prefers_declared() {
        let codebase = hierarchy();
        let child = codebase.find_class("test.pkg.Child").expect("child");
        let size = child
            .find_member(&ItemKey::Method {
                name: "size".into(),
                parameters: vec![],
            })
            .expect("size");
        assert!(!size.is_inherited());
        let get = child
            .find_member(&ItemKey::Method {
                name: "get".into(),
                parameters: vec![],
            })
            .expect("get");
        assert!(get.is_inherited());
        assert_eq!(get.ty().to_string(), "T");
    }

    #[test]
    fn super_class_bindings_map_parameters_to_arguments() {
        let codebase = hierarchy();
        let child = codebase.find_class("test.pkg.Child").expect("child");
        let bindings = child.super_class_bindings();
        assert_eq!(
            bindings.get("T").map(ToString::to_string).as_deref(),
            Some("java.lang.String")
        );
        let get = child.inherited_members()[0];
        assert_eq!(
            get.ty().substitute_type_parameters(&bindings).to_string(),
            "java.lang.String"
        );
    }

    #[test]
    fn class_type_uses_type_parameters() {
        let codebase = hierarchy();
        let base = codebase.find_class("test.pkg.Base").expect("base");
        assert_eq!(base.to_type().to_string(), "test.pkg.Base<T>");
        assert_eq!(base.key(), ItemKey::Class("test.pkg.Base".into()));
        assert!(base.super_classes().is_empty());
    }
}
