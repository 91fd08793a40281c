use std::fmt;
use std::ptr;

use tracing::debug;

use crate::types::TypeItem;

use super::class::ClassItem;
use super::codebase::{Codebase, MemberData, ParameterDeclaration};
use super::{
    ClassContentItem, ClassOrigin, InheritableItem, Item, ItemKey, ItemModifiers, MemberKind,
    ParentItem, TypeParameter, TypedItem,
};

/// A constructor, method, property or field, seen through the class that contains it.
///
/// The declaration data is shared with the declaring codebase; the
/// containing class may belong to another codebase once duplicated.
#[derive(Clone, Copy)]
pub struct MemberItem<'a> {
    data: &'a MemberData,
    containing_class: ClassItem<'a>,
    inherited_from: Option<ClassItem<'a>>,
}

impl<'a> MemberItem<'a> {
    pub(crate) fn declared(data: &'a MemberData, containing_class: ClassItem<'a>) -> Self {
        Self {
            data,
            containing_class,
            inherited_from: None,
        }
    }

    pub fn kind(&self) -> MemberKind {
        self.data.kind
    }

    pub fn is_constructor(&self) -> bool {
        self.data.kind == MemberKind::Constructor
    }

    pub fn is_method(&self) -> bool {
        self.data.kind == MemberKind::Method
    }

    pub fn is_field(&self) -> bool {
        self.data.kind == MemberKind::Field
    }

    pub fn is_property(&self) -> bool {
        self.data.kind == MemberKind::Property
    }

    /// Constructors are named after their declaring class.
    pub fn name(&self) -> &'a str {
        &self.data.name
    }

    pub fn type_parameters(&self) -> &'a [TypeParameter] {
        &self.data.type_parameters
    }

    /// Return type of a method or constructor; same as [`TypedItem::ty`].
    pub fn return_type(&self) -> &'a TypeItem {
        &self.data.ty
    }

    pub fn parameters(self) -> impl Iterator<Item = ParameterItem<'a>> + 'a {
        (0..self.data.parameters.len()).map(move |index| ParameterItem {
            member: self,
            index,
        })
    }

    /// Erased parameter types, the part of a signature that survives overloading.
    ///
    /// Type variables erase through the bounds declared on the member and
    /// its declaring classes, so renaming a type parameter keeps the key.
    pub fn erased_parameter_types(&self) -> Vec<String> {
        self.data.erased_parameters.clone()
    }
}

impl<'a> Item<'a> for MemberItem<'a> {
    fn codebase(&self) -> &'a Codebase {
        self.containing_class.codebase()
    }

    fn modifiers(&self) -> &'a ItemModifiers {
        &self.data.modifiers
    }

    fn documentation(&self) -> &'a str {
        &self.data.documentation
    }

    fn key(&self) -> ItemKey {
        match self.data.kind {
            MemberKind::Constructor => ItemKey::Constructor(self.erased_parameter_types()),
            MemberKind::Method => ItemKey::Method {
                name: self.data.name.clone(),
                parameters: self.erased_parameter_types(),
            },
            MemberKind::Property => ItemKey::Property(self.data.name.clone()),
            MemberKind::Field => ItemKey::Field(self.data.name.clone()),
        }
    }

    fn origin(&self) -> ClassOrigin {
        self.containing_class.origin()
    }

    fn parent(&self) -> Option<ParentItem<'a>> {
        Some(ParentItem::Class(self.containing_class))
    }
}

impl<'a> ClassContentItem<'a> for MemberItem<'a> {
    fn containing_class(&self) -> Option<ClassItem<'a>> {
        Some(self.containing_class)
    }
}

impl<'a> InheritableItem<'a> for MemberItem<'a> {
    fn inherited_from(&self) -> Option<ClassItem<'a>> {
        self.inherited_from
    }

    /// The copy records its current container as the class it was inherited from.
    fn duplicate(&self, target: ClassItem<'a>) -> Self {
        debug!(
            member = %self.data.name,
            from = %self.containing_class,
            into = %target,
            "duplicated member"
        );
        Self {
            data: self.data,
            containing_class: target,
            inherited_from: Some(self.containing_class),
        }
    }
}

impl<'a> TypedItem<'a> for MemberItem<'a> {
    fn ty(&self) -> &'a TypeItem {
        &self.data.ty
    }
}

impl PartialEq for MemberItem<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.data, other.data)
            && self.containing_class == other.containing_class
            && self.inherited_from == other.inherited_from
    }
}

impl Eq for MemberItem<'_> {}

impl fmt::Debug for MemberItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberItem")
            .field("key", &self.key())
            .field("containing_class", &self.containing_class)
            .field("inherited_from", &self.inherited_from)
            .finish()
    }
}

/// One parameter of a method or constructor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParameterItem<'a> {
    member: MemberItem<'a>,
    index: usize,
}

impl<'a> ParameterItem<'a> {
    fn declaration(&self) -> &'a ParameterDeclaration {
        &self.member.data.parameters[self.index]
    }

    pub fn member(&self) -> MemberItem<'a> {
        self.member
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&'a str> {
        self.declaration().name.as_deref()
    }

    pub fn default_value(&self) -> Option<&'a str> {
        self.declaration().default_value.as_deref()
    }

    pub fn has_default_value(&self) -> bool {
        self.declaration().default_value.is_some()
    }

    pub fn is_varargs(&self) -> bool {
        matches!(self.declaration().ty, TypeItem::Array(ref array) if array.is_varargs())
    }
}

impl<'a> Item<'a> for ParameterItem<'a> {
    fn codebase(&self) -> &'a Codebase {
        self.member.codebase()
    }

    fn modifiers(&self) -> &'a ItemModifiers {
        &self.declaration().modifiers
    }

    fn documentation(&self) -> &'a str {
        ""
    }

    fn key(&self) -> ItemKey {
        ItemKey::Parameter {
            owner: Box::new(self.member.key()),
            index: self.index,
        }
    }

    fn origin(&self) -> ClassOrigin {
        self.member.origin()
    }

    fn parent(&self) -> Option<ParentItem<'a>> {
        Some(ParentItem::Member(self.member))
    }
}

impl<'a> ClassContentItem<'a> for ParameterItem<'a> {
    fn containing_class(&self) -> Option<ClassItem<'a>> {
        Some(self.member.containing_class)
    }
}

impl<'a> TypedItem<'a> for ParameterItem<'a> {
    fn ty(&self) -> &'a TypeItem {
        &self.declaration().ty
    }
}
