mod class;
mod codebase;
mod key;
mod member;
mod package;
mod visitor;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationInfo, AnnotationItem, Showability};
use crate::types::TypeItem;

pub use class::ClassItem;
pub use codebase::{
    ClassDeclaration, Codebase, CodebaseBuilder, MemberDeclaration, PackageDeclaration,
    ParameterDeclaration, TypeAliasDeclaration, TypeTarget,
};
pub use key::ItemKey;
pub use member::{MemberItem, ParameterItem};
pub use package::{PackageItem, TypeAliasItem};
pub use visitor::DelegatedVisitor;

/// Documentation tag that hides an item from the API.
pub const HIDE_TAG: &str = "@hide";

macro_rules! arena_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(PackageId);
arena_id!(ClassId);
arena_id!(MemberId);
arena_id!(TypeAliasId);

/// Declared visibility, ordered from least to most visible.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub enum VisibilityLevel {
    Private,
    PackagePrivate,
    Internal,
    Protected,
    #[default]
    Public,
}

/// Where the declaring class was read from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ClassOrigin {
    #[default]
    CommandLineSource,
    SourcePath,
    ClassPath,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    AnnotationType,
    Object,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum MemberKind {
    Constructor,
    #[default]
    Method,
    Property,
    Field,
}

/// Declaration modifiers, as opposed to the per-usage [`crate::types::TypeModifiers`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemModifiers {
    pub visibility: VisibilityLevel,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    pub is_deprecated: bool,
    pub annotations: Vec<AnnotationItem>,
}

impl ItemModifiers {
    pub fn with_visibility(visibility: VisibilityLevel) -> Self {
        Self {
            visibility,
            ..Self::default()
        }
    }

    pub fn annotated(mut self, annotation: AnnotationItem) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub bounds: Vec<TypeItem>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }
}

/// The item an item is nested in, for rules that look outwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParentItem<'a> {
    Package(PackageItem<'a>),
    Class(ClassItem<'a>),
    Member(MemberItem<'a>),
}

impl<'a> ParentItem<'a> {
    pub fn as_item(&self) -> &dyn Item<'a> {
        match self {
            ParentItem::Package(package) => package,
            ParentItem::Class(class) => class,
            ParentItem::Member(member) => member,
        }
    }
}

/// Capability shared by every modeled declaration.
pub trait Item<'a> {
    /// The codebase this item behaves as belonging to.
    fn codebase(&self) -> &'a Codebase;
    fn modifiers(&self) -> &'a ItemModifiers;
    fn documentation(&self) -> &'a str;
    /// Semantic signature used for cross-codebase equality.
    fn key(&self) -> ItemKey;
    fn origin(&self) -> ClassOrigin;
    fn parent(&self) -> Option<ParentItem<'a>>;

    fn is_from_classpath(&self) -> bool {
        self.origin() == ClassOrigin::ClassPath
    }

    fn equals_to_item(&self, other: &dyn Item<'_>) -> bool {
        self.key() == other.key()
    }

    fn hash_code_for_item(&self) -> u64 {
        self.key().stable_hash()
    }

    fn annotation_infos(&self) -> Vec<Arc<AnnotationInfo>> {
        let codebase = self.codebase();
        self.modifiers()
            .annotations
            .iter()
            .map(|annotation| codebase.annotation_info(annotation))
            .collect()
    }

    fn showability(&self) -> Showability {
        self.annotation_infos()
            .iter()
            .fold(Showability::NO_EFFECT, |acc, info| acc.combine(info.showability()))
    }

    /// Hidden by its own documentation or annotations, ignoring containers.
    fn is_originally_hidden(&self) -> bool {
        self.documentation().contains(HIDE_TAG)
            || self.annotation_infos().iter().any(|info| info.hide())
    }

    fn is_hidden(&self) -> bool {
        if self.showability().show() {
            return false;
        }
        self.is_originally_hidden() || self.parent().is_some_and(|parent| hides_contents(&parent))
    }

    fn suppresses_compatibility(&self) -> bool {
        self.annotation_infos()
            .iter()
            .any(|info| info.suppress_compatibility())
    }

    /// Own visibility narrowed by every enclosing declaration.
    fn effective_visibility(&self) -> VisibilityLevel {
        let own = self.modifiers().visibility;
        match self.parent() {
            Some(parent) => own.min(parent.as_item().effective_visibility()),
            None => own,
        }
    }
}

/// Whether items directly inside `parent` start out hidden.
///
/// A non-recursive show reveals the parent itself but not its contents.
fn hides_contents(parent: &ParentItem<'_>) -> bool {
    let item = parent.as_item();
    let showability = item.showability();
    if showability.show() && showability.recursive() {
        return false;
    }
    item.is_originally_hidden() || item.parent().is_some_and(|outer| hides_contents(&outer))
}

/// Anything nested inside a class: nested classes, members, parameters.
pub trait ClassContentItem<'a>: Item<'a> {
    fn containing_class(&self) -> Option<ClassItem<'a>>;
}

/// A member that can be projected into a descendant class.
pub trait InheritableItem<'a>: ClassContentItem<'a> + Sized {
    /// The class this member was copied from, `None` when declared directly.
    fn inherited_from(&self) -> Option<ClassItem<'a>>;

    fn is_inherited(&self) -> bool {
        self.inherited_from().is_some()
    }

    /// Projects this member into `target`, which may live in another codebase.
    fn duplicate(&self, target: ClassItem<'a>) -> Self;
}

/// An item whose declaration carries a type.
pub trait TypedItem<'a> {
    fn ty(&self) -> &'a TypeItem;
}
