use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::annotation::{
    AnnotationClassifier, AnnotationInfo, AnnotationInfoCache, AnnotationItem, NoEffectClassifier,
};
use crate::error::ModelError;
use crate::options::ModelOptions;
use crate::types::{ClassTypeItem, TypeItem, TypeModifiers, TypeNullability};

use super::class::ClassItem;
use super::member::MemberItem;
use super::package::{PackageItem, TypeAliasItem};
use super::{
    ClassId, ClassKind, ClassOrigin, Item, ItemModifiers, MemberId, MemberKind, PackageId,
    TypeAliasId, TypeParameter,
};

#[derive(Clone, Debug, Default)]
pub struct PackageDeclaration {
    pub name: String,
    pub modifiers: ItemModifiers,
    pub documentation: String,
}

impl PackageDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClassDeclaration {
    pub qualified_name: String,
    pub kind: ClassKind,
    pub modifiers: ItemModifiers,
    pub documentation: String,
    pub type_parameters: Vec<TypeParameter>,
    pub super_class_type: Option<Arc<ClassTypeItem>>,
    pub interface_types: Vec<Arc<ClassTypeItem>>,
    /// Only meaningful on top-level classes; nested classes take their container's.
    pub origin: Option<ClassOrigin>,
}

impl ClassDeclaration {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_modifiers(mut self, modifiers: ItemModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    pub fn with_type_parameter(mut self, parameter: TypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn extending(mut self, super_class_type: Arc<ClassTypeItem>) -> Self {
        self.super_class_type = Some(super_class_type);
        self
    }

    pub fn implementing(mut self, interface_type: Arc<ClassTypeItem>) -> Self {
        self.interface_types.push(interface_type);
        self
    }

    pub fn with_origin(mut self, origin: ClassOrigin) -> Self {
        self.origin = Some(origin);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterDeclaration {
    /// `None` for parameters read from bytecode without debug names.
    pub name: Option<String>,
    pub ty: TypeItem,
    pub modifiers: ItemModifiers,
    /// Source text of the default value, if any.
    pub default_value: Option<String>,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, ty: TypeItem) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            modifiers: ItemModifiers::default(),
            default_value: None,
        }
    }

    pub fn unnamed(ty: TypeItem) -> Self {
        Self {
            name: None,
            ty,
            modifiers: ItemModifiers::default(),
            default_value: None,
        }
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemberDeclaration {
    pub kind: MemberKind,
    pub name: String,
    pub modifiers: ItemModifiers,
    pub documentation: String,
    pub type_parameters: Vec<TypeParameter>,
    /// Return type for methods, declared type for fields and properties.
    /// Constructors without one get the containing class type.
    pub ty: Option<TypeItem>,
    pub parameters: Vec<ParameterDeclaration>,
}

impl MemberDeclaration {
    pub fn constructor() -> Self {
        Self {
            kind: MemberKind::Constructor,
            ..Self::default()
        }
    }

    pub fn method(name: impl Into<String>, return_type: TypeItem) -> Self {
        Self {
            kind: MemberKind::Method,
            name: name.into(),
            ty: Some(return_type),
            ..Self::default()
        }
    }

    pub fn field(name: impl Into<String>, ty: TypeItem) -> Self {
        Self {
            kind: MemberKind::Field,
            name: name.into(),
            ty: Some(ty),
            ..Self::default()
        }
    }

    pub fn property(name: impl Into<String>, ty: TypeItem) -> Self {
        Self {
            kind: MemberKind::Property,
            name: name.into(),
            ty: Some(ty),
            ..Self::default()
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterDeclaration) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_modifiers(mut self, modifiers: ItemModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    pub fn with_type_parameter(mut self, parameter: TypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }
}

#[derive(Clone, Debug)]
pub struct TypeAliasDeclaration {
    pub qualified_name: String,
    pub modifiers: ItemModifiers,
    pub documentation: String,
    pub type_parameters: Vec<TypeParameter>,
    pub ty: TypeItem,
}

impl TypeAliasDeclaration {
    pub fn new(qualified_name: impl Into<String>, ty: TypeItem) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            modifiers: ItemModifiers::default(),
            documentation: String::new(),
            type_parameters: Vec::new(),
            ty,
        }
    }
}

/// What [`CodebaseBuilder::set_type`] should retype.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeTarget {
    Member(MemberId),
    /// Parameter index within the member.
    Parameter(MemberId, usize),
    TypeAlias(TypeAliasId),
}

#[derive(Debug)]
pub(crate) struct PackageData {
    pub(crate) decl: PackageDeclaration,
    pub(crate) classes: Vec<ClassId>,
    pub(crate) type_aliases: Vec<TypeAliasId>,
}

#[derive(Debug)]
pub(crate) struct ClassData {
    pub(crate) decl: ClassDeclaration,
    pub(crate) package: PackageId,
    pub(crate) containing: Option<ClassId>,
    pub(crate) nested: Vec<ClassId>,
    pub(crate) members: Vec<MemberId>,
}

#[derive(Debug)]
pub(crate) struct MemberData {
    pub(crate) kind: MemberKind,
    pub(crate) name: String,
    pub(crate) modifiers: ItemModifiers,
    pub(crate) documentation: String,
    pub(crate) type_parameters: Vec<TypeParameter>,
    pub(crate) ty: TypeItem,
    pub(crate) parameters: Vec<ParameterDeclaration>,
    pub(crate) declared_in: ClassId,
    /// Filled in by `build`, once every type is final.
    pub(crate) erased_parameters: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct TypeAliasData {
    pub(crate) decl: TypeAliasDeclaration,
    pub(crate) package: PackageId,
}

/// Collects declarations from a front-end and validates containment as they arrive.
pub struct CodebaseBuilder {
    description: String,
    from_classpath: bool,
    options: ModelOptions,
    classifier: Arc<dyn AnnotationClassifier>,
    packages: Vec<PackageData>,
    classes: Vec<ClassData>,
    members: Vec<MemberData>,
    type_aliases: Vec<TypeAliasData>,
    package_index: BTreeMap<String, PackageId>,
    class_index: BTreeMap<String, ClassId>,
    type_alias_index: BTreeMap<String, TypeAliasId>,
}

impl CodebaseBuilder {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            from_classpath: false,
            options: ModelOptions::empty(),
            classifier: Arc::new(NoEffectClassifier),
            packages: Vec::new(),
            classes: Vec::new(),
            members: Vec::new(),
            type_aliases: Vec::new(),
            package_index: BTreeMap::new(),
            class_index: BTreeMap::new(),
            type_alias_index: BTreeMap::new(),
        }
    }

    /// Marks the codebase as read purely from compiled artifacts.
    pub fn from_classpath(mut self, from_classpath: bool) -> Self {
        self.from_classpath = from_classpath;
        self
    }

    pub fn options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn AnnotationClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Adds a package, returning the existing id when the name is already known.
    pub fn add_package(&mut self, decl: PackageDeclaration) -> PackageId {
        if let Some(id) = self.package_index.get(&decl.name) {
            return *id;
        }
        let id = PackageId(self.packages.len() as u32);
        self.package_index.insert(decl.name.clone(), id);
        self.packages.push(PackageData {
            decl,
            classes: Vec::new(),
            type_aliases: Vec::new(),
        });
        id
    }

    /// Shorthand for [`add_package`](Self::add_package) with a bare name.
    pub fn package(&mut self, name: impl Into<String>) -> PackageId {
        self.add_package(PackageDeclaration::new(name))
    }

    /// Adds a class to `package`, nested inside `containing` when given.
    pub fn add_class(
        &mut self,
        package: PackageId,
        containing: Option<ClassId>,
        decl: ClassDeclaration,
    ) -> Result<ClassId, ModelError> {
        let package_name = &self
            .packages
            .get(package.index())
            .ok_or(ModelError::UnknownItem {
                kind: "package",
                id: package.0,
            })?
            .decl
            .name;
        if self.class_index.contains_key(&decl.qualified_name) {
            return Err(ModelError::DuplicateClass(decl.qualified_name));
        }
        if !package_name.is_empty() && !is_nested_name(package_name, &decl.qualified_name) {
            return Err(ModelError::MalformedContainment(format!(
                "class {} is not inside package {package_name}",
                decl.qualified_name
            )));
        }
        if let Some(outer) = containing {
            let outer_data = self.classes.get(outer.index()).ok_or(ModelError::UnknownItem {
                kind: "class",
                id: outer.0,
            })?;
            if outer_data.package != package {
                return Err(ModelError::MalformedContainment(format!(
                    "nested class {} is in a different package than {}",
                    decl.qualified_name, outer_data.decl.qualified_name
                )));
            }
            if !is_nested_name(&outer_data.decl.qualified_name, &decl.qualified_name) {
                return Err(ModelError::MalformedContainment(format!(
                    "class {} is not named inside {}",
                    decl.qualified_name, outer_data.decl.qualified_name
                )));
            }
        }

        let id = ClassId(self.classes.len() as u32);
        self.class_index.insert(decl.qualified_name.clone(), id);
        match containing {
            Some(outer) => self.classes[outer.index()].nested.push(id),
            None => self.packages[package.index()].classes.push(id),
        }
        self.classes.push(ClassData {
            decl,
            package,
            containing,
            nested: Vec::new(),
            members: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_member(
        &mut self,
        class: ClassId,
        decl: MemberDeclaration,
    ) -> Result<MemberId, ModelError> {
        let class_data = self.classes.get(class.index()).ok_or(ModelError::UnknownItem {
            kind: "class",
            id: class.0,
        })?;
        let ty = match (decl.ty, decl.kind) {
            (Some(ty), _) => ty,
            (None, MemberKind::Constructor) => self.class_type(class),
            (None, kind) => {
                return Err(ModelError::InvalidType(format!(
                    "{kind:?} {}.{} has no type",
                    class_data.decl.qualified_name, decl.name
                )));
            }
        };
        let name = if decl.kind == MemberKind::Constructor && decl.name.is_empty() {
            simple_name_of(&class_data.decl.qualified_name).to_string()
        } else {
            decl.name
        };

        let id = MemberId(self.members.len() as u32);
        self.classes[class.index()].members.push(id);
        self.members.push(MemberData {
            kind: decl.kind,
            name,
            modifiers: decl.modifiers,
            documentation: decl.documentation,
            type_parameters: decl.type_parameters,
            ty,
            parameters: decl.parameters,
            declared_in: class,
            erased_parameters: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_type_alias(
        &mut self,
        package: PackageId,
        decl: TypeAliasDeclaration,
    ) -> Result<TypeAliasId, ModelError> {
        let package_data = self
            .packages
            .get_mut(package.index())
            .ok_or(ModelError::UnknownItem {
                kind: "package",
                id: package.0,
            })?;
        if self.type_alias_index.contains_key(&decl.qualified_name) {
            return Err(ModelError::DuplicateTypeAlias(decl.qualified_name));
        }
        let id = TypeAliasId(self.type_aliases.len() as u32);
        package_data.type_aliases.push(id);
        self.type_alias_index.insert(decl.qualified_name.clone(), id);
        self.type_aliases.push(TypeAliasData { decl, package });
        Ok(id)
    }

    /// Replaces the type of a member or parameter. Type aliases are fixed at declaration.
    pub fn set_type(&mut self, target: TypeTarget, ty: TypeItem) -> Result<(), ModelError> {
        match target {
            TypeTarget::Member(id) => {
                let member = self.member_mut(id)?;
                member.ty = ty;
            }
            TypeTarget::Parameter(id, index) => {
                let parameter = self
                    .member_mut(id)?
                    .parameters
                    .get_mut(index)
                    .ok_or(ModelError::UnknownItem {
                        kind: "parameter",
                        id: index as u32,
                    })?;
                parameter.ty = ty;
            }
            TypeTarget::TypeAlias(id) => {
                let alias = self
                    .type_aliases
                    .get(id.index())
                    .ok_or(ModelError::UnknownItem {
                        kind: "type alias",
                        id: id.0,
                    })?;
                return Err(ModelError::ImmutableTypeAliasType(
                    alias.decl.qualified_name.clone(),
                ));
            }
        }
        Ok(())
    }

    pub fn build(self) -> Codebase {
        let mut members = self.members;
        for member in &mut members {
            member.erased_parameters = erased_parameters(&self.classes, member);
        }
        debug!(
            codebase = %self.description,
            packages = self.packages.len(),
            classes = self.classes.len(),
            members = members.len(),
            type_aliases = self.type_aliases.len(),
            "built codebase"
        );
        Codebase {
            description: self.description,
            from_classpath: self.from_classpath,
            options: self.options,
            classifier: self.classifier,
            annotation_infos: AnnotationInfoCache::new(),
            packages: self.packages,
            classes: self.classes,
            members,
            type_aliases: self.type_aliases,
            package_index: self.package_index,
            class_index: self.class_index,
            type_alias_index: self.type_alias_index,
        }
    }

    fn member_mut(&mut self, id: MemberId) -> Result<&mut MemberData, ModelError> {
        self.members
            .get_mut(id.index())
            .ok_or(ModelError::UnknownItem {
                kind: "member",
                id: id.0,
            })
    }

    fn class_type(&self, id: ClassId) -> TypeItem {
        TypeItem::Class(class_type_of(&self.classes, id))
    }
}

/// The type of a class as used from inside itself: its type parameters as arguments.
pub(crate) fn class_type_of(classes: &[ClassData], id: ClassId) -> Arc<ClassTypeItem> {
    let data = &classes[id.index()];
    let outer = match data.containing {
        Some(outer) if !data.decl.modifiers.is_static => Some(class_type_of(classes, outer)),
        _ => None,
    };
    let arguments = data
        .decl
        .type_parameters
        .iter()
        .map(|parameter| TypeItem::variable(&parameter.name))
        .collect();
    ClassTypeItem::new(
        data.decl.qualified_name.clone(),
        arguments,
        outer,
        TypeModifiers::with(TypeNullability::NonNull),
    )
}

fn erased_parameters(classes: &[ClassData], member: &MemberData) -> Vec<String> {
    member
        .parameters
        .iter()
        .map(|parameter| {
            parameter
                .ty
                .to_erased_string_with(|name| first_bound(classes, member, name))
        })
        .collect()
}

/// First bound of the type parameter `name` visible from `member`, innermost scope first.
fn first_bound(classes: &[ClassData], member: &MemberData, name: &str) -> Option<TypeItem> {
    let mut scopes = vec![member.type_parameters.as_slice()];
    let mut class = Some(member.declared_in);
    while let Some(id) = class {
        let data = &classes[id.index()];
        scopes.push(data.decl.type_parameters.as_slice());
        class = data.containing;
    }
    scopes
        .into_iter()
        .flatten()
        .find(|parameter| parameter.name == name)
        .and_then(|parameter| parameter.bounds.first().cloned())
}

fn is_nested_name(outer: &str, inner: &str) -> bool {
    inner
        .strip_prefix(outer)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| !rest.is_empty())
}

fn simple_name_of(qualified_name: &str) -> &str {
    qualified_name.rsplit('.').next().unwrap_or(qualified_name)
}

/// Root aggregate for one build: every package, class, member and type alias.
pub struct Codebase {
    description: String,
    from_classpath: bool,
    options: ModelOptions,
    classifier: Arc<dyn AnnotationClassifier>,
    annotation_infos: AnnotationInfoCache,
    packages: Vec<PackageData>,
    classes: Vec<ClassData>,
    members: Vec<MemberData>,
    type_aliases: Vec<TypeAliasData>,
    package_index: BTreeMap<String, PackageId>,
    class_index: BTreeMap<String, ClassId>,
    type_alias_index: BTreeMap<String, TypeAliasId>,
}

impl Codebase {
    pub fn builder(description: impl Into<String>) -> CodebaseBuilder {
        CodebaseBuilder::new(description)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the codebase was derived purely from compiled artifacts.
    pub fn is_from_classpath(&self) -> bool {
        self.from_classpath
    }

    /// Origin of top-level classes that did not record one.
    pub fn default_origin(&self) -> ClassOrigin {
        if self.from_classpath {
            ClassOrigin::ClassPath
        } else {
            ClassOrigin::CommandLineSource
        }
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    pub fn annotation_cache(&self) -> &AnnotationInfoCache {
        &self.annotation_infos
    }

    /// Interned classification of `annotation` under this codebase's classifier.
    ///
    /// Meta-annotations are read from the annotation class when this
    /// codebase declares it.
    pub fn annotation_info(&self, annotation: &AnnotationItem) -> Arc<AnnotationInfo> {
        self.annotation_infos
            .get_or_classify(annotation, self.classifier.as_ref(), |qualified_name| {
                self.find_class(qualified_name)
                    .map(|class| class.modifiers().annotations.clone())
                    .unwrap_or_default()
            })
    }

    /// Packages ordered by name.
    pub fn packages(&self) -> impl Iterator<Item = PackageItem<'_>> {
        self.package_index
            .values()
            .map(move |id| PackageItem::new(self, *id))
    }

    /// Every class in declaration order, nested ones included.
    pub fn classes(&self) -> impl Iterator<Item = ClassItem<'_>> {
        (0..self.classes.len()).map(move |index| ClassItem::new(self, ClassId(index as u32)))
    }

    pub fn find_package(&self, name: &str) -> Option<PackageItem<'_>> {
        self.package_index
            .get(name)
            .map(|id| PackageItem::new(self, *id))
    }

    pub fn find_class(&self, qualified_name: &str) -> Option<ClassItem<'_>> {
        self.class_index
            .get(qualified_name)
            .map(|id| ClassItem::new(self, *id))
    }

    pub fn find_type_alias(&self, qualified_name: &str) -> Option<TypeAliasItem<'_>> {
        self.type_alias_index
            .get(qualified_name)
            .map(|id| TypeAliasItem::new(self, *id))
    }

    pub fn package(&self, id: PackageId) -> Option<PackageItem<'_>> {
        (id.index() < self.packages.len()).then(|| PackageItem::new(self, id))
    }

    pub fn class(&self, id: ClassId) -> Option<ClassItem<'_>> {
        (id.index() < self.classes.len()).then(|| ClassItem::new(self, id))
    }

    /// The member as declared, contained by the class that declares it.
    pub fn member(&self, id: MemberId) -> Option<MemberItem<'_>> {
        let data = self.members.get(id.index())?;
        Some(MemberItem::declared(data, ClassItem::new(self, data.declared_in)))
    }

    pub fn type_alias(&self, id: TypeAliasId) -> Option<TypeAliasItem<'_>> {
        (id.index() < self.type_aliases.len()).then(|| TypeAliasItem::new(self, id))
    }

    pub(crate) fn package_data(&self, id: PackageId) -> &PackageData {
        &self.packages[id.index()]
    }

    pub(crate) fn class_data(&self, id: ClassId) -> &ClassData {
        &self.classes[id.index()]
    }

    pub(crate) fn member_data(&self, id: MemberId) -> &MemberData {
        &self.members[id.index()]
    }

    pub(crate) fn type_alias_data(&self, id: TypeAliasId) -> &TypeAliasData {
        &self.type_aliases[id.index()]
    }

    pub(crate) fn class_type(&self, id: ClassId) -> Arc<ClassTypeItem> {
        class_type_of(&self.classes, id)
    }
}

impl fmt::Debug for Codebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codebase")
            .field("description", &self.description)
            .field("from_classpath", &self.from_classpath)
            .field("packages", &self.packages.len())
            .field("classes", &self.classes.len())
            .field("members", &self.members.len())
            .field("type_aliases", &self.type_aliases.len())
            .finish()
    }
}
