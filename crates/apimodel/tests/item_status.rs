use std::fs;
use std::sync::Arc;

use apimodel::types::PrimitiveKind;
use apimodel::{
    AnnotationFilters, AnnotationItem, ClassDeclaration, ClassKind, ClassOrigin, Codebase,
    FilterClassifier, Item, ItemModifiers, MemberDeclaration, ModelOptions, OptionKey, TypeItem,
};

const FILTERS: &str = r#"{
    "showAnnotations": ["android.annotation.SystemApi"],
    "showSingleAnnotations": ["android.annotation.TestApi"],
    "hideAnnotations": ["lib.Internal"],
    "hideMetaAnnotations": ["lib.MetaHide"],
    "suppressCompatibilityMetaAnnotations": ["kotlin.RequiresOptIn"]
}"#;

const STRICT_NULLS: OptionKey<bool> =
    OptionKey::new("strict-nulls", false, "Treat platform types as errors");

#[test]
fn filters_load_from_a_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("filters.json");
    fs::write(&path, FILTERS).expect("write filters");

    let filters = AnnotationFilters::load(&path).expect("load");
    assert_eq!(filters.hide_annotations, vec!["lib.Internal".to_string()]);

    let missing = AnnotationFilters::load(&dir.path().join("missing.json"));
    assert!(matches!(missing, Err(apimodel::ModelError::Io(_))));

    fs::write(&path, "[").expect("write garbage");
    let err = AnnotationFilters::load(&path).expect_err("malformed");
    assert!(err.to_string().contains("filters.json"));
}

fn annotated(name: &str) -> ItemModifiers {
    ItemModifiers::default().annotated(AnnotationItem::new(name))
}

fn void_method(name: &str) -> MemberDeclaration {
    MemberDeclaration::method(name, TypeItem::primitive(PrimitiveKind::Void))
}

fn status_codebase() -> Codebase {
    let filters = AnnotationFilters::from_json(FILTERS).expect("filters");
    let classifier = FilterClassifier::new(&filters).expect("classifier");
    let options = ModelOptions::build("status", |builder| {
        builder.set(&STRICT_NULLS, true);
    })
    .expect("options");

    let mut builder = Codebase::builder("status")
        .classifier(Arc::new(classifier))
        .options(options);
    let package = builder.package("lib");

    let hidden = builder
        .add_class(
            package,
            None,
            ClassDeclaration::new("lib.Hidden").with_documentation("Not public. @hide"),
        )
        .expect("Hidden");
    builder
        .add_member(
            hidden,
            void_method("visible").with_modifiers(annotated("android.annotation.SystemApi")),
        )
        .expect("visible");
    builder
        .add_member(hidden, void_method("plain"))
        .expect("plain");
    builder
        .add_class(package, Some(hidden), ClassDeclaration::new("lib.Hidden.Inner"))
        .expect("Inner");

    let single = builder
        .add_class(
            package,
            None,
            ClassDeclaration::new("lib.Single")
                .with_documentation("@hide")
                .with_modifiers(annotated("android.annotation.TestApi")),
        )
        .expect("Single");
    builder.add_member(single, void_method("m")).expect("m");

    let exposed = builder
        .add_class(
            package,
            None,
            ClassDeclaration::new("lib.Exposed")
                .with_documentation("@hide")
                .with_modifiers(annotated("android.annotation.SystemApi")),
        )
        .expect("Exposed");
    builder.add_member(exposed, void_method("m")).expect("m");

    builder
        .add_class(
            package,
            None,
            ClassDeclaration::new("lib.Experimental")
                .with_kind(ClassKind::AnnotationType)
                .with_modifiers(
                    annotated("kotlin.RequiresOptIn")
                        .annotated(AnnotationItem::new("lib.MetaHide")),
                ),
        )
        .expect("Experimental");
    let api = builder
        .add_class(package, None, ClassDeclaration::new("lib.Api"))
        .expect("Api");
    builder
        .add_member(api, void_method("stable"))
        .expect("stable");
    builder
        .add_member(
            api,
            void_method("preview").with_modifiers(annotated("lib.Experimental")),
        )
        .expect("preview");
    builder
        .add_class(
            package,
            None,
            ClassDeclaration::new("lib.Marked").with_modifiers(annotated("lib.Internal")),
        )
        .expect("Marked");

    builder.build()
}

fn method<'a>(codebase: &'a Codebase, class: &str, name: &str) -> apimodel::MemberItem<'a> {
    codebase
        .find_class(class)
        .expect("class")
        .methods()
        .find(|member| member.name() == name)
        .expect("method")
}

#[test]
fn hide_tag_hides_the_class_and_its_contents() {
    let codebase = status_codebase();
    let hidden = codebase.find_class("lib.Hidden").expect("Hidden");
    assert!(hidden.is_hidden());
    assert!(method(&codebase, "lib.Hidden", "plain").is_hidden());
    assert!(
        codebase
            .find_class("lib.Hidden.Inner")
            .expect("Inner")
            .is_hidden()
    );
    assert!(!method(&codebase, "lib.Hidden", "visible").is_hidden());
}

#[test]
fn recursive_show_reveals_contents() {
    let codebase = status_codebase();
    let exposed = codebase.find_class("lib.Exposed").expect("Exposed");
    assert!(exposed.is_originally_hidden());
    assert!(!exposed.is_hidden());
    assert!(exposed.showability().recursive());
    assert!(!method(&codebase, "lib.Exposed", "m").is_hidden());
}

#[test]
fn single_show_reveals_only_the_annotated_item() {
    let codebase = status_codebase();
    let single = codebase.find_class("lib.Single").expect("Single");
    assert!(!single.is_hidden());
    assert!(single.showability().show_non_recursive());
    assert!(method(&codebase, "lib.Single", "m").is_hidden());
}

#[test]
fn meta_annotations_hide_and_suppress_compatibility() {
    let codebase = status_codebase();
    let preview = method(&codebase, "lib.Api", "preview");
    let stable = method(&codebase, "lib.Api", "stable");
    assert!(preview.is_hidden());
    assert!(preview.suppresses_compatibility());
    assert!(!stable.is_hidden());
    assert!(!stable.suppresses_compatibility());

    let marked = codebase.find_class("lib.Marked").expect("Marked");
    assert!(marked.is_hidden());
    assert!(!marked.suppresses_compatibility());
}

#[test]
fn annotation_infos_are_interned_per_codebase() {
    let codebase = status_codebase();
    let annotation = AnnotationItem::new("android.annotation.SystemApi");
    let first = codebase.annotation_info(&annotation);
    let second = codebase.annotation_info(&annotation);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.showability().show());

    let before = codebase.annotation_cache().len();
    method(&codebase, "lib.Hidden", "visible").annotation_infos();
    assert_eq!(codebase.annotation_cache().len(), before);
}

#[test]
fn codebase_exposes_its_options() {
    let codebase = status_codebase();
    assert!(codebase.options().get(&STRICT_NULLS));
    assert!(Codebase::builder("bare").build().options().is_empty());
}

#[test]
fn origin_is_recorded_on_top_level_classes_and_inherited_inward() {
    let mut builder = Codebase::builder("origins");
    let package = builder.package("app");
    let outer = builder
        .add_class(
            package,
            None,
            ClassDeclaration::new("app.Outer").with_origin(ClassOrigin::SourcePath),
        )
        .expect("Outer");
    let inner = builder
        .add_class(package, Some(outer), ClassDeclaration::new("app.Outer.Inner"))
        .expect("Inner");
    builder
        .add_member(inner, void_method("run"))
        .expect("run");
    builder
        .add_class(package, None, ClassDeclaration::new("app.Plain"))
        .expect("Plain");
    let codebase = builder.build();

    let inner = codebase.find_class("app.Outer.Inner").expect("Inner");
    assert_eq!(inner.origin(), ClassOrigin::SourcePath);
    assert_eq!(
        method(&codebase, "app.Outer.Inner", "run").origin(),
        ClassOrigin::SourcePath
    );
    assert_eq!(
        codebase.find_class("app.Plain").expect("Plain").origin(),
        ClassOrigin::CommandLineSource
    );
    assert!(!inner.is_from_classpath());

    let mut jar = Codebase::builder("jar").from_classpath(true);
    let package = jar.package("dep");
    jar.add_class(package, None, ClassDeclaration::new("dep.Lib"))
        .expect("Lib");
    let jar = jar.build();
    assert!(jar.is_from_classpath());
    assert!(jar.find_class("dep.Lib").expect("Lib").is_from_classpath());
}
