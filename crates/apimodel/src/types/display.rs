use std::fmt::{self, Write};

use crate::format::FileFormat;

use super::model::{ClassTypeItem, JAVA_LANG_OBJECT, TypeItem, TypeModifiers};

/// Bound chains longer than this erase to `java.lang.Object`.
const MAX_BOUND_DEPTH: usize = 8;

/// Controls how a type renders as text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeStringOptions {
    /// Append `?`/`!` nullability suffixes to reference types.
    pub kotlin_style_nulls: bool,
    /// Prefix type-use annotations.
    pub annotations: bool,
    /// Drop type arguments, annotations and nullability.
    pub erased: bool,
}

impl TypeStringOptions {
    pub const ERASED: TypeStringOptions = TypeStringOptions {
        kotlin_style_nulls: false,
        annotations: false,
        erased: true,
    };

    pub fn for_format(format: FileFormat) -> Self {
        Self {
            kotlin_style_nulls: format.use_kotlin_style_nulls(),
            annotations: false,
            erased: false,
        }
    }
}

impl TypeItem {
    pub fn to_type_string(&self, options: TypeStringOptions) -> String {
        Rendered { ty: self, options }.to_string()
    }

    /// Erased form with type variables left as their names.
    pub fn to_erased_string(&self) -> String {
        self.to_type_string(TypeStringOptions::ERASED)
    }

    /// Erased form as it appears in a JVM signature.
    ///
    /// A type variable erases to the erasure of the first bound `bound_of`
    /// reports for it, or to `java.lang.Object` when there is none.
    pub fn to_erased_string_with<F>(&self, bound_of: F) -> String
    where
        F: Fn(&str) -> Option<TypeItem>,
    {
        ErasedSignature {
            ty: self,
            bound_of: &bound_of,
        }
        .to_string()
    }
}

struct Rendered<'t> {
    ty: &'t TypeItem,
    options: TypeStringOptions,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(f, self.ty, self.options)
    }
}

struct ErasedSignature<'t, F> {
    ty: &'t TypeItem,
    bound_of: &'t F,
}

impl<F> fmt::Display for ErasedSignature<'_, F>
where
    F: Fn(&str) -> Option<TypeItem>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_erased(f, self.ty, self.bound_of, 0)
    }
}

fn write_erased<W, F>(out: &mut W, ty: &TypeItem, bound_of: &F, depth: usize) -> fmt::Result
where
    W: Write,
    F: Fn(&str) -> Option<TypeItem>,
{
    match ty {
        TypeItem::Variable(variable) => match bound_of(variable.name()) {
            Some(bound) if depth < MAX_BOUND_DEPTH => {
                write_erased(out, &bound, bound_of, depth + 1)
            }
            _ => out.write_str(JAVA_LANG_OBJECT),
        },
        TypeItem::Array(array) => {
            write_erased(out, array.component_type(), bound_of, depth)?;
            out.write_str("[]")
        }
        _ => write_type(out, ty, TypeStringOptions::ERASED),
    }
}

impl fmt::Display for TypeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(f, self, TypeStringOptions::default())
    }
}

fn write_annotations<W: Write>(
    out: &mut W,
    modifiers: &TypeModifiers,
    options: TypeStringOptions,
) -> fmt::Result {
    if options.annotations && !options.erased {
        for annotation in modifiers.annotations() {
            write!(out, "@{} ", annotation.qualified_name)?;
        }
    }
    Ok(())
}

fn write_suffix<W: Write>(
    out: &mut W,
    modifiers: &TypeModifiers,
    options: TypeStringOptions,
) -> fmt::Result {
    if options.kotlin_style_nulls && !options.erased {
        out.write_str(modifiers.nullability().kotlin_suffix())?;
    }
    Ok(())
}

fn write_class<W: Write>(
    out: &mut W,
    ty: &ClassTypeItem,
    options: TypeStringOptions,
) -> fmt::Result {
    if let Some(outer) = ty.outer_class_type() {
        // The outer type is written without its own nullability suffix.
        write_class(out, outer, TypeStringOptions {
            kotlin_style_nulls: false,
            ..options
        })?;
        out.write_char('.')?;
        write_annotations(out, ty.modifiers(), options)?;
        out.write_str(ty.simple_name())?;
    } else {
        write_annotations(out, ty.modifiers(), options)?;
        out.write_str(ty.qualified_name())?;
    }

    if !options.erased && !ty.arguments().is_empty() {
        out.write_char('<')?;
        for (index, argument) in ty.arguments().iter().enumerate() {
            if index > 0 {
                out.write_str(", ")?;
            }
            write_type(out, argument, options)?;
        }
        out.write_char('>')?;
    }
    write_suffix(out, ty.modifiers(), options)
}

fn write_type<W: Write>(out: &mut W, ty: &TypeItem, options: TypeStringOptions) -> fmt::Result {
    match ty {
        TypeItem::Primitive(primitive) => {
            write_annotations(out, primitive.modifiers(), options)?;
            out.write_str(primitive.kind().java_name())
        }
        TypeItem::Array(array) => {
            write_type(out, array.component_type(), options)?;
            write_annotations(out, array.modifiers(), options)?;
            let varargs = array.is_varargs() && !options.erased;
            out.write_str(if varargs { "..." } else { "[]" })?;
            write_suffix(out, array.modifiers(), options)
        }
        TypeItem::Class(class) => write_class(out, class, options),
        TypeItem::Lambda(lambda) => write_class(out, lambda.as_class_type(), options),
        TypeItem::Variable(variable) => {
            write_annotations(out, variable.modifiers(), options)?;
            out.write_str(variable.name())?;
            write_suffix(out, variable.modifiers(), options)
        }
        TypeItem::Wildcard(wildcard) => {
            out.write_char('?')?;
            if let Some(bound) = wildcard.super_bound() {
                out.write_str(" super ")?;
                write_type(out, bound, options)?;
            } else if let Some(bound) = wildcard.extends_bound() {
                let is_object = bound
                    .as_class()
                    .is_some_and(|class| class.qualified_name() == JAVA_LANG_OBJECT);
                if !is_object {
                    out.write_str(" extends ")?;
                    write_type(out, bound, options)?;
                }
            }
            Ok(())
        }
    }
}
