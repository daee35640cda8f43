//! Type annotation output
//!
//! Annotations are written only when `emit_type_annotations` is set; the
//! helpers on the emitter return empty strings otherwise.

use super::TextEmitter;
use crate::lowering::escape_mark;
use parser::cst::{TypeAnnotation, TypeMember, TypeParameter};

impl<'a> TextEmitter<'a> {
    /// `: Type`, or nothing
    pub(crate) fn annotation(&self, annotation: Option<&TypeAnnotation>) -> String {
        match annotation {
            Some(annotation) if self.options.emit_type_annotations => {
                format!(": {}", type_text(annotation))
            }
            _ => String::new(),
        }
    }

    /// `<T, U extends V>`, or nothing
    pub(crate) fn type_parameters(&self, params: &[TypeParameter]) -> String {
        if params.is_empty() || !self.options.emit_type_annotations {
            return String::new();
        }
        let params: Vec<String> = params
            .iter()
            .map(|param| match &param.constraint {
                Some(constraint) => format!("{} extends {}", param.name, type_text(constraint)),
                None => param.name.clone(),
            })
            .collect();
        format!("<{}>", params.join(", "))
    }
}

/// Source form of a type
pub fn type_text(annotation: &TypeAnnotation) -> String {
    match annotation {
        TypeAnnotation::Reference { name, arguments } if arguments.is_empty() => name.clone(),
        TypeAnnotation::Reference { name, arguments } => format!("{}<{}>", name, list(arguments, ", ")),
        TypeAnnotation::Union(members) => list(members, " | "),
        TypeAnnotation::Intersection(members) => list(members, " & "),
        TypeAnnotation::Array(element) => match element.as_ref() {
            TypeAnnotation::Union(_) | TypeAnnotation::Intersection(_) | TypeAnnotation::Function { .. } => {
                format!("({})[]", type_text(element))
            }
            _ => format!("{}[]", type_text(element)),
        },
        TypeAnnotation::Tuple(members) => format!("[{}]", list(members, ", ")),
        TypeAnnotation::Object(members) if members.is_empty() => "{}".to_string(),
        TypeAnnotation::Object(members) => format!("{{ {} }}", member_list(members, "; ")),
        TypeAnnotation::StringLiteral(text) => escape_mark(text).into_owned(),
        TypeAnnotation::NumberLiteral(text) => text.clone(),
        TypeAnnotation::Typeof(name) => format!("typeof {}", name),
        TypeAnnotation::Function { params, result } => {
            format!("({}) => {}", member_list(params, ", "), type_text(result))
        }
        TypeAnnotation::Parenthesized(inner) => format!("({})", type_text(inner)),
    }
}

fn list(annotations: &[TypeAnnotation], separator: &str) -> String {
    annotations
        .iter()
        .map(type_text)
        .collect::<Vec<_>>()
        .join(separator)
}

fn member_list(members: &[TypeMember], separator: &str) -> String {
    members
        .iter()
        .map(|member| {
            format!(
                "{}{}: {}",
                member.name,
                if member.optional { "?" } else { "" },
                type_text(&member.annotation)
            )
        })
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(name: &str) -> TypeAnnotation {
        TypeAnnotation::Reference {
            name: name.to_string(),
            arguments: Vec::new(),
        }
    }

    #[test]
    fn test_array_of_union_is_parenthesized() {
        let annotation = TypeAnnotation::Array(Box::new(TypeAnnotation::Union(vec![
            reference("string"),
            reference("number"),
        ])));
        assert_eq!(type_text(&annotation), "(string | number)[]");
    }

    #[test]
    fn test_object_and_function_types() {
        let annotation = TypeAnnotation::Function {
            params: vec![TypeMember {
                name: "options".into(),
                optional: true,
                annotation: TypeAnnotation::Object(vec![TypeMember {
                    name: "size".into(),
                    optional: false,
                    annotation: reference("number"),
                }]),
            }],
            result: Box::new(reference("void")),
        };
        assert_eq!(type_text(&annotation), "(options?: { size: number }) => void");
    }

    #[test]
    fn test_generic_reference() {
        let annotation = TypeAnnotation::Reference {
            name: "Map".into(),
            arguments: vec![reference("string"), TypeAnnotation::Array(Box::new(reference("T")))],
        };
        assert_eq!(type_text(&annotation), "Map<string, T[]>");
    }
}
