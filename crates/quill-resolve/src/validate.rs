// Pass 2: check member names and resolve every type reference.

use fxhash::FxHashSet;
use quill_syntax::{Enum, Interface, Method, Namespace, PrimitiveType, Span, Type, Typedef};

use crate::definitions::resolve_alias;
use crate::error::ResolutionError;
use crate::symbol::{SymbolKind, SymbolTable};

/// Where a type appears; only a method's own return type may be `void`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Return,
    Value,
}

/// Validate one namespace against its own symbol table.
pub fn validate_namespace(
    namespace: &Namespace,
    table: &SymbolTable,
    errors: &mut Vec<ResolutionError>,
) {
    for interface in &namespace.interfaces {
        validate_interface(interface, table, errors);
    }
    for decl in &namespace.enums {
        validate_enum(decl, errors);
    }
    for typedef in &namespace.typedefs {
        validate_typedef(typedef, table, errors);
    }
}

fn validate_interface(interface: &Interface, table: &SymbolTable, errors: &mut Vec<ResolutionError>) {
    let mut method_names = FxHashSet::default();
    for method in &interface.methods {
        if !method_names.insert(method.name.as_str()) {
            errors.push(ResolutionError::DuplicateMethodName {
                interface: interface.name.clone(),
                method: method.name.clone(),
                span: method.span.map(Into::into),
            });
        }
        validate_method(&interface.name, method, table, errors);
    }

    let mut property_names = FxHashSet::default();
    for property in &interface.properties {
        let span = property.span.map(Into::into);
        if !property_names.insert(property.name.as_str()) {
            errors.push(ResolutionError::DuplicatePropertyName {
                interface: interface.name.clone(),
                property: property.name.clone(),
                span,
            });
        }
        if method_names.contains(property.name.as_str()) {
            errors.push(ResolutionError::MethodPropertyNameConflict {
                interface: interface.name.clone(),
                property: property.name.clone(),
                span,
            });
        }
        let context = format!("property {}", property.name);
        check_type(&property.ty, &context, Position::Value, property.span, table, errors);
    }
}

fn validate_method(
    interface: &str,
    method: &Method,
    table: &SymbolTable,
    errors: &mut Vec<ResolutionError>,
) {
    let context = format!("return type of {}", method.name);
    check_type(&method.return_type, &context, Position::Return, method.span, table, errors);

    let mut parameter_names = FxHashSet::default();
    for parameter in &method.parameters {
        if !parameter_names.insert(parameter.name.as_str()) {
            errors.push(ResolutionError::DuplicateParameterName {
                interface: interface.to_string(),
                method: method.name.clone(),
                parameter: parameter.name.clone(),
                span: parameter.span.map(Into::into),
            });
        }
        let context = format!("parameter '{}' of {}", parameter.name, method.name);
        check_type(&parameter.ty, &context, Position::Value, parameter.span, table, errors);
    }
}

fn validate_enum(decl: &Enum, errors: &mut Vec<ResolutionError>) {
    let mut names = FxHashSet::default();
    for value in &decl.values {
        if !names.insert(value.name.as_str()) {
            errors.push(ResolutionError::DuplicateEnumValueName {
                enum_name: decl.name.clone(),
                value: value.name.clone(),
                span: value.span.map(Into::into),
            });
        }
    }
}

fn validate_typedef(typedef: &Typedef, table: &SymbolTable, errors: &mut Vec<ResolutionError>) {
    let context = format!("typedef {}", typedef.name);
    check_type(&typedef.ty, &context, Position::Value, typedef.span, table, errors);

    let alias = Type::type_ref(typedef.name.as_str());
    if resolve_alias(table, &alias).is_none() {
        errors.push(ResolutionError::RecursiveTypedef {
            name: typedef.name.clone(),
            span: typedef.span.map(Into::into),
        });
    }
}

/// Recursively validate `ty`, descending into container elements and
/// nullable inner types.
fn check_type(
    ty: &Type,
    context: &str,
    position: Position,
    span: Option<Span>,
    table: &SymbolTable,
    errors: &mut Vec<ResolutionError>,
) {
    match ty {
        Type::Primitive { name: PrimitiveType::Void } => check_void(context, position, span, errors),
        Type::Primitive { .. } => {}
        Type::TypeRef { name } if name == "void" => check_void(context, position, span, errors),
        Type::TypeRef { name } => match table.kind(name) {
            Some(SymbolKind::Interface { complete: false }) => {
                errors.push(ResolutionError::UnknownTypeReference {
                    name: name.clone(),
                    context: context.to_string(),
                    span: span.map(Into::into),
                    help: Some(format!("`{name}` is forward declared but never defined")),
                });
            }
            Some(_) => {}
            None => {
                errors.push(ResolutionError::UnknownTypeReference {
                    name: name.clone(),
                    context: context.to_string(),
                    span: span.map(Into::into),
                    help: None,
                });
            }
        },
        Type::Array { element } => {
            let context = format!("array element in {context}");
            check_type(element, &context, Position::Value, span, table, errors);
        }
        Type::Dict { key, value } => {
            let key_context = format!("dict key in {context}");
            check_type(key, &key_context, Position::Value, span, table, errors);
            let value_context = format!("dict value in {context}");
            check_type(value, &value_context, Position::Value, span, table, errors);
        }
        Type::Set { element } => {
            let context = format!("set element in {context}");
            check_type(element, &context, Position::Value, span, table, errors);
        }
        Type::Nullable { inner } => {
            // `T??`, also when the inner `?` comes from a typedef
            let nested = inner.is_nullable()
                || resolve_alias(table, inner).is_some_and(Type::is_nullable);
            if nested {
                errors.push(ResolutionError::NestedNullable {
                    ty: ty.to_string(),
                    context: context.to_string(),
                    span: span.map(Into::into),
                });
            }
            let context = format!("nullable type in {context}");
            check_type(inner, &context, Position::Value, span, table, errors);
        }
    }
}

fn check_void(context: &str, position: Position, span: Option<Span>, errors: &mut Vec<ResolutionError>) {
    if position != Position::Return {
        errors.push(ResolutionError::VoidNotAllowed {
            context: context.to_string(),
            span: span.map(Into::into),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::collect_definitions;
    use quill_syntax::parse;

    fn errors_for(source: &str) -> Vec<String> {
        let file = parse(source).unwrap();
        let ns = &file.namespaces[0];
        let mut errors = Vec::new();
        let table = collect_definitions(ns, &mut errors);
        validate_namespace(ns, &table, &mut errors);
        errors.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn member_name_checks() {
        let errors = errors_for(
            "namespace App {
                interface IUser {
                    string_t name();
                    string_t name();
                    int32_t Age;
                    int32_t Age;
                    string_t name;
                    void rename(string_t value, string_t value);
                }
            }",
        );
        assert_eq!(
            errors,
            [
                "Duplicate method name 'name' in interface IUser",
                "Duplicate parameter name 'value' in method IUser::rename",
                "Duplicate property name 'Age' in interface IUser",
                "Property 'name' conflicts with method name in interface IUser",
            ]
        );
    }

    #[test]
    fn duplicate_enum_members_but_not_values() {
        let errors = errors_for(
            "namespace App { enum Level : int32_t { LOW = 1, MIN = 1, LOW = 2 } }",
        );
        assert_eq!(errors, ["Duplicate enum value 'LOW' in enum Level"]);
    }

    #[test]
    fn unknown_types_inside_containers() {
        let errors = errors_for(
            "namespace App {
                interface IStore {
                    dict<string_t, IMissing> Items;
                    set<Tag> tags();
                    void put(Blob? data);
                }
            }",
        );
        assert_eq!(
            errors,
            [
                "Unknown type 'Tag' in set element in return type of tags",
                "Unknown type 'Blob' in nullable type in parameter 'data' of put",
                "Unknown type 'IMissing' in dict value in property Items",
            ]
        );
    }

    #[test]
    fn void_only_as_return_type() {
        let errors = errors_for(
            "namespace App {
                typedef void Nothing;
                interface IThing {
                    void ok();
                    void[] bad();
                    void Prop;
                    void take(void v);
                }
            }",
        );
        assert_eq!(
            errors,
            [
                "'void' is only valid as a return type, found in array element in return type of bad",
                "'void' is only valid as a return type, found in parameter 'v' of take",
                "'void' is only valid as a return type, found in property Prop",
                "'void' is only valid as a return type, found in typedef Nothing",
            ]
        );
    }

    #[test]
    fn nested_nullable_is_rejected() {
        let errors = errors_for("namespace App { interface IThing { int32_t?? Value; } }");
        assert_eq!(errors, ["Nested nullable type 'int32_t??' in property Value"]);
    }

    #[test]
    fn nullable_typedef_cannot_be_made_nullable_again() {
        let errors = errors_for(
            "namespace App {
                typedef int32_t? MaybeInt;
                typedef MaybeInt Also;
                interface IThing { MaybeInt? Value; Also?[] list(); MaybeInt plain; }
            }",
        );
        assert_eq!(
            errors,
            [
                "Nested nullable type 'Also?' in array element in return type of list",
                "Nested nullable type 'MaybeInt?' in property Value",
            ]
        );
    }

    #[test]
    fn typedefs_resolve_as_types() {
        let errors = errors_for(
            "namespace App { typedef string_t UserId; interface IUser { UserId Id; } }",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn recursive_typedefs_are_reported() {
        let errors = errors_for("namespace App { typedef Second First; typedef First Second; }");
        assert_eq!(errors, ["Recursive typedef 'First'", "Recursive typedef 'Second'"]);
    }
}
