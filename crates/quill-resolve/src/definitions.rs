// Pass 1: register every type name declared in a namespace.

use quill_syntax::{Namespace, Span, Type};

use crate::error::ResolutionError;
use crate::symbol::{Registration, SymbolKind, SymbolTable};

/// Build the symbol table of one namespace, recording name collisions.
///
/// Forward declarations are registered first, then interfaces, enums and
/// typedefs, so an interface body always finds its forward declaration no
/// matter where either appears. Constants are not types and are skipped.
pub fn collect_definitions(namespace: &Namespace, errors: &mut Vec<ResolutionError>) -> SymbolTable {
    let mut table = SymbolTable::new(&namespace.name);

    for forward in &namespace.forward_declarations {
        register(&mut table, &forward.name, SymbolKind::Interface { complete: false }, forward.span, errors);
    }
    for interface in &namespace.interfaces {
        register(&mut table, &interface.name, SymbolKind::Interface { complete: true }, interface.span, errors);
    }
    for decl in &namespace.enums {
        register(&mut table, &decl.name, SymbolKind::Enum { backing: decl.backing }, decl.span, errors);
    }
    for typedef in &namespace.typedefs {
        let kind = SymbolKind::Typedef { target: typedef.ty.clone() };
        register(&mut table, &typedef.name, kind, typedef.span, errors);
    }

    table
}

fn register(
    table: &mut SymbolTable,
    name: &str,
    kind: SymbolKind,
    span: Option<Span>,
    errors: &mut Vec<ResolutionError>,
) {
    if table.register(name, kind, span) == Registration::Duplicate {
        errors.push(ResolutionError::DuplicateTypeDefinition {
            name: name.to_string(),
            namespace: table.namespace().to_string(),
            span: span.map(Into::into),
        });
    }
}

/// Follow typedef chains until a non-alias type is reached.
///
/// Returns `None` for a cycle of aliases.
pub fn resolve_alias<'t>(table: &'t SymbolTable, ty: &'t Type) -> Option<&'t Type> {
    let mut current = ty;
    for _ in 0..=table.len() {
        match current {
            Type::TypeRef { name } => match table.kind(name) {
                Some(SymbolKind::Typedef { target }) => current = target,
                _ => return Some(current),
            },
            other => return Some(other),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use quill_syntax::parse;

    fn collect(source: &str) -> (SymbolTable, Vec<ResolutionError>) {
        let file = parse(source).unwrap();
        let mut errors = Vec::new();
        let table = collect_definitions(&file.namespaces[0], &mut errors);
        (table, errors)
    }

    #[test]
    fn collects_all_type_kinds_in_order() {
        let (table, errors) = collect(
            "namespace App {
                interface IUser { }
                enum Status : int32_t { OK = 0 }
                typedef string_t UserId;
                interface IManager;
                const int32_t LIMIT = 3;
            }",
        );
        assert!(errors.is_empty());
        let listing: Vec<String> = table
            .iter()
            .map(|s| format!("{} {}", s.kind.describe(), s.name))
            .collect();
        expect![[r#"
            [
                "forward declaration IManager",
                "interface IUser",
                "enum Status",
                "typedef UserId",
            ]
        "#]]
        .assert_debug_eq(&listing);
        assert!(!table.contains("LIMIT"));
    }

    #[test]
    fn duplicate_interface_is_reported() {
        let (_, errors) = collect("namespace App { interface IUser { } interface IUser { } }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Duplicate type definition: IUser");
    }

    #[test]
    fn enum_and_typedef_collision_is_reported() {
        let (table, errors) = collect(
            "namespace App { enum Mode : int32_t { A = 1 } typedef int32_t Mode; }",
        );
        assert_eq!(errors.len(), 1);
        assert!(table.is_enum("Mode"));
    }

    #[test]
    fn forward_declaration_is_completed() {
        let (table, errors) = collect("namespace App { interface IManager { } interface IManager; }");
        assert!(errors.is_empty());
        assert_eq!(table.kind("IManager"), Some(&SymbolKind::Interface { complete: true }));
    }

    #[test]
    fn alias_chains_resolve() {
        let (table, _) = collect(
            "namespace App { typedef Id Key; typedef int64_t Id; interface IUser { } typedef IUser Owner; }",
        );
        let key = Type::type_ref("Key");
        assert_eq!(
            resolve_alias(&table, &key),
            Some(&Type::primitive(quill_syntax::PrimitiveType::Int64))
        );
        assert_eq!(resolve_alias(&table, &Type::type_ref("Owner")), Some(&Type::type_ref("IUser")));
    }

    #[test]
    fn alias_cycles_do_not_hang() {
        let (table, _) = collect("namespace App { typedef B A; typedef A B; }");
        assert_eq!(resolve_alias(&table, &Type::type_ref("A")), None);
    }
}
