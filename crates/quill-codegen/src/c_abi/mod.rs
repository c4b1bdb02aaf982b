//! Flat C backend.
//!
//! Every interface becomes an opaque, reference-counted handle with plain
//! functions around it. Enums collapse to an integer typedef plus one
//! `#define` per member, constants to casted `#define`s. Alongside the header
//! a module definition file lists every exported symbol.

pub mod containers;
pub mod naming;
pub mod types;

use std::fmt::Write;

use quill_syntax::{Constant, Enum, Interface, Type};

use self::containers::{read_accessors, write_accessors, ContainerDemand};
use self::naming::*;
use self::types::{as_collection, c_type, primitive_c_type};
use crate::context::NamespaceContext;
use crate::expr::{render_expr, Grouping, LiteralStyle, RenderStyle};
use crate::output::{DeclGroup, GeneratedFile};
use crate::{Backend, Target};

const INDENT: &str = "    ";

/// Error codes shared by every generated library, with their values.
pub const ERROR_CODES: [(&str, i32); 7] = [
    ("OK", 0),
    ("ERROR_NULL_POINTER", -1),
    ("ERROR_INVALID_ARGUMENT", -2),
    ("ERROR_OUT_OF_MEMORY", -3),
    ("ERROR_INDEX_OUT_OF_RANGE", -4),
    ("ERROR_NOT_IMPLEMENTED", -5),
    ("ERROR_UNKNOWN", -99),
];

pub struct CAbiBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CParam {
    pub ty: String,
    pub name: String,
}

impl CParam {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self { ty: ty.into(), name: name.into() }
    }
}

/// One exported function of the C surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CFunction {
    pub return_type: String,
    pub name: String,
    pub params: Vec<CParam>,
}

impl CFunction {
    pub fn new(return_type: impl Into<String>, name: impl Into<String>, params: Vec<CParam>) -> Self {
        Self { return_type: return_type.into(), name: name.into(), params }
    }

    pub fn declaration(&self, export: &str) -> String {
        let params = if self.params.is_empty() {
            "void".to_string()
        } else {
            self.params
                .iter()
                .map(|p| format!("{} {}", p.ty, p.name))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("{export} {} {}({params});", self.return_type, self.name)
    }
}

impl Backend for CAbiBackend {
    fn target(&self) -> Target {
        Target::C
    }

    fn generate_namespace(&self, ctx: &NamespaceContext<'_>) -> Vec<GeneratedFile> {
        let ns = ctx.namespace();
        let export = export_macro(&ns.name);
        warn_nullable_scalars(ctx);

        let mut exported: Vec<String> = Vec::new();
        let mut declare = |functions: Vec<CFunction>| -> String {
            let mut out = String::new();
            for function in functions {
                let _ = writeln!(out, "{}", function.declaration(&export));
                exported.push(function.name);
            }
            out
        };

        let mut header = GeneratedFile::new(header_name(&ns.name));
        header.push(DeclGroup::Preamble, preamble(&ns.name));
        header.push(DeclGroup::Handles, handles(ctx));

        let error_decls = declare(error_functions(&ns.name));
        header.push(DeclGroup::ErrorHandling, format!("{}\n{error_decls}", error_codes(&ns.name)));

        let enums: Vec<String> = ns.enums.iter().map(|e| enum_defines(e, ctx)).collect();
        header.push(DeclGroup::Enums, enums.join("\n"));

        let mut typedefs = String::new();
        for typedef in &ns.typedefs {
            // spelled through to the base type so typedef order never matters
            let target = c_type(ctx.unalias(&typedef.ty), ctx);
            let _ = writeln!(typedefs, "typedef {target} {};", typedef.name);
        }
        header.push(DeclGroup::Typedefs, typedefs);

        let mut constants = String::new();
        for constant in &ns.constants {
            constants.push_str(&constant_macro(constant, ctx));
        }
        header.push(DeclGroup::Constants, constants);

        let demand = ContainerDemand::collect(ctx);
        header.push(DeclGroup::Containers, declare(demand.functions(&ns.name)));

        let blocks: Vec<String> = ctx
            .interfaces()
            .map(|interface| {
                format!("/* {} */\n{}", interface.name, declare(interface_functions(interface, ctx)))
            })
            .collect();
        header.push(DeclGroup::Interfaces, blocks.join("\n"));

        header.push(DeclGroup::Epilogue, epilogue(&ns.name));

        let mut exports = GeneratedFile::new(exports_name(&ns.name));
        exports.push(DeclGroup::Exports, module_definition(&ns.name, &exported));

        log::debug!("{}: {} exported C functions", ns.name, exported.len());
        vec![header, exports]
    }
}

/// Every function of one interface: lifetime, properties, then methods.
pub fn interface_functions(interface: &Interface, ctx: &NamespaceContext<'_>) -> Vec<CFunction> {
    let name = interface.name.as_str();
    let handle = handle_type(name);
    let receiver = CParam::new(&handle, "handle");

    let mut functions = vec![
        CFunction::new(&handle, lifetime_name(name, Lifetime::Create), vec![]),
        CFunction::new("void", lifetime_name(name, Lifetime::AddRef), vec![receiver.clone()]),
        CFunction::new("void", lifetime_name(name, Lifetime::Release), vec![receiver.clone()]),
    ];

    for property in &interface.properties {
        let getter = getter_name(name, &property.name);
        let setter = setter_name(name, &property.name);
        match as_collection(&property.ty, ctx) {
            Some(collection) => {
                functions.extend(read_accessors(&getter, collection, &[receiver.clone()], ctx));
                if property.writable {
                    functions.extend(write_accessors(&setter, collection, &receiver, ctx));
                }
            }
            None => {
                functions.push(CFunction::new(c_type(&property.ty, ctx), getter, vec![receiver.clone()]));
                if property.writable {
                    let value = CParam::new(c_type(&property.ty, ctx), "value");
                    functions.push(CFunction::new("void", setter, vec![receiver.clone(), value]));
                }
            }
        }
    }

    for method in &interface.methods {
        let function = function_name(name, &method.name, "");
        let mut params = vec![receiver.clone()];
        params.extend(
            method
                .parameters
                .iter()
                .map(|p| CParam::new(c_type(&p.ty, ctx), param_name(&p.name))),
        );
        match as_collection(&method.return_type, ctx) {
            Some(collection) => functions.extend(read_accessors(&function, collection, &params, ctx)),
            None => functions.push(CFunction::new(c_type(&method.return_type, ctx), function, params)),
        }
    }

    functions
}

fn warn_nullable_scalars(ctx: &NamespaceContext<'_>) {
    let warn = |owner: &str, member: &str, ty: &Type| {
        if ctx.is_nullable_scalar(ty) {
            log::warn!(
                "{}::{owner}::{member}: '{ty}' has no null in C, absent values cross as zero",
                ctx.name()
            );
        }
    };
    for interface in ctx.interfaces() {
        for property in &interface.properties {
            warn(&interface.name, &property.name, &property.ty);
        }
        for method in &interface.methods {
            warn(&interface.name, &method.name, &method.return_type);
            for param in &method.parameters {
                warn(&interface.name, &format!("{}({})", method.name, param.name), &param.ty);
            }
        }
    }
}

fn preamble(namespace: &str) -> String {
    let guard = format!("{}_WRAPPER_H", namespace.to_uppercase());
    let export = export_macro(namespace);
    let exports_flag = format!("{}_EXPORTS", namespace.to_uppercase());

    let mut out = String::new();
    let _ = writeln!(out, "/* Generated by quill from the {namespace} IDL. Do not edit. */");
    let _ = writeln!(out, "#ifndef {guard}");
    let _ = writeln!(out, "#define {guard}");
    out.push('\n');
    for header in ["stdbool.h", "stddef.h", "stdint.h"] {
        let _ = writeln!(out, "#include <{header}>");
    }
    out.push('\n');
    out.push_str("#ifdef _WIN32\n");
    let _ = writeln!(out, "#  ifdef {exports_flag}");
    let _ = writeln!(out, "#    define {export} __declspec(dllexport)");
    out.push_str("#  else\n");
    let _ = writeln!(out, "#    define {export} __declspec(dllimport)");
    out.push_str("#  endif\n");
    out.push_str("#else\n");
    let _ = writeln!(out, "#  define {export} __attribute__((visibility(\"default\")))");
    out.push_str("#endif\n\n");
    out.push_str("#ifdef __cplusplus\nextern \"C\" {\n#endif\n\n");
    out.push_str(concat!(
        "/*\n",
        " * Interfaces are opaque reference-counted handles. _Create returns a handle\n",
        " * holding one reference, _AddRef and _Release adjust the count. Handles\n",
        " * returned by any other function carry one reference owned by the caller.\n",
        " * Returned strings are owned by the library. Releasing NULL is a no-op.\n",
        " * The last-error state is process-global and not thread-safe.\n",
        " * Nullable numbers and bools have no null representation in C.\n",
        " */\n",
    ));
    out
}

fn handles(ctx: &NamespaceContext<'_>) -> String {
    let mut out = String::new();
    for name in ctx.interface_names() {
        let _ = writeln!(out, "typedef struct {}* {};", opaque_struct(name), handle_type(name));
    }
    for kind in ContainerKind::ALL {
        let container = format!("{}{kind}", ctx.name());
        let _ = writeln!(
            out,
            "typedef struct {}* {};",
            opaque_struct(&container),
            container_handle(ctx.name(), kind)
        );
    }
    out
}

fn error_codes(namespace: &str) -> String {
    let mut out = String::from("typedef enum {\n");
    let codes: Vec<String> = ERROR_CODES
        .iter()
        .map(|(code, value)| format!("{INDENT}{} = {value}", error_code(namespace, code)))
        .collect();
    out.push_str(&codes.join(",\n"));
    let _ = writeln!(out, "\n}} {};", error_code_type(namespace));
    out
}

fn error_functions(namespace: &str) -> Vec<CFunction> {
    vec![
        CFunction::new("const char*", error_function(namespace, "GetLastError"), vec![]),
        CFunction::new(error_code_type(namespace), error_function(namespace, "GetLastErrorCode"), vec![]),
        CFunction::new("void", error_function(namespace, "ClearError"), vec![]),
    ]
}

fn enum_defines(decl: &Enum, ctx: &NamespaceContext<'_>) -> String {
    let rewrite = |name: &str| {
        if decl.values.iter().any(|v| v.name == name) {
            return Some(enum_member_define(&decl.name, name));
        }
        if ctx.constant_type(name).is_some() {
            return Some(naming::constant_define(ctx.name(), name));
        }
        ctx.enum_of_member(name).map(|owner| enum_member_define(&owner.name, name))
    };
    let style = RenderStyle::new(LiteralStyle::BinaryAsHex, Grouping::Minimal).with_rewrite(&rewrite);

    let mut out = String::new();
    let _ = writeln!(out, "typedef {} {};", primitive_c_type(decl.backing), decl.name);
    for value in &decl.values {
        let rendered = render_expr(&value.value, &style);
        let rendered = if value.value.is_simple_literal() { rendered } else { format!("({rendered})") };
        let _ = writeln!(out, "#define {} {rendered}", enum_member_define(&decl.name, &value.name));
    }
    out
}

fn constant_macro(constant: &Constant, ctx: &NamespaceContext<'_>) -> String {
    let rewrite = |name: &str| {
        if ctx.constant_type(name).is_some() {
            return Some(naming::constant_define(ctx.name(), name));
        }
        ctx.enum_of_member(name).map(|owner| enum_member_define(&owner.name, name))
    };
    let style = RenderStyle::new(LiteralStyle::BinaryAsHex, Grouping::Minimal).with_rewrite(&rewrite);
    format!(
        "#define {} (({})({}))\n",
        naming::constant_define(ctx.name(), &constant.name),
        primitive_c_type(constant.ty),
        render_expr(&constant.value, &style)
    )
}

fn epilogue(namespace: &str) -> String {
    format!(
        "#ifdef __cplusplus\n}}\n#endif\n\n#endif /* {}_WRAPPER_H */\n",
        namespace.to_uppercase()
    )
}

fn module_definition(namespace: &str, exported: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "LIBRARY {}", namespace.to_lowercase());
    out.push_str("EXPORTS\n");
    for name in exported {
        let _ = writeln!(out, "{INDENT}{name}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use quill_syntax::parse;

    fn generate(source: &str) -> Vec<GeneratedFile> {
        let file = parse(source).unwrap();
        let validated = quill_resolve::validate(&file).unwrap();
        crate::generate(&validated, Target::C, &Default::default())
    }

    fn section(file: &GeneratedFile, group: DeclGroup) -> String {
        file.group(group).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn files_per_namespace() {
        let files = generate("namespace TaskManager { }");
        let paths: Vec<_> = files.iter().map(|f| f.path.to_string_lossy().into_owned()).collect();
        assert_eq!(paths, ["taskmanager_wrapper.h", "taskmanager_exports.def"]);
        let header = files[0].contents();
        assert!(header.starts_with("/* Generated by quill from the TaskManager IDL. Do not edit. */\n#ifndef TASKMANAGER_WRAPPER_H\n"));
        assert!(header.contains("#    define TASKMANAGER_API __declspec(dllexport)"));
        assert!(header.contains("extern \"C\" {"));
        assert!(header.ends_with("#endif /* TASKMANAGER_WRAPPER_H */\n"));
    }

    #[test]
    fn interface_surface() {
        let files = generate(
            "namespace Example {
                enum LogLevel : int32_t { DEBUG = 0, INFO = 1 }
                interface ILogger {
                    string_t name writable;
                    int32_t[] codes writable;
                    dict<string_t, int32_t> counts;
                    void log(LogLevel level, string_t message);
                    string_t[] find(string_t query, int32_t index);
                }
            }",
        );
        expect![[r#"
            /* ILogger */
            EXAMPLE_API ILogger_Handle ILogger_Create(void);
            EXAMPLE_API void ILogger_AddRef(ILogger_Handle handle);
            EXAMPLE_API void ILogger_Release(ILogger_Handle handle);
            EXAMPLE_API const char* ILogger_Getname(ILogger_Handle handle);
            EXAMPLE_API void ILogger_Setname(ILogger_Handle handle, const char* value);
            EXAMPLE_API size_t ILogger_Getcodes_Count(ILogger_Handle handle);
            EXAMPLE_API int32_t ILogger_Getcodes_Item(ILogger_Handle handle, size_t index);
            EXAMPLE_API void ILogger_Setcodes_Clear(ILogger_Handle handle);
            EXAMPLE_API void ILogger_Setcodes_Add(ILogger_Handle handle, int32_t value);
            EXAMPLE_API size_t ILogger_Getcounts_Count(ILogger_Handle handle);
            EXAMPLE_API const char* ILogger_Getcounts_Key(ILogger_Handle handle, size_t index);
            EXAMPLE_API int32_t ILogger_Getcounts_Item(ILogger_Handle handle, size_t index);
            EXAMPLE_API void ILogger_log(ILogger_Handle handle, LogLevel level, const char* message);
            EXAMPLE_API size_t ILogger_find_Count(ILogger_Handle handle, const char* query, int32_t index_);
            EXAMPLE_API const char* ILogger_find_Item(ILogger_Handle handle, const char* query, int32_t index_, size_t index);
        "#]]
        .assert_eq(&section(&files[0], DeclGroup::Interfaces));
    }

    #[test]
    fn enums_constants_and_typedefs() {
        let files = generate(
            "namespace Example {
                const int32_t BASE = 0b1010;
                enum Flags : int32_t { NONE = 0, READ = 1 << 0, WRITE = 1 << 1, ALL = READ | WRITE, MASKED = BASE & 0xFF }
                enum Wide : int64_t { BIG = -1 }
                typedef UserIds Alias;
                typedef int64_t[] UserIds;
                interface IUser { }
                typedef IUser Owner;
            }",
        );
        expect![[r#"
            typedef int32_t Flags;
            #define Flags_NONE 0
            #define Flags_READ (1 << 0)
            #define Flags_WRITE (1 << 1)
            #define Flags_ALL (Flags_READ | Flags_WRITE)
            #define Flags_MASKED (Example_BASE & 0xFF)

            typedef int64_t Wide;
            #define Wide_BIG -1
        "#]]
        .assert_eq(&section(&files[0], DeclGroup::Enums));
        expect![[r#"
            typedef ExampleArray_Handle Alias;
            typedef ExampleArray_Handle UserIds;
            typedef IUser_Handle Owner;
        "#]]
        .assert_eq(&section(&files[0], DeclGroup::Typedefs));
        assert_eq!(section(&files[0], DeclGroup::Constants), "#define Example_BASE ((int32_t)(0xA))\n");
    }

    #[test]
    fn error_handling_block() {
        let files = generate("namespace Example { }");
        expect![[r#"
            typedef enum {
                EXAMPLE_OK = 0,
                EXAMPLE_ERROR_NULL_POINTER = -1,
                EXAMPLE_ERROR_INVALID_ARGUMENT = -2,
                EXAMPLE_ERROR_OUT_OF_MEMORY = -3,
                EXAMPLE_ERROR_INDEX_OUT_OF_RANGE = -4,
                EXAMPLE_ERROR_NOT_IMPLEMENTED = -5,
                EXAMPLE_ERROR_UNKNOWN = -99
            } Example_ErrorCode;

            EXAMPLE_API const char* Example_GetLastError(void);
            EXAMPLE_API Example_ErrorCode Example_GetLastErrorCode(void);
            EXAMPLE_API void Example_ClearError(void);
        "#]]
        .assert_eq(&section(&files[0], DeclGroup::ErrorHandling));
    }

    #[test]
    fn exports_list_every_declared_function() {
        let files = generate(
            "namespace Shop {
                interface ICart { void add(string_t[] skus); }
            }",
        );
        expect![[r#"
            LIBRARY shop
            EXPORTS
                Shop_GetLastError
                Shop_GetLastErrorCode
                Shop_ClearError
                Shop_Array_Create
                Shop_Array_Release
                Shop_Array_Count
                Shop_Array_GetString
                Shop_Array_AppendString
                ICart_Create
                ICart_AddRef
                ICart_Release
                ICart_add
        "#]]
        .assert_eq(&files[1].contents());
        assert!(files[0].contents().contains("SHOP_API void ICart_add(ICart_Handle handle, ShopArray_Handle skus);"));
    }
}
