//! Swift backend: classes over the flat C surface.
//!
//! Each namespace becomes a directory with `Types.swift` (enums, typealiases
//! and constants) and `<Namespace>.swift` (one class per interface plus the
//! container helpers). The C header is expected to be importable as the
//! module `<Namespace>C`.

pub mod bridge;
pub mod types;

use std::fmt::Write;
use std::path::PathBuf;

use quill_syntax::{Constant, Enum, Expr, Interface, LiteralValue, Method, PrimitiveType, Property, Type, UnaryOp};

use self::bridge::{empty_literal, Bridge, INDENT};
use self::types::{case_name, member_name, param_internal_name, primitive_swift_type, SwiftNames};
use crate::c_abi::naming::{accessor_name, function_name, getter_name, lifetime_name, setter_name, Accessor, Lifetime};
use crate::c_abi::types::as_collection;
use crate::context::NamespaceContext;
use crate::expr::{render_expr, Grouping, LiteralStyle, RenderStyle};
use crate::output::{DeclGroup, GeneratedFile};
use crate::{Backend, GeneratorOptions, Target};

pub struct SwiftBackend {
    options: GeneratorOptions,
}

impl SwiftBackend {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }
}

impl Backend for SwiftBackend {
    fn target(&self) -> Target {
        Target::Swift
    }

    fn generate_namespace(&self, ctx: &NamespaceContext<'_>) -> Vec<GeneratedFile> {
        let ns = ctx.namespace();
        let names = SwiftNames::new(ctx, self.options.strip_interface_prefix);
        let bridge = Bridge::new(ctx, &names);
        let dir = PathBuf::from(&ns.name);

        let mut types = GeneratedFile::new(dir.join("Types.swift"));
        types.push(DeclGroup::Preamble, preamble(&ns.name));
        let enums: Vec<String> = ns.enums.iter().map(|e| enum_decl(e, ctx)).collect();
        types.push(DeclGroup::Enums, enums.join("\n"));
        let mut aliases = String::new();
        for typedef in &ns.typedefs {
            let _ = writeln!(aliases, "public typealias {} = {}", typedef.name, bridge.swift_type(&typedef.ty));
        }
        types.push(DeclGroup::Typedefs, aliases);
        let mut constants = String::new();
        for constant in &ns.constants {
            constants.push_str(&constant_decl(constant, ctx));
        }
        types.push(DeclGroup::Constants, constants);

        let mut classes = GeneratedFile::new(dir.join(format!("{}.swift", ns.name)));
        classes.push(DeclGroup::Preamble, preamble(&ns.name));
        let decls: Vec<String> = ctx.interfaces().map(|i| class_decl(i, &bridge)).collect();
        classes.push(DeclGroup::Interfaces, decls.join("\n"));
        let helpers: Vec<String> = bridge
            .handle_collections()
            .iter()
            .map(|(mangled, collection)| bridge.helpers(mangled, collection))
            .collect();
        classes.push(DeclGroup::Containers, helpers.join("\n"));

        vec![types, classes]
    }
}

fn preamble(namespace: &str) -> String {
    format!("// Generated by quill from the {namespace} IDL. Do not edit.\nimport Foundation\nimport {namespace}C\n")
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}

/// Integer value of an integer literal, optionally negated. Swift raw values
/// accept nothing else, not even a leading `+`.
fn literal_value(expr: &Expr) -> Option<i128> {
    match expr {
        Expr::Literal { value: LiteralValue::Integer(v), .. } => Some(i128::from(*v)),
        Expr::Unary { op: UnaryOp::Neg, operand } => match &**operand {
            Expr::Literal { value: LiteralValue::Integer(v), .. } => Some(-i128::from(*v)),
            _ => None,
        },
        _ => None,
    }
}

/// Enums whose members are distinct integer literals use raw values,
/// everything else computes `cValue` in a switch.
fn uses_raw_values(decl: &Enum) -> bool {
    let mut seen = Vec::with_capacity(decl.values.len());
    for value in &decl.values {
        match literal_value(&value.value) {
            Some(v) if !seen.contains(&v) => seen.push(v),
            _ => return false,
        }
    }
    !seen.is_empty()
}

/// Spelling of a constant or enum member referenced from an expression whose
/// type is `target`.
fn reference(name: &str, target: PrimitiveType, sibling_of: Option<&Enum>, ctx: &NamespaceContext<'_>) -> Option<String> {
    let convert = |ty: PrimitiveType, spelled: String| {
        if ty == target {
            spelled
        } else {
            format!("{}({spelled})", primitive_swift_type(target))
        }
    };
    if let Some(decl) = sibling_of {
        if decl.values.iter().any(|v| v.name == name) {
            return Some(format!("{}.{}.cValue", decl.name, case_name(name)));
        }
    }
    if let Some(ty) = ctx.constant_type(name) {
        return Some(convert(ty, name.to_string()));
    }
    ctx.enum_of_member(name)
        .map(|owner| convert(owner.backing, format!("{}.{}.cValue", owner.name, case_name(name))))
}

fn enum_decl(decl: &Enum, ctx: &NamespaceContext<'_>) -> String {
    let backing = primitive_swift_type(decl.backing);
    let mut out = String::new();

    if uses_raw_values(decl) {
        let style = RenderStyle::new(LiteralStyle::PreserveRadix, Grouping::Explicit);
        let _ = writeln!(out, "public enum {}: {backing}, CaseIterable {{", decl.name);
        for value in &decl.values {
            line(&mut out, 1, &format!("case {} = {}", case_name(&value.name), render_expr(&value.value, &style)));
        }
        out.push('\n');
        line(&mut out, 1, &format!("public init?(cValue: {backing}) {{"));
        line(&mut out, 2, "self.init(rawValue: cValue)");
        line(&mut out, 1, "}");
        out.push('\n');
        line(&mut out, 1, &format!("public var cValue: {backing} {{"));
        line(&mut out, 2, "return rawValue");
        line(&mut out, 1, "}");
        out.push_str("}\n");
        return out;
    }

    let rewrite = |name: &str| reference(name, decl.backing, Some(decl), ctx);
    let style = RenderStyle::new(LiteralStyle::PreserveRadix, Grouping::Explicit).with_rewrite(&rewrite);

    let _ = writeln!(out, "public enum {}: CaseIterable {{", decl.name);
    for value in &decl.values {
        line(&mut out, 1, &format!("case {}", case_name(&value.name)));
    }
    if !decl.values.is_empty() {
        out.push('\n');
    }
    line(&mut out, 1, &format!("public init?(cValue: {backing}) {{"));
    line(&mut out, 2, &format!("guard let match = {}.allCases.first(where: {{ $0.cValue == cValue }}) else {{", decl.name));
    line(&mut out, 3, "return nil");
    line(&mut out, 2, "}");
    line(&mut out, 2, "self = match");
    line(&mut out, 1, "}");
    out.push('\n');
    line(&mut out, 1, &format!("public var cValue: {backing} {{"));
    line(&mut out, 2, "switch self {");
    for value in &decl.values {
        line(
            &mut out,
            2,
            &format!("case .{}: return {}", case_name(&value.name), render_expr(&value.value, &style)),
        );
    }
    line(&mut out, 2, "}");
    line(&mut out, 1, "}");
    out.push_str("}\n");
    out
}

fn constant_decl(constant: &Constant, ctx: &NamespaceContext<'_>) -> String {
    let rewrite = |name: &str| reference(name, constant.ty, None, ctx);
    let style = RenderStyle::new(LiteralStyle::PreserveRadix, Grouping::Explicit).with_rewrite(&rewrite);
    format!(
        "public let {}: {} = {}\n",
        constant.name,
        primitive_swift_type(constant.ty),
        render_expr(&constant.value, &style)
    )
}

fn class_decl(interface: &Interface, bridge: &Bridge<'_, '_>) -> String {
    let iface = interface.name.as_str();
    let class = bridge.names.class_name(iface);
    let mut out = String::new();

    let _ = writeln!(out, "public class {class} {{");
    line(&mut out, 1, "internal let handle: OpaquePointer");
    out.push('\n');
    line(&mut out, 1, "internal init(handle: OpaquePointer) {");
    line(&mut out, 2, "self.handle = handle");
    line(&mut out, 1, "}");
    out.push('\n');
    line(&mut out, 1, "public convenience init?() {");
    line(&mut out, 2, &format!("guard let handle = {}() else {{", lifetime_name(iface, Lifetime::Create)));
    line(&mut out, 3, "return nil");
    line(&mut out, 2, "}");
    line(&mut out, 2, "self.init(handle: handle)");
    line(&mut out, 1, "}");
    out.push('\n');
    line(&mut out, 1, "deinit {");
    line(&mut out, 2, &format!("{}(handle)", lifetime_name(iface, Lifetime::Release)));
    line(&mut out, 1, "}");

    for property in &interface.properties {
        out.push('\n');
        property_decl(&mut out, iface, property, bridge);
    }
    for method in &interface.methods {
        out.push('\n');
        method_decl(&mut out, iface, method, bridge);
    }
    out.push_str("}\n\n");

    let _ = writeln!(out, "extension {class}: Hashable {{");
    line(&mut out, 1, &format!("public static func == (lhs: {class}, rhs: {class}) -> Bool {{"));
    line(&mut out, 2, "return lhs.handle == rhs.handle");
    line(&mut out, 1, "}");
    out.push('\n');
    line(&mut out, 1, "public func hash(into hasher: inout Hasher) {");
    line(&mut out, 2, "hasher.combine(handle)");
    line(&mut out, 1, "}");
    out.push_str("}\n");
    out
}

/// Body lines reading a whole collection through `base`'s accessor family.
fn read_family(base: &str, collection: &Type, args: &[String], bridge: &Bridge<'_, '_>) -> Vec<String> {
    let joined = args.join(", ");
    let mut indexed = args.to_vec();
    indexed.push("position".to_string());
    let indexed = indexed.join(", ");

    let mut lines = vec![
        format!("var result: {} = {}", bridge.swift_type(collection), empty_literal(collection)),
        format!("let count = {}({joined})", accessor_name(base, Accessor::Count)),
        "for position in 0..<count {".to_string(),
    ];
    let item = bridge.from_c(&format!("{}({indexed})", accessor_name(base, Accessor::Item)), element_of(collection).1);
    match collection {
        Type::Dict { key, .. } => {
            let key = bridge.from_c(&format!("{}({indexed})", accessor_name(base, Accessor::Key)), key);
            lines.push(format!("{INDENT}let key = {key}"));
            lines.push(format!("{INDENT}result[key] = {item}"));
        }
        Type::Set { .. } => lines.push(format!("{INDENT}result.insert({item})")),
        _ => lines.push(format!("{INDENT}result.append({item})")),
    }
    lines.push("}".to_string());
    lines.push("return result".to_string());
    lines
}

/// Key (dicts only) and value type of a collection.
fn element_of(collection: &Type) -> (Option<&Type>, &Type) {
    match collection {
        Type::Dict { key, value } => (Some(key), value),
        Type::Array { element } | Type::Set { element } => (None, element),
        other => (None, other),
    }
}

fn property_decl(out: &mut String, iface: &str, property: &Property, bridge: &Bridge<'_, '_>) {
    let getter = getter_name(iface, &property.name);
    let setter = setter_name(iface, &property.name);
    line(
        out,
        1,
        &format!("public var {}: {} {{", member_name(&property.name), bridge.swift_type(&property.ty)),
    );

    let (get_lines, set_lines) = match as_collection(&property.ty, bridge.ctx) {
        Some(collection) => {
            let get = read_family(&getter, collection, &["handle".to_string()], bridge);
            let nullable = bridge.ctx.unalias(&property.ty).is_nullable();
            let source = if nullable {
                format!("newValue ?? {}", empty_literal(collection))
            } else {
                "newValue".to_string()
            };
            let mut set = vec![format!("{}(handle)", accessor_name(&setter, Accessor::Clear))];
            let add = accessor_name(&setter, Accessor::Add);
            match element_of(collection) {
                (Some(key), value) => {
                    set.push(format!("for (key, value) in {source} {{"));
                    let key = bridge.to_c("key", key);
                    let value = bridge.to_c("value", value);
                    set.extend(key.setup.iter().chain(&value.setup).map(|l| format!("{INDENT}{l}")));
                    set.push(format!("{INDENT}{add}(handle, {}, {})", key.value, value.value));
                }
                (None, element) => {
                    set.push(format!("for item in {source} {{"));
                    let item = bridge.to_c("item", element);
                    set.extend(item.setup.iter().map(|l| format!("{INDENT}{l}")));
                    set.push(format!("{INDENT}{add}(handle, {})", item.value));
                }
            }
            set.push("}".to_string());
            (get, set)
        }
        None => {
            let get = vec![format!("return {}", bridge.from_c(&format!("{getter}(handle)"), &property.ty))];
            let value = bridge.to_c("newValue", &property.ty);
            let mut set = value.setup;
            set.push(format!("{setter}(handle, {})", value.value));
            (get, set)
        }
    };

    if property.writable {
        line(out, 2, "get {");
        for l in &get_lines {
            line(out, 3, l);
        }
        line(out, 2, "}");
        line(out, 2, "set {");
        for l in &set_lines {
            line(out, 3, l);
        }
        line(out, 2, "}");
    } else {
        for l in &get_lines {
            line(out, 2, l);
        }
    }
    line(out, 1, "}");
}

fn method_decl(out: &mut String, iface: &str, method: &Method, bridge: &Bridge<'_, '_>) {
    let function = function_name(iface, &method.name, "");
    let mut decls = Vec::new();
    let mut setup = Vec::new();
    let mut args = vec!["handle".to_string()];
    for param in &method.parameters {
        let label = member_name(&param.name);
        let ty = bridge.swift_type(&param.ty);
        let variable = match param_internal_name(&param.name) {
            Some(internal) => {
                decls.push(format!("{label} {internal}: {ty}"));
                internal
            }
            None => {
                decls.push(format!("{label}: {ty}"));
                label
            }
        };
        let lowered = bridge.to_c(&variable, &param.ty);
        setup.extend(lowered.setup);
        args.push(lowered.value);
    }

    let returns = if method.return_type.is_void() {
        String::new()
    } else {
        format!(" -> {}", bridge.swift_type(&method.return_type))
    };
    line(
        out,
        1,
        &format!("public func {}({}){returns} {{", member_name(&method.name), decls.join(", ")),
    );
    for l in &setup {
        line(out, 2, l);
    }
    let call = format!("{function}({})", args.join(", "));
    if let Some(collection) = as_collection(&method.return_type, bridge.ctx) {
        for l in read_family(&function, collection, &args, bridge) {
            line(out, 2, &l);
        }
    } else if method.return_type.is_void() {
        line(out, 2, &call);
    } else {
        line(out, 2, &format!("return {}", bridge.from_c(&call, &method.return_type)));
    }
    line(out, 1, "}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use quill_syntax::parse;

    fn generate(source: &str) -> Vec<GeneratedFile> {
        let file = parse(source).unwrap();
        let validated = quill_resolve::validate(&file).unwrap();
        crate::generate(&validated, Target::Swift, &Default::default())
    }

    fn section(file: &GeneratedFile, group: DeclGroup) -> String {
        file.group(group).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn file_layout() {
        let files = generate("namespace Example { }");
        let paths: Vec<_> = files.iter().map(|f| f.path.to_string_lossy().into_owned()).collect();
        assert_eq!(paths, ["Example/Types.swift", "Example/Example.swift"]);
        assert_eq!(
            files[0].contents(),
            "// Generated by quill from the Example IDL. Do not edit.\nimport Foundation\nimport ExampleC\n"
        );
    }

    #[test]
    fn raw_value_enum() {
        let files = generate("namespace Example { enum LogLevel : int32_t { DEBUG = 0, NOT_FOUND = 0xFF, NEG = -1 } }");
        expect![[r#"
            public enum LogLevel: Int32, CaseIterable {
                case debug = 0
                case notFound = 0xFF
                case neg = -1

                public init?(cValue: Int32) {
                    self.init(rawValue: cValue)
                }

                public var cValue: Int32 {
                    return rawValue
                }
            }
        "#]]
        .assert_eq(&section(&files[0], DeclGroup::Enums));
    }

    #[test]
    fn computed_enum_parenthesizes_nested_operations() {
        let files = generate(
            "namespace Example {
                const int64_t SHIFT = 2;
                enum Flags : int32_t { READ = 1 << SHIFT, WRITE = 0b10, ALL = READ | WRITE & 0xF }
            }",
        );
        expect![[r#"
            public enum Flags: CaseIterable {
                case read
                case write
                case all

                public init?(cValue: Int32) {
                    guard let match = Flags.allCases.first(where: { $0.cValue == cValue }) else {
                        return nil
                    }
                    self = match
                }

                public var cValue: Int32 {
                    switch self {
                    case .read: return 1 << Int32(SHIFT)
                    case .write: return 0b10
                    case .all: return Flags.read.cValue | (Flags.write.cValue & 0xF)
                    }
                }
            }
        "#]]
        .assert_eq(&section(&files[0], DeclGroup::Enums));
        assert_eq!(section(&files[0], DeclGroup::Constants), "public let SHIFT: Int64 = 2\n");
    }

    #[test]
    fn duplicate_values_fall_back_to_switch() {
        let files = generate("namespace Example { enum Alias : int32_t { A = 1, B = 1 } }");
        let enums = section(&files[0], DeclGroup::Enums);
        assert!(enums.starts_with("public enum Alias: CaseIterable {"));
        assert!(enums.contains("case .b: return 1"));
    }

    #[test]
    fn explicit_plus_sign_is_not_a_raw_value() {
        let files = generate("namespace Example { enum Signed : int32_t { A = +1, B = 2, C = - -3 } }");
        let enums = section(&files[0], DeclGroup::Enums);
        assert!(enums.starts_with("public enum Signed: CaseIterable {"), "{enums}");
        assert!(enums.contains("case .a: return +1"));
        assert!(enums.contains("case .c: return -(-3)"));
        assert!(!enums.contains("rawValue"));
    }

    #[test]
    fn class_wraps_handle() {
        let files = generate(
            "namespace Example {
                enum LogLevel : int32_t { DEBUG = 0 }
                interface ILogger {
                    string_t name writable;
                    int32_t? limit;
                    void log(LogLevel level, string_t message);
                    ILogger? parent();
                }
            }",
        );
        expect![[r#"
            public class Logger {
                internal let handle: OpaquePointer

                internal init(handle: OpaquePointer) {
                    self.handle = handle
                }

                public convenience init?() {
                    guard let handle = ILogger_Create() else {
                        return nil
                    }
                    self.init(handle: handle)
                }

                deinit {
                    ILogger_Release(handle)
                }

                public var name: String {
                    get {
                        return ILogger_Getname(handle).map { String(cString: $0) } ?? ""
                    }
                    set {
                        ILogger_Setname(handle, newValue)
                    }
                }

                public var limit: Int32? {
                    return ILogger_Getlimit(handle)
                }

                public func log(level: LogLevel, message: String) {
                    ILogger_log(handle, level.cValue, message)
                }

                public func parent() -> Logger? {
                    return ILogger_parent(handle).map { Logger(handle: $0) }
                }
            }

            extension Logger: Hashable {
                public static func == (lhs: Logger, rhs: Logger) -> Bool {
                    return lhs.handle == rhs.handle
                }

                public func hash(into hasher: inout Hasher) {
                    hasher.combine(handle)
                }
            }
        "#]]
        .assert_eq(&section(&files[1], DeclGroup::Interfaces));
    }

    #[test]
    fn collection_members() {
        let files = generate(
            "namespace Example {
                interface IBag {
                    int32_t[] items writable;
                    dict<string_t, IBag> children;
                    string_t[] search(set<int64_t> ids, int32_t count);
                }
            }",
        );
        let classes = section(&files[1], DeclGroup::Interfaces);
        expect![[r#"
            public var items: [Int32] {
                get {
                    var result: [Int32] = []
                    let count = IBag_Getitems_Count(handle)
                    for position in 0..<count {
                        result.append(IBag_Getitems_Item(handle, position))
                    }
                    return result
                }
                set {
                    IBag_Setitems_Clear(handle)
                    for item in newValue {
                        IBag_Setitems_Add(handle, item)
                    }
                }
            }
        "#]]
        .assert_eq(&extract(&classes, "public var items"));
        expect![[r#"
            public var children: [String: Bag] {
                var result: [String: Bag] = [:]
                let count = IBag_Getchildren_Count(handle)
                for position in 0..<count {
                    let key = IBag_Getchildren_Key(handle, position).map { String(cString: $0) } ?? ""
                    result[key] = Bag(handle: IBag_Getchildren_Item(handle, position)!)
                }
                return result
            }
        "#]]
        .assert_eq(&extract(&classes, "public var children"));
        expect![[r#"
            public func search(ids: Set<Int64>, count countArg: Int32) -> [String] {
                let idsHandle = makeSetInt64(ids)
                defer { Example_Set_Release(idsHandle) }
                var result: [String] = []
                let count = IBag_search_Count(handle, idsHandle, countArg)
                for position in 0..<count {
                    result.append(IBag_search_Item(handle, idsHandle, countArg, position).map { String(cString: $0) } ?? "")
                }
                return result
            }
        "#]]
        .assert_eq(&extract(&classes, "public func search"));

        expect![[r#"
            fileprivate func readSetInt64(_ container: OpaquePointer?) -> Set<Int64> {
                guard let container = container else {
                    return []
                }
                defer { Example_Set_Release(container) }
                var result: Set<Int64> = []
                let count = Example_Set_Count(container)
                for position in 0..<count {
                    result.insert(Example_Set_GetInt64(container, position))
                }
                return result
            }

            fileprivate func makeSetInt64(_ values: Set<Int64>) -> OpaquePointer? {
                let container = Example_Set_Create()
                for item in values {
                    Example_Set_InsertInt64(container, item)
                }
                return container
            }
        "#]]
        .assert_eq(&section(&files[1], DeclGroup::Containers));
    }

    /// The member starting at `start`, dedented by one level.
    fn extract(text: &str, start: &str) -> String {
        let mut out = String::new();
        let mut inside = false;
        for l in text.lines() {
            if l.trim_start().starts_with(start) {
                inside = true;
            }
            if inside {
                out.push_str(l.strip_prefix(INDENT).unwrap_or(l));
                out.push('\n');
                if l == format!("{INDENT}}}") {
                    break;
                }
            }
        }
        out
    }

    #[test]
    fn prefix_stripping_can_be_disabled() {
        let file = parse("namespace Example { interface IUser { } }").unwrap();
        let validated = quill_resolve::validate(&file).unwrap();
        let options = GeneratorOptions { strip_interface_prefix: false };
        let files = crate::generate(&validated, Target::Swift, &options);
        assert!(files[1].contents().contains("public class IUser {"));
    }
}
