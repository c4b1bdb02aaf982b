use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Errors found while registering and resolving the declarations of a namespace.
///
/// None of these stop validation; they are collected and reported together
/// through [`ValidationFailed`].
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Indicates that a type name was registered twice in one namespace,
    /// other than a forward declaration being completed by its interface.
    #[error("Duplicate type definition: {name}")]
    #[diagnostic(code(quill_resolve::duplicate_type_definition))]
    DuplicateTypeDefinition {
        /// The name that was declared more than once.
        name: String,
        /// The namespace both declarations live in.
        namespace: String,
        #[label("redeclared here")]
        span: Option<SourceSpan>,
    },

    /// Indicates that two methods of one interface share a name.
    #[error("Duplicate method name '{method}' in interface {interface}")]
    #[diagnostic(code(quill_resolve::duplicate_method_name))]
    DuplicateMethodName {
        interface: String,
        method: String,
        #[label("second definition here")]
        span: Option<SourceSpan>,
    },

    /// Indicates that two properties of one interface share a name.
    #[error("Duplicate property name '{property}' in interface {interface}")]
    #[diagnostic(code(quill_resolve::duplicate_property_name))]
    DuplicatePropertyName {
        interface: String,
        property: String,
        #[label("second definition here")]
        span: Option<SourceSpan>,
    },

    /// Indicates that a property has the same name as a method of its interface.
    #[error("Property '{property}' conflicts with method name in interface {interface}")]
    #[diagnostic(
        code(quill_resolve::method_property_name_conflict),
        help("generated accessors and methods share one namespace in every target")
    )]
    MethodPropertyNameConflict {
        interface: String,
        property: String,
        #[label("conflicting property")]
        span: Option<SourceSpan>,
    },

    /// Indicates that a method declares two parameters with the same name.
    #[error("Duplicate parameter name '{parameter}' in method {interface}::{method}")]
    #[diagnostic(code(quill_resolve::duplicate_parameter_name))]
    DuplicateParameterName {
        interface: String,
        method: String,
        parameter: String,
        #[label("second parameter here")]
        span: Option<SourceSpan>,
    },

    /// Indicates that an enum declares two members with the same name.
    /// Sharing a numeric value is allowed.
    #[error("Duplicate enum value '{value}' in enum {enum_name}")]
    #[diagnostic(code(quill_resolve::duplicate_enum_value_name))]
    DuplicateEnumValueName {
        enum_name: String,
        value: String,
        #[label("second member here")]
        span: Option<SourceSpan>,
    },

    /// Indicates that a type reference names nothing declared in the
    /// enclosing namespace.
    #[error("Unknown type '{name}' in {context}")]
    #[diagnostic(code(quill_resolve::unknown_type_reference))]
    UnknownTypeReference {
        /// The unresolved type name.
        name: String,
        /// Where the reference occurred, e.g. `parameter 'id' of find`.
        context: String,
        #[label("referenced here")]
        span: Option<SourceSpan>,
        /// Set when the name is only forward declared.
        #[help]
        help: Option<String>,
    },

    /// Indicates a `T??` type, which no target can represent.
    #[error("Nested nullable type '{ty}' in {context}")]
    #[diagnostic(
        code(quill_resolve::nested_nullable),
        help("a single `?` already makes the type optional")
    )]
    NestedNullable {
        ty: String,
        context: String,
        #[label("used here")]
        span: Option<SourceSpan>,
    },

    /// Indicates `void` used anywhere except directly as a method return type.
    #[error("'void' is only valid as a return type, found in {context}")]
    #[diagnostic(code(quill_resolve::void_not_allowed))]
    VoidNotAllowed {
        context: String,
        #[label("used here")]
        span: Option<SourceSpan>,
    },
    /// Indicates a typedef whose alias chain leads back to itself.
    #[error("Recursive typedef '{name}'")]
    #[diagnostic(code(quill_resolve::recursive_typedef))]
    RecursiveTypedef {
        name: String,
        #[label("aliases itself")]
        span: Option<SourceSpan>,
    },

    /// Indicates two `namespace` blocks with the same name; every namespace
    /// is a single sealed scope.
    #[error("Duplicate namespace: {name}")]
    #[diagnostic(code(quill_resolve::duplicate_namespace))]
    DuplicateNamespace {
        name: String,
        #[label("reopened here")]
        span: Option<SourceSpan>,
    },
}

/// Aggregate failure carrying every error found in one validation run.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
#[error("Semantic validation failed with {} error(s)", .errors.len())]
#[diagnostic(code(quill_resolve::validation_failed))]
pub struct ValidationFailed {
    #[related]
    pub errors: Vec<ResolutionError>,
}

impl ValidationFailed {
    pub fn count(&self) -> usize {
        self.errors.len()
    }

    /// One line per error, in the order they were found.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// The headline followed by an indented list of every message.
    pub fn summary(&self) -> String {
        let mut out = format!("{self}:\n");
        for message in self.messages() {
            out.push_str("  - ");
            out.push_str(&message);
            out.push('\n');
        }
        out
    }
}
