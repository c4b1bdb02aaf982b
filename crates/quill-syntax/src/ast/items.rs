use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Expr, PrimitiveType, Span, Type};
use crate::error::SyntaxResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub return_type: Type,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    /// Read-only properties only get a getter.
    #[serde(default)]
    pub writable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub value: Expr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    /// Either `int32_t` or `int64_t`.
    pub backing: PrimitiveType,
    #[serde(default)]
    pub values: Vec<EnumValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typedef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,
    /// One of `int32_t`, `int64_t`, `float` or `double`.
    #[serde(rename = "type")]
    pub ty: PrimitiveType,
    pub value: Expr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// `interface IName;`: makes the name usable before its definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// A sealed naming scope. Type references never resolve across namespaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    #[serde(default)]
    pub forward_declarations: Vec<ForwardDeclaration>,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    #[serde(default)]
    pub enums: Vec<Enum>,
    #[serde(default)]
    pub typedefs: Vec<Typedef>,
    #[serde(default)]
    pub constants: Vec<Constant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            forward_declarations: Vec::new(),
            interfaces: Vec::new(),
            enums: Vec::new(),
            typedefs: Vec::new(),
            constants: Vec::new(),
            span: None,
        }
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn enum_decl(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.forward_declarations.is_empty()
            && self.interfaces.is_empty()
            && self.enums.is_empty()
            && self.typedefs.is_empty()
            && self.constants.is_empty()
    }
}

/// Root of a parsed IDL compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdlFile {
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
}

impl IdlFile {
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    /// Pretty-printed JSON; absent optional fields are omitted rather than `null`.
    pub fn to_json(&self) -> SyntaxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> SyntaxResult<IdlFile> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Radix;
    use expect_test::expect;

    #[test]
    fn json_omits_absent_optionals() {
        let mut ns = Namespace::new("Demo");
        ns.constants.push(Constant {
            name: "MASK".to_string(),
            ty: PrimitiveType::Int32,
            value: Expr::int_with_radix(255, Radix::Hex),
            span: None,
        });
        ns.forward_declarations.push(ForwardDeclaration { name: "IThing".to_string(), span: None });
        let file = IdlFile { namespaces: vec![ns], source_file: None };

        let json = file.to_json().unwrap();
        assert!(!json.contains("null"));
        assert!(!json.contains("source_file"));
        assert!(!json.contains("span"));
        expect![[r#"
            {
              "namespaces": [
                {
                  "name": "Demo",
                  "forward_declarations": [
                    {
                      "name": "IThing"
                    }
                  ],
                  "interfaces": [],
                  "enums": [],
                  "typedefs": [],
                  "constants": [
                    {
                      "name": "MASK",
                      "type": "int32_t",
                      "value": {
                        "kind": "Literal",
                        "value": 255,
                        "radix": "hex"
                      }
                    }
                  ]
                }
              ]
            }"#]]
        .assert_eq(&json);
    }

    #[test]
    fn json_round_trip_keeps_radix_and_nesting() {
        let mut ns = Namespace::new("Demo");
        ns.typedefs.push(Typedef {
            name: "Lookup".to_string(),
            ty: Type::nullable(Type::dict(
                Type::primitive(PrimitiveType::String),
                Type::array(Type::type_ref("IUser")),
            )),
            span: Some(Span::new(4, 40)),
        });
        ns.constants.push(Constant {
            name: "FLAGS".to_string(),
            ty: PrimitiveType::Int64,
            value: Expr::paren(Expr::binary(
                crate::ast::BinaryOp::Shl,
                Expr::int_with_radix(0b1010, Radix::Binary),
                Expr::int(2),
            )),
            span: None,
        });
        let file = IdlFile {
            namespaces: vec![ns],
            source_file: Some(PathBuf::from("demo.idl")),
        };

        let json = file.to_json().unwrap();
        let back = IdlFile::from_json(&json).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = IdlFile::from_json("{\"namespaces\": 3}").unwrap_err();
        assert!(matches!(err, crate::SyntaxError::Json(_)));
    }
}
