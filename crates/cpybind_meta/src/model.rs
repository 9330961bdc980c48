//! Metadata entities: packages, structs, fields, functions, values and their types.
//!
//! These are read-only views produced by the introspection layer (or loaded from JSON, see [`crate::load`]). The
//! generator derives text from them and never mutates them.

use std::fmt;

use cpybind_core::lang::conventions;
use cpybind_core::lang::scalars::{self, BasicKind};
use serde::{Deserialize, Serialize};

/// One wrapped package: the unit of generation (one C extension module per package).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Package {
    /// Package name; names the Python module and its initializer.
    pub name: String,
    /// Import path (identity of the package).
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub structs: Vec<StructType>,
    /// Free functions, in declaration order.
    #[serde(default)]
    pub funcs: Vec<Func>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Add a struct, deriving its stable identifier and method receivers if missing.
    pub fn with_struct(mut self, mut s: StructType) -> Self {
        self.adopt_struct(&mut s);
        self.structs.push(s);
        self
    }

    /// Add a free function, deriving its stable identifier if missing.
    pub fn with_func(mut self, mut f: Func) -> Self {
        if f.id.is_empty() {
            f.id = conventions::default_id(&self.name, &f.name);
        }
        self.funcs.push(f);
        self
    }

    /// Fill in every derivable default (identifiers, method receivers).
    ///
    /// Idempotent; explicit identifiers, paths and receivers are never overwritten.
    pub fn normalize(&mut self) {
        if self.path.is_empty() {
            self.path = self.name.clone();
        }
        let mut structs = std::mem::take(&mut self.structs);
        for s in &mut structs {
            self.adopt_struct(s);
        }
        self.structs = structs;
        for f in &mut self.funcs {
            if f.id.is_empty() {
                f.id = conventions::default_id(&self.name, &f.name);
            }
        }
    }

    /// Look up a struct by its exported name.
    pub fn struct_named(&self, name: &str) -> Option<&StructType> {
        self.structs.iter().find(|s| s.name == name)
    }

    fn adopt_struct(&self, s: &mut StructType) {
        if s.id.is_empty() {
            s.id = conventions::default_id(&self.name, &s.name);
        }
        let receiver_ty = ValueType::pointer(ValueType::named_struct(&s.name));
        for m in &mut s.methods {
            if m.id.is_empty() {
                m.id = conventions::default_method_id(&self.name, &s.name, &m.name);
            }
            if m.receiver.is_none() {
                m.receiver = Some(Var::new(conventions::RECEIVER_LOCAL, receiver_ty.clone()));
            }
        }
    }
}

/// A protocol capability a struct satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Has a `String() string` method giving its textual representation.
    Stringer,
}

/// An exported struct type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructType {
    pub name: String,
    /// Stable identifier; a collision-free symbol fragment. Empty until derived.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Bound methods, in declaration order.
    #[serde(default)]
    pub methods: Vec<Func>,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl StructType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: Func) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_capability(mut self, cap: Capability) -> Self {
        if !self.capabilities.contains(&cap) {
            self.capabilities.push(cap);
        }
        self
    }

    pub fn has_capability(&self, cap: Capability) -> bool {
        self.capabilities.contains(&cap)
    }

    /// Look up a bound method by name.
    pub fn method(&self, name: &str) -> Option<&Func> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Exported fields in declaration order.
    pub fn exported_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_exported())
    }
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Explicit export flag; when absent, exported means "starts with an uppercase letter".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported: Option<bool>,
    #[serde(rename = "type")]
    pub ty: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            exported: None,
            ty,
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn is_exported(&self) -> bool {
        self.exported
            .unwrap_or_else(|| self.name.chars().next().is_some_and(|c| c.is_uppercase()))
    }
}

/// A function or (when `receiver` is set) a method.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Func {
    pub name: String,
    /// Stable identifier. Empty until derived.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub params: Vec<Var>,
    #[serde(default)]
    pub results: Vec<Var>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Var>,
}

impl Func {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.params.push(Var::new(name, ty));
        self
    }

    /// Append an unnamed result.
    pub fn result(mut self, ty: ValueType) -> Self {
        self.results.push(Var::new("", ty));
        self
    }

    pub fn receiver(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.receiver = Some(Var::new(name, ty));
        self
    }

    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

/// A typed value: parameter, result, field or receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Var {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ValueType,
}

impl Var {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// The type of a value, as reported by the introspection layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// A predeclared scalar (`int`, `string`, `unsafe.Pointer`, ...).
    Basic(#[serde(with = "basic_kind")] BasicKind),
    /// A named (defined) type and its underlying type.
    Named {
        name: String,
        #[serde(default = "struct_underlying")]
        underlying: Box<ValueType>,
    },
    Pointer(Box<ValueType>),
    /// An anonymous struct literal type.
    Struct,
    Slice(Box<ValueType>),
    Array { len: u64, elem: Box<ValueType> },
    Map { key: Box<ValueType>, value: Box<ValueType> },
    Chan(Box<ValueType>),
    /// A function value.
    Signature,
    Interface,
}

fn struct_underlying() -> Box<ValueType> {
    Box::new(ValueType::Struct)
}

impl ValueType {
    pub fn basic(kind: BasicKind) -> Self {
        ValueType::Basic(kind)
    }

    pub fn int() -> Self {
        ValueType::Basic(BasicKind::Int)
    }

    pub fn string() -> Self {
        ValueType::Basic(BasicKind::String)
    }

    pub fn pointer(elem: ValueType) -> Self {
        ValueType::Pointer(Box::new(elem))
    }

    /// A named struct type declared in the package being wrapped.
    pub fn named_struct(name: impl Into<String>) -> Self {
        ValueType::Named {
            name: name.into(),
            underlying: struct_underlying(),
        }
    }

    pub fn named(name: impl Into<String>, underlying: ValueType) -> Self {
        ValueType::Named {
            name: name.into(),
            underlying: Box::new(underlying),
        }
    }

    /// Resolve named types to their underlying type (one level is enough: underlying types are never named).
    pub fn underlying(&self) -> &ValueType {
        match self {
            ValueType::Named { underlying, .. } => underlying,
            other => other,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Basic(k) => write!(f, "{}", scalars::as_str(*k)),
            ValueType::Named { name, .. } => write!(f, "{}", name),
            ValueType::Pointer(elem) => write!(f, "*{}", elem),
            ValueType::Struct => write!(f, "struct{{...}}"),
            ValueType::Slice(elem) => write!(f, "[]{}", elem),
            ValueType::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            ValueType::Map { key, value } => write!(f, "map[{}]{}", key, value),
            ValueType::Chan(elem) => write!(f, "chan {}", elem),
            ValueType::Signature => write!(f, "func(...)"),
            ValueType::Interface => write!(f, "interface{{...}}"),
        }
    }
}

/// Serialize basic kinds by their canonical spelling (`"int"`, `"byte"`, `"unsafe.Pointer"`).
mod basic_kind {
    use cpybind_core::lang::scalars::{self, BasicKind};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(kind: &BasicKind, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(scalars::as_str(*kind))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BasicKind, D::Error> {
        let name = String::deserialize(d)?;
        scalars::from_str(&name).ok_or_else(|| D::Error::custom(format!("unknown basic type `{}`", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_struct_derives_id_and_receiver() {
        let pkg = Package::new("geom").with_struct(
            StructType::new("Point").with_method(Func::new("Sum").result(ValueType::int())),
        );
        let s = &pkg.structs[0];
        assert_eq!(s.id, "geom_Point");
        assert_eq!(s.methods[0].id, "geom_Point_Sum");
        let recv = s.methods[0].receiver.as_ref().unwrap();
        assert_eq!(recv.ty, ValueType::pointer(ValueType::named_struct("Point")));
    }

    #[test]
    fn test_explicit_ids_survive_normalize() {
        let mut pkg = Package::new("p")
            .with_struct(StructType::new("T").with_id("custom"))
            .with_func(Func::new("F").with_id("f_id"));
        pkg.normalize();
        assert_eq!(pkg.structs[0].id, "custom");
        assert_eq!(pkg.funcs[0].id, "f_id");
    }

    #[test]
    fn test_field_export_defaults_to_case() {
        assert!(Field::new("X", ValueType::int()).is_exported());
        assert!(!Field::new("x", ValueType::int()).is_exported());
        let mut f = Field::new("x", ValueType::int());
        f.exported = Some(true);
        assert!(f.is_exported());
    }

    #[test]
    fn test_display() {
        let m = ValueType::Map {
            key: Box::new(ValueType::string()),
            value: Box::new(ValueType::Slice(Box::new(ValueType::pointer(ValueType::named_struct("T"))))),
        };
        assert_eq!(m.to_string(), "map[string][]*T");
        assert_eq!(ValueType::basic(BasicKind::Uint8).to_string(), "uint8");
    }

    #[test]
    fn test_underlying() {
        let celsius = ValueType::named("Celsius", ValueType::basic(BasicKind::Float64));
        assert_eq!(celsius.underlying(), &ValueType::basic(BasicKind::Float64));
        assert_eq!(ValueType::int().underlying(), &ValueType::int());
    }
}
