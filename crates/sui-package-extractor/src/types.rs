use serde::{Serialize, Serializer};
use std::fmt;
use sui_explorer_types::normalize_address_short;

use crate::abi::PackageAbi;
use crate::normalization::normalize;

/// Move primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
}

impl Primitive {
    pub fn from_rpc_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "Bool" => Self::Bool,
            "U8" => Self::U8,
            "U16" => Self::U16,
            "U32" => Self::U32,
            "U64" => Self::U64,
            "U128" => Self::U128,
            "U256" => Self::U256,
            "Address" => Self::Address,
            "Signer" => Self::Signer,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::U256 => "u256",
            Self::Address => "address",
            Self::Signer => "signer",
        }
    }
}

/// Structural Move type, as found in parameter, return and field positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveType {
    Primitive {
        primitive: Primitive,
    },
    Vector {
        element: Box<MoveType>,
    },
    Reference {
        mutable: bool,
        to: Box<MoveType>,
    },
    /// Type parameter of the enclosing function or struct.
    Generic {
        index: u16,
    },
    Struct {
        /// Full-length canonical address.
        address: String,
        module: String,
        name: String,
        type_args: Vec<MoveType>,
    },
    /// Descriptor this crate does not understand, kept as its JSON text.
    Unknown {
        raw: String,
    },
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveType::Primitive { primitive } => f.write_str(primitive.as_str()),
            MoveType::Vector { element } => write!(f, "vector<{}>", element),
            MoveType::Reference { mutable: false, to } => write!(f, "&{}", to),
            MoveType::Reference { mutable: true, to } => write!(f, "&mut {}", to),
            MoveType::Generic { index } => write!(f, "T{}", index),
            MoveType::Struct {
                address,
                module,
                name,
                type_args,
            } => {
                write!(f, "{}::{}::{}", normalize_address_short(address), module, name)?;
                if !type_args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in type_args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            MoveType::Unknown { raw } => f.write_str(raw),
        }
    }
}

/// Function visibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Friend,
    Private,
    /// Anything else the node reports, lower-cased.
    Other(String),
}

impl Visibility {
    pub fn as_str(&self) -> &str {
        match self {
            Visibility::Public => "public",
            Visibility::Friend => "friend",
            Visibility::Private => "private",
            Visibility::Other(s) => s,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Structural form of one exposed function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    pub module: String,
    pub name: String,
    pub visibility: Visibility,
    pub is_entry: bool,
    /// Ability constraints of each type parameter, in declaration order.
    pub type_param_constraints: Vec<Vec<String>>,
    pub params: Vec<MoveType>,
    pub returns: Vec<MoveType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructTypeParam {
    pub is_phantom: bool,
    pub constraints: Vec<String>,
}

/// Structural form of one struct definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructLayout {
    pub module: String,
    pub name: String,
    pub abilities: Vec<String>,
    pub type_params: Vec<StructTypeParam>,
    pub fields: Vec<(String, MoveType)>,
}

/// Display-ready function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDescriptor {
    pub module: String,
    pub name: String,
    pub visibility: Visibility,
    pub is_entry: bool,
    /// `T0`, or `T0: copy + drop` when constrained.
    pub type_params: Vec<String>,
    pub params: Vec<String>,
    pub returns: Vec<String>,
}

impl FunctionDescriptor {
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }

    /// One-line signature, e.g. `public entry fun pool::swap<T0>(&mut 0x2::tx_context::TxContext)`.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        out.push_str(self.visibility.as_str());
        if self.is_entry {
            out.push_str(" entry");
        }
        out.push_str(" fun ");
        out.push_str(&self.qualified_name());
        if !self.type_params.is_empty() {
            out.push('<');
            out.push_str(&self.type_params.join(", "));
            out.push('>');
        }
        out.push('(');
        out.push_str(&self.params.join(", "));
        out.push(')');
        match self.returns.len() {
            0 => {}
            1 => {
                out.push_str(": ");
                out.push_str(&self.returns[0]);
            }
            _ => {
                out.push_str(": (");
                out.push_str(&self.returns.join(", "));
                out.push(')');
            }
        }
        out
    }
}

impl From<&FunctionSignature> for FunctionDescriptor {
    fn from(sig: &FunctionSignature) -> Self {
        Self {
            module: sig.module.clone(),
            name: sig.name.clone(),
            visibility: sig.visibility.clone(),
            is_entry: sig.is_entry,
            type_params: sig
                .type_param_constraints
                .iter()
                .enumerate()
                .map(|(i, c)| type_param_label(i, c))
                .collect(),
            params: sig.params.iter().map(ToString::to_string).collect(),
            returns: sig.returns.iter().map(ToString::to_string).collect(),
        }
    }
}

fn type_param_label(index: usize, constraints: &[String]) -> String {
    if constraints.is_empty() {
        format!("T{}", index)
    } else {
        format!("T{}: {}", index, constraints.join(" + "))
    }
}

/// Display-ready struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructDescriptor {
    pub module: String,
    pub name: String,
    pub abilities: Vec<String>,
    /// `"phantom"` for phantom parameters, `T<index>` otherwise.
    pub type_params: Vec<String>,
    /// `"name: type"` per field, in declaration order.
    pub fields: Vec<String>,
}

impl From<&StructLayout> for StructDescriptor {
    fn from(layout: &StructLayout) -> Self {
        Self {
            module: layout.module.clone(),
            name: layout.name.clone(),
            abilities: layout.abilities.clone(),
            type_params: layout
                .type_params
                .iter()
                .enumerate()
                .map(|(i, tp)| {
                    if tp.is_phantom {
                        "phantom".to_string()
                    } else {
                        format!("T{}", i)
                    }
                })
                .collect(),
            fields: layout
                .fields
                .iter()
                .map(|(name, ty)| format!("{}: {}", name, ty))
                .collect(),
        }
    }
}

/// Structural normalizer output, sorted by `(module, name)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedPackage {
    pub functions: Vec<FunctionSignature>,
    pub structs: Vec<StructLayout>,
}

impl NormalizedPackage {
    /// Render every type to text, keeping the order.
    pub fn render(&self) -> NormalizedAbi {
        NormalizedAbi {
            functions: self.functions.iter().map(FunctionDescriptor::from).collect(),
            structs: self.structs.iter().map(StructDescriptor::from).collect(),
        }
    }
}

/// Display-ready normalizer output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedAbi {
    pub functions: Vec<FunctionDescriptor>,
    pub structs: Vec<StructDescriptor>,
}

#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackageSummary {
    pub module_count: usize,
    pub function_count: usize,
    pub struct_count: usize,
    pub entry_function_count: usize,
}

/// Everything the explorer shows about one package's interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiView {
    pub package_id: String,
    /// Sorted module names.
    pub module_names: Vec<String>,
    pub functions: Vec<FunctionDescriptor>,
    pub structs: Vec<StructDescriptor>,
    pub summary: PackageSummary,
}

impl AbiView {
    pub fn new(package_id: &str, abi: &PackageAbi) -> Self {
        let NormalizedAbi { functions, structs } = normalize(abi);
        let module_names: Vec<String> = abi.keys().cloned().collect();
        let summary = PackageSummary {
            module_count: module_names.len(),
            function_count: functions.len(),
            struct_count: structs.len(),
            entry_function_count: functions.iter().filter(|f| f.is_entry).count(),
        };
        Self {
            package_id: package_id.to_string(),
            module_names,
            functions,
            structs,
            summary,
        }
    }

    /// Same naming rule as catalog entries.
    pub fn display_name(&self) -> String {
        match self.module_names.first() {
            Some(first) => format!("{} (module)", first),
            None => format!("Package {}", sui_explorer_types::short_id(&self.package_id)),
        }
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin_of_sui() -> MoveType {
        MoveType::Struct {
            address: "0x0000000000000000000000000000000000000000000000000000000000000002"
                .to_string(),
            module: "coin".to_string(),
            name: "Coin".to_string(),
            type_args: vec![MoveType::Struct {
                address: "0x0000000000000000000000000000000000000000000000000000000000000002"
                    .to_string(),
                module: "sui".to_string(),
                name: "SUI".to_string(),
                type_args: vec![],
            }],
        }
    }

    #[test]
    fn test_render_nested_generic_struct() {
        assert_eq!(coin_of_sui().to_string(), "0x2::coin::Coin<0x2::sui::SUI>");
    }

    #[test]
    fn test_render_references_and_vectors() {
        let t = MoveType::Reference {
            mutable: true,
            to: Box::new(MoveType::Vector {
                element: Box::new(MoveType::Generic { index: 1 }),
            }),
        };
        assert_eq!(t.to_string(), "&mut vector<T1>");
        let r = MoveType::Reference {
            mutable: false,
            to: Box::new(MoveType::Primitive {
                primitive: Primitive::U64,
            }),
        };
        assert_eq!(r.to_string(), "&u64");
    }

    #[test]
    fn test_move_type_serializes_tagged() {
        let v = serde_json::to_value(MoveType::Generic { index: 0 }).unwrap();
        assert_eq!(v, serde_json::json!({"kind": "generic", "index": 0}));
        let p = serde_json::to_value(MoveType::Primitive {
            primitive: Primitive::Address,
        })
        .unwrap();
        assert_eq!(p, serde_json::json!({"kind": "primitive", "primitive": "address"}));
    }

    #[test]
    fn test_function_signature_line() {
        let f = FunctionDescriptor {
            module: "pool".to_string(),
            name: "swap".to_string(),
            visibility: Visibility::Public,
            is_entry: true,
            type_params: vec!["T0".to_string()],
            params: vec!["&mut 0x2::tx_context::TxContext".to_string()],
            returns: vec![],
        };
        assert_eq!(
            f.signature(),
            "public entry fun pool::swap<T0>(&mut 0x2::tx_context::TxContext)"
        );
    }

    #[test]
    fn test_struct_descriptor_markers() {
        let layout = StructLayout {
            module: "m".to_string(),
            name: "Pool".to_string(),
            abilities: vec!["key".to_string()],
            type_params: vec![
                StructTypeParam {
                    is_phantom: true,
                    constraints: vec![],
                },
                StructTypeParam {
                    is_phantom: false,
                    constraints: vec!["store".to_string()],
                },
            ],
            fields: vec![("balance".to_string(), coin_of_sui())],
        };
        let d = StructDescriptor::from(&layout);
        assert_eq!(d.type_params, vec!["phantom", "T1"]);
        assert_eq!(d.fields, vec!["balance: 0x2::coin::Coin<0x2::sui::SUI>"]);
    }
}
