use anyhow::{anyhow, Result};
use serde_json::Value;
use sui_explorer_types::normalize_address_checked;

use crate::abi::{FunctionAbi, ModuleAbi, StructAbi};
use crate::types::{
    FunctionSignature, MoveType, NormalizedAbi, NormalizedPackage, Primitive, StructLayout,
    StructTypeParam, Visibility,
};

pub fn rpc_visibility(v: &str) -> Visibility {
    match v {
        "Public" | "public" => Visibility::Public,
        "Friend" | "friend" => Visibility::Friend,
        "Private" | "private" => Visibility::Private,
        other => Visibility::Other(other.to_ascii_lowercase()),
    }
}

/// Ability names from `["Copy", "Drop"]` or `{"abilities": [...]}`, lower-cased and sorted.
pub fn abilities_from_value(value: &Value) -> Vec<String> {
    if let Some(arr) = value.as_array() {
        let mut out: Vec<String> = arr
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.to_ascii_lowercase())
            .collect();
        out.sort();
        out.dedup();
        return out;
    }
    if let Some(obj) = value.as_object() {
        if let Some(v) = obj.get("abilities") {
            return abilities_from_value(v);
        }
        if let Some(v) = obj.get("constraints") {
            return abilities_from_value(v);
        }
    }
    Vec::new()
}

impl MoveType {
    /// Parse an RPC normalized type descriptor.
    ///
    /// Primitives come as bare strings (`"U64"`), everything else as a
    /// single-key object (`{"Vector": ...}`, `{"Struct": {...}}`).
    pub fn from_rpc(v: &Value) -> Result<MoveType> {
        if let Some(s) = v.as_str() {
            let primitive = Primitive::from_rpc_tag(s)
                .ok_or_else(|| anyhow!("unknown RPC primitive type string: {}", s))?;
            return Ok(MoveType::Primitive { primitive });
        }

        let obj = v
            .as_object()
            .ok_or_else(|| anyhow!("RPC type is not an object: {}", v))?;
        let mut entries = obj.iter();
        let (k, inner) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => return Err(anyhow!("RPC type expected single-key object: {}", v)),
        };

        if let Some(primitive) = Primitive::from_rpc_tag(k) {
            return Ok(MoveType::Primitive { primitive });
        }

        let out = match k.as_str() {
            "Vector" => MoveType::Vector {
                element: Box::new(MoveType::from_rpc(inner)?),
            },
            "Reference" => MoveType::Reference {
                mutable: false,
                to: Box::new(MoveType::from_rpc(inner)?),
            },
            "MutableReference" => MoveType::Reference {
                mutable: true,
                to: Box::new(MoveType::from_rpc(inner)?),
            },
            "TypeParameter" => {
                let index = inner
                    .as_u64()
                    .and_then(|i| u16::try_from(i).ok())
                    .ok_or_else(|| anyhow!("TypeParameter index is not u16: {}", inner))?;
                MoveType::Generic { index }
            }
            "Struct" => {
                let s = inner
                    .as_object()
                    .ok_or_else(|| anyhow!("Struct payload is not object: {}", inner))?;
                let addr = s
                    .get("address")
                    .and_then(Value::as_str)
                    .ok_or_else(|| anyhow!("Struct missing address: {}", inner))?;
                let module = s
                    .get("module")
                    .and_then(Value::as_str)
                    .ok_or_else(|| anyhow!("Struct missing module: {}", inner))?;
                let name = s
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| anyhow!("Struct missing name: {}", inner))?;
                let type_args = match s.get("typeArguments") {
                    Some(Value::Array(args)) => args
                        .iter()
                        .map(MoveType::from_rpc)
                        .collect::<Result<Vec<_>>>()?,
                    None | Some(Value::Null) => Vec::new(),
                    Some(other) => {
                        return Err(anyhow!("Struct typeArguments is not an array: {}", other))
                    }
                };
                MoveType::Struct {
                    address: normalize_address_checked(addr)
                        .ok_or_else(|| anyhow!("invalid struct address: {}", addr))?,
                    module: module.to_string(),
                    name: name.to_string(),
                    type_args,
                }
            }
            _ => return Err(anyhow!("unknown RPC type tag: {}", k)),
        };
        Ok(out)
    }

    /// Like [`MoveType::from_rpc`], but never fails.
    pub fn from_rpc_lossy(v: &Value) -> MoveType {
        MoveType::from_rpc(v).unwrap_or_else(|_| MoveType::Unknown { raw: v.to_string() })
    }
}

fn function_signature(module: &str, name: &str, f: &FunctionAbi) -> FunctionSignature {
    FunctionSignature {
        module: module.to_string(),
        name: name.to_string(),
        visibility: rpc_visibility(&f.visibility),
        is_entry: f.is_entry,
        type_param_constraints: f.type_parameters.iter().map(abilities_from_value).collect(),
        params: f.parameters.iter().map(MoveType::from_rpc_lossy).collect(),
        returns: f.returns.iter().map(MoveType::from_rpc_lossy).collect(),
    }
}

fn struct_layout(module: &str, name: &str, s: &StructAbi) -> StructLayout {
    StructLayout {
        module: module.to_string(),
        name: name.to_string(),
        abilities: abilities_from_value(&s.abilities),
        type_params: s
            .type_parameters
            .iter()
            .map(|tp| StructTypeParam {
                is_phantom: tp.is_phantom,
                constraints: abilities_from_value(&tp.constraints),
            })
            .collect(),
        fields: s
            .fields
            .iter()
            .map(|f| (f.name.clone(), MoveType::from_rpc_lossy(&f.r#type)))
            .collect(),
    }
}

/// Flatten modules into function and struct lists sorted by `(module, name)`.
///
/// Accepts any map iteration order; the output order depends only on the
/// names. Unparseable type descriptors become [`MoveType::Unknown`].
pub fn normalize_structural<'a, I>(modules: I) -> NormalizedPackage
where
    I: IntoIterator<Item = (&'a String, &'a ModuleAbi)>,
{
    let mut out = NormalizedPackage::default();
    for (module_name, module) in modules {
        for (fn_name, f) in &module.exposed_functions {
            out.functions
                .push(function_signature(module_name, fn_name, f));
        }
        for (struct_name, s) in &module.structs {
            out.structs.push(struct_layout(module_name, struct_name, s));
        }
    }

    out.functions
        .sort_by(|a, b| (a.module.as_str(), a.name.as_str()).cmp(&(b.module.as_str(), b.name.as_str())));
    out.structs
        .sort_by(|a, b| (a.module.as_str(), a.name.as_str()).cmp(&(b.module.as_str(), b.name.as_str())));
    out
}

/// Display-ready descriptors for a package ABI.
pub fn normalize<'a, I>(modules: I) -> NormalizedAbi
where
    I: IntoIterator<Item = (&'a String, &'a ModuleAbi)>,
{
    normalize_structural(modules).render()
}
