//! Serde model of `sui_getNormalizedMoveModulesByPackage` results.
//!
//! Only the parts the explorer displays are modelled; type descriptors stay
//! raw JSON and are interpreted by [`crate::normalization`]. Field names follow
//! the fullnode's camelCase spelling, and the snake_case spelling is accepted
//! as an alias.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Normalized modules of one package, keyed by module name.
pub type PackageAbi = BTreeMap<String, ModuleAbi>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAbi {
    #[serde(default, alias = "exposed_functions")]
    pub exposed_functions: BTreeMap<String, FunctionAbi>,
    #[serde(default)]
    pub structs: BTreeMap<String, StructAbi>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionAbi {
    #[serde(default)]
    pub visibility: String,
    #[serde(default, alias = "is_entry")]
    pub is_entry: bool,
    /// Ability constraints per type parameter.
    #[serde(default, alias = "type_parameters")]
    pub type_parameters: Vec<Value>,
    #[serde(default)]
    pub parameters: Vec<Value>,
    #[serde(default, rename = "return")]
    pub returns: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructAbi {
    #[serde(default)]
    pub abilities: Value,
    #[serde(default, alias = "type_parameters")]
    pub type_parameters: Vec<StructTypeParameterAbi>,
    #[serde(default)]
    pub fields: Vec<FieldAbi>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructTypeParameterAbi {
    #[serde(default)]
    pub constraints: Value,
    #[serde(default, alias = "is_phantom")]
    pub is_phantom: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAbi {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: Value,
}

/// Decode an RPC result into a [`PackageAbi`].
pub fn parse_package_abi(value: Value) -> Result<PackageAbi> {
    serde_json::from_value(value).context("decode normalized modules")
}
