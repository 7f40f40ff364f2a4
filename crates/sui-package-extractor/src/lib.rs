//! Sui Package Extractor
//!
//! Turns the normalized module metadata a fullnode returns for a package
//! (`sui_getNormalizedMoveModulesByPackage`) into a stable, display-ready
//! model of the package interface.
//!
//! # Features
//!
//! - **ABI model**: serde types for normalized modules, functions and structs
//! - **Structural types**: [`MoveType`] keeps generic instantiations, vectors
//!   and references as a tree; it is rendered to text only at the edge
//! - **Deterministic output**: functions and structs come out sorted by
//!   `(module, name)` whatever the iteration order of the input map
//!
//! # Example
//!
//! ```ignore
//! use sui_package_extractor::{abi::parse_package_abi, AbiView};
//!
//! let abi = parse_package_abi(rpc_result)?;
//! let view = AbiView::new("0x2", &abi);
//! for f in &view.functions {
//!     println!("{}::{}({})", f.module, f.name, f.params.join(", "));
//! }
//! ```

pub mod abi;
pub mod normalization;
pub mod types;

// Re-export main types
pub use abi::{parse_package_abi, FunctionAbi, ModuleAbi, PackageAbi, StructAbi};
pub use normalization::{normalize, normalize_structural};
pub use types::{
    AbiView, FunctionDescriptor, FunctionSignature, MoveType, NormalizedAbi, NormalizedPackage,
    PackageSummary, Primitive, StructDescriptor, StructLayout, StructTypeParam, Visibility,
};
