//! JSON voucher templates.
//!
//! A template names a destination, a function and its parameters, and
//! describes the parameter types either with a full contract ABI or with a
//! human-readable signature such as `mint(address,uint256)`.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    convert::parse_address,
    errors::{CodecError, CodecResult},
    selector::selector_for,
    voucher::{encode_voucher, Voucher},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherTemplate {
    address: Option<String>,
    function_name: Option<String>,
    parameters: Option<Vec<Value>>,
    #[serde(default)]
    abi: Option<Vec<AbiItem>>,
    #[serde(default)]
    signature: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct AbiItem {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<AbiParam>,
}

#[derive(Debug, Clone, Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    ty: String,
}

impl VoucherTemplate {
    pub fn from_json(text: &str) -> CodecResult<Self> {
        serde_json::from_str(text).map_err(|e| CodecError::InvalidTemplate(e.to_string()))
    }

    /// Canonical signature of the templated call, e.g. `transfer(address,uint256)`.
    /// Type aliases are normalized, so `f(uint)` yields `f(uint256)`.
    pub fn signature(&self) -> CodecResult<String> {
        let name = require(&self.function_name, "functionName")?;
        Ok(canonical_signature(name, &self.param_types()?))
    }

    /// Resolves the template into an encoded voucher.
    pub fn resolve(&self) -> CodecResult<Voucher> {
        let destination = parse_address(require(&self.address, "address")?)?;
        let params = self
            .parameters
            .as_ref()
            .ok_or_else(|| missing("parameters"))?;

        let types = self.param_types()?;
        let signature = canonical_signature(require(&self.function_name, "functionName")?, &types);

        if types.len() != params.len() {
            return Err(CodecError::EncodingMismatch(format!(
                "{signature} takes {} arguments, got {}",
                types.len(),
                params.len()
            )));
        }
        let values = types
            .iter()
            .zip(params)
            .map(|(ty, value)| coerce_param(ty, value))
            .collect::<CodecResult<Vec<_>>>()?;

        encode_voucher(selector_for(&signature), &types, values, destination)
    }

    fn param_types(&self) -> CodecResult<Vec<DynSolType>> {
        let name = require(&self.function_name, "functionName")?;
        let raw = match (&self.abi, &self.signature) {
            (Some(abi), _) => {
                let arity = self.parameters.as_ref().map(Vec::len);
                abi_param_types(abi, name, arity)?
            }
            (None, Some(signature)) => signature_param_types(signature, name)?,
            (None, None) => {
                return Err(CodecError::InvalidTemplate(
                    "either 'abi' or 'signature' must be provided".to_owned(),
                ))
            }
        };
        raw.iter()
            .map(|ty| {
                DynSolType::parse(ty)
                    .map_err(|e| CodecError::InvalidTemplate(format!("type '{ty}': {e}")))
            })
            .collect()
    }
}

fn canonical_signature(name: &str, types: &[DynSolType]) -> String {
    let names = types.iter().map(DynSolType::sol_type_name).collect::<Vec<_>>();
    format!("{name}({})", names.join(","))
}

fn missing(key: &str) -> CodecError {
    CodecError::InvalidTemplate(format!("missing '{key}'"))
}

fn require<'a>(field: &'a Option<String>, key: &str) -> CodecResult<&'a str> {
    match field.as_deref() {
        Some(value) if !value.trim().is_empty() => Ok(value.trim()),
        _ => Err(missing(key)),
    }
}

fn abi_param_types(abi: &[AbiItem], name: &str, arity: Option<usize>) -> CodecResult<Vec<String>> {
    let mut matches = abi.iter().filter(|item| {
        item.kind.as_deref().unwrap_or("function") == "function"
            && item.name.as_deref() == Some(name)
            && arity.is_none_or(|n| n == item.inputs.len())
    });
    let item = matches.next().ok_or_else(|| {
        CodecError::InvalidTemplate(format!("function '{name}' not found in abi"))
    })?;
    if matches.next().is_some() {
        return Err(CodecError::InvalidTemplate(format!(
            "function '{name}' is ambiguous in abi"
        )));
    }
    Ok(item.inputs.iter().map(|p| p.ty.trim().to_owned()).collect())
}

fn signature_param_types(signature: &str, name: &str) -> CodecResult<Vec<String>> {
    let bad = || CodecError::InvalidTemplate(format!("malformed signature '{signature}'"));
    let signature = signature.trim();
    let open = signature.find('(').ok_or_else(bad)?;
    let inner = signature
        .strip_suffix(')')
        .map(|s| &s[open + 1..])
        .ok_or_else(bad)?;

    let sig_name = signature[..open].trim();
    if sig_name != name {
        return Err(CodecError::InvalidTemplate(format!(
            "signature names '{sig_name}', template names '{name}'"
        )));
    }
    split_top_level(inner).ok_or_else(bad)
}

/// Splits a parameter list on commas outside parentheses.
fn split_top_level(list: &str) -> Option<Vec<String>> {
    if list.trim().is_empty() {
        return Some(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in list.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(list[start..idx].trim().to_owned());
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(list[start..].trim().to_owned());
    if parts.iter().any(String::is_empty) {
        return None;
    }
    Some(parts)
}

fn coerce_param(ty: &DynSolType, value: &Value) -> CodecResult<DynSolValue> {
    match (ty, value) {
        (DynSolType::Array(inner), Value::Array(items)) => Ok(DynSolValue::Array(
            items
                .iter()
                .map(|v| coerce_param(inner, v))
                .collect::<CodecResult<_>>()?,
        )),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) => {
            if items.len() != *len {
                return Err(CodecError::EncodingMismatch(format!(
                    "expected {len} elements for {}, got {}",
                    ty.sol_type_name(),
                    items.len()
                )));
            }
            Ok(DynSolValue::FixedArray(
                items
                    .iter()
                    .map(|v| coerce_param(inner, v))
                    .collect::<CodecResult<_>>()?,
            ))
        }
        (DynSolType::Tuple(types), Value::Array(items)) => {
            if items.len() != types.len() {
                return Err(CodecError::EncodingMismatch(format!(
                    "expected {} tuple fields, got {}",
                    types.len(),
                    items.len()
                )));
            }
            Ok(DynSolValue::Tuple(
                types
                    .iter()
                    .zip(items)
                    .map(|(t, v)| coerce_param(t, v))
                    .collect::<CodecResult<_>>()?,
            ))
        }
        (_, Value::String(s)) => coerce_text(ty, s),
        (_, Value::Number(n)) => coerce_text(ty, &n.to_string()),
        (_, Value::Bool(b)) => coerce_text(ty, &b.to_string()),
        _ => Err(CodecError::EncodingMismatch(format!(
            "cannot use {value} as {}",
            ty.sol_type_name()
        ))),
    }
}

fn coerce_text(ty: &DynSolType, text: &str) -> CodecResult<DynSolValue> {
    ty.coerce_str(text).map_err(|e| {
        CodecError::EncodingMismatch(format!("'{text}' as {}: {e}", ty.sol_type_name()))
    })
}
