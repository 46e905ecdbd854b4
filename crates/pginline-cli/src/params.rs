//! Parameter values from the command line.

use pginline::ParamValue;
use serde_json::Value;

/// Parse one `--param` argument.
///
/// `KIND:VALUE` with `KIND` one of `str`, `int`, `uint`, `float`, `bool`;
/// anything else, including a colon with an unknown prefix, is a string.
pub fn parse_param(arg: &str) -> anyhow::Result<ParamValue> {
    let Some((kind, value)) = arg.split_once(':') else {
        return Ok(ParamValue::from(arg));
    };

    let parsed = match kind {
        "str" => ParamValue::from(value),
        "int" => ParamValue::Int(
            value
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid int parameter {value:?}: {e}"))?,
        ),
        "uint" => ParamValue::UInt(
            value
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid uint parameter {value:?}: {e}"))?,
        ),
        "float" => ParamValue::Float(
            value
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid float parameter {value:?}: {e}"))?,
        ),
        "bool" => ParamValue::Bool(
            value
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid bool parameter {value:?}: {e}"))?,
        ),
        _ => ParamValue::from(arg),
    };
    Ok(parsed)
}

pub fn parse_params(args: &[String]) -> anyhow::Result<Vec<ParamValue>> {
    args.iter().map(|arg| parse_param(arg)).collect()
}

/// Parse `--params-json`, which must be a JSON array.
pub fn parse_params_json(raw: &str) -> anyhow::Result<Vec<ParamValue>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("invalid --params-json: {e}"))?;
    let Value::Array(items) = value else {
        anyhow::bail!("--params-json must be a JSON array");
    };
    Ok(items.iter().map(from_json).collect())
}

fn from_json(value: &Value) -> ParamValue {
    match value {
        Value::String(s) => ParamValue::Text(s.clone()),
        Value::Bool(b) => ParamValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ParamValue::Int(i)
            } else if let Some(u) = n.as_u64() {
                ParamValue::UInt(u)
            } else {
                ParamValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::Null => unsupported("null"),
        Value::Array(_) => unsupported("array"),
        Value::Object(_) => unsupported("object"),
    }
}

fn unsupported(type_name: &str) -> ParamValue {
    ParamValue::Unsupported {
        type_name: format!("json {type_name}"),
    }
}
