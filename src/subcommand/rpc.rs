use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Rpc {
  #[arg(help = "Call RPC <METHOD>.")]
  method: String,
  #[arg(allow_hyphen_values = true, help = "Pass <PARAMS> to the call.")]
  params: Vec<RpcParam>,
}

/// A command-line RPC parameter with an explicit type. The original client
/// assembled parameter lists by string concatenation, coercing
/// numeric-looking words and the words `true` and `false` along the way; the
/// same coercion applies here, but into real JSON values.
#[derive(Debug, PartialEq, Clone)]
pub(crate) enum RpcParam {
  Bool(bool),
  Float(f64),
  Integer(i64),
  String(String),
}

impl FromStr for RpcParam {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(if s == "true" {
      Self::Bool(true)
    } else if s == "false" {
      Self::Bool(false)
    } else if let Ok(integer) = s.parse() {
      Self::Integer(integer)
    } else if let Ok(float) = s.parse() {
      Self::Float(float)
    } else {
      Self::String(s.into())
    })
  }
}

impl From<&RpcParam> for serde_json::Value {
  fn from(param: &RpcParam) -> Self {
    match param {
      RpcParam::Bool(value) => Self::Bool(*value),
      RpcParam::Float(value) => Self::from(*value),
      RpcParam::Integer(value) => Self::Number((*value).into()),
      RpcParam::String(value) => Self::String(value.clone()),
    }
  }
}

impl Rpc {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let client = settings.chain_client()?;

    let params = self
      .params
      .iter()
      .map(serde_json::Value::from)
      .collect::<Vec<serde_json::Value>>();

    let result = client.call(&self.method, &params)?;

    Ok(Some(Box::new(result)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn params_coerce_like_the_original_client() {
    for (input, expected) in [
      ("true", RpcParam::Bool(true)),
      ("false", RpcParam::Bool(false)),
      ("12", RpcParam::Integer(12)),
      ("-3", RpcParam::Integer(-3)),
      ("2.5", RpcParam::Float(2.5)),
      ("deadbeef", RpcParam::String("deadbeef".into())),
      ("", RpcParam::String("".into())),
    ] {
      assert_eq!(input.parse::<RpcParam>().unwrap(), expected, "{input}");
    }
  }

  #[test]
  fn params_marshal_to_json_values() {
    assert_eq!(
      serde_json::Value::from(&RpcParam::Bool(true)),
      serde_json::json!(true),
    );
    assert_eq!(
      serde_json::Value::from(&RpcParam::Integer(100)),
      serde_json::json!(100),
    );
    assert_eq!(
      serde_json::Value::from(&RpcParam::String("abc".into())),
      serde_json::json!("abc"),
    );
  }
}
