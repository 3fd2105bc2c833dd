use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Decode {
  #[arg(
    long,
    conflicts_with = "transaction",
    help = "Decode a hex-encoded transaction from the command line."
  )]
  hex: Option<String>,
  #[arg(help = "Load the raw transaction from <TRANSACTION>.")]
  transaction: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub chunks: Vec<String>,
  pub payload: Option<String>,
}

impl Decode {
  pub(crate) fn run(self) -> SubcommandResult {
    let transaction = match (self.hex, self.transaction) {
      (Some(hex), None) => {
        consensus::encode::deserialize::<Transaction>(&hex::decode(hex)?)?
      }
      (None, Some(path)) => consensus::encode::deserialize::<Transaction>(
        &fs::read(&path)
          .with_context(|| format!("failed to read transaction from `{}`", path.display()))?,
      )?,
      _ => bail!("provide a raw transaction file or --hex"),
    };

    let chunks = Envelope::from_transaction(&transaction)
      .iter()
      .map(|envelope| hex::encode(envelope.chunk()))
      .collect();

    let payload = envelope::payload_from_transaction(&transaction).map(hex::encode);

    Ok(Some(Box::new(Output { chunks, payload })))
  }
}
