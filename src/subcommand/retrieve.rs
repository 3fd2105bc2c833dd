use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Retrieve {
  #[arg(
    long,
    help = "Write the payload bytes to <OUTPUT> instead of printing hex."
  )]
  output: Option<PathBuf>,
  #[arg(help = "Reassemble the payload embedded in <TXID>.")]
  txid: Txid,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub payload: Option<String>,
  pub size: usize,
  pub written: Option<PathBuf>,
}

impl Retrieve {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let client = settings.chain_client()?;
    let vault = Vault::new(&client, settings.chain().network(), settings.policy()?);

    let payload = vault.retrieve_payload(self.txid)?;

    let size = payload.len();

    Ok(Some(Box::new(match self.output {
      Some(path) => {
        fs::write(&path, &payload)
          .with_context(|| format!("failed to write payload to `{}`", path.display()))?;

        Output {
          payload: None,
          size,
          written: Some(path),
        }
      }
      None => Output {
        payload: Some(hex::encode(&payload)),
        size,
        written: None,
      },
    })))
  }
}
