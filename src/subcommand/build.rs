use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Build {
  #[arg(
    long,
    help = "Broadcast the signed transaction instead of only printing it."
  )]
  broadcast: bool,
  #[arg(
    long,
    conflicts_with = "payload",
    help = "Embed the contents of <FILE> instead of a hex payload argument."
  )]
  file: Option<PathBuf>,
  #[arg(long, help = "Spend output <OUTPOINT>, formatted as <TXID>:<VOUT>.")]
  input: OutPoint,
  #[arg(long, env = "STASH_PRIVATE_KEY", help = "Sign with WIF <PRIVATE_KEY>.")]
  private_key: String,
  #[arg(help = "Hex-encoded payload to embed.")]
  payload: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub broadcast: Option<Txid>,
  pub change: u64,
  pub fee: u64,
  pub outputs: usize,
  pub transaction: String,
  pub txid: Txid,
}

impl Build {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let payload = match (&self.file, &self.payload) {
      (Some(file), None) => fs::read(file)
        .with_context(|| format!("failed to read payload from `{}`", file.display()))?,
      (None, Some(payload)) => hex::decode(payload).context("invalid hex payload")?,
      _ => bail!("provide a hex payload argument or --file"),
    };

    let policy = settings.policy()?;
    let client = settings.chain_client()?;
    let vault = Vault::new(&client, settings.chain().network(), policy);

    let signed = vault.build_data_transaction(&payload, &self.private_key, self.input)?;

    let broadcast = if self.broadcast {
      Some(client.broadcast(signed.transaction())?)
    } else {
      None
    };

    let fee = policy
      .data_fee(payload.len())
      .ok_or_else(|| anyhow!("fee overflows"))?;

    Ok(Some(Box::new(Output {
      broadcast,
      change: signed.transaction().output[0].value.to_sat(),
      fee: fee.to_sat(),
      outputs: signed.transaction().output.len(),
      transaction: signed.to_hex(),
      txid: signed.txid(),
    })))
  }
}
