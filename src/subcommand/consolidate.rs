use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Consolidate {
  #[arg(long, env = "STASH_PRIVATE_KEY", help = "Sign with WIF <PRIVATE_KEY>.")]
  private_key: String,
  #[arg(help = "Merge the outputs of <TXID>.")]
  txid: Txid,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub consolidation: Consolidation,
}

impl Consolidate {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let client = settings.chain_client()?;
    let vault = Vault::new(&client, settings.chain().network(), settings.policy()?);

    let consolidation = vault.consolidate_outputs(self.txid, &self.private_key)?;

    Ok(Some(Box::new(Output { consolidation })))
  }
}
