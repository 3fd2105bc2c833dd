use super::*;

#[derive(Debug, Parser)]
pub(crate) struct PublicKey {
  #[arg(help = "Derive the public key of WIF <PRIVATE_KEY>.")]
  private_key: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub public_key: String,
}

impl PublicKey {
  pub(crate) fn run(self) -> SubcommandResult {
    let private_key = PrivateKey::from_wif(&self.private_key)?;

    Ok(Some(Box::new(Output {
      public_key: private_key.public_key(&Secp256k1::new()).to_string(),
    })))
  }
}
