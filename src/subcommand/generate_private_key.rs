use super::*;

#[derive(Debug, Parser)]
pub(crate) struct GeneratePrivateKey {
  #[arg(
    long,
    help = "Derive the key from the SHA-256 digest of <PHRASE> instead of system randomness."
  )]
  phrase: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub private_key: String,
  pub public_key: String,
}

impl GeneratePrivateKey {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let secret_key = match self.phrase {
      Some(phrase) => SecretKey::from_slice(sha256::Hash::hash(phrase.as_bytes()).as_byte_array())
        .context("phrase hashes to an invalid secret key")?,
      None => SecretKey::new(&mut rand::thread_rng()),
    };

    let private_key = PrivateKey::new(secret_key, settings.chain().network());

    Ok(Some(Box::new(Output {
      private_key: private_key.to_wif(),
      public_key: private_key.public_key(&Secp256k1::new()).to_string(),
    })))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn phrase_keys_are_deterministic() {
    let secret_key = SecretKey::from_slice(
      sha256::Hash::hash("Here is any text".as_bytes()).as_byte_array(),
    )
    .unwrap();

    let private_key = PrivateKey::new(secret_key, NetworkKind::Test);

    assert_eq!(
      PrivateKey::from_wif(&private_key.to_wif()).unwrap(),
      private_key,
    );
  }
}
