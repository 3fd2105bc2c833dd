use super::*;

/// Binds the pure transaction construction to a chain client.
///
/// A vault is stateless: every call fetches fresh and leaves nothing behind,
/// so concurrent calls against the same key are independent. Two builds
/// spending the same outpoint will both succeed here and race at the node,
/// which rejects the loser. The original client's hard-coded network table
/// becomes injected configuration.
pub struct Vault<'a> {
  client: &'a dyn ChainClient,
  network: Network,
  policy: Policy,
}

#[derive(Debug)]
pub enum Error {
  BroadcastRejected { source: client::Error },
  Build { source: transaction_builder::Error },
  Consolidate { source: consolidator::Error },
  InvalidKey { source: FromWifError },
  KeyNetworkMismatch { key: NetworkKind, network: Network },
  NoPayload { txid: Txid },
  Signing { source: draft::Error },
  UpstreamFetch { source: client::Error },
  UtxoNotFound { outpoint: OutPoint },
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Error::BroadcastRejected { source } => write!(f, "{source}"),
      Error::Build { source } => write!(f, "failed to build data transaction: {source}"),
      Error::Consolidate { source } => write!(f, "failed to consolidate outputs: {source}"),
      Error::InvalidKey { source } => write!(f, "invalid private key: {source}"),
      Error::KeyNetworkMismatch { key, network } => {
        write!(f, "private key network {key:?} does not match {network}")
      }
      Error::NoPayload { txid } => {
        write!(f, "transaction {txid} carries no payload envelopes")
      }
      Error::Signing { source } => write!(f, "failed to finalize transaction: {source}"),
      Error::UpstreamFetch { source } => write!(f, "upstream fetch failed: {source}"),
      Error::UtxoNotFound { outpoint } => write!(f, "output {outpoint} does not exist"),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Error::BroadcastRejected { source } | Error::UpstreamFetch { source } => Some(source),
      Error::Build { source } => Some(source),
      Error::Consolidate { source } => Some(source),
      Error::InvalidKey { source } => Some(source),
      Error::Signing { source } => Some(source),
      Error::KeyNetworkMismatch { .. } | Error::NoPayload { .. } | Error::UtxoNotFound { .. } => {
        None
      }
    }
  }
}

/// Outcome of a consolidation request. A transaction that already has a
/// single output is returned unchanged without touching the network.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consolidation {
  AlreadySingle { txid: Txid },
  Broadcast { txid: Txid },
}

impl<'a> Vault<'a> {
  pub fn new(client: &'a dyn ChainClient, network: Network, policy: Policy) -> Self {
    Self {
      client,
      network,
      policy,
    }
  }

  fn public_key(&self, private_key: &str) -> Result<PublicKey, Error> {
    let private_key =
      PrivateKey::from_wif(private_key).map_err(|source| Error::InvalidKey { source })?;

    if private_key.network != NetworkKind::from(self.network) {
      return Err(Error::KeyNetworkMismatch {
        key: private_key.network,
        network: self.network,
      });
    }

    Ok(private_key.public_key(&Secp256k1::new()))
  }

  /// Builds and placeholder-signs a transaction spending `outpoint` and
  /// embedding `payload` across its outputs. The caller decides whether to
  /// broadcast the result.
  pub fn build_data_transaction(
    &self,
    payload: &[u8],
    private_key: &str,
    outpoint: OutPoint,
  ) -> Result<Signed, Error> {
    let public_key = self.public_key(private_key)?;

    let funding = self
      .client
      .get_transaction(outpoint.txid)
      .map_err(|source| Error::UpstreamFetch { source })?;

    let input_value = usize::try_from(outpoint.vout)
      .ok()
      .and_then(|vout| funding.output.get(vout))
      .ok_or(Error::UtxoNotFound { outpoint })?
      .value;

    let mut draft = TransactionBuilder::new(
      outpoint,
      input_value,
      payload.to_vec(),
      public_key,
      self.policy,
    )
    .build_transaction()
    .map_err(|source| Error::Build { source })?;

    draft
      .sign_input_with_placeholder(0, TransactionBuilder::placeholder_script_sig())
      .map_err(|source| Error::Signing { source })?;

    draft.into_signed().map_err(|source| Error::Signing { source })
  }

  /// Spends every output of `txid` back into a single pay-to-public-key
  /// output and broadcasts the result. Idempotent on transactions that
  /// already have one output.
  pub fn consolidate_outputs(
    &self,
    txid: Txid,
    private_key: &str,
  ) -> Result<Consolidation, Error> {
    let transaction = self
      .client
      .get_transaction(txid)
      .map_err(|source| Error::UpstreamFetch { source })?;

    if transaction.output.len() == 1 {
      return Ok(Consolidation::AlreadySingle { txid });
    }

    let public_key = self.public_key(private_key)?;

    if self.policy.consolidation_valuation == Valuation::FirstOutput {
      log::warn!("Valuing consolidation of {txid} from its first output only");
    }

    let output_values = transaction
      .output
      .iter()
      .map(|output| output.value)
      .collect();

    let mut draft = Consolidator::new(txid, output_values, public_key, self.policy)
      .consolidate()
      .map_err(|source| Error::Consolidate { source })?;

    for index in 0..draft.transaction().input.len() {
      draft
        .sign_input_with_placeholder(index, Consolidator::placeholder_script_sig())
        .map_err(|source| Error::Signing { source })?;
    }

    let signed = draft.into_signed().map_err(|source| Error::Signing { source })?;

    let txid = self
      .client
      .broadcast(signed.transaction())
      .map_err(|source| Error::BroadcastRejected { source })?;

    Ok(Consolidation::Broadcast { txid })
  }

  /// Fetches `txid` and reassembles the payload embedded across its
  /// outputs.
  pub fn retrieve_payload(&self, txid: Txid) -> Result<Vec<u8>, Error> {
    let transaction = self
      .client
      .get_transaction(txid)
      .map_err(|source| Error::UpstreamFetch { source })?;

    envelope::payload_from_transaction(&transaction).ok_or(Error::NoPayload { txid })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn vault<'a>(client: &'a MockClient, policy: Policy) -> Vault<'a> {
    Vault::new(client, Network::Testnet, policy)
  }

  #[test]
  fn build_embeds_payload_and_pays_change_to_primary_output() {
    let funding = funding_transaction(Amount::from_sat(100_000));
    let outpoint = OutPoint {
      txid: funding.compute_txid(),
      vout: 0,
    };

    let client = MockClient::new().with_transaction(funding);

    let signed = vault(&client, Policy::default())
      .build_data_transaction(b"deadbeef", &wif(), outpoint)
      .unwrap();

    let transaction = signed.transaction();

    assert_eq!(transaction.input.len(), 1);
    assert_eq!(transaction.input[0].previous_output, outpoint);
    assert_eq!(
      transaction.input[0].script_sig,
      TransactionBuilder::placeholder_script_sig(),
    );
    assert_eq!(transaction.output.len(), 1);

    assert_eq!(
      envelope::payload_from_transaction(transaction),
      Some(b"deadbeef".to_vec()),
    );

    assert!(client.broadcasts().is_empty());
  }

  #[test]
  fn build_round_trips_through_consensus_encoding() {
    let funding = funding_transaction(Amount::from_sat(100_000));
    let outpoint = OutPoint {
      txid: funding.compute_txid(),
      vout: 0,
    };

    let client = MockClient::new().with_transaction(funding);

    let signed = vault(
      &client,
      Policy {
        max_chunk_size: 2,
        ..Default::default()
      },
    )
    .build_data_transaction(b"deadbeef", &wif(), outpoint)
    .unwrap();

    let decoded = consensus::encode::deserialize::<Transaction>(
      &hex::decode(signed.to_hex()).unwrap(),
    )
    .unwrap();

    pretty_assert_eq!(&decoded, signed.transaction());

    // 8 payload bytes in chunks of 2: 1 primary + 3 extra outputs
    assert_eq!(decoded.output.len(), 4);
    assert_eq!(decoded.input.len(), 1);

    let fee = Policy::default().data_fee(8).unwrap();

    assert_eq!(
      decoded
        .output
        .iter()
        .map(|output| output.value.to_sat())
        .sum::<u64>()
        + fee.to_sat(),
      100_000,
    );
  }

  #[test]
  fn build_rejects_missing_utxo_and_unknown_transaction() {
    let funding = funding_transaction(Amount::from_sat(100_000));
    let funding_txid = funding.compute_txid();

    let client = MockClient::new().with_transaction(funding);

    assert_matches!(
      vault(&client, Policy::default()).build_data_transaction(
        b"x",
        &wif(),
        OutPoint {
          txid: funding_txid,
          vout: 1,
        },
      ),
      Err(Error::UtxoNotFound { .. })
    );

    assert_matches!(
      vault(&client, Policy::default()).build_data_transaction(
        b"x",
        &wif(),
        outpoint(9),
      ),
      Err(Error::UpstreamFetch {
        source: client::Error::TransactionNotFound { .. },
      })
    );
  }

  #[test]
  fn build_rejects_bad_and_mismatched_keys() {
    let funding = funding_transaction(Amount::from_sat(100_000));
    let outpoint = OutPoint {
      txid: funding.compute_txid(),
      vout: 0,
    };

    let client = MockClient::new().with_transaction(funding);

    assert_matches!(
      vault(&client, Policy::default()).build_data_transaction(b"x", "garbage", outpoint),
      Err(Error::InvalidKey { .. })
    );

    let mainnet_wif = PrivateKey::new(
      SecretKey::from_slice(&[0x01; 32]).unwrap(),
      NetworkKind::Main,
    )
    .to_wif();

    assert_matches!(
      vault(&client, Policy::default()).build_data_transaction(b"x", &mainnet_wif, outpoint),
      Err(Error::KeyNetworkMismatch { .. })
    );
  }

  #[test]
  fn build_surfaces_insufficient_funds() {
    let funding = funding_transaction(Amount::from_sat(100));
    let outpoint = OutPoint {
      txid: funding.compute_txid(),
      vout: 0,
    };

    let client = MockClient::new().with_transaction(funding);

    assert_matches!(
      vault(&client, Policy::default()).build_data_transaction(b"deadbeef", &wif(), outpoint),
      Err(Error::Build {
        source: transaction_builder::Error::InsufficientFunds { .. },
      })
    );

    assert!(client.broadcasts().is_empty());
  }

  #[test]
  fn consolidating_a_single_output_transaction_is_a_no_op() {
    let transaction = funding_transaction(Amount::from_sat(100_000));
    let txid = transaction.compute_txid();

    let client = MockClient::new().with_transaction(transaction);

    assert_eq!(
      vault(&client, Policy::default())
        .consolidate_outputs(txid, &wif())
        .unwrap(),
      Consolidation::AlreadySingle { txid },
    );

    assert!(client.broadcasts().is_empty());
  }

  #[test]
  fn consolidation_spends_every_output_and_broadcasts() {
    let funding = funding_transaction(Amount::from_sat(100_000));
    let outpoint = OutPoint {
      txid: funding.compute_txid(),
      vout: 0,
    };

    let client = MockClient::new().with_transaction(funding);

    let policy = Policy {
      max_chunk_size: 2,
      ..Default::default()
    };

    let signed = vault(&client, policy)
      .build_data_transaction(b"deadbeef", &wif(), outpoint)
      .unwrap();

    let data_txid = signed.txid();

    let client = client.with_transaction(signed.into_transaction());

    let consolidation = vault(&client, policy)
      .consolidate_outputs(data_txid, &wif())
      .unwrap();

    let broadcasts = client.broadcasts();

    assert_eq!(broadcasts.len(), 1);

    let consolidated = &broadcasts[0];

    assert_eq!(
      consolidation,
      Consolidation::Broadcast {
        txid: consolidated.compute_txid(),
      },
    );

    assert_eq!(consolidated.input.len(), 4);
    assert_eq!(consolidated.output.len(), 1);

    assert!(consolidated
      .input
      .iter()
      .all(|input| input.script_sig == Consolidator::placeholder_script_sig()));
  }

  #[test]
  fn retrieve_payload_round_trips() {
    let funding = funding_transaction(Amount::from_sat(100_000));
    let outpoint = OutPoint {
      txid: funding.compute_txid(),
      vout: 0,
    };

    let client = MockClient::new().with_transaction(funding);

    let policy = Policy {
      max_chunk_size: 3,
      ..Default::default()
    };

    let signed = vault(&client, policy)
      .build_data_transaction(b"deadbeef", &wif(), outpoint)
      .unwrap();

    let data_txid = signed.txid();

    let client = client.with_transaction(signed.into_transaction());

    assert_eq!(
      vault(&client, policy).retrieve_payload(data_txid).unwrap(),
      b"deadbeef".to_vec(),
    );

    assert_matches!(
      vault(&client, policy).retrieve_payload(outpoint.txid),
      Err(Error::NoPayload { .. })
    );
  }
}
