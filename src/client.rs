use {
  super::*,
  bitcoincore_rpc::{jsonrpc, Auth, Client, RpcApi},
};

/// The two capabilities the core depends on: learning about existing
/// transactions and submitting new ones. Everything else the node offers is
/// reached through `CoreClient::call`, not this trait.
pub trait ChainClient {
  fn get_transaction(&self, txid: Txid) -> Result<Transaction, Error>;
  fn broadcast(&self, transaction: &Transaction) -> Result<Txid, Error>;
}

#[derive(Debug)]
pub enum Error {
  BroadcastRejected { message: String },
  Rpc { source: bitcoincore_rpc::Error },
  TransactionNotFound { txid: Txid },
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Error::BroadcastRejected { message } => {
        write!(f, "node rejected transaction broadcast: {message}")
      }
      Error::Rpc { source } => write!(f, "Bitcoin Core RPC call failed: {source}"),
      Error::TransactionNotFound { txid } => write!(f, "transaction {txid} not found"),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Error::Rpc { source } => Some(source),
      Error::BroadcastRejected { .. } | Error::TransactionNotFound { .. } => None,
    }
  }
}

fn rpc_error_code(err: &bitcoincore_rpc::Error) -> Option<i32> {
  match err {
    bitcoincore_rpc::Error::JsonRpc(jsonrpc::Error::Rpc(err)) => Some(err.code),
    _ => None,
  }
}

/// `ChainClient` over Bitcoin Core's JSON-RPC interface.
pub struct CoreClient {
  client: Client,
}

impl CoreClient {
  pub fn new(url: &str, auth: Auth) -> Result<Self, Error> {
    Ok(Self {
      client: Client::new(url, auth).map_err(|source| Error::Rpc { source })?,
    })
  }

  /// Network the connected node is on, from `getblockchaininfo`.
  pub fn network(&self) -> Result<Network, Error> {
    Ok(
      self
        .client
        .get_blockchain_info()
        .map_err(|source| Error::Rpc { source })?
        .chain,
    )
  }

  /// Passthrough for arbitrary RPC methods. Parameters are real JSON
  /// values, never concatenated strings.
  pub fn call(&self, method: &str, params: &[serde_json::Value]) -> Result<serde_json::Value, Error> {
    self
      .client
      .call(method, params)
      .map_err(|source| Error::Rpc { source })
  }
}

impl ChainClient for CoreClient {
  fn get_transaction(&self, txid: Txid) -> Result<Transaction, Error> {
    match self.client.get_raw_transaction(&txid, None) {
      Ok(transaction) => Ok(transaction),
      Err(err) if rpc_error_code(&err) == Some(-5) => Err(Error::TransactionNotFound { txid }),
      Err(source) => Err(Error::Rpc { source }),
    }
  }

  fn broadcast(&self, transaction: &Transaction) -> Result<Txid, Error> {
    log::info!("Broadcasting transaction {}", transaction.compute_txid());

    self
      .client
      .send_raw_transaction(transaction)
      .map_err(|err| Error::BroadcastRejected {
        message: err.to_string(),
      })
  }
}
