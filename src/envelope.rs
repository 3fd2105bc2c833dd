use super::*;

/// A payload chunk embedded in a spendable output script:
///
///   <chunk> OP_DROP <public key> OP_CHECKSIG
///
/// The chunk is dropped at spend time, so the output remains a plain
/// pay-to-public-key spend while the data rides along in the locking script.
/// Scanning a transaction's outputs in order and concatenating the chunks
/// reconstructs the embedded payload.
#[derive(Debug, PartialEq, Clone)]
pub struct Envelope {
  chunk: PushBytesBuf,
  public_key: PublicKey,
}

#[derive(Debug, PartialEq)]
pub enum Error {
  ChunkTooLarge { size: usize, limit: usize },
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Error::ChunkTooLarge { size, limit } => {
        write!(f, "payload chunk of {size} bytes exceeds limit of {limit} bytes")
      }
    }
  }
}

impl std::error::Error for Error {}

impl Envelope {
  /// `limit` is clamped to the consensus push ceiling, so no envelope can
  /// hold a chunk a script push cannot carry.
  pub fn new(chunk: Vec<u8>, public_key: PublicKey, limit: usize) -> Result<Self, Error> {
    let limit = limit.min(MAX_SCRIPT_ELEMENT_SIZE);

    let size = chunk.len();

    if size > limit {
      return Err(Error::ChunkTooLarge { size, limit });
    }

    let chunk = PushBytesBuf::try_from(chunk).map_err(|_| Error::ChunkTooLarge { size, limit })?;

    Ok(Self { chunk, public_key })
  }

  pub fn chunk(&self) -> &[u8] {
    self.chunk.as_bytes()
  }

  pub fn public_key(&self) -> PublicKey {
    self.public_key
  }

  pub fn script(&self) -> ScriptBuf {
    script::Builder::new()
      .push_slice(&self.chunk)
      .push_opcode(opcodes::all::OP_DROP)
      .push_key(&self.public_key)
      .push_opcode(opcodes::all::OP_CHECKSIG)
      .into_script()
  }

  /// Recognizes an envelope script. The shape is matched strictly: any
  /// extra, missing, or reordered instruction disqualifies the script.
  pub fn from_script(script: &Script) -> Option<Self> {
    let mut instructions = script.instructions();

    let chunk = match instructions.next()?.ok()? {
      Instruction::PushBytes(push) => push.as_bytes().to_vec(),
      Instruction::Op(_) => return None,
    };

    match instructions.next()?.ok()? {
      Instruction::Op(op) if op == opcodes::all::OP_DROP => {}
      _ => return None,
    }

    let public_key = match instructions.next()?.ok()? {
      Instruction::PushBytes(push) => PublicKey::from_slice(push.as_bytes()).ok()?,
      Instruction::Op(_) => return None,
    };

    match instructions.next()?.ok()? {
      Instruction::Op(op) if op == opcodes::all::OP_CHECKSIG => {}
      _ => return None,
    }

    if instructions.next().is_some() {
      return None;
    }

    let chunk = PushBytesBuf::try_from(chunk).ok()?;

    Some(Self { chunk, public_key })
  }

  /// Envelopes carried by `transaction`, in output order.
  pub fn from_transaction(transaction: &Transaction) -> Vec<Self> {
    transaction
      .output
      .iter()
      .filter_map(|output| Self::from_script(&output.script_pubkey))
      .collect()
  }
}

/// Reassembles the payload embedded by a data transaction by concatenating
/// envelope chunks in output order. Returns `None` when no output carries an
/// envelope.
pub fn payload_from_transaction(transaction: &Transaction) -> Option<Vec<u8>> {
  let envelopes = Envelope::from_transaction(transaction);

  if envelopes.is_empty() {
    None
  } else {
    Some(
      envelopes
        .iter()
        .flat_map(|envelope| envelope.chunk().iter().copied())
        .collect(),
    )
  }
}
