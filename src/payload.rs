use super::*;

/// Splits `payload` into chunks of at most `max_chunk_size` bytes. An empty
/// payload yields a single empty chunk, so a data transaction always carries
/// at least one payload-bearing output.
///
/// `max_chunk_size` must be nonzero; `Settings` rejects zero before a policy
/// reaches this function.
pub fn chunk(payload: &[u8], max_chunk_size: usize) -> Vec<&[u8]> {
  if payload.is_empty() {
    vec![payload]
  } else {
    payload.chunks(max_chunk_size).collect()
  }
}
