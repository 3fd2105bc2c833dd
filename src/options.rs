use super::*;

#[derive(Clone, Default, Debug, Parser)]
#[command(group(
  ArgGroup::new("chains")
    .required(false)
    .args(&["chain_argument", "signet", "regtest", "testnet"]),
))]
pub struct Options {
  #[arg(
    long,
    help = "Authenticate to Bitcoin Core RPC with <BITCOIN_RPC_PASSWORD>."
  )]
  pub(crate) bitcoin_rpc_password: Option<String>,
  #[arg(long, help = "Connect to Bitcoin Core RPC at <BITCOIN_RPC_URL>.")]
  pub(crate) bitcoin_rpc_url: Option<String>,
  #[arg(
    long,
    help = "Authenticate to Bitcoin Core RPC as <BITCOIN_RPC_USERNAME>."
  )]
  pub(crate) bitcoin_rpc_username: Option<String>,
  #[arg(long = "chain", value_enum, help = "Use <CHAIN>. [default: testnet]")]
  pub(crate) chain_argument: Option<Chain>,
  #[arg(long, help = "Load configuration from <CONFIG>.")]
  pub(crate) config: Option<PathBuf>,
  #[arg(long, help = "Load Bitcoin Core RPC cookie file from <COOKIE_FILE>.")]
  pub(crate) cookie_file: Option<PathBuf>,
  #[arg(
    long,
    help = "Charge <EMPTY_TX_SIZE> bytes of fixed overhead in every fee. [default: 192]"
  )]
  pub(crate) empty_tx_size: Option<u64>,
  #[arg(
    long,
    help = "Fund payload outputs past the first with <EXTRA_OUTPUT_AMOUNT> satoshis. [default: 1000]"
  )]
  pub(crate) extra_output_amount: Option<u64>,
  #[arg(long, help = "Pay <FEE_RATE> satoshis per byte. [default: 2]")]
  pub(crate) fee_rate: Option<FeeRate>,
  #[arg(
    long,
    help = "Charge <INPUT_SPEND_SIZE> bytes per consolidated input. [default: 180]"
  )]
  pub(crate) input_spend_size: Option<u64>,
  #[arg(
    long,
    help = "Value consolidations from the first output only, like the original client."
  )]
  pub(crate) legacy_first_output_valuation: bool,
  #[arg(
    long,
    help = "Split payloads into chunks of at most <MAX_CHUNK_SIZE> bytes. [default: 520]"
  )]
  pub(crate) max_chunk_size: Option<usize>,
  #[arg(long, short, help = "Use regtest. Equivalent to `--chain regtest`.")]
  pub(crate) regtest: bool,
  #[arg(long, short, help = "Use signet. Equivalent to `--chain signet`.")]
  pub(crate) signet: bool,
  #[arg(long, short, help = "Use testnet. Equivalent to `--chain testnet`.")]
  pub(crate) testnet: bool,
}
