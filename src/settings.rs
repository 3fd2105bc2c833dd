use {super::*, bitcoincore_rpc::Auth};

#[derive(Default, Debug, Clone)]
pub struct Settings {
  chain: Chain,
  config: Config,
  options: Options,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
  pub(crate) bitcoin_rpc_password: Option<String>,
  pub(crate) bitcoin_rpc_url: Option<String>,
  pub(crate) bitcoin_rpc_username: Option<String>,
  pub(crate) chain: Option<Chain>,
  pub(crate) cookie_file: Option<PathBuf>,
  pub(crate) empty_tx_size: Option<u64>,
  pub(crate) extra_output_amount: Option<u64>,
  pub(crate) fee_rate: Option<FeeRate>,
  pub(crate) input_spend_size: Option<u64>,
  pub(crate) legacy_first_output_valuation: Option<bool>,
  pub(crate) max_chunk_size: Option<usize>,
}

impl Settings {
  pub fn new(options: Options) -> Result<Self> {
    let config: Config = match &options.config {
      Some(path) => serde_yaml::from_reader(
        File::open(path).with_context(|| format!("failed to open config `{}`", path.display()))?,
      )?,
      None => Default::default(),
    };

    let chain = Self::setting_typed(
      options
        .signet
        .then_some(Chain::Signet)
        .or(options.regtest.then_some(Chain::Regtest))
        .or(options.testnet.then_some(Chain::Testnet))
        .or(options.chain_argument),
      Some("CHAIN"),
      config.chain,
      Chain::Testnet,
    )?;

    Ok(Self {
      chain,
      config,
      options,
    })
  }

  pub fn chain(&self) -> Chain {
    self.chain
  }

  pub(crate) fn policy(&self) -> Result<Policy> {
    let default = Policy::default();

    let legacy = Self::setting_typed(
      self.options.legacy_first_output_valuation.then_some(true),
      Some("LEGACY_FIRST_OUTPUT_VALUATION"),
      self.config.legacy_first_output_valuation,
      false,
    )?;

    let policy = Policy {
      consolidation_valuation: if legacy {
        Valuation::FirstOutput
      } else {
        Valuation::SumOfOutputs
      },
      empty_tx_size: Self::setting_typed(
        self.options.empty_tx_size,
        Some("EMPTY_TX_SIZE"),
        self.config.empty_tx_size,
        default.empty_tx_size,
      )?,
      extra_output_amount: Amount::from_sat(Self::setting_typed(
        self.options.extra_output_amount,
        Some("EXTRA_OUTPUT_AMOUNT"),
        self.config.extra_output_amount,
        default.extra_output_amount.to_sat(),
      )?),
      fee_rate: Self::setting_typed(
        self.options.fee_rate,
        Some("FEE_RATE"),
        self.config.fee_rate,
        default.fee_rate,
      )?,
      input_spend_size: Self::setting_typed(
        self.options.input_spend_size,
        Some("INPUT_SPEND_SIZE"),
        self.config.input_spend_size,
        default.input_spend_size,
      )?,
      max_chunk_size: Self::setting_typed(
        self.options.max_chunk_size,
        Some("MAX_CHUNK_SIZE"),
        self.config.max_chunk_size,
        default.max_chunk_size,
      )?,
    };

    ensure!(
      policy.max_chunk_size > 0 && policy.max_chunk_size <= MAX_SCRIPT_ELEMENT_SIZE,
      "max chunk size must be between 1 and {MAX_SCRIPT_ELEMENT_SIZE} bytes",
    );

    Ok(policy)
  }

  pub(crate) fn rpc_url(&self) -> Result<String> {
    let base_url = Self::setting(
      self.options.bitcoin_rpc_url.as_deref(),
      Some("BITCOIN_RPC_URL"),
      self.config.bitcoin_rpc_url.as_deref(),
      None,
    )?
    .unwrap_or(format!("127.0.0.1:{}", self.chain.default_rpc_port()));

    Ok(format!("{base_url}/"))
  }

  pub(crate) fn auth(&self) -> Result<Auth> {
    let rpc_user = Self::setting(
      self.options.bitcoin_rpc_username.as_deref(),
      Some("BITCOIN_RPC_USERNAME"),
      self.config.bitcoin_rpc_username.as_deref(),
      None,
    )?;

    let rpc_pass = Self::setting(
      self.options.bitcoin_rpc_password.as_deref(),
      Some("BITCOIN_RPC_PASSWORD"),
      self.config.bitcoin_rpc_password.as_deref(),
      None,
    )?;

    match (rpc_user, rpc_pass) {
      (Some(rpc_user), Some(rpc_pass)) => Ok(Auth::UserPass(rpc_user, rpc_pass)),
      (None, Some(_rpc_pass)) => Err(anyhow!("no bitcoind rpc user specified")),
      (Some(_rpc_user), None) => Err(anyhow!("no bitcoind rpc password specified")),
      _ => Ok(Auth::CookieFile(self.cookie_file()?)),
    }
  }

  pub(crate) fn cookie_file(&self) -> Result<PathBuf> {
    if let Some(cookie_file) = self
      .options
      .cookie_file
      .as_ref()
      .or(self.config.cookie_file.as_ref())
    {
      return Ok(cookie_file.clone());
    }

    let path = if cfg!(target_os = "linux") {
      dirs::home_dir()
        .ok_or_else(|| anyhow!("failed to get cookie file path: could not get home dir"))?
        .join(".bitcoin")
    } else {
      dirs::data_dir()
        .ok_or_else(|| anyhow!("failed to get cookie file path: could not get data dir"))?
        .join("Bitcoin")
    };

    Ok(self.chain.join_with_data_dir(&path).join(".cookie"))
  }

  pub(crate) fn chain_client(&self) -> Result<CoreClient> {
    let rpc_url = self.rpc_url()?;
    let auth = self.auth()?;

    log::info!("Connecting to Bitcoin Core at {rpc_url}");

    if let Auth::CookieFile(cookie_file) = &auth {
      log::info!(
        "Using credentials from cookie file at `{}`",
        cookie_file.display()
      );

      ensure!(
        cookie_file.is_file(),
        "cookie file `{}` does not exist",
        cookie_file.display()
      );
    }

    let client = CoreClient::new(&rpc_url, auth)
      .with_context(|| format!("failed to connect to Bitcoin Core RPC at `{rpc_url}`"))?;

    let rpc_network = client.network()?;
    let network = self.chain.network();

    ensure!(
      rpc_network == network,
      "Bitcoin RPC server is on {rpc_network} but stash is on {network}",
    );

    Ok(client)
  }

  fn setting_typed<T: FromStr>(
    arg_value: Option<T>,
    env_key: Option<&str>,
    config_value: Option<T>,
    default_value: T,
  ) -> Result<T>
  where
    T::Err: Display,
  {
    if let Some(arg_value) = arg_value {
      return Ok(arg_value);
    }

    if let Some(env_key) = env_key {
      match env::var(format!("STASH_{env_key}")) {
        Ok(env_value) => {
          return env_value
            .parse()
            .map_err(|err| anyhow!("failed to parse STASH_{env_key}: {err}"))
        }
        Err(err @ env::VarError::NotUnicode(_)) => return Err(err.into()),
        Err(env::VarError::NotPresent) => {}
      }
    }

    if let Some(config_value) = config_value {
      return Ok(config_value);
    }

    Ok(default_value)
  }

  fn setting(
    arg_value: Option<&str>,
    env_key: Option<&str>,
    config_value: Option<&str>,
    default_value: Option<&str>,
  ) -> Result<Option<String>> {
    if let Some(arg_value) = arg_value {
      return Ok(Some(arg_value.into()));
    }

    if let Some(env_key) = env_key {
      match env::var(format!("STASH_{env_key}")) {
        Ok(env_value) => return Ok(Some(env_value)),
        Err(err @ env::VarError::NotUnicode(_)) => return Err(err.into()),
        Err(env::VarError::NotPresent) => {}
      }
    }

    Ok(config_value.or(default_value).map(str::to_string))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn settings(args: &[&str]) -> Settings {
    Settings::new(Options::try_parse_from(args).unwrap()).unwrap()
  }

  #[test]
  fn chain_defaults_to_testnet() {
    assert_eq!(settings(&["stash"]).chain(), Chain::Testnet);
  }

  #[test]
  fn chain_flags_override_default() {
    assert_eq!(settings(&["stash", "--regtest"]).chain(), Chain::Regtest);
    assert_eq!(
      settings(&["stash", "--chain", "mainnet"]).chain(),
      Chain::Mainnet,
    );
    assert_eq!(settings(&["stash", "--signet"]).chain(), Chain::Signet);
  }

  #[test]
  fn policy_defaults() {
    pretty_assert_eq!(settings(&["stash"]).policy().unwrap(), Policy::default());
  }

  #[test]
  fn policy_flags_override_defaults() {
    let policy = settings(&[
      "stash",
      "--fee-rate",
      "7",
      "--max-chunk-size",
      "40",
      "--extra-output-amount",
      "600",
      "--legacy-first-output-valuation",
    ])
    .policy()
    .unwrap();

    pretty_assert_eq!(
      policy,
      Policy {
        consolidation_valuation: Valuation::FirstOutput,
        extra_output_amount: Amount::from_sat(600),
        fee_rate: FeeRate::from_sat_per_byte(7),
        max_chunk_size: 40,
        ..Default::default()
      },
    );
  }

  #[test]
  fn oversized_max_chunk_size_is_rejected() {
    assert!(settings(&["stash", "--max-chunk-size", "521"])
      .policy()
      .is_err());
    assert!(settings(&["stash", "--max-chunk-size", "0"])
      .policy()
      .is_err());
  }

  #[test]
  fn config_file_settings_yield_to_flags() {
    let tempdir = tempfile::TempDir::new().unwrap();

    let path = tempdir.path().join("stash.yaml");

    fs::write(
      &path,
      "chain: regtest\nfee_rate: 9\nbitcoin_rpc_url: http://example.com:8332",
    )
    .unwrap();

    let settings = settings(&["stash", "--config", path.to_str().unwrap()]);

    assert_eq!(settings.chain(), Chain::Regtest);
    assert_eq!(settings.policy().unwrap().fee_rate, FeeRate::from_sat_per_byte(9));
    assert_eq!(settings.rpc_url().unwrap(), "http://example.com:8332/");

    let settings = settings_with_config_and_flags(&path);

    assert_eq!(settings.chain(), Chain::Signet);
    assert_eq!(
      settings.policy().unwrap().fee_rate,
      FeeRate::from_sat_per_byte(3),
    );
  }

  fn settings_with_config_and_flags(path: &Path) -> Settings {
    settings(&[
      "stash",
      "--config",
      path.to_str().unwrap(),
      "--signet",
      "--fee-rate",
      "3",
    ])
  }

  #[test]
  fn unknown_config_fields_are_rejected() {
    let tempdir = tempfile::TempDir::new().unwrap();

    let path = tempdir.path().join("stash.yaml");

    fs::write(&path, "nonsense: true").unwrap();

    assert!(
      Settings::new(Options::try_parse_from(["stash", "--config", path.to_str().unwrap()]).unwrap())
        .is_err()
    );
  }

  #[test]
  fn auth_requires_both_credentials() {
    assert!(settings(&["stash", "--bitcoin-rpc-username", "satoshi"])
      .auth()
      .is_err());
    assert!(settings(&["stash", "--bitcoin-rpc-password", "hunter2"])
      .auth()
      .is_err());

    assert_matches!(
      settings(&[
        "stash",
        "--bitcoin-rpc-username",
        "satoshi",
        "--bitcoin-rpc-password",
        "hunter2",
      ])
      .auth()
      .unwrap(),
      Auth::UserPass(..)
    );
  }

  #[test]
  fn rpc_url_defaults_to_chain_port() {
    assert_eq!(settings(&["stash"]).rpc_url().unwrap(), "127.0.0.1:18332/");
    assert_eq!(
      settings(&["stash", "--chain", "mainnet"]).rpc_url().unwrap(),
      "127.0.0.1:8332/",
    );
  }
}
