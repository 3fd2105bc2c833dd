use super::*;

mod build;
mod consolidate;
mod decode;
mod generate_private_key;
mod public_key;
mod retrieve;
mod rpc;

#[derive(Debug, Parser)]
pub(crate) enum Subcommand {
  Build(build::Build),
  Consolidate(consolidate::Consolidate),
  Decode(decode::Decode),
  GeneratePrivateKey(generate_private_key::GeneratePrivateKey),
  PublicKey(public_key::PublicKey),
  Retrieve(retrieve::Retrieve),
  Rpc(rpc::Rpc),
}

impl Subcommand {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    match self {
      Self::Build(build) => build.run(settings),
      Self::Consolidate(consolidate) => consolidate.run(settings),
      Self::Decode(decode) => decode.run(),
      Self::GeneratePrivateKey(generate_private_key) => generate_private_key.run(settings),
      Self::PublicKey(public_key) => public_key.run(),
      Self::Retrieve(retrieve) => retrieve.run(settings),
      Self::Rpc(rpc) => rpc.run(settings),
    }
  }
}

pub trait Output: Send {
  fn print_json(&self);
}

impl<T> Output for T
where
  T: Serialize + Send,
{
  fn print_json(&self) {
    serde_json::to_writer_pretty(io::stdout(), self).ok();
    println!();
  }
}

pub(crate) type SubcommandResult = Result<Option<Box<dyn Output>>>;
