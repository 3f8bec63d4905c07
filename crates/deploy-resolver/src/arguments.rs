use {
    crate::deployer::Confirmation,
    alloy::signers::local::PrivateKeySigner,
    anyhow::{Result, anyhow},
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
        time::Duration,
    },
    url::Url,
};

#[derive(Debug, clap::Parser)]
#[clap(about = "Deploys the ENSWebsiteResolver contract")]
pub struct Arguments {
    /// The log filter.
    #[clap(long, env, default_value = "warn,deploy_resolver=info")]
    pub log_filter: String,

    /// Whether to use JSON format for the logs.
    #[clap(long, env, default_value = "false")]
    pub use_json_logs: bool,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Hex encoded private key of the deploying account.
    #[clap(long, env, hide_env_values = true)]
    pub private_key: String,

    /// Root of the Hardhat build output holding the compiled contracts.
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// How long to wait for the deployment transaction to be mined.
    #[clap(
        long,
        env,
        default_value = "5m",
        value_parser = humantime::parse_duration,
    )]
    pub confirmation_timeout: Duration,

    /// Number of blocks the deployment has to be buried under before it is
    /// reported.
    #[clap(
        long,
        env,
        default_value = "1",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub confirmations: u64,
}

impl Arguments {
    pub fn signer(&self) -> Result<PrivateKeySigner> {
        // Not printing detailed error because it could leak the private key.
        self.private_key
            .parse()
            .map_err(|_| anyhow!("malformed private key"))
    }

    pub fn confirmation(&self) -> Confirmation {
        Confirmation {
            timeout: self.confirmation_timeout,
            confirmations: self.confirmations,
        }
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            use_json_logs,
            node_url,
            private_key: _,
            artifacts,
            confirmation_timeout,
            confirmations,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "private_key: SECRET")?;
        writeln!(f, "artifacts: {}", artifacts.display())?;
        writeln!(
            f,
            "confirmation_timeout: {}",
            humantime::format_duration(*confirmation_timeout)
        )?;
        writeln!(f, "confirmations: {confirmations}")?;
        Ok(())
    }
}
