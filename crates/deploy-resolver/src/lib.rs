pub mod arguments;
pub mod artifacts;
pub mod blueprint;
pub mod deployer;

use {
    crate::{
        artifacts::{ArtifactStore, HardhatArtifacts},
        blueprint::ConstructorArgs,
        deployer::{Deployer, Deployment, NodeDeployer},
    },
    alloy::primitives::{Address, address},
    anyhow::{Context, Result},
    clap::Parser,
    std::{io::Write, process::ExitCode},
};

/// Name of the deployed contract in the artifact store.
pub const CONTRACT: &str = "ENSWebsiteResolver";

/// Mainnet ENS registry (with fallback) the resolver reads domain ownership
/// from.
pub const ENS_REGISTRY: Address = address!("0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// Parses the arguments, deploys the contract once and reports the outcome
/// as process exit code.
pub async fn start(args: impl Iterator<Item = String>) -> ExitCode {
    let args = match arguments::Arguments::try_parse_from(args) {
        Ok(args) => args,
        Err(err) => {
            _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    observe::tracing::initialize(&args.log_filter, args.use_json_logs);
    tracing::info!("running deploy-resolver with validated arguments:\n{}", args);

    match deploy(&args).await {
        Ok(deployment) => {
            tracing::info!(
                address = %deployment.address,
                tx_hash = ?deployment.tx_hash,
                block = ?deployment.block_number,
                "deployment confirmed"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

async fn deploy(args: &arguments::Arguments) -> Result<Deployment> {
    let deployer = NodeDeployer::connect(
        &args.node_url,
        args.signer()?,
        args.confirmation(),
    )
    .await
    .context("connect to node")?;
    let artifacts = HardhatArtifacts::new(&args.artifacts);
    run(&deployer, &artifacts, &mut std::io::stdout()).await
}

/// Deploys the contract exactly once: resolves the signing account and the
/// contract blueprint, submits the creation transaction and waits for it to
/// be confirmed. Progress is reported as two lines on `out`, the deploying
/// account first and the contract address once it is confirmed.
pub async fn run(
    deployer: &dyn Deployer,
    artifacts: &dyn ArtifactStore,
    out: &mut impl Write,
) -> Result<Deployment> {
    let account = deployer.address().await.context("resolve signer")?;
    writeln!(out, "Deploying contracts with the account: {account}")?;

    let blueprint = artifacts
        .resolve(CONTRACT)
        .await
        .with_context(|| format!("resolve blueprint {CONTRACT}"))?;
    // Fees go to the deploying account.
    let args = ConstructorArgs {
        registry: ENS_REGISTRY,
        fee_recipient: account,
    };
    let code = blueprint
        .deploy_code(&args)
        .context("encode constructor arguments")?;

    tracing::info!(
        contract = %blueprint.name,
        registry = %args.registry,
        fee_recipient = %args.fee_recipient,
        "submitting deployment"
    );
    let pending = deployer.submit(code).await.context("submit deployment")?;
    tracing::info!(tx_hash = ?pending.tx_hash, "waiting for deployment to be mined");
    let deployment = deployer
        .confirm(pending)
        .await
        .context("confirm deployment")?;

    writeln!(out, "{CONTRACT} deployed to: {}", deployment.address)?;
    Ok(deployment)
}
