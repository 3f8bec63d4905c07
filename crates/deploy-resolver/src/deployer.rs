use {
    alloy::{
        network::{EthereumWallet, TransactionBuilder},
        primitives::{Address, B256, Bytes},
        providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
        rpc::types::{TransactionReceipt, TransactionRequest},
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result, anyhow, ensure},
    std::time::Duration,
    url::Url,
};

/// A contract creation transaction that was accepted by the node but is not
/// confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDeployment {
    pub tx_hash: B256,
}

/// A confirmed contract creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

/// The account deploying contracts and the network it deploys to.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Deployer: Send + Sync {
    /// Address of the signing account.
    async fn address(&self) -> Result<Address>;

    /// Signs and broadcasts a contract creation transaction with `code` as
    /// its input.
    async fn submit(&self, code: Bytes) -> Result<PendingDeployment>;

    /// Waits until the creation transaction is mined and returns the address
    /// of the created contract.
    async fn confirm(&self, pending: PendingDeployment) -> Result<Deployment>;
}

/// How long to wait for a deployment and how deep it has to be buried.
#[derive(Debug, Clone, Copy)]
pub struct Confirmation {
    pub timeout: Duration,
    pub confirmations: u64,
}

/// Deploys through a JSON-RPC node, signing locally with a private key.
pub struct NodeDeployer {
    provider: DynProvider,
    account: Address,
    confirmation: Confirmation,
}

impl NodeDeployer {
    pub async fn connect(
        url: &Url,
        signer: PrivateKeySigner,
        confirmation: Confirmation,
    ) -> Result<Self> {
        let account = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer))
            .connect_http(url.clone())
            .erased();
        let chain_id = provider
            .get_chain_id()
            .await
            .context("could not fetch current chain id")?;
        tracing::info!(chain_id, %account, "connected to node");

        Ok(Self {
            provider,
            account,
            confirmation,
        })
    }
}

#[async_trait::async_trait]
impl Deployer for NodeDeployer {
    async fn address(&self) -> Result<Address> {
        Ok(self.account)
    }

    async fn submit(&self, code: Bytes) -> Result<PendingDeployment> {
        let tx = TransactionRequest::default()
            .with_from(self.account)
            .with_deploy_code(code);
        let pending = self.provider.send_transaction(tx).await?;
        Ok(PendingDeployment {
            tx_hash: *pending.tx_hash(),
        })
    }

    async fn confirm(&self, pending: PendingDeployment) -> Result<Deployment> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), pending.tx_hash)
            .with_required_confirmations(self.confirmation.confirmations)
            .with_timeout(Some(self.confirmation.timeout))
            .get_receipt()
            .await
            .with_context(|| {
                format!(
                    "no receipt for {:?} within {}",
                    pending.tx_hash,
                    humantime::format_duration(self.confirmation.timeout),
                )
            })?;
        tracing::debug!(
            tx_hash = ?receipt.transaction_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "deployment mined"
        );

        deployment(&receipt)
    }
}

/// The contract created by a mined deployment transaction.
fn deployment(receipt: &TransactionReceipt) -> Result<Deployment> {
    ensure!(
        receipt.status(),
        "deployment transaction {:?} reverted",
        receipt.transaction_hash
    );
    let address = receipt.contract_address.ok_or_else(|| {
        anyhow!(
            "receipt of {:?} has no contract address",
            receipt.transaction_hash
        )
    })?;

    Ok(Deployment {
        address,
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
    })
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address, serde_json::json};

    const TX_HASH: B256 = B256::repeat_byte(0x11);
    const RESOLVER: Address = address!("0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB");

    fn receipt(status: bool, contract_address: Option<Address>) -> TransactionReceipt {
        serde_json::from_value(json!({
            "type": "0x2",
            "status": if status { "0x1" } else { "0x0" },
            "cumulativeGasUsed": "0x1e8480",
            "logs": [],
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "transactionHash": TX_HASH,
            "transactionIndex": "0x0",
            "blockHash": B256::repeat_byte(0x22),
            "blockNumber": "0x2a",
            "gasUsed": "0x1e8480",
            "effectiveGasPrice": "0x3b9aca00",
            "from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "to": null,
            "contractAddress": contract_address,
        }))
        .unwrap()
    }

    #[test]
    fn mined_deployment() {
        let deployment = deployment(&receipt(true, Some(RESOLVER))).unwrap();

        assert_eq!(
            deployment,
            Deployment {
                address: RESOLVER,
                tx_hash: TX_HASH,
                block_number: Some(42),
            }
        );
    }

    #[test]
    fn reverted_deployment() {
        let err = deployment(&receipt(false, Some(RESOLVER))).unwrap_err();
        assert!(err.to_string().contains("reverted"));
    }

    #[test]
    fn receipt_without_contract_address() {
        let err = deployment(&receipt(true, None)).unwrap_err();
        assert!(err.to_string().contains("has no contract address"));
    }
}
