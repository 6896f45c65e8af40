use std::path::PathBuf;

use clap::Parser;
use swapkit_deploy::SuiteParams;
use tracing::level_filters::LevelFilter;

/// The default target network (testnet, so a bare invocation cannot touch
/// mainnet funds).
const DEFAULT_NETWORK: Network = Network::BscTestnet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Network {
    BscMainnet,
    BscTestnet,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::BscMainnet => 56,
            Network::BscTestnet => 97,
        }
    }

    /// The built-in constructor literal table for this network.
    pub fn suite_params(&self) -> SuiteParams {
        match self {
            Network::BscMainnet => SuiteParams::bsc_mainnet(),
            Network::BscTestnet => SuiteParams::bsc_testnet(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum RpcProvider {
    PublicNode,
    #[strum(default)]
    Custom(String),
}

impl RpcProvider {
    pub fn to_rpc_url(&self, network: Network) -> anyhow::Result<String> {
        match self {
            RpcProvider::PublicNode if network == Network::BscMainnet => {
                Ok("https://bsc-rpc.publicnode.com".to_string())
            }
            RpcProvider::PublicNode if network == Network::BscTestnet => {
                Ok("https://bsc-testnet-rpc.publicnode.com".to_string())
            }
            RpcProvider::PublicNode => {
                anyhow::bail!("Public node is not supported for this network");
            }
            RpcProvider::Custom(url) => Ok(url.clone()),
        }
    }
}

#[derive(Parser)]
#[command(name = "swapkit")]
#[command(
    author,
    version,
    about = "Deploy the swap contract suite (factory, router, management) in one run"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "SWAPKIT_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The target network.
    #[arg(short, long, env = "SWAPKIT_NETWORK", default_value_t = DEFAULT_NETWORK)]
    pub network: Network,

    /// The RPC endpoint to deploy through.
    ///
    /// If public node is selected, a per-network endpoint from
    /// `<https://publicnode.com/>` is used; any other value is treated as a
    /// custom URL.
    #[arg(long, alias = "rpc", env = "SWAPKIT_RPC_URL", default_value_t = RpcProvider::PublicNode)]
    pub rpc_provider: RpcProvider,

    /// Address of the node-managed deployer account the transactions are
    /// sent from.
    #[arg(short, long, env = "SWAPKIT_FROM")]
    pub from: String,

    /// Directory holding the compiled contract artifacts.
    #[arg(long, env = "SWAPKIT_ARTIFACTS", default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Path to an existing deployment plan TOML to run instead of the
    /// built-in per-network suite plan.
    #[arg(long, alias = "conf", env = "SWAPKIT_PLAN")]
    pub plan: Option<PathBuf>,

    /// If provided, the effective plan is written to this path before the
    /// run starts.
    #[arg(long, env = "SWAPKIT_PLAN_OUT")]
    pub plan_out: Option<PathBuf>,

    /// Seconds to wait for each deployment to be confirmed on chain.
    #[arg(long, env = "SWAPKIT_CONFIRM_TIMEOUT", default_value_t = 180)]
    pub confirm_timeout: u64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_network_parsing() {
        assert_eq!(Network::from_str("bsc-mainnet").unwrap(), Network::BscMainnet);
        assert_eq!(Network::from_str("bsc-testnet").unwrap(), Network::BscTestnet);
        assert!(Network::from_str("sepolia").is_err());
    }

    #[test]
    fn test_network_chain_ids() {
        assert_eq!(Network::BscMainnet.chain_id(), 56);
        assert_eq!(Network::BscTestnet.chain_id(), 97);
    }

    #[test]
    fn test_rpc_provider_custom_fallthrough() {
        let provider = RpcProvider::from_str("http://localhost:8545").unwrap();
        assert_eq!(
            provider,
            RpcProvider::Custom("http://localhost:8545".to_string())
        );
        assert_eq!(
            provider.to_rpc_url(Network::BscTestnet).unwrap(),
            "http://localhost:8545"
        );
    }

    #[test]
    fn test_public_node_urls_differ_per_network() {
        let provider = RpcProvider::PublicNode;
        assert_ne!(
            provider.to_rpc_url(Network::BscMainnet).unwrap(),
            provider.to_rpc_url(Network::BscTestnet).unwrap()
        );
    }
}
