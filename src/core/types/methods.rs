//! Known JSON-RPC methods and their caching policy
//!
//! The policy table is closed: every method the gateway knows about maps to
//! exactly one [`CachePolicy`]. Anything else resolves to
//! [`CachePolicy::Default`].

use serde::{Deserialize, Serialize};

/// Caching tier for a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Side-effecting or privacy-sensitive, never stored
    NeverCache,
    /// Volatile chain state
    ShortTtl,
    /// Effectively immutable data
    LongTtl,
    /// Not classified, uses the cache's default ttl
    Default,
}

macro_rules! rpc_methods {
    ($( $variant:ident => $name:literal, $policy:ident; )*) => {
        /// Ethereum JSON-RPC methods with a known caching policy
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RpcMethod {
            $( $variant, )*
        }

        impl RpcMethod {
            /// All known methods
            pub const ALL: &'static [RpcMethod] = &[ $( RpcMethod::$variant, )* ];

            /// Wire name of the method
            pub fn as_str(self) -> &'static str {
                match self {
                    $( RpcMethod::$variant => $name, )*
                }
            }

            /// Resolve a wire name
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(RpcMethod::$variant), )*
                    _ => None,
                }
            }

            /// Caching tier of this method
            pub fn cache_policy(self) -> CachePolicy {
                match self {
                    $( RpcMethod::$variant => CachePolicy::$policy, )*
                }
            }
        }
    };
}

rpc_methods! {
    // Sends, signs and account enumeration
    SendTransaction => "eth_sendTransaction", NeverCache;
    SendRawTransaction => "eth_sendRawTransaction", NeverCache;
    Sign => "eth_sign", NeverCache;
    SignTransaction => "eth_signTransaction", NeverCache;
    SignTypedData => "eth_signTypedData", NeverCache;
    SignTypedDataV3 => "eth_signTypedData_v3", NeverCache;
    SignTypedDataV4 => "eth_signTypedData_v4", NeverCache;
    PersonalSign => "personal_sign", NeverCache;
    Accounts => "eth_accounts", NeverCache;
    RequestAccounts => "eth_requestAccounts", NeverCache;
    PersonalListAccounts => "personal_listAccounts", NeverCache;
    NewFilter => "eth_newFilter", NeverCache;
    NewBlockFilter => "eth_newBlockFilter", NeverCache;
    GetFilterChanges => "eth_getFilterChanges", NeverCache;
    UninstallFilter => "eth_uninstallFilter", NeverCache;

    // Volatile chain state
    GasPrice => "eth_gasPrice", ShortTtl;
    BlockNumber => "eth_blockNumber", ShortTtl;
    GetBalance => "eth_getBalance", ShortTtl;
    GetTransactionCount => "eth_getTransactionCount", ShortTtl;
    EstimateGas => "eth_estimateGas", ShortTtl;
    MaxPriorityFeePerGas => "eth_maxPriorityFeePerGas", ShortTtl;
    FeeHistory => "eth_feeHistory", ShortTtl;
    Call => "eth_call", ShortTtl;
    GetBlockByNumber => "eth_getBlockByNumber", ShortTtl;
    GetStorageAt => "eth_getStorageAt", ShortTtl;
    Syncing => "eth_syncing", ShortTtl;

    // Effectively immutable
    ChainId => "eth_chainId", LongTtl;
    NetVersion => "net_version", LongTtl;
    GetCode => "eth_getCode", LongTtl;
    GetTransactionByHash => "eth_getTransactionByHash", LongTtl;
    GetTransactionReceipt => "eth_getTransactionReceipt", LongTtl;
    GetBlockByHash => "eth_getBlockByHash", LongTtl;
    ClientVersion => "web3_clientVersion", LongTtl;

    // Everything else we know by name but leave on the default ttl
    GetLogs => "eth_getLogs", Default;
    GetBlockTransactionCountByNumber => "eth_getBlockTransactionCountByNumber", Default;
}

impl RpcMethod {
    /// Whether the method changes state upstream or signs with a key.
    ///
    /// Such calls are only retried when the failed attempt provably never
    /// reached the upstream.
    pub fn is_side_effecting(self) -> bool {
        matches!(
            self,
            RpcMethod::SendTransaction
                | RpcMethod::SendRawTransaction
                | RpcMethod::Sign
                | RpcMethod::SignTransaction
                | RpcMethod::SignTypedData
                | RpcMethod::SignTypedDataV3
                | RpcMethod::SignTypedDataV4
                | RpcMethod::PersonalSign
        )
    }
}

/// Resolve the caching tier of any method name
pub fn cache_policy_for(method: &str) -> CachePolicy {
    RpcMethod::from_name(method)
        .map(RpcMethod::cache_policy)
        .unwrap_or(CachePolicy::Default)
}

/// Whether a method name denotes a send or sign operation
pub fn is_side_effecting(method: &str) -> bool {
    RpcMethod::from_name(method).is_some_and(RpcMethod::is_side_effecting)
}
