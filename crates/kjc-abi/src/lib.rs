//! Contract ABIs for the dApp's four contracts.
//!
//! Config-supplied ABIs are parsed as [`JsonAbi`]; the router and token
//! subsets the connector relies on are declared with `sol!` and exported
//! through their generated JSON ABI so every contract goes through the same
//! dynamic encode/decode path.

use alloy_dyn_abi::{FunctionExt, JsonAbiExt};
use alloy_sol_types::sol;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

pub use alloy_dyn_abi::DynSolValue;
pub use alloy_json_abi::{Function, JsonAbi, StateMutability};
pub use alloy_primitives::{Address, Selector, U256, hex};

sol! {
    /// PancakeSwap router subset used for quotes.
    #[sol(abi)]
    interface IPancakeRouter {
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
    }

    /// ERC-20 subset: `decimals`, `approve`, `allowance`.
    #[sol(abi)]
    interface IERC20 {
        function decimals() external view returns (uint8);
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}

pub fn is_view(function: &Function) -> bool {
    matches!(
        function.state_mutability,
        StateMutability::View | StateMutability::Pure
    )
}

/// A contract interface: the JSON array emitted by solc / block explorers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Abi(pub JsonAbi);

impl Abi {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid ABI json")
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).context("invalid ABI json")
    }

    pub fn router_minimal() -> Self {
        Abi(IPancakeRouter::abi::contract())
    }

    pub fn erc20_minimal() -> Self {
        Abi(IERC20::abi::contract())
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.0.functions()
    }

    /// First declaration of `name`; overloads are reached through [`Abi::encode_call`].
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.0.function(name).and_then(|overloads| overloads.first())
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    fn overload(&self, name: &str, arity: usize) -> Result<&Function> {
        let overloads = self
            .0
            .function(name)
            .ok_or_else(|| anyhow!("function `{name}` not found in ABI"))?;
        overloads
            .iter()
            .find(|function| function.inputs.len() == arity)
            .ok_or_else(|| {
                let declared: Vec<String> = overloads.iter().map(Function::signature).collect();
                anyhow!("no `{name}` taking {arity} argument(s); declared: {}", declared.join(", "))
            })
    }

    /// Selector followed by the encoded arguments, type-checked against the declared inputs.
    pub fn encode_call(&self, name: &str, args: &[DynSolValue]) -> Result<Vec<u8>> {
        let function = self.overload(name, args.len())?;
        function
            .abi_encode_input(args)
            .with_context(|| format!("cannot encode `{}`", function.signature()))
    }

    /// Decode the return data of a zero-or-more argument call to `name`.
    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<Vec<DynSolValue>> {
        let function = self
            .function(name)
            .ok_or_else(|| anyhow!("function `{name}` not found in ABI"))?;
        function
            .abi_decode_output(data)
            .with_context(|| format!("cannot decode `{}` output", function.signature()))
    }
}

/// The single unsigned integer a getter like `decimals()` returns.
pub fn single_uint(values: &[DynSolValue]) -> Result<U256> {
    match values {
        [DynSolValue::Uint(value, _)] => Ok(*value),
        other => Err(anyhow!("expected one uint return value, got {other:?}")),
    }
}
