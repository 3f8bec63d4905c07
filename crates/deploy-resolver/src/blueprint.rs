//! Compiled contract blueprints and constructor encoding.

use {
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt},
        json_abi::JsonAbi,
        primitives::{Address, Bytes},
    },
    anyhow::{Context, Result, ensure},
};

/// Compiled interface and creation bytecode of a contract.
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

/// Arguments of the resolver's `constructor(address, address)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructorArgs {
    pub registry: Address,
    pub fee_recipient: Address,
}

impl ConstructorArgs {
    fn values(&self) -> [DynSolValue; 2] {
        [
            DynSolValue::Address(self.registry),
            DynSolValue::Address(self.fee_recipient),
        ]
    }
}

impl Blueprint {
    /// Returns the input of the contract creation transaction: the creation
    /// bytecode followed by the ABI encoded constructor arguments.
    pub fn deploy_code(&self, args: &ConstructorArgs) -> Result<Bytes> {
        let constructor = self
            .abi
            .constructor()
            .with_context(|| format!("{} declares no constructor", self.name))?;
        ensure!(
            constructor.inputs.len() == 2
                && constructor
                    .inputs
                    .iter()
                    .all(|input| input.ty == "address"),
            "{} constructor takes ({}), expected (address,address)",
            self.name,
            constructor
                .inputs
                .iter()
                .map(|input| input.ty.as_str())
                .collect::<Vec<_>>()
                .join(","),
        );

        let encoded = constructor.abi_encode_input(&args.values())?;
        Ok([&self.bytecode[..], encoded.as_slice()].concat().into())
    }
}
