//! Contract bindings for the deployed pool contracts.

use ethers::contract::abigen;

abigen!(
    Erc20,
    r"[
        function balanceOf(address owner) view returns (uint256)
        function approve(address spender, uint256 amount) returns (bool)
    ]",
);

abigen!(
    RewardHook,
    r"[
        function pointsToken() view returns (address)
    ]",
);

// Pool key, swap params and test settings are passed as plain tuples so the
// selector matches `swap((address,address,uint24,int24,address),(bool,int256,uint160),(bool,bool),bytes)`.
abigen!(
    SwapRouter,
    r#"[
        {
            "type": "function",
            "name": "swap",
            "stateMutability": "payable",
            "inputs": [
                {
                    "name": "key",
                    "type": "tuple",
                    "components": [
                        { "name": "", "type": "address" },
                        { "name": "", "type": "address" },
                        { "name": "", "type": "uint24" },
                        { "name": "", "type": "int24" },
                        { "name": "", "type": "address" }
                    ]
                },
                {
                    "name": "params",
                    "type": "tuple",
                    "components": [
                        { "name": "", "type": "bool" },
                        { "name": "", "type": "int256" },
                        { "name": "", "type": "uint160" }
                    ]
                },
                {
                    "name": "testSettings",
                    "type": "tuple",
                    "components": [
                        { "name": "", "type": "bool" },
                        { "name": "", "type": "bool" }
                    ]
                },
                { "name": "hookData", "type": "bytes" }
            ],
            "outputs": [{ "name": "", "type": "int256" }]
        }
    ]"#,
);
