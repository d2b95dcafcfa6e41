//! Faucet token contract bindings.

use alloy::sol;

sol! {
    /// External interface of the deployed faucet token.
    ///
    /// This is the exact surface the application consumes; the contract
    /// itself is not part of this repository.
    interface FaucetToken {
        /// Get token balance of an account
        function balanceOf(address account) external view returns (uint256);

        /// Get allowance granted by owner to spender
        function allowance(address owner, address spender) external view returns (uint256);

        /// Mint tokens to a recipient against an off-chain signed
        /// authorization; gas is paid by whoever submits
        function mint(bytes32 hash, bytes signature, address to, uint256 amount) external;

        /// Approve spender to spend tokens
        function approve(address spender, uint256 amount) external returns (bool);

        /// Move tokens using a previously granted allowance
        function transferFrom(address from, address to, uint256 amount) external returns (bool);

        /// Emitted when tokens are transferred
        event Transfer(address indexed from, address indexed to, uint256 value);

        /// Emitted when an allowance is set
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}
