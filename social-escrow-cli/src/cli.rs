//! Command-line surface.
//!
//! Values are taken as strings and run through the strict parsers of
//! [`social_escrow::parse`] by the command handlers, so malformed input is
//! reported as a validation error rather than coerced.

use clap::{Args, Parser, Subcommand};

use crate::config::SecretKey;

/// Client for the social escrow contract.
#[derive(Debug, Parser)]
#[command(name = "social-escrow", version, about, long_about = None)]
pub struct Cli {
    /// Settings shared by every command.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every command; each falls back to an environment variable.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// JSON-RPC endpoint of the chain the escrow lives on.
    #[arg(long, env = "RPC_URL", global = true)]
    pub rpc_url: Option<String>,

    /// Escrow contract address.
    #[arg(long, env = "ESCROW_ADDRESS", global = true)]
    pub escrow_address: Option<String>,

    /// Chain ID used in the attestation domain instead of asking the RPC node.
    #[arg(long, env = "CHAIN_ID", global = true)]
    pub chain_id: Option<String>,

    /// Private key funding deposits and requesting refunds.
    #[arg(long, env = "DEPOSITOR_PRIVATE_KEY", global = true, hide_env_values = true)]
    pub depositor_key: Option<SecretKey>,

    /// Private key paying gas for relayed claims.
    #[arg(long, env = "RELAYER_PRIVATE_KEY", global = true, hide_env_values = true)]
    pub relayer_key: Option<SecretKey>,

    /// Private key signing claim attestations.
    #[arg(long, env = "ATTESTER_PRIVATE_KEY", global = true, hide_env_values = true)]
    pub attester_key: Option<SecretKey>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Escrow commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Deposit funds for a platform user.
    Deposit(DepositArgs),
    /// Sign a claim attestation.
    Attest(AttestationArgs),
    /// Recover the signer of an attestation locally.
    Verify(VerifyArgs),
    /// Relay a claim, signing the attestation first if no signature is given.
    Claim(ClaimArgs),
    /// Show a deposit record.
    GetDeposit(DepositIdArgs),
    /// Refund an unclaimed deposit to its depositor.
    Refund(DepositIdArgs),
}

/// Arguments of `deposit`.
#[derive(Debug, Clone, Args)]
pub struct DepositArgs {
    /// Platform the recipient identity belongs to (uint8).
    #[arg(long)]
    pub platform_id: String,

    /// Platform user ID of the recipient (uint256).
    #[arg(long)]
    pub recipient_user_id: String,

    /// Platform user ID of the depositor (uint256).
    #[arg(long)]
    pub depositor_user_id: String,

    /// Content the tip is attached to.
    #[arg(long, default_value = "")]
    pub content_uri: String,

    /// Amount in ether, e.g. `0.05`.
    #[arg(long)]
    pub amount: String,
}

/// Fields of a claim attestation.
#[derive(Debug, Clone, Args)]
pub struct AttestationArgs {
    /// Platform the recipient identity belongs to (uint8).
    #[arg(long)]
    pub platform_id: String,

    /// Platform user ID of the recipient (uint256).
    #[arg(long)]
    pub user_id: String,

    /// Address receiving the claimed funds.
    #[arg(long)]
    pub payout_address: String,

    /// Deposit to claim (uint256).
    #[arg(long)]
    pub deposit_id: String,

    /// Replay-protection nonce (uint256); defaults to a time-derived value when signing.
    #[arg(long)]
    pub nonce: Option<String>,

    /// Expiry as unix seconds (uint64); defaults to 24 hours from now when signing.
    #[arg(long)]
    pub expiry: Option<String>,
}

/// Arguments of `verify`.
#[derive(Debug, Clone, Args)]
pub struct VerifyArgs {
    /// Signed attestation fields; nonce and expiry are required.
    #[command(flatten)]
    pub attestation: AttestationArgs,

    /// Hex signature to check.
    #[arg(long)]
    pub signature: String,

    /// Address the signature is expected to come from.
    #[arg(long)]
    pub expected_signer: Option<String>,
}

/// Arguments of `claim`.
#[derive(Debug, Clone, Args)]
pub struct ClaimArgs {
    /// Attestation fields; nonce and expiry are required with `--signature`.
    #[command(flatten)]
    pub attestation: AttestationArgs,

    /// Existing attestation signature; signs with the attester key if omitted.
    #[arg(long)]
    pub signature: Option<String>,

    /// Refuse to relay unless the attestation was signed by this address.
    #[arg(long)]
    pub expected_signer: Option<String>,
}

/// Arguments of commands addressing one deposit.
#[derive(Debug, Clone, Args)]
pub struct DepositIdArgs {
    /// Deposit ID (uint256).
    #[arg(long)]
    pub deposit_id: String,
}

/// Process exit code for a clap parse failure once it has been printed.
///
/// Help and version requests exit 0; every usage error exits 1, like any
/// other failed command.
#[must_use]
pub fn exit_code(err: &clap::Error) -> i32 {
    i32::from(err.use_stderr())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_claim_with_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "social-escrow",
            "claim",
            "--platform-id",
            "1",
            "--user-id",
            "987654321",
            "--payout-address",
            "0x1111111111111111111111111111111111111111",
            "--deposit-id",
            "1",
            "--chain-id",
            "31337",
            "--json",
        ])
        .unwrap();
        assert!(cli.global.json);
        assert_eq!(cli.global.chain_id.as_deref(), Some("31337"));
        let Command::Claim(args) = cli.command else {
            panic!("expected claim");
        };
        assert_eq!(args.attestation.user_id, "987654321");
        assert!(args.signature.is_none());
    }

    #[test]
    fn test_exit_codes() {
        let help = Cli::try_parse_from(["social-escrow", "--help"]).unwrap_err();
        assert_eq!(exit_code(&help), 0);
        let version = Cli::try_parse_from(["social-escrow", "--version"]).unwrap_err();
        assert_eq!(exit_code(&version), 0);
        let unknown = Cli::try_parse_from(["social-escrow", "transfer"]).unwrap_err();
        assert_eq!(exit_code(&unknown), 1);
    }

    #[test]
    fn test_verify_requires_signature() {
        let result = Cli::try_parse_from([
            "social-escrow",
            "verify",
            "--platform-id",
            "1",
            "--user-id",
            "1",
            "--payout-address",
            "0x1111111111111111111111111111111111111111",
            "--deposit-id",
            "1",
        ]);
        assert!(result.is_err());
    }
}
