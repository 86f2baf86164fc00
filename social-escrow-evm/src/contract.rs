//! Solidity interface of the escrow contract.
//!
//! Only the functions and events the client uses are declared.

use alloy_sol_types::sol;

use crate::attestation::Attestation;

sol! {
    /// Escrow contract holding deposits until an attested claim or refund.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface ISocialEscrow {
        struct ClaimAttestation {
            uint8 platformId;
            uint256 userId;
            address payoutAddress;
            uint256 depositId;
            uint256 nonce;
            uint64 expiry;
        }

        event DepositCreated(
            uint256 indexed depositId,
            address indexed depositor,
            uint256 amount,
            uint8 platformId,
            uint256 recipientUserId,
            uint256 depositorUserId,
            string contentUri
        );

        function deposit(
            uint8 platformId,
            uint256 recipientUserId,
            uint256 depositorUserId,
            string contentUri
        ) external payable returns (uint256 depositId);

        function claim(
            uint256 depositId,
            address payoutAddress,
            ClaimAttestation attestation,
            bytes signature
        ) external;

        function refund(uint256 depositId) external;

        function deposits(uint256 depositId) external view returns (
            address depositor,
            uint256 amount,
            uint8 platformId,
            uint256 recipientUserId,
            uint256 depositorUserId,
            string contentUri,
            bool claimed
        );
    }
}

impl From<&Attestation> for ISocialEscrow::ClaimAttestation {
    fn from(value: &Attestation) -> Self {
        Self {
            platformId: value.platform_id,
            userId: value.user_id,
            payoutAddress: value.payout_address,
            depositId: value.deposit_id,
            nonce: value.nonce,
            expiry: value.expiry.as_secs(),
        }
    }
}
