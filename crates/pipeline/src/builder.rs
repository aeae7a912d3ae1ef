use alloy::{
    consensus::{SignableTransaction, TxEnvelope},
    eips::eip2718::Encodable2718,
    signers::SignerSync,
};
use salvage_types::{SignedTx, TxIntent};

/// Sign a fully-specified intent, producing a broadcast-ready transaction.
///
/// This is the whole transaction-builder contract: a validated [`TxIntent`]
/// plus a signing capability bound to the sender, no network access, and a
/// deterministic result (ECDSA signing here is RFC-6979 deterministic, so
/// the same intent and key always produce the same bytes).
pub fn sign_intent<S: SignerSync>(
    intent: &TxIntent,
    signer: &S,
) -> Result<SignedTx, alloy::signers::Error> {
    let tx = intent.to_legacy();
    let signature = signer.sign_hash_sync(&tx.signature_hash())?;
    let envelope: TxEnvelope = tx.into_signed(signature).into();
    Ok(SignedTx::new(
        intent.from(),
        intent.nonce(),
        *envelope.tx_hash(),
        envelope.encoded_2718().into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        primitives::{address, B256, U256},
        signers::local::PrivateKeySigner,
    };
    use salvage_types::CallShape;

    fn wallet() -> PrivateKeySigner {
        PrivateKeySigner::from_bytes(&B256::repeat_byte(3)).unwrap()
    }

    fn intent(nonce: u64) -> TxIntent {
        TxIntent::builder()
            .chain_id(1)
            .from(address!("0x1111111111111111111111111111111111111111"))
            .to(address!("0x2222222222222222222222222222222222222222"))
            .value(U256::from(1_000))
            .gas_limit(21_000)
            .gas_price(120)
            .nonce(nonce)
            .shape(CallShape::NativeTransfer)
            .build()
            .unwrap()
    }

    #[test]
    fn same_intent_same_signer_same_bytes() {
        let signer = wallet();
        let a = sign_intent(&intent(5), &signer).unwrap();
        let b = sign_intent(&intent(5), &signer).unwrap();
        assert_eq!(a.raw(), b.raw());
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn different_nonces_produce_different_bytes() {
        let signer = wallet();
        let a = sign_intent(&intent(5), &signer).unwrap();
        let b = sign_intent(&intent(6), &signer).unwrap();
        assert_ne!(a.raw(), b.raw());
        assert_eq!(a.nonce(), 5);
        assert_eq!(b.nonce(), 6);
    }
}
