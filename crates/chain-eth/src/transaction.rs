//! Transaction assembly and signing: legacy EIP-155 transactions (the
//! default) and EIP-1559 type-2 transactions (opt in explicitly).

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey};
use sha3::{Digest, Keccak256};

use crate::account::Account;
use crate::address::Address;
use crate::bignumber::BigNumber;
use crate::bytes;
use crate::error::EthError;
use crate::rlp::{self, RlpItem};

/// Which signature scheme a transaction is built and signed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningStandard {
    /// Legacy transactions, signed per EIP-155 (`v = recovery_id + chain_id*2 + 35`).
    Legacy,
    /// EIP-1559 type-2 transactions, with `v` as a bare y-parity bit.
    Eip1559,
}

/// Chain and fee parameters shared by every transaction built for a given
/// account and network.
#[derive(Debug, Clone)]
pub struct TransactionProperties {
    pub chain_id: u32,
    pub nonce: u32,
    pub gas_limit: u32,
    pub standard: SigningStandard,
    /// Legacy gas price; `None` for EIP-1559 transactions.
    pub gas_price: Option<BigNumber>,
    /// EIP-1559 priority fee; `None` for legacy transactions.
    pub max_priority_fee_per_gas: Option<BigNumber>,
    /// EIP-1559 max fee; `None` for legacy transactions.
    pub max_fee_per_gas: Option<BigNumber>,
}

impl TransactionProperties {
    /// Builds properties for a legacy, EIP-155-signed transaction.
    pub fn new_legacy(chain_id: u32, nonce: u32, gas_price: BigNumber, gas_limit: u32) -> Self {
        TransactionProperties {
            chain_id,
            nonce,
            gas_limit,
            standard: SigningStandard::Legacy,
            gas_price: Some(gas_price),
            max_priority_fee_per_gas: None,
            max_fee_per_gas: None,
        }
    }

    /// Builds properties for an EIP-1559 type-2 transaction.
    pub fn new_eip1559(
        chain_id: u32,
        nonce: u32,
        max_priority_fee_per_gas: BigNumber,
        max_fee_per_gas: BigNumber,
        gas_limit: u32,
    ) -> Self {
        TransactionProperties {
            chain_id,
            nonce,
            gas_limit,
            standard: SigningStandard::Eip1559,
            gas_price: None,
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
            max_fee_per_gas: Some(max_fee_per_gas),
        }
    }
}

/// An unsigned transaction ready to be signed by an [`Account`].
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    pub properties: TransactionProperties,
    pub to: Address,
    pub value: BigNumber,
    pub data: Vec<u8>,
}

/// Builds an unsigned ETH transfer (empty calldata).
pub fn build_transfer(properties: TransactionProperties, to: Address, value: BigNumber) -> UnsignedTransaction {
    UnsignedTransaction {
        properties,
        to,
        value,
        data: Vec::new(),
    }
}

/// Builds an unsigned contract call transaction from pre-encoded calldata.
pub fn build_contract_call(
    properties: TransactionProperties,
    to: Address,
    value: BigNumber,
    data: Vec<u8>,
) -> UnsignedTransaction {
    UnsignedTransaction {
        properties,
        to,
        value,
        data,
    }
}

/// The `(v, r, s)` components of an ECDSA signature over a transaction or
/// message hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub v: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

/// A transaction signed and ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub unsigned: UnsignedTransaction,
    pub signature: Signature,
    raw: Vec<u8>,
    tx_hash: [u8; 32],
}

impl SignedTransaction {
    /// The fully RLP-encoded (and, for EIP-1559, type-prefixed) transaction
    /// bytes, ready to submit via `eth_sendRawTransaction`.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// `0x`-prefixed lowercase hex of [`Self::raw_bytes`].
    pub fn raw_hex(&self) -> String {
        bytes::add_hex_prefix(&bytes::to_hex(&self.raw).to_lowercase())
    }

    /// The Keccak-256 hash of the raw signed transaction.
    pub fn tx_hash(&self) -> &[u8; 32] {
        &self.tx_hash
    }

    /// `0x`-prefixed lowercase hex of [`Self::tx_hash`].
    pub fn tx_hash_hex(&self) -> String {
        bytes::add_hex_prefix(&bytes::to_hex(&self.tx_hash).to_lowercase())
    }
}

/// Signs `unsigned` with `account`'s private key, dispatching on the
/// transaction's [`SigningStandard`].
pub fn sign(unsigned: &UnsignedTransaction, account: &Account) -> Result<SignedTransaction, EthError> {
    match unsigned.properties.standard {
        SigningStandard::Legacy => sign_legacy(unsigned, account),
        SigningStandard::Eip1559 => sign_eip1559(unsigned, account),
    }
}

fn sign_legacy(unsigned: &UnsignedTransaction, account: &Account) -> Result<SignedTransaction, EthError> {
    let gas_price = unsigned
        .properties
        .gas_price
        .as_ref()
        .ok_or_else(|| EthError::TransactionBuildError("legacy transaction missing gas_price".into()))?;

    let chain_id = unsigned.properties.chain_id as u64;

    let unsigned_fields = vec![
        RlpItem::uint(unsigned.properties.nonce as u64),
        RlpItem::string(gas_price.bytes().to_vec()),
        RlpItem::uint(unsigned.properties.gas_limit as u64),
        RlpItem::string(unsigned.to.as_bytes().to_vec()),
        RlpItem::string(unsigned.value.bytes().to_vec()),
        RlpItem::string(unsigned.data.clone()),
        RlpItem::uint(chain_id),
        RlpItem::string(vec![]),
        RlpItem::string(vec![]),
    ];
    let unsigned_payload = rlp::encode(&RlpItem::list(unsigned_fields))?;
    let msg_hash = Keccak256::digest(&unsigned_payload);

    let (ecdsa_sig, recovery_id) = sign_prehash(msg_hash.as_slice(), account)?;
    let v = chain_id * 2 + 35 + recovery_id.is_y_odd() as u64;
    let (r, s) = signature_components(&ecdsa_sig);

    let signed_fields = vec![
        RlpItem::uint(unsigned.properties.nonce as u64),
        RlpItem::string(gas_price.bytes().to_vec()),
        RlpItem::uint(unsigned.properties.gas_limit as u64),
        RlpItem::string(unsigned.to.as_bytes().to_vec()),
        RlpItem::string(unsigned.value.bytes().to_vec()),
        RlpItem::string(unsigned.data.clone()),
        RlpItem::uint(v),
        RlpItem::string(bytes::truncate_leading_zeros(&r)),
        RlpItem::string(bytes::truncate_leading_zeros(&s)),
    ];
    let raw = rlp::encode(&RlpItem::list(signed_fields))?;
    let tx_hash = keccak_array(&raw);

    Ok(SignedTransaction {
        unsigned: unsigned.clone(),
        signature: Signature { v, r, s },
        raw,
        tx_hash,
    })
}

fn sign_eip1559(unsigned: &UnsignedTransaction, account: &Account) -> Result<SignedTransaction, EthError> {
    let priority_fee = unsigned.properties.max_priority_fee_per_gas.as_ref().ok_or_else(|| {
        EthError::TransactionBuildError("eip-1559 transaction missing max_priority_fee_per_gas".into())
    })?;
    let max_fee = unsigned.properties.max_fee_per_gas.as_ref().ok_or_else(|| {
        EthError::TransactionBuildError("eip-1559 transaction missing max_fee_per_gas".into())
    })?;

    let unsigned_fields = vec![
        RlpItem::uint(unsigned.properties.chain_id as u64),
        RlpItem::uint(unsigned.properties.nonce as u64),
        RlpItem::string(priority_fee.bytes().to_vec()),
        RlpItem::string(max_fee.bytes().to_vec()),
        RlpItem::uint(unsigned.properties.gas_limit as u64),
        RlpItem::string(unsigned.to.as_bytes().to_vec()),
        RlpItem::string(unsigned.value.bytes().to_vec()),
        RlpItem::string(unsigned.data.clone()),
        RlpItem::list(vec![]), // empty access list
    ];
    let unsigned_rlp = rlp::encode(&RlpItem::list(unsigned_fields))?;
    let mut unsigned_payload = Vec::with_capacity(1 + unsigned_rlp.len());
    unsigned_payload.push(0x02);
    unsigned_payload.extend(unsigned_rlp);

    let msg_hash = Keccak256::digest(&unsigned_payload);
    let (ecdsa_sig, recovery_id) = sign_prehash(msg_hash.as_slice(), account)?;
    let v = recovery_id.is_y_odd() as u64;
    let (r, s) = signature_components(&ecdsa_sig);

    let signed_fields = vec![
        RlpItem::uint(unsigned.properties.chain_id as u64),
        RlpItem::uint(unsigned.properties.nonce as u64),
        RlpItem::string(priority_fee.bytes().to_vec()),
        RlpItem::string(max_fee.bytes().to_vec()),
        RlpItem::uint(unsigned.properties.gas_limit as u64),
        RlpItem::string(unsigned.to.as_bytes().to_vec()),
        RlpItem::string(unsigned.value.bytes().to_vec()),
        RlpItem::string(unsigned.data.clone()),
        RlpItem::list(vec![]),
        RlpItem::uint(v),
        RlpItem::string(bytes::truncate_leading_zeros(&r)),
        RlpItem::string(bytes::truncate_leading_zeros(&s)),
    ];
    let signed_rlp = rlp::encode(&RlpItem::list(signed_fields))?;
    let mut raw = Vec::with_capacity(1 + signed_rlp.len());
    raw.push(0x02);
    raw.extend(signed_rlp);

    let tx_hash = keccak_array(&raw);

    Ok(SignedTransaction {
        unsigned: unsigned.clone(),
        signature: Signature { v, r, s },
        raw,
        tx_hash,
    })
}

fn sign_prehash(hash: &[u8], account: &Account) -> Result<(EcdsaSignature, RecoveryId), EthError> {
    let signing_key = SigningKey::from_bytes(account.private_key_bytes().into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()))?;
    signing_key
        .sign_prehash(hash)
        .map_err(|e| EthError::SigningError(e.to_string()))
}

fn signature_components(sig: &EcdsaSignature) -> ([u8; 32], [u8; 32]) {
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig.r().to_bytes());
    s.copy_from_slice(&sig.s().to_bytes());
    (r, s)
}

fn keccak_array(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// Signs an arbitrary message using EIP-191 personal_sign.
///
/// Hashes as `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`
/// and returns the 65-byte signature (`r || s || v`) with `v` as 27 or 28.
pub fn sign_personal_message(message: &[u8], account: &Account) -> Result<Vec<u8>, EthError> {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    let msg_hash = hasher.finalize();

    let (sig, recovery_id) = sign_prehash(msg_hash.as_slice(), account)?;
    let (r, s) = signature_components(&sig);

    let mut out = Vec::with_capacity(65);
    out.extend_from_slice(&r);
    out.extend_from_slice(&s);
    out.push(recovery_id.is_y_odd() as u8 + 27);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVKEY: [u8; 32] = {
        let mut key = [0u8; 32];
        key[31] = 1;
        key
    };

    fn test_account() -> Account {
        Account::from_private_key(TEST_PRIVKEY).unwrap()
    }

    fn test_to() -> Address {
        Address::parse("0x000000000000000000000000000000000000dEaD").unwrap()
    }

    #[test]
    fn build_transfer_has_empty_data() {
        let props = TransactionProperties::new_legacy(1, 0, BigNumber::from_u64(50_000_000_000), 21_000);
        let tx = build_transfer(props, test_to(), BigNumber::from_u64(1_000_000_000_000_000_000));
        assert!(tx.data.is_empty());
        assert_eq!(tx.properties.chain_id, 1);
    }

    #[test]
    fn sign_legacy_produces_eip155_v() {
        let props = TransactionProperties::new_legacy(1, 0, BigNumber::from_u64(50_000_000_000), 21_000);
        let tx = build_transfer(props, test_to(), BigNumber::zero());
        let signed = sign(&tx, &test_account()).unwrap();

        assert!(signed.signature.v == 37 || signed.signature.v == 38);
    }

    #[test]
    fn sign_legacy_is_deterministic() {
        let props = TransactionProperties::new_legacy(1, 0, BigNumber::from_u64(50_000_000_000), 21_000);
        let tx = build_transfer(props, test_to(), BigNumber::zero());

        let signed1 = sign(&tx, &test_account()).unwrap();
        let signed2 = sign(&tx, &test_account()).unwrap();

        assert_eq!(signed1.raw_bytes(), signed2.raw_bytes());
        assert_eq!(signed1.tx_hash(), signed2.tx_hash());
    }

    #[test]
    fn sign_legacy_different_chain_ids_change_v() {
        let props1 = TransactionProperties::new_legacy(1, 0, BigNumber::from_u64(1), 21_000);
        let props137 = TransactionProperties::new_legacy(137, 0, BigNumber::from_u64(1), 21_000);

        let tx1 = build_transfer(props1, test_to(), BigNumber::zero());
        let tx137 = build_transfer(props137, test_to(), BigNumber::zero());

        let signed1 = sign(&tx1, &test_account()).unwrap();
        let signed137 = sign(&tx137, &test_account()).unwrap();

        assert_ne!(signed1.signature.v, signed137.signature.v);
        assert_ne!(signed1.raw_bytes(), signed137.raw_bytes());
    }

    #[test]
    fn sign_legacy_missing_gas_price_errors() {
        let mut props = TransactionProperties::new_legacy(1, 0, BigNumber::from_u64(1), 21_000);
        props.gas_price = None;
        let tx = build_transfer(props, test_to(), BigNumber::zero());

        assert!(sign(&tx, &test_account()).is_err());
    }

    #[test]
    fn sign_eip1559_uses_type_prefix_and_bare_parity() {
        let props = TransactionProperties::new_eip1559(
            1,
            0,
            BigNumber::from_u64(1_000_000_000),
            BigNumber::from_u64(50_000_000_000),
            21_000,
        );
        let tx = build_transfer(props, test_to(), BigNumber::zero());
        let signed = sign(&tx, &test_account()).unwrap();

        assert_eq!(signed.raw_bytes()[0], 0x02);
        assert!(signed.signature.v == 0 || signed.signature.v == 1);
    }

    #[test]
    fn sign_eip1559_missing_fees_errors() {
        let mut props = TransactionProperties::new_eip1559(
            1,
            0,
            BigNumber::from_u64(1),
            BigNumber::from_u64(1),
            21_000,
        );
        props.max_fee_per_gas = None;
        let tx = build_transfer(props, test_to(), BigNumber::zero());

        assert!(sign(&tx, &test_account()).is_err());
    }

    #[test]
    fn tx_hash_hex_is_well_formed() {
        let props = TransactionProperties::new_legacy(1, 0, BigNumber::from_u64(1), 21_000);
        let tx = build_transfer(props, test_to(), BigNumber::zero());
        let signed = sign(&tx, &test_account()).unwrap();

        let hex = signed.tx_hash_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 66);
    }

    #[test]
    fn sign_personal_message_produces_65_bytes_with_legacy_v() {
        let sig = sign_personal_message(b"hello", &test_account()).unwrap();
        assert_eq!(sig.len(), 65);
        assert!(sig[64] == 27 || sig[64] == 28);
    }

    #[test]
    fn build_contract_call_carries_data() {
        let props = TransactionProperties::new_legacy(1, 0, BigNumber::from_u64(1), 65_000);
        let tx = build_contract_call(props, test_to(), BigNumber::zero(), vec![0xde, 0xad]);
        assert_eq!(tx.data, vec![0xde, 0xad]);
    }
}
