//! Private-key holder with derived address, for local transaction signing.

use k256::ecdsa::SigningKey;
use zeroize::Zeroizing;

use crate::address::Address;
use crate::bytes;
use crate::error::EthError;

/// A secp256k1 key pair plus its derived Ethereum address.
///
/// The private key is held in a [`Zeroizing`] buffer so it is wiped from
/// memory when the `Account` is dropped.
pub struct Account {
    private_key: Zeroizing<[u8; 32]>,
    address: Address,
}

impl Account {
    /// Builds an account from a raw 32-byte private key.
    pub fn from_private_key(private_key: [u8; 32]) -> Result<Self, EthError> {
        let signing_key = SigningKey::from_bytes((&private_key).into())
            .map_err(|e| EthError::InvalidPrivateKey(e.to_string()))?;

        let verifying_key = signing_key.verifying_key();
        let uncompressed = verifying_key.to_encoded_point(false);
        let uncompressed_bytes: &[u8] = uncompressed.as_bytes();

        let mut key_65 = [0u8; 65];
        key_65.copy_from_slice(uncompressed_bytes);
        let address = Address::from_uncompressed_pubkey(&key_65)?;

        Ok(Account {
            private_key: Zeroizing::new(private_key),
            address,
        })
    }

    /// Parses a private key from a `0x`-prefixed (or bare) 64-character hex
    /// string.
    pub fn from_private_key_hex(hex_str: &str) -> Result<Self, EthError> {
        let decoded = bytes::from_hex(hex_str)?;
        if decoded.len() != 32 {
            return Err(EthError::InvalidPrivateKey(format!(
                "expected 32 bytes, got {}",
                decoded.len()
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&decoded);
        Self::from_private_key(key)
    }

    /// The account's derived address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The raw private key bytes.
    pub fn private_key_bytes(&self) -> &[u8; 32] {
        &self.private_key
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVKEY: [u8; 32] = {
        let mut key = [0u8; 32];
        key[31] = 1;
        key
    };

    #[test]
    fn from_private_key_derives_known_address() {
        let account = Account::from_private_key(TEST_PRIVKEY).unwrap();
        assert_eq!(
            account.address().to_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn from_private_key_hex_with_prefix() {
        let account = Account::from_private_key_hex(
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        );
        assert!(account.is_err(), "65 bytes of hex is not a valid key");
    }

    #[test]
    fn from_private_key_hex_correct_length() {
        let hex_str = "0000000000000000000000000000000000000000000000000000000000000001";
        // 68 hex chars = 34 bytes, still wrong length; use a correct 64-char key.
        let correct = &hex_str[2..];
        let account = Account::from_private_key_hex(correct).unwrap();
        assert_eq!(
            account.address().to_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn from_private_key_zero_is_rejected() {
        assert!(Account::from_private_key([0u8; 32]).is_err());
    }

    #[test]
    fn private_key_bytes_round_trips() {
        let account = Account::from_private_key(TEST_PRIVKEY).unwrap();
        assert_eq!(account.private_key_bytes(), &TEST_PRIVKEY);
    }

    #[test]
    fn debug_does_not_leak_private_key() {
        let account = Account::from_private_key(TEST_PRIVKEY).unwrap();
        let debug = format!("{:?}", account);
        assert!(!debug.contains("0000000000000000000000000000000000000000000000000000000000000001"));
        assert!(debug.contains("redacted"));
    }
}
