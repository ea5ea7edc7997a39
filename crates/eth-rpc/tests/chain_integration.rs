use chain_eth::account::Account;
use chain_eth::address::Address;
use chain_eth::bignumber::BigNumber;
use eth_rpc::transport::FakeTransport;
use eth_rpc::{Chain, RpcError};

fn test_account() -> Account {
    let mut key = [0u8; 32];
    key[31] = 1;
    Account::from_private_key(key).unwrap()
}

#[test]
fn full_send_flow_discovers_chain_fetches_nonce_and_gas_price_then_broadcasts() {
    let transport = FakeTransport::new();
    transport.push_ok(r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#); // eth_chainId
    transport.push_ok(r#"{"jsonrpc":"2.0","id":2,"result":"0x7"}"#); // nonce
    transport.push_ok(r#"{"jsonrpc":"2.0","id":3,"result":"0x3b9aca00"}"#); // gas price
    transport.push_ok(r#"{"jsonrpc":"2.0","id":4,"result":"0xfeed"}"#); // send raw tx

    let mut chain = Chain::discover("http://localhost:8545", transport);
    chain.start().unwrap();
    assert_eq!(chain.chain_id(), Some(1));

    let account = test_account();
    let to = Address::from_bytes([0x11u8; 20]);

    let tx_hash = chain
        .send(&account, to, BigNumber::from_u64(1_000_000_000_000_000_000), 21_000, None, Vec::new())
        .unwrap();

    assert_eq!(tx_hash, "0xfeed");
}

#[test]
fn rpc_error_during_send_raw_transaction_propagates_code_and_message() {
    let transport = FakeTransport::new();
    transport.push_ok(r#"{"jsonrpc":"2.0","id":1,"result":"0x0"}"#); // nonce
    transport.push_ok(r#"{"jsonrpc":"2.0","id":2,"result":"0x1"}"#); // gas price
    transport.push_ok(r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32003,"message":"nonce too low"}}"#);

    let mut chain = Chain::new("http://localhost:8545", 1, transport);
    chain.start().unwrap();

    let account = test_account();
    let to = Address::from_bytes([0x22u8; 20]);

    let err = chain
        .send(&account, to, BigNumber::zero(), 21_000, None, Vec::new())
        .unwrap_err();

    match err {
        RpcError::Rpc { code, message } => {
            assert_eq!(code, -32003);
            assert_eq!(message, "nonce too low");
        }
        other => panic!("expected Rpc error, got {other:?}"),
    }
}

#[test]
fn instrumented_calls_run_under_a_tracing_subscriber() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = FakeTransport::new();
    transport.push_ok(r#"{"jsonrpc":"2.0","id":1,"result":"0x4"}"#);

    let chain = Chain::new("http://localhost:8545", 1, transport);
    let price = chain.gas_price().unwrap();
    assert_eq!(price.to_u32().unwrap(), 4);
}

#[test]
fn balance_and_transaction_count_round_trip_hex_values() {
    let transport = FakeTransport::new();
    transport.push_ok(r#"{"jsonrpc":"2.0","id":1,"result":"0xde0b6b3a7640000"}"#);
    transport.push_ok(r#"{"jsonrpc":"2.0","id":2,"result":"0x2a"}"#);

    let chain = Chain::new("http://localhost:8545", 1, transport);
    let addr = Address::from_bytes([0x33u8; 20]);

    let balance = chain.balance(addr).unwrap();
    assert_eq!(balance.decimal_string(), "1000000000000000000");

    let nonce = chain.transaction_count(addr).unwrap();
    assert_eq!(nonce.to_u32().unwrap(), 42);
}
