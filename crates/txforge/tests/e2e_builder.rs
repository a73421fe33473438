//! End-to-end builder flows through the public facade: configuration on
//! disk, registry lookup, build, sign, serialize and parse back.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tempfile::TempDir;
use txforge::chain::mock::BareFamily;
use txforge::chain::Erc20Call;
use txforge::config_loader::ConfigLoader;
use txforge::crypto::{Ed25519KeyPair, KeyPair, Secp256k1KeyPair};
use txforge::logging::{init_logging, LogConfig, LogError, LogLevel};
use txforge::prelude::*;
use txforge::{BuilderState, Config, EthTransaction, StakeTransaction, U256};

const ETH_KEY: &str = "fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19";
const ETH_SENDER: &str = "0x96216849c49358b10257cb55b28ea603c874b05e";
const RECIPIENT: &str = "0x3535353535353535353535353535353535353535";

fn stake_account(seed: u8) -> String {
    Ed25519KeyPair::from_seed([seed; 32]).public_key().account_hex()
}

// ============================================================================
// Ethereum
// ============================================================================

#[test]
fn ethereum_build_sign_parse() {
    let registry = ChainRegistry::new();

    let mut builder = registry.ethereum_builder("eth").unwrap();
    builder
        .source(ETH_SENDER)
        .unwrap()
        .fee("20000000000")
        .unwrap()
        .nonce(9)
        .unwrap()
        .to(RECIPIENT)
        .unwrap()
        .value("1000000000000000000")
        .unwrap();
    builder.build().unwrap();
    builder.sign(ETH_KEY).unwrap();
    assert_eq!(builder.state(), BuilderState::Built);

    let signed = builder.into_transaction().unwrap();
    let serialized = signed.to_serialized();

    let mut parsed = registry.ethereum_builder("eth").unwrap();
    parsed.from(serialized.as_str()).unwrap();
    assert_eq!(parsed.state(), BuilderState::Parsed);
    assert_eq!(parsed.common().source.as_deref(), Some(ETH_SENDER));
    assert_eq!(parsed.family().nonce(), Some(9));

    let reparsed = parsed.build().unwrap();
    assert_eq!(reparsed.to_serialized(), serialized);
    assert_eq!(reparsed.id(), signed.id());

    let json = reparsed.to_json().unwrap();
    assert_eq!(json["from"], ETH_SENDER);
    assert_eq!(json["to"], RECIPIENT);
    assert_eq!(json["value"], "1000000000000000000");
    assert_eq!(json["chainId"], "0x1");
}

#[test]
fn ethereum_concrete_scenario_is_deterministic() {
    let sign_once = || {
        let registry = ChainRegistry::new();
        let mut builder = registry.ethereum_builder("eth").unwrap();
        builder.fee(100u64).unwrap().nonce(0).unwrap().value(0u64).unwrap();
        builder.build().unwrap();
        builder.sign(ETH_KEY).unwrap();
        builder.into_transaction().unwrap()
    };

    let first = sign_once();
    let second = sign_once();
    assert_eq!(first.to_serialized(), second.to_serialized());
    assert!(first.to_serialized().starts_with("0x"));

    let key = Secp256k1KeyPair::from_private_hex(ETH_KEY).unwrap();
    let sender = first.sender().map(|address| address.0 .0);
    assert_eq!(sender, Some(key.public_key().ethereum_address()));
}

#[test]
fn ethereum_testnet_parses_into_mainnet_builder_without_validation() {
    let registry = ChainRegistry::new();
    let mut testnet = registry.ethereum_builder("teth").unwrap();
    testnet.fee(1u64).unwrap().nonce(0).unwrap().value(1u64).unwrap();
    let serialized = testnet.build().unwrap().to_serialized();

    let mut mainnet = registry.ethereum_builder("eth").unwrap();
    mainnet.from(serialized.as_str()).unwrap();
    assert_eq!(mainnet.transaction().unwrap().chain_id(), Some(11_155_111));
}

#[test]
fn ethereum_erc20_payload_reaches_the_wire() {
    let registry = ChainRegistry::new();
    let mut builder = registry.ethereum_builder("eth").unwrap();
    builder
        .fee(1u64)
        .unwrap()
        .nonce(1)
        .unwrap()
        .value(0u64)
        .unwrap()
        .gas_limit(60_000)
        .unwrap()
        .erc20_transfer(
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            RECIPIENT,
            "2500000",
        )
        .unwrap();
    let tx = builder.build().unwrap();

    let parsed = EthTransaction::from_serialized(&tx.to_serialized()).unwrap();
    match parsed.erc20_call().unwrap() {
        Erc20Call::Transfer { to, amount } => {
            assert_eq!(format!("{to:#x}"), RECIPIENT);
            assert_eq!(amount, U256::from(2_500_000u64));
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

// ============================================================================
// Stake
// ============================================================================

#[test]
fn stake_multisig_across_builders() {
    let registry = ChainRegistry::new();

    let mut first = registry.stake_builder("tstake").unwrap();
    first
        .source(&stake_account(1))
        .unwrap()
        .fee("100000000")
        .unwrap()
        .target(&stake_account(2))
        .unwrap()
        .amount("500000000000")
        .unwrap()
        .timestamp(1_700_000_000_000)
        .unwrap()
        .threshold(2)
        .unwrap();
    first.build().unwrap();
    first.sign(&hex::encode([1u8; 32])).unwrap();
    let partially = first.transaction().unwrap().to_serialized();
    assert!(!first.transaction().unwrap().is_fully_signed());

    let mut second = registry.stake_builder("tstake").unwrap();
    second.from(partially.as_str()).unwrap();
    second.sign(&hex::encode([3u8; 32])).unwrap();

    let tx = second.transaction().unwrap();
    assert!(tx.is_fully_signed());
    let fields = tx.to_canonical_fields();
    let signers: Vec<&str> = fields.approvals.iter().map(|a| a.signer.as_str()).collect();
    assert_eq!(signers, vec![stake_account(1), stake_account(3)]);

    let reparsed = StakeTransaction::from_serialized(&tx.to_serialized()).unwrap();
    assert_eq!(reparsed.id(), tx.id());
}

#[test]
fn stake_rejects_ethereum_wire() {
    let registry = ChainRegistry::new();
    let mut eth = registry.ethereum_builder("eth").unwrap();
    eth.fee(1u64).unwrap().nonce(0).unwrap().value(0u64).unwrap();
    let serialized = eth.build().unwrap().to_serialized();

    let mut stake = registry.stake_builder("stake").unwrap();
    let err = stake.from(serialized.as_str()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseTransaction);
    assert_eq!(stake.state(), BuilderState::Empty);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn registry_from_config_on_disk() {
    let temp = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(temp.path().to_path_buf());

    let mut strict = ChainConfig::ethereum_mainnet().with_transaction_validation(true);
    strict.name = "strict-eth".to_string();
    loader.save(&Config::default().with_chain(strict)).unwrap();

    let config = loader.load_required().unwrap();
    let registry = ChainRegistry::from_config(&config);
    assert!(registry.supports("strict-eth"));

    let mut builder = registry.ethereum_builder("strict-eth").unwrap();
    builder
        .fee(1u64)
        .unwrap()
        .nonce(0)
        .unwrap()
        .value(0u64)
        .unwrap()
        .chain_id(5)
        .unwrap();
    let err = builder.build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransaction);

    builder.chain_id(1).unwrap();
    assert!(builder.build().is_ok());
}

#[test]
fn missing_config_falls_back_to_builtin_chains() {
    let temp = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(temp.path().join("absent"));
    let registry = ChainRegistry::from_config(&loader.load().unwrap());
    assert_eq!(registry.supported_chains(), vec!["eth", "stake", "teth", "tstake"]);
}

// ============================================================================
// Unsupported families and logging
// ============================================================================

#[test]
fn unsupported_family_reports_not_implemented() {
    let mut builder = TransactionBuilder::<BareFamily>::new(ChainConfig::stake_testnet()).unwrap();

    let checks = [
        builder.source("anything").map(|_| ()).unwrap_err(),
        builder.signature("00", "00").map(|_| ()).unwrap_err(),
        builder.from("abcd").map(|_| ()).unwrap_err(),
    ];
    // the fee needs no family support
    builder.fee(1u64).unwrap();

    for err in checks {
        assert_eq!(err.kind(), ErrorKind::NotImplemented, "{err}");
        assert_eq!(err.kind().name(), "NotImplementedError");
    }
    assert_eq!(builder.build().unwrap_err().kind(), ErrorKind::NotImplemented);
}

#[test]
fn logging_installs_once() {
    let config = LogConfig {
        level: LogLevel::Debug,
        respect_env: false,
        ..LogConfig::default()
    };
    init_logging(&config).unwrap();

    // builders emit through the installed subscriber
    let registry = ChainRegistry::new();
    let mut builder = registry.ethereum_builder("eth").unwrap();
    builder.fee(1u64).unwrap();

    let err = init_logging(&config).unwrap_err();
    assert!(matches!(err, LogError::SubscriberInit(_)));
}
