//! Requests, payloads and a wired dispatcher for end-to-end scenarios.

use std::io::Cursor;

use alpen_oracle_codec::{hex_encode, Address, SelectorRegistry, U256};
use alpen_oracle_engine::{
    CompliancePolicy, Dispatcher, EvidenceVerifier, KnownAddresses, RewardConfig, RollupRequest,
};
use alpen_oracle_perception::{
    Detector, DetectorConfig, EllipticEnvelope, EnvelopeParams, InferenceBackend,
    PerceptionResult, Tensor,
};
use base64::{prelude::BASE64_STANDARD, Engine};
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::json;

pub const RELAY: Address = Address::repeat_byte(0x01);
pub const ETHER_PORTAL: Address = Address::repeat_byte(0x02);
pub const ERC20_PORTAL: Address = Address::repeat_byte(0x03);
pub const ERC721_PORTAL: Address = Address::repeat_byte(0x04);
pub const VERIFIER: Address = Address::repeat_byte(0x05);
pub const REWARD_CONTRACT: Address = Address::repeat_byte(0x06);
pub const RECIPIENT: Address = Address::repeat_byte(0x07);
pub const REWARD_AMOUNT: u64 = 10;
pub const TOKEN: Address = Address::repeat_byte(0xaa);
pub const DEPOSITOR: Address = Address::repeat_byte(0xbb);
pub const DAPP: Address = Address::repeat_byte(0xdd);
pub const STRANGER: Address = Address::repeat_byte(0x99);

pub const GREEN: [u8; 3] = [10, 200, 10];
pub const GREY: [u8; 3] = [90, 90, 90];

/// In-range reading for [`envelope`].
pub const NORMAL_TEMPERATURE: f64 = 25.0;
/// Far outside [`envelope`].
pub const OUTLIER_TEMPERATURE: f64 = 400.0;

/// Reports a single object whenever the canvas center is green.
///
/// Stands in for a model server so scenarios stay deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreenObjectBackend;

impl InferenceBackend for GreenObjectBackend {
    fn invoke(&self, input: &Tensor) -> PerceptionResult<Tensor> {
        let side = input.shape()[1];
        let center = ((side / 2) * side + side / 2) * 3;
        let data = input.data();
        let green = data[center + 1] > 0.4 && data[center] < 0.2;
        let conf = if green { 0.9 } else { 0.05 };
        Tensor::new(vec![1, 5, 1], vec![0.5, 0.5, 0.2, 0.2, conf])
    }
}

pub fn addresses() -> KnownAddresses {
    KnownAddresses {
        relay: RELAY,
        ether_portal: ETHER_PORTAL,
        erc20_portal: ERC20_PORTAL,
        erc721_portal: ERC721_PORTAL,
        trusted_verifier_sender: VERIFIER,
        voucher_destination: None,
    }
}

pub fn reward() -> RewardConfig {
    RewardConfig {
        contract: REWARD_CONTRACT,
        recipient: RECIPIENT,
        amount: U256::from(REWARD_AMOUNT),
    }
}

/// Envelope fitted around (25 C, 60 %, 40 AQI).
pub fn envelope() -> EllipticEnvelope {
    EllipticEnvelope::new(EnvelopeParams {
        location: [25.0, 60.0, 40.0],
        precision: [[0.04, 0.0, 0.0], [0.0, 0.01, 0.0], [0.0, 0.0, 0.01]],
        offset: -9.0,
    })
    .expect("valid envelope")
}

pub fn dispatcher_with<B: InferenceBackend>(
    backend: B,
    policy: CompliancePolicy,
) -> Dispatcher<B, EllipticEnvelope> {
    let verifier =
        EvidenceVerifier::new(Detector::new(backend, DetectorConfig::default()), envelope());
    Dispatcher::new(addresses(), reward(), verifier, policy)
}

pub fn dispatcher(policy: CompliancePolicy) -> Dispatcher<GreenObjectBackend, EllipticEnvelope> {
    dispatcher_with(GreenObjectBackend, policy)
}

/// Parses an advance request from the JSON the rollup server sends.
pub fn advance(sender: Address, input_index: u64, payload: &[u8]) -> RollupRequest {
    serde_json::from_value(json!({
        "request_type": "advance_state",
        "data": {
            "metadata": {
                "msg_sender": hex_encode(sender),
                "epoch_index": 0,
                "input_index": input_index,
                "block_number": 100 + input_index,
                "timestamp": 1_700_000_000 + input_index,
            },
            "payload": hex_encode(payload),
        }
    }))
    .expect("advance request json")
}

/// Parses an inspect request from the JSON the rollup server sends.
pub fn inspect(payload: &[u8]) -> RollupRequest {
    serde_json::from_value(json!({
        "request_type": "inspect_state",
        "data": { "payload": hex_encode(payload) }
    }))
    .expect("inspect request json")
}

pub fn word(value: u64) -> [u8; 32] {
    U256::from(value).to_be_bytes::<32>()
}

pub fn ether_deposit(depositor: Address, amount: u64) -> Vec<u8> {
    let mut payload = depositor.to_vec();
    payload.extend_from_slice(&word(amount));
    payload
}

pub fn erc20_deposit(success: bool, token: Address, depositor: Address, amount: u64) -> Vec<u8> {
    let mut payload = vec![u8::from(success)];
    payload.extend_from_slice(token.as_slice());
    payload.extend_from_slice(depositor.as_slice());
    payload.extend_from_slice(&word(amount));
    payload
}

pub fn erc721_deposit(token: Address, depositor: Address, token_id: u64) -> Vec<u8> {
    let mut payload = token.to_vec();
    payload.extend_from_slice(depositor.as_slice());
    payload.extend_from_slice(&word(token_id));
    payload
}

/// Solid-color PNG.
pub fn png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(width, height, Rgb(color))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("png encoding");
    bytes
}

/// Real-world data JSON as the verifier contract forwards it.
pub fn evidence_json(temperature: f64, color: [u8; 3]) -> String {
    json!({
        "temperature": temperature,
        "humidity": 60.0,
        "air_quality": 40.0,
        "image": BASE64_STANDARD.encode(png(48, 32, color)),
    })
    .to_string()
}

/// Verifier input: selector followed by the evidence text.
pub fn evidence(temperature: f64, color: [u8; 3]) -> Vec<u8> {
    let mut payload = SelectorRegistry::new().verifier().to_vec();
    payload.extend_from_slice(evidence_json(temperature, color).as_bytes());
    payload
}
