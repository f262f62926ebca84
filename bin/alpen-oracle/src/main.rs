//! Alpen rollup oracle
//!
//! Pulls requests from the rollup HTTP server, refunds portal deposits,
//! validates evidence submitted by the verifier contract and issues the
//! reward voucher once the evidence holds up.

mod args;
mod config;
mod errors;
mod helpers;
mod model_server;
mod networks;
mod transport;

use std::time::Duration;

use alpen_oracle_common::{logging, retry::retry_with_backoff};
use alpen_oracle_engine::{Dispatcher, EvidenceVerifier, RollupRunner};
use alpen_oracle_perception::Detector;
use args::{Args, EnvArgs};
use config::Config;
use errors::InitError;
use helpers::load_classifier;
use model_server::ModelServerBackend;
use networks::load_known_addresses;
use tracing::*;
use transport::HttpTransport;

const SERVICE_NAME: &str = "alpen-oracle";

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    if let Err(e) = main_inner(args) {
        eprintln!("FATAL ERROR: {e}");

        return Err(e.into());
    }

    Ok(())
}

fn main_inner(args: Args) -> Result<(), InitError> {
    let env_args = EnvArgs::from_env();
    let config = Config::load(&args, &env_args)?;

    // Init the logging before we do anything else.
    init_logging(&config);

    let addresses = load_known_addresses(&config.networks_file, config.network())?;
    info!(
        network = %config.network(),
        relay = %addresses.relay,
        verifier = %addresses.trusted_verifier_sender,
        "loaded network addresses"
    );
    let reward = config.reward.to_reward_config()?;
    let classifier = load_classifier(&config.classifier.params_path)?;

    let backend = ModelServerBackend::new(&config.model_server)?;
    retry_with_backoff(
        "model_server_probe",
        &config.model_server.startup_retry,
        || backend.probe(),
    )?;

    let verifier = EvidenceVerifier::new(Detector::new(backend, config.detector), classifier);
    let dispatcher = Dispatcher::new(addresses, reward, verifier, config.compliance_policy);

    let timeout = config.http_timeout_secs.map(Duration::from_secs);
    let transport = HttpTransport::new(config.rollup_url(), timeout)?;

    info!(
        url = %config.rollup_url(),
        policy = ?config.compliance_policy,
        "starting rollup request loop"
    );
    RollupRunner::new(transport, dispatcher)
        .with_backoff(config.finish_retry.clone())
        .run_while(|| true);

    Ok(())
}

/// Sets up the logging system from the `[logging]` table, with env overrides
/// already applied.
fn init_logging(config: &Config) {
    let lconfig = config.logging.to_logger_config(SERVICE_NAME);
    let file_sink = lconfig.file.clone();

    logging::init(lconfig);

    if let Some(sink) = file_sink {
        info!(
            log_dir = %sink.directory.display(),
            log_prefix = %sink.file_name_prefix,
            rotation = ?sink.rotation,
            "file logging enabled"
        );
    }
}
