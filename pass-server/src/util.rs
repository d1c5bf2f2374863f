use pass_core::assets::FsAssetStore;
use pass_core::pipeline::PassGenerator;
use pass_core::signer::OpensslSigner;
use rand::Rng;

use crate::opts::PipelineOpts;
use crate::PassServerError;

pub(crate) const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// A random identifier for correlating the log lines of one request.
pub(crate) fn request_id() -> String {
    format!("{:016x}", rand::thread_rng().gen::<u64>())
}

/// Load the configuration and credentials and assemble the pipeline.
pub(crate) fn build_generator(opts: &PipelineOpts) -> Result<PassGenerator, PassServerError> {
    let config = crate::config::load(&opts.config)?;

    let signer = OpensslSigner::from_files(
        &opts.certificate_path,
        &opts.key_path,
        &opts.chain_path,
        opts.key_passphrase.as_deref(),
    )
    .map_err(|e| PassServerError::Setup(format!("could not load credentials: {e}")))?;

    log::info!(
        "loaded signing credentials from {} and {}",
        opts.certificate_path,
        opts.chain_path
    );

    if !std::path::Path::new(&opts.assets).is_dir() {
        return Err(PassServerError::Setup(format!(
            "asset directory {} does not exist",
            opts.assets
        )));
    }

    Ok(PassGenerator::new(
        config,
        FsAssetStore::new(&opts.assets),
        signer,
    ))
}
