use clap::{Args, Parser, ValueHint};

/// Membership wallet pass service.
#[derive(Parser, Debug)]
#[clap(name = "pass-server", version)]
pub struct Opts {
    #[clap(subcommand)]
    pub subcmd: Subcommand,
}

#[derive(Parser, Debug)]
pub enum Subcommand {
    Gen(GenOpts),
    Server(ServerOpts),
}

/// Configuration, assets and credentials of the pass pipeline.
#[derive(Args, Debug, Clone)]
pub struct PipelineOpts {
    /// Path to the TOML pass configuration (issuer, brand styles, aliases).
    #[clap(short, long, default_value = "./config.toml", value_hint = ValueHint::FilePath)]
    pub config: String,

    /// Directory holding the brand images, as <assets>/<brand>/<file>.
    #[clap(long, default_value = "./assets", value_hint = ValueHint::DirPath)]
    pub assets: String,

    /// Path to the pass signing certificate (PEM).
    #[clap(long, default_value = "./certs/pass_certificate.pem", value_hint = ValueHint::FilePath)]
    pub certificate_path: String,

    /// Path to the private key of the signing certificate (PEM).
    #[clap(long, default_value = "./certs/key.pem", value_hint = ValueHint::FilePath)]
    pub key_path: String,

    /// Path to the intermediate certificate(s) embedded in the signature (PEM or DER).
    #[clap(long, default_value = "./certs/pass.cer", value_hint = ValueHint::FilePath)]
    pub chain_path: String,

    /// Passphrase of the private key, if it is encrypted.
    #[clap(long, env = "PASS_KEY_PASSPHRASE", hide_env_values = true)]
    pub key_passphrase: Option<String>,
}

/// Generate a single pass to a file.
#[derive(Parser, Debug)]
#[clap(name = "Gen")]
pub struct GenOpts {
    /// Name of the card holder.
    #[clap(long)]
    pub name: String,

    /// Membership number, also the serial number of the pass.
    #[clap(long)]
    pub membership_number: String,

    /// Brand name.
    #[clap(long)]
    pub brand_name: String,

    /// Expiration date, e.g. 2030-12-31T23:59:59+09:00.
    #[clap(long)]
    pub expiration_date: Option<String>,

    /// Path to write the pass archive to, must not exist yet.
    #[clap(short, long, default_value = "./membership.pkpass", value_hint = ValueHint::FilePath)]
    pub out: String,

    #[clap(flatten)]
    pub pipeline: PipelineOpts,
}

/// Run the pass HTTP service.
#[derive(Parser, Debug)]
#[clap(name = "Server")]
pub struct ServerOpts {
    /// Host to bind this service to.
    #[clap(short = 'H', long, default_value = "0.0.0.0", value_hint = ValueHint::Hostname)]
    pub host: String,

    /// Port to bind this service to.
    #[clap(short, long, default_value = "8000")]
    pub port: String,

    #[clap(flatten)]
    pub pipeline: PipelineOpts,
}
