use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use pass_core::request::PassRequest;

use crate::util::{build_generator, request_id};
use crate::{opts::*, PassServerError};

fn write_owned<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> std::io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);

    #[cfg(unix)]
    opts.mode(0o600);

    opts.open(path)?.write_all(contents.as_ref())
}

pub fn exec(gen_opts: GenOpts) -> Result<(), PassServerError> {
    let GenOpts {
        name,
        membership_number,
        brand_name,
        expiration_date,
        out,
        pipeline,
    } = gen_opts;

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let generator = build_generator(&pipeline)?;
    let request = PassRequest {
        name,
        membership_number,
        brand_name,
        expiration_date,
    };

    let archive = generator
        .generate(&request_id(), &request)
        .map_err(PassServerError::Generate)?;

    write_owned(&out, &archive.bytes)?;

    println!(
        "Pass {} written to {out} ({} bytes).",
        archive.serial_number,
        archive.bytes.len()
    );

    Ok(())
}
