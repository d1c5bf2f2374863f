//! # Membership pass core library
#![deny(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links
)]
//! Turns a membership-card request into a signed wallet pass archive (`.pkpass`).
//!
//! The pipeline runs strictly forward, every stage extending the output of the previous one:
//!
//! * Style: the brand name is normalized and resolved to a [`StyleScheme`][`style::StyleScheme`].
//!
//! * Describe: the request and style are laid out as the pass document (`pass.json`).
//!
//! * Bundle: brand images are copied byte-for-byte from an [`AssetStore`][`assets::AssetStore`]
//! into a request-scoped [`WorkingSet`][`working_set::WorkingSet`].
//!
//! * Manifest: every file in the working set is hashed with SHA-1 into `manifest.json`.
//!
//! * Sign: a [`ManifestSigner`][`signer::ManifestSigner`] produces a detached PKCS#7 signature
//! over the exact manifest bytes.
//!
//! * Archive: the pass document, images, manifest and signature are zipped into a flat archive.
//!
//! ## Example
//!
//! ```
//! use pass_core::pipeline::PassGenerator;
//! use pass_core::request::PassRequest;
//! # use pass_core::test::TestSetup;
//! # use pass_core::pipeline::PipelineError;
//!
//! # fn main() -> Result<(), PipelineError> {
//! # let TestSetup { config, assets, signer, .. } = TestSetup::new();
//! let generator = PassGenerator::new(config, assets, signer);
//!
//! let request = PassRequest {
//!     name: "Jane Doe".to_string(),
//!     membership_number: "12345".to_string(),
//!     brand_name: "CU".to_string(),
//!     expiration_date: None,
//! };
//!
//! let archive = generator.generate("example", &request)?;
//! assert_eq!(archive.serial_number, "12345");
//! # Ok(())
//! # }
//! ```
//!
//! ## Archive layout
//!
//! ```text
//! membership.pkpass
//! ├── pass.json
//! ├── icon.png, icon@2x.png, ...
//! ├── logo.png, logo@2x.png, ...
//! ├── manifest.json      { filename: sha1-hex } for all of the above
//! └── signature          DER PKCS#7 over manifest.json
//! ```

pub mod archive;
pub mod assets;
pub mod config;
pub mod consts;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod request;
pub mod signer;
pub mod style;
pub mod working_set;

#[doc(hidden)]
pub use consts::*;
