//! Detached signatures over the manifest.

use std::path::Path;

use openssl::pkcs7::{Pkcs7, Pkcs7Flags};
use openssl::pkey::{PKey, Private};
use openssl::stack::Stack;
use openssl::x509::store::X509StoreBuilder;
use openssl::x509::X509;

use crate::error::Error;

/// Signs the exact manifest bytes.
pub trait ManifestSigner: Send + Sync {
    /// Produce a detached DER signature over `manifest`.
    fn sign(&self, manifest: &[u8]) -> Result<Vec<u8>, Error>;
}

impl<F> ManifestSigner for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, Error> + Send + Sync,
{
    fn sign(&self, manifest: &[u8]) -> Result<Vec<u8>, Error> {
        self(manifest)
    }
}

/// PKCS#7 signer backed by OpenSSL.
///
/// Equivalent to `openssl smime -binary -sign -outform DER` with the pass certificate as
/// signer and the intermediate certificates embedded in the signature.
pub struct OpensslSigner {
    certificate: X509,
    key: PKey<Private>,
    chain: Vec<X509>,
}

impl std::fmt::Debug for OpensslSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpensslSigner")
            .field("certificate", &self.certificate.subject_name())
            .field("chain", &self.chain.len())
            .finish_non_exhaustive()
    }
}

fn read(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| Error::Signing(format!("could not read {}: {e}", path.display())))
}

/// Parse one or more certificates, PEM or a single DER certificate.
fn parse_certificates(bytes: &[u8]) -> Result<Vec<X509>, Error> {
    if bytes.starts_with(b"-----BEGIN") {
        Ok(X509::stack_from_pem(bytes)?)
    } else {
        Ok(vec![X509::from_der(bytes)?])
    }
}

impl OpensslSigner {
    /// Create a signer from parsed credentials.
    ///
    /// Fails if the key does not belong to the certificate.
    pub fn new(certificate: X509, key: PKey<Private>, chain: Vec<X509>) -> Result<Self, Error> {
        if !certificate.public_key()?.public_eq(&key) {
            return Err(Error::Signing(
                "private key does not match the signer certificate".to_string(),
            ));
        }

        Ok(Self {
            certificate,
            key,
            chain,
        })
    }

    /// Create a signer from PEM encoded credentials.
    ///
    /// The chain may be PEM (one or more certificates) or a single DER certificate.
    pub fn from_pem(
        certificate: &[u8],
        key: &[u8],
        chain: &[u8],
        passphrase: Option<&str>,
    ) -> Result<Self, Error> {
        let certificate = X509::from_pem(certificate)?;
        let key = match passphrase {
            Some(p) => PKey::private_key_from_pem_passphrase(key, p.as_bytes())?,
            None => PKey::private_key_from_pem(key)?,
        };
        let chain = parse_certificates(chain)?;

        Self::new(certificate, key, chain)
    }

    /// Load credentials from disk.
    pub fn from_files(
        certificate: impl AsRef<Path>,
        key: impl AsRef<Path>,
        chain: impl AsRef<Path>,
        passphrase: Option<&str>,
    ) -> Result<Self, Error> {
        Self::from_pem(
            &read(certificate.as_ref())?,
            &read(key.as_ref())?,
            &read(chain.as_ref())?,
            passphrase,
        )
    }

    /// The signer certificate.
    pub fn certificate(&self) -> &X509 {
        &self.certificate
    }
}

impl ManifestSigner for OpensslSigner {
    fn sign(&self, manifest: &[u8]) -> Result<Vec<u8>, Error> {
        let mut chain = Stack::new()?;
        for cert in &self.chain {
            chain.push(cert.clone())?;
        }

        let flags = Pkcs7Flags::BINARY | Pkcs7Flags::DETACHED;
        let pkcs7 = Pkcs7::sign(&self.certificate, &self.key, &chain, manifest, flags)?;

        Ok(pkcs7.to_der()?)
    }
}

/// Check a detached DER signature over `data`, made by the holder of `signer`.
///
/// Only the signature itself is checked, not the trust chain of the certificate.
pub fn verify(signature: &[u8], data: &[u8], signer: &X509) -> Result<(), Error> {
    let pkcs7 = Pkcs7::from_der(signature)?;

    let mut certs = Stack::new()?;
    certs.push(signer.clone())?;
    let store = X509StoreBuilder::new()?.build();

    let flags = Pkcs7Flags::BINARY | Pkcs7Flags::NOVERIFY | Pkcs7Flags::NOINTERN;
    pkcs7.verify(&certs, &store, Some(data), None, flags)?;

    Ok(())
}
