//! Fixed names of the wallet pass format.

/// Filename of the pass document.
pub const PASS_FILE: &str = "pass.json";

/// Filename of the manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Filename of the detached signature.
pub const SIGNATURE_FILE: &str = "signature";

/// Images a wallet app refuses to open a pass without.
pub const REQUIRED_ASSETS: [&str; 2] = ["icon.png", "logo.png"];

/// Higher resolution variants, bundled when present.
pub const OPTIONAL_ASSETS: [&str; 4] = ["icon@2x.png", "icon@3x.png", "logo@2x.png", "logo@3x.png"];

/// Content type of a pass archive.
pub const PKPASS_CONTENT_TYPE: &str = "application/vnd.apple.pkpass";

/// Suggested filename for a downloaded pass archive.
pub const PKPASS_FILENAME: &str = "membership.pkpass";

/// Version of the pass document format.
pub const FORMAT_VERSION: u32 = 1;
