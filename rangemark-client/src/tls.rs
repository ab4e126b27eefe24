//! Custom trust-anchor loading.
//!
//! When `RANGEMARK_CA_CERT` is set, the agent verifies the server against
//! that PEM bundle alone, replacing the default root store.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::ClientError;

/// Build a rustls client config whose root store holds exactly the
/// certificates found in the PEM file at `path`.
pub(crate) fn client_config_with_anchor(path: &Path) -> Result<rustls::ClientConfig, ClientError> {
    let file = File::open(path).map_err(|err| anchor_error(path, err.to_string()))?;
    let mut reader = BufReader::new(file);

    let mut roots = rustls::RootCertStore::empty();
    let mut added = 0usize;
    for cert in rustls_pemfile::certs(&mut reader) {
        let cert = cert.map_err(|err| anchor_error(path, err.to_string()))?;
        roots
            .add(cert)
            .map_err(|err| anchor_error(path, err.to_string()))?;
        added += 1;
    }

    if added == 0 {
        return Err(anchor_error(path, "no certificates found in PEM file".to_string()));
    }

    tracing::debug!("loaded {added} trust anchor certificate(s) from {}", path.display());
    Ok(rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth())
}

fn anchor_error(path: &Path, detail: String) -> ClientError {
    ClientError::TrustAnchor {
        path: path.to_path_buf(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn missing_file_is_a_trust_anchor_error() {
        let err = client_config_with_anchor(Path::new("/nonexistent/ca.pem"))
            .expect_err("must fail");
        assert!(matches!(err, ClientError::TrustAnchor { .. }));
    }

    #[test]
    fn empty_pem_is_rejected() {
        let file = NamedTempFile::new().expect("tempfile");
        let err = client_config_with_anchor(file.path()).expect_err("must fail");
        let ClientError::TrustAnchor { detail, .. } = err else {
            panic!("wrong variant");
        };
        assert!(detail.contains("no certificates"));
    }

    #[test]
    fn garbage_pem_is_rejected() {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(b"-----BEGIN CERTIFICATE-----\nnot base64!!\n-----END CERTIFICATE-----\n")
            .expect("write");
        let err = client_config_with_anchor(file.path()).expect_err("must fail");
        assert!(matches!(err, ClientError::TrustAnchor { .. }));
    }
}
