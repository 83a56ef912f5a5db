use std::fmt;
use std::fs;
use std::path::PathBuf;

use reqwest::Identity;

use super::{var, ConfigError, Lookup};

/// PEM client certificate and private key presented to the controller API
#[derive(Clone)]
pub struct ClientCredentials {
    cert_pem: Vec<u8>,
    key_pem: Vec<u8>,
}

impl ClientCredentials {
    pub fn from_pem(cert_pem: Vec<u8>, key_pem: Vec<u8>) -> Self {
        Self { cert_pem, key_pem }
    }

    /// Inline PEM takes precedence over a file path.
    pub fn from_lookup(lookup: Lookup) -> Result<Self, ConfigError> {
        Ok(Self {
            cert_pem: read_pem(lookup, "API_CLIENT_CERT", "API_CLIENT_CERT_PATH")?,
            key_pem: read_pem(lookup, "API_CLIENT_KEY", "API_CLIENT_KEY_PATH")?,
        })
    }

    pub fn identity(&self) -> Result<Identity, ConfigError> {
        let mut pem = self.cert_pem.clone();
        if !pem.ends_with(b"\n") {
            pem.push(b'\n');
        }
        pem.extend_from_slice(&self.key_pem);

        Identity::from_pem(&pem).map_err(|e| ConfigError::InvalidIdentity(e.to_string()))
    }
}

// Never print key material
impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("cert_pem", &format_args!("<{} bytes>", self.cert_pem.len()))
            .field("key_pem", &"<redacted>")
            .finish()
    }
}

fn read_pem(lookup: Lookup, inline_key: &'static str, path_key: &str) -> Result<Vec<u8>, ConfigError> {
    if let Some(inline) = var(lookup, inline_key) {
        return Ok(inline.into_bytes());
    }

    let path = var(lookup, path_key)
        .map(PathBuf::from)
        .ok_or(ConfigError::Missing(inline_key))?;

    fs::read(&path).map_err(|source| ConfigError::CredentialFile { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_key() {
        let credentials = ClientCredentials::from_pem(b"cert".to_vec(), b"very secret".to_vec());
        let printed = format!("{:?}", credentials);
        assert!(!printed.contains("very secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn unreadable_path_is_reported() {
        let lookup = |key: &str| match key {
            "API_CLIENT_CERT_PATH" => Some("/nonexistent/nms-gate/client.pem".to_string()),
            "API_CLIENT_KEY" => Some("key".to_string()),
            _ => None,
        };
        assert!(matches!(
            ClientCredentials::from_lookup(&lookup),
            Err(ConfigError::CredentialFile { .. })
        ));
    }

    #[test]
    fn reads_pem_from_file() {
        let path = std::env::temp_dir().join(format!("nms-gate-cert-{}.pem", std::process::id()));
        fs::write(&path, b"file cert").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let lookup = move |key: &str| match key {
            "API_CLIENT_CERT_PATH" => Some(path_str.clone()),
            "API_CLIENT_KEY" => Some("inline key".to_string()),
            _ => None,
        };
        let credentials = ClientCredentials::from_lookup(&lookup).unwrap();
        assert_eq!(credentials.cert_pem, b"file cert");
        assert_eq!(credentials.key_pem, b"inline key");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn garbage_pem_is_rejected() {
        let credentials = ClientCredentials::from_pem(b"not a cert".to_vec(), b"not a key".to_vec());
        assert!(matches!(credentials.identity(), Err(ConfigError::InvalidIdentity(_))));
    }
}
