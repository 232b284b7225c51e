use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::coinbase::{Error, Result};

/// `CB-ACCESS-SIGN` value: base64 HMAC-SHA256 over
/// `timestamp + method + request_path + body`, keyed with the decoded secret.
pub(crate) fn sign_request(
    secret_key: &str,
    timestamp: &str,
    method: &str,
    request_path: &str,
    body: &str,
) -> Result<String> {
    let key = STANDARD
        .decode(secret_key)
        .map_err(|e| Error::SecretDecode(e.to_string()))?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(&key).map_err(|e| Error::SignatureFailure(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(method.as_bytes());
    mac.update(request_path.as_bytes());
    mac.update(body.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
