//! MYRA request signature
//!
//! The signing string is `md5(body)#METHOD#path#content-type#date`. It is
//! signed with HMAC-SHA512 under a key derived from the secret and the request
//! date, and sent as `Authorization: MYRA <api key>:<signature>`.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::{Sha256, Sha512};

pub const CONTENT_TYPE: &str = "application/json";

/// Credentials used to sign every request
#[derive(Debug, Clone)]
pub struct Signer {
    api_key: String,
    secret: String,
}

impl Signer {
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
        }
    }

    /// Build the `Authorization` header value for one request
    pub fn authorization(&self, method: &str, path: &str, body: &str, date: &str) -> String {
        let content_md5 = hex::encode(Md5::digest(body.as_bytes()));
        let signing_string = format!(
            "{}#{}#{}#{}#{}",
            content_md5, method, path, CONTENT_TYPE, date
        );

        let date_key = hex::encode(hmac_sha256(
            format!("MYRA{}", self.secret).as_bytes(),
            date.as_bytes(),
        ));
        let signing_key = hex::encode(hmac_sha256(date_key.as_bytes(), b"myra-api-request"));
        let signature = STANDARD.encode(hmac_sha512(
            signing_key.as_bytes(),
            signing_string.as_bytes(),
        ));

        format!("MYRA {}:{}", self.api_key, signature)
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac =
        <Hmac<Sha256> as Mac>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac =
        <Hmac<Sha512> as Mac>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
