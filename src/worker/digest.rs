use base64::prelude::BASE64_STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha512};

/// SHA-512 of `input`, encoded as padded standard base64 (88 characters).
pub fn sha512_base64(input: &[u8]) -> String {
    BASE64_STANDARD.encode(Sha512::digest(input))
}
