use std::fmt;

use crate::errors::InternalError;
use crate::errors::internal::VisitorError;
use crate::services::crypto;

/// Prefix marking a QR payload as a visitdesk check-in
pub const QR_PAYLOAD_PREFIX: &str = "visitdesk:checkin:";

/// Signs and verifies visitor check-in codes
///
/// A code is `<visitor_id>.<hmac_hex>`. Nothing is stored: the HMAC proves
/// the code was issued by this server for that visitor.
pub struct CheckinCodeService {
    checkin_secret: String,
}

impl CheckinCodeService {
    pub fn new(checkin_secret: String) -> Self {
        Self { checkin_secret }
    }

    pub fn code_for(&self, visitor_id: &str) -> Result<String, InternalError> {
        let signature = crypto::hmac_sha256_hex(&self.checkin_secret, visitor_id)?;
        Ok(format!("{}.{}", visitor_id, signature))
    }

    /// Content to encode in the visitor's QR code
    pub fn qr_payload(&self, visitor_id: &str) -> Result<String, InternalError> {
        Ok(format!("{}{}", QR_PAYLOAD_PREFIX, self.code_for(visitor_id)?))
    }

    /// Verify a scanned QR payload or raw code and return the visitor id
    pub fn verify(&self, input: &str) -> Result<String, InternalError> {
        let input = input.trim();
        let code = input.strip_prefix(QR_PAYLOAD_PREFIX).unwrap_or(input);

        let (visitor_id, signature) = code
            .rsplit_once('.')
            .ok_or(VisitorError::InvalidCheckinCode)?;

        if visitor_id.is_empty()
            || !crypto::verify_hmac_sha256_hex(&self.checkin_secret, visitor_id, signature)
        {
            return Err(VisitorError::InvalidCheckinCode.into());
        }

        Ok(visitor_id.to_string())
    }
}

impl fmt::Debug for CheckinCodeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckinCodeService")
            .field("checkin_secret", &"<redacted>")
            .finish()
    }
}
