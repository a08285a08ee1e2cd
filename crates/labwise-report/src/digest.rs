//! Content digest of a structured result.
//!
//! The digest is SHA-256 over the compact `serde_json` encoding of the
//! `AnalysisResult`. Because the engine is deterministic, two analyses of the
//! same request against the same catalog produce the same digest, which lets
//! a consumer detect tampering with the structured part of a stored report.

use sha2::{Digest, Sha256};

use labwise_contracts::{
    error::{LabError, LabResult},
    result::AnalysisResult,
};

/// Lowercase 64-character hex SHA-256 of the result's canonical JSON.
pub fn result_digest(result: &AnalysisResult) -> LabResult<String> {
    let bytes = serde_json::to_vec(result).map_err(|e| LabError::VerificationFailed {
        reason: format!("result could not be serialized for digest: {e}"),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use labwise_contracts::result::AnalysisResult;

    use super::result_digest;
    use crate::test_support::{analyze, request};

    #[test]
    fn digest_is_hex_sha256() {
        let digest = result_digest(&AnalysisResult::default()).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn identical_requests_share_a_digest() {
        let req = request(52, "female", &[("TSH", 6.1, "Thyroid"), ("HDL", 38.0, "Lipid")]);
        let a = result_digest(&analyze(&req).unwrap()).unwrap();
        let b = result_digest(&analyze(&req).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn any_change_alters_the_digest() {
        let req = request(52, "female", &[("TSH", 6.1, "Thyroid")]);
        let result = analyze(&req).unwrap();
        let before = result_digest(&result).unwrap();

        let mut tampered = result;
        tampered.all_results[0].value = 2.0;
        assert_ne!(before, result_digest(&tampered).unwrap());
    }
}
