use subtle::ConstantTimeEq;

/// First gate: exact-match origin allow-list.
///
/// An empty list means the check is skipped (open). A non-empty list requires
/// the caller's address to equal one entry exactly.
pub fn origin_allowed(allowed: &[String], caller: &str) -> bool {
    if allowed.is_empty() {
        return true;
    }
    allowed.iter().any(|entry| entry == caller)
}

/// Second gate: constant-time secret verification.
///
/// Missing or empty keys fail before the comparison; the comparison itself
/// never short-circuits on a byte mismatch.
pub fn secret_matches(configured: &str, provided: &str) -> bool {
    if provided.is_empty() {
        return false;
    }
    if configured.len() != provided.len() {
        return false;
    }
    configured.as_bytes().ct_eq(provided.as_bytes()).into()
}
