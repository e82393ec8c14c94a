use rand::Rng;

/// Generate a random site secret.
///
/// Issued once at registration and immutable afterwards; the registry resends
/// it verbatim on every webhook call, so it is stored as-is rather than
/// hashed.
pub fn generate_secret() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..48)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
