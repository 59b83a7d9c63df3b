//! Local completion fallback used when no upstream backend is configured.

/// Alternates character case across the prompt: even-indexed characters
/// (0-based, counting Unicode scalars) are lowercased, odd-indexed characters
/// are uppercased.
pub fn local_completion(prompt: &str) -> String {
    let mut out = String::with_capacity(prompt.len());
    for (i, c) in prompt.chars().enumerate() {
        if i % 2 == 0 {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
    }
    out
}
