//! Utility modules.

pub mod hash;

pub use hash::md5_hex;

/// Generates a local key for an object the server has not identified yet.
pub fn temporary_id() -> String {
    format!("tmp-{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_ids_are_distinct() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| temporary_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with("tmp-")));
    }
}
