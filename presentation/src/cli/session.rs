//! Session id generation

use chrono::{DateTime, Utc};

/// `<owner>-<yyyymmddHHMMSS>`, with the owner reduced to filename-safe
/// characters.
pub fn generate_session_id(owner: &str) -> String {
    session_id_at(owner, Utc::now())
}

pub fn session_id_at(owner: &str, at: DateTime<Utc>) -> String {
    let owner: String = owner
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let owner = owner.trim_matches('-');
    let owner = if owner.is_empty() { "session" } else { owner };
    format!("{}-{}", owner, at.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_id_is_filename_safe() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 8, 5, 9).unwrap();
        assert_eq!(session_id_at("alice", at), "alice-20261016080509");
        assert_eq!(session_id_at("../é x", at), "x-20261016080509");
        assert_eq!(session_id_at("  ", at), "session-20261016080509");
        for owner in ["alice", "../é x", "  ", ".bob"] {
            assert!(assess_domain::is_valid_session_id(&session_id_at(owner, at)));
        }
    }
}
