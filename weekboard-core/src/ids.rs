//! Conversions between user ids and calendar ids.
//!
//! A uid is either `+<digits>` or an email address for external guests.
//! The matching cid replaces the leading `+` with `user_`; the viewer's
//! primary calendar is addressed by the literal `default`.

const CID_PREFIX: &str = "user_";

/// Calendar id of the viewer's primary calendar.
pub const DEFAULT_CID: &str = "default";

pub fn uid_to_cid(uid: &str) -> String {
    match uid.strip_prefix('+') {
        Some(digits) => format!("{CID_PREFIX}{digits}"),
        None => uid.to_string(),
    }
}

/// Map a cid back to its owner's uid. `default` resolves to the viewer.
pub fn cid_to_uid(cid: &str, viewer_uid: &str) -> String {
    if cid == DEFAULT_CID {
        return viewer_uid.to_string();
    }
    match cid.strip_prefix(CID_PREFIX) {
        Some(digits) => format!("+{digits}"),
        None => cid.to_string(),
    }
}
