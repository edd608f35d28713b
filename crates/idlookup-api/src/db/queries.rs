//! SQL statements issued by the lookup service.
//!
//! Every statement is parametrized with `?` placeholders; parameters are
//! bound as strings in the order listed on each constant.

/// EID for a user whose shop email or personal email matches. Params: `[email, email]`.
pub const EID_BY_EMAIL: &str = "SELECT eid FROM eligibility_list \
     WHERE CASE WHEN shop_email = ? THEN 1 WHEN email = ? THEN 1 ELSE 0 END = 1";

/// Preferred contact email for an EID. Params: `[eid]`.
pub const EMAIL_BY_EID: &str =
    "SELECT COALESCE(shop_email, email) AS email FROM eligibility_list WHERE eid = ?";

/// Employer of the user with an EID. Params: `[eid]`.
pub const EMPLOYER_ID_BY_EID: &str = "SELECT employer_id FROM eligibility_list WHERE eid = ?";

/// Eligibility rules JSON for an employer. Params: `[employer_id]`.
pub const ELIGIBILITY_RULES_BY_EMPLOYER_ID: &str =
    "SELECT eligibility_rules FROM employers WHERE id = ?";

/// Medical-side user id for an EID. Params: `[eid]`.
pub const UID_BY_EID: &str = "SELECT uid FROM eligibility_b2b_data WHERE eid = ?";

/// Most recent reported app version for a uid. Params: `[uid]`.
pub const CURRENT_APP_VERSION_BY_UID: &str = "SELECT current_app_ver FROM session \
     WHERE current_app_ver IS NOT NULL AND uid = ? \
     ORDER BY openLocalUTC DESC LIMIT 1";
