use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Prefix shared by every generated username.
pub const USERNAME_PREFIX: &str = "user";
/// Number of characters taken from the `yymmddBBB` timestamp.
const TIMESTAMP_SEGMENT_LENGTH: usize = 7;
/// Number of random characters appended after the timestamp.
const RANDOM_SUFFIX_LENGTH: usize = 6;
/// Total length of a generated username.
pub const GENERATED_USERNAME_LENGTH: usize =
    USERNAME_PREFIX.len() + TIMESTAMP_SEGMENT_LENGTH + RANDOM_SUFFIX_LENGTH;

/// Swatch Internet Time beat (000-999) for `now`.
///
/// A beat is 1/1000 of a day measured from midnight in UTC+1 (Biel Mean Time),
/// so the value is the same in every timezone.
#[must_use]
pub fn swatch_beat(now: DateTime<Utc>) -> u32 {
    let seconds = (now.timestamp() + 3600).rem_euclid(86_400);
    // 86.4 seconds per beat
    u32::try_from(seconds * 10 / 864).unwrap_or(0)
}

/// The 7 timestamp characters of a generated username.
///
/// Formats `now` as `yymmdd` in `tz` followed by the three-digit beat, then
/// drops the first character.
#[must_use]
pub fn timestamp_segment(now: DateTime<Utc>, tz: Tz) -> String {
    let date = now.with_timezone(&tz).format("%y%m%d");
    let stamp = format!("{date}{:03}", swatch_beat(now));
    stamp
        .chars()
        .skip(1)
        .take(TIMESTAMP_SEGMENT_LENGTH)
        .collect()
}

/// Six random lowercase alphanumeric characters.
#[must_use]
pub fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LENGTH)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Build a username candidate such as `user6101954k3m9qa`.
///
/// Uniqueness is not checked here; see
/// [`crate::services::UserService::generate_unique_username`].
#[must_use]
pub fn generate_username(now: DateTime<Utc>, tz: Tz) -> String {
    format!(
        "{USERNAME_PREFIX}{}{}",
        timestamp_segment(now, tz),
        random_suffix()
    )
}

/// Whether `username` has the shape produced by [`generate_username`].
#[must_use]
pub fn is_generated_username(username: &str) -> bool {
    let Some(rest) = username.strip_prefix(USERNAME_PREFIX) else {
        return false;
    };
    if !username.is_ascii() || username.len() != GENERATED_USERNAME_LENGTH {
        return false;
    }
    let (stamp, suffix) = rest.split_at(TIMESTAMP_SEGMENT_LENGTH);
    stamp.chars().all(|c| c.is_ascii_digit())
        && suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
}
