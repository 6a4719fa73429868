//! Unit tests for session configuration validation.

use super::*;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let file = NamedTempFile::new().expect("create key file");
    std::fs::write(file.path(), vec![b'a'; len]).expect("write key file");
    file
}

#[fixture]
fn full_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn toggles_for(file: &NamedTempFile) -> SessionToggles {
    SessionToggles {
        key_file: Some(file.path().to_path_buf()),
        ..SessionToggles::default()
    }
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
fn release_defaults_are_secure_and_strict(full_key: NamedTempFile) {
    let settings = session_settings(&toggles_for(&full_key), BuildMode::Release)
        .expect("expected valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case("lax", SameSite::Lax)]
#[case("Strict", SameSite::Strict)]
#[case("NONE", SameSite::None)]
fn same_site_is_case_insensitive(
    full_key: NamedTempFile,
    #[case] raw: &str,
    #[case] expected: SameSite,
) {
    let toggles = SessionToggles {
        same_site: Some(raw.to_owned()),
        ..toggles_for(&full_key)
    };
    let settings = session_settings(&toggles, BuildMode::Release).expect("valid same site");
    assert_eq!(settings.same_site, expected);
}

#[rstest]
#[case(BuildMode::Debug)]
#[case(BuildMode::Release)]
fn unknown_same_site_is_rejected(full_key: NamedTempFile, #[case] mode: BuildMode) {
    let toggles = SessionToggles {
        same_site: Some("sometimes".to_owned()),
        ..toggles_for(&full_key)
    };
    let err = expect_error(session_settings(&toggles, mode), "expected invalid same site");
    assert!(matches!(
        err,
        SessionConfigError::InvalidValue {
            name: "session_same_site",
            ..
        }
    ));
}

#[rstest]
fn release_insecure_none_same_site_is_rejected(full_key: NamedTempFile) {
    let toggles = SessionToggles {
        cookie_secure: Some(false),
        same_site: Some("None".to_owned()),
        ..toggles_for(&full_key)
    };
    let err = expect_error(
        session_settings(&toggles, BuildMode::Release),
        "expected insecure SameSite=None to fail",
    );
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));

    let settings =
        session_settings(&toggles, BuildMode::Debug).expect("debug tolerates insecure None");
    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::None);
}

#[rstest]
fn release_ephemeral_enabled_is_rejected(full_key: NamedTempFile) {
    let toggles = SessionToggles {
        allow_ephemeral: true,
        ..toggles_for(&full_key)
    };
    let err = expect_error(
        session_settings(&toggles, BuildMode::Release),
        "expected ephemeral to be rejected in release",
    );
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_missing_key_file_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let toggles = SessionToggles {
        key_file: Some(dir.path().join("absent")),
        ..SessionToggles::default()
    };
    let err = expect_error(
        session_settings(&toggles, BuildMode::Release),
        "expected missing key file to fail",
    );
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_short_key_is_rejected() {
    let short = key_file(32);
    let err = expect_error(
        session_settings(&toggles_for(&short), BuildMode::Release),
        "expected short key to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort {
            length: 32,
            min_len: SESSION_KEY_MIN_LEN,
            ..
        }
    ));
}

#[rstest]
fn debug_falls_back_to_an_ephemeral_key() {
    let dir = tempfile::tempdir().expect("temp dir");
    let toggles = SessionToggles {
        key_file: Some(dir.path().join("absent")),
        ..SessionToggles::default()
    };
    let settings = session_settings(&toggles, BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_accepts_keys_below_the_release_minimum() {
    let short = key_file(32);
    assert!(session_settings(&toggles_for(&short), BuildMode::Debug).is_ok());
}

#[rstest]
fn debug_still_rejects_keys_too_short_to_derive() {
    let tiny = key_file(8);
    let err = expect_error(
        session_settings(&toggles_for(&tiny), BuildMode::Debug),
        "expected tiny key to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { min_len: 32, .. }
    ));
}
