use courier_desktop::{DesktopError, Platform};

#[test]
fn platform_display_matches_target_os_names() {
    assert_eq!(Platform::Windows.to_string(), "windows");
    assert_eq!(Platform::Macos.to_string(), "macos");
    assert_eq!(Platform::Linux.to_string(), "linux");
    assert_eq!(Platform::Other("haiku".into()).to_string(), "haiku");
}

#[test]
fn current_platform_is_a_known_variant_here() {
    // CI and dev machines for this crate are desktop OSes.
    let platform = Platform::current();
    assert!(!matches!(platform, Platform::Other(_)));
}

#[test]
fn errors_name_the_failed_operation() {
    let err = DesktopError::RegisterFailed("courier".into());
    assert_eq!(
        err.to_string(),
        "could not register as handler for scheme courier"
    );

    let err = DesktopError::UnregisterFailed("courier".into());
    assert_eq!(
        err.to_string(),
        "could not unregister as handler for scheme courier"
    );

    let err = DesktopError::Unsupported(Platform::Linux);
    assert_eq!(
        err.to_string(),
        "scheme registration is not supported on linux"
    );
}
