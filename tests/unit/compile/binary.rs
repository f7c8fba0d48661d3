use super::*;

#[test]
fn suffix_table_covers_every_family_and_width() {
    let cases = [
        ("WINNT", 8, "sassc.exe"),
        ("WINNT", 4, "sassc.exe"),
        ("CYGWIN_NT-10.0", 8, "sassc.exe"),
        ("Darwin", 8, "sassc.macosx"),
        ("Darwin", 4, "sassc.macosx"),
        ("macos", 8, "sassc.macosx"),
        ("Linux", 4, "sassc.x86"),
        ("Linux", 8, "sassc"),
        ("FreeBSD", 4, "sassc.x86"),
        ("FreeBSD", 8, "sassc"),
    ];
    for (os, width, expected) in cases {
        assert_eq!(
            binary_name(&HostPlatform::new(os, width)),
            expected,
            "os={os} width={width}"
        );
    }
}

#[test]
fn explicit_dir_replaces_bundled_dir() {
    let platform = HostPlatform::new("Linux", 8);
    let path = resolve_binary(Some(Path::new("/opt/tools")), &platform);
    assert_eq!(path, PathBuf::from("/opt/tools/sassc"));
}

#[test]
fn default_dir_is_bundled_dist() {
    let platform = HostPlatform::new("WIN", 8);
    let path = resolve_binary(None, &platform);
    assert_eq!(path, bundled_bin_dir().join("sassc.exe"));
    assert!(path.parent().unwrap().ends_with("dist"));
}

#[test]
fn resolution_is_deterministic() {
    let platform = HostPlatform::new("Darwin", 8);
    let a = resolve_binary(Some(Path::new("bin")), &platform);
    let b = resolve_binary(Some(Path::new("bin")), &platform);
    assert_eq!(a, b);
}
