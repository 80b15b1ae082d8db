// Licensed under the Apache-2.0 license

use bram_init::{
    generate, generate_from_config, AddressPolicy, BramInitConfig, BuiltinPattern, Error,
    PartialConfig, ADDRESS_SPACE,
};
use std::io::Write;

/// Splits a data line by fixed offsets, checking the checksum on the way.
fn parse_line(line: &str) -> (u16, u8, Vec<u8>) {
    let body = line.strip_prefix(':').expect("missing start code");
    assert_eq!(body.len() % 2, 0, "odd line length: {line}");
    let bytes: Vec<u8> = (0..body.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&body[i..i + 2], 16).unwrap())
        .collect();
    let sum = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    assert_eq!(sum, 0, "bad checksum: {line}");
    assert_eq!(bytes[0] as usize, bytes.len() - 5);
    let address = u16::from_be_bytes([bytes[1], bytes[2]]);
    (address, bytes[3], bytes[4..bytes.len() - 1].to_vec())
}

#[test]
fn test_generate_default_file() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let config = BramInitConfig {
        output: temp_file.path().to_path_buf(),
        ..Default::default()
    };
    let report = generate_from_config(&config).unwrap();
    assert_eq!(report.data_records, 65536);

    let contents = std::fs::read_to_string(temp_file.path()).unwrap();
    assert_eq!(report.bytes_written, contents.len() as u64);
    assert!(contents.ends_with(":00000001FF\n"));
    assert!(!contents.contains('\r'));

    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 65537);
    assert_eq!(lines[0], ":020000000000FE");
    assert_eq!(lines.iter().filter(|l| **l == ":00000001FF").count(), 1);

    for (addr, line) in lines[..65536].iter().enumerate() {
        assert_eq!(line.len(), 15);
        assert!(!line.chars().any(|c| c.is_ascii_lowercase()));
        let (address, record_type, data) = parse_line(line);
        assert_eq!(address as usize, addr);
        assert_eq!(record_type, 0x00);
        assert_eq!(data, vec![((addr & 0x1FF) >> 8) as u8, (addr & 0xFF) as u8]);
    }
}

#[test]
fn test_generate_custom_pattern() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let pattern = |addr: u32| vec![addr as u8, 0xAA, !(addr as u8)];
    let report = generate(temp_file.path(), 300, &pattern, AddressPolicy::Reject).unwrap();
    assert_eq!(report.data_records, 300);

    let contents = std::fs::read_to_string(temp_file.path()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 301);
    for (addr, line) in lines[..300].iter().enumerate() {
        let (address, _, data) = parse_line(line);
        assert_eq!(address as usize, addr);
        assert_eq!(data, pattern(addr as u32));
    }
}

#[test]
fn test_overflow_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("too_deep.hex");
    let err = generate(
        &path,
        ADDRESS_SPACE + 1,
        &BuiltinPattern::default(),
        AddressPolicy::Reject,
    )
    .unwrap_err();
    assert!(matches!(err, Error::AddressOverflow { .. }));
    assert!(!path.exists());
}

#[test]
fn test_unwritable_destination() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("bram_init.hex");
    let err = generate(&path, 4, &BuiltinPattern::Zero, AddressPolicy::Reject).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("bram.hex");

    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        config_file,
        "output = {:?}\ndepth = 0x10\npattern = \"constant:0x0102\"",
        output.to_str().unwrap()
    )
    .unwrap();

    let mut config = BramInitConfig::default();
    config.apply(PartialConfig::load(config_file.path()).unwrap());
    assert_eq!(config.output, output);
    generate_from_config(&config).unwrap();

    let contents = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 17);
    assert_eq!(lines[0], ":020000000102FB");
    assert_eq!(lines[15], ":02000F000102EC");
    assert_eq!(lines[16], ":00000001FF");
}
