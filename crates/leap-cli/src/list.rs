//! List the cipher suite registry, named groups and protocol versions.

use leap_tls::crypt::NamedGroup;
use leap_tls::suites::{default_suites, registry, CipherSuiteInfo};
use leap_tls::TlsVersion;

pub fn run(filter: &str) -> Result<(), Box<dyn std::error::Error>> {
    match filter {
        "suites" => print_suites(),
        "groups" => print_groups(),
        "versions" => print_versions(),
        "all" => {
            print_versions();
            println!();
            print_groups();
            println!();
            print_suites();
        }
        _ => {
            eprintln!("Unknown filter: {filter}");
            eprintln!("Valid filters: all, suites, groups, versions");
            return Err("invalid filter".into());
        }
    }
    Ok(())
}

fn print_versions() {
    println!("Protocol versions:");
    for v in [
        TlsVersion::Ssl30,
        TlsVersion::Tls10,
        TlsVersion::Tls11,
        TlsVersion::Tls12,
    ] {
        println!("  {v}");
    }
    println!("  {} (key schedule only, not negotiated)", TlsVersion::Tls13);
}

fn print_groups() {
    println!("Key exchange groups:");
    for g in NamedGroup::SUPPORTED {
        println!("  0x{:04X}  {}", g.0, g.name());
    }
}

fn print_suites() {
    let defaults = default_suites();
    let mut suites: Vec<&CipherSuiteInfo> = registry().iter().collect();
    suites.sort_by_key(|info| info.suite.0);

    println!("Cipher suites ({} registered, * = offered by default):", suites.len());
    for info in suites {
        let marker = if defaults.contains(&info.suite) { '*' } else { ' ' };
        let note = if info.is_negotiable() { "" } else { "  (unsupported)" };
        println!(
            "{marker} 0x{:04X}  {:<48} {}..{}{note}",
            info.suite.0, info.name, info.versions.min, info.versions.max
        );
    }
}

/// Resolve a suite by its IANA name.
pub fn suite_by_name(name: &str) -> Option<&'static CipherSuiteInfo> {
    registry().iter().find(|info| info.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leap_tls::CipherSuite;

    #[test]
    fn test_suite_by_name() {
        let info = suite_by_name("TLS_RSA_WITH_AES_128_CBC_SHA256").unwrap();
        assert_eq!(info.suite, CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256);
        assert!(suite_by_name("tls_rsa_with_aes_128_cbc_sha256").is_some());
        assert!(suite_by_name("TLS_NOT_A_SUITE").is_none());
    }

    #[test]
    fn test_run_filters() {
        assert!(run("all").is_ok());
        assert!(run("suites").is_ok());
        assert!(run("bogus").is_err());
    }
}
