//! TLS client connection command (`s-client`).

use leap_tls::cert::{PeerPublicKey, PinnedCertificate};
use leap_tls::config::TlsConfig;
use leap_tls::connection::TlsClientConnection;
use leap_tls::{CipherSuite, TlsConnection, TlsVersion};
use leap_types::TlsError;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::list::suite_by_name;

pub struct Options<'a> {
    pub connect: &'a str,
    pub alpn: Option<&'a str>,
    pub tls_version: &'a str,
    pub ciphers: Option<&'a str>,
    pub spki: Option<&'a str>,
    pub insecure: bool,
    pub http: bool,
    pub grease: bool,
    pub quiet: bool,
}

pub fn run(opts: &Options<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let (host, addr) = parse_connect(opts.connect)?;
    let config = build_config(&host, opts)?;

    if !opts.quiet {
        eprintln!("Connecting to {addr}...");
    }

    // Resolve and connect with a 10-second timeout
    let socket_addr = addr
        .to_socket_addrs()
        .map_err(|e| format!("cannot resolve '{addr}': {e}"))?
        .next()
        .ok_or_else(|| format!("cannot resolve '{addr}': no addresses found"))?;
    let stream = TcpStream::connect_timeout(&socket_addr, Duration::from_secs(10))
        .map_err(|e| format!("cannot connect to '{addr}': {e}"))?;
    stream.set_read_timeout(Some(Duration::from_secs(10)))?;
    stream.set_write_timeout(Some(Duration::from_secs(10)))?;

    if !opts.quiet {
        eprintln!("Connected to {}", stream.peer_addr()?);
    }

    let mut conn = TlsClientConnection::new(stream, config);
    conn.handshake()?;
    if !opts.quiet {
        print_connection_info(&conn);
        if let Some(proto) = conn.alpn_protocol() {
            eprintln!("  ALPN:     {}", String::from_utf8_lossy(proto));
        }
    }
    if opts.http {
        do_http(&host, &mut conn)?;
    }
    let _ = conn.close();

    if !opts.quiet {
        eprintln!("Connection closed.");
    }
    Ok(())
}

fn build_config(host: &str, opts: &Options<'_>) -> Result<TlsConfig, Box<dyn std::error::Error>> {
    let max_version = match opts.tls_version {
        "1.0" => TlsVersion::Tls10,
        "1.1" => TlsVersion::Tls11,
        "1.2" => TlsVersion::Tls12,
        other => {
            return Err(format!(
                "unsupported TLS version '{other}' (use \"1.0\", \"1.1\" or \"1.2\")"
            )
            .into())
        }
    };

    let mut builder = TlsConfig::builder()
        .server_name(host)
        .max_version(max_version)
        .grease(opts.grease);

    if let Some(list) = opts.ciphers {
        let suites = parse_ciphers(list)?;
        builder = builder.cipher_suites(&suites);
    }

    // Peer authentication
    if opts.insecure {
        builder = builder.verify_peer(false);
    } else if let Some(path) = opts.spki {
        let leaf = std::fs::read(path).map_err(|e| format!("cannot read SPKI file '{path}': {e}"))?;
        let key = PeerPublicKey::from_spki_der(&leaf)
            .map_err(|e| format!("failed to parse SPKI '{path}': {e}"))?;
        builder = builder.certificate_validator(Arc::new(PinnedCertificate { leaf, key }));
    } else {
        // X.509 path validation is left to the embedder.
        if !opts.quiet {
            eprintln!("Warning: no --spki specified, disabling certificate verification");
            eprintln!("         use --insecure to suppress this warning");
        }
        builder = builder.verify_peer(false);
    }

    if let Some(alpn_str) = opts.alpn {
        let protos: Vec<&[u8]> = alpn_str.split(',').map(|s| s.trim().as_bytes()).collect();
        builder = builder.alpn(&protos);
    }

    Ok(builder.build())
}

/// Parse "host:port" or "host" (defaults to port 443).
fn parse_connect(connect: &str) -> Result<(String, String), Box<dyn std::error::Error>> {
    if let Some(idx) = connect.rfind(':') {
        let host = &connect[..idx];
        let port = &connect[idx + 1..];
        port.parse::<u16>()
            .map_err(|_| format!("invalid port in '{connect}'"))?;
        Ok((host.to_string(), connect.to_string()))
    } else {
        Ok((connect.to_string(), format!("{connect}:443")))
    }
}

fn parse_ciphers(list: &str) -> Result<Vec<CipherSuite>, Box<dyn std::error::Error>> {
    let suites = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| {
            suite_by_name(name)
                .map(|info| info.suite)
                .ok_or_else(|| format!("unknown cipher suite '{name}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if suites.is_empty() {
        return Err("empty cipher suite list".into());
    }
    debug!(count = suites.len(), "cipher suites from command line");
    Ok(suites)
}

fn print_connection_info(conn: &dyn TlsConnection) {
    eprintln!("--- TLS connection established ---");
    if let Some(version) = conn.version() {
        eprintln!("  Protocol: {version}");
    }
    if let Some(cs) = conn.cipher_suite() {
        eprintln!("  Cipher:   0x{:04X} {}", cs.0, cs.name().unwrap_or("unknown"));
    }
    eprintln!("---------------------------------");
}

fn do_http(host: &str, conn: &mut dyn TlsConnection) -> Result<(), Box<dyn std::error::Error>> {
    let request = format!("GET / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n");
    conn.write(request.as_bytes())?;

    let mut buf = vec![0u8; 16384];
    loop {
        match conn.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let text = String::from_utf8_lossy(&buf[..n]);
                print!("{text}");
            }
            Err(TlsError::ConnectionClosed) => break,
            Err(TlsError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::ConnectionReset
                    || e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    println!();
    Ok(())
}
