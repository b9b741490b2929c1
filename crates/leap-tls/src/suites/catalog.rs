//! The static suite table. Each row expands to a named [`CipherSuite`]
//! constant and a [`CipherSuiteInfo`] entry.

use super::{AuthAlg, BulkCipher, CipherSuiteInfo, KeyExchangeKind, VersionRange};
use crate::crypt::HashAlg;
use crate::CipherSuite;

macro_rules! cipher_suites {
    ($( $id:literal => $name:ident: $kx:ident, $auth:ident, $bulk:ident, $hash:ident, $ver:ident; )*) => {
        #[allow(non_upper_case_globals)]
        impl CipherSuite {
            $( pub const $name: CipherSuite = CipherSuite($id); )*
        }

        /// Every suite this engine knows by id, in wire-id order.
        pub static CATALOG: &[CipherSuiteInfo] = &[
            $(
                CipherSuiteInfo {
                    suite: CipherSuite($id),
                    name: stringify!($name),
                    key_exchange: KeyExchangeKind::$kx,
                    auth: AuthAlg::$auth,
                    bulk: BulkCipher::$bulk,
                    hash: HashAlg::$hash,
                    versions: VersionRange::$ver,
                },
            )*
        ];
    };
}

cipher_suites! {
    0x0000 => TLS_NULL_WITH_NULL_NULL: Null, Anonymous, Null, Md5, ALL;
    0x0001 => TLS_RSA_WITH_NULL_MD5: Rsa, Rsa, Null, Md5, ALL;
    0x0002 => TLS_RSA_WITH_NULL_SHA: Rsa, Rsa, Null, Sha1, ALL;
    0x0003 => TLS_RSA_EXPORT_WITH_RC4_40_MD5: RsaExport, Rsa, Rc4_40, Md5, EXPORT;
    0x0004 => TLS_RSA_WITH_RC4_128_MD5: Rsa, Rsa, Rc4_128, Md5, ALL;
    0x0005 => TLS_RSA_WITH_RC4_128_SHA: Rsa, Rsa, Rc4_128, Sha1, ALL;
    0x0007 => TLS_RSA_WITH_IDEA_CBC_SHA: Rsa, Rsa, IdeaCbc, Sha1, PRE_TLS12;
    0x0008 => TLS_RSA_EXPORT_WITH_DES40_CBC_SHA: RsaExport, Rsa, Des40Cbc, Sha1, EXPORT;
    0x0009 => TLS_RSA_WITH_DES_CBC_SHA: Rsa, Rsa, DesCbc, Sha1, PRE_TLS12;
    0x000A => TLS_RSA_WITH_3DES_EDE_CBC_SHA: Rsa, Rsa, TripleDesEdeCbc, Sha1, ALL;
    0x000B => TLS_DH_DSS_EXPORT_WITH_DES40_CBC_SHA: DhStatic, Dss, Des40Cbc, Sha1, EXPORT;
    0x000C => TLS_DH_DSS_WITH_DES_CBC_SHA: DhStatic, Dss, DesCbc, Sha1, PRE_TLS12;
    0x000D => TLS_DH_DSS_WITH_3DES_EDE_CBC_SHA: DhStatic, Dss, TripleDesEdeCbc, Sha1, ALL;
    0x000E => TLS_DH_RSA_EXPORT_WITH_DES40_CBC_SHA: DhStatic, Rsa, Des40Cbc, Sha1, EXPORT;
    0x000F => TLS_DH_RSA_WITH_DES_CBC_SHA: DhStatic, Rsa, DesCbc, Sha1, PRE_TLS12;
    0x0010 => TLS_DH_RSA_WITH_3DES_EDE_CBC_SHA: DhStatic, Rsa, TripleDesEdeCbc, Sha1, ALL;
    0x0011 => TLS_DHE_DSS_EXPORT_WITH_DES40_CBC_SHA: Dhe, Dss, Des40Cbc, Sha1, EXPORT;
    0x0012 => TLS_DHE_DSS_WITH_DES_CBC_SHA: Dhe, Dss, DesCbc, Sha1, PRE_TLS12;
    0x0013 => TLS_DHE_DSS_WITH_3DES_EDE_CBC_SHA: Dhe, Dss, TripleDesEdeCbc, Sha1, ALL;
    0x0014 => TLS_DHE_RSA_EXPORT_WITH_DES40_CBC_SHA: Dhe, Rsa, Des40Cbc, Sha1, EXPORT;
    0x0015 => TLS_DHE_RSA_WITH_DES_CBC_SHA: Dhe, Rsa, DesCbc, Sha1, PRE_TLS12;
    0x0016 => TLS_DHE_RSA_WITH_3DES_EDE_CBC_SHA: Dhe, Rsa, TripleDesEdeCbc, Sha1, ALL;
    0x0017 => TLS_DH_anon_EXPORT_WITH_RC4_40_MD5: DhAnon, Anonymous, Rc4_40, Md5, EXPORT;
    0x0018 => TLS_DH_anon_WITH_RC4_128_MD5: DhAnon, Anonymous, Rc4_128, Md5, ALL;
    0x0019 => TLS_DH_anon_EXPORT_WITH_DES40_CBC_SHA: DhAnon, Anonymous, Des40Cbc, Sha1, EXPORT;
    0x001A => TLS_DH_anon_WITH_DES_CBC_SHA: DhAnon, Anonymous, DesCbc, Sha1, PRE_TLS12;
    0x001B => TLS_DH_anon_WITH_3DES_EDE_CBC_SHA: DhAnon, Anonymous, TripleDesEdeCbc, Sha1, ALL;
    0x002C => TLS_PSK_WITH_NULL_SHA: Psk, Psk, Null, Sha1, TLS10_UP;
    0x002D => TLS_DHE_PSK_WITH_NULL_SHA: DhePsk, Psk, Null, Sha1, TLS10_UP;
    0x002E => TLS_RSA_PSK_WITH_NULL_SHA: RsaPsk, Rsa, Null, Sha1, TLS10_UP;
    0x002F => TLS_RSA_WITH_AES_128_CBC_SHA: Rsa, Rsa, Aes128Cbc, Sha1, ALL;
    0x0030 => TLS_DH_DSS_WITH_AES_128_CBC_SHA: DhStatic, Dss, Aes128Cbc, Sha1, ALL;
    0x0031 => TLS_DH_RSA_WITH_AES_128_CBC_SHA: DhStatic, Rsa, Aes128Cbc, Sha1, ALL;
    0x0032 => TLS_DHE_DSS_WITH_AES_128_CBC_SHA: Dhe, Dss, Aes128Cbc, Sha1, ALL;
    0x0033 => TLS_DHE_RSA_WITH_AES_128_CBC_SHA: Dhe, Rsa, Aes128Cbc, Sha1, ALL;
    0x0034 => TLS_DH_anon_WITH_AES_128_CBC_SHA: DhAnon, Anonymous, Aes128Cbc, Sha1, ALL;
    0x0035 => TLS_RSA_WITH_AES_256_CBC_SHA: Rsa, Rsa, Aes256Cbc, Sha1, ALL;
    0x0036 => TLS_DH_DSS_WITH_AES_256_CBC_SHA: DhStatic, Dss, Aes256Cbc, Sha1, ALL;
    0x0037 => TLS_DH_RSA_WITH_AES_256_CBC_SHA: DhStatic, Rsa, Aes256Cbc, Sha1, ALL;
    0x0038 => TLS_DHE_DSS_WITH_AES_256_CBC_SHA: Dhe, Dss, Aes256Cbc, Sha1, ALL;
    0x0039 => TLS_DHE_RSA_WITH_AES_256_CBC_SHA: Dhe, Rsa, Aes256Cbc, Sha1, ALL;
    0x003A => TLS_DH_anon_WITH_AES_256_CBC_SHA: DhAnon, Anonymous, Aes256Cbc, Sha1, ALL;
    0x003B => TLS_RSA_WITH_NULL_SHA256: Rsa, Rsa, Null, Sha256, TLS12;
    0x003C => TLS_RSA_WITH_AES_128_CBC_SHA256: Rsa, Rsa, Aes128Cbc, Sha256, TLS12;
    0x003D => TLS_RSA_WITH_AES_256_CBC_SHA256: Rsa, Rsa, Aes256Cbc, Sha256, TLS12;
    0x003E => TLS_DH_DSS_WITH_AES_128_CBC_SHA256: DhStatic, Dss, Aes128Cbc, Sha256, TLS12;
    0x003F => TLS_DH_RSA_WITH_AES_128_CBC_SHA256: DhStatic, Rsa, Aes128Cbc, Sha256, TLS12;
    0x0040 => TLS_DHE_DSS_WITH_AES_128_CBC_SHA256: Dhe, Dss, Aes128Cbc, Sha256, TLS12;
    0x0041 => TLS_RSA_WITH_CAMELLIA_128_CBC_SHA: Rsa, Rsa, Camellia128Cbc, Sha1, TLS10_UP;
    0x0042 => TLS_DH_DSS_WITH_CAMELLIA_128_CBC_SHA: DhStatic, Dss, Camellia128Cbc, Sha1, TLS10_UP;
    0x0043 => TLS_DH_RSA_WITH_CAMELLIA_128_CBC_SHA: DhStatic, Rsa, Camellia128Cbc, Sha1, TLS10_UP;
    0x0044 => TLS_DHE_DSS_WITH_CAMELLIA_128_CBC_SHA: Dhe, Dss, Camellia128Cbc, Sha1, TLS10_UP;
    0x0045 => TLS_DHE_RSA_WITH_CAMELLIA_128_CBC_SHA: Dhe, Rsa, Camellia128Cbc, Sha1, TLS10_UP;
    0x0046 => TLS_DH_anon_WITH_CAMELLIA_128_CBC_SHA: DhAnon, Anonymous, Camellia128Cbc, Sha1, TLS10_UP;
    0x0067 => TLS_DHE_RSA_WITH_AES_128_CBC_SHA256: Dhe, Rsa, Aes128Cbc, Sha256, TLS12;
    0x0068 => TLS_DH_DSS_WITH_AES_256_CBC_SHA256: DhStatic, Dss, Aes256Cbc, Sha256, TLS12;
    0x0069 => TLS_DH_RSA_WITH_AES_256_CBC_SHA256: DhStatic, Rsa, Aes256Cbc, Sha256, TLS12;
    0x006A => TLS_DHE_DSS_WITH_AES_256_CBC_SHA256: Dhe, Dss, Aes256Cbc, Sha256, TLS12;
    0x006B => TLS_DHE_RSA_WITH_AES_256_CBC_SHA256: Dhe, Rsa, Aes256Cbc, Sha256, TLS12;
    0x006C => TLS_DH_anon_WITH_AES_128_CBC_SHA256: DhAnon, Anonymous, Aes128Cbc, Sha256, TLS12;
    0x006D => TLS_DH_anon_WITH_AES_256_CBC_SHA256: DhAnon, Anonymous, Aes256Cbc, Sha256, TLS12;
    0x0084 => TLS_RSA_WITH_CAMELLIA_256_CBC_SHA: Rsa, Rsa, Camellia256Cbc, Sha1, TLS10_UP;
    0x0085 => TLS_DH_DSS_WITH_CAMELLIA_256_CBC_SHA: DhStatic, Dss, Camellia256Cbc, Sha1, TLS10_UP;
    0x0086 => TLS_DH_RSA_WITH_CAMELLIA_256_CBC_SHA: DhStatic, Rsa, Camellia256Cbc, Sha1, TLS10_UP;
    0x0087 => TLS_DHE_DSS_WITH_CAMELLIA_256_CBC_SHA: Dhe, Dss, Camellia256Cbc, Sha1, TLS10_UP;
    0x0088 => TLS_DHE_RSA_WITH_CAMELLIA_256_CBC_SHA: Dhe, Rsa, Camellia256Cbc, Sha1, TLS10_UP;
    0x0089 => TLS_DH_anon_WITH_CAMELLIA_256_CBC_SHA: DhAnon, Anonymous, Camellia256Cbc, Sha1, TLS10_UP;
    0x008A => TLS_PSK_WITH_RC4_128_SHA: Psk, Psk, Rc4_128, Sha1, TLS10_UP;
    0x008B => TLS_PSK_WITH_3DES_EDE_CBC_SHA: Psk, Psk, TripleDesEdeCbc, Sha1, TLS10_UP;
    0x008C => TLS_PSK_WITH_AES_128_CBC_SHA: Psk, Psk, Aes128Cbc, Sha1, TLS10_UP;
    0x008D => TLS_PSK_WITH_AES_256_CBC_SHA: Psk, Psk, Aes256Cbc, Sha1, TLS10_UP;
    0x008E => TLS_DHE_PSK_WITH_RC4_128_SHA: DhePsk, Psk, Rc4_128, Sha1, TLS10_UP;
    0x008F => TLS_DHE_PSK_WITH_3DES_EDE_CBC_SHA: DhePsk, Psk, TripleDesEdeCbc, Sha1, TLS10_UP;
    0x0090 => TLS_DHE_PSK_WITH_AES_128_CBC_SHA: DhePsk, Psk, Aes128Cbc, Sha1, TLS10_UP;
    0x0091 => TLS_DHE_PSK_WITH_AES_256_CBC_SHA: DhePsk, Psk, Aes256Cbc, Sha1, TLS10_UP;
    0x0092 => TLS_RSA_PSK_WITH_RC4_128_SHA: RsaPsk, Rsa, Rc4_128, Sha1, TLS10_UP;
    0x0093 => TLS_RSA_PSK_WITH_3DES_EDE_CBC_SHA: RsaPsk, Rsa, TripleDesEdeCbc, Sha1, TLS10_UP;
    0x0094 => TLS_RSA_PSK_WITH_AES_128_CBC_SHA: RsaPsk, Rsa, Aes128Cbc, Sha1, TLS10_UP;
    0x0095 => TLS_RSA_PSK_WITH_AES_256_CBC_SHA: RsaPsk, Rsa, Aes256Cbc, Sha1, TLS10_UP;
    0x009C => TLS_RSA_WITH_AES_128_GCM_SHA256: Rsa, Rsa, Aes128Gcm, Sha256, TLS12;
    0x009D => TLS_RSA_WITH_AES_256_GCM_SHA384: Rsa, Rsa, Aes256Gcm, Sha384, TLS12;
    0x009E => TLS_DHE_RSA_WITH_AES_128_GCM_SHA256: Dhe, Rsa, Aes128Gcm, Sha256, TLS12;
    0x009F => TLS_DHE_RSA_WITH_AES_256_GCM_SHA384: Dhe, Rsa, Aes256Gcm, Sha384, TLS12;
    0x00A0 => TLS_DH_RSA_WITH_AES_128_GCM_SHA256: DhStatic, Rsa, Aes128Gcm, Sha256, TLS12;
    0x00A1 => TLS_DH_RSA_WITH_AES_256_GCM_SHA384: DhStatic, Rsa, Aes256Gcm, Sha384, TLS12;
    0x00A2 => TLS_DHE_DSS_WITH_AES_128_GCM_SHA256: Dhe, Dss, Aes128Gcm, Sha256, TLS12;
    0x00A3 => TLS_DHE_DSS_WITH_AES_256_GCM_SHA384: Dhe, Dss, Aes256Gcm, Sha384, TLS12;
    0x00A4 => TLS_DH_DSS_WITH_AES_128_GCM_SHA256: DhStatic, Dss, Aes128Gcm, Sha256, TLS12;
    0x00A5 => TLS_DH_DSS_WITH_AES_256_GCM_SHA384: DhStatic, Dss, Aes256Gcm, Sha384, TLS12;
    0x00A6 => TLS_DH_anon_WITH_AES_128_GCM_SHA256: DhAnon, Anonymous, Aes128Gcm, Sha256, TLS12;
    0x00A7 => TLS_DH_anon_WITH_AES_256_GCM_SHA384: DhAnon, Anonymous, Aes256Gcm, Sha384, TLS12;
    0x00A8 => TLS_PSK_WITH_AES_128_GCM_SHA256: Psk, Psk, Aes128Gcm, Sha256, TLS12;
    0x00A9 => TLS_PSK_WITH_AES_256_GCM_SHA384: Psk, Psk, Aes256Gcm, Sha384, TLS12;
    0x00AA => TLS_DHE_PSK_WITH_AES_128_GCM_SHA256: DhePsk, Psk, Aes128Gcm, Sha256, TLS12;
    0x00AB => TLS_DHE_PSK_WITH_AES_256_GCM_SHA384: DhePsk, Psk, Aes256Gcm, Sha384, TLS12;
    0x00AC => TLS_RSA_PSK_WITH_AES_128_GCM_SHA256: RsaPsk, Rsa, Aes128Gcm, Sha256, TLS12;
    0x00AD => TLS_RSA_PSK_WITH_AES_256_GCM_SHA384: RsaPsk, Rsa, Aes256Gcm, Sha384, TLS12;
    0x00AE => TLS_PSK_WITH_AES_128_CBC_SHA256: Psk, Psk, Aes128Cbc, Sha256, TLS12;
    0x00AF => TLS_PSK_WITH_AES_256_CBC_SHA384: Psk, Psk, Aes256Cbc, Sha384, TLS12;
    0x00B0 => TLS_PSK_WITH_NULL_SHA256: Psk, Psk, Null, Sha256, TLS12;
    0x00B1 => TLS_PSK_WITH_NULL_SHA384: Psk, Psk, Null, Sha384, TLS12;
    0x00B2 => TLS_DHE_PSK_WITH_AES_128_CBC_SHA256: DhePsk, Psk, Aes128Cbc, Sha256, TLS12;
    0x00B3 => TLS_DHE_PSK_WITH_AES_256_CBC_SHA384: DhePsk, Psk, Aes256Cbc, Sha384, TLS12;
    0x00B4 => TLS_DHE_PSK_WITH_NULL_SHA256: DhePsk, Psk, Null, Sha256, TLS12;
    0x00B5 => TLS_DHE_PSK_WITH_NULL_SHA384: DhePsk, Psk, Null, Sha384, TLS12;
    0x00B6 => TLS_RSA_PSK_WITH_AES_128_CBC_SHA256: RsaPsk, Rsa, Aes128Cbc, Sha256, TLS12;
    0x00B7 => TLS_RSA_PSK_WITH_AES_256_CBC_SHA384: RsaPsk, Rsa, Aes256Cbc, Sha384, TLS12;
    0x00B8 => TLS_RSA_PSK_WITH_NULL_SHA256: RsaPsk, Rsa, Null, Sha256, TLS12;
    0x00B9 => TLS_RSA_PSK_WITH_NULL_SHA384: RsaPsk, Rsa, Null, Sha384, TLS12;
    0x00BA => TLS_RSA_WITH_CAMELLIA_128_CBC_SHA256: Rsa, Rsa, Camellia128Cbc, Sha256, TLS12;
    0x00BB => TLS_DH_DSS_WITH_CAMELLIA_128_CBC_SHA256: DhStatic, Dss, Camellia128Cbc, Sha256, TLS12;
    0x00BC => TLS_DH_RSA_WITH_CAMELLIA_128_CBC_SHA256: DhStatic, Rsa, Camellia128Cbc, Sha256, TLS12;
    0x00BD => TLS_DHE_DSS_WITH_CAMELLIA_128_CBC_SHA256: Dhe, Dss, Camellia128Cbc, Sha256, TLS12;
    0x00BE => TLS_DHE_RSA_WITH_CAMELLIA_128_CBC_SHA256: Dhe, Rsa, Camellia128Cbc, Sha256, TLS12;
    0x00BF => TLS_DH_anon_WITH_CAMELLIA_128_CBC_SHA256: DhAnon, Anonymous, Camellia128Cbc, Sha256, TLS12;
    0x00C0 => TLS_RSA_WITH_CAMELLIA_256_CBC_SHA256: Rsa, Rsa, Camellia256Cbc, Sha256, TLS12;
    0x00C1 => TLS_DH_DSS_WITH_CAMELLIA_256_CBC_SHA256: DhStatic, Dss, Camellia256Cbc, Sha256, TLS12;
    0x00C2 => TLS_DH_RSA_WITH_CAMELLIA_256_CBC_SHA256: DhStatic, Rsa, Camellia256Cbc, Sha256, TLS12;
    0x00C3 => TLS_DHE_DSS_WITH_CAMELLIA_256_CBC_SHA256: Dhe, Dss, Camellia256Cbc, Sha256, TLS12;
    0x00C4 => TLS_DHE_RSA_WITH_CAMELLIA_256_CBC_SHA256: Dhe, Rsa, Camellia256Cbc, Sha256, TLS12;
    0x00C5 => TLS_DH_anon_WITH_CAMELLIA_256_CBC_SHA256: DhAnon, Anonymous, Camellia256Cbc, Sha256, TLS12;
    0x1301 => TLS_AES_128_GCM_SHA256: Tls13, Tls13, Aes128Gcm, Sha256, TLS13;
    0x1302 => TLS_AES_256_GCM_SHA384: Tls13, Tls13, Aes256Gcm, Sha384, TLS13;
    0x1303 => TLS_CHACHA20_POLY1305_SHA256: Tls13, Tls13, ChaCha20Poly1305, Sha256, TLS13;
    0x1304 => TLS_AES_128_CCM_SHA256: Tls13, Tls13, Aes128Ccm, Sha256, TLS13;
    0x1305 => TLS_AES_128_CCM_8_SHA256: Tls13, Tls13, Aes128Ccm8, Sha256, TLS13;
    0xC001 => TLS_ECDH_ECDSA_WITH_NULL_SHA: EcdhStatic, Ecdsa, Null, Sha1, TLS10_UP;
    0xC002 => TLS_ECDH_ECDSA_WITH_RC4_128_SHA: EcdhStatic, Ecdsa, Rc4_128, Sha1, TLS10_UP;
    0xC003 => TLS_ECDH_ECDSA_WITH_3DES_EDE_CBC_SHA: EcdhStatic, Ecdsa, TripleDesEdeCbc, Sha1, TLS10_UP;
    0xC004 => TLS_ECDH_ECDSA_WITH_AES_128_CBC_SHA: EcdhStatic, Ecdsa, Aes128Cbc, Sha1, TLS10_UP;
    0xC005 => TLS_ECDH_ECDSA_WITH_AES_256_CBC_SHA: EcdhStatic, Ecdsa, Aes256Cbc, Sha1, TLS10_UP;
    0xC006 => TLS_ECDHE_ECDSA_WITH_NULL_SHA: Ecdhe, Ecdsa, Null, Sha1, TLS10_UP;
    0xC007 => TLS_ECDHE_ECDSA_WITH_RC4_128_SHA: Ecdhe, Ecdsa, Rc4_128, Sha1, TLS10_UP;
    0xC008 => TLS_ECDHE_ECDSA_WITH_3DES_EDE_CBC_SHA: Ecdhe, Ecdsa, TripleDesEdeCbc, Sha1, TLS10_UP;
    0xC009 => TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA: Ecdhe, Ecdsa, Aes128Cbc, Sha1, TLS10_UP;
    0xC00A => TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA: Ecdhe, Ecdsa, Aes256Cbc, Sha1, TLS10_UP;
    0xC00B => TLS_ECDH_RSA_WITH_NULL_SHA: EcdhStatic, Rsa, Null, Sha1, TLS10_UP;
    0xC00C => TLS_ECDH_RSA_WITH_RC4_128_SHA: EcdhStatic, Rsa, Rc4_128, Sha1, TLS10_UP;
    0xC00D => TLS_ECDH_RSA_WITH_3DES_EDE_CBC_SHA: EcdhStatic, Rsa, TripleDesEdeCbc, Sha1, TLS10_UP;
    0xC00E => TLS_ECDH_RSA_WITH_AES_128_CBC_SHA: EcdhStatic, Rsa, Aes128Cbc, Sha1, TLS10_UP;
    0xC00F => TLS_ECDH_RSA_WITH_AES_256_CBC_SHA: EcdhStatic, Rsa, Aes256Cbc, Sha1, TLS10_UP;
    0xC010 => TLS_ECDHE_RSA_WITH_NULL_SHA: Ecdhe, Rsa, Null, Sha1, TLS10_UP;
    0xC011 => TLS_ECDHE_RSA_WITH_RC4_128_SHA: Ecdhe, Rsa, Rc4_128, Sha1, TLS10_UP;
    0xC012 => TLS_ECDHE_RSA_WITH_3DES_EDE_CBC_SHA: Ecdhe, Rsa, TripleDesEdeCbc, Sha1, TLS10_UP;
    0xC013 => TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA: Ecdhe, Rsa, Aes128Cbc, Sha1, TLS10_UP;
    0xC014 => TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA: Ecdhe, Rsa, Aes256Cbc, Sha1, TLS10_UP;
    0xC015 => TLS_ECDH_anon_WITH_NULL_SHA: EcdhAnon, Anonymous, Null, Sha1, TLS10_UP;
    0xC016 => TLS_ECDH_anon_WITH_RC4_128_SHA: EcdhAnon, Anonymous, Rc4_128, Sha1, TLS10_UP;
    0xC017 => TLS_ECDH_anon_WITH_3DES_EDE_CBC_SHA: EcdhAnon, Anonymous, TripleDesEdeCbc, Sha1, TLS10_UP;
    0xC018 => TLS_ECDH_anon_WITH_AES_128_CBC_SHA: EcdhAnon, Anonymous, Aes128Cbc, Sha1, TLS10_UP;
    0xC019 => TLS_ECDH_anon_WITH_AES_256_CBC_SHA: EcdhAnon, Anonymous, Aes256Cbc, Sha1, TLS10_UP;
    0xC023 => TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256: Ecdhe, Ecdsa, Aes128Cbc, Sha256, TLS12;
    0xC024 => TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA384: Ecdhe, Ecdsa, Aes256Cbc, Sha384, TLS12;
    0xC025 => TLS_ECDH_ECDSA_WITH_AES_128_CBC_SHA256: EcdhStatic, Ecdsa, Aes128Cbc, Sha256, TLS12;
    0xC026 => TLS_ECDH_ECDSA_WITH_AES_256_CBC_SHA384: EcdhStatic, Ecdsa, Aes256Cbc, Sha384, TLS12;
    0xC027 => TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256: Ecdhe, Rsa, Aes128Cbc, Sha256, TLS12;
    0xC028 => TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384: Ecdhe, Rsa, Aes256Cbc, Sha384, TLS12;
    0xC029 => TLS_ECDH_RSA_WITH_AES_128_CBC_SHA256: EcdhStatic, Rsa, Aes128Cbc, Sha256, TLS12;
    0xC02A => TLS_ECDH_RSA_WITH_AES_256_CBC_SHA384: EcdhStatic, Rsa, Aes256Cbc, Sha384, TLS12;
    0xC02B => TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256: Ecdhe, Ecdsa, Aes128Gcm, Sha256, TLS12;
    0xC02C => TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384: Ecdhe, Ecdsa, Aes256Gcm, Sha384, TLS12;
    0xC02D => TLS_ECDH_ECDSA_WITH_AES_128_GCM_SHA256: EcdhStatic, Ecdsa, Aes128Gcm, Sha256, TLS12;
    0xC02E => TLS_ECDH_ECDSA_WITH_AES_256_GCM_SHA384: EcdhStatic, Ecdsa, Aes256Gcm, Sha384, TLS12;
    0xC02F => TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256: Ecdhe, Rsa, Aes128Gcm, Sha256, TLS12;
    0xC030 => TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384: Ecdhe, Rsa, Aes256Gcm, Sha384, TLS12;
    0xC031 => TLS_ECDH_RSA_WITH_AES_128_GCM_SHA256: EcdhStatic, Rsa, Aes128Gcm, Sha256, TLS12;
    0xC032 => TLS_ECDH_RSA_WITH_AES_256_GCM_SHA384: EcdhStatic, Rsa, Aes256Gcm, Sha384, TLS12;
    0xC033 => TLS_ECDHE_PSK_WITH_RC4_128_SHA: EcdhePsk, Psk, Rc4_128, Sha1, TLS10_UP;
    0xC034 => TLS_ECDHE_PSK_WITH_3DES_EDE_CBC_SHA: EcdhePsk, Psk, TripleDesEdeCbc, Sha1, TLS10_UP;
    0xC035 => TLS_ECDHE_PSK_WITH_AES_128_CBC_SHA: EcdhePsk, Psk, Aes128Cbc, Sha1, TLS10_UP;
    0xC036 => TLS_ECDHE_PSK_WITH_AES_256_CBC_SHA: EcdhePsk, Psk, Aes256Cbc, Sha1, TLS10_UP;
    0xC037 => TLS_ECDHE_PSK_WITH_AES_128_CBC_SHA256: EcdhePsk, Psk, Aes128Cbc, Sha256, TLS12;
    0xC038 => TLS_ECDHE_PSK_WITH_AES_256_CBC_SHA384: EcdhePsk, Psk, Aes256Cbc, Sha384, TLS12;
    0xC039 => TLS_ECDHE_PSK_WITH_NULL_SHA: EcdhePsk, Psk, Null, Sha1, TLS10_UP;
    0xC03A => TLS_ECDHE_PSK_WITH_NULL_SHA256: EcdhePsk, Psk, Null, Sha256, TLS12;
    0xC03B => TLS_ECDHE_PSK_WITH_NULL_SHA384: EcdhePsk, Psk, Null, Sha384, TLS12;
    0xC03C => TLS_RSA_WITH_ARIA_128_CBC_SHA256: Rsa, Rsa, Aria128Cbc, Sha256, TLS12;
    0xC03D => TLS_RSA_WITH_ARIA_256_CBC_SHA384: Rsa, Rsa, Aria256Cbc, Sha384, TLS12;
    0xC03E => TLS_DH_DSS_WITH_ARIA_128_CBC_SHA256: DhStatic, Dss, Aria128Cbc, Sha256, TLS12;
    0xC03F => TLS_DH_DSS_WITH_ARIA_256_CBC_SHA384: DhStatic, Dss, Aria256Cbc, Sha384, TLS12;
    0xC040 => TLS_DH_RSA_WITH_ARIA_128_CBC_SHA256: DhStatic, Rsa, Aria128Cbc, Sha256, TLS12;
    0xC041 => TLS_DH_RSA_WITH_ARIA_256_CBC_SHA384: DhStatic, Rsa, Aria256Cbc, Sha384, TLS12;
    0xC042 => TLS_DHE_DSS_WITH_ARIA_128_CBC_SHA256: Dhe, Dss, Aria128Cbc, Sha256, TLS12;
    0xC043 => TLS_DHE_DSS_WITH_ARIA_256_CBC_SHA384: Dhe, Dss, Aria256Cbc, Sha384, TLS12;
    0xC044 => TLS_DHE_RSA_WITH_ARIA_128_CBC_SHA256: Dhe, Rsa, Aria128Cbc, Sha256, TLS12;
    0xC045 => TLS_DHE_RSA_WITH_ARIA_256_CBC_SHA384: Dhe, Rsa, Aria256Cbc, Sha384, TLS12;
    0xC046 => TLS_DH_anon_WITH_ARIA_128_CBC_SHA256: DhAnon, Anonymous, Aria128Cbc, Sha256, TLS12;
    0xC047 => TLS_DH_anon_WITH_ARIA_256_CBC_SHA384: DhAnon, Anonymous, Aria256Cbc, Sha384, TLS12;
    0xC048 => TLS_ECDHE_ECDSA_WITH_ARIA_128_CBC_SHA256: Ecdhe, Ecdsa, Aria128Cbc, Sha256, TLS12;
    0xC049 => TLS_ECDHE_ECDSA_WITH_ARIA_256_CBC_SHA384: Ecdhe, Ecdsa, Aria256Cbc, Sha384, TLS12;
    0xC04A => TLS_ECDH_ECDSA_WITH_ARIA_128_CBC_SHA256: EcdhStatic, Ecdsa, Aria128Cbc, Sha256, TLS12;
    0xC04B => TLS_ECDH_ECDSA_WITH_ARIA_256_CBC_SHA384: EcdhStatic, Ecdsa, Aria256Cbc, Sha384, TLS12;
    0xC04C => TLS_ECDHE_RSA_WITH_ARIA_128_CBC_SHA256: Ecdhe, Rsa, Aria128Cbc, Sha256, TLS12;
    0xC04D => TLS_ECDHE_RSA_WITH_ARIA_256_CBC_SHA384: Ecdhe, Rsa, Aria256Cbc, Sha384, TLS12;
    0xC04E => TLS_ECDH_RSA_WITH_ARIA_128_CBC_SHA256: EcdhStatic, Rsa, Aria128Cbc, Sha256, TLS12;
    0xC04F => TLS_ECDH_RSA_WITH_ARIA_256_CBC_SHA384: EcdhStatic, Rsa, Aria256Cbc, Sha384, TLS12;
    0xC050 => TLS_RSA_WITH_ARIA_128_GCM_SHA256: Rsa, Rsa, Aria128Gcm, Sha256, TLS12;
    0xC051 => TLS_RSA_WITH_ARIA_256_GCM_SHA384: Rsa, Rsa, Aria256Gcm, Sha384, TLS12;
    0xC052 => TLS_DHE_RSA_WITH_ARIA_128_GCM_SHA256: Dhe, Rsa, Aria128Gcm, Sha256, TLS12;
    0xC053 => TLS_DHE_RSA_WITH_ARIA_256_GCM_SHA384: Dhe, Rsa, Aria256Gcm, Sha384, TLS12;
    0xC054 => TLS_DH_RSA_WITH_ARIA_128_GCM_SHA256: DhStatic, Rsa, Aria128Gcm, Sha256, TLS12;
    0xC055 => TLS_DH_RSA_WITH_ARIA_256_GCM_SHA384: DhStatic, Rsa, Aria256Gcm, Sha384, TLS12;
    0xC056 => TLS_DHE_DSS_WITH_ARIA_128_GCM_SHA256: Dhe, Dss, Aria128Gcm, Sha256, TLS12;
    0xC057 => TLS_DHE_DSS_WITH_ARIA_256_GCM_SHA384: Dhe, Dss, Aria256Gcm, Sha384, TLS12;
    0xC058 => TLS_DH_DSS_WITH_ARIA_128_GCM_SHA256: DhStatic, Dss, Aria128Gcm, Sha256, TLS12;
    0xC059 => TLS_DH_DSS_WITH_ARIA_256_GCM_SHA384: DhStatic, Dss, Aria256Gcm, Sha384, TLS12;
    0xC05A => TLS_DH_anon_WITH_ARIA_128_GCM_SHA256: DhAnon, Anonymous, Aria128Gcm, Sha256, TLS12;
    0xC05B => TLS_DH_anon_WITH_ARIA_256_GCM_SHA384: DhAnon, Anonymous, Aria256Gcm, Sha384, TLS12;
    0xC05C => TLS_ECDHE_ECDSA_WITH_ARIA_128_GCM_SHA256: Ecdhe, Ecdsa, Aria128Gcm, Sha256, TLS12;
    0xC05D => TLS_ECDHE_ECDSA_WITH_ARIA_256_GCM_SHA384: Ecdhe, Ecdsa, Aria256Gcm, Sha384, TLS12;
    0xC05E => TLS_ECDH_ECDSA_WITH_ARIA_128_GCM_SHA256: EcdhStatic, Ecdsa, Aria128Gcm, Sha256, TLS12;
    0xC05F => TLS_ECDH_ECDSA_WITH_ARIA_256_GCM_SHA384: EcdhStatic, Ecdsa, Aria256Gcm, Sha384, TLS12;
    0xC060 => TLS_ECDHE_RSA_WITH_ARIA_128_GCM_SHA256: Ecdhe, Rsa, Aria128Gcm, Sha256, TLS12;
    0xC061 => TLS_ECDHE_RSA_WITH_ARIA_256_GCM_SHA384: Ecdhe, Rsa, Aria256Gcm, Sha384, TLS12;
    0xC062 => TLS_ECDH_RSA_WITH_ARIA_128_GCM_SHA256: EcdhStatic, Rsa, Aria128Gcm, Sha256, TLS12;
    0xC063 => TLS_ECDH_RSA_WITH_ARIA_256_GCM_SHA384: EcdhStatic, Rsa, Aria256Gcm, Sha384, TLS12;
    0xC064 => TLS_PSK_WITH_ARIA_128_CBC_SHA256: Psk, Psk, Aria128Cbc, Sha256, TLS12;
    0xC065 => TLS_PSK_WITH_ARIA_256_CBC_SHA384: Psk, Psk, Aria256Cbc, Sha384, TLS12;
    0xC066 => TLS_DHE_PSK_WITH_ARIA_128_CBC_SHA256: DhePsk, Psk, Aria128Cbc, Sha256, TLS12;
    0xC067 => TLS_DHE_PSK_WITH_ARIA_256_CBC_SHA384: DhePsk, Psk, Aria256Cbc, Sha384, TLS12;
    0xC068 => TLS_RSA_PSK_WITH_ARIA_128_CBC_SHA256: RsaPsk, Rsa, Aria128Cbc, Sha256, TLS12;
    0xC069 => TLS_RSA_PSK_WITH_ARIA_256_CBC_SHA384: RsaPsk, Rsa, Aria256Cbc, Sha384, TLS12;
    0xC06A => TLS_PSK_WITH_ARIA_128_GCM_SHA256: Psk, Psk, Aria128Gcm, Sha256, TLS12;
    0xC06B => TLS_PSK_WITH_ARIA_256_GCM_SHA384: Psk, Psk, Aria256Gcm, Sha384, TLS12;
    0xC06C => TLS_DHE_PSK_WITH_ARIA_128_GCM_SHA256: DhePsk, Psk, Aria128Gcm, Sha256, TLS12;
    0xC06D => TLS_DHE_PSK_WITH_ARIA_256_GCM_SHA384: DhePsk, Psk, Aria256Gcm, Sha384, TLS12;
    0xC06E => TLS_RSA_PSK_WITH_ARIA_128_GCM_SHA256: RsaPsk, Rsa, Aria128Gcm, Sha256, TLS12;
    0xC06F => TLS_RSA_PSK_WITH_ARIA_256_GCM_SHA384: RsaPsk, Rsa, Aria256Gcm, Sha384, TLS12;
    0xC070 => TLS_ECDHE_PSK_WITH_ARIA_128_CBC_SHA256: EcdhePsk, Psk, Aria128Cbc, Sha256, TLS12;
    0xC071 => TLS_ECDHE_PSK_WITH_ARIA_256_CBC_SHA384: EcdhePsk, Psk, Aria256Cbc, Sha384, TLS12;
    0xC072 => TLS_ECDHE_ECDSA_WITH_CAMELLIA_128_CBC_SHA256: Ecdhe, Ecdsa, Camellia128Cbc, Sha256, TLS12;
    0xC073 => TLS_ECDHE_ECDSA_WITH_CAMELLIA_256_CBC_SHA384: Ecdhe, Ecdsa, Camellia256Cbc, Sha384, TLS12;
    0xC074 => TLS_ECDH_ECDSA_WITH_CAMELLIA_128_CBC_SHA256: EcdhStatic, Ecdsa, Camellia128Cbc, Sha256, TLS12;
    0xC075 => TLS_ECDH_ECDSA_WITH_CAMELLIA_256_CBC_SHA384: EcdhStatic, Ecdsa, Camellia256Cbc, Sha384, TLS12;
    0xC076 => TLS_ECDHE_RSA_WITH_CAMELLIA_128_CBC_SHA256: Ecdhe, Rsa, Camellia128Cbc, Sha256, TLS12;
    0xC077 => TLS_ECDHE_RSA_WITH_CAMELLIA_256_CBC_SHA384: Ecdhe, Rsa, Camellia256Cbc, Sha384, TLS12;
    0xC078 => TLS_ECDH_RSA_WITH_CAMELLIA_128_CBC_SHA256: EcdhStatic, Rsa, Camellia128Cbc, Sha256, TLS12;
    0xC079 => TLS_ECDH_RSA_WITH_CAMELLIA_256_CBC_SHA384: EcdhStatic, Rsa, Camellia256Cbc, Sha384, TLS12;
    0xC07A => TLS_RSA_WITH_CAMELLIA_128_GCM_SHA256: Rsa, Rsa, Camellia128Gcm, Sha256, TLS12;
    0xC07B => TLS_RSA_WITH_CAMELLIA_256_GCM_SHA384: Rsa, Rsa, Camellia256Gcm, Sha384, TLS12;
    0xC07C => TLS_DHE_RSA_WITH_CAMELLIA_128_GCM_SHA256: Dhe, Rsa, Camellia128Gcm, Sha256, TLS12;
    0xC07D => TLS_DHE_RSA_WITH_CAMELLIA_256_GCM_SHA384: Dhe, Rsa, Camellia256Gcm, Sha384, TLS12;
    0xC07E => TLS_DH_RSA_WITH_CAMELLIA_128_GCM_SHA256: DhStatic, Rsa, Camellia128Gcm, Sha256, TLS12;
    0xC07F => TLS_DH_RSA_WITH_CAMELLIA_256_GCM_SHA384: DhStatic, Rsa, Camellia256Gcm, Sha384, TLS12;
    0xC080 => TLS_DHE_DSS_WITH_CAMELLIA_128_GCM_SHA256: Dhe, Dss, Camellia128Gcm, Sha256, TLS12;
    0xC081 => TLS_DHE_DSS_WITH_CAMELLIA_256_GCM_SHA384: Dhe, Dss, Camellia256Gcm, Sha384, TLS12;
    0xC082 => TLS_DH_DSS_WITH_CAMELLIA_128_GCM_SHA256: DhStatic, Dss, Camellia128Gcm, Sha256, TLS12;
    0xC083 => TLS_DH_DSS_WITH_CAMELLIA_256_GCM_SHA384: DhStatic, Dss, Camellia256Gcm, Sha384, TLS12;
    0xC084 => TLS_DH_anon_WITH_CAMELLIA_128_GCM_SHA256: DhAnon, Anonymous, Camellia128Gcm, Sha256, TLS12;
    0xC085 => TLS_DH_anon_WITH_CAMELLIA_256_GCM_SHA384: DhAnon, Anonymous, Camellia256Gcm, Sha384, TLS12;
    0xC086 => TLS_ECDHE_ECDSA_WITH_CAMELLIA_128_GCM_SHA256: Ecdhe, Ecdsa, Camellia128Gcm, Sha256, TLS12;
    0xC087 => TLS_ECDHE_ECDSA_WITH_CAMELLIA_256_GCM_SHA384: Ecdhe, Ecdsa, Camellia256Gcm, Sha384, TLS12;
    0xC088 => TLS_ECDH_ECDSA_WITH_CAMELLIA_128_GCM_SHA256: EcdhStatic, Ecdsa, Camellia128Gcm, Sha256, TLS12;
    0xC089 => TLS_ECDH_ECDSA_WITH_CAMELLIA_256_GCM_SHA384: EcdhStatic, Ecdsa, Camellia256Gcm, Sha384, TLS12;
    0xC08A => TLS_ECDHE_RSA_WITH_CAMELLIA_128_GCM_SHA256: Ecdhe, Rsa, Camellia128Gcm, Sha256, TLS12;
    0xC08B => TLS_ECDHE_RSA_WITH_CAMELLIA_256_GCM_SHA384: Ecdhe, Rsa, Camellia256Gcm, Sha384, TLS12;
    0xC08C => TLS_ECDH_RSA_WITH_CAMELLIA_128_GCM_SHA256: EcdhStatic, Rsa, Camellia128Gcm, Sha256, TLS12;
    0xC08D => TLS_ECDH_RSA_WITH_CAMELLIA_256_GCM_SHA384: EcdhStatic, Rsa, Camellia256Gcm, Sha384, TLS12;
    0xC08E => TLS_PSK_WITH_CAMELLIA_128_GCM_SHA256: Psk, Psk, Camellia128Gcm, Sha256, TLS12;
    0xC08F => TLS_PSK_WITH_CAMELLIA_256_GCM_SHA384: Psk, Psk, Camellia256Gcm, Sha384, TLS12;
    0xC090 => TLS_DHE_PSK_WITH_CAMELLIA_128_GCM_SHA256: DhePsk, Psk, Camellia128Gcm, Sha256, TLS12;
    0xC091 => TLS_DHE_PSK_WITH_CAMELLIA_256_GCM_SHA384: DhePsk, Psk, Camellia256Gcm, Sha384, TLS12;
    0xC092 => TLS_RSA_PSK_WITH_CAMELLIA_128_GCM_SHA256: RsaPsk, Rsa, Camellia128Gcm, Sha256, TLS12;
    0xC093 => TLS_RSA_PSK_WITH_CAMELLIA_256_GCM_SHA384: RsaPsk, Rsa, Camellia256Gcm, Sha384, TLS12;
    0xC094 => TLS_PSK_WITH_CAMELLIA_128_CBC_SHA256: Psk, Psk, Camellia128Cbc, Sha256, TLS12;
    0xC095 => TLS_PSK_WITH_CAMELLIA_256_CBC_SHA384: Psk, Psk, Camellia256Cbc, Sha384, TLS12;
    0xC096 => TLS_DHE_PSK_WITH_CAMELLIA_128_CBC_SHA256: DhePsk, Psk, Camellia128Cbc, Sha256, TLS12;
    0xC097 => TLS_DHE_PSK_WITH_CAMELLIA_256_CBC_SHA384: DhePsk, Psk, Camellia256Cbc, Sha384, TLS12;
    0xC098 => TLS_RSA_PSK_WITH_CAMELLIA_128_CBC_SHA256: RsaPsk, Rsa, Camellia128Cbc, Sha256, TLS12;
    0xC099 => TLS_RSA_PSK_WITH_CAMELLIA_256_CBC_SHA384: RsaPsk, Rsa, Camellia256Cbc, Sha384, TLS12;
    0xC09A => TLS_ECDHE_PSK_WITH_CAMELLIA_128_CBC_SHA256: EcdhePsk, Psk, Camellia128Cbc, Sha256, TLS12;
    0xC09B => TLS_ECDHE_PSK_WITH_CAMELLIA_256_CBC_SHA384: EcdhePsk, Psk, Camellia256Cbc, Sha384, TLS12;
    0xC09C => TLS_RSA_WITH_AES_128_CCM: Rsa, Rsa, Aes128Ccm, Sha256, TLS12;
    0xC09D => TLS_RSA_WITH_AES_256_CCM: Rsa, Rsa, Aes256Ccm, Sha256, TLS12;
    0xC09E => TLS_DHE_RSA_WITH_AES_128_CCM: Dhe, Rsa, Aes128Ccm, Sha256, TLS12;
    0xC09F => TLS_DHE_RSA_WITH_AES_256_CCM: Dhe, Rsa, Aes256Ccm, Sha256, TLS12;
    0xC0A0 => TLS_RSA_WITH_AES_128_CCM_8: Rsa, Rsa, Aes128Ccm8, Sha256, TLS12;
    0xC0A1 => TLS_RSA_WITH_AES_256_CCM_8: Rsa, Rsa, Aes256Ccm8, Sha256, TLS12;
    0xC0A2 => TLS_DHE_RSA_WITH_AES_128_CCM_8: Dhe, Rsa, Aes128Ccm8, Sha256, TLS12;
    0xC0A3 => TLS_DHE_RSA_WITH_AES_256_CCM_8: Dhe, Rsa, Aes256Ccm8, Sha256, TLS12;
    0xC0A4 => TLS_PSK_WITH_AES_128_CCM: Psk, Psk, Aes128Ccm, Sha256, TLS12;
    0xC0A5 => TLS_PSK_WITH_AES_256_CCM: Psk, Psk, Aes256Ccm, Sha256, TLS12;
    0xC0A6 => TLS_DHE_PSK_WITH_AES_128_CCM: DhePsk, Psk, Aes128Ccm, Sha256, TLS12;
    0xC0A7 => TLS_DHE_PSK_WITH_AES_256_CCM: DhePsk, Psk, Aes256Ccm, Sha256, TLS12;
    0xC0A8 => TLS_PSK_WITH_AES_128_CCM_8: Psk, Psk, Aes128Ccm8, Sha256, TLS12;
    0xC0A9 => TLS_PSK_WITH_AES_256_CCM_8: Psk, Psk, Aes256Ccm8, Sha256, TLS12;
    0xC0AA => TLS_PSK_DHE_WITH_AES_128_CCM_8: DhePsk, Psk, Aes128Ccm8, Sha256, TLS12;
    0xC0AB => TLS_PSK_DHE_WITH_AES_256_CCM_8: DhePsk, Psk, Aes256Ccm8, Sha256, TLS12;
    0xC0AC => TLS_ECDHE_ECDSA_WITH_AES_128_CCM: Ecdhe, Ecdsa, Aes128Ccm, Sha256, TLS12;
    0xC0AD => TLS_ECDHE_ECDSA_WITH_AES_256_CCM: Ecdhe, Ecdsa, Aes256Ccm, Sha256, TLS12;
    0xC0AE => TLS_ECDHE_ECDSA_WITH_AES_128_CCM_8: Ecdhe, Ecdsa, Aes128Ccm8, Sha256, TLS12;
    0xC0AF => TLS_ECDHE_ECDSA_WITH_AES_256_CCM_8: Ecdhe, Ecdsa, Aes256Ccm8, Sha256, TLS12;
    0xCCA8 => TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256: Ecdhe, Rsa, ChaCha20Poly1305, Sha256, TLS12;
    0xCCA9 => TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256: Ecdhe, Ecdsa, ChaCha20Poly1305, Sha256, TLS12;
    0xCCAA => TLS_DHE_RSA_WITH_CHACHA20_POLY1305_SHA256: Dhe, Rsa, ChaCha20Poly1305, Sha256, TLS12;
    0xCCAB => TLS_PSK_WITH_CHACHA20_POLY1305_SHA256: Psk, Psk, ChaCha20Poly1305, Sha256, TLS12;
    0xCCAC => TLS_ECDHE_PSK_WITH_CHACHA20_POLY1305_SHA256: EcdhePsk, Psk, ChaCha20Poly1305, Sha256, TLS12;
    0xCCAD => TLS_DHE_PSK_WITH_CHACHA20_POLY1305_SHA256: DhePsk, Psk, ChaCha20Poly1305, Sha256, TLS12;
    0xCCAE => TLS_RSA_PSK_WITH_CHACHA20_POLY1305_SHA256: RsaPsk, Rsa, ChaCha20Poly1305, Sha256, TLS12;
    0xD001 => TLS_ECDHE_PSK_WITH_AES_128_GCM_SHA256: EcdhePsk, Psk, Aes128Gcm, Sha256, TLS12;
    0xD002 => TLS_ECDHE_PSK_WITH_AES_256_GCM_SHA384: EcdhePsk, Psk, Aes256Gcm, Sha384, TLS12;
    0xD003 => TLS_ECDHE_PSK_WITH_AES_128_CCM_8_SHA256: EcdhePsk, Psk, Aes128Ccm8, Sha256, TLS12;
    0xD005 => TLS_ECDHE_PSK_WITH_AES_128_CCM_SHA256: EcdhePsk, Psk, Aes128Ccm, Sha256, TLS12;
}
