//! Pre-master secret establishment for every supported key exchange.
//!
//! [`KeyExchange`] owns one side's material. The flow is the same for every
//! algorithm: [`KeyExchange::new_local`] produces what this side sends,
//! [`KeyExchange::decode_remote`] absorbs what the peer sent, and
//! [`KeyExchange::shared_secret`] yields the pre-master secret.
//!
//! Ephemeral groups are driven by the side that speaks first (the server's
//! ServerKeyExchange), so for the hybrid KEM groups the server holds the KEM
//! key pair and the client encapsulates against it.

use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{Ciphertext, Encoded, EncodedSizeUser, KemCore, MlKem768};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use pqcrypto_kyber::kyber768;
use pqcrypto_traits::kem::{
    Ciphertext as KemCiphertext, PublicKey as KemPublicKey, SharedSecret as KemSharedSecret,
};
use rand::rngs::OsRng;
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypt::NamedGroup;
use crate::suites::KeyExchangeKind;
use crate::{CryptoError, TlsError, TlsRole};

/// RSA pre-master secret length.
pub const RSA_PRE_MASTER_LEN: usize = 48;

const X25519_LEN: usize = 32;

type MlKem768DecapsulationKey = <MlKem768 as KemCore>::DecapsulationKey;
type MlKem768EncapsulationKey = <MlKem768 as KemCore>::EncapsulationKey;
const MIN_DH_PRIME_BITS: usize = 512;

fn random_bytes(len: usize) -> Result<Vec<u8>, TlsError> {
    let mut out = vec![0u8; len];
    getrandom::getrandom(&mut out).map_err(|_| CryptoError::RandomFail)?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Finite-field parameters
// ---------------------------------------------------------------------------

/// Finite-field Diffie-Hellman group, big-endian.
#[derive(Clone, PartialEq, Eq)]
pub struct DhParams {
    pub p: Vec<u8>,
    pub g: Vec<u8>,
}

impl std::fmt::Debug for DhParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DhParams({} bits)", BigUint::from_bytes_be(&self.p).bits())
    }
}

impl DhParams {
    pub fn new(p: Vec<u8>, g: Vec<u8>) -> Result<Self, TlsError> {
        let params = Self { p, g };
        params.validate()?;
        Ok(params)
    }

    /// Reject primes that are too small, even, or generators outside `(1, p-1)`.
    pub fn validate(&self) -> Result<(), TlsError> {
        let p = BigUint::from_bytes_be(&self.p);
        let g = BigUint::from_bytes_be(&self.g);
        let one = BigUint::from(1u32);
        let odd = self.p.last().is_some_and(|b| b & 1 == 1);
        if p.bits() < MIN_DH_PRIME_BITS || !odd {
            return Err(TlsError::IllegalParameter(format!(
                "DH prime of {} bits",
                p.bits()
            )));
        }
        if g <= one || g >= &p - &one {
            return Err(TlsError::IllegalParameter("DH generator out of range".into()));
        }
        Ok(())
    }
}

/// The group an ephemeral exchange runs over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KxGroup {
    Named(NamedGroup),
    Ffdhe(DhParams),
}

// ---------------------------------------------------------------------------
// Ephemeral shares
// ---------------------------------------------------------------------------

enum EphemeralSecret {
    X25519(x25519_dalek::StaticSecret),
    X448(Box<x448::Secret>),
    P256(p256::ecdh::EphemeralSecret),
    P384(p384::ecdh::EphemeralSecret),
    Hybrid {
        x25519: x25519_dalek::StaticSecret,
        kem: Option<Box<kyber768::SecretKey>>,
    },
    /// ML-KEM-768 paired with a classical share. `kem_first` fixes both the
    /// share layout and the secret concatenation order.
    MlKem {
        classical: Box<EphemeralShare>,
        kem: Option<Box<MlKem768DecapsulationKey>>,
        kem_first: bool,
    },
    Ffdhe {
        params: DhParams,
        exponent: Zeroizing<Vec<u8>>,
    },
}

/// One side's ephemeral key pair and public share.
pub struct EphemeralShare {
    group: KxGroup,
    secret: EphemeralSecret,
    public: Vec<u8>,
}

impl EphemeralShare {
    /// Generate a key pair. For the hybrid group, `role` decides whether a
    /// KEM key pair is generated (server) or the KEM half waits for the
    /// peer's public key (client).
    pub fn generate(group: &KxGroup, role: TlsRole) -> Result<Self, TlsError> {
        let (secret, public) = match group {
            KxGroup::Named(NamedGroup::X25519) => {
                let sk = x25519_dalek::StaticSecret::random_from_rng(OsRng);
                let pk = x25519_dalek::PublicKey::from(&sk);
                (EphemeralSecret::X25519(sk), pk.as_bytes().to_vec())
            }
            KxGroup::Named(NamedGroup::X448) => {
                let seed = Zeroizing::new(random_bytes(56)?);
                let sk = x448::Secret::from_bytes(&seed).ok_or(CryptoError::InvalidKey)?;
                let pk = x448::PublicKey::from(&sk);
                (EphemeralSecret::X448(Box::new(sk)), pk.as_bytes().to_vec())
            }
            KxGroup::Named(NamedGroup::SECP256R1) => {
                let sk = p256::ecdh::EphemeralSecret::random(&mut OsRng);
                let pk = sk.public_key().to_encoded_point(false).as_bytes().to_vec();
                (EphemeralSecret::P256(sk), pk)
            }
            KxGroup::Named(NamedGroup::SECP384R1) => {
                let sk = p384::ecdh::EphemeralSecret::random(&mut OsRng);
                let pk = sk.public_key().to_encoded_point(false).as_bytes().to_vec();
                (EphemeralSecret::P384(sk), pk)
            }
            KxGroup::Named(NamedGroup::X25519_KYBER768_DRAFT00) => {
                let x25519 = x25519_dalek::StaticSecret::random_from_rng(OsRng);
                let mut public = x25519_dalek::PublicKey::from(&x25519).as_bytes().to_vec();
                let kem = match role {
                    TlsRole::Server => {
                        let (pk, sk) = kyber768::keypair();
                        public.extend_from_slice(pk.as_bytes());
                        Some(Box::new(sk))
                    }
                    TlsRole::Client => None,
                };
                (EphemeralSecret::Hybrid { x25519, kem }, public)
            }
            KxGroup::Named(g @ (NamedGroup::X25519_MLKEM768 | NamedGroup::SECP256R1_MLKEM768)) => {
                // X25519MLKEM768 puts the ML-KEM half first; SecP256r1MLKEM768
                // puts the curve point first.
                let (classical_group, kem_first) = if *g == NamedGroup::X25519_MLKEM768 {
                    (NamedGroup::X25519, true)
                } else {
                    (NamedGroup::SECP256R1, false)
                };
                let classical = Box::new(Self::generate(&KxGroup::Named(classical_group), role)?);
                let (kem, kem_public) = match role {
                    TlsRole::Server => {
                        let (dk, ek) = MlKem768::generate(&mut OsRng);
                        (Some(Box::new(dk)), ek.as_bytes().as_slice().to_vec())
                    }
                    TlsRole::Client => (None, Vec::new()),
                };
                let public = join(kem_first, &kem_public, classical.public_bytes());
                (
                    EphemeralSecret::MlKem {
                        classical,
                        kem,
                        kem_first,
                    },
                    public,
                )
            }
            KxGroup::Named(other) => {
                return Err(TlsError::HandshakeFailed(format!(
                    "unsupported group {}",
                    other.name()
                )))
            }
            KxGroup::Ffdhe(params) => {
                params.validate()?;
                let p = BigUint::from_bytes_be(&params.p);
                let g = BigUint::from_bytes_be(&params.g);
                // 2x the security level of the largest supported prime.
                let mut exponent = Zeroizing::new(random_bytes(params.p.len().min(64))?);
                exponent[0] |= 0x80;
                let public = g.modpow(&BigUint::from_bytes_be(&exponent), &p).to_bytes_be();
                (
                    EphemeralSecret::Ffdhe {
                        params: params.clone(),
                        exponent,
                    },
                    public,
                )
            }
        };
        Ok(Self {
            group: group.clone(),
            secret,
            public,
        })
    }

    pub fn group(&self) -> &KxGroup {
        &self.group
    }

    pub fn public_bytes(&self) -> &[u8] {
        &self.public
    }

    /// Combine with the peer's share. For the client side of the hybrid
    /// groups this also encapsulates, placing the ciphertext in the local
    /// public share.
    pub fn agree(&mut self, peer: &[u8]) -> Result<Zeroizing<Vec<u8>>, TlsError> {
        let invalid = || TlsError::IllegalParameter("invalid peer key share".into());
        let secret = match &mut self.secret {
            EphemeralSecret::X25519(sk) => Zeroizing::new(x25519_agree(sk, peer)?),
            EphemeralSecret::X448(sk) => {
                let pk = x448::PublicKey::from_bytes(peer).ok_or_else(invalid)?;
                let ss = sk.as_diffie_hellman(&pk).ok_or_else(invalid)?;
                Zeroizing::new(ss.as_bytes().to_vec())
            }
            EphemeralSecret::P256(sk) => {
                let pk = p256::PublicKey::from_sec1_bytes(peer).map_err(|_| invalid())?;
                Zeroizing::new(sk.diffie_hellman(&pk).raw_secret_bytes().to_vec())
            }
            EphemeralSecret::P384(sk) => {
                let pk = p384::PublicKey::from_sec1_bytes(peer).map_err(|_| invalid())?;
                Zeroizing::new(sk.diffie_hellman(&pk).raw_secret_bytes().to_vec())
            }
            EphemeralSecret::Hybrid { x25519, kem } => {
                if peer.len() <= X25519_LEN {
                    return Err(invalid());
                }
                let (peer_x, peer_kem) = peer.split_at(X25519_LEN);
                let mut secret = Zeroizing::new(x25519_agree(x25519, peer_x)?);
                match kem {
                    Some(sk) => {
                        let ct = kyber768::Ciphertext::from_bytes(peer_kem)
                            .map_err(|_| CryptoError::KemInvalidEncapsulation)?;
                        let ss = kyber768::decapsulate(&ct, sk);
                        secret.extend_from_slice(ss.as_bytes());
                    }
                    None => {
                        let pk = kyber768::PublicKey::from_bytes(peer_kem)
                            .map_err(|_| invalid())?;
                        let (ss, ct) = kyber768::encapsulate(&pk);
                        secret.extend_from_slice(ss.as_bytes());
                        self.public.extend_from_slice(ct.as_bytes());
                    }
                }
                secret
            }
            EphemeralSecret::MlKem {
                classical,
                kem,
                kem_first,
            } => {
                let classical_len = classical.public_bytes().len();
                if peer.len() <= classical_len {
                    return Err(invalid());
                }
                let (peer_kem, peer_classical) = if *kem_first {
                    peer.split_at(peer.len() - classical_len)
                } else {
                    let (c, k) = peer.split_at(classical_len);
                    (k, c)
                };
                let classical_secret = classical.agree(peer_classical)?;
                let kem_secret = match kem {
                    Some(dk) => {
                        let ct = Ciphertext::<MlKem768>::try_from(peer_kem)
                            .map_err(|_| CryptoError::KemInvalidEncapsulation)?;
                        let ss = dk
                            .decapsulate(&ct)
                            .map_err(|_| CryptoError::KemInvalidEncapsulation)?;
                        Zeroizing::new(ss.as_slice().to_vec())
                    }
                    None => {
                        let encoded = Encoded::<MlKem768EncapsulationKey>::try_from(peer_kem)
                            .map_err(|_| invalid())?;
                        let ek = MlKem768EncapsulationKey::from_bytes(&encoded);
                        let (ct, ss) = ek
                            .encapsulate(&mut OsRng)
                            .map_err(|_| CryptoError::KemInvalidEncapsulation)?;
                        self.public = join(*kem_first, ct.as_slice(), classical.public_bytes());
                        Zeroizing::new(ss.as_slice().to_vec())
                    }
                };
                Zeroizing::new(join(*kem_first, &kem_secret, &classical_secret))
            }
            EphemeralSecret::Ffdhe { params, exponent } => {
                let p = BigUint::from_bytes_be(&params.p);
                let y = BigUint::from_bytes_be(peer);
                let one = BigUint::from(1u32);
                if y <= one || y >= &p - &one {
                    return Err(CryptoError::DhInvalidPublicValue.into());
                }
                // Leading zero bytes are stripped, as TLS requires.
                let z = y.modpow(&BigUint::from_bytes_be(exponent), &p);
                Zeroizing::new(z.to_bytes_be())
            }
        };
        Ok(secret)
    }
}

/// `kem || classical` or `classical || kem`.
fn join(kem_first: bool, kem: &[u8], classical: &[u8]) -> Vec<u8> {
    let (a, b) = if kem_first { (kem, classical) } else { (classical, kem) };
    [a, b].concat()
}

fn x25519_agree(sk: &x25519_dalek::StaticSecret, peer: &[u8]) -> Result<Vec<u8>, TlsError> {
    let bytes: [u8; X25519_LEN] = peer
        .try_into()
        .map_err(|_| TlsError::IllegalParameter("x25519 share must be 32 bytes".into()))?;
    let ss = sk.diffie_hellman(&x25519_dalek::PublicKey::from(bytes));
    if !ss.was_contributory() {
        return Err(TlsError::IllegalParameter("x25519 low-order point".into()));
    }
    Ok(ss.as_bytes().to_vec())
}

// ---------------------------------------------------------------------------
// RSA
// ---------------------------------------------------------------------------

/// Client side: fresh pre-master secret and its PKCS#1 v1.5 encryption.
pub fn rsa_encrypt_pre_master(
    key: &RsaPublicKey,
    client_version: u16,
) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>), TlsError> {
    let mut pms = Zeroizing::new(random_bytes(RSA_PRE_MASTER_LEN)?);
    pms[..2].copy_from_slice(&client_version.to_be_bytes());
    let encrypted = key
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, &pms)
        .map_err(|e| CryptoError::Rsa(e.to_string()))?;
    Ok((pms, encrypted))
}

/// Server side: decrypt the pre-master secret. Any decryption, length or
/// version failure silently yields a random secret instead, so the outcome
/// only shows up as a Finished mismatch.
pub fn rsa_decrypt_pre_master(
    key: &RsaPrivateKey,
    encrypted: &[u8],
    client_version: u16,
) -> Result<Zeroizing<Vec<u8>>, TlsError> {
    let mut fallback = Zeroizing::new(random_bytes(RSA_PRE_MASTER_LEN)?);
    fallback[..2].copy_from_slice(&client_version.to_be_bytes());
    let decrypted = Zeroizing::new(key.decrypt(Pkcs1v15Encrypt, encrypted).unwrap_or_default());
    let mut ok = Choice::from((decrypted.len() == RSA_PRE_MASTER_LEN) as u8);
    let mut candidate = Zeroizing::new(vec![0u8; RSA_PRE_MASTER_LEN]);
    if decrypted.len() == RSA_PRE_MASTER_LEN {
        candidate.copy_from_slice(&decrypted);
    }
    ok &= candidate[..2].ct_eq(&client_version.to_be_bytes());
    let mut pms = Zeroizing::new(vec![0u8; RSA_PRE_MASTER_LEN]);
    for i in 0..RSA_PRE_MASTER_LEN {
        pms[i] = u8::conditional_select(&fallback[i], &candidate[i], ok);
    }
    Ok(pms)
}

// ---------------------------------------------------------------------------
// PSK
// ---------------------------------------------------------------------------

/// RFC 4279 pre-master secret: `len(other) || other || len(psk) || psk`.
/// Plain PSK uses `len(psk)` zero bytes as `other`.
pub fn psk_pre_master(other: Option<&[u8]>, psk: &[u8]) -> Zeroizing<Vec<u8>> {
    let zeros = vec![0u8; psk.len()];
    let other = other.unwrap_or(&zeros);
    let mut pms = Zeroizing::new(Vec::with_capacity(4 + other.len() + psk.len()));
    pms.extend_from_slice(&(other.len() as u16).to_be_bytes());
    pms.extend_from_slice(other);
    pms.extend_from_slice(&(psk.len() as u16).to_be_bytes());
    pms.extend_from_slice(psk);
    pms
}

// ---------------------------------------------------------------------------
// Unified key exchange
// ---------------------------------------------------------------------------

/// Inputs available to [`KeyExchange::new_local`]; which ones are needed
/// depends on the algorithm and role.
#[derive(Default)]
pub struct KxInputs<'a> {
    /// Ephemeral group (DHE, ECDHE and their anonymous/PSK forms).
    pub group: Option<KxGroup>,
    /// Server certificate key (client side of RSA and RSA_PSK).
    pub rsa_public: Option<&'a RsaPublicKey>,
    /// Server private key (server side of RSA and RSA_PSK).
    pub rsa_private: Option<&'a RsaPrivateKey>,
    /// Version from ClientHello, embedded in the RSA pre-master secret.
    pub client_version: u16,
    pub psk: Option<&'a [u8]>,
}

enum Material {
    None,
    Ephemeral(EphemeralShare),
    RsaClient { encrypted: Vec<u8> },
    RsaServer { key: RsaPrivateKey, client_version: u16 },
}

/// One side of a key exchange.
pub struct KeyExchange {
    kind: KeyExchangeKind,
    material: Material,
    psk: Option<Zeroizing<Vec<u8>>>,
    /// DH/ECDH secret or RSA pre-master, before PSK framing.
    secret: Option<Zeroizing<Vec<u8>>>,
}

impl KeyExchange {
    /// Produce this side's key-exchange material.
    pub fn new_local(
        kind: KeyExchangeKind,
        role: TlsRole,
        inputs: KxInputs<'_>,
    ) -> Result<Self, TlsError> {
        let missing = |what: &str| TlsError::InternalError(format!("{kind:?} needs {what}"));
        // A server learns which PSK to use only from the client's identity.
        let psk = match (kind.is_psk(), inputs.psk, role) {
            (true, Some(psk), _) => Some(Zeroizing::new(psk.to_vec())),
            (true, None, TlsRole::Client) => return Err(missing("a PSK")),
            _ => None,
        };
        let mut secret = None;
        let material = match kind {
            KeyExchangeKind::Null | KeyExchangeKind::Psk => Material::None,
            KeyExchangeKind::Dhe
            | KeyExchangeKind::DhAnon
            | KeyExchangeKind::DhePsk
            | KeyExchangeKind::Ecdhe
            | KeyExchangeKind::EcdhAnon
            | KeyExchangeKind::EcdhePsk => {
                let group = inputs.group.as_ref().ok_or_else(|| missing("a group"))?;
                if kind.is_ffdh() != matches!(group, KxGroup::Ffdhe(_)) {
                    return Err(TlsError::HandshakeFailed(format!(
                        "group {group:?} does not fit {kind:?}"
                    )));
                }
                Material::Ephemeral(EphemeralShare::generate(group, role)?)
            }
            KeyExchangeKind::Rsa | KeyExchangeKind::RsaExport | KeyExchangeKind::RsaPsk => {
                match role {
                    TlsRole::Client => {
                        let key = inputs.rsa_public.ok_or_else(|| missing("the server RSA key"))?;
                        let (pms, encrypted) = rsa_encrypt_pre_master(key, inputs.client_version)?;
                        secret = Some(pms);
                        Material::RsaClient { encrypted }
                    }
                    TlsRole::Server => Material::RsaServer {
                        key: inputs
                            .rsa_private
                            .ok_or_else(|| missing("an RSA private key"))?
                            .clone(),
                        client_version: inputs.client_version,
                    },
                }
            }
            KeyExchangeKind::DhStatic | KeyExchangeKind::EcdhStatic | KeyExchangeKind::Tls13 => {
                return Err(TlsError::HandshakeFailed(format!(
                    "{kind:?} key exchange is not supported"
                )))
            }
        };
        debug!(?kind, ?role, "local key exchange material ready");
        Ok(Self {
            kind,
            material,
            psk,
            secret,
        })
    }

    pub fn kind(&self) -> KeyExchangeKind {
        self.kind
    }

    /// Install the PSK selected by the client's identity (server side).
    pub fn set_psk(&mut self, psk: &[u8]) -> Result<(), TlsError> {
        if !self.kind.is_psk() {
            return Err(TlsError::InternalError(format!(
                "{:?} does not use a PSK",
                self.kind
            )));
        }
        self.psk = Some(Zeroizing::new(psk.to_vec()));
        Ok(())
    }

    /// What this side sends: public share or encrypted pre-master secret.
    /// Empty for PSK and NULL.
    pub fn local_material(&self) -> &[u8] {
        match &self.material {
            Material::Ephemeral(share) => share.public_bytes(),
            Material::RsaClient { encrypted } => encrypted,
            Material::None | Material::RsaServer { .. } => &[],
        }
    }

    /// Absorb the peer's material. The ephemeral group was fixed by
    /// `new_local`, so the peer share must belong to it.
    pub fn decode_remote(&mut self, material: &[u8]) -> Result<(), TlsError> {
        let secret = match &mut self.material {
            Material::None => None,
            Material::Ephemeral(share) => Some(share.agree(material)?),
            Material::RsaClient { .. } => {
                return Err(TlsError::InternalError(
                    "RSA client has no remote material".into(),
                ))
            }
            Material::RsaServer {
                key,
                client_version,
            } => Some(rsa_decrypt_pre_master(key, material, *client_version)?),
        };
        if secret.is_some() {
            self.secret = secret;
        }
        Ok(())
    }

    /// The pre-master secret.
    pub fn shared_secret(&self) -> Result<Zeroizing<Vec<u8>>, TlsError> {
        match (self.kind, &self.psk) {
            (KeyExchangeKind::Null, _) => Ok(Zeroizing::new(Vec::new())),
            (KeyExchangeKind::Psk, Some(psk)) => Ok(psk_pre_master(None, psk)),
            (_, Some(psk)) => {
                let other = self.require_secret()?;
                Ok(psk_pre_master(Some(other), psk))
            }
            (kind, None) if kind.is_psk() => {
                Err(TlsError::InternalError("PSK not selected".into()))
            }
            (_, None) => Ok(Zeroizing::new(self.require_secret()?.to_vec())),
        }
    }

    fn require_secret(&self) -> Result<&[u8], TlsError> {
        self.secret
            .as_deref()
            .map(Vec::as_slice)
            .ok_or_else(|| TlsError::InternalError("key exchange incomplete".into()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 2^521 - 1 (a Mersenne prime) with generator 3, small enough for
    /// fast tests.
    pub(crate) fn test_dh_params() -> DhParams {
        let mut p = vec![0xFFu8; 66];
        p[0] = 0x01;
        DhParams::new(p, vec![3]).unwrap()
    }

    fn exchange(group: KxGroup) -> (Vec<u8>, Vec<u8>) {
        let mut server = EphemeralShare::generate(&group, TlsRole::Server).unwrap();
        let mut client = EphemeralShare::generate(&group, TlsRole::Client).unwrap();
        let server_public = server.public_bytes().to_vec();
        let c = client.agree(&server_public).unwrap();
        let s = server.agree(client.public_bytes()).unwrap();
        (c.to_vec(), s.to_vec())
    }

    #[test]
    fn test_named_groups_agree() {
        for (group, secret_len, share_len) in [
            (NamedGroup::X25519, 32, 32),
            (NamedGroup::X448, 56, 56),
            (NamedGroup::SECP256R1, 32, 65),
            (NamedGroup::SECP384R1, 48, 97),
        ] {
            let share = EphemeralShare::generate(&KxGroup::Named(group), TlsRole::Server).unwrap();
            assert_eq!(share.public_bytes().len(), share_len, "{}", group.name());
            let (c, s) = exchange(KxGroup::Named(group));
            assert_eq!(c, s);
            assert_eq!(c.len(), secret_len);
        }
    }

    #[test]
    fn test_hybrid_group_shares() {
        let group = KxGroup::Named(NamedGroup::X25519_KYBER768_DRAFT00);
        let mut server = EphemeralShare::generate(&group, TlsRole::Server).unwrap();
        let mut client = EphemeralShare::generate(&group, TlsRole::Client).unwrap();
        assert_eq!(server.public_bytes().len(), 32 + kyber768::public_key_bytes());
        assert_eq!(client.public_bytes().len(), 32);
        let c = client.agree(&server.public_bytes().to_vec()).unwrap();
        assert_eq!(client.public_bytes().len(), 32 + kyber768::ciphertext_bytes());
        let s = server.agree(client.public_bytes()).unwrap();
        assert_eq!(c.as_slice(), s.as_slice());
        assert_eq!(c.len(), 32 + kyber768::shared_secret_bytes());
    }

    #[test]
    fn test_mlkem_hybrid_layouts() {
        const EK_LEN: usize = 1184;
        const CT_LEN: usize = 1088;
        for (group, classical_len, kem_first) in [
            (NamedGroup::X25519_MLKEM768, 32, true),
            (NamedGroup::SECP256R1_MLKEM768, 65, false),
        ] {
            let group = KxGroup::Named(group);
            let mut server = EphemeralShare::generate(&group, TlsRole::Server).unwrap();
            let mut client = EphemeralShare::generate(&group, TlsRole::Client).unwrap();
            assert_eq!(server.public_bytes().len(), EK_LEN + classical_len);
            assert_eq!(client.public_bytes().len(), classical_len);
            let client_classical = client.public_bytes().to_vec();

            let c = client.agree(&server.public_bytes().to_vec()).unwrap();
            let reply = client.public_bytes().to_vec();
            assert_eq!(reply.len(), CT_LEN + classical_len);
            let classical_part = if kem_first {
                &reply[CT_LEN..]
            } else {
                &reply[..classical_len]
            };
            assert_eq!(classical_part, client_classical.as_slice());

            let s = server.agree(&reply).unwrap();
            assert_eq!(c.as_slice(), s.as_slice());
            assert_eq!(c.len(), 64);
        }
    }

    #[test]
    fn test_mlkem_hybrid_secret_order() {
        // The X25519 half of the secret can be recomputed from the shares, so
        // its position shows the concatenation order.
        let group = KxGroup::Named(NamedGroup::X25519_MLKEM768);
        let mut server = EphemeralShare::generate(&group, TlsRole::Server).unwrap();
        let mut client = EphemeralShare::generate(&group, TlsRole::Client).unwrap();
        let c = client.agree(&server.public_bytes().to_vec()).unwrap();
        let s = server.agree(client.public_bytes()).unwrap();
        assert_eq!(c.as_slice(), s.as_slice());
        let EphemeralSecret::MlKem { classical, .. } = &mut server.secret else {
            panic!("not an ML-KEM share");
        };
        let reply = client.public_bytes();
        let x25519 = classical.agree(&reply[reply.len() - 32..]).unwrap();
        assert_eq!(&c[32..], x25519.as_slice());
    }

    #[test]
    fn test_mlkem_hybrid_rejects_truncated_share() {
        let group = KxGroup::Named(NamedGroup::X25519_MLKEM768);
        let server = EphemeralShare::generate(&group, TlsRole::Server).unwrap();
        let mut client = EphemeralShare::generate(&group, TlsRole::Client).unwrap();
        let short = &server.public_bytes()[1..];
        assert!(client.agree(short).is_err());
        assert!(client.agree(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_ffdhe_agree_and_range_check() {
        let params = test_dh_params();
        let (c, s) = exchange(KxGroup::Ffdhe(params.clone()));
        assert_eq!(c, s);

        let mut share = EphemeralShare::generate(&KxGroup::Ffdhe(params.clone()), TlsRole::Client)
            .unwrap();
        assert!(share.agree(&[1]).is_err());
        let mut p_minus_one = params.p.clone();
        *p_minus_one.last_mut().unwrap() -= 1;
        assert!(share.agree(&p_minus_one).is_err());
        assert!(share.agree(&[0]).is_err());
    }

    #[test]
    fn test_dh_params_validation() {
        assert!(DhParams::new(vec![0xFF; 32], vec![2]).is_err());
        let mut even = vec![0xFF; 66];
        even[65] = 0xFE;
        assert!(DhParams::new(even, vec![2]).is_err());
        let mut p = vec![0xFFu8; 66];
        p[0] = 1;
        assert!(DhParams::new(p.clone(), vec![1]).is_err());
        assert!(DhParams::new(p, vec![2]).is_ok());
    }

    #[test]
    fn test_bad_peer_points_rejected() {
        let mut x = EphemeralShare::generate(&KxGroup::Named(NamedGroup::X25519), TlsRole::Client)
            .unwrap();
        assert!(x.agree(&[0u8; 32]).is_err());
        assert!(x.agree(&[9u8; 31]).is_err());
        let mut p = EphemeralShare::generate(&KxGroup::Named(NamedGroup::SECP256R1), TlsRole::Client)
            .unwrap();
        let mut point = vec![4u8];
        point.extend_from_slice(&[1u8; 64]);
        assert!(p.agree(&point).is_err());
    }

    #[test]
    fn test_unsupported_group() {
        assert!(
            EphemeralShare::generate(&KxGroup::Named(NamedGroup::SECP521R1), TlsRole::Server)
                .is_err()
        );
    }

    fn rsa_key() -> RsaPrivateKey {
        crate::handshake::signing::tests::test_rsa_key()
    }

    #[test]
    fn test_rsa_roundtrip_through_key_exchange() {
        let key = rsa_key();
        let public = key.to_public_key();
        let client = KeyExchange::new_local(
            KeyExchangeKind::Rsa,
            TlsRole::Client,
            KxInputs {
                rsa_public: Some(&public),
                client_version: 0x0303,
                ..Default::default()
            },
        )
        .unwrap();
        let mut server = KeyExchange::new_local(
            KeyExchangeKind::Rsa,
            TlsRole::Server,
            KxInputs {
                rsa_private: Some(&key),
                client_version: 0x0303,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(server.local_material().is_empty());
        server.decode_remote(client.local_material()).unwrap();
        let pms = client.shared_secret().unwrap();
        assert_eq!(pms.len(), RSA_PRE_MASTER_LEN);
        assert_eq!(&pms[..2], &[3, 3]);
        assert_eq!(pms.as_slice(), server.shared_secret().unwrap().as_slice());
    }

    #[test]
    fn test_rsa_bad_ciphertext_yields_random_secret() {
        let key = rsa_key();
        let a = rsa_decrypt_pre_master(&key, &[0u8; 128], 0x0303).unwrap();
        let b = rsa_decrypt_pre_master(&key, &[0u8; 128], 0x0303).unwrap();
        assert_eq!(a.len(), RSA_PRE_MASTER_LEN);
        assert_ne!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_rsa_version_mismatch_yields_random_secret() {
        let key = rsa_key();
        let (pms, encrypted) = rsa_encrypt_pre_master(&key.to_public_key(), 0x0301).unwrap();
        let same = rsa_decrypt_pre_master(&key, &encrypted, 0x0301).unwrap();
        assert_eq!(same.as_slice(), pms.as_slice());
        let rolled_back = rsa_decrypt_pre_master(&key, &encrypted, 0x0303).unwrap();
        assert_ne!(rolled_back.as_slice(), pms.as_slice());
    }

    #[test]
    fn test_psk_pre_master_layout() {
        let pms = psk_pre_master(None, &[0xAA, 0xBB]);
        assert_eq!(pms.as_slice(), &[0, 2, 0, 0, 0, 2, 0xAA, 0xBB]);
        let pms = psk_pre_master(Some(&[1, 2, 3]), &[9]);
        assert_eq!(pms.as_slice(), &[0, 3, 1, 2, 3, 0, 1, 9]);
    }

    #[test]
    fn test_ecdhe_psk_combines_both() {
        let group = KxGroup::Named(NamedGroup::X25519);
        let inputs = || KxInputs {
            group: Some(group.clone()),
            psk: Some(b"secret".as_slice()),
            ..Default::default()
        };
        let mut server =
            KeyExchange::new_local(KeyExchangeKind::EcdhePsk, TlsRole::Server, inputs()).unwrap();
        let mut client =
            KeyExchange::new_local(KeyExchangeKind::EcdhePsk, TlsRole::Client, inputs()).unwrap();
        let server_share = server.local_material().to_vec();
        client.decode_remote(&server_share).unwrap();
        server.decode_remote(client.local_material()).unwrap();
        let pms = client.shared_secret().unwrap();
        assert_eq!(pms.as_slice(), server.shared_secret().unwrap().as_slice());
        assert_eq!(&pms[..2], &[0, 32]);
        assert!(pms.ends_with(b"\x00\x06secret"));
    }

    #[test]
    fn test_plain_psk_and_null() {
        let psk = KeyExchange::new_local(
            KeyExchangeKind::Psk,
            TlsRole::Client,
            KxInputs {
                psk: Some([7u8; 16].as_slice()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(psk.shared_secret().unwrap().len(), 2 + 16 + 2 + 16);
        let null = KeyExchange::new_local(KeyExchangeKind::Null, TlsRole::Client, KxInputs::default())
            .unwrap();
        assert!(null.shared_secret().unwrap().is_empty());
    }

    #[test]
    fn test_server_selects_psk_after_identity() {
        let mut server =
            KeyExchange::new_local(KeyExchangeKind::Psk, TlsRole::Server, KxInputs::default())
                .unwrap();
        assert!(server.shared_secret().is_err());
        server.set_psk(&[7u8; 16]).unwrap();
        assert_eq!(server.shared_secret().unwrap().len(), 2 + 16 + 2 + 16);

        let mut null =
            KeyExchange::new_local(KeyExchangeKind::Null, TlsRole::Server, KxInputs::default())
                .unwrap();
        assert!(null.set_psk(&[1]).is_err());
    }

    #[test]
    fn test_missing_inputs_and_mismatched_group() {
        assert!(KeyExchange::new_local(KeyExchangeKind::Psk, TlsRole::Client, KxInputs::default())
            .is_err());
        assert!(KeyExchange::new_local(
            KeyExchangeKind::Dhe,
            TlsRole::Server,
            KxInputs {
                group: Some(KxGroup::Named(NamedGroup::X25519)),
                ..Default::default()
            }
        )
        .is_err());
        let ecdhe = KeyExchange::new_local(
            KeyExchangeKind::Ecdhe,
            TlsRole::Client,
            KxInputs {
                group: Some(KxGroup::Named(NamedGroup::X25519)),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(ecdhe.shared_secret().is_err());
    }
}
