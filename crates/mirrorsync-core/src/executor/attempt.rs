//! One GET against one mirror, bracketed by the host load tracker.

use std::fmt;

use crate::checksum::ReferenceHash;
use crate::fetch::{FetchError, HttpFetcher};
use crate::host_stats::HostLoadTracker;
use crate::mirror::MirrorCandidate;

/// Why a mirror was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorFailure {
    /// Connect, DNS, TLS, timeout or read error.
    Network(String),
    /// Server answered with a non-2xx status.
    HttpStatus(u32),
    /// Body digest differs from the published reference.
    HashMismatch { computed: String, expected: String },
}

impl From<FetchError> for MirrorFailure {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Status(code) => MirrorFailure::HttpStatus(code),
            FetchError::Timeout(msg) | FetchError::Transport(msg) => MirrorFailure::Network(msg),
        }
    }
}

impl fmt::Display for MirrorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorFailure::Network(msg) => write!(f, "network error: {msg}"),
            MirrorFailure::HttpStatus(code) => write!(f, "HTTP {code}"),
            MirrorFailure::HashMismatch { computed, expected } => {
                write!(f, "MD5 mismatch: got {computed}, expected {expected}")
            }
        }
    }
}

/// GET `mirror` and verify the body against `reference` when there is one.
/// The host's active count covers the request only, not the digest.
pub(super) fn try_mirror(
    fetcher: &dyn HttpFetcher,
    tracker: &HostLoadTracker,
    mirror: &MirrorCandidate,
    reference: Option<&ReferenceHash>,
) -> Result<Vec<u8>, MirrorFailure> {
    let body = {
        let _guard = tracker.begin(mirror.host());
        fetcher.get(mirror.url().as_str())?
    };
    if let Some(reference) = reference {
        reference
            .verify(&body)
            .map_err(|m| MirrorFailure::HashMismatch {
                computed: m.computed,
                expected: m.expected,
            })?;
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::md5_hex;

    struct Fixed(Result<Vec<u8>, FetchError>);

    impl HttpFetcher for Fixed {
        fn get(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.0.clone()
        }
    }

    fn mirror() -> MirrorCandidate {
        MirrorCandidate::parse("http://m.example:8080/a.mp3").unwrap()
    }

    #[test]
    fn success_counts_one_completed_request() {
        let tracker = HostLoadTracker::new();
        let body = try_mirror(&Fixed(Ok(b"abc".to_vec())), &tracker, &mirror(), None).unwrap();
        assert_eq!(body, b"abc");
        let s = tracker.get("m.example:8080").unwrap();
        assert_eq!((s.active, s.completed), (0, 1));
    }

    #[test]
    fn status_and_network_errors_are_mapped() {
        let tracker = HostLoadTracker::new();
        let err = try_mirror(&Fixed(Err(FetchError::Status(503))), &tracker, &mirror(), None)
            .unwrap_err();
        assert_eq!(err, MirrorFailure::HttpStatus(503));
        let err = try_mirror(
            &Fixed(Err(FetchError::Timeout("slow".into()))),
            &tracker,
            &mirror(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, MirrorFailure::Network(_)));
        let s = tracker.get("m.example:8080").unwrap();
        assert_eq!((s.active, s.completed), (0, 2));
    }

    #[test]
    fn digest_gate() {
        let tracker = HostLoadTracker::new();
        let good = ReferenceHash::parse(&md5_hex(b"abc")).unwrap();
        assert!(try_mirror(&Fixed(Ok(b"abc".to_vec())), &tracker, &mirror(), Some(&good)).is_ok());

        let err = try_mirror(&Fixed(Ok(b"abd".to_vec())), &tracker, &mirror(), Some(&good))
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains(&md5_hex(b"abd")), "{text}");
        assert!(text.contains(good.as_str()), "{text}");
    }
}
