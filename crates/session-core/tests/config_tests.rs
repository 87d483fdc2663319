// Loading session configuration from disk and applying it

mod common;

use std::io::Write;
use std::sync::Arc;

use callmedia_session_core::prelude::*;
use callmedia_session_core::ConfigError;
use common::{audio, description, pcmu_pair, sockets, MockEndpoint};
use tempfile::NamedTempFile;

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"max_streams": 4, "negotiation": {{"strict_static_rtpmap": true}}}}"#
    )
    .unwrap();

    let config = SessionConfig::from_file(file.path()).unwrap();
    assert_eq!(config.max_streams, 4);
    assert!(config.negotiation.strict_static_rtpmap);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = SessionConfig::from_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_config_round_trip() {
    let config = SessionConfig::default()
        .with_max_streams(3)
        .with_strict_static_rtpmap(true);
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
}

#[tokio::test]
async fn test_stream_limit_is_enforced() {
    let (local, remote) = pcmu_pair(3);
    let endpoint = Arc::new(MockEndpoint::new());
    let config = SessionConfig::default().with_max_streams(2);

    let err = MediaSession::create_with_config(endpoint.clone(), 1, &sockets(3), &local, &remote, (), config)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TooManyStreams { requested: 3, max: 2 }));
    assert!(endpoint.events().is_empty());
}

#[tokio::test]
async fn test_strict_rtpmap_applies_to_session_creation() {
    let local = description(
        "192.0.2.1",
        vec![audio(4000, &["0"]).with_attribute(SdpAttribute::value(ATTR_RTPMAP, "0 PCMU"))],
    );
    let remote = description("192.0.2.2", vec![audio(5000, &["0"])]);

    let lenient = MediaSession::create(Arc::new(MockEndpoint::new()), 1, &sockets(1), &local, &remote, ())
        .await
        .unwrap();
    assert_eq!(lenient.info().streams[0].codec.encoding_name, "PCMU");
    lenient.destroy().await.unwrap();

    let config = SessionConfig::default().with_strict_static_rtpmap(true);
    let err = MediaSession::create_with_config(
        Arc::new(MockEndpoint::new()),
        1,
        &sockets(1),
        &local,
        &remote,
        (),
        config,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Negotiation {
            index: 0,
            source: NegotiationError::InvalidRtpmap { payload_type: 0, .. }
        }
    ));
}
