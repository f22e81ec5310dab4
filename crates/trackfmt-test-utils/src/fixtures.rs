//! Metadata and context fixtures.

use trackfmt_core::{Context, Value};

/// Raw metadata for one track, keyed the way players report it.
pub fn sample_metadata() -> Context {
    Context::new()
        .with("xesam:artist", Value::from(vec!["David Bowie"]))
        .with("xesam:album", "\"Heroes\"")
        .with("xesam:title", "Heroes")
        .with("xesam:trackNumber", Value::Integer(3))
        .with("mpris:length", Value::Integer(371_000_000))
        .with("mpris:trackid", Value::Opaque(serde_json::json!("/org/mpris/MediaPlayer2/Track/3")))
}

/// The same track as a JSON object, as a metadata dump file would hold it.
pub fn sample_metadata_json() -> serde_json::Value {
    serde_json::json!({
        "xesam:artist": ["David Bowie"],
        "xesam:album": "\"Heroes\"",
        "xesam:title": "Heroes",
        "xesam:trackNumber": 3,
        "mpris:length": 371_000_000,
        "xesam:userRating": 0.8,
        "xesam:explicit": false,
    })
}

/// A metadata map with two artists.
pub fn collaboration_metadata() -> Context {
    Context::new()
        .with("xesam:artist", Value::from(vec!["Brian Eno", "David Byrne"]))
        .with("xesam:title", "Strange Overtones")
        .with("mpris:length", Value::Integer(4_200_000_000))
}
