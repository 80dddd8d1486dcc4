mod common;

use common::*;
use serde_json::{Value, json};
use spotcli::{
    Error,
    cli::{self, FieldValue, MetadataOptions, OutputMode},
    management::StatusManager,
    types::{MinimalRecord, Snapshot, Status},
};

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn live_api() -> MockApi {
    MockApi {
        contexts: vec![playlist_context()],
        items: vec![track("t1", "Song")],
        ..MockApi::playing(playback(track("t1", "Song")))
    }
}

fn render(mode: OutputMode, requested: &[&str]) -> String {
    let snapshot = Snapshot::from_playback(playback(track("t1", "Song")), Some(playlist_context()));
    let derived = cli::derive_fields(&snapshot).unwrap();
    let mut out = Vec::new();
    cli::render(derived, &fields(requested), &mode, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_derive_fields_order() {
    let snapshot = Snapshot::from_playback(playback(track("t1", "Song")), Some(playlist_context()));
    let keys: Vec<String> = cli::derive_fields(&snapshot)
        .unwrap()
        .into_iter()
        .map(|(key, _)| key)
        .collect();

    assert_eq!(
        keys,
        fields(&[
            "device",
            "device_id",
            "shuffle_state",
            "repeat_state",
            "timestamp",
            "context",
            "context_name",
            "progress_ms",
            "item",
            "currently_playing_type",
            "actions",
            "is_playing",
            "title",
            "images",
            "artist",
            "artist_name",
        ])
    );
}

#[test]
fn test_derive_fields_for_episode() {
    let snapshot = Snapshot::from_playback(playback(episode("e1", "Episode One")), None);
    let derived = cli::derive_fields(&snapshot).unwrap();
    let get = |key: &str| {
        derived
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap()
    };

    assert_eq!(
        get("artist"),
        FieldValue::Record(MinimalRecord {
            uri: "spotify:show:show1".to_string(),
            name: Some("Test Show".to_string()),
        })
    );
    assert_eq!(get("artist_name"), FieldValue::Scalar(json!("Test Publisher")));
    assert_eq!(get("title"), FieldValue::Scalar(json!("Episode One")));
    assert_eq!(get("context"), FieldValue::Scalar(Value::Null));
}

#[test]
fn test_plain_single_field_prints_bare_value() {
    assert_eq!(render(OutputMode::Plain, &["title"]), "Song\n");
}

#[test]
fn test_plain_fields_are_aligned() {
    let output = render(OutputMode::Plain, &["title", "artist_name"]);
    assert_eq!(
        output,
        format!("{:<24}Song\n{:<24}First Artist\n", "title: ", "artist_name: ")
    );
}

#[test]
fn test_plain_skips_structured_fields() {
    let output = render(OutputMode::Plain, &[]);

    assert!(output.contains("context_name: "));
    assert!(output.contains("Morning Mix"));
    assert!(!output.lines().any(|l| l.starts_with("device: ")));
    assert!(!output.lines().any(|l| l.starts_with("images: ")));
    assert!(!output.lines().any(|l| l.starts_with("item: ")));
}

#[test]
fn test_unknown_fields_print_everything() {
    assert_eq!(
        render(OutputMode::Plain, &["nope"]),
        render(OutputMode::Plain, &[])
    );
}

#[test]
fn test_json_output() {
    let output = render(OutputMode::Json, &["item", "title", "device_id"]);
    let value: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(
        value,
        json!({
            "device_id": "abc123",
            "item": {"uri": "spotify:track:t1", "name": "Song"},
            "title": "Song",
        })
    );
}

#[test]
fn test_json_output_contains_all_fields() {
    let output = render(OutputMode::Json, &[]);
    let value: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value.as_object().unwrap().len(), 16);
    assert_eq!(value["context"]["name"], "Morning Mix");
    assert_eq!(value["images"][1]["width"], 64);
}

#[test]
fn test_format_output() {
    let output = render(
        OutputMode::Format("{artist_name} - {title} ({context})".to_string()),
        &[],
    );
    assert_eq!(output, "First Artist - Song (Morning Mix)\n");
}

#[test]
fn test_format_unknown_field_prints_nothing() {
    let output = render(OutputMode::Format("{album} - {title}".to_string()), &[]);
    assert_eq!(output, "");
}

#[test]
fn test_output_mode_from_options() {
    let mut opts = MetadataOptions::default();
    assert_eq!(OutputMode::from(&opts), OutputMode::Plain);

    opts.format = Some("{title}".to_string());
    assert_eq!(
        OutputMode::from(&opts),
        OutputMode::Format("{title}".to_string())
    );

    opts.format = None;
    opts.json = true;
    assert_eq!(OutputMode::from(&opts), OutputMode::Json);
}

#[tokio::test]
async fn test_metadata_nothing_playing() {
    let api = MockApi::default();
    let dir = tempfile::tempdir().unwrap();

    let result = cli::metadata(&api, &MetadataOptions::default(), dir.path(), &mut Vec::new()).await;

    assert!(matches!(result, Err(Error::NothingPlaying)));
}

#[tokio::test]
async fn test_metadata_live() {
    let api = live_api();
    let dir = tempfile::tempdir().unwrap();
    let opts = MetadataOptions {
        fields: fields(&["context_name"]),
        ..Default::default()
    };
    let mut out = Vec::new();

    cli::metadata(&api, &opts, dir.path(), &mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "Morning Mix\n");
    assert_eq!(
        api.calls(),
        vec![
            Call::CurrentPlayback,
            Call::Context("spotify:playlist:pl1".to_string())
        ]
    );
}

#[tokio::test]
async fn test_cached_snapshot_matches_live() {
    let api = live_api();
    let dir = tempfile::tempdir().unwrap();
    StatusManager::new(dir.path())
        .persist(&Status::from(&playback(track("t1", "Song"))))
        .await
        .unwrap();

    let live = cli::snapshot(&api, dir.path(), false).await.unwrap();
    let cached = cli::snapshot(&api, dir.path(), true).await.unwrap();

    assert_eq!(
        cli::derive_fields(&cached).unwrap(),
        cli::derive_fields(&live).unwrap()
    );
    assert!(api.calls().contains(&Call::Item("spotify:track:t1".to_string())));
}

#[tokio::test]
async fn test_cached_snapshot_does_not_query_playback() {
    let api = live_api();
    let dir = tempfile::tempdir().unwrap();
    StatusManager::new(dir.path())
        .persist(&Status::from(&playback(track("t1", "Song"))))
        .await
        .unwrap();

    cli::snapshot(&api, dir.path(), true).await.unwrap();

    assert!(!api.calls().contains(&Call::CurrentPlayback));
}

#[tokio::test]
async fn test_use_cache_without_status_queries_playback() {
    let api = live_api();
    let dir = tempfile::tempdir().unwrap();

    let snapshot = cli::snapshot(&api, dir.path(), true).await.unwrap();

    assert_eq!(api.calls().first(), Some(&Call::CurrentPlayback));
    assert_eq!(snapshot.context, Some(playlist_context()));
}

#[tokio::test]
async fn test_unknown_playlist_keeps_uri() {
    // no matching context, so the lookup answers NotFound
    let api = MockApi::playing(playback(track("t1", "Song")));
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let opts = MetadataOptions {
        fields: fields(&["context", "title"]),
        json: true,
        ..Default::default()
    };

    cli::metadata(&api, &opts, dir.path(), &mut out).await.unwrap();

    let value: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        value,
        json!({"context": {"uri": "spotify:playlist:pl1"}, "title": "Song"})
    );
    assert!(api.calls().contains(&Call::Context("spotify:playlist:pl1".to_string())));
}

#[tokio::test]
async fn test_unknown_playlist_from_cache_keeps_uri() {
    let api = MockApi {
        items: vec![track("t1", "Song")],
        ..Default::default()
    };
    let dir = tempfile::tempdir().unwrap();
    StatusManager::new(dir.path())
        .persist(&Status::from(&playback(track("t1", "Song"))))
        .await
        .unwrap();

    let snapshot = cli::snapshot(&api, dir.path(), true).await.unwrap();

    let context = snapshot.context.unwrap();
    assert_eq!(context.uri, "spotify:playlist:pl1");
    assert_eq!(context.name, None);
}

#[tokio::test]
async fn test_unresolvable_context_keeps_uri() {
    let mut playback = playback(track("t1", "Song"));
    if let Some(context) = playback.context.as_mut() {
        context.uri = "spotify:user:someone:collection".to_string();
        context.kind = "collection".to_string();
    }
    let api = MockApi::playing(playback);
    let dir = tempfile::tempdir().unwrap();

    let snapshot = cli::snapshot(&api, dir.path(), false).await.unwrap();

    let context = snapshot.context.unwrap();
    assert_eq!(context.uri, "spotify:user:someone:collection");
    assert_eq!(context.name, None);
    assert_eq!(api.calls(), vec![Call::CurrentPlayback]);
}
