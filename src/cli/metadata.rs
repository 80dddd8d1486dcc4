use std::{collections::HashMap, io::Write, path::Path};

use serde_json::{Map, Value};

use super::MetadataOptions;
use crate::{
    Error, Res,
    management::StatusManager,
    spotify::SpotifyApi,
    types::{Cacheable, ContextObject, MinimalRecord, PlayableItem, Snapshot},
    uri::Uri,
    utils,
};

/// Width of the `key: ` column in plain output.
const KEY_WIDTH: usize = 24;

/// A single metadata field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// String, number, bool or null.
    Scalar(Value),
    /// A domain object, shown in minimal form.
    Record(MinimalRecord),
    /// Any other nested value (device, images, actions).
    Structured(Value),
}

impl FieldValue {
    fn to_json(&self) -> Res<Value> {
        Ok(match self {
            FieldValue::Scalar(v) | FieldValue::Structured(v) => v.clone(),
            FieldValue::Record(record) => serde_json::to_value(record)?,
        })
    }

    /// Text used when the value is interpolated into a format string.
    fn to_text(&self) -> String {
        match self {
            FieldValue::Scalar(v) => scalar_text(v),
            FieldValue::Record(record) => record.name.clone().unwrap_or_else(|| record.uri.clone()),
            FieldValue::Structured(v) => v.to_string(),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn record_or_null(record: Option<MinimalRecord>) -> FieldValue {
    match record {
        Some(record) => FieldValue::Record(record),
        None => FieldValue::Scalar(Value::Null),
    }
}

/// How `metadata` prints its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    Json,
    Format(String),
    Plain,
}

impl From<&MetadataOptions> for OutputMode {
    fn from(opts: &MetadataOptions) -> Self {
        match (&opts.format, opts.json) {
            (_, true) => OutputMode::Json,
            (Some(format), false) => OutputMode::Format(format.clone()),
            (None, false) => OutputMode::Plain,
        }
    }
}

/// Resolves a context uri to a named object. Uris that are not lookup-able
/// contexts (e.g. the liked songs collection) or that the API does not know
/// (some editorial playlists) keep their uri without name.
async fn resolve_context<C: SpotifyApi>(client: &C, uri: Option<&str>) -> Res<Option<ContextObject>> {
    let Some(raw) = uri else {
        return Ok(None);
    };

    let unnamed = || ContextObject {
        uri: raw.to_string(),
        name: None,
    };

    match raw.parse::<Uri>() {
        Ok(uri) if uri.is_context() => match client.context(&uri).await {
            Ok(context) => Ok(Some(context)),
            Err(e) if e.is_not_found() => {
                tracing::debug!("context {} not found, keeping uri", raw);
                Ok(Some(unnamed()))
            }
            Err(e) => Err(e),
        },
        _ => Ok(Some(unnamed())),
    }
}

async fn resolve_item<C: SpotifyApi>(client: &C, uri: Option<&str>) -> Res<Option<PlayableItem>> {
    match uri.map(str::parse::<Uri>) {
        Some(Ok(uri)) if uri.is_playable() => Ok(Some(client.item(&uri).await?)),
        _ => Ok(None),
    }
}

/// Current playback state with its context resolved.
///
/// With `use_cache` the state cached by the spotifyd hook is used if there
/// is one; its item and context are looked up again by uri.
pub async fn snapshot<C: SpotifyApi>(client: &C, cache_dir: &Path, use_cache: bool) -> Res<Snapshot> {
    let status_cache = StatusManager::new(cache_dir);
    if use_cache && status_cache.exists() {
        if let Some(status) = status_cache.load().await? {
            tracing::debug!("using cached status");
            let item = resolve_item(client, status.item.as_ref().map(|i| i.uri.as_str())).await?;
            let context =
                resolve_context(client, status.context.as_ref().map(|c| c.uri.as_str())).await?;
            return Ok(Snapshot::from_status(status, item, context));
        }
    } else if use_cache {
        tracing::info!("no cached status, querying playback");
    }

    let playback = client
        .current_playback()
        .await?
        .ok_or(Error::NothingPlaying)?;
    let context = resolve_context(client, playback.context.as_ref().map(|c| c.uri.as_str())).await?;
    Ok(Snapshot::from_playback(playback, context))
}

/// The response fields plus the derived convenience fields, in output order.
pub fn derive_fields(snapshot: &Snapshot) -> Res<Vec<(String, FieldValue)>> {
    let item = snapshot.item.as_ref();
    let artist = item.and_then(|item| match item {
        PlayableItem::Track(t) => t.artists.first().map(|a| (a.minimal(), a.name.clone())),
        PlayableItem::Episode(e) => Some((e.show.minimal(), e.show.publisher.clone())),
    });

    let fields = vec![
        (
            "device",
            FieldValue::Structured(serde_json::to_value(&snapshot.device)?),
        ),
        (
            "device_id",
            FieldValue::Scalar(snapshot.device.id.clone().map_or(Value::Null, Value::String)),
        ),
        ("shuffle_state", FieldValue::Scalar(snapshot.shuffle_state.into())),
        (
            "repeat_state",
            FieldValue::Scalar(snapshot.repeat_state.clone().into()),
        ),
        ("timestamp", FieldValue::Scalar(snapshot.timestamp.into())),
        (
            "context",
            record_or_null(snapshot.context.as_ref().map(Cacheable::minimal)),
        ),
        (
            "context_name",
            FieldValue::Scalar(
                snapshot
                    .context
                    .as_ref()
                    .and_then(|c| c.name.clone())
                    .map_or(Value::Null, Value::String),
            ),
        ),
        (
            "progress_ms",
            FieldValue::Scalar(snapshot.progress_ms.map_or(Value::Null, Value::from)),
        ),
        ("item", record_or_null(item.map(Cacheable::minimal))),
        (
            "currently_playing_type",
            FieldValue::Scalar(snapshot.currently_playing_type.clone().into()),
        ),
        ("actions", FieldValue::Structured(snapshot.actions.clone())),
        ("is_playing", FieldValue::Scalar(snapshot.is_playing.into())),
        (
            "title",
            FieldValue::Scalar(item.map_or(Value::Null, |i| i.name().into())),
        ),
        (
            "images",
            FieldValue::Structured(serde_json::to_value(
                item.map(PlayableItem::images).unwrap_or_default(),
            )?),
        ),
        (
            "artist",
            record_or_null(artist.as_ref().map(|(record, _)| record.clone())),
        ),
        (
            "artist_name",
            FieldValue::Scalar(artist.map_or(Value::Null, |(_, name)| name.into())),
        ),
    ];

    Ok(fields
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect())
}

/// Keeps the requested fields; nothing requested (or nothing matching)
/// keeps everything.
fn select(fields: Vec<(String, FieldValue)>, requested: &[String]) -> Vec<(String, FieldValue)> {
    let selected: Vec<_> = fields
        .iter()
        .filter(|(key, _)| requested.contains(key))
        .cloned()
        .collect();

    if selected.is_empty() { fields } else { selected }
}

/// Writes `fields` in the given mode.
pub fn render<W: Write>(
    fields: Vec<(String, FieldValue)>,
    requested: &[String],
    mode: &OutputMode,
    out: &mut W,
) -> Res<()> {
    let fields = select(fields, requested);

    match mode {
        OutputMode::Json => {
            let mut map = Map::new();
            for (key, value) in &fields {
                map.insert(key.clone(), value.to_json()?);
            }
            writeln!(out, "{}", Value::Object(map))?;
        }
        OutputMode::Format(template) => {
            let values: HashMap<String, String> = fields
                .iter()
                .map(|(key, value)| (key.clone(), value.to_text()))
                .collect();
            match utils::interpolate(template, &values) {
                Ok(line) => writeln!(out, "{line}")?,
                Err(Error::FieldNotFound(field)) => {
                    tracing::error!("field {} not found", field);
                }
                Err(e) => return Err(e),
            }
        }
        OutputMode::Plain => {
            let scalars: Vec<(String, String)> = fields
                .into_iter()
                .filter_map(|(key, value)| match value {
                    FieldValue::Scalar(v) => Some((key, scalar_text(&v))),
                    _ => None,
                })
                .collect();

            if let [(_, value)] = scalars.as_slice() {
                writeln!(out, "{value}")?;
                return Ok(());
            }
            for (key, value) in scalars {
                writeln!(out, "{:<KEY_WIDTH$}{}", format!("{key}: "), value)?;
            }
        }
    }

    Ok(())
}

pub async fn metadata<C: SpotifyApi, W: Write>(
    client: &C,
    opts: &MetadataOptions,
    cache_dir: &Path,
    out: &mut W,
) -> Res<()> {
    let snapshot = snapshot(client, cache_dir, opts.use_cache).await?;
    let fields = derive_fields(&snapshot)?;
    render(fields, &opts.fields, &OutputMode::from(opts), out)
}
