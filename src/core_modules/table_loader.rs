// THEORY:
// The `table_loader` assembles the engine's ColorTable from its serialized
// sources: two or more JSON documents, each a flat object whose keys and
// values are "r,g,b" triplet strings. All sources are read concurrently and
// the table is merged once, in argument order, so a later source's entry
// wins a key collision.
//
// Loading is a one-shot asynchronous event with no retries. If any source
// fails to read or parse, construction of the whole table fails: the caller
// gets an error and no partially-merged table ever escapes. Processors take
// the finished table as a constructor parameter, so a transform simply
// cannot run before loading resolves.
//
// Within a single source, entries are applied in the parser's sorted key
// order. That order is deterministic, which keeps the nearest-color
// tie-break reproducible across runs.

use crate::core_modules::color_table::ColorTable;
use crate::core_modules::pixel::pixel::Rgb;
use crate::error::EngineError;
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::path::Path;

/// Loads and merges all `paths` into one ColorTable. Sources are fetched
/// concurrently; merge order is argument order (later sources override).
pub async fn load_color_table<P: AsRef<Path>>(paths: &[P]) -> Result<ColorTable, EngineError> {
    let parts = try_join_all(paths.iter().map(|path| load_part(path.as_ref()))).await?;

    let table = ColorTable::from_parts(parts);
    log::info!("color table ready: {} entries from {} sources", table.len(), paths.len());
    Ok(table)
}

/// Reads one JSON source into an ordered entry listing.
async fn load_part(path: &Path) -> Result<Vec<(Rgb, Rgb)>, EngineError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| {
        let err = EngineError::TableIo {
            path: path.to_path_buf(),
            source,
        };
        log::error!("{err}");
        err
    })?;

    let raw: BTreeMap<String, String> =
        serde_json::from_slice(&bytes).map_err(|source| {
            let err = EngineError::TableParse {
                path: path.to_path_buf(),
                source,
            };
            log::error!("{err}");
            err
        })?;

    let mut entries = Vec::with_capacity(raw.len());
    for (key, value) in raw {
        let source_color = parse_triplet(&key, path)?;
        let replacement = parse_triplet(&value, path)?;
        entries.push((source_color, replacement));
    }
    Ok(entries)
}

/// Parses an "r,g,b" string into a color. Each component must be a decimal
/// 0-255 value.
fn parse_triplet(entry: &str, path: &Path) -> Result<Rgb, EngineError> {
    let invalid = || {
        let err = EngineError::InvalidColorEntry {
            path: path.to_path_buf(),
            entry: entry.to_owned(),
        };
        log::error!("{err}");
        err
    };

    let mut channels = entry.split(',').map(|component| component.trim().parse::<u8>());

    let red = channels.next().ok_or_else(|| invalid())?.map_err(|_| invalid())?;
    let green = channels.next().ok_or_else(|| invalid())?.map_err(|_| invalid())?;
    let blue = channels.next().ok_or_else(|| invalid())?.map_err(|_| invalid())?;
    if channels.next().is_some() {
        return Err(invalid());
    }

    Ok(Rgb::new(red, green, blue))
}
