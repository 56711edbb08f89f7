use std::io::Write;

use anyhow::Context;
use serde::Serialize;
use shortid::{Components, ShortId};

/// One line of `--json` output.
#[derive(Debug, Serialize)]
pub struct Record<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub components: Components,
    pub unix_millis: u64,
}

/// Writes one ID per line, or one JSON record per line with `json`.
pub fn write_ids<W: Write>(
    out: &mut W,
    generator: &ShortId,
    ids: &[String],
    json: bool,
) -> anyhow::Result<()> {
    for id in ids {
        if json {
            write_record(out, generator, id)?;
        } else {
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}

/// Writes the decoded components of `id`, as JSON or as `key=value` pairs.
pub fn write_decoded<W: Write>(
    out: &mut W,
    generator: &ShortId,
    id: &str,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        return write_record(out, generator, id);
    }
    let components = generator
        .decode(id)
        .with_context(|| format!("cannot decode {id:?}"))?;
    writeln!(
        out,
        "id={id} millis={} unix_millis={} worker={} counter={}",
        components.millis,
        components.unix_millis(generator.epoch()),
        components.worker,
        components.counter
    )?;
    Ok(())
}

fn write_record<W: Write>(out: &mut W, generator: &ShortId, id: &str) -> anyhow::Result<()> {
    let components = generator
        .decode(id)
        .with_context(|| format!("cannot decode {id:?}"))?;
    let record = Record {
        id,
        components,
        unix_millis: components.unix_millis(generator.epoch()),
    };
    serde_json::to_writer(&mut *out, &record)?;
    writeln!(out)?;
    Ok(())
}
