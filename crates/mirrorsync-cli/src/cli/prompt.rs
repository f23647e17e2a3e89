//! Interactive questions asked when a run has no starting point.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use mirrorsync_core::item::ItemId;
use mirrorsync_core::sources::parse_timestamp;

fn read_answer<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<String> {
    write!(out, "{question}")?;
    out.flush()?;
    let mut line = String::new();
    let n = input.read_line(&mut line).context("read answer")?;
    if n == 0 {
        bail!("no answer given (end of input)");
    }
    Ok(line.trim().to_string())
}

/// Ask for the first item to fetch.
pub fn ask_start_item<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<ItemId> {
    let answer = read_answer(input, out, "No stored position. Start from which item number? ")?;
    answer.parse::<ItemId>().map_err(anyhow::Error::msg)
}

/// Ask how far back the first listing sync goes. Empty means everything.
pub fn ask_listing_since<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Option<NaiveDateTime>> {
    let answer = read_answer(
        input,
        out,
        "No stored listing position. Fetch bundles added since (YYYY-MM-DD, empty for all)? ",
    )?;
    if answer.is_empty() {
        return Ok(None);
    }
    match parse_timestamp(&answer) {
        Some(ts) => Ok(Some(ts)),
        None => bail!("not a date: {answer:?}"),
    }
}
