//! Newline-delimited JSON request/response loop.
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`.  Each non-blank
//! input line produces exactly one output line, in order:
//!
//! ```json
//! {"PixelToCell":{"x":100,"y":100,"width":100,"height":100,"screen_width":400,"screen_height":400}}
//! {"Cell":{"row":1,"column":1}}
//! ```
//!
//! A line that does not parse yields an `Invalid` response and the loop
//! carries on with the next line.

use crate::command::{Request, Response};
use crate::engine::PlacementEngine;
use log::{debug, error, info};
use std::io::{BufRead, Write};

/// Errors produced by the request loop.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json encode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read requests from `reader` until EOF, answering each on `writer`.
///
/// Returns the number of request lines handled (including invalid ones).
pub fn serve<R: BufRead, W: Write>(
    engine: &PlacementEngine,
    reader: R,
    mut writer: W,
) -> Result<usize, SessionError> {
    let mut handled = 0;
    for line in reader.lines() {
        let text = line?;
        if text.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(&text) {
            Ok(request) => {
                debug!("received request #{}", handled + 1);
                engine.handle(request)
            }
            Err(e) => {
                error!("bad request: {}", e);
                Response::Invalid {
                    message: e.to_string(),
                }
            }
        };
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        handled += 1;
    }
    info!("input closed after {} request(s)", handled);
    Ok(handled)
}

//  Tests
