//! Interactive confirmation for production deploys

use console::style;
use std::io::{self, BufRead, Write};

/// The exact answer that confirms a production deploy
pub const CONFIRMATION_WORD: &str = "yes";

/// Ask the operator to confirm a production deploy.
///
/// Only the exact answer `yes` (line ending aside) confirms. Anything else,
/// including end of input, declines.
pub fn confirm_production<R, W>(input: &mut R, output: &mut W) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(
        output,
        "{} ",
        style(format!(
            "Do you really want to deploy to PRODUCTION? Type \"{}\" for confirmation:",
            CONFIRMATION_WORD
        ))
        .red()
        .bold()
    )?;
    output.flush()?;

    // Raw bytes, so an answer that is not UTF-8 declines instead of failing
    let mut answer = Vec::new();
    input.read_until(b'\n', &mut answer)?;
    while matches!(answer.last(), Some(b'\n' | b'\r')) {
        answer.pop();
    }

    Ok(answer == CONFIRMATION_WORD.as_bytes())
}
