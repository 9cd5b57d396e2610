//! Ctrl-C handling for the interactive loop.

use std::io::{self, Write};
use std::thread::{self, JoinHandle};

use tokio::runtime::Builder;

/// Printed on the console when the user interrupts the session.
pub const INTERRUPTED_MESSAGE: &str = "Program interrupted by user.";

/// An interrupt ends the session normally, like choosing Exit.
pub const INTERRUPTED_EXIT_CODE: i32 = 0;

/// Watch for Ctrl-C on a background thread.
///
/// The menu blocks on stdin, so the signal is awaited on its own
/// current-thread runtime. On interrupt the message is printed and the
/// process exits; every store operation has already released its connection.
pub fn install() -> io::Result<JoinHandle<()>> {
    let runtime = Builder::new_current_thread().enable_all().build()?;

    thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || match runtime.block_on(tokio::signal::ctrl_c()) {
            Ok(()) => {
                tracing::info!("interrupted by user");
                if let Err(err) = announce(&mut io::stdout().lock()) {
                    tracing::warn!("failed to print interrupt message: {err}");
                }
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
            Err(err) => {
                tracing::warn!("failed to listen for ctrl-c: {err}");
            }
        })
}

/// Write the interrupt notice on a fresh line, below any pending prompt.
pub fn announce<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n{INTERRUPTED_MESSAGE}")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_starts_on_a_new_line() {
        let mut out = Vec::new();
        announce(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\nProgram interrupted by user.\n");
    }

    #[test]
    fn interrupt_is_a_normal_exit() {
        assert_eq!(INTERRUPTED_EXIT_CODE, 0);
    }
}
