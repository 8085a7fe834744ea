//! Consent Gate Use Case - Blocking Human Confirmation
//!
//! Writes a rendered summary to an output sink and blocks for one line
//! on an input source. Both ends are injected, so scripted input drives
//! the gate in tests. A decline is a normal outcome, never an error.

use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::domain::consent::ConsentDecision;

/// Prompt-and-reply gate in front of irreversible actions.
pub struct ConsentGate<R: BufRead, W: Write> {
  input: R,
  output: W,
}

impl<R: BufRead, W: Write> ConsentGate<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }

  /// Show `rendered` and wait for one line of input.
  ///
  /// Output failures and read failures both decline: the user never
  /// saw the prompt, or never answered it.
  pub fn ask(&mut self, rendered: &str) -> ConsentDecision {
    if let Err(e) = self
      .output
      .write_all(rendered.as_bytes())
      .and_then(|()| self.output.flush())
    {
      warn!(error = %e, "Could not display consent prompt, declining");
      return ConsentDecision::Declined;
    }

    let mut reply = String::new();
    let decision = match self.input.read_line(&mut reply) {
      Ok(_) => ConsentDecision::from_reply(&reply),
      Err(e) => {
        warn!(error = %e, "Could not read consent reply, declining");
        ConsentDecision::Declined
      }
    };

    info!(%decision, "Consent decision recorded");
    decision
  }

  /// Release the underlying input and output.
  pub fn into_inner(self) -> (R, W) {
    (self.input, self.output)
  }
}
