use std::ffi::OsString;
use std::io::{BufRead as _, BufReader, Read as _, Write as _};
use std::process::{Command, Stdio};

use crate::foundation::error::{StickerError, StickerResult};
use crate::removal::remover::{BackgroundRemover, ProgressSink};

/// Maximum stderr bytes kept for error messages.
const STDERR_TAIL_BYTES: usize = 4096;

/// Background remover that runs an external segmentation program.
///
/// The image is written to the program's stdin and the cut-out PNG is read from its stdout
/// (for example `rembg i - -`). Lines on stderr of the form `progress <stage> <current> <total>`
/// are forwarded to the progress sink; anything else on stderr is kept for error messages.
#[derive(Clone, Debug)]
pub struct CommandRemover {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandRemover {
    /// Run `program` with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build from a whitespace-separated command line such as `"rembg i - -"`.
    pub fn from_command_line(line: &str) -> StickerResult<Self> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| StickerError::validation("background remover command is empty"))?;
        Ok(Self::new(program).args(parts))
    }

    /// Human-readable command line for messages.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl BackgroundRemover for CommandRemover {
    fn remove_background(
        &mut self,
        bytes: &[u8],
        progress: &mut dyn ProgressSink,
    ) -> StickerResult<Vec<u8>> {
        let shown = self.display();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| StickerError::removal(format!("failed to run '{shown}': {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| StickerError::removal("failed to open remover stdin"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| StickerError::removal("failed to open remover stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| StickerError::removal("failed to open remover stderr"))?;

        // stdin and stdout each get a thread; stderr is drained here.
        let input = bytes.to_vec();
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            stdin.write_all(&input)?;
            stdin.flush()
        });
        let reader = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
            let mut out = Vec::new();
            stdout.read_to_end(&mut out)?;
            Ok(out)
        });

        let mut stderr_tail = String::new();
        for line in BufReader::new(stderr).lines() {
            let Ok(line) = line else { break };
            match parse_progress_line(&line) {
                Some((stage, current, total)) => progress.progress(stage, current, total),
                None => push_tail(&mut stderr_tail, &line),
            }
        }

        let status = child
            .wait()
            .map_err(|e| StickerError::removal(format!("wait for '{shown}': {e}")))?;
        let write_res = writer
            .join()
            .map_err(|_| StickerError::removal("remover stdin writer panicked"))?;
        let output = reader
            .join()
            .map_err(|_| StickerError::removal("remover stdout reader panicked"))?
            .map_err(|e| StickerError::removal(format!("read remover output: {e}")))?;

        if !status.success() {
            return Err(StickerError::removal(format!(
                "'{shown}' exited with {status}: {}",
                stderr_tail.trim()
            )));
        }
        write_res.map_err(|e| StickerError::removal(format!("write remover input: {e}")))?;
        if output.is_empty() {
            return Err(StickerError::removal(format!("'{shown}' produced no output")));
        }

        tracing::debug!(
            command = %shown,
            in_bytes = bytes.len(),
            out_bytes = output.len(),
            "background removed"
        );
        Ok(output)
    }
}

/// Parse `progress <stage> <current> <total>`.
pub fn parse_progress_line(line: &str) -> Option<(&str, u64, u64)> {
    let mut it = line.split_whitespace();
    if it.next()? != "progress" {
        return None;
    }
    let stage = it.next()?;
    let current = it.next()?.parse().ok()?;
    let total = it.next()?.parse().ok()?;
    if it.next().is_some() {
        return None;
    }
    Some((stage, current, total))
}

fn push_tail(tail: &mut String, line: &str) {
    if !tail.is_empty() {
        tail.push('\n');
    }
    tail.push_str(line);
    if tail.len() > STDERR_TAIL_BYTES {
        let mut cut = tail.len() - STDERR_TAIL_BYTES;
        while !tail.is_char_boundary(cut) {
            cut += 1;
        }
        tail.drain(..cut);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/removal/command.rs"]
mod tests;
