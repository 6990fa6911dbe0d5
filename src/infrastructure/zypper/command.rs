use crate::domain::errors::BackendError;
use crate::domain::repositories::RefreshHandle;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::oneshot;

/// Whether a command needs administrative privileges. Advisory gating happens
/// in the UI; enforcement is left to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    None,
    Required,
}

/// Runs zypper (and helper shell pipelines) and captures their output.
pub struct ZypperCommand {
    use_sudo: bool,
}

impl ZypperCommand {
    pub fn new(use_sudo: bool) -> Self {
        Self { use_sudo }
    }

    fn build(&self, privilege: Privilege, program: &str, args: &[String]) -> (String, Command) {
        let mut cmd = if privilege == Privilege::Required && self.use_sudo {
            let mut c = Command::new("sudo");
            c.arg("-n").arg(program);
            c
        } else {
            Command::new(program)
        };
        cmd.args(args);

        let command_line = format!("{} {}", program, args.join(" "));
        (command_line, cmd)
    }

    pub async fn run(&self, privilege: Privilege, args: Vec<String>) -> Result<String, BackendError> {
        self.run_program(privilege, "zypper", args).await
    }

    /// Run a shell pipeline, e.g. the fingerprint digest command.
    pub async fn run_script(&self, script: &str) -> Result<String, BackendError> {
        self.run_program(
            Privilege::None,
            "bash",
            vec!["-c".to_string(), script.to_string()],
        )
        .await
    }

    async fn run_program(
        &self,
        privilege: Privilege,
        program: &str,
        args: Vec<String>,
    ) -> Result<String, BackendError> {
        let (command_line, mut cmd) = self.build(privilege, program, &args);
        tracing::debug!("running: {command_line}");

        let output = cmd.output().await.map_err(|source| BackendError::Spawn {
            program: command_line.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::error!("{command_line} failed: {}", stderr.trim_end());
            return Err(BackendError::CommandFailed {
                program: command_line,
                code: output.status.code(),
                diagnostic: diagnostic_text(stdout, stderr),
            });
        }

        tracing::debug!("{command_line} returned {} bytes", stdout.len());
        Ok(stdout)
    }

    /// Spawn a long-running zypper invocation that can be killed early via
    /// the returned handle. Cancellation settles the result to
    /// [`BackendError::Cancelled`], never to success.
    pub fn spawn_cancellable(&self, privilege: Privilege, args: Vec<String>) -> RefreshHandle {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let (command_line, mut cmd) = self.build(privilege, "zypper", &args);

        // A dropped handle must not kill the child; only an explicit cancel
        // does.
        let cancelled = async move {
            match cancel_rx.await {
                Ok(()) => (),
                Err(_) => std::future::pending().await,
            }
        };

        let task = tokio::spawn(async move {
            tracing::debug!("spawning: {command_line}");

            let mut child = cmd
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|source| BackendError::Spawn {
                    program: command_line.clone(),
                    source,
                })?;

            // Drain both pipes concurrently so a chatty refresh can't fill
            // the pipe buffer and stall the child.
            let out_task = tokio::spawn(read_pipe(child.stdout.take()));
            let err_task = tokio::spawn(read_pipe(child.stderr.take()));

            tokio::select! {
                _ = cancelled => {
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    tracing::debug!("{command_line} cancelled");
                    Err(BackendError::Cancelled)
                }
                status = child.wait() => {
                    let status = status.map_err(|source| BackendError::Spawn {
                        program: command_line.clone(),
                        source,
                    })?;
                    let stdout = out_task.await.unwrap_or_default();
                    let stderr = err_task.await.unwrap_or_default();

                    if status.success() {
                        Ok(())
                    } else {
                        tracing::error!("{command_line} failed: {}", stderr.trim_end());
                        Err(BackendError::CommandFailed {
                            program: command_line,
                            code: status.code(),
                            diagnostic: diagnostic_text(stdout, stderr),
                        })
                    }
                }
            }
        });

        RefreshHandle::new(cancel_tx, task)
    }
}

async fn read_pipe<R>(pipe: Option<R>) -> String
where
    R: AsyncRead + Unpin + Send,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).into_owned()
}

// With --xmlout, zypper reports problems on stdout; stderr is only
// interesting when there was no structured output at all.
fn diagnostic_text(stdout: String, stderr: String) -> String {
    if stdout.trim().is_empty() {
        stderr
    } else {
        stdout
    }
}
