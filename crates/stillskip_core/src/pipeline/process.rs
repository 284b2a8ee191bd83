//! Child process supervision for the external collaborators.

use std::process::{Child, Command};

use tracing::{debug, warn};

use super::errors::{PipelineError, PipelineResult};

/// A spawned collaborator whose exit status has not been collected yet.
///
/// Dropping a collaborator without waiting kills it first so an aborted
/// run never leaves a child blocked on a conduit.
#[derive(Debug)]
pub struct Collaborator {
    tool: String,
    child: Child,
    waited: bool,
}

impl Collaborator {
    /// Spawn `cmd`, labelling it `tool` for logs and errors.
    pub fn spawn(tool: &str, cmd: &mut Command) -> PipelineResult<Self> {
        debug!("Running {}: {:?}", tool, cmd);
        let child = cmd
            .spawn()
            .map_err(|e| PipelineError::spawn(tool, e))?;
        Ok(Collaborator {
            tool: tool.to_string(),
            child,
            waited: false,
        })
    }

    /// Wait for the collaborator and fail on a non-success exit.
    pub fn wait(&mut self) -> PipelineResult<()> {
        let status = self
            .child
            .wait()
            .map_err(|e| PipelineError::io(format!("waiting for {}", self.tool), e))?;
        self.waited = true;
        debug!("{} finished: {}", self.tool, status);
        if !status.success() {
            return Err(PipelineError::collaborator(&self.tool, status));
        }
        Ok(())
    }
}

impl Drop for Collaborator {
    fn drop(&mut self) {
        if !self.waited {
            warn!("{} still running at teardown, killing it", self.tool);
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn successful_exit_passes() {
        let mut child = Collaborator::spawn("true", &mut Command::new("true")).unwrap();
        assert!(child.wait().is_ok());
    }

    #[test]
    fn failing_exit_is_reported() {
        let mut child = Collaborator::spawn("false", &mut Command::new("false")).unwrap();
        match child.wait() {
            Err(PipelineError::CollaboratorFailed { tool, .. }) => assert_eq!(tool, "false"),
            other => panic!("expected a collaborator failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let result = Collaborator::spawn(
            "nonexistent",
            &mut Command::new("/nonexistent/definitely-not-a-tool"),
        );
        assert!(matches!(result, Err(PipelineError::Spawn { .. })));
    }

    #[test]
    fn dropping_an_unwaited_collaborator_reaps_it() {
        crate::logging::init_test_tracing();
        let start = Instant::now();
        let child = Collaborator::spawn("sleep", &mut Command::new("sleep").arg("30")).unwrap();
        drop(child);
        assert!(start.elapsed().as_secs() < 5);
    }
}
