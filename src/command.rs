use anyhow::Error;
use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

/// Captured output of a finished external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout followed by stderr, the way a terminal would have shown them.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        if !combined.is_empty() && !self.stderr.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&self.stderr);
        combined
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, Error>;
}

/// Runs commands on the host with `tokio::process`.
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, Error> {
        let program = program.trim();
        if program.is_empty() {
            return Err(Error::msg("no command given"));
        }

        let quoted = quote_command(program, args);
        debug!("executing `{}`", quoted);

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|err| Error::msg(format!("unable to run '{}': {}", quoted, err)))?;

        let output_text = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        match output.status.code() {
            Some(0) => Ok(output_text),
            Some(code) => Err(Error::msg(format!(
                "failed command: {} (exit status {})\n{}",
                quoted,
                code,
                output_text.combined().trim_end()
            ))),
            None => Err(Error::msg(format!(
                "failed command: {} (terminated by signal)\n{}",
                quoted,
                output_text.combined().trim_end()
            ))),
        }
    }
}

/// Joins the program and args, quoting args that would otherwise be ambiguous.
pub fn quote_command(program: &str, args: &[&str]) -> String {
    let mut quoted = program.to_string();
    for arg in args {
        quoted.push(' ');
        if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
            quoted.push_str(&format!("{:?}", arg));
        } else {
            quoted.push_str(arg);
        }
    }
    quoted
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_command_plain_args() {
        assert_eq!(
            quote_command("aws", &["eks", "--region", "us-east-1", "list-clusters"]),
            "aws eks --region us-east-1 list-clusters"
        );
    }

    #[test]
    fn test_quote_command_quotes_whitespace_and_empty() {
        assert_eq!(
            quote_command("az", &["--query", "[].{id: id}", ""]),
            r#"az --query "[].{id: id}" """#
        );
    }

    #[test]
    fn test_combined_output_separates_streams() {
        let output = CommandOutput {
            stdout: "updated".into(),
            stderr: "warning".into(),
        };
        assert_eq!(output.combined(), "updated\nwarning");

        let output = CommandOutput {
            stdout: String::new(),
            stderr: "only err\n".into(),
        };
        assert_eq!(output.combined(), "only err\n");
    }

    #[tokio::test]
    async fn test_run_missing_program_fails() {
        let err = SystemRunner
            .run("kcloud-no-such-program", &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unable to run 'kcloud-no-such-program'"));
    }

    #[tokio::test]
    async fn test_run_blank_program_fails() {
        assert!(SystemRunner.run("   ", &[]).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stdout() {
        let output = SystemRunner.run("sh", &["-c", "echo hello"]).await.unwrap();
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_nonzero_exit_reports_combined_output() {
        let err = SystemRunner
            .run("sh", &["-c", "echo out; echo err >&2; exit 3"])
            .await
            .unwrap_err()
            .to_string();
        assert!(err.starts_with("failed command: sh -c"));
        assert!(err.contains("exit status 3"));
        assert!(err.contains("out\nerr"));
    }
}
