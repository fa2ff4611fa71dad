//! 外部解码器调用与时长探测

use super::error::ExtractionError;
use log::{debug, error};
use std::fmt;
use std::path::Path;
use std::process::Command;

/// 一次外部进程调用的参数向量
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl DecoderCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// 完整 argv（含程序名）
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone()).chain(self.args.iter().cloned()).collect()
    }
}

impl fmt::Display for DecoderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// 执行解码命令；失败必须返回错误，调度器据此中止整次运行
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &DecoderCommand) -> Result<(), ExtractionError>;
}

/// 以子进程方式运行，捕获 stderr 用于报错
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &DecoderCommand) -> Result<(), ExtractionError> {
        debug!("▶️ {}", command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|source| ExtractionError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("❌ Decoder failed ({}): {}", output.status, stderr);
            return Err(ExtractionError::DecoderFailed {
                command: command.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        Ok(())
    }
}

pub fn decoder_available(program: &str) -> bool {
    Command::new(program).arg("-version").output().is_ok()
}

/// 探测视频时长（整秒，向下取整）；时长无法解析时返回 0，交给调度器走兜底分块
pub fn probe_duration(program: &str, video: &Path) -> Result<u64, ExtractionError> {
    let output = Command::new(program)
        .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
        .arg(video)
        .output()
        .map_err(|source| ExtractionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ExtractionError::Probe(format!("{} exited with {}: {}", program, output.status, stderr)));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_output(stdout: &str) -> Result<u64, ExtractionError> {
    let json: serde_json::Value = serde_json::from_str(stdout)?;

    let seconds = json["format"]["duration"]
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .or_else(|| json["format"]["duration"].as_f64())
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(|d| d.floor() as u64)
        .unwrap_or(0);

    debug!("Probed duration: {}s", seconds);
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder_and_display() {
        let cmd = DecoderCommand::new("ffmpeg").arg("-y").args(["-i", "in.mp4"]);
        assert_eq!(cmd.argv(), vec!["ffmpeg", "-y", "-i", "in.mp4"]);
        assert_eq!(cmd.to_string(), "ffmpeg -y -i in.mp4");
    }

    #[test]
    fn test_parse_probe_output() {
        assert_eq!(parse_probe_output(r#"{"format": {"duration": "650.733"}}"#).unwrap(), 650);
        assert_eq!(parse_probe_output(r#"{"format": {"duration": "N/A"}}"#).unwrap(), 0);
        assert_eq!(parse_probe_output(r#"{"format": {}}"#).unwrap(), 0);
        assert!(parse_probe_output("not json").is_err());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let cmd = DecoderCommand::new("definitely-not-a-decoder-binary").arg("-version");
        assert!(matches!(ProcessRunner.run(&cmd), Err(ExtractionError::Spawn { .. })));
        assert!(!decoder_available("definitely-not-a-decoder-binary"));
    }
}
